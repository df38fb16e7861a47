//! Storage keys and the display name codec shared with the contracts
//!
//! Account ids are laid out as `[prefix, suffix, 0, 0]` in every key. Names are
//! packed four bytes per felt, little-endian, into two words.

use miden_client::account::AccountId;
use miden_core::{Felt, FieldElement, Word};

use crate::error::{NookError, Result};

/// Upper bound on a display name, in UTF-8 bytes.
pub const NAME_MAX_BYTES: usize = 32;

/// Number of felts in a register note's inputs: length plus eight packed felts.
pub const REGISTER_NOTE_INPUTS: usize = 1 + NAME_MAX_BYTES / 4;

pub const OWNER_SLOT: u8 = 0;
pub const BALANCES_SLOT: u8 = 1;
pub const REGISTRATIONS_SLOT: u8 = 2;
pub const NAMES_SLOT: u8 = 3;

pub fn account_key(account: AccountId) -> Word {
    Word::from([account.prefix().as_felt(), account.suffix(), Felt::ZERO, Felt::ZERO])
}

pub fn name_chunk_key(account: AccountId, chunk: u32) -> Word {
    Word::from([account.prefix().as_felt(), account.suffix(), Felt::from(chunk), Felt::ZERO])
}

/// Owner slot value for `account`.
pub fn owner_word(account: AccountId) -> Word {
    account_key(account)
}

pub fn account_id_from_word(word: Word) -> Result<AccountId> {
    Ok(AccountId::try_from([word[0], word[1]])?)
}

/// The registration flag is element 0 of the header word.
pub fn is_registered_header(header: Word) -> bool {
    header[0] == Felt::ONE
}

/// Encodes `name` as register note inputs `[len, p0..p7]`.
pub fn encode_name(name: &str) -> Result<Vec<Felt>> {
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return Err(NookError::InvalidName("name must not be empty".into()));
    }
    if bytes.len() > NAME_MAX_BYTES {
        return Err(NookError::InvalidName(format!(
            "name is {} bytes, at most {NAME_MAX_BYTES} are allowed",
            bytes.len()
        )));
    }

    let mut padded = [0_u8; NAME_MAX_BYTES];
    padded[..bytes.len()].copy_from_slice(bytes);

    let mut inputs = Vec::with_capacity(REGISTER_NOTE_INPUTS);
    inputs.push(Felt::new(bytes.len() as u64));
    inputs.extend(padded.chunks_exact(4).map(|quad| {
        Felt::from(u32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]]))
    }));
    Ok(inputs)
}

/// Decodes a stored name from its header and the two name chunks.
pub fn decode_name(header: Word, low: Word, high: Word) -> Result<String> {
    let len = header[1].as_int() as usize;
    if len == 0 || len > NAME_MAX_BYTES {
        return Err(NookError::InvalidName(format!("stored name length {len} is out of range")));
    }

    let packed = [low[0], low[1], low[2], low[3], high[0], high[1], high[2], high[3]];
    let mut bytes = Vec::with_capacity(NAME_MAX_BYTES);
    for felt in packed {
        let quad = u32::try_from(felt.as_int())
            .map_err(|_| NookError::InvalidName("name chunk does not fit in 32 bits".into()))?;
        bytes.extend_from_slice(&quad.to_le_bytes());
    }
    bytes.truncate(len);

    String::from_utf8(bytes).map_err(|e| NookError::InvalidName(e.to_string()))
}

/// Splits encoded note inputs back into the header and chunk words the
/// register note script hands to the account.
pub fn registration_words(inputs: &[Felt]) -> Result<(Word, Word, Word)> {
    if inputs.len() != REGISTER_NOTE_INPUTS {
        return Err(NookError::InvalidName(format!(
            "expected {REGISTER_NOTE_INPUTS} note inputs, got {}",
            inputs.len()
        )));
    }
    let header = Word::from([Felt::ONE, inputs[0], Felt::ZERO, Felt::ZERO]);
    let low = Word::from([inputs[1], inputs[2], inputs[3], inputs[4]]);
    let high = Word::from([inputs[5], inputs[6], inputs[7], inputs[8]]);
    Ok((header, low, high))
}
