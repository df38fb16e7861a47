// Do not link against libstd (i.e. anything defined in `std::`)
#![no_std]

use miden::*;

/// Longest display name, in bytes.
const NAME_MAX_BYTES: u64 = 32;

/// NoteNook account component.
///
/// Stores the deploying owner, a per-account balance ledger and a registration
/// record (flag plus display name) for every account that has sent a register
/// note to this account.
///
/// The mutating procedures act on the sender of the note being consumed, so
/// they can only be reached through a note. `owner`, `balance_of` and
/// `is_registered` are on-chain views for other note scripts; off-chain
/// clients read the same slots from account storage.
///
/// # Storage
/// - slot 0: owner account id as `[prefix, suffix, 0, 0]`, empty until `init`
/// - slot 1: balances keyed by `[prefix, suffix, 0, 0]`, amount in element 0
/// - slot 2: registration header `[flag, name_len, 0, 0]` keyed like balances
/// - slot 3: display name chunks keyed by `[prefix, suffix, chunk, 0]`
#[component]
struct NoteNook {
    #[storage(slot(0), description = "owner account id")]
    owner: Value,

    #[storage(slot(1), description = "balance ledger keyed by account id")]
    balances: StorageMap,

    #[storage(slot(2), description = "registration header keyed by account id")]
    registrations: StorageMap,

    #[storage(slot(3), description = "display name chunks keyed by account id and chunk index")]
    names: StorageMap,
}

fn account_key(account: AccountId) -> Word {
    Word::from([account.prefix, account.suffix, felt!(0), felt!(0)])
}

fn name_key(account: AccountId, chunk: u32) -> Word {
    Word::from([account.prefix, account.suffix, Felt::from_u32(chunk), felt!(0)])
}

#[component]
impl NoteNook {
    /// Records the sender of the active note as owner. Runs once.
    pub fn init(&mut self) {
        let current: Word = self.owner.read();
        assert_eq(current[0], felt!(0));
        assert_eq(current[1], felt!(0));

        let deployer = active_note::get_sender();
        self.owner.write(account_key(deployer));
    }

    /// Returns the owner account id recorded by `init`.
    pub fn owner(&self) -> Word {
        self.owner.read()
    }

    pub fn balance_of(&self, account: AccountId) -> Felt {
        let entry: Word = self.balances.get(&account_key(account));
        entry[0]
    }

    /// Returns `1` if `account` has registered, `0` otherwise.
    pub fn is_registered(&self, account: AccountId) -> Felt {
        let header: Word = self.registrations.get(&account_key(account));
        header[0]
    }

    /// Registers the sender of the active note.
    ///
    /// `header` is `[1, name_len, 0, 0]` with `name_len` in `1..=32`; `low` and
    /// `high` hold the packed name bytes. An account can register only once.
    pub fn register(&mut self, header: Word, low: Word, high: Word) {
        let registrant = active_note::get_sender();
        let key = account_key(registrant);

        let current: Word = self.registrations.get(&key);
        assert_eq(current[0], felt!(0));
        assert_eq(header[0], felt!(1));

        let name_len = header[1].as_u64();
        assert!(name_len >= 1 && name_len <= NAME_MAX_BYTES);

        self.registrations.set(key, header);
        self.names.set(name_key(registrant, 0), low);
        self.names.set(name_key(registrant, 1), high);
    }
}
