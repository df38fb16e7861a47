//! Handle to a deployed NoteNook account
//!
//! Reads come straight from the account storage tracked by the client. Writes
//! are notes published by the caller and then consumed by the NoteNook
//! account, so the caller identity is always the note sender.

use std::sync::Arc;

use miden_client::{
    account::{Account, AccountId, StorageMap, StorageSlot},
    note::{Note, NoteId},
    transaction::{OutputNote, TransactionRequestBuilder},
};
use miden_core::Word;
use miden_mast_package::Package;
use miden_objects::transaction::TransactionId;
use tracing::{debug, info};

use crate::{
    build_project_in_dir, create_account_from_package, create_note_from_package,
    encoding::{
        account_id_from_word, account_key, decode_name, encode_name, is_registered_header,
        name_chunk_key, BALANCES_SLOT, NAMES_SLOT, OWNER_SLOT, REGISTRATIONS_SLOT,
    },
    AccountCreationConfig, NookClient, NookConfig, NookError, NoteCreationConfig, Result,
};

/// Compiled NoteNook contracts
#[derive(Clone)]
pub struct NoteNookPackages {
    pub account: Arc<Package>,
    pub init_note: Arc<Package>,
    pub register_note: Arc<Package>,
}

impl NoteNookPackages {
    pub fn build(config: &NookConfig) -> Result<Self> {
        let account = build_project_in_dir(&config.account_project_dir(), config.release)?;
        let init_note = build_project_in_dir(&config.init_note_project_dir(), config.release)?;
        let register_note =
            build_project_in_dir(&config.register_note_project_dir(), config.release)?;
        Ok(Self {
            account: Arc::new(account),
            init_note: Arc::new(init_note),
            register_note: Arc::new(register_note),
        })
    }
}

/// Ids of the two transactions that deliver a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub note_id: NoteId,
    pub publish_tx: TransactionId,
    pub consume_tx: TransactionId,
}

/// Publish `note` from `sender`, then consume it on `target`.
///
/// The client is synced after each transaction. An error from the consume
/// step leaves the published note unconsumed.
pub async fn deliver_note(
    client: &mut NookClient,
    sender: AccountId,
    target: AccountId,
    note: Note,
) -> Result<Receipt> {
    let note_id = note.id();

    // build and submit transaction to publish note
    let note_publish_request = TransactionRequestBuilder::new()
        .own_output_notes(vec![OutputNote::Full(note.clone())])
        .build()?;
    let note_publish_tx_result = client.new_transaction(sender, note_publish_request).await?;
    let publish_tx = note_publish_tx_result.executed_transaction().id();
    client.submit_transaction(note_publish_tx_result).await?;
    client.sync_state().await?;
    debug!(%sender, note = %note_id, tx = %publish_tx, "note published");

    let consume_note_request =
        TransactionRequestBuilder::new().unauthenticated_input_notes([(note, None)]).build()?;
    let consume_tx_result = client.new_transaction(target, consume_note_request).await?;
    let consume_tx = consume_tx_result.executed_transaction().id();
    client.submit_transaction(consume_tx_result).await?;
    client.sync_state().await?;
    debug!(%target, note = %note_id, tx = %consume_tx, "note consumed");

    Ok(Receipt { note_id, publish_tx, consume_tx })
}

pub struct NoteNook {
    address: AccountId,
    register_note: Arc<Package>,
}

impl NoteNook {
    /// Create a NoteNook account and commit it on-chain with `deployer` as owner.
    ///
    /// The account starts with an empty owner slot. Its first transaction
    /// consumes an init note sent by `deployer`, which records the owner.
    pub async fn deploy(
        client: &mut NookClient,
        packages: &NoteNookPackages,
        deployer: &Account,
    ) -> Result<Self> {
        let config = AccountCreationConfig {
            storage_slots: vec![
                StorageSlot::Value(Word::default()),
                StorageSlot::Map(StorageMap::new()),
                StorageSlot::Map(StorageMap::new()),
                StorageSlot::Map(StorageMap::new()),
            ],
            ..Default::default()
        };
        let account = create_account_from_package(client, packages.account.clone(), config).await?;

        let init_note = create_note_from_package(
            client,
            packages.init_note.clone(),
            deployer.id(),
            NoteCreationConfig::default(),
        )?;
        let receipt = deliver_note(client, deployer.id(), account.id(), init_note).await?;
        info!(
            contract = %account.id(),
            deployer = %deployer.id(),
            tx = %receipt.consume_tx,
            "NoteNook deployed"
        );

        Ok(Self::at(account.id(), packages))
    }

    /// Fetch a deployed NoteNook account from the node and track it locally.
    pub async fn import(
        client: &mut NookClient,
        address: AccountId,
        packages: &NoteNookPackages,
    ) -> Result<Self> {
        client.import_account_by_id(address).await?;
        info!(contract = %address, "NoteNook imported from node");
        Ok(Self::at(address, packages))
    }

    /// Attach to a NoteNook account the client already tracks.
    pub fn at(address: AccountId, packages: &NoteNookPackages) -> Self {
        Self { address, register_note: packages.register_note.clone() }
    }

    pub fn address(&self) -> AccountId {
        self.address
    }

    pub async fn owner(&self, client: &mut NookClient) -> Result<AccountId> {
        let word = self.storage_item(client, OWNER_SLOT).await?;
        account_id_from_word(word)
    }

    pub async fn balance_of(&self, client: &mut NookClient, account: AccountId) -> Result<u64> {
        let entry = self.storage_map_item(client, BALANCES_SLOT, account_key(account)).await?;
        Ok(entry[0].as_int())
    }

    /// Scope subsequent calls to `signer`.
    pub fn connect<'a>(&'a self, signer: &Account) -> ConnectedNoteNook<'a> {
        ConnectedNoteNook { nook: self, caller: signer.id() }
    }

    async fn storage_item(&self, client: &mut NookClient, slot: u8) -> Result<Word> {
        let account = self.load(client).await?;
        Ok(account.storage().get_item(slot)?)
    }

    async fn storage_map_item(&self, client: &mut NookClient, slot: u8, key: Word) -> Result<Word> {
        let account = self.load(client).await?;
        Ok(account.storage().get_map_item(slot, key)?)
    }

    async fn load(&self, client: &mut NookClient) -> Result<Account> {
        let record = client
            .get_account(self.address)
            .await?
            .ok_or(NookError::AccountNotFound(self.address))?;
        Ok(record.account().clone())
    }
}

/// A NoteNook handle whose calls act on behalf of one caller
pub struct ConnectedNoteNook<'a> {
    nook: &'a NoteNook,
    caller: AccountId,
}

impl ConnectedNoteNook<'_> {
    pub fn caller(&self) -> AccountId {
        self.caller
    }

    pub async fn is_registered(&self, client: &mut NookClient) -> Result<bool> {
        let header = self.registration_header(client).await?;
        Ok(is_registered_header(header))
    }

    /// Display name of the caller, if registered.
    pub async fn name(&self, client: &mut NookClient) -> Result<Option<String>> {
        let header = self.registration_header(client).await?;
        if !is_registered_header(header) {
            return Ok(None);
        }
        let low = self
            .nook
            .storage_map_item(client, NAMES_SLOT, name_chunk_key(self.caller, 0))
            .await?;
        let high = self
            .nook
            .storage_map_item(client, NAMES_SLOT, name_chunk_key(self.caller, 1))
            .await?;
        decode_name(header, low, high).map(Some)
    }

    /// Register the caller under `name`.
    ///
    /// Refuses names the contract would reject and callers that are already
    /// registered, then delivers a register note from the caller.
    pub async fn register(&self, client: &mut NookClient, name: &str) -> Result<Receipt> {
        let inputs = encode_name(name)?;
        if self.is_registered(client).await? {
            return Err(NookError::AlreadyRegistered(self.caller));
        }

        let register_note = create_note_from_package(
            client,
            self.nook.register_note.clone(),
            self.caller,
            NoteCreationConfig { inputs, ..Default::default() },
        )?;
        let receipt = deliver_note(client, self.caller, self.nook.address, register_note).await?;
        info!(caller = %self.caller, tx = %receipt.consume_tx, "registered");

        Ok(receipt)
    }

    async fn registration_header(&self, client: &mut NookClient) -> Result<Word> {
        self.nook
            .storage_map_item(client, REGISTRATIONS_SLOT, account_key(self.caller))
            .await
    }
}
