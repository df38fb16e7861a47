//! Error type shared by the NoteNook helpers

use miden_client::{
    account::AccountId, keystore::KeyStoreError, transaction::TransactionRequestError,
    utils::DeserializationError, ClientError,
};
use miden_objects::{AccountError, AccountIdError, NoteError};
use thiserror::Error;

pub type Result<T, E = NookError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum NookError {
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    #[error("account error: {0}")]
    Account(#[from] AccountError),

    #[error("invalid account id: {0}")]
    AccountId(#[from] AccountIdError),

    #[error("note error: {0}")]
    Note(#[from] NoteError),

    #[error("transaction request error: {0}")]
    Request(#[from] TransactionRequestError),

    #[error("keystore error: {0}")]
    KeyStore(#[from] KeyStoreError),

    #[error("failed to deserialize package: {0}")]
    Deserialize(#[from] DeserializationError),

    #[error("failed to build {project}: {reason}")]
    Build { project: String, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration for {key}: {reason}")]
    Config { key: &'static str, reason: String },

    #[error("invalid display name: {0}")]
    InvalidName(String),

    #[error("account {0} is already registered")]
    AlreadyRegistered(AccountId),

    #[error("account {0} is not tracked by the client")]
    AccountNotFound(AccountId),
}
