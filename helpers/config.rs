//! Environment driven configuration for scripts and tests

use std::{
    env,
    path::{Path, PathBuf},
};

use miden_client::{account::AccountId, rpc::Endpoint};

use crate::error::{NookError, Result};

pub const ENV_RPC: &str = "NOTE_NOOK_RPC";
pub const ENV_RPC_TIMEOUT_MS: &str = "NOTE_NOOK_RPC_TIMEOUT_MS";
pub const ENV_STORE_PATH: &str = "NOTE_NOOK_STORE_PATH";
pub const ENV_KEYSTORE_PATH: &str = "NOTE_NOOK_KEYSTORE_PATH";
pub const ENV_CONTRACTS_DIR: &str = "NOTE_NOOK_CONTRACTS_DIR";
pub const ENV_DEBUG_BUILD: &str = "NOTE_NOOK_DEBUG_BUILD";
pub const ENV_DEPLOYER: &str = "NOTE_NOOK_DEPLOYER";

const ACCOUNT_PROJECT: &str = "note-nook-account";
const INIT_NOTE_PROJECT: &str = "init-note";
const REGISTER_NOTE_PROJECT: &str = "register-note";

/// Client and build settings
#[derive(Debug, Clone)]
pub struct NookConfig {
    pub endpoint: Endpoint,
    pub timeout_ms: u64,
    pub store_path: PathBuf,
    pub keystore_path: PathBuf,
    pub contracts_dir: PathBuf,
    pub release: bool,
    /// Existing account to deploy from instead of a fresh wallet
    pub deployer: Option<AccountId>,
}

impl Default for NookConfig {
    fn default() -> Self {
        Self {
            endpoint: Endpoint::testnet(),
            timeout_ms: 10_000,
            store_path: PathBuf::from("./store.sqlite3"),
            keystore_path: PathBuf::from("./keystore"),
            contracts_dir: PathBuf::from("../contracts"),
            release: true,
            deployer: None,
        }
    }
}

impl NookConfig {
    /// Reads every `NOTE_NOOK_*` variable, falling back to the defaults.
    ///
    /// Callers that want `.env` support load it first with `dotenvy::dotenv()`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`NookConfig::from_env`], reading variables through `lookup`.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(raw) = var(ENV_RPC) {
            config.endpoint = parse_endpoint(&raw)?;
        }
        if let Some(raw) = var(ENV_RPC_TIMEOUT_MS) {
            config.timeout_ms = raw.parse().map_err(|e| NookError::Config {
                key: ENV_RPC_TIMEOUT_MS,
                reason: format!("{e}"),
            })?;
        }
        if let Some(raw) = var(ENV_STORE_PATH) {
            config.store_path = PathBuf::from(raw);
        }
        if let Some(raw) = var(ENV_KEYSTORE_PATH) {
            config.keystore_path = PathBuf::from(raw);
        }
        if let Some(raw) = var(ENV_CONTRACTS_DIR) {
            config.contracts_dir = PathBuf::from(raw);
        }
        if let Some(raw) = var(ENV_DEBUG_BUILD) {
            config.release = !parse_flag(ENV_DEBUG_BUILD, &raw)?;
        }
        if let Some(raw) = var(ENV_DEPLOYER) {
            config.deployer = Some(AccountId::from_hex(&raw)?);
        }

        Ok(config)
    }

    /// Moves the sqlite store and the keystore under `dir`.
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.store_path = dir.join("store.sqlite3");
        self.keystore_path = dir.join("keystore");
        self
    }

    pub fn account_project_dir(&self) -> PathBuf {
        self.contracts_dir.join(ACCOUNT_PROJECT)
    }

    pub fn init_note_project_dir(&self) -> PathBuf {
        self.contracts_dir.join(INIT_NOTE_PROJECT)
    }

    pub fn register_note_project_dir(&self) -> PathBuf {
        self.contracts_dir.join(REGISTER_NOTE_PROJECT)
    }
}

fn parse_endpoint(raw: &str) -> Result<Endpoint> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "testnet" => Ok(Endpoint::testnet()),
        "devnet" => Ok(Endpoint::devnet()),
        "localhost" | "local" => Ok(Endpoint::localhost()),
        _ => Endpoint::try_from(raw.trim()).map_err(|e| NookError::Config {
            key: ENV_RPC,
            reason: format!("{e}"),
        }),
    }
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(NookError::Config { key, reason: format!("expected a boolean, got `{other}`") }),
    }
}
