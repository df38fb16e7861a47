//! Common helper functions for the NoteNook deploy script and tests

use std::{collections::BTreeSet, path::Path, sync::Arc};

use cargo_miden::{run, OutputType};
use miden_client::{
    account::{
        component::{AuthRpoFalcon512, BasicWallet, NoAuth},
        Account, AccountId, AccountStorageMode, AccountType, StorageSlot,
    },
    auth::AuthSecretKey,
    builder::ClientBuilder,
    crypto::{FeltRng, SecretKey},
    keystore::FilesystemKeyStore,
    note::{
        Note, NoteExecutionHint, NoteInputs, NoteMetadata, NoteRecipient, NoteScript, NoteTag,
        NoteType,
    },
    rpc::TonicRpcClient,
    utils::Deserializable,
    Client,
};
use miden_core::{Felt, FieldElement};
use miden_mast_package::Package;
use miden_objects::account::{
    AccountBuilder, AccountComponent, AccountComponentMetadata, AccountComponentTemplate,
};
use rand::{rngs::StdRng, RngCore};
use tracing::{debug, info};

pub mod config;
pub mod encoding;
pub mod error;
pub mod logging;
pub mod note_nook;
pub mod signers;

pub use config::NookConfig;
pub use error::{NookError, Result};
pub use logging::init_tracing;
pub use note_nook::{deliver_note, ConnectedNoteNook, NoteNook, NoteNookPackages, Receipt};
pub use signers::{deployer_signer, get_signers};

pub type NookClient = Client<FilesystemKeyStore<StdRng>>;

/// Client plus the keystore holding its signers' keys
pub struct ClientSetup {
    pub client: NookClient,
    pub keystore: Arc<FilesystemKeyStore<StdRng>>,
}

/// Connect a client to the configured node, backed by the configured store and keystore
pub async fn setup_client(config: &NookConfig) -> Result<ClientSetup> {
    let rpc_api = Arc::new(TonicRpcClient::new(&config.endpoint, config.timeout_ms));

    if let Some(parent) = config.store_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let keystore = Arc::new(FilesystemKeyStore::<StdRng>::new(config.keystore_path.clone())?);

    let client = ClientBuilder::new()
        .rpc(rpc_api)
        .sqlite_store(&config.store_path.to_string_lossy())
        .authenticator(keystore.clone())
        .in_debug_mode(true.into())
        .build()
        .await?;

    info!(endpoint = %config.endpoint, store = %config.store_path.display(), "client ready");
    Ok(ClientSetup { client, keystore })
}

/// Compile the cargo-miden project in `dir` and load the resulting package
pub fn build_project_in_dir(dir: &Path, release: bool) -> Result<Package> {
    let profile: &str = if release { "--release" } else { "--debug" };
    let manifest_path = dir.join("Cargo.toml");
    let project = dir.display().to_string();

    let args = vec![
        "cargo".to_string(),
        "miden".to_string(),
        "build".to_string(),
        profile.to_string(),
        "--manifest-path".to_string(),
        manifest_path.to_string_lossy().to_string(),
    ];

    debug!(%project, profile, "cargo miden build");
    let output = run(args.into_iter(), OutputType::Masm)
        .map_err(|e| NookError::Build { project: project.clone(), reason: format!("{e}") })?
        .ok_or_else(|| NookError::Build {
            project: project.clone(),
            reason: "cargo miden build produced no output".into(),
        })?;

    let artifact_path = match output {
        cargo_miden::CommandOutput::BuildCommandOutput {
            output: cargo_miden::BuildOutput::Masm { artifact_path },
        } => artifact_path,
        other => {
            return Err(NookError::Build {
                project,
                reason: format!("expected a masm artifact, got {other:?}"),
            })
        }
    };

    let package_bytes = std::fs::read(&artifact_path)?;
    info!(%project, artifact = %artifact_path.display(), "package built");
    Ok(Package::read_from_bytes(&package_bytes)?)
}

/// Configuration for creating an account with a custom component
#[derive(Clone)]
pub struct AccountCreationConfig {
    pub account_type: AccountType,
    pub storage_mode: AccountStorageMode,
    pub storage_slots: Vec<StorageSlot>,
    pub supported_types: Option<Vec<AccountType>>,
}

impl Default for AccountCreationConfig {
    fn default() -> Self {
        Self {
            account_type: AccountType::RegularAccountImmutableCode,
            storage_mode: AccountStorageMode::Public,
            storage_slots: vec![],
            supported_types: None,
        }
    }
}

pub fn account_component_from_package(
    package: Arc<Package>,
    config: &AccountCreationConfig,
) -> Result<AccountComponent> {
    let bytes = package.account_component_metadata_bytes.as_deref().ok_or_else(|| {
        NookError::Build {
            project: package.name.to_string(),
            reason: "no account component metadata present".into(),
        }
    })?;

    let metadata = AccountComponentMetadata::read_from_bytes(bytes)?;
    let template =
        AccountComponentTemplate::new(metadata, package.unwrap_library().as_ref().clone());
    let component = AccountComponent::new(template.library().clone(), config.storage_slots.clone())?;

    // Use supported types from config if provided, otherwise default to RegularAccountImmutableCode
    let supported_types = match &config.supported_types {
        Some(types) => BTreeSet::from_iter(types.clone()),
        None => BTreeSet::from_iter([AccountType::RegularAccountImmutableCode]),
    };

    Ok(component.with_supported_types(supported_types))
}

/// Create an account with a custom component from a package and the no-auth auth component
pub async fn create_account_from_package(
    client: &mut NookClient,
    package: Arc<Package>,
    config: AccountCreationConfig,
) -> Result<Account> {
    let account_component = account_component_from_package(package, &config)?;

    let mut init_seed = [0_u8; 32];
    client.rng().fill_bytes(&mut init_seed);

    // Sync client state to get latest block info
    client.sync_state().await?;

    let (account, seed) = AccountBuilder::new(init_seed)
        .account_type(config.account_type)
        .storage_mode(config.storage_mode)
        .with_component(account_component)
        .with_auth_component(NoAuth)
        .build()?;

    client.add_account(&account, Some(seed), false).await?;
    debug!(account = %account.id(), "component account added");

    Ok(account)
}

/// Create a basic wallet account with standard RpoFalcon512 auth, its key stored in `keystore`
pub async fn create_basic_wallet_account(
    client: &mut NookClient,
    keystore: Arc<FilesystemKeyStore<StdRng>>,
    config: AccountCreationConfig,
) -> Result<Account> {
    let mut init_seed = [0_u8; 32];
    client.rng().fill_bytes(&mut init_seed);

    let key_pair = SecretKey::with_rng(client.rng());

    // Sync client state to get latest block info
    client.sync_state().await?;

    let (account, seed) = AccountBuilder::new(init_seed)
        .account_type(config.account_type)
        .storage_mode(config.storage_mode)
        .with_auth_component(AuthRpoFalcon512::new(key_pair.public_key()))
        .with_component(BasicWallet)
        .build()?;

    client.add_account(&account, Some(seed), false).await?;
    keystore.add_key(&AuthSecretKey::RpoFalcon512(key_pair))?;
    debug!(account = %account.id(), "wallet added");

    Ok(account)
}

/// Configuration for creating a note
pub struct NoteCreationConfig {
    pub note_type: NoteType,
    pub tag: NoteTag,
    pub assets: miden_client::note::NoteAssets,
    pub inputs: Vec<Felt>,
    pub execution_hint: NoteExecutionHint,
    pub aux: Felt,
}

impl Default for NoteCreationConfig {
    fn default() -> Self {
        Self {
            note_type: NoteType::Public,
            tag: NoteTag::for_local_use_case(0, 0).expect("use case 0 is a valid local tag"),
            assets: Default::default(),
            inputs: Default::default(),
            execution_hint: NoteExecutionHint::always(),
            aux: Felt::ZERO,
        }
    }
}

/// Create a note from a compiled note script package
pub fn create_note_from_package(
    client: &mut NookClient,
    package: Arc<Package>,
    sender_id: AccountId,
    config: NoteCreationConfig,
) -> Result<Note> {
    let note_program = package.unwrap_program();
    let note_script =
        NoteScript::from_parts(note_program.mast_forest().clone(), note_program.entrypoint());

    let serial_num = client.rng().draw_word();
    let note_inputs = NoteInputs::new(config.inputs)?;
    let recipient = NoteRecipient::new(serial_num, note_script, note_inputs);

    let metadata = NoteMetadata::new(
        sender_id,
        config.note_type,
        config.tag,
        config.execution_hint,
        config.aux,
    )?;

    Ok(Note::new(config.assets, metadata, recipient))
}
