//! NoteNook integration scenarios
//!
//! Every test deploys its own NoteNook instance from a fresh store and keystore.
//! They talk to the node selected by `NOTE_NOOK_RPC` and compile the contracts
//! with cargo-miden, so they are ignored by default:
//! `cargo test -p tests -- --ignored`.

use helpers::{
    create_note_from_package, deliver_note, encoding::encode_name, get_signers, init_tracing,
    setup_client, ClientSetup, NookClient, NookConfig, NookError, NoteCreationConfig, NoteNook,
    NoteNookPackages,
};
use miden_client::{account::Account, Felt};
use tempfile::TempDir;

struct Deployment {
    client: NookClient,
    config: NookConfig,
    packages: NoteNookPackages,
    nook: NoteNook,
    owner: Account,
    addr1: Account,
    addr2: Account,
    // keeps the store and keystore alive for the test
    _data_dir: TempDir,
}

async fn deploy_note_nook() -> anyhow::Result<Deployment> {
    init_tracing();

    let data_dir = tempfile::tempdir()?;
    let config = NookConfig::from_env()?.with_data_dir(data_dir.path());
    let ClientSetup { mut client, keystore } = setup_client(&config).await?;
    client.sync_state().await?;

    let signers = get_signers(&mut client, keystore, 3).await?;
    let [owner, addr1, addr2]: [Account; 3] =
        signers.try_into().map_err(|_| anyhow::anyhow!("expected three signers"))?;

    let packages = NoteNookPackages::build(&config)?;
    let nook = NoteNook::deploy(&mut client, &packages, &owner).await?;

    Ok(Deployment { client, config, packages, nook, owner, addr1, addr2, _data_dir: data_dir })
}

/// Deliver a register note with raw `inputs` from `sender`, bypassing the
/// checks in `ConnectedNoteNook::register`.
async fn send_raw_register_note(
    deployment: &mut Deployment,
    sender: &Account,
    inputs: Vec<Felt>,
) -> helpers::Result<()> {
    let note = create_note_from_package(
        &mut deployment.client,
        deployment.packages.register_note.clone(),
        sender.id(),
        NoteCreationConfig { inputs, ..Default::default() },
    )?;
    deliver_note(&mut deployment.client, sender.id(), deployment.nook.address(), note).await?;
    Ok(())
}

#[tokio::test]
#[ignore = "needs a reachable Miden node and the cargo-miden toolchain"]
async fn returns_the_right_owner() -> anyhow::Result<()> {
    let mut deployment = deploy_note_nook().await?;
    let Deployment { client, nook, owner, .. } = &mut deployment;

    assert_eq!(nook.owner(client).await?, owner.id());

    // a client that never saw the deployment fetches the contract from the node
    let observer_dir = tempfile::tempdir()?;
    let observer_config = deployment.config.clone().with_data_dir(observer_dir.path());
    let ClientSetup { client: mut observer, .. } = setup_client(&observer_config).await?;
    observer.sync_state().await?;

    let imported =
        NoteNook::import(&mut observer, deployment.nook.address(), &deployment.packages).await?;
    assert_eq!(imported.owner(&mut observer).await?, deployment.owner.id());
    Ok(())
}

#[tokio::test]
#[ignore = "needs a reachable Miden node and the cargo-miden toolchain"]
async fn owner_balance_starts_at_zero() -> anyhow::Result<()> {
    let mut deployment = deploy_note_nook().await?;
    let Deployment { client, nook, owner, .. } = &mut deployment;

    assert_eq!(nook.balance_of(client, owner.id()).await?, 0);
    Ok(())
}

#[tokio::test]
#[ignore = "needs a reachable Miden node and the cargo-miden toolchain"]
async fn new_user_is_not_registered() -> anyhow::Result<()> {
    let mut deployment = deploy_note_nook().await?;
    let Deployment { client, nook, addr1, .. } = &mut deployment;

    assert!(!nook.connect(addr1).is_registered(client).await?);
    assert_eq!(nook.connect(addr1).name(client).await?, None);
    Ok(())
}

#[tokio::test]
#[ignore = "needs a reachable Miden node and the cargo-miden toolchain"]
async fn registers_a_user() -> anyhow::Result<()> {
    let mut deployment = deploy_note_nook().await?;
    let Deployment { client, nook, addr1, .. } = &mut deployment;

    let user = nook.connect(addr1);
    let receipt = user.register(client, "Asir").await?;
    assert_ne!(receipt.publish_tx, receipt.consume_tx);

    assert!(user.is_registered(client).await?);
    assert_eq!(user.name(client).await?.as_deref(), Some("Asir"));
    Ok(())
}

#[tokio::test]
#[ignore = "needs a reachable Miden node and the cargo-miden toolchain"]
async fn registration_is_scoped_to_the_caller() -> anyhow::Result<()> {
    let mut deployment = deploy_note_nook().await?;
    let Deployment { client, nook, owner, addr1, addr2, .. } = &mut deployment;

    nook.connect(addr1).register(client, "Asir").await?;

    assert!(!nook.connect(addr2).is_registered(client).await?);
    assert!(!nook.connect(owner).is_registered(client).await?);
    Ok(())
}

#[tokio::test]
#[ignore = "needs a reachable Miden node and the cargo-miden toolchain"]
async fn second_registration_is_refused_before_sending() -> anyhow::Result<()> {
    let mut deployment = deploy_note_nook().await?;
    let Deployment { client, nook, addr1, .. } = &mut deployment;

    let user = nook.connect(addr1);
    user.register(client, "Asir").await?;

    let err = user.register(client, "Someone else").await.unwrap_err();
    assert!(matches!(err, NookError::AlreadyRegistered(id) if id == addr1.id()));
    assert_eq!(user.name(client).await?.as_deref(), Some("Asir"));
    Ok(())
}

#[tokio::test]
#[ignore = "needs a reachable Miden node and the cargo-miden toolchain"]
async fn contract_rejects_a_second_registration() -> anyhow::Result<()> {
    let mut deployment = deploy_note_nook().await?;
    let addr1 = deployment.addr1.clone();

    deployment.nook.connect(&addr1).register(&mut deployment.client, "Asir").await?;

    let result = send_raw_register_note(&mut deployment, &addr1, encode_name("Impostor")?).await;
    assert!(result.is_err(), "consuming a second register note must fail");

    let name = deployment.nook.connect(&addr1).name(&mut deployment.client).await?;
    assert_eq!(name.as_deref(), Some("Asir"));
    Ok(())
}

#[tokio::test]
#[ignore = "needs a reachable Miden node and the cargo-miden toolchain"]
async fn contract_rejects_out_of_range_name_lengths() -> anyhow::Result<()> {
    let mut deployment = deploy_note_nook().await?;
    let addr1 = deployment.addr1.clone();

    for len in [0_u64, 33] {
        let mut inputs = encode_name("Asir")?;
        inputs[0] = Felt::new(len);

        let result = send_raw_register_note(&mut deployment, &addr1, inputs).await;
        assert!(result.is_err(), "name length {len} must be rejected");
    }

    assert!(!deployment.nook.connect(&addr1).is_registered(&mut deployment.client).await?);
    Ok(())
}
