//! Deployment script for the NoteNook contract
//!
//! Prints the deployer and contract addresses on success. Any failure is
//! printed to stderr and the process exits with status 1.

use std::process::ExitCode;

use helpers::{
    deployer_signer, init_tracing, setup_client, ClientSetup, NookConfig, NoteNook,
    NoteNookPackages,
};
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    match deploy().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error:?}");
            ExitCode::FAILURE
        }
    }
}

async fn deploy() -> anyhow::Result<()> {
    let config = NookConfig::from_env()?;

    // instantiate client
    let ClientSetup { mut client, keystore } = setup_client(&config).await?;
    let sync_summary = client.sync_state().await?;
    info!(block = %sync_summary.block_num, "latest block");

    let deployer = deployer_signer(&mut client, keystore, &config).await?;
    let packages = NoteNookPackages::build(&config)?;
    let contract = NoteNook::deploy(&mut client, &packages, &deployer).await?;

    println!("Contract Deployer: {}", deployer.id().to_hex());
    println!("Contract address: {}", contract.address().to_hex());
    Ok(())
}
