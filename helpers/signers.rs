//! Signer acquisition: basic wallets whose keys live in the local keystore

use std::sync::Arc;

use miden_client::{account::Account, keystore::FilesystemKeyStore};
use rand::rngs::StdRng;
use tracing::info;

use crate::{
    create_basic_wallet_account, AccountCreationConfig, NookClient, NookConfig, NookError,
    Result,
};

/// Create `count` fresh wallet accounts, in order.
pub async fn get_signers(
    client: &mut NookClient,
    keystore: Arc<FilesystemKeyStore<StdRng>>,
    count: usize,
) -> Result<Vec<Account>> {
    let mut signers = Vec::with_capacity(count);
    for _ in 0..count {
        let wallet =
            create_basic_wallet_account(client, keystore.clone(), AccountCreationConfig::default())
                .await?;
        signers.push(wallet);
    }
    Ok(signers)
}

/// The account to deploy from.
///
/// Uses `config.deployer` when set, which must already be tracked by the local
/// store; otherwise creates a fresh wallet.
pub async fn deployer_signer(
    client: &mut NookClient,
    keystore: Arc<FilesystemKeyStore<StdRng>>,
    config: &NookConfig,
) -> Result<Account> {
    match config.deployer {
        Some(id) => {
            let record = client.get_account(id).await?.ok_or(NookError::AccountNotFound(id))?;
            info!(deployer = %id, "using configured deployer");
            Ok(record.account().clone())
        }
        None => {
            let mut signers = get_signers(client, keystore, 1).await?;
            let deployer = signers.remove(0);
            info!(deployer = %deployer.id(), "created deployer wallet");
            Ok(deployer)
        }
    }
}
