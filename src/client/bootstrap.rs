//! Connection Bootstrap
//!
//! Resolves provider accounts, network and contract deployment into a
//! [`ClientContext`]. Runs once; any failure aborts the whole bootstrap.

use super::context::ClientContext;
use super::error::BootstrapError;
use crate::abi::{Address, ContractArtifact};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::contract::{local_accounts, ContractBinding, LocalLedger};
use crate::provider::{JsonRpcProvider, Provider};
use std::sync::Arc;

/// Alert shown when the bootstrap fails
pub const BOOTSTRAP_FAILED: &str =
    "Failed to load web3, accounts, or contract. Check console for details.";

/// Connect to the configured JSON-RPC provider and contract artifact
pub async fn connect(config: &Config) -> Result<ClientContext, BootstrapError> {
    tracing::info!(url = %config.provider.url, "Connecting to provider");

    let provider: Arc<dyn Provider> = Arc::new(JsonRpcProvider::new(config.provider.rpc_config())?);
    let artifact = ContractArtifact::load(&config.contract.artifact_path)?;

    connect_with(provider, artifact, config, Arc::new(SystemClock)).await
}

/// Bootstrap over an existing provider and artifact
pub async fn connect_with(
    provider: Arc<dyn Provider>,
    artifact: ContractArtifact,
    config: &Config,
    clock: Arc<dyn Clock>,
) -> Result<ClientContext, BootstrapError> {
    let accounts = provider.accounts().await?;
    let current_account = select_account(config.provider.account.as_deref(), &accounts)?;

    let network_id = provider.network_id().await?;

    let address = match artifact.address_for(&network_id) {
        Some(address) => address,
        None => match &config.contract.address {
            Some(configured) => configured.parse::<Address>()?,
            None => return Err(BootstrapError::MissingDeployment(network_id)),
        },
    };

    tracing::info!(
        network = %network_id,
        contract = %address,
        account = %current_account,
        accounts = accounts.len(),
        "Connected"
    );

    let contract = ContractBinding::new(provider, artifact.abi, address);

    Ok(ClientContext {
        contract: Arc::new(contract),
        accounts,
        current_account,
        network_id,
        clock,
    })
}

/// Offline context backed by an in-process ledger
pub fn local(config: &Config, clock: Arc<dyn Clock>) -> Result<ClientContext, BootstrapError> {
    let accounts = local_accounts(config.local.accounts);
    let current_account = select_account(config.provider.account.as_deref(), &accounts)?;

    tracing::info!(accounts = accounts.len(), account = %current_account, "Using local ledger");

    Ok(ClientContext {
        contract: Arc::new(LocalLedger::new(Arc::clone(&clock))),
        accounts,
        current_account,
        network_id: config.local.network_id.clone(),
        clock,
    })
}

/// The configured account if set, otherwise the first; it must be one of `accounts`
fn select_account(configured: Option<&str>, accounts: &[Address]) -> Result<Address, BootstrapError> {
    let first = *accounts.first().ok_or(BootstrapError::NoAccounts)?;
    let Some(configured) = configured else {
        return Ok(first);
    };

    match configured.parse::<Address>() {
        Ok(account) if accounts.contains(&account) => Ok(account),
        _ => Err(BootstrapError::InvalidAccount(configured.to_string())),
    }
}
