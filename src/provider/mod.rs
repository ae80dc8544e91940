//! Wallet Provider
//!
//! The provider is the node or wallet that owns accounts and signs
//! transactions. The client only needs a narrow slice of it:
//! - Account enumeration
//! - Network identification
//! - Read-only calls
//! - Sending a transaction and waiting for its receipt

mod error;
mod rpc;

pub use error::{ProviderError, ProviderResult};
pub use rpc::{JsonRpcProvider, RpcConfig};

use crate::abi::{Address, WORD};
use async_trait::async_trait;

/// Common trait for all providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Accounts the provider can sign for
    async fn accounts(&self) -> ProviderResult<Vec<Address>>;

    /// Network identifier (the key used in artifact `networks` maps)
    async fn network_id(&self) -> ProviderResult<String>;

    /// Execute a read-only call and return the raw return data
    async fn call(&self, request: &CallRequest) -> ProviderResult<Vec<u8>>;

    /// Submit a transaction and wait until it is mined
    async fn send_transaction(&self, request: &CallRequest) -> ProviderResult<TransactionReceipt>;
}

/// Target and payload of a call or transaction
#[derive(Debug, Clone)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub data: Vec<u8>,
}

/// Mined transaction
#[derive(Debug, Clone)]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    pub block_number: Option<u64>,
    /// `false` when the transaction reverted
    pub success: bool,
    pub logs: Vec<Log>,
}

/// Event log emitted during a transaction
#[derive(Debug, Clone)]
pub struct Log {
    pub address: Address,
    pub topics: Vec<[u8; WORD]>,
    pub data: Vec<u8>,
}
