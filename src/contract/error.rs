//! Contract error types

use crate::abi::AbiError;
use crate::provider::ProviderError;
use thiserror::Error;

/// Errors returned by attendance contract calls
#[derive(Error, Debug)]
pub enum ContractError {
    /// The contract rejected the call; the message is the contract's own text
    #[error("{0}")]
    Rejected(String),

    /// Provider-level failure (transport, node error, revert)
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("ABI error: {0}")]
    Abi(#[from] AbiError),

    /// Transaction was mined but did not emit the expected event
    #[error("Event {0} not found in transaction receipt")]
    MissingEvent(String),

    #[error("Unexpected contract output: {0}")]
    UnexpectedOutput(String),

    /// Artifact marks a read as state-changing or a write as read-only
    #[error("Artifact declares {0} with unexpected state mutability")]
    Mutability(String),
}

/// Result type alias for contract operations
pub type ContractResult<T> = Result<T, ContractError>;
