//! Provider error types

use thiserror::Error;

/// Errors that can occur when talking to the provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider unavailable at {0}")]
    Unavailable(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Error object returned by the node; the message is shown as-is
    #[error("{message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Transaction {0} was not mined in time")]
    ReceiptTimeout(String),

    /// Mined transaction reverted and no reason could be recovered
    #[error("Transaction {0} reverted")]
    Reverted(String),

    /// Mined transaction reverted; `reason` is the contract's own message
    #[error("{reason}")]
    RevertedWithReason {
        transaction_hash: String,
        reason: String,
    },
}

/// Result type alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

impl From<crate::abi::AbiError> for ProviderError {
    fn from(err: crate::abi::AbiError) -> Self {
        ProviderError::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_shows_raw_message() {
        let err = ProviderError::Rpc {
            code: -32000,
            message: "VM Exception while processing transaction: revert Employee already exists"
                .to_string(),
        };
        assert_eq!(
            err.to_string(),
            "VM Exception while processing transaction: revert Employee already exists"
        );
    }

    #[test]
    fn test_revert_reason_shown_alone() {
        let err = ProviderError::RevertedWithReason {
            transaction_hash: "0xfeed".to_string(),
            reason: "Invalid employee address".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid employee address");
        assert_eq!(ProviderError::Reverted("0xfeed".into()).to_string(), "Transaction 0xfeed reverted");
    }
}
