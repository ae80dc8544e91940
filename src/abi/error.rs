//! ABI error types

use thiserror::Error;

/// Errors raised while loading an artifact or encoding/decoding ABI data
#[derive(Error, Debug)]
pub enum AbiError {
    /// Type string in the ABI is not one this codec handles
    #[error("Unsupported ABI type: {0}")]
    UnsupportedType(String),

    /// Function is not part of the contract ABI
    #[error("Function not found in ABI: {0}")]
    FunctionNotFound(String),

    /// Event is not part of the contract ABI
    #[error("Event not found in ABI: {0}")]
    EventNotFound(String),

    /// Wrong number of arguments for a function or event
    #[error("Expected {expected} values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },

    /// Value does not match the declared parameter type
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Integer does not fit the declared bit width
    #[error("Value out of range for {0}")]
    OutOfRange(String),

    /// Encoded data is truncated or has inconsistent offsets
    #[error("Malformed ABI data: {0}")]
    Malformed(String),

    /// Hex string could not be decoded
    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Address string is not `0x` followed by 40 hex digits
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Contract artifact could not be read
    #[error("Failed to read artifact {path:?}: {error}")]
    ArtifactIo {
        path: std::path::PathBuf,
        error: String,
    },

    /// Contract artifact is not valid JSON or has the wrong shape
    #[error("Failed to parse artifact: {0}")]
    ArtifactParse(#[from] serde_json::Error),
}

/// Result type alias for ABI operations
pub type AbiResult<T> = Result<T, AbiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AbiError::FunctionNotFound("addEmployee".to_string());
        assert_eq!(err.to_string(), "Function not found in ABI: addEmployee");

        let err = AbiError::ArityMismatch {
            expected: 5,
            actual: 4,
        };
        assert_eq!(err.to_string(), "Expected 5 values, got 4");
    }
}
