//! Client error types

use crate::abi::AbiError;
use crate::contract::ContractError;
use crate::provider::ProviderError;
use thiserror::Error;

/// Input rejected before any contract call is made
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("{field}: invalid address {value:?} (expected 0x followed by 40 hex digits)")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: {value:?} is not a whole number")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field}: {value:?} is not a date on or after 1970-01-01 (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Start date {start} is after end date {end}")]
    DateOrder { start: String, end: String },

    #[error("Unknown input field: {0}")]
    UnknownField(String),
}

/// Errors surfaced by dispatchers
#[derive(Error, Debug)]
pub enum ClientError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("No accounts available from the provider")]
    NoAccounts,

    #[error("Contract returned unknown attendance status {0}")]
    UnknownStatus(u8),
}

/// Result type alias for dispatcher operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Failure to establish the client context
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] AbiError),

    #[error("No accounts available from the provider")]
    NoAccounts,

    #[error("Configured account {0} is not an account the provider can sign for")]
    InvalidAccount(String),

    #[error("Contract not deployed on network {0}")]
    MissingDeployment(String),
}
