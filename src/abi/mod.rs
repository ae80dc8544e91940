//! Contract ABI
//!
//! Everything needed to talk to a deployed contract without code generation:
//! - Artifact loading (ABI + deployment addresses)
//! - Function selectors and event topics (Keccak-256)
//! - Head/tail ABI encoding and decoding

mod artifact;
mod codec;
mod error;
mod types;

pub use artifact::{Abi, ContractArtifact, Event, EventParam, Function, Param};
pub use codec::{decode, decode_word, encode, WORD};
pub use error::{AbiError, AbiResult};
pub use types::{Address, AbiValue, ParamType};

use sha3::{Digest, Keccak256};

/// Keccak-256 hash (the pre-standard SHA-3 variant used by Ethereum)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// `0x`-prefixed lowercase hex
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse `0x`-prefixed hex data; `0x` alone is empty data
pub fn from_hex(s: &str) -> AbiResult<Vec<u8>> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(digits)?)
}

/// Parse a `0x`-prefixed 32-byte word (event topics, hashes)
pub fn word_from_hex(s: &str) -> AbiResult<[u8; WORD]> {
    let bytes = from_hex(s)?;
    <[u8; WORD]>::try_from(bytes.as_slice())
        .map_err(|_| AbiError::Malformed(format!("expected 32-byte word, got {}", s)))
}
