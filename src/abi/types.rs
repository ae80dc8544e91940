//! Core ABI types
//!
//! Defines addresses, parameter types and the values that flow through the codec.

use super::error::{AbiError, AbiResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A 20-byte account or contract address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The zero address
    pub const ZERO: Address = Address([0u8; 20]);

    /// Build an address whose low 8 bytes hold `value`
    pub fn from_low_u64(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Address(bytes)
    }

    /// Check whether this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AbiError::InvalidAddress(s.to_string()))?;

        if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AbiError::InvalidAddress(s.to_string()));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Solidity parameter types understood by the codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Address,
    Bool,
    /// Unsigned integer with bit width
    Uint(usize),
    /// Signed integer with bit width
    Int(usize),
    String,
    Bytes,
    /// `bytesN`, N in 1..=32
    FixedBytes(usize),
    /// Dynamic array `T[]`
    Array(Box<ParamType>),
}

impl ParamType {
    /// Parse a canonical ABI type string such as `uint256` or `uint8[]`
    pub fn parse(s: &str) -> AbiResult<Self> {
        if let Some(inner) = s.strip_suffix("[]") {
            return Ok(ParamType::Array(Box::new(ParamType::parse(inner)?)));
        }

        match s {
            "address" => return Ok(ParamType::Address),
            "bool" => return Ok(ParamType::Bool),
            "string" => return Ok(ParamType::String),
            "bytes" => return Ok(ParamType::Bytes),
            "uint" => return Ok(ParamType::Uint(256)),
            "int" => return Ok(ParamType::Int(256)),
            _ => {}
        }

        if let Some(bits) = s.strip_prefix("uint") {
            return parse_bits(s, bits).map(ParamType::Uint);
        }
        if let Some(bits) = s.strip_prefix("int") {
            return parse_bits(s, bits).map(ParamType::Int);
        }
        if let Some(len) = s.strip_prefix("bytes") {
            let len: usize = len
                .parse()
                .map_err(|_| AbiError::UnsupportedType(s.to_string()))?;
            if (1..=32).contains(&len) {
                return Ok(ParamType::FixedBytes(len));
            }
        }

        Err(AbiError::UnsupportedType(s.to_string()))
    }

    /// Whether values of this type live in the tail section of an encoding
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            ParamType::String | ParamType::Bytes | ParamType::Array(_)
        )
    }
}

fn parse_bits(original: &str, bits: &str) -> AbiResult<usize> {
    let bits: usize = bits
        .parse()
        .map_err(|_| AbiError::UnsupportedType(original.to_string()))?;
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(AbiError::UnsupportedType(original.to_string()));
    }
    Ok(bits)
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Address => write!(f, "address"),
            ParamType::Bool => write!(f, "bool"),
            ParamType::Uint(bits) => write!(f, "uint{}", bits),
            ParamType::Int(bits) => write!(f, "int{}", bits),
            ParamType::String => write!(f, "string"),
            ParamType::Bytes => write!(f, "bytes"),
            ParamType::FixedBytes(len) => write!(f, "bytes{}", len),
            ParamType::Array(inner) => write!(f, "{}[]", inner),
        }
    }
}

/// A decoded or to-be-encoded ABI value
///
/// Integers are held in 128 bits. Decoding a word that needs more fails with
/// [`AbiError::OutOfRange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Address(Address),
    Bool(bool),
    Uint(u128),
    Int(i128),
    String(String),
    Bytes(Vec<u8>),
    FixedBytes(Vec<u8>),
    Array(Vec<AbiValue>),
}

impl AbiValue {
    /// Short name of the variant, used in mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            AbiValue::Address(_) => "address",
            AbiValue::Bool(_) => "bool",
            AbiValue::Uint(_) => "uint",
            AbiValue::Int(_) => "int",
            AbiValue::String(_) => "string",
            AbiValue::Bytes(_) => "bytes",
            AbiValue::FixedBytes(_) => "fixed bytes",
            AbiValue::Array(_) => "array",
        }
    }

    pub fn as_uint(&self) -> AbiResult<u128> {
        match self {
            AbiValue::Uint(v) => Ok(*v),
            other => Err(mismatch("uint", other)),
        }
    }

    /// Unsigned value narrowed to `u64`
    pub fn as_u64(&self) -> AbiResult<u64> {
        let value = self.as_uint()?;
        u64::try_from(value).map_err(|_| AbiError::OutOfRange("u64".to_string()))
    }

    pub fn as_str(&self) -> AbiResult<&str> {
        match self {
            AbiValue::String(s) => Ok(s),
            other => Err(mismatch("string", other)),
        }
    }

    pub fn as_address(&self) -> AbiResult<Address> {
        match self {
            AbiValue::Address(a) => Ok(*a),
            other => Err(mismatch("address", other)),
        }
    }

    pub fn as_array(&self) -> AbiResult<&[AbiValue]> {
        match self {
            AbiValue::Array(items) => Ok(items),
            other => Err(mismatch("array", other)),
        }
    }
}

fn mismatch(expected: &str, actual: &AbiValue) -> AbiError {
    AbiError::TypeMismatch {
        expected: expected.to_string(),
        actual: actual.kind().to_string(),
    }
}
