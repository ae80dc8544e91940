//! Solidity ABI encoding and decoding
//!
//! Head/tail layout: static values occupy one 32-byte head word each, dynamic
//! values store an offset in the head and their payload in the tail.

use super::error::{AbiError, AbiResult};
use super::types::{Address, AbiValue, ParamType};

/// Size of one ABI word in bytes
pub const WORD: usize = 32;

/// Encode `values` according to `types`
pub fn encode(types: &[ParamType], values: &[AbiValue]) -> AbiResult<Vec<u8>> {
    if types.len() != values.len() {
        return Err(AbiError::ArityMismatch {
            expected: types.len(),
            actual: values.len(),
        });
    }

    let head_len = WORD * types.len();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for (ty, value) in types.iter().zip(values) {
        if ty.is_dynamic() {
            head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
            tail.extend(encode_dynamic(ty, value)?);
        } else {
            head.extend_from_slice(&encode_static(ty, value)?);
        }
    }

    head.extend(tail);
    Ok(head)
}

/// Decode `data` as a sequence of `types`
pub fn decode(types: &[ParamType], data: &[u8]) -> AbiResult<Vec<AbiValue>> {
    let mut values = Vec::with_capacity(types.len());

    for (i, ty) in types.iter().enumerate() {
        let word = read_word(data, i * WORD)?;
        if ty.is_dynamic() {
            let offset = word_to_usize(&word)?;
            values.push(decode_dynamic(ty, data, offset)?);
        } else {
            values.push(decode_word(ty, &word)?);
        }
    }

    Ok(values)
}

/// Decode a single static value from one word (also used for indexed event topics)
pub fn decode_word(ty: &ParamType, word: &[u8; WORD]) -> AbiResult<AbiValue> {
    match ty {
        ParamType::Address => {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(&word[12..]);
            Ok(AbiValue::Address(Address(bytes)))
        }
        ParamType::Bool => {
            if word[..31].iter().any(|b| *b != 0) || word[31] > 1 {
                return Err(AbiError::Malformed("invalid bool word".to_string()));
            }
            Ok(AbiValue::Bool(word[31] == 1))
        }
        ParamType::Uint(_) => {
            if word[..16].iter().any(|b| *b != 0) {
                return Err(AbiError::OutOfRange(ty.to_string()));
            }
            Ok(AbiValue::Uint(u128::from_be_bytes(low_half(word))))
        }
        ParamType::Int(_) => {
            let low = low_half(word);
            let negative = low[0] & 0x80 != 0;
            let fill = if negative { 0xff } else { 0x00 };
            if word[..16].iter().any(|b| *b != fill) {
                return Err(AbiError::OutOfRange(ty.to_string()));
            }
            Ok(AbiValue::Int(i128::from_be_bytes(low)))
        }
        ParamType::FixedBytes(len) => Ok(AbiValue::FixedBytes(word[..*len].to_vec())),
        dynamic => Err(AbiError::Malformed(format!(
            "{} cannot be decoded from a single word",
            dynamic
        ))),
    }
}

fn encode_static(ty: &ParamType, value: &AbiValue) -> AbiResult<[u8; WORD]> {
    match (ty, value) {
        (ParamType::Address, AbiValue::Address(addr)) => {
            let mut word = [0u8; WORD];
            word[12..].copy_from_slice(addr.as_bytes());
            Ok(word)
        }
        (ParamType::Bool, AbiValue::Bool(b)) => Ok(uint_word(*b as u128)),
        (ParamType::Uint(bits), AbiValue::Uint(v)) => {
            if *bits < 128 && (*v >> bits) != 0 {
                return Err(AbiError::OutOfRange(ty.to_string()));
            }
            Ok(uint_word(*v))
        }
        (ParamType::Int(bits), AbiValue::Int(v)) => {
            if *bits < 128 {
                let max = (1i128 << (bits - 1)) - 1;
                let min = -(1i128 << (bits - 1));
                if *v > max || *v < min {
                    return Err(AbiError::OutOfRange(ty.to_string()));
                }
            }
            let mut word = if *v < 0 { [0xffu8; WORD] } else { [0u8; WORD] };
            word[16..].copy_from_slice(&v.to_be_bytes());
            Ok(word)
        }
        (ParamType::FixedBytes(len), AbiValue::FixedBytes(bytes)) => {
            if bytes.len() != *len {
                return Err(AbiError::TypeMismatch {
                    expected: ty.to_string(),
                    actual: format!("bytes{}", bytes.len()),
                });
            }
            let mut word = [0u8; WORD];
            word[..*len].copy_from_slice(bytes);
            Ok(word)
        }
        (ty, value) => Err(AbiError::TypeMismatch {
            expected: ty.to_string(),
            actual: value.kind().to_string(),
        }),
    }
}

fn encode_dynamic(ty: &ParamType, value: &AbiValue) -> AbiResult<Vec<u8>> {
    match (ty, value) {
        (ParamType::String, AbiValue::String(s)) => Ok(encode_packed_bytes(s.as_bytes())),
        (ParamType::Bytes, AbiValue::Bytes(b)) => Ok(encode_packed_bytes(b)),
        (ParamType::Array(inner), AbiValue::Array(items)) => {
            let types = vec![(**inner).clone(); items.len()];
            let mut out = uint_word(items.len() as u128).to_vec();
            out.extend(encode(&types, items)?);
            Ok(out)
        }
        (ty, value) => Err(AbiError::TypeMismatch {
            expected: ty.to_string(),
            actual: value.kind().to_string(),
        }),
    }
}

fn decode_dynamic(ty: &ParamType, data: &[u8], offset: usize) -> AbiResult<AbiValue> {
    let len = word_to_usize(&read_word(data, offset)?)?;
    let start = offset + WORD;

    match ty {
        ParamType::String | ParamType::Bytes => {
            let bytes = data
                .get(start..start.saturating_add(len))
                .ok_or_else(|| AbiError::Malformed(format!("{} payload truncated", ty)))?;
            if *ty == ParamType::String {
                let s = String::from_utf8(bytes.to_vec())
                    .map_err(|e| AbiError::Malformed(e.to_string()))?;
                Ok(AbiValue::String(s))
            } else {
                Ok(AbiValue::Bytes(bytes.to_vec()))
            }
        }
        ParamType::Array(inner) => {
            let body = data
                .get(start..)
                .ok_or_else(|| AbiError::Malformed("array body truncated".to_string()))?;
            if len.saturating_mul(WORD) > body.len() {
                return Err(AbiError::Malformed(format!(
                    "array length {} exceeds payload",
                    len
                )));
            }
            let types = vec![(**inner).clone(); len];
            Ok(AbiValue::Array(decode(&types, body)?))
        }
        other => Err(AbiError::Malformed(format!("{} is not dynamic", other))),
    }
}

/// Length word followed by right-padded payload
fn encode_packed_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = uint_word(bytes.len() as u128).to_vec();
    out.extend_from_slice(bytes);
    let padding = (WORD - bytes.len() % WORD) % WORD;
    out.extend(std::iter::repeat(0u8).take(padding));
    out
}

fn uint_word(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

fn low_half(word: &[u8; WORD]) -> [u8; 16] {
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    low
}

fn read_word(data: &[u8], offset: usize) -> AbiResult<[u8; WORD]> {
    let slice = data
        .get(offset..offset.saturating_add(WORD))
        .ok_or_else(|| {
            AbiError::Malformed(format!(
                "expected word at offset {}, data is {} bytes",
                offset,
                data.len()
            ))
        })?;
    let mut word = [0u8; WORD];
    word.copy_from_slice(slice);
    Ok(word)
}

fn word_to_usize(word: &[u8; WORD]) -> AbiResult<usize> {
    if word[..24].iter().any(|b| *b != 0) {
        return Err(AbiError::Malformed("offset or length too large".to_string()));
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(low))
        .map_err(|_| AbiError::Malformed("offset or length too large".to_string()))
}
