//! ARC-4 style ABI encoding for the types the bounty boxes use.
//!
//! `uint64` is 8 bytes big-endian, `address` is 32 raw bytes and `string` is a
//! u16 big-endian byte length followed by UTF-8. Tuples lay out a head section
//! (static values inline, 2-byte offsets for dynamic ones) followed by the
//! dynamic tails in declaration order.

use std::fmt;

use crate::address::{sha512_256, PublicKey, KEY_LENGTH};
use crate::error::AbiError;

const OFFSET_LENGTH: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiType {
    Uint64,
    Address,
    String,
    Tuple(Vec<AbiType>),
}

impl AbiType {
    pub fn parse(text: &str) -> Result<Self, AbiError> {
        let text = text.trim();
        match text {
            "uint64" => Ok(AbiType::Uint64),
            "address" => Ok(AbiType::Address),
            "string" => Ok(AbiType::String),
            _ if text.starts_with('(') && text.ends_with(')') => {
                let inner = &text[1..text.len() - 1];
                if inner.trim().is_empty() {
                    return Ok(AbiType::Tuple(vec![]));
                }
                split_top_level(inner)?
                    .into_iter()
                    .map(AbiType::parse)
                    .collect::<Result<Vec<_>, _>>()
                    .map(AbiType::Tuple)
            }
            _ => Err(AbiError::UnknownType(text.to_string())),
        }
    }

    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Uint64 | AbiType::Address => false,
            AbiType::String => true,
            AbiType::Tuple(items) => items.iter().any(AbiType::is_dynamic),
        }
    }

    /// Encoded size of a static type; `None` for dynamic types.
    pub fn static_len(&self) -> Option<usize> {
        match self {
            AbiType::Uint64 => Some(8),
            AbiType::Address => Some(KEY_LENGTH),
            AbiType::String => None,
            AbiType::Tuple(items) => items.iter().map(AbiType::static_len).sum(),
        }
    }

    fn head_len(&self) -> usize {
        self.static_len().unwrap_or(OFFSET_LENGTH)
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbiType::Uint64 => f.write_str("uint64"),
            AbiType::Address => f.write_str("address"),
            AbiType::String => f.write_str("string"),
            AbiType::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Split "a,(b,c),d" at commas that are not nested in parentheses.
fn split_top_level(text: &str) -> Result<Vec<&str>, AbiError> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(AbiError::UnknownType(text.to_string()));
                }
            }
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(AbiError::UnknownType(text.to_string()));
    }
    parts.push(&text[start..]);
    Ok(parts)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiValue {
    Uint64(u64),
    Address(PublicKey),
    String(String),
    Tuple(Vec<AbiValue>),
}

impl AbiValue {
    pub fn abi_type(&self) -> AbiType {
        match self {
            AbiValue::Uint64(_) => AbiType::Uint64,
            AbiValue::Address(_) => AbiType::Address,
            AbiValue::String(_) => AbiType::String,
            AbiValue::Tuple(items) => AbiType::Tuple(items.iter().map(AbiValue::abi_type).collect()),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, AbiError> {
        match self {
            AbiValue::Uint64(n) => Ok(n.to_be_bytes().to_vec()),
            AbiValue::Address(key) => Ok(key.as_bytes().to_vec()),
            AbiValue::String(s) => {
                let length = u16::try_from(s.len()).map_err(|_| AbiError::TooLong {
                    length: s.len(),
                })?;
                let mut out = Vec::with_capacity(OFFSET_LENGTH + s.len());
                out.extend_from_slice(&length.to_be_bytes());
                out.extend_from_slice(s.as_bytes());
                Ok(out)
            }
            AbiValue::Tuple(items) => encode_tuple(items),
        }
    }

    /// Decode `bytes` as exactly one value of type `ty`.
    pub fn decode(ty: &AbiType, bytes: &[u8]) -> Result<Self, AbiError> {
        match ty {
            AbiType::Uint64 => {
                let raw: [u8; 8] = exact(ty, bytes, 8)?
                    .try_into()
                    .map_err(|_| AbiError::Truncated {
                        needed: 8,
                        available: bytes.len(),
                    })?;
                Ok(AbiValue::Uint64(u64::from_be_bytes(raw)))
            }
            AbiType::Address => Ok(AbiValue::Address(PublicKey::from_slice(exact(
                ty, bytes, KEY_LENGTH,
            )?)?)),
            AbiType::String => {
                let length = read_u16(bytes, 0)? as usize;
                let body = exact(ty, &bytes[OFFSET_LENGTH..], length)?;
                let text = std::str::from_utf8(body).map_err(|_| AbiError::InvalidUtf8)?;
                Ok(AbiValue::String(text.to_string()))
            }
            AbiType::Tuple(types) => decode_tuple(types, bytes),
        }
    }

    pub fn as_u64(&self) -> Result<u64, AbiError> {
        match self {
            AbiValue::Uint64(n) => Ok(*n),
            other => Err(mismatch(&AbiType::Uint64, other)),
        }
    }

    pub fn as_address(&self) -> Result<PublicKey, AbiError> {
        match self {
            AbiValue::Address(key) => Ok(*key),
            other => Err(mismatch(&AbiType::Address, other)),
        }
    }

    pub fn into_string(self) -> Result<String, AbiError> {
        match self {
            AbiValue::String(s) => Ok(s),
            other => Err(mismatch(&AbiType::String, &other)),
        }
    }

    pub fn into_tuple(self) -> Result<Vec<AbiValue>, AbiError> {
        match self {
            AbiValue::Tuple(items) => Ok(items),
            other => Err(AbiError::TypeMismatch {
                expected: "tuple".to_string(),
                found: other.abi_type().to_string(),
            }),
        }
    }
}

fn mismatch(expected: &AbiType, found: &AbiValue) -> AbiError {
    AbiError::TypeMismatch {
        expected: expected.to_string(),
        found: found.abi_type().to_string(),
    }
}

fn exact<'a>(ty: &AbiType, bytes: &'a [u8], len: usize) -> Result<&'a [u8], AbiError> {
    if bytes.len() < len {
        return Err(AbiError::Truncated {
            needed: len,
            available: bytes.len(),
        });
    }
    if bytes.len() > len {
        return Err(AbiError::TrailingBytes {
            ty: ty.to_string(),
            count: bytes.len() - len,
        });
    }
    Ok(bytes)
}

fn read_u16(bytes: &[u8], at: usize) -> Result<u16, AbiError> {
    match bytes.get(at..at + OFFSET_LENGTH) {
        Some(raw) => Ok(u16::from_be_bytes([raw[0], raw[1]])),
        None => Err(AbiError::Truncated {
            needed: at + OFFSET_LENGTH,
            available: bytes.len(),
        }),
    }
}

fn encode_tuple(items: &[AbiValue]) -> Result<Vec<u8>, AbiError> {
    let types: Vec<AbiType> = items.iter().map(AbiValue::abi_type).collect();
    let head_len: usize = types.iter().map(AbiType::head_len).sum();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (item, ty) in items.iter().zip(&types) {
        if ty.is_dynamic() {
            let offset = head_len + tail.len();
            let offset = u16::try_from(offset).map_err(|_| AbiError::TooLong { length: offset })?;
            head.extend_from_slice(&offset.to_be_bytes());
            tail.extend(item.encode()?);
        } else {
            head.extend(item.encode()?);
        }
    }

    let total = head.len() + tail.len();
    if total > u16::MAX as usize && types.iter().any(AbiType::is_dynamic) {
        return Err(AbiError::TooLong { length: total });
    }
    head.extend(tail);
    Ok(head)
}

fn decode_tuple(types: &[AbiType], bytes: &[u8]) -> Result<AbiValue, AbiError> {
    let mut values: Vec<Option<AbiValue>> = vec![None; types.len()];
    let mut dynamic: Vec<(usize, usize)> = Vec::new();
    let mut cursor = 0usize;

    for (i, ty) in types.iter().enumerate() {
        match ty.static_len() {
            Some(len) => {
                let slice = bytes.get(cursor..cursor + len).ok_or(AbiError::Truncated {
                    needed: cursor + len,
                    available: bytes.len(),
                })?;
                values[i] = Some(AbiValue::decode(ty, slice)?);
                cursor += len;
            }
            None => {
                dynamic.push((i, read_u16(bytes, cursor)? as usize));
                cursor += OFFSET_LENGTH;
            }
        }
    }

    if dynamic.is_empty() && cursor != bytes.len() {
        return Err(AbiError::TrailingBytes {
            ty: AbiType::Tuple(types.to_vec()).to_string(),
            count: bytes.len() - cursor,
        });
    }

    // Tails must start right after the heads and follow each other without gaps;
    // each tail runs up to the next offset, the last one to the end of input.
    let mut expected = cursor;
    for (k, &(i, offset)) in dynamic.iter().enumerate() {
        if offset != expected {
            return Err(AbiError::BadOffset { offset, expected });
        }
        let end = dynamic.get(k + 1).map(|&(_, o)| o).unwrap_or(bytes.len());
        if end < offset || end > bytes.len() {
            return Err(AbiError::BadOffset {
                offset: end,
                expected: offset,
            });
        }
        values[i] = Some(AbiValue::decode(&types[i], &bytes[offset..end])?);
        expected = end;
    }

    values
        .into_iter()
        .map(|v| {
            v.ok_or(AbiError::Truncated {
                needed: cursor,
                available: bytes.len(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(AbiValue::Tuple)
}

/// An ABI method description, e.g. `set_winner(address)void`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Method {
    pub name: String,
    pub args: Vec<AbiType>,
    /// `None` renders as `void`.
    pub returns: Option<AbiType>,
}

impl Method {
    pub fn new(name: impl Into<String>, args: Vec<AbiType>, returns: Option<AbiType>) -> Self {
        Method {
            name: name.into(),
            args,
            returns,
        }
    }

    pub fn parse(signature: &str) -> Result<Self, AbiError> {
        let open = signature
            .find('(')
            .ok_or_else(|| AbiError::UnknownType(signature.to_string()))?;
        let close = matching_paren(signature, open)
            .ok_or_else(|| AbiError::UnknownType(signature.to_string()))?;
        let args = match AbiType::parse(&signature[open..=close])? {
            AbiType::Tuple(args) => args,
            other => return Err(AbiError::UnknownType(other.to_string())),
        };
        let returns = match &signature[close + 1..] {
            "void" => None,
            ret => Some(AbiType::parse(ret)?),
        };
        Ok(Method::new(&signature[..open], args, returns))
    }

    pub fn signature(&self) -> String {
        let args = AbiType::Tuple(self.args.clone()).to_string();
        let returns = self
            .returns
            .as_ref()
            .map(AbiType::to_string)
            .unwrap_or_else(|| "void".to_string());
        format!("{}{}{}", self.name, args, returns)
    }

    /// First four bytes of sha512_256 over the signature.
    pub fn selector(&self) -> [u8; 4] {
        let digest = sha512_256(&[self.signature().as_bytes()]);
        [digest[0], digest[1], digest[2], digest[3]]
    }
}

fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, ch) in text[open..].char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}
