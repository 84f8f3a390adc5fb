use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AbiError {
    #[error("unknown abi type: {0}")]
    UnknownType(String),

    #[error("value of type {found} does not match expected type {expected}")]
    TypeMismatch { expected: String, found: String },

    #[error("unexpected end of input: needed {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("{count} trailing bytes after {ty} value")]
    TrailingBytes { ty: String, count: usize },

    #[error("dynamic offset {offset} does not match expected position {expected}")]
    BadOffset { offset: usize, expected: usize },

    #[error("invalid utf-8 in string value")]
    InvalidUtf8,

    #[error("encoded length {length} exceeds the 65535 byte limit")]
    TooLong { length: usize },

    #[error("invalid key length: {length} bytes (expected 32)")]
    InvalidKeyLength { length: usize },

    #[error("invalid address: {reason}")]
    InvalidAddress { reason: String },
}

impl From<AbiError> for StdError {
    fn from(err: AbiError) -> Self {
        StdError::generic_err(err.to_string())
    }
}
