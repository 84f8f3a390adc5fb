//! Box names and single-value box encodings.
//!
//! Manager boxes: `creator || bounty_id` (40 bytes) holds a bounty config tuple,
//! a 32-byte developer key holds that developer's win count as `uint64`.
//! Escrow boxes: a 32-byte submitter key holds the submission text as `string`.

use crate::abi::{AbiType, AbiValue};
use crate::address::{PublicKey, KEY_LENGTH};
use crate::error::AbiError;

pub const BOUNTY_BOX_NAME_LENGTH: usize = KEY_LENGTH + 8;

pub fn bounty_box_name(creator: &PublicKey, bounty_id: u64) -> Vec<u8> {
    let mut name = Vec::with_capacity(BOUNTY_BOX_NAME_LENGTH);
    name.extend_from_slice(creator.as_bytes());
    name.extend_from_slice(&bounty_id.to_be_bytes());
    name
}

/// Box names of exactly 32 bytes are account keys; everything else is not.
pub fn key_box_name(name: &[u8]) -> Option<PublicKey> {
    if name.len() == KEY_LENGTH {
        PublicKey::from_slice(name).ok()
    } else {
        None
    }
}

pub fn encode_win_count(wins: u64) -> Vec<u8> {
    wins.to_be_bytes().to_vec()
}

pub fn decode_win_count(bytes: &[u8]) -> Result<u64, AbiError> {
    AbiValue::decode(&AbiType::Uint64, bytes)?.as_u64()
}

pub fn encode_submission(description: &str) -> Result<Vec<u8>, AbiError> {
    AbiValue::String(description.to_string()).encode()
}

pub fn decode_submission(bytes: &[u8]) -> Result<String, AbiError> {
    AbiValue::decode(&AbiType::String, bytes)?.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounty_box_names_are_not_key_sized() {
        let name = bounty_box_name(&PublicKey([1u8; 32]), 9);
        assert_eq!(name.len(), BOUNTY_BOX_NAME_LENGTH);
        assert_eq!(key_box_name(&name), None);
        assert_eq!(&name[32..], &9u64.to_be_bytes());
    }

    #[test]
    fn key_sized_names_are_keys() {
        assert_eq!(key_box_name(&[4u8; 32]), Some(PublicKey([4u8; 32])));
        assert_eq!(key_box_name(&[4u8; 33]), None);
    }

    #[test]
    fn win_count_value_is_bare_uint64() {
        assert_eq!(decode_win_count(&encode_win_count(12)).unwrap(), 12);
        assert!(decode_win_count(&[0, 1]).is_err());
    }

    #[test]
    fn submission_value_is_abi_string() {
        let bytes = encode_submission("patched in #41").unwrap();
        assert_eq!(&bytes[..2], &[0, 14]);
        assert_eq!(decode_submission(&bytes).unwrap(), "patched in #41");
    }
}
