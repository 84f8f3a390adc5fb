use std::fmt;
use std::str::FromStr;

use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512_256};

use crate::error::AbiError;

pub const KEY_LENGTH: usize = 32;
const CHECKSUM_LENGTH: usize = 4;
/// base32 length of key || checksum (36 bytes, unpadded)
pub const ADDRESS_LENGTH: usize = 58;

const BASE32_ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

/// SHA-512/256 over the concatenation of `parts`.
pub fn sha512_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha512_256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// RFC 4648 base32 without padding.
pub fn base32_encode(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() * 8 + 4) / 5);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    for &byte in data {
        buffer = (buffer << 8) | byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(BASE32_ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
        buffer &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(BASE32_ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }
    out
}

/// Inverse of [`base32_encode`]. Leftover bits must be zero.
pub fn base32_decode(text: &str) -> Result<Vec<u8>, AbiError> {
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;
    for ch in text.bytes() {
        let value = BASE32_ALPHABET
            .iter()
            .position(|&c| c == ch)
            .ok_or_else(|| AbiError::InvalidAddress {
                reason: format!("character {:?} is not base32", ch as char),
            })? as u32;
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            out.push((buffer >> bits) as u8);
            buffer &= (1 << bits) - 1;
        }
    }
    if buffer != 0 {
        return Err(AbiError::InvalidAddress {
            reason: "non-zero padding bits".to_string(),
        });
    }
    Ok(out)
}

/// A 32-byte account key. Box names of exactly this length are read as keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PublicKey(pub [u8; KEY_LENGTH]);

impl PublicKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AbiError> {
        let key: [u8; KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| AbiError::InvalidKeyLength {
                length: bytes.len(),
            })?;
        Ok(PublicKey(key))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.0
    }

    fn checksum(&self) -> [u8; CHECKSUM_LENGTH] {
        let digest = sha512_256(&[&self.0]);
        let mut checksum = [0u8; CHECKSUM_LENGTH];
        checksum.copy_from_slice(&digest[KEY_LENGTH - CHECKSUM_LENGTH..]);
        checksum
    }

    /// Checksummed address: base32(key || last 4 bytes of sha512_256(key)).
    pub fn to_address(&self) -> String {
        let mut raw = Vec::with_capacity(KEY_LENGTH + CHECKSUM_LENGTH);
        raw.extend_from_slice(&self.0);
        raw.extend_from_slice(&self.checksum());
        base32_encode(&raw)
    }

    pub fn from_address(address: &str) -> Result<Self, AbiError> {
        if address.len() != ADDRESS_LENGTH {
            return Err(AbiError::InvalidAddress {
                reason: format!("length {} (expected {})", address.len(), ADDRESS_LENGTH),
            });
        }
        let raw = base32_decode(address)?;
        if raw.len() != KEY_LENGTH + CHECKSUM_LENGTH {
            return Err(AbiError::InvalidAddress {
                reason: format!("decoded to {} bytes", raw.len()),
            });
        }
        let key = PublicKey::from_slice(&raw[..KEY_LENGTH])?;
        if raw[KEY_LENGTH..] != key.checksum() {
            return Err(AbiError::InvalidAddress {
                reason: "checksum mismatch".to_string(),
            });
        }
        Ok(key)
    }
}

/// Account controlled by an application: sha512_256("appID" || app_id).
pub fn application_address(app_id: u64) -> PublicKey {
    PublicKey(sha512_256(&[b"appID", &app_id.to_be_bytes()]))
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_address())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_address())
    }
}

impl FromStr for PublicKey {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PublicKey::from_address(s)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_address())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AddressVisitor;

        impl<'de> de::Visitor<'de> for AddressVisitor {
            type Value = PublicKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a checksummed base32 address")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<PublicKey, E> {
                PublicKey::from_address(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(AddressVisitor)
    }
}

impl JsonSchema for PublicKey {
    fn schema_name() -> String {
        "PublicKey".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_ADDRESS: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ";

    #[test]
    fn zero_key_renders_known_address() {
        assert_eq!(PublicKey([0u8; 32]).to_address(), ZERO_ADDRESS);
    }

    #[test]
    fn address_parses_back_to_key() {
        let key = PublicKey([7u8; 32]);
        let address = key.to_address();
        assert_eq!(address.len(), ADDRESS_LENGTH);
        assert_eq!(PublicKey::from_address(&address).unwrap(), key);
        assert_eq!(address.parse::<PublicKey>().unwrap(), key);
    }

    #[test]
    fn address_rendering_is_deterministic() {
        let mut bytes = [0u8; 32];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8 * 3;
        }
        let key = PublicKey(bytes);
        assert_eq!(key.to_address(), key.to_address());
        assert_eq!(key.to_string(), key.to_address());
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let mut address = PublicKey([9u8; 32]).to_address();
        let last = address.pop().unwrap();
        address.push(if last == 'A' { 'B' } else { 'A' });
        assert!(matches!(
            PublicKey::from_address(&address),
            Err(AbiError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn wrong_key_length_is_rejected() {
        assert_eq!(
            PublicKey::from_slice(&[1u8; 31]),
            Err(AbiError::InvalidKeyLength { length: 31 })
        );
    }

    #[test]
    fn base32_matches_rfc4648_vectors() {
        assert_eq!(base32_encode(b"f"), "MY");
        assert_eq!(base32_encode(b"fo"), "MZXQ");
        assert_eq!(base32_encode(b"foobar"), "MZXW6YTBOI");
        assert_eq!(base32_decode("MZXW6YTBOI").unwrap(), b"foobar".to_vec());
    }

    #[test]
    fn application_addresses_differ_per_app() {
        assert_ne!(application_address(1), application_address(2));
        assert_eq!(application_address(42), application_address(42));
    }
}
