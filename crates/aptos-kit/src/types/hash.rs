//! SHA3-256 hash value.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};

use crate::error::ParseHexError;

/// A 32-byte SHA3-256 digest, used for transaction hashes and domain-separation salts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HashValue([u8; 32]);

impl HashValue {
    /// The zero hash (32 zero bytes).
    pub const ZERO: Self = Self([0; 32]);

    /// Hash the given data with SHA3-256.
    pub fn sha3_256(data: &[u8]) -> Self {
        Self::sha3_256_of(&[data])
    }

    /// Hash the concatenation of several byte strings with SHA3-256.
    pub fn sha3_256_of(parts: &[&[u8]]) -> Self {
        let mut hasher = Sha3_256::new();
        for part in parts {
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    /// Create from raw 32 bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw 32 bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a Vec<u8>.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Check if this is the zero hash.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl FromStr for HashValue {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = super::hex::decode(s)?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| ParseHexError::InvalidLength(s.to_string()))?;
        Ok(Self(arr))
    }
}

impl From<[u8; 32]> for HashValue {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for HashValue {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue({})", self)
    }
}

impl Serialize for HashValue {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.serialize_str(&self.to_string())
        } else {
            self.0.serialize(s)
        }
    }
}

impl<'de> Deserialize<'de> for HashValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        if d.is_human_readable() {
            let s: String = Deserialize::deserialize(d)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            <[u8; 32]>::deserialize(d).map(Self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha3_256_empty() {
        assert_eq!(
            HashValue::sha3_256(b"").to_string(),
            "0xa7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_sha3_256_of_concatenates() {
        assert_eq!(
            HashValue::sha3_256_of(&[b"hello ", b"world"]),
            HashValue::sha3_256(b"hello world")
        );
    }

    #[test]
    fn test_display_parse_roundtrip() {
        let hash = HashValue::sha3_256(b"test data");
        let parsed: HashValue = hash.to_string().parse().unwrap();
        assert_eq!(hash, parsed);
    }

    #[test]
    fn test_zero() {
        assert!(HashValue::ZERO.is_zero());
        assert!(!HashValue::sha3_256(b"x").is_zero());
    }
}
