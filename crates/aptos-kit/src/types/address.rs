//! Account address type.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseAddressError;

/// A 32-byte account address.
///
/// Addresses whose first 31 bytes are zero and whose last byte is below `0x10`
/// are *special* (framework) addresses. They render in short form (`0x1`);
/// every other address renders as the full 64-character form.
///
/// # Parsing
///
/// - [`FromStr`] / [`from_str_relaxed`](Self::from_str_relaxed) accepts an
///   optional `0x` prefix and 1 to 64 hex characters, left-padding with zeroes.
/// - [`from_str_strict`](Self::from_str_strict) requires the `0x` prefix and the
///   long form, except that special addresses may (and then must) use exactly
///   one hex character.
///
/// # Examples
///
/// ```
/// use aptos_kit::AccountAddress;
///
/// let one: AccountAddress = "0x1".parse().unwrap();
/// assert!(one.is_special());
/// assert_eq!(one.to_string(), "0x1");
///
/// // Relaxed parsing pads; strict parsing does not.
/// assert!("0x10".parse::<AccountAddress>().is_ok());
/// assert!(AccountAddress::from_str_strict("0x10").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountAddress([u8; AccountAddress::LENGTH]);

impl AccountAddress {
    /// Address length in bytes.
    pub const LENGTH: usize = 32;

    /// Length of the long string form, without prefix.
    pub const LONG_STRING_LENGTH: usize = 64;

    pub const ZERO: Self = Self::special(0x0);
    pub const ONE: Self = Self::special(0x1);
    pub const THREE: Self = Self::special(0x3);
    pub const FOUR: Self = Self::special(0x4);

    const fn special(last: u8) -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        bytes[Self::LENGTH - 1] = last;
        Self(bytes)
    }

    /// Create from raw 32 bytes.
    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice, which must be exactly 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseAddressError> {
        let arr: [u8; Self::LENGTH] = bytes
            .try_into()
            .map_err(|_| ParseAddressError::InvalidLength(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Get the raw 32 bytes.
    pub const fn as_bytes(&self) -> &[u8; Self::LENGTH] {
        &self.0
    }

    /// Convert to a Vec<u8>.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Returns true for `0x0` through `0xf`.
    pub fn is_special(&self) -> bool {
        self.0[..Self::LENGTH - 1].iter().all(|b| *b == 0) && self.0[Self::LENGTH - 1] < 0x10
    }

    /// Parse leniently: optional `0x`, 1 to 64 hex characters, zero-padded on the left.
    pub fn from_str_relaxed(input: &str) -> Result<Self, ParseAddressError> {
        let digits = input.strip_prefix("0x").unwrap_or(input);
        if digits.is_empty() {
            return Err(ParseAddressError::TooShort(input.to_string()));
        }
        if digits.len() > Self::LONG_STRING_LENGTH {
            return Err(ParseAddressError::TooLong(input.to_string()));
        }

        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; Self::LENGTH];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|_| ParseAddressError::InvalidHexChars(input.to_string()))?;
        Ok(Self(bytes))
    }

    /// Parse strictly: `0x` plus 64 hex characters, or `0x` plus one hex
    /// character for special addresses.
    pub fn from_str_strict(input: &str) -> Result<Self, ParseAddressError> {
        let Some(digits) = input.strip_prefix("0x") else {
            return Err(ParseAddressError::LeadingZeroXRequired(input.to_string()));
        };

        let address = Self::from_str_relaxed(input)?;
        if digits.len() != Self::LONG_STRING_LENGTH {
            if !address.is_special() {
                return Err(ParseAddressError::LongFormRequiredUnlessSpecial(
                    input.to_string(),
                ));
            }
            if digits.len() != 1 {
                return Err(ParseAddressError::InvalidPaddingZeroes(input.to_string()));
            }
        }
        Ok(address)
    }

    /// Full `0x`-prefixed 64-character form, regardless of specialness.
    pub fn to_string_long(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Canonical form without the `0x` prefix.
    pub fn to_string_without_prefix(&self) -> String {
        if self.is_special() {
            format!("{:x}", self.0[Self::LENGTH - 1])
        } else {
            hex::encode(self.0)
        }
    }
}

impl FromStr for AccountAddress {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_relaxed(s)
    }
}

impl TryFrom<&str> for AccountAddress {
    type Error = ParseAddressError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<&[u8]> for AccountAddress {
    type Error = ParseAddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl From<[u8; 32]> for AccountAddress {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for AccountAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_string_without_prefix())
    }
}

impl Debug for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountAddress({})", self)
    }
}

impl Serialize for AccountAddress {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.serialize_str(&self.to_string())
        } else {
            // Fixed-width on the wire: no length prefix.
            self.0.serialize(s)
        }
    }
}

impl<'de> Deserialize<'de> for AccountAddress {
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

    const LONG: &str = "0x0102030405060708091011121314151617181920212223242526272829303132";

    #[test]
    fn test_special_addresses() {
        for i in 0u8..16 {
            let mut bytes = [0u8; 32];
            bytes[31] = i;
            assert!(AccountAddress::new(bytes).is_special());
        }
        let mut bytes = [0u8; 32];
        bytes[31] = 0x10;
        assert!(!AccountAddress::new(bytes).is_special());
        bytes[31] = 0x01;
        bytes[0] = 0x01;
        assert!(!AccountAddress::new(bytes).is_special());
    }

    #[test]
    fn test_display() {
        assert_eq!(AccountAddress::ONE.to_string(), "0x1");
        assert_eq!(AccountAddress::ZERO.to_string(), "0x0");
        assert_eq!(AccountAddress::special(0xf).to_string(), "0xf");
        assert_eq!(
            AccountAddress::special(0x10).to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000010"
        );
        assert_eq!(
            AccountAddress::ONE.to_string_long(),
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
    }

    #[test]
    fn test_relaxed_parsing() {
        assert_eq!("0x1".parse::<AccountAddress>().unwrap(), AccountAddress::ONE);
        assert_eq!("1".parse::<AccountAddress>().unwrap(), AccountAddress::ONE);
        assert_eq!("0x01".parse::<AccountAddress>().unwrap(), AccountAddress::ONE);
        assert_eq!(
            "0x10".parse::<AccountAddress>().unwrap(),
            AccountAddress::special(0x10)
        );
        assert_eq!(
            "0x".parse::<AccountAddress>(),
            Err(ParseAddressError::TooShort("0x".to_string()))
        );
        let too_long = format!("0x{}", "1".repeat(65));
        assert_eq!(
            too_long.parse::<AccountAddress>(),
            Err(ParseAddressError::TooLong(too_long.clone()))
        );
        assert_eq!(
            "0xzz".parse::<AccountAddress>(),
            Err(ParseAddressError::InvalidHexChars("0xzz".to_string()))
        );
    }

    #[test]
    fn test_strict_parsing() {
        assert_eq!(
            AccountAddress::from_str_strict("0x1").unwrap(),
            AccountAddress::ONE
        );
        assert_eq!(
            AccountAddress::from_str_strict(&AccountAddress::ONE.to_string_long()).unwrap(),
            AccountAddress::ONE
        );
        assert!(AccountAddress::from_str_strict(LONG).is_ok());

        assert_eq!(
            AccountAddress::from_str_strict("1"),
            Err(ParseAddressError::LeadingZeroXRequired("1".to_string()))
        );
        assert_eq!(
            AccountAddress::from_str_strict("0x10"),
            Err(ParseAddressError::LongFormRequiredUnlessSpecial(
                "0x10".to_string()
            ))
        );
        assert_eq!(
            AccountAddress::from_str_strict("0x01"),
            Err(ParseAddressError::InvalidPaddingZeroes("0x01".to_string()))
        );
        assert_eq!(
            AccountAddress::from_str_strict("0x"),
            Err(ParseAddressError::TooShort("0x".to_string()))
        );
    }

    #[test]
    fn test_roundtrip_through_display() {
        for s in ["0x1", "0xa", LONG] {
            let addr = AccountAddress::from_str_strict(s).unwrap();
            assert_eq!(addr.to_string(), s);
            assert_eq!(AccountAddress::from_str_strict(&addr.to_string()).unwrap(), addr);
        }
    }

    #[test]
    fn test_from_bytes_length() {
        assert!(AccountAddress::from_bytes(&[0u8; 32]).is_ok());
        assert_eq!(
            AccountAddress::from_bytes(&[0u8; 31]),
            Err(ParseAddressError::InvalidLength(31))
        );
        assert_eq!(
            AccountAddress::from_bytes(&[0u8; 33]),
            Err(ParseAddressError::InvalidLength(33))
        );
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&AccountAddress::ONE).unwrap();
        assert_eq!(json, "\"0x1\"");
        let parsed: AccountAddress = serde_json::from_str("\"0x0001\"").unwrap();
        assert_eq!(parsed, AccountAddress::ONE);

        let bytes = bcs::to_bytes(&AccountAddress::ONE).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[31], 1);
        let decoded: AccountAddress = bcs::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, AccountAddress::ONE);
    }
}
