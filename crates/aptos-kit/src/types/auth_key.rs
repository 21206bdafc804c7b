//! Authentication keys and address derivation.

use std::fmt::{self, Debug, Display};

use serde::{Serialize, Serializer};

use super::{AccountAddress, HashValue};

/// Domain byte appended to key material before hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AuthenticationKeyScheme {
    Ed25519 = 0,
    MultiEd25519 = 1,
    SingleKey = 2,
    MultiKey = 3,
    DeriveAuid = 251,
    DeriveObjectAddressFromObject = 252,
    DeriveObjectAddressFromGuid = 253,
    DeriveObjectAddressFromSeed = 254,
    DeriveResourceAccountAddress = 255,
}

impl AuthenticationKeyScheme {
    /// The domain byte.
    pub fn as_byte(self) -> u8 {
        self as u8
    }
}

/// A 32-byte authentication key: `SHA3-256(key_material || scheme_byte)`.
///
/// The default address of an account is its initial authentication key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuthenticationKey([u8; 32]);

impl AuthenticationKey {
    /// Create from raw 32 bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash `bytes` under the given scheme.
    pub fn from_scheme_and_bytes(scheme: AuthenticationKeyScheme, bytes: &[u8]) -> Self {
        let hash = HashValue::sha3_256_of(&[bytes, &[scheme.as_byte()]]);
        Self(*hash.as_bytes())
    }

    /// Get the raw 32 bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The account address this key derives.
    pub fn derived_address(&self) -> AccountAddress {
        AccountAddress::new(self.0)
    }
}

impl From<AuthenticationKey> for AccountAddress {
    fn from(key: AuthenticationKey) -> Self {
        key.derived_address()
    }
}

impl Display for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Debug for AuthenticationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthenticationKey({})", self)
    }
}

impl Serialize for AuthenticationKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.serialize_str(&self.to_string())
        } else {
            s.serialize_bytes(&self.0)
        }
    }
}

/// Address of a named object created by `creator` with `seed`.
pub fn create_object_address(creator: &AccountAddress, seed: &[u8]) -> AccountAddress {
    derive_from_creator(
        creator,
        seed,
        AuthenticationKeyScheme::DeriveObjectAddressFromSeed,
    )
}

/// Address of a resource account created by `creator` with `seed`.
pub fn create_resource_address(creator: &AccountAddress, seed: &[u8]) -> AccountAddress {
    derive_from_creator(
        creator,
        seed,
        AuthenticationKeyScheme::DeriveResourceAccountAddress,
    )
}

fn derive_from_creator(
    creator: &AccountAddress,
    seed: &[u8],
    scheme: AuthenticationKeyScheme,
) -> AccountAddress {
    let mut material = creator.to_vec();
    material.extend_from_slice(seed);
    AuthenticationKey::from_scheme_and_bytes(scheme, &material).derived_address()
}
