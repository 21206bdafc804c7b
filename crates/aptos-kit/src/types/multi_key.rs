//! K-of-N multi-key public keys and signatures.

use std::collections::BTreeSet;
use std::fmt::{self, Debug};

use serde::{Serialize, Serializer};

use super::auth_key::{AuthenticationKey, AuthenticationKeyScheme};
use super::encoding::write_uleb128;
use super::key::{AnyPublicKey, AnySignature};
use crate::error::MultiKeyError;

/// Maximum number of keys in a multi-key, and of bits in its bitmap.
pub const MAX_NUM_OF_KEYS: usize = 32;

/// Bitmap length in bytes.
pub const BITMAP_LEN: usize = 4;

/// Which keys of a [`MultiKey`] contributed a signature.
///
/// Bit `i` is the most significant remaining bit of byte `i / 8`:
/// `byte[i / 8] & (0x80 >> (i % 8))`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitmap([u8; BITMAP_LEN]);

impl Bitmap {
    /// Build a bitmap with the given bits set.
    ///
    /// Rejects more bits than `key_count`, duplicate bits, and bits that do
    /// not address a key (`>= key_count` or `>= 32`).
    pub fn from_indices(bits: &[u8], key_count: usize) -> Result<Self, MultiKeyError> {
        if bits.len() > key_count {
            return Err(MultiKeyError::TooManySigners {
                signers: bits.len(),
                keys: key_count,
            });
        }

        let mut bitmap = [0u8; BITMAP_LEN];
        let mut seen = BTreeSet::new();
        for &bit in bits {
            if usize::from(bit) >= MAX_NUM_OF_KEYS || usize::from(bit) >= key_count {
                return Err(MultiKeyError::BitOutOfRange(bit));
            }
            if !seen.insert(bit) {
                return Err(MultiKeyError::DuplicateBit(bit));
            }
            bitmap[usize::from(bit / 8)] |= 0x80 >> (bit % 8);
        }
        Ok(Self(bitmap))
    }

    /// Wrap raw bitmap bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MultiKeyError> {
        let arr: [u8; BITMAP_LEN] =
            bytes
                .try_into()
                .map_err(|_| MultiKeyError::InvalidBitmapLength {
                    expected: BITMAP_LEN,
                    actual: bytes.len(),
                })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; BITMAP_LEN] {
        &self.0
    }

    pub fn is_set(&self, bit: u8) -> bool {
        usize::from(bit) < MAX_NUM_OF_KEYS && self.0[usize::from(bit / 8)] & (0x80 >> (bit % 8)) != 0
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|b| b.count_ones()).sum()
    }

    /// Set bits in ascending order.
    pub fn indices(&self) -> Vec<u8> {
        (0..MAX_NUM_OF_KEYS as u8).filter(|bit| self.is_set(*bit)).collect()
    }
}

impl Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bitmap({:?})", self.indices())
    }
}

impl Serialize for Bitmap {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_bytes(&self.0)
    }
}

/// An ordered list of up to 32 public keys with a signature threshold.
///
/// # Example
///
/// ```
/// use aptos_kit::{AnyPublicKey, Ed25519PrivateKey, MultiKey};
///
/// let keys: Vec<AnyPublicKey> = (0..3)
///     .map(|_| AnyPublicKey::ed25519(Ed25519PrivateKey::generate().public_key()))
///     .collect();
/// let multi_key = MultiKey::new(keys.clone(), 2).unwrap();
///
/// assert_eq!(multi_key.index_of(&keys[2]).unwrap(), 2);
/// let bitmap = multi_key.create_bitmap(&[0, 2]).unwrap();
/// assert_eq!(bitmap.as_bytes(), &[0b1010_0000, 0, 0, 0]);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct MultiKey {
    public_keys: Vec<AnyPublicKey>,
    signatures_required: u8,
}

impl MultiKey {
    /// Create a multi-key.
    ///
    /// The key list must hold 1 to 32 keys and the threshold must be between
    /// 1 and the number of keys.
    pub fn new(public_keys: Vec<AnyPublicKey>, signatures_required: u8) -> Result<Self, MultiKeyError> {
        if public_keys.len() > MAX_NUM_OF_KEYS {
            return Err(MultiKeyError::TooManyKeys {
                max: MAX_NUM_OF_KEYS,
                actual: public_keys.len(),
            });
        }
        if signatures_required == 0 || usize::from(signatures_required) > public_keys.len() {
            return Err(MultiKeyError::InvalidThreshold {
                threshold: signatures_required,
                keys: public_keys.len(),
            });
        }
        Ok(Self {
            public_keys,
            signatures_required,
        })
    }

    pub fn public_keys(&self) -> &[AnyPublicKey] {
        &self.public_keys
    }

    pub fn signatures_required(&self) -> u8 {
        self.signatures_required
    }

    /// Position of `key` in the key list.
    pub fn index_of(&self, key: &AnyPublicKey) -> Result<u8, MultiKeyError> {
        self.public_keys
            .iter()
            .position(|candidate| candidate == key)
            .map(|i| i as u8)
            .ok_or_else(|| MultiKeyError::NotFound(key.to_string()))
    }

    /// Bitmap marking the given key positions.
    pub fn create_bitmap(&self, bits: &[u8]) -> Result<Bitmap, MultiKeyError> {
        Bitmap::from_indices(bits, self.public_keys.len())
    }

    /// Wire bytes: the key list (ULEB128 count, then each key) and the threshold byte.
    pub fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_uleb128(&mut out, self.public_keys.len() as u64);
        for key in &self.public_keys {
            out.extend(key.to_bcs_bytes());
        }
        out.push(self.signatures_required);
        out
    }

    /// Authentication key under the multi-key scheme.
    pub fn auth_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_scheme_and_bytes(AuthenticationKeyScheme::MultiKey, &self.to_bcs_bytes())
    }

    /// Verify a multi-key signature.
    ///
    /// At least `signatures_required` bits must be set, every bit must address
    /// a key, and each signature must verify under the key at its bit.
    pub fn verify(&self, message: &[u8], signature: &MultiKeySignature) -> bool {
        let indices = signature.bitmap.indices();
        if indices.len() < usize::from(self.signatures_required)
            || indices.len() != signature.signatures.len()
        {
            return false;
        }
        indices.iter().zip(&signature.signatures).all(|(bit, sig)| {
            self.public_keys
                .get(usize::from(*bit))
                .is_some_and(|key| key.verify(message, sig))
        })
    }
}

/// Signatures from a subset of a [`MultiKey`]'s keys, in ascending key order,
/// with a bitmap naming the contributing keys.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct MultiKeySignature {
    signatures: Vec<AnySignature>,
    bitmap: Bitmap,
}

impl MultiKeySignature {
    /// Combine signatures with their bitmap.
    ///
    /// The number of signatures must equal the number of set bits and may not
    /// exceed 32.
    pub fn new(signatures: Vec<AnySignature>, bitmap: Bitmap) -> Result<Self, MultiKeyError> {
        if signatures.len() > MAX_NUM_OF_KEYS {
            return Err(MultiKeyError::TooManySignatures {
                max: MAX_NUM_OF_KEYS,
                actual: signatures.len(),
            });
        }
        if bitmap.count_ones() as usize != signatures.len() {
            return Err(MultiKeyError::SignatureCountMismatch {
                bits: bitmap.count_ones(),
                signatures: signatures.len(),
            });
        }
        Ok(Self { signatures, bitmap })
    }

    pub fn signatures(&self) -> &[AnySignature] {
        &self.signatures
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    /// Wire bytes: the signature list then the bitmap as a length-prefixed byte string.
    pub fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_uleb128(&mut out, self.signatures.len() as u64);
        for sig in &self.signatures {
            out.extend(sig.to_bcs_bytes());
        }
        write_uleb128(&mut out, BITMAP_LEN as u64);
        out.extend_from_slice(&self.bitmap.0);
        out
    }
}
