//! Cryptographic key types.
//!
//! Two signature schemes are supported: Ed25519 and Secp256k1 ECDSA. Each has
//! concrete private key, public key and signature types; the [`PrivateKey`],
//! [`PublicKey`] and [`Signature`] enums close over both and dispatch by match.
//! [`AnyPublicKey`] and [`AnySignature`] tag a key or signature with its scheme
//! for use under the single-key and multi-key authentication schemes.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use bip39::Mnemonic;
use ed25519_dalek::Signer as _;
use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Sha3_256};
use slipped10::{BIP32Path, Curve};

use super::auth_key::{AuthenticationKey, AuthenticationKeyScheme};
use super::encoding::encode_bytes;
use crate::error::{ParseKeyError, SignerError};

/// Signature scheme, numbered by its variant ordinal in [`AnyPublicKey`] and [`AnySignature`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyScheme {
    Ed25519 = 0,
    Secp256k1Ecdsa = 1,
}

impl KeyScheme {
    /// Get the string prefix for this scheme.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyScheme::Ed25519 => "ed25519",
            KeyScheme::Secp256k1Ecdsa => "secp256k1",
        }
    }

    /// Private key length in bytes.
    pub fn private_key_len(&self) -> usize {
        32
    }

    /// Public key length in bytes, as carried on the wire.
    pub fn public_key_len(&self) -> usize {
        match self {
            KeyScheme::Ed25519 => 32,
            KeyScheme::Secp256k1Ecdsa => 65,
        }
    }

    /// Signature length in bytes.
    pub fn signature_len(&self) -> usize {
        64
    }

    fn aip80_prefix(&self) -> &'static str {
        match self {
            KeyScheme::Ed25519 => "ed25519-priv-",
            KeyScheme::Secp256k1Ecdsa => "secp256k1-priv-",
        }
    }
}

impl Display for KeyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for KeyScheme {
    type Error = ParseKeyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(KeyScheme::Ed25519),
            1 => Ok(KeyScheme::Secp256k1Ecdsa),
            2 => Err(ParseKeyError::UnsupportedScheme("secp256r1".to_string())),
            3 => Err(ParseKeyError::UnsupportedScheme("keyless".to_string())),
            _ => Err(ParseKeyError::InvalidFormat(format!(
                "unknown scheme ordinal {}",
                value
            ))),
        }
    }
}

/// Default HD derivation path for Aptos Ed25519 keys.
pub const DEFAULT_HD_PATH: &str = "m/44'/637'/0'/0'/0'";

/// Default number of words in generated seed phrases.
pub const DEFAULT_WORD_COUNT: usize = 12;

fn fixed_bytes<const N: usize>(bytes: &[u8]) -> Result<[u8; N], ParseKeyError> {
    bytes.try_into().map_err(|_| ParseKeyError::InvalidLength {
        expected: N,
        actual: bytes.len(),
    })
}

// ============================================================================
// Ed25519
// ============================================================================

/// An Ed25519 private key.
#[derive(Clone)]
pub struct Ed25519PrivateKey(ed25519_dalek::SigningKey);

impl Ed25519PrivateKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        Self(ed25519_dalek::SigningKey::generate(&mut OsRng))
    }

    /// Create from 32 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        let arr: [u8; 32] = fixed_bytes(bytes)?;
        Ok(Self(ed25519_dalek::SigningKey::from_bytes(&arr)))
    }

    /// Get the raw 32 bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// Derive the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.0.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.0.sign(message).to_bytes())
    }

    /// AIP-80 string form: `ed25519-priv-0x…`.
    pub fn to_aip80_string(&self) -> String {
        format!(
            "{}0x{}",
            KeyScheme::Ed25519.aip80_prefix(),
            hex::encode(self.to_bytes())
        )
    }

    // ========================================================================
    // Seed Phrase / Mnemonic Support
    // ========================================================================

    /// Derive a key from a BIP-39 seed phrase using the default path
    /// (`m/44'/637'/0'/0'/0'`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use aptos_kit::Ed25519PrivateKey;
    ///
    /// let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    /// let key = Ed25519PrivateKey::from_seed_phrase(phrase).unwrap();
    /// ```
    pub fn from_seed_phrase(phrase: impl AsRef<str>) -> Result<Self, SignerError> {
        Self::from_seed_phrase_with_path_and_passphrase(phrase, DEFAULT_HD_PATH, None)
    }

    /// Derive a key from a BIP-39 seed phrase and a custom HD path.
    ///
    /// Every path segment must be hardened; SLIP-10 Ed25519 derivation has no
    /// non-hardened children.
    pub fn from_seed_phrase_with_path(
        phrase: impl AsRef<str>,
        hd_path: impl AsRef<str>,
    ) -> Result<Self, SignerError> {
        Self::from_seed_phrase_with_path_and_passphrase(phrase, hd_path, None)
    }

    /// Derive a key from a BIP-39 seed phrase, HD path and optional passphrase.
    pub fn from_seed_phrase_with_path_and_passphrase(
        phrase: impl AsRef<str>,
        hd_path: impl AsRef<str>,
        passphrase: Option<&str>,
    ) -> Result<Self, SignerError> {
        let normalized = phrase
            .as_ref()
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        let mnemonic: Mnemonic = normalized
            .parse()
            .map_err(|_| SignerError::InvalidSeedPhrase)?;
        let seed = mnemonic.to_seed(passphrase.unwrap_or(""));

        let hd_path = hd_path.as_ref();
        if !is_hardened_path(hd_path) {
            return Err(SignerError::KeyDerivationFailed(format!(
                "Invalid HD path '{}': every segment must be hardened",
                hd_path
            )));
        }
        let path: BIP32Path = hd_path
            .parse()
            .map_err(|e| SignerError::KeyDerivationFailed(format!("Invalid HD path: {}", e)))?;

        let derived =
            slipped10::derive_key_from_path(&seed, Curve::Ed25519, &path).map_err(|e| {
                SignerError::KeyDerivationFailed(format!("SLIP-10 derivation failed: {:?}", e))
            })?;

        Ok(Self(ed25519_dalek::SigningKey::from_bytes(&derived.key)))
    }

    /// Generate a fresh seed phrase and the key it derives on the default path.
    pub fn generate_with_seed_phrase() -> Result<(String, Self), SignerError> {
        let phrase = generate_seed_phrase(DEFAULT_WORD_COUNT)?;
        let key = Self::from_seed_phrase(&phrase)?;
        Ok((phrase, key))
    }
}

fn is_hardened_path(path: &str) -> bool {
    let mut segments = path.split('/');
    segments.next() == Some("m")
        && segments.clone().next().is_some()
        && segments.all(|segment| {
            segment
                .strip_suffix('\'')
                .is_some_and(|index| !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()))
        })
}

impl FromStr for Ed25519PrivateKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(KeyScheme::Ed25519.aip80_prefix()).unwrap_or(s);
        Self::from_bytes(&super::hex::decode(digits)?)
    }
}

impl Display for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_aip80_string())
    }
}

impl Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PrivateKey(***)")
    }
}

/// An Ed25519 public key (32 bytes, validated as a curve point).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey([u8; 32]);

impl Ed25519PublicKey {
    /// Create from 32 raw bytes, rejecting bytes that are not a curve point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        let arr: [u8; 32] = fixed_bytes(bytes)?;
        ed25519_dalek::VerifyingKey::from_bytes(&arr)
            .map_err(|_| ParseKeyError::InvalidCurvePoint)?;
        Ok(Self(arr))
    }

    /// Get the raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Verify a signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> bool {
        let Ok(verifying_key) = ed25519_dalek::VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
        verifying_key.verify_strict(message, &signature).is_ok()
    }

    /// Authentication key under the legacy Ed25519 scheme: the raw key bytes
    /// followed by scheme byte 0.
    pub fn auth_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_scheme_and_bytes(AuthenticationKeyScheme::Ed25519, &self.0)
    }
}

/// An Ed25519 signature (64 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; 64]);

impl Ed25519Signature {
    /// Create from 64 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        fixed_bytes(bytes).map(Self)
    }

    /// Get the raw 64 bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

// ============================================================================
// Secp256k1
// ============================================================================

/// A Secp256k1 ECDSA private key.
#[derive(Clone)]
pub struct Secp256k1PrivateKey(k256::ecdsa::SigningKey);

impl Secp256k1PrivateKey {
    /// Generate a new random key.
    pub fn generate() -> Self {
        Self(k256::ecdsa::SigningKey::random(&mut OsRng))
    }

    /// Create from 32 raw bytes, rejecting zero or out-of-range scalars.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        let arr: [u8; 32] = fixed_bytes(bytes)?;
        k256::ecdsa::SigningKey::from_slice(&arr)
            .map(Self)
            .map_err(|_| ParseKeyError::InvalidPrivateKey("scalar out of range".to_string()))
    }

    /// Get the raw 32 bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(&self.0.to_bytes());
        out
    }

    /// Derive the public key.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey::from_verifying_key(self.0.verifying_key())
    }

    /// Sign a message.
    ///
    /// The message is hashed with SHA3-256 and the digest is signed directly.
    /// Signatures are normalized to low-S.
    pub fn sign(&self, message: &[u8]) -> Result<Secp256k1Signature, SignerError> {
        let digest = Sha3_256::digest(message);
        let signature: k256::ecdsa::Signature = self
            .0
            .sign_prehash(&digest)
            .map_err(|e| SignerError::SigningFailed(e.to_string()))?;
        let signature = signature.normalize_s().unwrap_or(signature);

        let mut out = [0u8; 64];
        out.copy_from_slice(&signature.to_bytes());
        Ok(Secp256k1Signature(out))
    }

    /// AIP-80 string form: `secp256k1-priv-0x…`.
    pub fn to_aip80_string(&self) -> String {
        format!(
            "{}0x{}",
            KeyScheme::Secp256k1Ecdsa.aip80_prefix(),
            hex::encode(self.to_bytes())
        )
    }
}

impl FromStr for Secp256k1PrivateKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(KeyScheme::Secp256k1Ecdsa.aip80_prefix())
            .unwrap_or(s);
        Self::from_bytes(&super::hex::decode(digits)?)
    }
}

impl Display for Secp256k1PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_aip80_string())
    }
}

impl Debug for Secp256k1PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secp256k1PrivateKey(***)")
    }
}

/// A Secp256k1 public key, held in 65-byte uncompressed SEC1 form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Secp256k1PublicKey([u8; 65]);

impl Secp256k1PublicKey {
    fn from_verifying_key(key: &k256::ecdsa::VerifyingKey) -> Self {
        let point = key.to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        Self(out)
    }

    /// Create from SEC1 bytes: 65 uncompressed or 33 compressed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        if bytes.len() != 65 && bytes.len() != 33 {
            return Err(ParseKeyError::InvalidLength {
                expected: 65,
                actual: bytes.len(),
            });
        }
        let key = k256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|_| ParseKeyError::InvalidCurvePoint)?;
        Ok(Self::from_verifying_key(&key))
    }

    /// Get the 65 uncompressed bytes.
    pub fn as_bytes(&self) -> &[u8; 65] {
        &self.0
    }

    /// Verify a signature over the SHA3-256 digest of `message`.
    pub fn verify(&self, message: &[u8], signature: &Secp256k1Signature) -> bool {
        let Ok(key) = k256::ecdsa::VerifyingKey::from_sec1_bytes(&self.0) else {
            return false;
        };
        let Ok(signature) = k256::ecdsa::Signature::from_slice(&signature.0) else {
            return false;
        };
        let digest = Sha3_256::digest(message);
        key.verify_prehash(&digest, &signature).is_ok()
    }
}

/// A Secp256k1 ECDSA signature (64 bytes, `r || s`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Secp256k1Signature([u8; 64]);

impl Secp256k1Signature {
    /// Create from 64 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseKeyError> {
        fixed_bytes(bytes).map(Self)
    }

    /// Get the raw 64 bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

macro_rules! hex_string_impls {
    ($ty:ident) => {
        impl FromStr for $ty {
            type Err = ParseKeyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_bytes(&super::hex::decode(s)?)
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($ty), self)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                if s.is_human_readable() {
                    s.serialize_str(&self.to_string())
                } else {
                    s.serialize_bytes(&self.0)
                }
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                if d.is_human_readable() {
                    let s: String = Deserialize::deserialize(d)?;
                    s.parse().map_err(serde::de::Error::custom)
                } else {
                    let bytes: Vec<u8> = Deserialize::deserialize(d)?;
                    Self::from_bytes(&bytes).map_err(serde::de::Error::custom)
                }
            }
        }
    };
}

hex_string_impls!(Ed25519PublicKey);
hex_string_impls!(Ed25519Signature);
hex_string_impls!(Secp256k1PublicKey);
hex_string_impls!(Secp256k1Signature);

// ============================================================================
// Scheme-agnostic keys
// ============================================================================

/// A private key of either scheme.
#[derive(Clone, Debug)]
pub enum PrivateKey {
    Ed25519(Ed25519PrivateKey),
    Secp256k1(Secp256k1PrivateKey),
}

impl PrivateKey {
    /// Generate a new random key of the given scheme.
    pub fn generate(scheme: KeyScheme) -> Self {
        match scheme {
            KeyScheme::Ed25519 => PrivateKey::Ed25519(Ed25519PrivateKey::generate()),
            KeyScheme::Secp256k1Ecdsa => PrivateKey::Secp256k1(Secp256k1PrivateKey::generate()),
        }
    }

    /// Create from 32 raw bytes of the given scheme.
    pub fn from_bytes(scheme: KeyScheme, bytes: &[u8]) -> Result<Self, ParseKeyError> {
        match scheme {
            KeyScheme::Ed25519 => Ed25519PrivateKey::from_bytes(bytes).map(PrivateKey::Ed25519),
            KeyScheme::Secp256k1Ecdsa => {
                Secp256k1PrivateKey::from_bytes(bytes).map(PrivateKey::Secp256k1)
            }
        }
    }

    pub fn scheme(&self) -> KeyScheme {
        match self {
            PrivateKey::Ed25519(_) => KeyScheme::Ed25519,
            PrivateKey::Secp256k1(_) => KeyScheme::Secp256k1Ecdsa,
        }
    }

    /// Get the raw 32 bytes.
    pub fn to_bytes(&self) -> [u8; 32] {
        match self {
            PrivateKey::Ed25519(key) => key.to_bytes(),
            PrivateKey::Secp256k1(key) => key.to_bytes(),
        }
    }

    /// Derive the public key.
    pub fn public_key(&self) -> PublicKey {
        match self {
            PrivateKey::Ed25519(key) => PublicKey::Ed25519(key.public_key()),
            PrivateKey::Secp256k1(key) => PublicKey::Secp256k1(key.public_key()),
        }
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Result<Signature, SignerError> {
        match self {
            PrivateKey::Ed25519(key) => Ok(Signature::Ed25519(key.sign(message))),
            PrivateKey::Secp256k1(key) => key.sign(message).map(Signature::Secp256k1),
        }
    }
}

impl From<Ed25519PrivateKey> for PrivateKey {
    fn from(key: Ed25519PrivateKey) -> Self {
        PrivateKey::Ed25519(key)
    }
}

impl From<Secp256k1PrivateKey> for PrivateKey {
    fn from(key: Secp256k1PrivateKey) -> Self {
        PrivateKey::Secp256k1(key)
    }
}

/// Parses an AIP-80 string (`ed25519-priv-0x…` or `secp256k1-priv-0x…`).
///
/// Bare hex is ambiguous between schemes and is rejected; parse it through
/// [`Ed25519PrivateKey`] or [`Secp256k1PrivateKey`] instead.
impl FromStr for PrivateKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with(KeyScheme::Ed25519.aip80_prefix()) {
            s.parse().map(PrivateKey::Ed25519)
        } else if s.starts_with(KeyScheme::Secp256k1Ecdsa.aip80_prefix()) {
            s.parse().map(PrivateKey::Secp256k1)
        } else {
            Err(ParseKeyError::InvalidFormat(
                "expected 'ed25519-priv-0x...' or 'secp256k1-priv-0x...'".to_string(),
            ))
        }
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrivateKey::Ed25519(key) => Display::fmt(key, f),
            PrivateKey::Secp256k1(key) => Display::fmt(key, f),
        }
    }
}

/// A public key of either scheme.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PublicKey {
    Ed25519(Ed25519PublicKey),
    Secp256k1(Secp256k1PublicKey),
}

impl PublicKey {
    /// Create from raw bytes of the given scheme.
    pub fn from_bytes(scheme: KeyScheme, bytes: &[u8]) -> Result<Self, ParseKeyError> {
        match scheme {
            KeyScheme::Ed25519 => Ed25519PublicKey::from_bytes(bytes).map(PublicKey::Ed25519),
            KeyScheme::Secp256k1Ecdsa => {
                Secp256k1PublicKey::from_bytes(bytes).map(PublicKey::Secp256k1)
            }
        }
    }

    pub fn scheme(&self) -> KeyScheme {
        match self {
            PublicKey::Ed25519(_) => KeyScheme::Ed25519,
            PublicKey::Secp256k1(_) => KeyScheme::Secp256k1Ecdsa,
        }
    }

    /// Get the raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PublicKey::Ed25519(key) => key.as_bytes(),
            PublicKey::Secp256k1(key) => key.as_bytes(),
        }
    }

    /// Verify a signature. A signature of a different scheme never verifies.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        match (self, signature) {
            (PublicKey::Ed25519(key), Signature::Ed25519(sig)) => key.verify(message, sig),
            (PublicKey::Secp256k1(key), Signature::Secp256k1(sig)) => key.verify(message, sig),
            _ => false,
        }
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicKey::Ed25519(key) => Display::fmt(key, f),
            PublicKey::Secp256k1(key) => Display::fmt(key, f),
        }
    }
}

impl From<Ed25519PublicKey> for PublicKey {
    fn from(key: Ed25519PublicKey) -> Self {
        PublicKey::Ed25519(key)
    }
}

impl From<Secp256k1PublicKey> for PublicKey {
    fn from(key: Secp256k1PublicKey) -> Self {
        PublicKey::Secp256k1(key)
    }
}

/// A signature of either scheme.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Signature {
    Ed25519(Ed25519Signature),
    Secp256k1(Secp256k1Signature),
}

impl Signature {
    /// Create from raw bytes of the given scheme.
    pub fn from_bytes(scheme: KeyScheme, bytes: &[u8]) -> Result<Self, ParseKeyError> {
        match scheme {
            KeyScheme::Ed25519 => Ed25519Signature::from_bytes(bytes).map(Signature::Ed25519),
            KeyScheme::Secp256k1Ecdsa => {
                Secp256k1Signature::from_bytes(bytes).map(Signature::Secp256k1)
            }
        }
    }

    pub fn scheme(&self) -> KeyScheme {
        match self {
            Signature::Ed25519(_) => KeyScheme::Ed25519,
            Signature::Secp256k1(_) => KeyScheme::Secp256k1Ecdsa,
        }
    }

    /// Get the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Signature::Ed25519(sig) => sig.as_bytes(),
            Signature::Secp256k1(sig) => sig.as_bytes(),
        }
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::Ed25519(sig) => Display::fmt(sig, f),
            Signature::Secp256k1(sig) => Display::fmt(sig, f),
        }
    }
}

// ============================================================================
// Any (scheme-tagged) keys
// ============================================================================

/// A public key tagged with its scheme, as used by single-key and multi-key accounts.
///
/// Wire layout: scheme ordinal (ULEB128), then the key as a length-prefixed byte string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AnyPublicKey(PublicKey);

impl AnyPublicKey {
    pub fn new(key: impl Into<PublicKey>) -> Self {
        Self(key.into())
    }

    pub fn ed25519(key: Ed25519PublicKey) -> Self {
        Self(PublicKey::Ed25519(key))
    }

    pub fn secp256k1(key: Secp256k1PublicKey) -> Self {
        Self(PublicKey::Secp256k1(key))
    }

    /// The wrapped key.
    pub fn inner(&self) -> &PublicKey {
        &self.0
    }

    pub fn scheme(&self) -> KeyScheme {
        self.0.scheme()
    }

    /// Verify a scheme-tagged signature.
    pub fn verify(&self, message: &[u8], signature: &AnySignature) -> bool {
        self.0.verify(message, &signature.0)
    }

    /// Wire bytes of this key.
    pub fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.scheme() as u8];
        out.extend(encode_bytes(self.0.as_bytes()));
        out
    }

    /// Authentication key under the single-key scheme.
    pub fn auth_key(&self) -> AuthenticationKey {
        AuthenticationKey::from_scheme_and_bytes(
            AuthenticationKeyScheme::SingleKey,
            &self.to_bcs_bytes(),
        )
    }
}

impl From<PublicKey> for AnyPublicKey {
    fn from(key: PublicKey) -> Self {
        Self(key)
    }
}

impl Display for AnyPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme(), self.0)
    }
}

impl Serialize for AnyPublicKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            PublicKey::Ed25519(key) => s.serialize_newtype_variant("AnyPublicKey", 0, "Ed25519", key),
            PublicKey::Secp256k1(key) => {
                s.serialize_newtype_variant("AnyPublicKey", 1, "Secp256k1Ecdsa", key)
            }
        }
    }
}

/// A signature tagged with its scheme.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AnySignature(Signature);

impl AnySignature {
    pub fn new(signature: impl Into<Signature>) -> Self {
        Self(signature.into())
    }

    /// The wrapped signature.
    pub fn inner(&self) -> &Signature {
        &self.0
    }

    pub fn scheme(&self) -> KeyScheme {
        self.0.scheme()
    }

    /// Wire bytes of this signature.
    pub fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.scheme() as u8];
        out.extend(encode_bytes(self.0.as_bytes()));
        out
    }
}

impl From<Signature> for AnySignature {
    fn from(signature: Signature) -> Self {
        Self(signature)
    }
}

impl Serialize for AnySignature {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match &self.0 {
            Signature::Ed25519(sig) => s.serialize_newtype_variant("AnySignature", 0, "Ed25519", sig),
            Signature::Secp256k1(sig) => {
                s.serialize_newtype_variant("AnySignature", 1, "Secp256k1Ecdsa", sig)
            }
        }
    }
}

// ============================================================================
// Seed Phrase Generation
// ============================================================================

/// Generate a random BIP-39 seed phrase of 12, 15, 18, 21 or 24 words.
///
/// ```rust
/// use aptos_kit::generate_seed_phrase;
///
/// let phrase = generate_seed_phrase(12).unwrap();
/// assert_eq!(phrase.split_whitespace().count(), 12);
/// ```
pub fn generate_seed_phrase(word_count: usize) -> Result<String, SignerError> {
    use rand::RngCore;

    let entropy_bytes = match word_count {
        12 => 16,
        15 => 20,
        18 => 24,
        21 => 28,
        24 => 32,
        _ => {
            return Err(SignerError::KeyDerivationFailed(format!(
                "Invalid word count: {}. Must be 12, 15, 18, 21, or 24",
                word_count
            )));
        }
    };

    let mut entropy = vec![0u8; entropy_bytes];
    OsRng.fill_bytes(&mut entropy);

    let mnemonic = Mnemonic::from_entropy(&entropy).map_err(|e| {
        SignerError::KeyDerivationFailed(format!("Failed to generate mnemonic: {}", e))
    })?;

    Ok(mnemonic.to_string())
}
