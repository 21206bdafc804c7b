//! Signer trait and account implementations.
//!
//! A `Signer` knows which account it signs for and turns a signing message
//! into an [`AccountAuthenticator`] carrying its public key material.
//!
//! # Implementations
//!
//! - [`Ed25519Account`] - Legacy Ed25519 account
//! - [`SingleKeyAccount`] - Ed25519 or Secp256k1 key under the single-key scheme
//! - [`MultiKeyAccount`] - K-of-N threshold account over a [`MultiKey`]
//!
//! # Example
//!
//! ```rust
//! use aptos_kit::{Ed25519Account, Signer};
//!
//! let account = Ed25519Account::generate();
//! let authenticator = account.sign(b"message").unwrap();
//! assert!(authenticator.verify(b"message"));
//! ```

use std::sync::Arc;

use crate::error::{Error, MultiKeyError, SignerError};
use crate::types::{
    AccountAddress, AccountAuthenticator, AnyPublicKey, AnyRawTransaction, AnySignature,
    AuthenticationKey, Ed25519PrivateKey, Ed25519PublicKey, KeyScheme, MultiKey,
    MultiKeySignature, PrivateKey,
};

// ============================================================================
// Signer Trait
// ============================================================================

/// Trait for signing transactions.
///
/// Signing is a pure computation over immutable key material, so signers can
/// be shared across tasks and used concurrently.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use aptos_kit::{AccountAddress, AccountAuthenticator, AuthenticationKey, Signer, SignerError};
///
/// struct MySigner { /* ... */ }
///
/// impl Signer for MySigner {
///     fn address(&self) -> AccountAddress { /* ... */ }
///     fn auth_key(&self) -> AuthenticationKey { /* ... */ }
///     fn sign(&self, message: &[u8]) -> Result<AccountAuthenticator, SignerError> { /* ... */ }
/// }
/// ```
pub trait Signer: Send + Sync {
    /// The account this signer signs for.
    fn address(&self) -> AccountAddress;

    /// Authentication key of this signer's public key material.
    fn auth_key(&self) -> AuthenticationKey;

    /// Sign `message`, returning the authenticator that proves it.
    fn sign(&self, message: &[u8]) -> Result<AccountAuthenticator, SignerError>;

    /// Compute the transaction's signing message and sign it.
    fn sign_transaction(
        &self,
        transaction: &AnyRawTransaction,
    ) -> Result<AccountAuthenticator, Error> {
        let message = transaction.signing_message()?;
        Ok(self.sign(&message)?)
    }
}

/// Implement `Signer` for `Arc<dyn Signer>` for convenience.
impl Signer for Arc<dyn Signer> {
    fn address(&self) -> AccountAddress {
        (**self).address()
    }

    fn auth_key(&self) -> AuthenticationKey {
        (**self).auth_key()
    }

    fn sign(&self, message: &[u8]) -> Result<AccountAuthenticator, SignerError> {
        (**self).sign(message)
    }

    fn sign_transaction(
        &self,
        transaction: &AnyRawTransaction,
    ) -> Result<AccountAuthenticator, Error> {
        (**self).sign_transaction(transaction)
    }
}

// ============================================================================
// Ed25519Account
// ============================================================================

/// A legacy Ed25519 account with its key in memory.
///
/// # Example
///
/// ```rust
/// use aptos_kit::{Ed25519Account, Signer};
///
/// let account = Ed25519Account::from_seed_phrase(
///     "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about"
/// ).unwrap();
/// println!("{}", account.address());
/// ```
#[derive(Clone)]
pub struct Ed25519Account {
    private_key: Ed25519PrivateKey,
    public_key: Ed25519PublicKey,
    address: AccountAddress,
}

impl Ed25519Account {
    /// Create an account from a private key, at the address derived from it.
    pub fn new(private_key: Ed25519PrivateKey) -> Self {
        let public_key = private_key.public_key();
        Self {
            address: public_key.auth_key().derived_address(),
            private_key,
            public_key,
        }
    }

    /// Create an account with a fresh random key.
    pub fn generate() -> Self {
        Self::new(Ed25519PrivateKey::generate())
    }

    /// Create an account from a hex or AIP-80 (`ed25519-priv-0x...`) private key string.
    pub fn from_private_key(private_key: impl AsRef<str>) -> Result<Self, Error> {
        let private_key: Ed25519PrivateKey = private_key.as_ref().parse()?;
        Ok(Self::new(private_key))
    }

    /// Create an account from a BIP-39 seed phrase on the default path
    /// (`m/44'/637'/0'/0'/0'`).
    pub fn from_seed_phrase(phrase: impl AsRef<str>) -> Result<Self, Error> {
        Ok(Self::new(Ed25519PrivateKey::from_seed_phrase(phrase)?))
    }

    /// Create an account from a BIP-39 seed phrase with a custom hardened path.
    pub fn from_seed_phrase_with_path(
        phrase: impl AsRef<str>,
        hd_path: impl AsRef<str>,
    ) -> Result<Self, Error> {
        Ok(Self::new(Ed25519PrivateKey::from_seed_phrase_with_path(
            phrase, hd_path,
        )?))
    }

    /// Load an account from the environment.
    ///
    /// Reads `APTOS_PRIVATE_KEY` (required) and `APTOS_ACCOUNT_ADDRESS`
    /// (optional, for accounts whose key was rotated).
    pub fn from_env() -> Result<Self, Error> {
        let private_key = std::env::var("APTOS_PRIVATE_KEY")
            .map_err(|_| Error::Config("APTOS_PRIVATE_KEY is not set".into()))?;
        let account = Self::from_private_key(private_key)?;

        match std::env::var("APTOS_ACCOUNT_ADDRESS") {
            Ok(address) => Ok(account.with_address(address.parse()?)),
            Err(_) => Ok(account),
        }
    }

    /// Use this key for an account at `address`, e.g. after key rotation.
    pub fn with_address(mut self, address: AccountAddress) -> Self {
        self.address = address;
        self
    }

    pub fn public_key(&self) -> Ed25519PublicKey {
        self.public_key
    }

    pub fn private_key(&self) -> &Ed25519PrivateKey {
        &self.private_key
    }
}

impl std::fmt::Debug for Ed25519Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Account")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl Signer for Ed25519Account {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn auth_key(&self) -> AuthenticationKey {
        self.public_key.auth_key()
    }

    fn sign(&self, message: &[u8]) -> Result<AccountAuthenticator, SignerError> {
        Ok(AccountAuthenticator::Ed25519 {
            public_key: self.public_key,
            signature: self.private_key.sign(message),
        })
    }
}

// ============================================================================
// SingleKeyAccount
// ============================================================================

/// An account authenticated with a single key of any supported scheme.
#[derive(Clone)]
pub struct SingleKeyAccount {
    private_key: PrivateKey,
    public_key: AnyPublicKey,
    address: AccountAddress,
}

impl SingleKeyAccount {
    /// Create an account from a private key, at the address derived from it.
    pub fn new(private_key: impl Into<PrivateKey>) -> Self {
        let private_key = private_key.into();
        let public_key = AnyPublicKey::new(private_key.public_key());
        Self {
            address: public_key.auth_key().derived_address(),
            private_key,
            public_key,
        }
    }

    /// Create an account with a fresh random key of `scheme`.
    pub fn generate(scheme: KeyScheme) -> Self {
        Self::new(PrivateKey::generate(scheme))
    }

    /// Create an account from an AIP-80 private key string.
    pub fn from_private_key(private_key: impl AsRef<str>) -> Result<Self, Error> {
        let private_key: PrivateKey = private_key.as_ref().parse()?;
        Ok(Self::new(private_key))
    }

    /// Use this key for an account at `address`, e.g. after key rotation.
    pub fn with_address(mut self, address: AccountAddress) -> Self {
        self.address = address;
        self
    }

    pub fn public_key(&self) -> &AnyPublicKey {
        &self.public_key
    }
}

impl std::fmt::Debug for SingleKeyAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleKeyAccount")
            .field("address", &self.address)
            .field("public_key", &self.public_key)
            .finish()
    }
}

impl Signer for SingleKeyAccount {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn auth_key(&self) -> AuthenticationKey {
        self.public_key.auth_key()
    }

    fn sign(&self, message: &[u8]) -> Result<AccountAuthenticator, SignerError> {
        Ok(AccountAuthenticator::SingleKey {
            public_key: self.public_key,
            signature: AnySignature::new(self.private_key.sign(message)?),
        })
    }
}

// ============================================================================
// MultiKeyAccount
// ============================================================================

/// A K-of-N account that signs with the keys it holds locally.
///
/// Each held key is located in the multi-key's key list; signatures are
/// produced in ascending key position and paired with a bitmap of those
/// positions.
///
/// # Example
///
/// ```rust
/// use aptos_kit::{AnyPublicKey, KeyScheme, MultiKey, MultiKeyAccount, PrivateKey, Signer};
///
/// let keys: Vec<PrivateKey> = (0..3).map(|_| PrivateKey::generate(KeyScheme::Ed25519)).collect();
/// let multi_key = MultiKey::new(
///     keys.iter().map(|k| AnyPublicKey::new(k.public_key())).collect(),
///     2,
/// ).unwrap();
///
/// let account = MultiKeyAccount::new(multi_key, vec![keys[2].clone(), keys[0].clone()]).unwrap();
/// assert!(account.sign(b"message").unwrap().verify(b"message"));
/// ```
#[derive(Clone)]
pub struct MultiKeyAccount {
    multi_key: MultiKey,
    /// Held keys with their positions, ascending.
    signers: Vec<(u8, PrivateKey)>,
    address: AccountAddress,
}

impl MultiKeyAccount {
    /// Create an account from a multi-key and the private keys held locally.
    ///
    /// # Errors
    ///
    /// Fails if a key is not part of `multi_key`, a key is given twice, or
    /// fewer keys are held than the threshold requires.
    pub fn new(multi_key: MultiKey, private_keys: Vec<PrivateKey>) -> Result<Self, SignerError> {
        let mut signers = private_keys
            .into_iter()
            .map(|key| {
                let index = multi_key.index_of(&AnyPublicKey::new(key.public_key()))?;
                Ok((index, key))
            })
            .collect::<Result<Vec<_>, MultiKeyError>>()?;
        signers.sort_by_key(|(index, _)| *index);

        let indices: Vec<u8> = signers.iter().map(|(index, _)| *index).collect();
        multi_key.create_bitmap(&indices)?;

        if signers.len() < usize::from(multi_key.signatures_required()) {
            return Err(MultiKeyError::NotEnoughSigners {
                signers: signers.len(),
                threshold: multi_key.signatures_required(),
            }
            .into());
        }

        Ok(Self {
            address: multi_key.auth_key().derived_address(),
            multi_key,
            signers,
        })
    }

    /// Use these keys for an account at `address`, e.g. after key rotation.
    pub fn with_address(mut self, address: AccountAddress) -> Self {
        self.address = address;
        self
    }

    pub fn multi_key(&self) -> &MultiKey {
        &self.multi_key
    }

    /// Key positions this account signs with, ascending.
    pub fn signer_indices(&self) -> Vec<u8> {
        self.signers.iter().map(|(index, _)| *index).collect()
    }
}

impl std::fmt::Debug for MultiKeyAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiKeyAccount")
            .field("address", &self.address)
            .field("signatures_required", &self.multi_key.signatures_required())
            .field("signer_indices", &self.signer_indices())
            .finish()
    }
}

impl Signer for MultiKeyAccount {
    fn address(&self) -> AccountAddress {
        self.address
    }

    fn auth_key(&self) -> AuthenticationKey {
        self.multi_key.auth_key()
    }

    fn sign(&self, message: &[u8]) -> Result<AccountAuthenticator, SignerError> {
        let signatures = self
            .signers
            .iter()
            .map(|(_, key)| key.sign(message).map(AnySignature::new))
            .collect::<Result<Vec<_>, _>>()?;
        let bitmap = self.multi_key.create_bitmap(&self.signer_indices())?;

        Ok(AccountAuthenticator::MultiKey {
            public_keys: self.multi_key.clone(),
            signatures: MultiKeySignature::new(signatures, bitmap)?,
        })
    }
}
