//! Account and transaction authenticators.

use serde::ser::SerializeStructVariant;
use serde::{Serialize, Serializer};

use super::auth_key::AuthenticationKey;
use super::{
    AccountAddress, AnyPublicKey, AnySignature, Ed25519PublicKey, Ed25519Signature, MultiKey,
    MultiKeySignature,
};

/// One account's proof of authorization: its public key material and signature.
///
/// Wire ordinals: Ed25519 = 0, MultiEd25519 = 1 (not produced), SingleKey = 2,
/// MultiKey = 3, NoAccountAuthenticator = 4.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountAuthenticator {
    /// Legacy Ed25519 account.
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
    /// Single key of any supported scheme.
    SingleKey {
        public_key: AnyPublicKey,
        signature: AnySignature,
    },
    /// K-of-N multi-key.
    MultiKey {
        public_keys: MultiKey,
        signatures: MultiKeySignature,
    },
    /// Placeholder for simulation without a signature.
    NoAccountAuthenticator,
}

impl AccountAuthenticator {
    /// Verify the carried signature against `message`.
    pub fn verify(&self, message: &[u8]) -> bool {
        match self {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            AccountAuthenticator::SingleKey {
                public_key,
                signature,
            } => public_key.verify(message, signature),
            AccountAuthenticator::MultiKey {
                public_keys,
                signatures,
            } => public_keys.verify(message, signatures),
            AccountAuthenticator::NoAccountAuthenticator => false,
        }
    }

    /// Authentication key of the carried public key material.
    pub fn auth_key(&self) -> Option<AuthenticationKey> {
        match self {
            AccountAuthenticator::Ed25519 { public_key, .. } => Some(public_key.auth_key()),
            AccountAuthenticator::SingleKey { public_key, .. } => Some(public_key.auth_key()),
            AccountAuthenticator::MultiKey { public_keys, .. } => Some(public_keys.auth_key()),
            AccountAuthenticator::NoAccountAuthenticator => None,
        }
    }
}

impl Serialize for AccountAuthenticator {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        const NAME: &str = "AccountAuthenticator";
        match self {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => {
                let mut v = s.serialize_struct_variant(NAME, 0, "Ed25519", 2)?;
                v.serialize_field("public_key", public_key)?;
                v.serialize_field("signature", signature)?;
                v.end()
            }
            AccountAuthenticator::SingleKey {
                public_key,
                signature,
            } => {
                let mut v = s.serialize_struct_variant(NAME, 2, "SingleKey", 2)?;
                v.serialize_field("public_key", public_key)?;
                v.serialize_field("signature", signature)?;
                v.end()
            }
            AccountAuthenticator::MultiKey {
                public_keys,
                signatures,
            } => {
                let mut v = s.serialize_struct_variant(NAME, 3, "MultiKey", 2)?;
                v.serialize_field("public_keys", public_keys)?;
                v.serialize_field("signatures", signatures)?;
                v.end()
            }
            AccountAuthenticator::NoAccountAuthenticator => {
                s.serialize_unit_variant(NAME, 4, "NoAccountAuthenticator")
            }
        }
    }
}

/// Authorization for a whole transaction.
///
/// Wire ordinals: Ed25519 = 0, MultiEd25519 = 1 (not produced), MultiAgent = 2,
/// FeePayer = 3, SingleSender = 4.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransactionAuthenticator {
    Ed25519 {
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    },
    MultiAgent {
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
    },
    FeePayer {
        sender: AccountAuthenticator,
        secondary_signer_addresses: Vec<AccountAddress>,
        secondary_signers: Vec<AccountAuthenticator>,
        fee_payer_address: AccountAddress,
        fee_payer_signer: AccountAuthenticator,
    },
    SingleSender {
        sender: AccountAuthenticator,
    },
}

impl TransactionAuthenticator {
    /// Authenticator for a transaction with a single signer.
    ///
    /// Legacy Ed25519 senders use the dedicated Ed25519 form; every other
    /// authenticator is wrapped as a single sender.
    pub fn single_sender(sender: AccountAuthenticator) -> Self {
        match sender {
            AccountAuthenticator::Ed25519 {
                public_key,
                signature,
            } => TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            },
            sender => TransactionAuthenticator::SingleSender { sender },
        }
    }

    /// The sender's account authenticator.
    pub fn sender(&self) -> AccountAuthenticator {
        match self {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => AccountAuthenticator::Ed25519 {
                public_key: *public_key,
                signature: *signature,
            },
            TransactionAuthenticator::MultiAgent { sender, .. }
            | TransactionAuthenticator::FeePayer { sender, .. }
            | TransactionAuthenticator::SingleSender { sender } => sender.clone(),
        }
    }
}

impl Serialize for TransactionAuthenticator {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        const NAME: &str = "TransactionAuthenticator";
        match self {
            TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            } => {
                let mut v = s.serialize_struct_variant(NAME, 0, "Ed25519", 2)?;
                v.serialize_field("public_key", public_key)?;
                v.serialize_field("signature", signature)?;
                v.end()
            }
            TransactionAuthenticator::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            } => {
                let mut v = s.serialize_struct_variant(NAME, 2, "MultiAgent", 3)?;
                v.serialize_field("sender", sender)?;
                v.serialize_field("secondary_signer_addresses", secondary_signer_addresses)?;
                v.serialize_field("secondary_signers", secondary_signers)?;
                v.end()
            }
            TransactionAuthenticator::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            } => {
                let mut v = s.serialize_struct_variant(NAME, 3, "FeePayer", 5)?;
                v.serialize_field("sender", sender)?;
                v.serialize_field("secondary_signer_addresses", secondary_signer_addresses)?;
                v.serialize_field("secondary_signers", secondary_signers)?;
                v.serialize_field("fee_payer_address", fee_payer_address)?;
                v.serialize_field("fee_payer_signer", fee_payer_signer)?;
                v.end()
            }
            TransactionAuthenticator::SingleSender { sender } => {
                let mut v = s.serialize_struct_variant(NAME, 4, "SingleSender", 1)?;
                v.serialize_field("sender", sender)?;
                v.end()
            }
        }
    }
}
