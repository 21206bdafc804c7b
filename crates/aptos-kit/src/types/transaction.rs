//! Transaction types.

use std::fmt::{self, Display};

use serde::Serialize;

use super::encoding::to_bcs;
use super::{AccountAddress, HashValue, TransactionAuthenticator, TransactionPayload};
use crate::error::Error;

/// Domain separator for plain transactions.
pub const RAW_TRANSACTION_SALT: &[u8] = b"APTOS::RawTransaction";

/// Domain separator for transactions carrying secondary signers or a fee payer.
pub const RAW_TRANSACTION_WITH_DATA_SALT: &[u8] = b"APTOS::RawTransactionWithData";

/// Domain separator for committed transaction hashes.
pub const TRANSACTION_SALT: &[u8] = b"APTOS::Transaction";

/// Identifies the chain a transaction is valid on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ChainId(u8);

impl ChainId {
    pub const MAINNET: Self = Self(1);
    pub const TESTNET: Self = Self(2);
    pub const LOCAL: Self = Self(4);

    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    pub const fn id(&self) -> u8 {
        self.0
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An unsigned transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RawTransaction {
    /// The account that sends the transaction.
    pub sender: AccountAddress,
    /// Must equal the sender's current on-chain sequence number.
    pub sequence_number: u64,
    /// The call to execute.
    pub payload: TransactionPayload,
    /// Upper bound on gas units the transaction may consume.
    pub max_gas_amount: u64,
    /// Price per gas unit, in octas.
    pub gas_unit_price: u64,
    /// Unix seconds after which the transaction is discarded.
    pub expiration_timestamp_secs: u64,
    pub chain_id: ChainId,
}

impl RawTransaction {
    /// Wire bytes of this transaction.
    pub fn to_bcs_bytes(&self) -> Result<Vec<u8>, Error> {
        to_bcs(self)
    }

    /// `SHA3-256("APTOS::RawTransaction") || bcs(self)`.
    pub fn signing_message(&self) -> Result<Vec<u8>, Error> {
        signing_message(RAW_TRANSACTION_SALT, self)
    }
}

fn signing_message<T: Serialize>(salt: &[u8], value: &T) -> Result<Vec<u8>, Error> {
    let mut message = HashValue::sha3_256(salt).to_vec();
    message.extend(to_bcs(value)?);
    Ok(message)
}

/// A raw transaction together with the extra signers it names.
///
/// This is what secondary signers and fee payers sign over.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum RawTransactionWithData {
    MultiAgent {
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
    },
    MultiAgentWithFeePayer {
        raw_txn: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
        fee_payer_address: AccountAddress,
    },
}

impl RawTransactionWithData {
    /// `SHA3-256("APTOS::RawTransactionWithData") || bcs(self)`.
    pub fn signing_message(&self) -> Result<Vec<u8>, Error> {
        signing_message(RAW_TRANSACTION_WITH_DATA_SALT, self)
    }
}

/// A transaction with one signer and an optional fee payer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleTransaction {
    pub raw_transaction: RawTransaction,
    pub fee_payer_address: Option<AccountAddress>,
}

impl SimpleTransaction {
    pub fn new(raw_transaction: RawTransaction) -> Self {
        Self {
            raw_transaction,
            fee_payer_address: None,
        }
    }

    /// Mark the transaction as sponsored by `fee_payer`.
    ///
    /// Pass [`AccountAddress::ZERO`] while the fee payer is still unknown.
    pub fn with_fee_payer(self, fee_payer: AccountAddress) -> Self {
        Self {
            fee_payer_address: Some(fee_payer),
            ..self
        }
    }
}

/// A transaction that additionally requires secondary signers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultiAgentTransaction {
    pub raw_transaction: RawTransaction,
    pub secondary_signer_addresses: Vec<AccountAddress>,
    pub fee_payer_address: Option<AccountAddress>,
}

impl MultiAgentTransaction {
    pub fn new(
        raw_transaction: RawTransaction,
        secondary_signer_addresses: Vec<AccountAddress>,
    ) -> Self {
        Self {
            raw_transaction,
            secondary_signer_addresses,
            fee_payer_address: None,
        }
    }

    /// Mark the transaction as sponsored by `fee_payer`.
    pub fn with_fee_payer(self, fee_payer: AccountAddress) -> Self {
        Self {
            fee_payer_address: Some(fee_payer),
            ..self
        }
    }
}

/// Either transaction envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnyRawTransaction {
    Simple(SimpleTransaction),
    MultiAgent(MultiAgentTransaction),
}

impl AnyRawTransaction {
    pub fn raw_transaction(&self) -> &RawTransaction {
        match self {
            AnyRawTransaction::Simple(txn) => &txn.raw_transaction,
            AnyRawTransaction::MultiAgent(txn) => &txn.raw_transaction,
        }
    }

    pub fn sender(&self) -> AccountAddress {
        self.raw_transaction().sender
    }

    pub fn secondary_signer_addresses(&self) -> &[AccountAddress] {
        match self {
            AnyRawTransaction::Simple(_) => &[],
            AnyRawTransaction::MultiAgent(txn) => &txn.secondary_signer_addresses,
        }
    }

    pub fn fee_payer_address(&self) -> Option<AccountAddress> {
        match self {
            AnyRawTransaction::Simple(txn) => txn.fee_payer_address,
            AnyRawTransaction::MultiAgent(txn) => txn.fee_payer_address,
        }
    }

    /// Replace the fee payer address, producing a new envelope.
    pub fn with_fee_payer(self, fee_payer: AccountAddress) -> Self {
        match self {
            AnyRawTransaction::Simple(txn) => AnyRawTransaction::Simple(txn.with_fee_payer(fee_payer)),
            AnyRawTransaction::MultiAgent(txn) => {
                AnyRawTransaction::MultiAgent(txn.with_fee_payer(fee_payer))
            }
        }
    }

    /// The exact bytes every signer of this transaction signs.
    ///
    /// A transaction with neither secondary signers nor a fee payer signs the
    /// raw transaction under the `RawTransaction` salt. Anything else signs a
    /// [`RawTransactionWithData`] under the `RawTransactionWithData` salt.
    pub fn signing_message(&self) -> Result<Vec<u8>, Error> {
        let raw_txn = self.raw_transaction().clone();
        let secondary_signer_addresses = self.secondary_signer_addresses().to_vec();

        match (self, self.fee_payer_address()) {
            (_, Some(fee_payer_address)) => RawTransactionWithData::MultiAgentWithFeePayer {
                raw_txn,
                secondary_signer_addresses,
                fee_payer_address,
            }
            .signing_message(),
            (AnyRawTransaction::MultiAgent(_), None) => RawTransactionWithData::MultiAgent {
                raw_txn,
                secondary_signer_addresses,
            }
            .signing_message(),
            (AnyRawTransaction::Simple(_), None) => raw_txn.signing_message(),
        }
    }
}

impl From<SimpleTransaction> for AnyRawTransaction {
    fn from(txn: SimpleTransaction) -> Self {
        AnyRawTransaction::Simple(txn)
    }
}

impl From<MultiAgentTransaction> for AnyRawTransaction {
    fn from(txn: MultiAgentTransaction) -> Self {
        AnyRawTransaction::MultiAgent(txn)
    }
}

/// A signed transaction ready to be submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignedTransaction {
    pub raw_txn: RawTransaction,
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    pub fn new(raw_txn: RawTransaction, authenticator: TransactionAuthenticator) -> Self {
        Self {
            raw_txn,
            authenticator,
        }
    }

    /// Serialize to bytes for submission.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        to_bcs(self)
    }

    /// Hash the transaction will be committed under.
    ///
    /// `SHA3-256(SHA3-256("APTOS::Transaction") || 0x00 || bcs(self))`, where
    /// `0x00` tags a user transaction.
    pub fn committed_hash(&self) -> Result<HashValue, Error> {
        let salt = HashValue::sha3_256(TRANSACTION_SALT);
        let bytes = self.to_bytes()?;
        Ok(HashValue::sha3_256_of(&[salt.as_bytes(), &[0u8], &bytes]))
    }
}
