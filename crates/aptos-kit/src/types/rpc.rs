//! REST response types.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use super::{AuthenticationKey, ChainId, HashValue, Hex};

// ============================================================================
// Accounts
// ============================================================================

/// On-chain account resource.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountData {
    /// Next sequence number the account must use.
    #[serde_as(as = "DisplayFromStr")]
    pub sequence_number: u64,
    /// Current authentication key, which may differ from the one the address was derived from.
    pub authentication_key: Hex,
}

impl AccountData {
    /// The authentication key as a typed value, if it is 32 bytes.
    pub fn auth_key(&self) -> Option<AuthenticationKey> {
        let bytes: [u8; 32] = self.authentication_key.as_bytes().try_into().ok()?;
        Some(AuthenticationKey::new(bytes))
    }
}

// ============================================================================
// Ledger
// ============================================================================

/// Node's view of the ledger head.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerInfo {
    pub chain_id: u8,
    #[serde_as(as = "DisplayFromStr")]
    pub epoch: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub ledger_version: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub oldest_ledger_version: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub ledger_timestamp: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub block_height: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub oldest_block_height: u64,
    #[serde(default)]
    pub node_role: Option<String>,
}

impl LedgerInfo {
    pub fn chain_id(&self) -> ChainId {
        ChainId::new(self.chain_id)
    }

    /// Ledger timestamp in whole seconds.
    pub fn timestamp_secs(&self) -> u64 {
        self.ledger_timestamp / 1_000_000
    }
}

// ============================================================================
// Gas
// ============================================================================

/// Gas unit price estimates, in octas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GasEstimation {
    pub gas_estimate: u64,
    #[serde(default)]
    pub deprioritized_gas_estimate: Option<u64>,
    #[serde(default)]
    pub prioritized_gas_estimate: Option<u64>,
}

// ============================================================================
// Transactions
// ============================================================================

/// A transaction accepted into the mempool but not yet committed.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub hash: HashValue,
    pub sender: super::AccountAddress,
    #[serde_as(as = "DisplayFromStr")]
    pub sequence_number: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub max_gas_amount: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub gas_unit_price: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub expiration_timestamp_secs: u64,
}

/// Error body returned by the REST API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub vm_error_code: Option<u64>,
}
