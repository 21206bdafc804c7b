//! Transaction building, signing and submission.
//!
//! A transaction moves through these steps, each producing a new value:
//!
//! 1. **Payload**: the function's ABI is resolved (unless supplied) and the
//!    arguments are checked against it ([`generate_transaction_payload`]).
//! 2. **Envelope**: sender, sequence number, gas and expiry are filled in
//!    ([`TransactionBuilder::build`]).
//! 3. **Signing**: every signer signs the envelope's signing message
//!    ([`sign_transaction`], [`sign_as_fee_payer`]).
//! 4. **Submission**: the authenticators are assembled into a
//!    [`SignedTransaction`] and posted ([`assemble_signed_transaction`],
//!    [`submit_transaction`]).
//!
//! Validation failures in steps 1 and 2 abort before anything is signed.
//!
//! # Example
//!
//! ```rust,no_run
//! # use aptos_kit::*;
//! # async fn example() -> Result<(), aptos_kit::Error> {
//! let aptos = Aptos::testnet().build();
//! let alice = Ed25519Account::from_env()?;
//! let bob: AccountAddress = "0xb0b".parse()?;
//!
//! let pending = aptos
//!     .transfer(alice.address(), bob, 1_000)
//!     .max_gas_amount(2_000)
//!     .send(&alice)
//!     .await?;
//! println!("submitted {}", pending.hash);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use futures::future::try_join3;
use tracing::debug;

use super::abi::{EntryFunctionAbi, fetch_entry_function_abi};
use super::ledger::LedgerClient;
use super::signer::Signer;
use crate::error::{AbiError, Error};
use crate::types::{
    AccountAddress, AccountAuthenticator, AnyRawTransaction, ChainId, EntryFunction,
    EntryFunctionArgument, FunctionId, MultiAgentTransaction, PendingTransaction,
    RawTransaction, SignedTransaction, SimpleTransaction, TransactionAuthenticator,
    TransactionPayload, TypeTag,
};

// ============================================================================
// Defaults and options
// ============================================================================

/// Envelope values used when a transaction does not set its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionDefaults {
    pub max_gas_amount: u64,
    /// Seconds from now until the transaction expires.
    pub expiration_secs: u64,
    /// Fixed gas unit price. `None` asks the node for an estimate.
    pub gas_unit_price: Option<u64>,
    /// Known chain id. `None` asks the node.
    pub chain_id: Option<ChainId>,
}

impl TransactionDefaults {
    pub const DEFAULT_MAX_GAS_AMOUNT: u64 = 200_000;
    pub const DEFAULT_EXPIRATION_SECS: u64 = 20;
}

impl Default for TransactionDefaults {
    fn default() -> Self {
        Self {
            max_gas_amount: Self::DEFAULT_MAX_GAS_AMOUNT,
            expiration_secs: Self::DEFAULT_EXPIRATION_SECS,
            gas_unit_price: None,
            chain_id: None,
        }
    }
}

/// Per-transaction overrides of the envelope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    pub max_gas_amount: Option<u64>,
    pub gas_unit_price: Option<u64>,
    /// Absolute expiry, in Unix seconds.
    pub expiration_timestamp_secs: Option<u64>,
    /// Skip the account lookup and use this sequence number.
    pub sequence_number: Option<u64>,
    pub chain_id: Option<ChainId>,
}

// ============================================================================
// Payload
// ============================================================================

/// An entry-function call as the caller describes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEntryFunctionData {
    pub function: FunctionId,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<EntryFunctionArgument>,
    /// Pre-fetched signature. When absent it is fetched from the node.
    pub abi: Option<EntryFunctionAbi>,
}

impl InputEntryFunctionData {
    pub fn new(function: FunctionId) -> Self {
        Self {
            function,
            type_arguments: Vec::new(),
            arguments: Vec::new(),
            abi: None,
        }
    }
}

/// Resolve the function's ABI if needed and build the payload.
pub async fn generate_transaction_payload(
    client: &dyn LedgerClient,
    data: &InputEntryFunctionData,
) -> Result<TransactionPayload, Error> {
    let payload = match &data.abi {
        Some(abi) => generate_transaction_payload_with_abi(data, abi)?,
        None => {
            let abi = fetch_entry_function_abi(client, &data.function).await?;
            generate_transaction_payload_with_abi(data, &abi)?
        }
    };
    debug!(function = %data.function, "payload built");
    Ok(payload)
}

/// Check the call against `abi` and build the payload.
pub fn generate_transaction_payload_with_abi(
    data: &InputEntryFunctionData,
    abi: &EntryFunctionAbi,
) -> Result<TransactionPayload, AbiError> {
    abi.check(&data.function, &data.type_arguments, &data.arguments)?;

    let args = data
        .arguments
        .iter()
        .map(EntryFunctionArgument::to_bcs_bytes)
        .collect();
    Ok(EntryFunction::new(data.function.clone(), data.type_arguments.clone(), args).into())
}

// ============================================================================
// Envelope
// ============================================================================

/// Fill in the envelope around `payload`.
///
/// Values missing from `options` come from `defaults` or, for the sequence
/// number, gas unit price and chain id, from the node. Those lookups run
/// concurrently.
pub async fn build_raw_transaction(
    client: &dyn LedgerClient,
    sender: AccountAddress,
    payload: TransactionPayload,
    options: &TransactionOptions,
    defaults: &TransactionDefaults,
) -> Result<RawTransaction, Error> {
    let sequence_number = async {
        if let Some(sequence_number) = options.sequence_number {
            return Ok(sequence_number);
        }
        let account = client.get_account(sender).await?.ok_or_else(|| {
            Error::InvalidTransaction(format!("Sender account {sender} does not exist"))
        })?;
        Ok::<_, Error>(account.sequence_number)
    };
    let gas_unit_price = async {
        if let Some(price) = options.gas_unit_price.or(defaults.gas_unit_price) {
            return Ok(price);
        }
        Ok::<_, Error>(client.estimate_gas_price().await?.gas_estimate)
    };
    let chain_id = async {
        if let Some(chain_id) = options.chain_id.or(defaults.chain_id) {
            return Ok(chain_id);
        }
        Ok::<_, Error>(client.get_ledger_info().await?.chain_id())
    };
    let (sequence_number, gas_unit_price, chain_id) =
        try_join3(sequence_number, gas_unit_price, chain_id).await?;

    let expiration_timestamp_secs = match options.expiration_timestamp_secs {
        Some(timestamp) => timestamp,
        None => now_secs()?.saturating_add(defaults.expiration_secs),
    };

    Ok(RawTransaction {
        sender,
        sequence_number,
        payload,
        max_gas_amount: options.max_gas_amount.unwrap_or(defaults.max_gas_amount),
        gas_unit_price,
        expiration_timestamp_secs,
        chain_id,
    })
}

fn now_secs() -> Result<u64, Error> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| Error::Config("System clock is before the Unix epoch".into()))
}

// ============================================================================
// Signing and submission
// ============================================================================

/// Sign `transaction` as its sender or one of its secondary signers.
pub fn sign_transaction(
    signer: &dyn Signer,
    transaction: &AnyRawTransaction,
) -> Result<AccountAuthenticator, Error> {
    let message = transaction.signing_message()?;
    debug!(
        signer = %signer.address(),
        len = message.len(),
        "signing message computed"
    );
    let authenticator = signer.sign(&message)?;
    debug!(signer = %signer.address(), "transaction signed");
    Ok(authenticator)
}

/// Sign `transaction` as its fee payer.
///
/// Records the signer's address as the fee payer, producing the envelope the
/// fee payer actually signs, and returns it with the authenticator.
pub fn sign_as_fee_payer(
    signer: &dyn Signer,
    transaction: AnyRawTransaction,
) -> Result<(AnyRawTransaction, AccountAuthenticator), Error> {
    if transaction.fee_payer_address().is_none() {
        return Err(Error::InvalidTransaction(
            "Transaction was not built with a fee payer".into(),
        ));
    }
    let transaction = transaction.with_fee_payer(signer.address());
    let authenticator = sign_transaction(signer, &transaction)?;
    Ok((transaction, authenticator))
}

/// Combine the authenticators into a submittable transaction.
///
/// `secondary_signers` must be in the order of the transaction's secondary
/// signer addresses. `fee_payer` is required exactly when the transaction
/// has a fee payer.
pub fn assemble_signed_transaction(
    transaction: &AnyRawTransaction,
    sender: AccountAuthenticator,
    secondary_signers: Vec<AccountAuthenticator>,
    fee_payer: Option<AccountAuthenticator>,
) -> Result<SignedTransaction, Error> {
    let secondary_signer_addresses = transaction.secondary_signer_addresses().to_vec();
    if secondary_signers.len() != secondary_signer_addresses.len() {
        return Err(Error::InvalidTransaction(format!(
            "Expected {} secondary signer authenticators, got {}",
            secondary_signer_addresses.len(),
            secondary_signers.len()
        )));
    }

    let authenticator = match (transaction.fee_payer_address(), fee_payer) {
        (Some(fee_payer_address), Some(fee_payer_signer)) => {
            if fee_payer_address == AccountAddress::ZERO {
                return Err(Error::InvalidTransaction(
                    "Fee payer address is not set; sign with sign_as_fee_payer first".into(),
                ));
            }
            TransactionAuthenticator::FeePayer {
                sender,
                secondary_signer_addresses,
                secondary_signers,
                fee_payer_address,
                fee_payer_signer,
            }
        }
        (Some(_), None) => {
            return Err(Error::InvalidTransaction(
                "Transaction has a fee payer but no fee payer authenticator".into(),
            ));
        }
        (None, Some(_)) => {
            return Err(Error::InvalidTransaction(
                "Fee payer authenticator given for a transaction without a fee payer".into(),
            ));
        }
        (None, None) if !secondary_signer_addresses.is_empty() => {
            TransactionAuthenticator::MultiAgent {
                sender,
                secondary_signer_addresses,
                secondary_signers,
            }
        }
        (None, None) => TransactionAuthenticator::single_sender(sender),
    };

    Ok(SignedTransaction::new(
        transaction.raw_transaction().clone(),
        authenticator,
    ))
}

/// Post a signed transaction to the node.
pub async fn submit_transaction(
    client: &dyn LedgerClient,
    transaction: &SignedTransaction,
) -> Result<PendingTransaction, Error> {
    let bytes = transaction.to_bytes()?;
    let pending = client.submit(bytes).await?;
    debug!(
        sender = %transaction.raw_txn.sender,
        sequence_number = transaction.raw_txn.sequence_number,
        hash = %pending.hash,
        "transaction submitted"
    );
    Ok(pending)
}

// ============================================================================
// TransactionBuilder
// ============================================================================

/// Builder for an entry-function transaction.
///
/// Created via [`Aptos::transaction`](super::Aptos::transaction) or
/// [`TransactionBuilder::new`].
///
/// # Example
///
/// ```rust,no_run
/// # use aptos_kit::*;
/// # async fn example() -> Result<(), aptos_kit::Error> {
/// let aptos = Aptos::testnet().build();
/// let sender = Ed25519Account::from_env()?;
/// let sponsor = Ed25519Account::generate();
///
/// // Sponsored transaction: the sender signs first, then the fee payer.
/// let transaction = aptos
///     .transaction(sender.address(), "0x1::aptos_account::transfer".parse()?)
///     .argument(AccountAddress::ONE)
///     .argument(100u64)
///     .with_fee_payer()
///     .build()
///     .await?;
///
/// let sender_auth = sign_transaction(&sender, &transaction)?;
/// let (transaction, sponsor_auth) = sign_as_fee_payer(&sponsor, transaction)?;
/// let signed = assemble_signed_transaction(&transaction, sender_auth, vec![], Some(sponsor_auth))?;
/// aptos.submit(&signed).await?;
/// # Ok(())
/// # }
/// ```
pub struct TransactionBuilder {
    client: Arc<dyn LedgerClient>,
    defaults: TransactionDefaults,
    sender: AccountAddress,
    data: InputEntryFunctionData,
    options: TransactionOptions,
    secondary_signers: Vec<AccountAddress>,
    with_fee_payer: bool,
}

impl TransactionBuilder {
    pub fn new(client: Arc<dyn LedgerClient>, sender: AccountAddress, function: FunctionId) -> Self {
        Self {
            client,
            defaults: TransactionDefaults::default(),
            sender,
            data: InputEntryFunctionData::new(function),
            options: TransactionOptions::default(),
            secondary_signers: Vec::new(),
            with_fee_payer: false,
        }
    }

    // ========================================================================
    // Call methods
    // ========================================================================

    /// Add a type argument.
    pub fn type_argument(mut self, type_argument: TypeTag) -> Self {
        self.data.type_arguments.push(type_argument);
        self
    }

    /// Add an argument.
    pub fn argument(mut self, argument: impl Into<EntryFunctionArgument>) -> Self {
        self.data.arguments.push(argument.into());
        self
    }

    /// Add several arguments.
    pub fn arguments<I>(mut self, arguments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<EntryFunctionArgument>,
    {
        self.data
            .arguments
            .extend(arguments.into_iter().map(Into::into));
        self
    }

    /// Use a pre-fetched ABI instead of asking the node.
    pub fn abi(mut self, abi: EntryFunctionAbi) -> Self {
        self.data.abi = Some(abi);
        self
    }

    // ========================================================================
    // Envelope methods
    // ========================================================================

    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.options.max_gas_amount = Some(max_gas_amount);
        self
    }

    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.options.gas_unit_price = Some(gas_unit_price);
        self
    }

    /// Absolute expiry, in Unix seconds.
    pub fn expiration_timestamp_secs(mut self, timestamp: u64) -> Self {
        self.options.expiration_timestamp_secs = Some(timestamp);
        self
    }

    pub fn sequence_number(mut self, sequence_number: u64) -> Self {
        self.options.sequence_number = Some(sequence_number);
        self
    }

    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.options.chain_id = Some(chain_id);
        self
    }

    /// Replace all envelope overrides at once.
    pub fn options(mut self, options: TransactionOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the envelope defaults.
    pub fn defaults(mut self, defaults: TransactionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Require an additional signer.
    pub fn secondary_signer(mut self, address: AccountAddress) -> Self {
        self.secondary_signers.push(address);
        self
    }

    /// Let another account pay for gas. Its address is filled in when it signs.
    pub fn with_fee_payer(mut self) -> Self {
        self.with_fee_payer = true;
        self
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Build the unsigned transaction.
    pub async fn build(self) -> Result<AnyRawTransaction, Error> {
        let payload = generate_transaction_payload(self.client.as_ref(), &self.data).await?;
        let raw = build_raw_transaction(
            self.client.as_ref(),
            self.sender,
            payload,
            &self.options,
            &self.defaults,
        )
        .await?;

        debug!(
            sender = %raw.sender,
            sequence_number = raw.sequence_number,
            function = %self.data.function,
            "envelope built"
        );

        let transaction: AnyRawTransaction = if self.secondary_signers.is_empty() {
            SimpleTransaction::new(raw).into()
        } else {
            MultiAgentTransaction::new(raw, self.secondary_signers).into()
        };
        Ok(if self.with_fee_payer {
            transaction.with_fee_payer(AccountAddress::ZERO)
        } else {
            transaction
        })
    }

    /// Build, sign with `signer` and submit a single-signer transaction.
    pub async fn send(self, signer: &dyn Signer) -> Result<PendingTransaction, Error> {
        if self.with_fee_payer || !self.secondary_signers.is_empty() {
            return Err(Error::InvalidTransaction(
                "Transactions with secondary signers or a fee payer need every signer; \
                 use build() and assemble_signed_transaction()"
                    .into(),
            ));
        }
        if signer.address() != self.sender {
            return Err(Error::InvalidTransaction(format!(
                "Signer {} is not the sender {}",
                signer.address(),
                self.sender
            )));
        }

        let client = self.client.clone();
        let transaction = self.build().await?;
        let sender = sign_transaction(signer, &transaction)?;
        let signed = assemble_signed_transaction(&transaction, sender, Vec::new(), None)?;
        submit_transaction(client.as_ref(), &signed).await
    }
}

impl std::fmt::Debug for TransactionBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionBuilder")
            .field("sender", &self.sender)
            .field("function", &self.data.function)
            .field("options", &self.options)
            .field("secondary_signers", &self.secondary_signers)
            .field("with_fee_payer", &self.with_fee_payer)
            .finish()
    }
}
