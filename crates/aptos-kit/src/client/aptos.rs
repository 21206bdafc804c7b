//! The main Aptos client.

use std::sync::Arc;

use super::abi::{
    EntryFunctionAbi, ViewFunctionAbi, fetch_entry_function_abi, fetch_view_function_abi,
};
use super::ledger::LedgerClient;
use super::rpc::{RestClient, RetryConfig};
use super::signer::Signer;
use super::transaction::{
    TransactionBuilder, TransactionDefaults, assemble_signed_transaction, sign_transaction,
    submit_transaction,
};
use super::view::{ViewRequest, view};
use crate::error::Error;
use crate::types::{
    AccountAddress, AccountData, AnyRawTransaction, ChainId, FunctionId, LedgerInfo, ModuleId,
    Network, PendingTransaction, SignedTransaction,
};

/// The main client for building and submitting Aptos transactions.
///
/// Holds a [`LedgerClient`] (the REST transport unless one is supplied) and
/// the envelope defaults applied to every transaction it builds. Cloning is
/// cheap; clones share the transport.
///
/// # Example
///
/// ```rust,no_run
/// use aptos_kit::*;
///
/// #[tokio::main]
/// async fn main() -> Result<(), aptos_kit::Error> {
///     let aptos = Aptos::testnet().build();
///
///     let abi = aptos
///         .entry_function_abi(&"0x1::aptos_account::transfer".parse()?)
///         .await?;
///     println!("transfer takes {} arguments", abi.parameters.len());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Aptos {
    client: Arc<dyn LedgerClient>,
    network: Network,
    defaults: TransactionDefaults,
}

impl Aptos {
    /// Create a builder for mainnet.
    pub fn mainnet() -> AptosBuilder {
        AptosBuilder::for_network(Network::Mainnet)
    }

    /// Create a builder for testnet.
    pub fn testnet() -> AptosBuilder {
        AptosBuilder::for_network(Network::Testnet)
    }

    /// Create a builder for devnet.
    pub fn devnet() -> AptosBuilder {
        AptosBuilder::for_network(Network::Devnet)
    }

    /// Create a builder for a localnet on the default port.
    pub fn local() -> AptosBuilder {
        AptosBuilder::for_network(Network::Local)
    }

    /// Create a builder with a custom REST URL.
    pub fn custom(url: impl Into<String>) -> AptosBuilder {
        AptosBuilder::new(Transport::Rest(url.into()), Network::Custom)
    }

    /// Create a builder over any ledger collaborator.
    pub fn with_client(client: impl LedgerClient + 'static) -> AptosBuilder {
        AptosBuilder::new(Transport::Client(Arc::new(client)), Network::Custom)
    }

    /// Create a configured client from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `APTOS_NETWORK` (optional): `"mainnet"`, `"testnet"`, `"devnet"`,
    ///   `"local"`, or a custom REST URL. Defaults to `"testnet"` if not set.
    /// - `APTOS_API_KEY` (optional): sent as a bearer token.
    ///
    /// # Example
    ///
    /// ```bash
    /// export APTOS_NETWORK=devnet
    /// export APTOS_API_KEY=aptoslabs_...
    /// ```
    ///
    /// ```rust,no_run
    /// # use aptos_kit::*;
    /// # fn example() -> Result<(), aptos_kit::Error> {
    /// let aptos = Aptos::from_env()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_env() -> Result<Aptos, Error> {
        let network = std::env::var("APTOS_NETWORK").ok();
        let api_key = std::env::var("APTOS_API_KEY").ok();

        let mut builder = match network.as_deref() {
            None => Aptos::testnet(),
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                Aptos::custom(url)
            }
            Some(name) => match name.parse::<Network>()? {
                Network::Custom => {
                    return Err(Error::Config(
                        "APTOS_NETWORK=custom needs a URL instead of a name".into(),
                    ));
                }
                network => AptosBuilder::for_network(network),
            },
        };

        if let Some(key) = api_key {
            builder = builder.api_key(key);
        }

        Ok(builder.build())
    }

    /// Get the underlying ledger collaborator.
    pub fn client(&self) -> &Arc<dyn LedgerClient> {
        &self.client
    }

    /// Get the network this client is configured for.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Envelope defaults applied to new transactions.
    pub fn defaults(&self) -> &TransactionDefaults {
        &self.defaults
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Fetch an account, or `None` if it does not exist.
    pub async fn account(&self, address: AccountAddress) -> Result<Option<AccountData>, Error> {
        Ok(self.client.get_account(address).await?)
    }

    pub async fn ledger_info(&self) -> Result<LedgerInfo, Error> {
        Ok(self.client.get_ledger_info().await?)
    }

    /// The chain id, from configuration or the node.
    pub async fn chain_id(&self) -> Result<ChainId, Error> {
        match self.defaults.chain_id {
            Some(chain_id) => Ok(chain_id),
            None => Ok(self.ledger_info().await?.chain_id()),
        }
    }

    /// Resolve the signature of an entry function.
    pub async fn entry_function_abi(&self, function: &FunctionId) -> Result<EntryFunctionAbi, Error> {
        fetch_entry_function_abi(self.client.as_ref(), function).await
    }

    /// Resolve the signature of a view function.
    pub async fn view_function_abi(&self, function: &FunctionId) -> Result<ViewFunctionAbi, Error> {
        fetch_view_function_abi(self.client.as_ref(), function).await
    }

    /// Execute a view function.
    pub async fn view(&self, request: &ViewRequest) -> Result<Vec<serde_json::Value>, Error> {
        view(self.client.as_ref(), request).await
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Start building a call to `function` sent by `sender`.
    pub fn transaction(&self, sender: AccountAddress, function: FunctionId) -> TransactionBuilder {
        TransactionBuilder::new(self.client.clone(), sender, function).defaults(self.defaults.clone())
    }

    /// Transfer `amount` octas of APT, creating the recipient account if needed.
    pub fn transfer(
        &self,
        sender: AccountAddress,
        recipient: AccountAddress,
        amount: u64,
    ) -> TransactionBuilder {
        let function = FunctionId::new(ModuleId::new(AccountAddress::ONE, "aptos_account"), "transfer");
        self.transaction(sender, function)
            .argument(recipient)
            .argument(amount)
    }

    /// Submit a signed transaction.
    pub async fn submit(&self, transaction: &SignedTransaction) -> Result<PendingTransaction, Error> {
        submit_transaction(self.client.as_ref(), transaction).await
    }

    /// Sign a single-signer transaction and submit it.
    pub async fn sign_and_submit(
        &self,
        signer: &dyn Signer,
        transaction: &AnyRawTransaction,
    ) -> Result<PendingTransaction, Error> {
        let sender = sign_transaction(signer, transaction)?;
        let signed = assemble_signed_transaction(transaction, sender, Vec::new(), None)?;
        self.submit(&signed).await
    }
}

impl std::fmt::Debug for Aptos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aptos")
            .field("network", &self.network)
            .field("defaults", &self.defaults)
            .finish()
    }
}

enum Transport {
    Rest(String),
    Client(Arc<dyn LedgerClient>),
}

/// Builder for creating an [`Aptos`] client.
///
/// # Example
///
/// ```rust
/// use aptos_kit::*;
///
/// let aptos = Aptos::devnet()
///     .retry_config(RetryConfig { max_retries: 5, initial_delay_ms: 200, max_delay_ms: 2000 })
///     .max_gas_amount(10_000)
///     .expiration_secs(60)
///     .build();
/// assert_eq!(aptos.defaults().max_gas_amount, 10_000);
/// ```
pub struct AptosBuilder {
    transport: Transport,
    network: Network,
    retry_config: RetryConfig,
    api_key: Option<String>,
    defaults: TransactionDefaults,
}

impl AptosBuilder {
    fn new(transport: Transport, network: Network) -> Self {
        Self {
            transport,
            network,
            retry_config: RetryConfig::default(),
            api_key: None,
            defaults: TransactionDefaults {
                chain_id: network.chain_id(),
                ..TransactionDefaults::default()
            },
        }
    }

    fn for_network(network: Network) -> Self {
        let url = network.default_url().unwrap_or_default();
        Self::new(Transport::Rest(url.to_string()), network)
    }

    /// Set the retry configuration of the REST transport.
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Send `key` as a bearer token with every REST request.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Use this chain id instead of asking the node.
    pub fn chain_id(mut self, chain_id: ChainId) -> Self {
        self.defaults.chain_id = Some(chain_id);
        self
    }

    pub fn max_gas_amount(mut self, max_gas_amount: u64) -> Self {
        self.defaults.max_gas_amount = max_gas_amount;
        self
    }

    /// Seconds from build time until transactions expire.
    pub fn expiration_secs(mut self, expiration_secs: u64) -> Self {
        self.defaults.expiration_secs = expiration_secs;
        self
    }

    /// Use a fixed gas unit price instead of the node's estimate.
    pub fn gas_unit_price(mut self, gas_unit_price: u64) -> Self {
        self.defaults.gas_unit_price = Some(gas_unit_price);
        self
    }

    /// Build the client.
    pub fn build(self) -> Aptos {
        let client: Arc<dyn LedgerClient> = match self.transport {
            Transport::Rest(url) => {
                let rest = RestClient::with_retry_config(url, self.retry_config);
                match self.api_key {
                    Some(key) => Arc::new(rest.with_api_key(key)),
                    None => Arc::new(rest),
                }
            }
            Transport::Client(client) => client,
        };

        Aptos {
            client,
            network: self.network,
            defaults: self.defaults,
        }
    }
}

impl From<AptosBuilder> for Aptos {
    fn from(builder: AptosBuilder) -> Self {
        builder.build()
    }
}
