//! Low-level REST client for an Aptos fullnode.

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::ledger::LedgerClient;
use crate::error::RpcError;
use crate::types::{
    AccountAddress, AccountData, ApiErrorBody, GasEstimation, LedgerInfo, MoveModuleBytecode,
    PendingTransaction,
};

/// Content type for BCS-encoded signed transactions.
pub const SIGNED_TRANSACTION_CONTENT_TYPE: &str = "application/x.aptos.signed_transaction+bcs";

/// Content type for BCS-encoded view function requests.
pub const VIEW_FUNCTION_CONTENT_TYPE: &str = "application/x.aptos.view_function+bcs";

/// Retry configuration for REST calls.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Initial delay in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 500,
            max_delay_ms: 5000,
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Backoff before retry number `attempt` (0-based).
    fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay = self.initial_delay_ms.saturating_mul(factor);
        Duration::from_millis(delay.min(self.max_delay_ms))
    }
}

/// A request body with its content type.
struct Body {
    content_type: &'static str,
    bytes: Vec<u8>,
}

/// Low-level REST client for an Aptos fullnode.
///
/// Speaks the node's `/v1` API. Retries transient failures with exponential
/// backoff and maps "not found" answers to `None`.
#[derive(Clone)]
pub struct RestClient {
    url: String,
    client: reqwest::Client,
    retry_config: RetryConfig,
    api_key: Option<String>,
}

impl RestClient {
    /// Create a new client for the given base URL (e.g. `https://api.testnet.aptoslabs.com/v1`).
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_retry_config(url, RetryConfig::default())
    }

    /// Create a new client with custom retry configuration.
    pub fn with_retry_config(url: impl Into<String>, retry_config: RetryConfig) -> Self {
        let url = url.into();
        Self {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            retry_config,
            api_key: None,
        }
    }

    /// Send `key` as a bearer token with every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Get the base URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Make a request with retries.
    async fn call<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Body>,
    ) -> Result<R, RpcError> {
        let total_attempts = self.retry_config.max_retries + 1;
        let url = if path.is_empty() {
            self.url.clone()
        } else {
            format!("{}/{}", self.url, path)
        };

        for attempt in 0..total_attempts {
            debug!(%method, %url, attempt, "REST request");

            match self.try_call::<R>(method.clone(), &url, body.as_ref()).await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < total_attempts - 1 => {
                    let delay = self.retry_config.delay(attempt);
                    warn!(
                        %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying REST request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }

        Err(RpcError::Timeout(total_attempts))
    }

    /// Single attempt at a request.
    async fn try_call<R: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&Body>,
    ) -> Result<R, RpcError> {
        let mut request = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, body.content_type)
                .body(body.bytes.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(parse_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text).map_err(RpcError::Json)
    }

    /// Like [`call`](Self::call), but a "not found" answer becomes `None`.
    async fn call_optional<R: DeserializeOwned>(&self, path: &str) -> Result<Option<R>, RpcError> {
        match self.call(Method::GET, path, None).await {
            Ok(result) => Ok(Some(result)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    // ========================================================================
    // Endpoints
    // ========================================================================

    pub async fn module(
        &self,
        address: AccountAddress,
        name: &str,
    ) -> Result<Option<MoveModuleBytecode>, RpcError> {
        self.call_optional(&format!("accounts/{address}/module/{name}"))
            .await
    }

    pub async fn account(&self, address: AccountAddress) -> Result<Option<AccountData>, RpcError> {
        self.call_optional(&format!("accounts/{address}")).await
    }

    pub async fn ledger_info(&self) -> Result<LedgerInfo, RpcError> {
        self.call(Method::GET, "", None).await
    }

    pub async fn gas_price(&self) -> Result<GasEstimation, RpcError> {
        self.call(Method::GET, "estimate_gas_price", None).await
    }

    /// Execute a BCS-encoded view request.
    pub async fn view_bcs(&self, request: Vec<u8>) -> Result<Vec<serde_json::Value>, RpcError> {
        let body = Body {
            content_type: VIEW_FUNCTION_CONTENT_TYPE,
            bytes: request,
        };
        self.call(Method::POST, "view", Some(body)).await
    }

    /// Submit a BCS-encoded signed transaction.
    pub async fn submit_bcs(&self, signed_transaction: Vec<u8>) -> Result<PendingTransaction, RpcError> {
        let body = Body {
            content_type: SIGNED_TRANSACTION_CONTENT_TYPE,
            bytes: signed_transaction,
        };
        self.call(Method::POST, "transactions", Some(body)).await
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("url", &self.url)
            .field("retry_config", &self.retry_config)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl LedgerClient for RestClient {
    fn get_module<'a>(
        &'a self,
        address: AccountAddress,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<MoveModuleBytecode>, RpcError>> {
        Box::pin(self.module(address, name))
    }

    fn get_account(
        &self,
        address: AccountAddress,
    ) -> BoxFuture<'_, Result<Option<AccountData>, RpcError>> {
        Box::pin(self.account(address))
    }

    fn get_ledger_info(&self) -> BoxFuture<'_, Result<LedgerInfo, RpcError>> {
        Box::pin(self.ledger_info())
    }

    fn estimate_gas_price(&self) -> BoxFuture<'_, Result<GasEstimation, RpcError>> {
        Box::pin(self.gas_price())
    }

    fn view(&self, request: Vec<u8>) -> BoxFuture<'_, Result<Vec<serde_json::Value>, RpcError>> {
        Box::pin(self.view_bcs(request))
    }

    fn submit(
        &self,
        signed_transaction: Vec<u8>,
    ) -> BoxFuture<'_, Result<PendingTransaction, RpcError>> {
        Box::pin(self.submit_bcs(signed_transaction))
    }
}

/// Turn a non-success response into an error.
fn parse_error(status: u16, body: &str) -> RpcError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(error) => RpcError::Api {
            status,
            message: error.message,
            error_code: error.error_code,
            vm_error_code: error.vm_error_code,
        },
        Err(_) => RpcError::network(
            format!("HTTP {status}: {body}"),
            Some(status),
            is_retryable_status(status),
        ),
    }
}

/// Check if an HTTP status code is retryable.
fn is_retryable_status(status: u16) -> bool {
    // 408 Request Timeout, 429 Too Many Requests, and all 5xx
    status == 408 || status == 429 || (500..600).contains(&status)
}
