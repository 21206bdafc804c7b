//! The ledger collaborator: everything the kit needs from a node.
//!
//! [`RestClient`](super::RestClient) implements this over HTTP. Tests and
//! callers that want caching or a different transport provide their own.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::RpcError;
use crate::types::{
    AccountAddress, AccountData, GasEstimation, LedgerInfo, MoveModuleBytecode,
    PendingTransaction,
};

/// Read and submit operations against an Aptos node.
///
/// Lookups of things that do not exist resolve to `Ok(None)` rather than an
/// error.
pub trait LedgerClient: Send + Sync {
    /// Fetch a module's bytecode and ABI.
    fn get_module<'a>(
        &'a self,
        address: AccountAddress,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<MoveModuleBytecode>, RpcError>>;

    /// Fetch an account's sequence number and authentication key.
    fn get_account(
        &self,
        address: AccountAddress,
    ) -> BoxFuture<'_, Result<Option<AccountData>, RpcError>>;

    /// Fetch the node's ledger head.
    fn get_ledger_info(&self) -> BoxFuture<'_, Result<LedgerInfo, RpcError>>;

    /// Fetch the node's gas unit price estimate.
    fn estimate_gas_price(&self) -> BoxFuture<'_, Result<GasEstimation, RpcError>>;

    /// Execute a BCS-encoded view function request.
    fn view(&self, request: Vec<u8>) -> BoxFuture<'_, Result<Vec<serde_json::Value>, RpcError>>;

    /// Submit a BCS-encoded signed transaction.
    fn submit(
        &self,
        signed_transaction: Vec<u8>,
    ) -> BoxFuture<'_, Result<PendingTransaction, RpcError>>;
}

impl<T: LedgerClient + ?Sized> LedgerClient for Arc<T> {
    fn get_module<'a>(
        &'a self,
        address: AccountAddress,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<MoveModuleBytecode>, RpcError>> {
        (**self).get_module(address, name)
    }

    fn get_account(
        &self,
        address: AccountAddress,
    ) -> BoxFuture<'_, Result<Option<AccountData>, RpcError>> {
        (**self).get_account(address)
    }

    fn get_ledger_info(&self) -> BoxFuture<'_, Result<LedgerInfo, RpcError>> {
        (**self).get_ledger_info()
    }

    fn estimate_gas_price(&self) -> BoxFuture<'_, Result<GasEstimation, RpcError>> {
        (**self).estimate_gas_price()
    }

    fn view(&self, request: Vec<u8>) -> BoxFuture<'_, Result<Vec<serde_json::Value>, RpcError>> {
        (**self).view(request)
    }

    fn submit(
        &self,
        signed_transaction: Vec<u8>,
    ) -> BoxFuture<'_, Result<PendingTransaction, RpcError>> {
        (**self).submit(signed_transaction)
    }
}
