//! Client module for building and submitting Aptos transactions.
//!
//! This module provides the core client infrastructure:
//!
//! - [`Aptos`] - The main client, the single entry point for most operations
//! - [`AptosBuilder`] - Fluent builder for configuring the client
//! - [`RestClient`] - Low-level REST client with retry logic
//! - [`LedgerClient`] - The read/submit seam the rest of the crate talks to
//!
//! # Signers
//!
//! | Signer | Authenticator |
//! |--------|---------------|
//! | [`Ed25519Account`] | Legacy Ed25519 |
//! | [`SingleKeyAccount`] | Single key (Ed25519 or Secp256k1) |
//! | [`MultiKeyAccount`] | K-of-N multi key |
//!
//! # Transaction Pipeline
//!
//! Each step is also available as a free function for callers that need to
//! hand a transaction between parties:
//!
//! 1. [`generate_transaction_payload`] - resolve the ABI and encode arguments
//! 2. [`build_raw_transaction`] - fill in sequence number, gas and expiry
//! 3. [`sign_transaction`] / [`sign_as_fee_payer`] - produce authenticators
//! 4. [`assemble_signed_transaction`] - combine them into a [`SignedTransaction`](crate::SignedTransaction)
//! 5. [`submit_transaction`] - send it to the node

mod abi;
mod aptos;
mod ledger;
mod rpc;
mod signer;
mod transaction;
mod view;

pub use abi::{
    EntryFunctionAbi, ViewFunctionAbi, fetch_entry_function_abi, fetch_function,
    fetch_view_function_abi,
};
pub use aptos::{Aptos, AptosBuilder};
pub use ledger::LedgerClient;
pub use rpc::{
    RestClient, RetryConfig, SIGNED_TRANSACTION_CONTENT_TYPE, VIEW_FUNCTION_CONTENT_TYPE,
};
pub use signer::{Ed25519Account, MultiKeyAccount, Signer, SingleKeyAccount};
pub use transaction::{
    InputEntryFunctionData, TransactionBuilder, TransactionDefaults, TransactionOptions,
    assemble_signed_transaction, build_raw_transaction, generate_transaction_payload,
    generate_transaction_payload_with_abi, sign_as_fee_payer, sign_transaction,
    submit_transaction,
};
pub use view::{ViewRequest, generate_view_function, view};
