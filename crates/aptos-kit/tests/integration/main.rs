//! Integration tests for aptos-kit.
//!
//! These tests drive the full build, sign and submit pipeline against an
//! in-memory ledger, so they need no running node.
//!
//! Run with: `cargo test --test integration`

mod mock;

mod abi_errors;
mod transaction_flow;
mod view_functions;
