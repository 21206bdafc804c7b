//! A typed Rust toolkit for building, signing and submitting Aptos transactions.
//!
//! **aptos-kit** turns a Move function call into a signed, submittable
//! transaction: it resolves the function's ABI from the node, checks and
//! BCS-encodes the arguments, fills in the transaction envelope, and produces
//! the authenticators for single, multi-agent and fee-payer transactions.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use aptos_kit::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), aptos_kit::Error> {
//!     let aptos = Aptos::testnet().build();
//!     let alice = Ed25519Account::from_env()?;
//!     let bob: AccountAddress = "0xb0b".parse()?;
//!
//!     let pending = aptos
//!         .transfer(alice.address(), bob, 1_000)
//!         .send(&alice)
//!         .await?;
//!     println!("submitted {}", pending.hash);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Design Principles
//!
//! 1. **Validate before signing**: arguments are checked against the on-chain
//!    ABI, so a malformed call fails locally instead of on chain
//! 2. **Byte-exact encoding**: every wire type serializes to the same BCS the
//!    node hashes and verifies
//! 3. **Composable steps**: the [`Aptos`] client is a convenience; every
//!    pipeline step is also a free function over a [`LedgerClient`]
//!
//! # Core Types
//!
//! - [`AccountAddress`] - 32-byte account address
//! - [`TypeTag`] - Move type, parsed from strings like `"0x1::coin::CoinStore<u64>"`
//! - [`EntryFunctionArgument`] - A typed call argument
//! - [`RawTransaction`], [`SignedTransaction`] - Transaction envelopes
//! - [`PrivateKey`], [`AnyPublicKey`], [`MultiKey`] - Keys
//!
//! # String Parsing
//!
//! ```
//! use aptos_kit::{AccountAddress, FunctionId, TypeTag};
//!
//! let address: AccountAddress = "0x1".parse().unwrap();
//! let function: FunctionId = "0x1::coin::transfer".parse().unwrap();
//! let coin: TypeTag = "0x1::aptos_coin::AptosCoin".parse().unwrap();
//! assert_eq!(function.module.address, address);
//! assert_eq!(coin, TypeTag::aptos_coin());
//! ```

pub mod client;
pub mod error;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{
    AbiError, DecodeError, Error, MultiKeyError, ParseAddressError, ParseHexError, ParseKeyError,
    ParseTypeTagError, RpcError, SignerError,
};
pub use types::*;

// Re-export client types
pub use client::{
    Aptos, AptosBuilder, Ed25519Account, EntryFunctionAbi, InputEntryFunctionData, LedgerClient,
    MultiKeyAccount, RestClient, RetryConfig, SIGNED_TRANSACTION_CONTENT_TYPE, Signer,
    SingleKeyAccount, TransactionBuilder, TransactionDefaults, TransactionOptions,
    VIEW_FUNCTION_CONTENT_TYPE, ViewFunctionAbi, ViewRequest, assemble_signed_transaction,
    build_raw_transaction, fetch_entry_function_abi, fetch_function, fetch_view_function_abi,
    generate_transaction_payload, generate_transaction_payload_with_abi, generate_view_function,
    sign_as_fee_payer, sign_transaction, submit_transaction, view,
};
