//! Core types for Aptos.
//!
//! Value types for addresses, keys, type tags, payloads and transactions,
//! with their canonical BCS wire layout. Everything here is immutable once
//! constructed and safe to share across threads.

mod abi;
mod address;
mod auth_key;
mod authenticator;
pub mod encoding;
mod hash;
pub mod hex;
mod key;
mod multi_key;
mod network;
mod payload;
mod rpc;
mod transaction;
mod type_tag;

pub use abi::{
    MoveFunction, MoveFunctionGenericTypeParam, MoveFunctionVisibility, MoveModule,
    MoveModuleBytecode, MoveStruct, MoveStructField, MoveStructGenericTypeParam,
};
pub use address::AccountAddress;
pub use auth_key::{
    AuthenticationKey, AuthenticationKeyScheme, create_object_address, create_resource_address,
};
pub use authenticator::{AccountAuthenticator, TransactionAuthenticator};
pub use hash::HashValue;
pub use hex::Hex;
pub use key::{
    AnyPublicKey, AnySignature, DEFAULT_HD_PATH, DEFAULT_WORD_COUNT, Ed25519PrivateKey,
    Ed25519PublicKey, Ed25519Signature, KeyScheme, PrivateKey, PublicKey, Secp256k1PrivateKey,
    Secp256k1PublicKey, Secp256k1Signature, Signature, generate_seed_phrase,
};
pub use multi_key::{BITMAP_LEN, Bitmap, MAX_NUM_OF_KEYS, MultiKey, MultiKeySignature};
pub use network::{DEVNET_URL, LOCAL_URL, MAINNET_URL, Network, TESTNET_URL};
pub use payload::{
    EntryFunction, EntryFunctionArgument, FunctionId, ModuleId, TransactionPayload, U256,
    ViewFunction,
};
pub use rpc::{AccountData, ApiErrorBody, GasEstimation, LedgerInfo, PendingTransaction};
pub use transaction::{
    AnyRawTransaction, ChainId, MultiAgentTransaction, RAW_TRANSACTION_SALT,
    RAW_TRANSACTION_WITH_DATA_SALT, RawTransaction, RawTransactionWithData, SignedTransaction,
    SimpleTransaction, TRANSACTION_SALT,
};
pub use type_tag::{MAX_TYPE_TAG_DEPTH, StructTag, TypeTag, parse_type_tag};
