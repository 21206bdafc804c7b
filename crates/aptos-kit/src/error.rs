//! Error types for aptos-kit.
//!
//! Every fallible operation in the crate returns one of these types. Nothing
//! on an input-dependent path panics.
//!
//! # Error Hierarchy
//!
//! - [`Error`](enum@Error) - Main error type, returned by most operations
//!   - [`ParseHexError`] - Malformed hex input
//!   - [`ParseAddressError`] - Malformed account address
//!   - [`ParseTypeTagError`] - Malformed Move type string
//!   - [`ParseKeyError`] - Invalid key or signature material
//!   - [`DecodeError`] - Malformed ULEB128 input
//!   - [`MultiKeyError`] - Multi-key construction and bitmap failures
//!   - [`AbiError`] - Function resolution and argument validation failures
//!   - [`SignerError`] - Signing operation failures
//!   - [`RpcError`] - REST transport and node errors
//!
//! # Error Handling Examples
//!
//! ```rust,no_run
//! use aptos_kit::*;
//!
//! # async fn example() -> Result<(), Error> {
//! let aptos = Aptos::testnet().build();
//!
//! match aptos.entry_function_abi(&"0x1::coin::nope".parse()?).await {
//!     Ok(abi) => println!("{} parameters", abi.parameters.len()),
//!     Err(Error::Abi(AbiError::FunctionNotFound { function, .. })) => {
//!         println!("{function} does not exist");
//!     }
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

use crate::types::MAX_TYPE_TAG_DEPTH;

/// Error decoding a hex string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseHexError {
    #[error("Hex string '{0}' has an odd number of characters")]
    InvalidLength(String),

    #[error("Hex string '{0}' contains invalid characters")]
    InvalidHexChars(String),
}

/// Error parsing an account address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseAddressError {
    #[error("Address '{0}' must start with '0x'")]
    LeadingZeroXRequired(String),

    #[error("Address '{0}' must be in long form (64 hex characters) unless it is a special address")]
    LongFormRequiredUnlessSpecial(String),

    #[error("Special address '{0}' must not carry padding zeroes")]
    InvalidPaddingZeroes(String),

    #[error("Address '{0}' is too short (min 1 hex character)")]
    TooShort(String),

    #[error("Address '{0}' is too long (max 64 hex characters)")]
    TooLong(String),

    #[error("Address '{0}' contains invalid hex characters")]
    InvalidHexChars(String),

    #[error("Invalid address length: expected 32 bytes, got {0}")]
    InvalidLength(usize),
}

/// Error parsing a Move type string.
///
/// Each variant carries the substring that triggered it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseTypeTagError {
    #[error("Invalid type tag '{0}'")]
    InvalidTypeTag(String),

    #[error("Generic type '{0}' is not allowed here")]
    UnexpectedGenericType(String),

    #[error("Unexpected '>' in '{0}'")]
    UnexpectedTypeArgumentClose(String),

    #[error("Unexpected whitespace in '{0}'")]
    UnexpectedWhitespaceCharacter(String),

    #[error("Unexpected ',' in '{0}'")]
    UnexpectedComma(String),

    #[error("Missing '>' in '{0}'")]
    MissingTypeArgumentClose(String),

    #[error("Missing type argument in '{0}'")]
    MissingTypeArgument(String),

    #[error("Type '{0}' does not take type arguments")]
    UnexpectedPrimitiveTypeArguments(String),

    #[error("Vector '{0}' takes exactly one type argument")]
    UnexpectedVectorTypeArgumentCount(String),

    #[error("Struct '{0}' must have the form 'address::module::Name'")]
    UnexpectedStructFormat(String),

    #[error("Invalid module name '{0}'")]
    InvalidModuleNameCharacter(String),

    #[error("Invalid struct name '{0}'")]
    InvalidStructNameCharacter(String),

    #[error("Invalid address '{0}' in struct type")]
    InvalidAddress(String),

    #[error("Type '{0}' is nested deeper than {max} levels", max = MAX_TYPE_TAG_DEPTH)]
    TooDeeplyNested(String),
}

/// Error parsing or constructing key and signature material.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseKeyError {
    #[error("Invalid key format: '{0}'")]
    InvalidFormat(String),

    #[error("Invalid hex in key: {0}")]
    InvalidHex(#[from] ParseHexError),

    #[error("Invalid key length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid curve point: key bytes do not represent a valid point on the curve")]
    InvalidCurvePoint,

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Unsupported signature scheme: {0}")]
    UnsupportedScheme(String),
}

/// Error decoding a ULEB128 integer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("ULEB128 input ended before the last byte")]
    UnexpectedEnd,

    #[error("ULEB128 value does not fit in 64 bits")]
    Overflow,

    #[error("ULEB128 encoding is not canonical")]
    NonCanonical,
}

/// Error building or using a multi-key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MultiKeyError {
    #[error("Multi-key accepts at most {max} keys, got {actual}")]
    TooManyKeys { max: usize, actual: usize },

    #[error("Threshold {threshold} is invalid for {keys} keys")]
    InvalidThreshold { threshold: u8, keys: usize },

    #[error("{signers} signers exceed the {keys} available keys")]
    TooManySigners { signers: usize, keys: usize },

    #[error("Bit {0} is out of range")]
    BitOutOfRange(u8),

    #[error("Bit {0} is set more than once")]
    DuplicateBit(u8),

    #[error("Bitmap must be {expected} bytes, got {actual}")]
    InvalidBitmapLength { expected: usize, actual: usize },

    #[error("Multi-key signature carries at most {max} signatures, got {actual}")]
    TooManySignatures { max: usize, actual: usize },

    #[error("Bitmap has {bits} bits set but {signatures} signatures were given")]
    SignatureCountMismatch { bits: u32, signatures: usize },

    #[error("{signers} signers cannot reach threshold {threshold}")]
    NotEnoughSigners { signers: usize, threshold: u8 },

    #[error("Public key {0} is not part of the multi-key")]
    NotFound(String),
}

/// Error resolving a function ABI or validating arguments against it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AbiError {
    #[error("Invalid function id '{0}': expected 'address::module::function'")]
    InvalidFunctionId(String),

    #[error("Module {0} not found")]
    ModuleNotFound(String),

    #[error("Module {0} has no ABI")]
    MissingAbi(String),

    #[error("Function {function} not found in module {module}")]
    FunctionNotFound { module: String, function: String },

    #[error("Function {0} is not an entry function")]
    NotAnEntryFunction(String),

    #[error("Function {0} is not a view function")]
    NotAViewFunction(String),

    #[error("{function} expects {expected} type arguments, got {actual}")]
    TypeArgumentCountMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("{function} expects {expected} arguments, got {actual}")]
    ArgumentCountMismatch {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("Argument {position} of {function} must be {expected}, got {actual}")]
    ArgumentTypeMismatch {
        function: String,
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("Invalid type in ABI of {function}: {source}")]
    InvalidAbiType {
        function: String,
        source: ParseTypeTagError,
    },
}

/// Error during signing operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SignerError {
    #[error("Invalid seed phrase")]
    InvalidSeedPhrase,

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Unsupported signing operation: {0}")]
    Unsupported(String),

    #[error(transparent)]
    MultiKey(#[from] MultiKeyError),
}

// ============================================================================
// RPC Errors
// ============================================================================

/// REST transport and node errors.
#[derive(Debug, Error)]
pub enum RpcError {
    // ─── Network/Transport ───
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        retryable: bool,
    },

    #[error("Timeout after {0} retries")]
    Timeout(u32),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // ─── Node API Error ───
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        error_code: Option<String>,
        vm_error_code: Option<u64>,
    },
}

impl RpcError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            RpcError::Http(e) => e.is_timeout() || e.is_connect(),
            RpcError::Timeout(_) => true,
            RpcError::Network { retryable, .. } => *retryable,
            RpcError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>, status_code: Option<u16>, retryable: bool) -> Self {
        RpcError::Network {
            message: message.into(),
            status_code,
            retryable,
        }
    }

    /// Returns true if the node reported that the requested resource does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            RpcError::Api {
                status, error_code, ..
            } => {
                *status == 404
                    || error_code
                        .as_deref()
                        .is_some_and(|code| code.ends_with("_not_found"))
            }
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    // ─── Configuration ───
    #[error("Invalid configuration: {0}")]
    Config(String),

    // ─── Parsing ───
    #[error(transparent)]
    ParseHex(#[from] ParseHexError),

    #[error(transparent)]
    ParseAddress(#[from] ParseAddressError),

    #[error(transparent)]
    ParseTypeTag(#[from] ParseTypeTagError),

    #[error(transparent)]
    ParseKey(#[from] ParseKeyError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    // ─── Construction ───
    #[error(transparent)]
    MultiKey(#[from] MultiKeyError),

    #[error(transparent)]
    Abi(#[from] AbiError),

    // ─── RPC ───
    #[error(transparent)]
    Rpc(#[from] RpcError),

    // ─── Transaction ───
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    // ─── Signing ───
    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    // ─── Serialization ───
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("BCS error: {0}")]
    Bcs(String),
}

impl From<bcs::Error> for Error {
    fn from(e: bcs::Error) -> Self {
        Error::Bcs(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // ParseAddressError tests
    // ========================================================================

    #[test]
    fn test_parse_address_error_display() {
        assert_eq!(
            ParseAddressError::LeadingZeroXRequired("1".to_string()).to_string(),
            "Address '1' must start with '0x'"
        );
        assert_eq!(
            ParseAddressError::InvalidPaddingZeroes("0x01".to_string()).to_string(),
            "Special address '0x01' must not carry padding zeroes"
        );
        assert_eq!(
            ParseAddressError::InvalidLength(31).to_string(),
            "Invalid address length: expected 32 bytes, got 31"
        );
    }

    // ========================================================================
    // ParseTypeTagError tests
    // ========================================================================

    #[test]
    fn test_parse_type_tag_error_display() {
        assert_eq!(
            ParseTypeTagError::UnexpectedVectorTypeArgumentCount("vector".to_string()).to_string(),
            "Vector 'vector' takes exactly one type argument"
        );
        assert_eq!(
            ParseTypeTagError::UnexpectedPrimitiveTypeArguments("u8".to_string()).to_string(),
            "Type 'u8' does not take type arguments"
        );
    }

    // ========================================================================
    // MultiKeyError tests
    // ========================================================================

    #[test]
    fn test_multi_key_error_display() {
        assert_eq!(
            MultiKeyError::SignatureCountMismatch {
                bits: 2,
                signatures: 1
            }
            .to_string(),
            "Bitmap has 2 bits set but 1 signatures were given"
        );
        assert_eq!(
            MultiKeyError::DuplicateBit(3).to_string(),
            "Bit 3 is set more than once"
        );
    }

    // ========================================================================
    // AbiError tests
    // ========================================================================

    #[test]
    fn test_abi_error_display() {
        assert_eq!(
            AbiError::ArgumentCountMismatch {
                function: "0x1::coin::transfer".to_string(),
                expected: 2,
                actual: 1,
            }
            .to_string(),
            "0x1::coin::transfer expects 2 arguments, got 1"
        );
        assert_eq!(
            AbiError::NotAViewFunction("0x1::coin::transfer".to_string()).to_string(),
            "Function 0x1::coin::transfer is not a view function"
        );
    }

    // ========================================================================
    // RpcError tests
    // ========================================================================

    #[test]
    fn test_rpc_error_is_retryable() {
        assert!(RpcError::Timeout(3).is_retryable());
        assert!(RpcError::network("reset", Some(503), true).is_retryable());
        assert!(!RpcError::network("bad", Some(400), false).is_retryable());
        assert!(
            RpcError::Api {
                status: 503,
                message: "unavailable".to_string(),
                error_code: None,
                vm_error_code: None,
            }
            .is_retryable()
        );
        assert!(!RpcError::InvalidResponse("x".to_string()).is_retryable());
    }

    #[test]
    fn test_rpc_error_is_not_found() {
        let err = RpcError::Api {
            status: 404,
            message: "Account not found".to_string(),
            error_code: Some("account_not_found".to_string()),
            vm_error_code: None,
        };
        assert!(err.is_not_found());
        assert!(!err.is_retryable());

        let err = RpcError::Api {
            status: 400,
            message: "Module not found".to_string(),
            error_code: Some("module_not_found".to_string()),
            vm_error_code: None,
        };
        assert!(err.is_not_found());
    }

    // ========================================================================
    // Error conversion tests
    // ========================================================================

    #[test]
    fn test_error_from_parse_errors() {
        let err: Error = ParseHexError::InvalidLength("0xabc".to_string()).into();
        assert!(matches!(err, Error::ParseHex(_)));
        assert_eq!(err.to_string(), "Hex string '0xabc' has an odd number of characters");

        let err: Error = SignerError::SigningFailed("boom".to_string()).into();
        assert_eq!(err.to_string(), "Signing failed: Signing failed: boom");
    }
}
