//! Transaction payloads and entry-function arguments.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::encoding::{encode_bytes, write_uleb128};
use super::type_tag::is_identifier;
use super::{AccountAddress, TypeTag};
use crate::error::AbiError;

/// A module on chain: `address::name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ModuleId {
    pub address: AccountAddress,
    pub name: String,
}

impl ModuleId {
    pub fn new(address: AccountAddress, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
        }
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.address, self.name)
    }
}

/// A fully qualified function: `address::module::function`.
///
/// ```
/// use aptos_kit::FunctionId;
///
/// let id: FunctionId = "0x1::aptos_account::transfer".parse().unwrap();
/// assert_eq!(id.module.name, "aptos_account");
/// assert_eq!(id.name, "transfer");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId {
    pub module: ModuleId,
    pub name: String,
}

impl FunctionId {
    pub fn new(module: ModuleId, name: impl Into<String>) -> Self {
        Self {
            module,
            name: name.into(),
        }
    }
}

impl FromStr for FunctionId {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AbiError::InvalidFunctionId(s.to_string());
        let parts: Vec<&str> = s.split("::").collect();
        let [address, module, function] = parts.as_slice() else {
            return Err(invalid());
        };
        let address = AccountAddress::from_str_relaxed(address).map_err(|_| invalid())?;
        if !is_identifier(module) || !is_identifier(function) {
            return Err(invalid());
        }
        Ok(Self::new(ModuleId::new(address, *module), *function))
    }
}

impl TryFrom<&str> for FunctionId {
    type Error = AbiError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module, self.name)
    }
}

/// A call to a public entry function, with pre-encoded arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EntryFunction {
    module: ModuleId,
    function: String,
    ty_args: Vec<TypeTag>,
    args: Vec<Vec<u8>>,
}

impl EntryFunction {
    pub fn new(function: FunctionId, ty_args: Vec<TypeTag>, args: Vec<Vec<u8>>) -> Self {
        Self {
            module: function.module,
            function: function.name,
            ty_args,
            args,
        }
    }

    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn ty_args(&self) -> &[TypeTag] {
        &self.ty_args
    }

    pub fn args(&self) -> &[Vec<u8>] {
        &self.args
    }
}

/// A read-only call to a view function. Same wire shape as [`EntryFunction`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewFunction {
    module: ModuleId,
    function: String,
    ty_args: Vec<TypeTag>,
    args: Vec<Vec<u8>>,
}

impl ViewFunction {
    pub fn new(function: FunctionId, ty_args: Vec<TypeTag>, args: Vec<Vec<u8>>) -> Self {
        Self {
            module: function.module,
            function: function.name,
            ty_args,
            args,
        }
    }
}

/// What a transaction executes.
///
/// Only entry-function calls are built by this crate. On the wire the
/// variant ordinals are Script = 0, ModuleBundle = 1, EntryFunction = 2,
/// Multisig = 3.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransactionPayload {
    EntryFunction(EntryFunction),
}

impl TransactionPayload {
    const ENTRY_FUNCTION_ORDINAL: u32 = 2;
}

impl From<EntryFunction> for TransactionPayload {
    fn from(function: EntryFunction) -> Self {
        TransactionPayload::EntryFunction(function)
    }
}

impl Serialize for TransactionPayload {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            TransactionPayload::EntryFunction(function) => s.serialize_newtype_variant(
                "TransactionPayload",
                Self::ENTRY_FUNCTION_ORDINAL,
                "EntryFunction",
                function,
            ),
        }
    }
}

// ============================================================================
// Arguments
// ============================================================================

/// An unsigned 256-bit integer, stored little-endian as on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct U256([u8; 32]);

impl U256 {
    pub const fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_le_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        Self(bytes)
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        Self::from(u128::from(value))
    }
}

/// A typed argument to an entry or view function.
///
/// Each variant knows its wire encoding and which Move parameter types it
/// can satisfy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryFunctionArgument {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    Address(AccountAddress),
    /// A `0x1::string::String`.
    String(String),
    /// A `vector<u8>`.
    Bytes(Vec<u8>),
    Vector(Vec<EntryFunctionArgument>),
    /// A `0x1::option::Option<T>`.
    Option(Option<Box<EntryFunctionArgument>>),
    /// Bytes already in wire form. Accepted for any parameter type.
    Raw(Vec<u8>),
}

impl EntryFunctionArgument {
    /// Wire encoding of this argument.
    pub fn to_bcs_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_bcs(&mut out);
        out
    }

    fn write_bcs(&self, out: &mut Vec<u8>) {
        match self {
            EntryFunctionArgument::Bool(v) => out.push(u8::from(*v)),
            EntryFunctionArgument::U8(v) => out.push(*v),
            EntryFunctionArgument::U16(v) => out.extend_from_slice(&v.to_le_bytes()),
            EntryFunctionArgument::U32(v) => out.extend_from_slice(&v.to_le_bytes()),
            EntryFunctionArgument::U64(v) => out.extend_from_slice(&v.to_le_bytes()),
            EntryFunctionArgument::U128(v) => out.extend_from_slice(&v.to_le_bytes()),
            EntryFunctionArgument::U256(v) => out.extend_from_slice(&v.0),
            EntryFunctionArgument::Address(v) => out.extend_from_slice(v.as_bytes()),
            EntryFunctionArgument::String(v) => out.extend(encode_bytes(v.as_bytes())),
            EntryFunctionArgument::Bytes(v) => out.extend(encode_bytes(v)),
            EntryFunctionArgument::Vector(items) => {
                write_uleb128(out, items.len() as u64);
                for item in items {
                    item.write_bcs(out);
                }
            }
            // An option is a vector of zero or one element.
            EntryFunctionArgument::Option(None) => write_uleb128(out, 0),
            EntryFunctionArgument::Option(Some(item)) => {
                write_uleb128(out, 1);
                item.write_bcs(out);
            }
            EntryFunctionArgument::Raw(bytes) => out.extend_from_slice(bytes),
        }
    }

    /// Short description of the argument's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            EntryFunctionArgument::Bool(_) => "bool",
            EntryFunctionArgument::U8(_) => "u8",
            EntryFunctionArgument::U16(_) => "u16",
            EntryFunctionArgument::U32(_) => "u32",
            EntryFunctionArgument::U64(_) => "u64",
            EntryFunctionArgument::U128(_) => "u128",
            EntryFunctionArgument::U256(_) => "u256",
            EntryFunctionArgument::Address(_) => "address",
            EntryFunctionArgument::String(_) => "string",
            EntryFunctionArgument::Bytes(_) => "bytes",
            EntryFunctionArgument::Vector(_) => "vector",
            EntryFunctionArgument::Option(_) => "option",
            EntryFunctionArgument::Raw(_) => "raw",
        }
    }

    /// Whether this argument can be passed for a parameter of type `param`.
    ///
    /// Generic parameters accept anything; their instantiation is checked on chain.
    pub fn matches(&self, param: &TypeTag) -> bool {
        use EntryFunctionArgument as Arg;

        match (self, param) {
            (Arg::Raw(_), _) | (_, TypeTag::Generic(_)) => true,
            (Arg::Bool(_), TypeTag::Bool)
            | (Arg::U8(_), TypeTag::U8)
            | (Arg::U16(_), TypeTag::U16)
            | (Arg::U32(_), TypeTag::U32)
            | (Arg::U64(_), TypeTag::U64)
            | (Arg::U128(_), TypeTag::U128)
            | (Arg::U256(_), TypeTag::U256)
            | (Arg::Address(_), TypeTag::Address) => true,
            (Arg::Bytes(_), TypeTag::Vector(inner)) => **inner == TypeTag::U8,
            (Arg::Vector(items), TypeTag::Vector(inner)) => {
                items.iter().all(|item| item.matches(inner))
            }
            (Arg::String(_), TypeTag::Struct(tag)) => tag.is_string(),
            (Arg::Address(_), TypeTag::Struct(tag)) => tag.is_object(),
            (Arg::Option(item), TypeTag::Struct(tag)) if tag.is_option() => match item {
                None => true,
                Some(item) => item.matches(&tag.type_args[0]),
            },
            _ => false,
        }
    }
}

macro_rules! argument_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for EntryFunctionArgument {
                fn from(value: $ty) -> Self {
                    EntryFunctionArgument::$variant(value)
                }
            }
        )*
    };
}

argument_from! {
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    U256 => U256,
    AccountAddress => Address,
    String => String,
    Vec<u8> => Bytes,
}

impl From<&str> for EntryFunctionArgument {
    fn from(value: &str) -> Self {
        EntryFunctionArgument::String(value.to_string())
    }
}

impl<T: Into<EntryFunctionArgument>> From<Option<T>> for EntryFunctionArgument {
    fn from(value: Option<T>) -> Self {
        EntryFunctionArgument::Option(value.map(|v| Box::new(v.into())))
    }
}
