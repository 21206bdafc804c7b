//! Move type tags.
//!
//! A [`TypeTag`] names a Move type: a primitive, a vector, a struct with
//! optional type arguments, a generic placeholder (`T0`, `T1`, …) or a
//! reference (`&signer`). Tags parse from and render to the canonical string
//! grammar:
//!
//! ```text
//! type     := primitive | "vector<" type ">" | struct | generic | "&" type
//! struct   := address "::" module "::" name [ "<" type { "," type } ">" ]
//! generic  := "T" digits
//! ```
//!
//! Whitespace is allowed around `<`, `>` and `,` but not inside a name.
//! Nesting (type argument lists plus references) is capped at
//! [`MAX_TYPE_TAG_DEPTH`] levels.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use super::AccountAddress;
use crate::error::ParseTypeTagError;

/// Deepest nesting of `<` and `&` the parser accepts.
pub const MAX_TYPE_TAG_DEPTH: usize = 64;

/// A Move type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
    /// Placeholder for the n-th type parameter of a generic function.
    Generic(u16),
    Reference(Box<TypeTag>),
}

impl TypeTag {
    /// Parse a type string, rejecting generic placeholders.
    pub fn parse(input: &str) -> Result<Self, ParseTypeTagError> {
        parse_type_tag(input, false)
    }

    /// Parse a type string that may contain generic placeholders, as found in function ABIs.
    pub fn parse_with_generics(input: &str) -> Result<Self, ParseTypeTagError> {
        parse_type_tag(input, true)
    }

    pub fn vector(inner: TypeTag) -> Self {
        TypeTag::Vector(Box::new(inner))
    }

    pub fn reference(inner: TypeTag) -> Self {
        TypeTag::Reference(Box::new(inner))
    }

    /// `0x1::aptos_coin::AptosCoin`.
    pub fn aptos_coin() -> Self {
        TypeTag::Struct(Box::new(StructTag::aptos_coin()))
    }

    pub fn as_struct(&self) -> Option<&StructTag> {
        match self {
            TypeTag::Struct(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn is_signer(&self) -> bool {
        match self {
            TypeTag::Signer => true,
            TypeTag::Reference(inner) => inner.is_signer(),
            _ => false,
        }
    }

    /// True if the tag contains a generic placeholder anywhere.
    pub fn has_generics(&self) -> bool {
        match self {
            TypeTag::Generic(_) => true,
            TypeTag::Vector(inner) | TypeTag::Reference(inner) => inner.has_generics(),
            TypeTag::Struct(tag) => tag.type_args.iter().any(TypeTag::has_generics),
            _ => false,
        }
    }
}

impl FromStr for TypeTag {
    type Err = ParseTypeTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::U8 => f.write_str("u8"),
            TypeTag::U16 => f.write_str("u16"),
            TypeTag::U32 => f.write_str("u32"),
            TypeTag::U64 => f.write_str("u64"),
            TypeTag::U128 => f.write_str("u128"),
            TypeTag::U256 => f.write_str("u256"),
            TypeTag::Address => f.write_str("address"),
            TypeTag::Signer => f.write_str("signer"),
            TypeTag::Vector(inner) => write!(f, "vector<{}>", inner),
            TypeTag::Struct(tag) => Display::fmt(tag, f),
            TypeTag::Generic(index) => write!(f, "T{}", index),
            TypeTag::Reference(inner) => write!(f, "&{}", inner),
        }
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            return s.serialize_str(&self.to_string());
        }
        match self {
            TypeTag::Bool => s.serialize_unit_variant("TypeTag", 0, "bool"),
            TypeTag::U8 => s.serialize_unit_variant("TypeTag", 1, "u8"),
            TypeTag::U64 => s.serialize_unit_variant("TypeTag", 2, "u64"),
            TypeTag::U128 => s.serialize_unit_variant("TypeTag", 3, "u128"),
            TypeTag::Address => s.serialize_unit_variant("TypeTag", 4, "address"),
            TypeTag::Signer => s.serialize_unit_variant("TypeTag", 5, "signer"),
            TypeTag::Vector(inner) => s.serialize_newtype_variant("TypeTag", 6, "vector", inner),
            TypeTag::Struct(tag) => s.serialize_newtype_variant("TypeTag", 7, "struct", tag),
            TypeTag::U16 => s.serialize_unit_variant("TypeTag", 8, "u16"),
            TypeTag::U32 => s.serialize_unit_variant("TypeTag", 9, "u32"),
            TypeTag::U256 => s.serialize_unit_variant("TypeTag", 10, "u256"),
            TypeTag::Generic(_) | TypeTag::Reference(_) => Err(S::Error::custom(format!(
                "type '{}' cannot be encoded",
                self
            ))),
        }
    }
}

/// A fully qualified struct type: `address::module::Name<type_args>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct StructTag {
    pub address: AccountAddress,
    pub module: String,
    pub name: String,
    pub type_args: Vec<TypeTag>,
}

impl StructTag {
    pub fn new(
        address: AccountAddress,
        module: impl Into<String>,
        name: impl Into<String>,
        type_args: Vec<TypeTag>,
    ) -> Self {
        Self {
            address,
            module: module.into(),
            name: name.into(),
            type_args,
        }
    }

    pub fn aptos_coin() -> Self {
        Self::new(AccountAddress::ONE, "aptos_coin", "AptosCoin", vec![])
    }

    /// `0x1::string::String`.
    pub fn string() -> Self {
        Self::new(AccountAddress::ONE, "string", "String", vec![])
    }

    /// `0x1::option::Option<T>`.
    pub fn option(inner: TypeTag) -> Self {
        Self::new(AccountAddress::ONE, "option", "Option", vec![inner])
    }

    /// `0x1::object::Object<T>`.
    pub fn object(inner: TypeTag) -> Self {
        Self::new(AccountAddress::ONE, "object", "Object", vec![inner])
    }

    fn is(&self, module: &str, name: &str) -> bool {
        self.address == AccountAddress::ONE && self.module == module && self.name == name
    }

    pub fn is_string(&self) -> bool {
        self.is("string", "String") && self.type_args.is_empty()
    }

    pub fn is_option(&self) -> bool {
        self.is("option", "Option") && self.type_args.len() == 1
    }

    pub fn is_object(&self) -> bool {
        self.is("object", "Object") && self.type_args.len() == 1
    }
}

impl Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.address, self.module, self.name)?;
        if let Some((first, rest)) = self.type_args.split_first() {
            write!(f, "<{}", first)?;
            for arg in rest {
                write!(f, ", {}", arg)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl From<StructTag> for TypeTag {
    fn from(tag: StructTag) -> Self {
        TypeTag::Struct(Box::new(tag))
    }
}

// ============================================================================
// Parser
// ============================================================================

/// An open `<` waiting for its `>`.
struct Frame {
    /// The name the argument list belongs to.
    owner: String,
    /// Completed siblings of `owner` in the enclosing list.
    outer_args: Vec<TypeTag>,
    /// Nesting depth of the enclosing list.
    outer_depth: usize,
}

/// Parse a Move type string.
///
/// With `allow_generics` false, `T0`-style placeholders are rejected with
/// [`ParseTypeTagError::UnexpectedGenericType`].
///
/// ```
/// use aptos_kit::{parse_type_tag, TypeTag};
///
/// let tag = parse_type_tag("vector<u8>", false).unwrap();
/// assert_eq!(tag, TypeTag::vector(TypeTag::U8));
/// assert!(parse_type_tag("vector<u8, u8>", false).is_err());
/// ```
pub fn parse_type_tag(input: &str, allow_generics: bool) -> Result<TypeTag, ParseTypeTagError> {
    let mut stack: Vec<Frame> = Vec::new();
    // Completed arguments of the innermost open list.
    let mut args: Vec<TypeTag> = Vec::new();
    // Name being read, and the type arguments attached to it once its `>` closed.
    let mut current = String::new();
    let mut current_args: Vec<TypeTag> = Vec::new();
    let mut closed = false;
    let mut pending_space = false;
    let mut depth = 0;

    for c in input.chars() {
        match c {
            '<' => {
                if current.is_empty() || closed {
                    return Err(ParseTypeTagError::InvalidTypeTag(input.to_string()));
                }
                let inner_depth = depth + reference_count(&current) + 1;
                if inner_depth > MAX_TYPE_TAG_DEPTH {
                    return Err(ParseTypeTagError::TooDeeplyNested(input.to_string()));
                }
                stack.push(Frame {
                    owner: std::mem::take(&mut current),
                    outer_args: std::mem::take(&mut args),
                    outer_depth: depth,
                });
                depth = inner_depth;
                pending_space = false;
            }
            ',' => {
                if stack.is_empty() {
                    return Err(ParseTypeTagError::UnexpectedComma(input.to_string()));
                }
                if current.is_empty() {
                    return Err(ParseTypeTagError::MissingTypeArgument(input.to_string()));
                }
                args.push(finish_token(
                    &std::mem::take(&mut current),
                    std::mem::take(&mut current_args),
                    allow_generics,
                )?);
                closed = false;
                pending_space = false;
            }
            '>' => {
                let Some(frame) = stack.pop() else {
                    return Err(ParseTypeTagError::UnexpectedTypeArgumentClose(
                        input.to_string(),
                    ));
                };
                if current.is_empty() {
                    return Err(ParseTypeTagError::MissingTypeArgument(input.to_string()));
                }
                args.push(finish_token(
                    &std::mem::take(&mut current),
                    std::mem::take(&mut current_args),
                    allow_generics,
                )?);
                current = frame.owner;
                current_args = std::mem::replace(&mut args, frame.outer_args);
                depth = frame.outer_depth;
                closed = true;
                pending_space = false;
            }
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    pending_space = true;
                }
            }
            c => {
                if closed {
                    return Err(ParseTypeTagError::InvalidTypeTag(input.to_string()));
                }
                if pending_space {
                    return Err(ParseTypeTagError::UnexpectedWhitespaceCharacter(
                        input.to_string(),
                    ));
                }
                if c == '&' && depth + reference_count(&current) + 1 > MAX_TYPE_TAG_DEPTH {
                    return Err(ParseTypeTagError::TooDeeplyNested(input.to_string()));
                }
                current.push(c);
            }
        }
    }

    if !stack.is_empty() {
        return Err(ParseTypeTagError::MissingTypeArgumentClose(input.to_string()));
    }
    if current.is_empty() {
        return Err(ParseTypeTagError::InvalidTypeTag(input.to_string()));
    }
    finish_token(&current, current_args, allow_generics)
}

/// Turn a name and its type arguments into a tag.
fn finish_token(
    name: &str,
    type_args: Vec<TypeTag>,
    allow_generics: bool,
) -> Result<TypeTag, ParseTypeTagError> {
    let primitive = match name {
        "bool" => Some(TypeTag::Bool),
        "u8" => Some(TypeTag::U8),
        "u16" => Some(TypeTag::U16),
        "u32" => Some(TypeTag::U32),
        "u64" => Some(TypeTag::U64),
        "u128" => Some(TypeTag::U128),
        "u256" => Some(TypeTag::U256),
        "address" => Some(TypeTag::Address),
        "signer" => Some(TypeTag::Signer),
        _ => None,
    };
    if let Some(tag) = primitive {
        if !type_args.is_empty() {
            return Err(ParseTypeTagError::UnexpectedPrimitiveTypeArguments(
                name.to_string(),
            ));
        }
        return Ok(tag);
    }

    let references = reference_count(name);
    if references > 0 {
        let mut tag = finish_token(&name[references..], type_args, allow_generics)?;
        for _ in 0..references {
            tag = TypeTag::reference(tag);
        }
        return Ok(tag);
    }

    if name == "vector" {
        let mut type_args = type_args;
        return match (type_args.pop(), type_args.is_empty()) {
            (Some(inner), true) => Ok(TypeTag::vector(inner)),
            _ => Err(ParseTypeTagError::UnexpectedVectorTypeArgumentCount(
                name.to_string(),
            )),
        };
    }

    if let Some(index) = generic_index(name) {
        if !allow_generics {
            return Err(ParseTypeTagError::UnexpectedGenericType(name.to_string()));
        }
        if !type_args.is_empty() {
            return Err(ParseTypeTagError::UnexpectedPrimitiveTypeArguments(
                name.to_string(),
            ));
        }
        return index
            .parse()
            .map(TypeTag::Generic)
            .map_err(|_| ParseTypeTagError::InvalidTypeTag(name.to_string()));
    }

    if name.contains("::") {
        return parse_struct(name, type_args).map(TypeTag::from);
    }

    Err(ParseTypeTagError::InvalidTypeTag(name.to_string()))
}

/// Number of leading `&` in a name.
fn reference_count(name: &str) -> usize {
    name.bytes().take_while(|&b| b == b'&').count()
}

/// The digits of a `T<digits>` placeholder.
fn generic_index(name: &str) -> Option<&str> {
    name.strip_prefix('T')
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_struct(name: &str, type_args: Vec<TypeTag>) -> Result<StructTag, ParseTypeTagError> {
    let parts: Vec<&str> = name.split("::").collect();
    let [address, module, struct_name] = parts.as_slice() else {
        return Err(ParseTypeTagError::UnexpectedStructFormat(name.to_string()));
    };

    let address = AccountAddress::from_str_relaxed(address)
        .map_err(|_| ParseTypeTagError::InvalidAddress(address.to_string()))?;
    if !is_identifier(module) {
        return Err(ParseTypeTagError::InvalidModuleNameCharacter(
            module.to_string(),
        ));
    }
    if !is_identifier(struct_name) {
        return Err(ParseTypeTagError::InvalidStructNameCharacter(
            struct_name.to_string(),
        ));
    }

    Ok(StructTag::new(address, *module, *struct_name, type_args))
}

/// Move identifiers: non-empty, ASCII alphanumerics and underscores.
pub(crate) fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
