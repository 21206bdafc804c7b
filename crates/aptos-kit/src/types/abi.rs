//! Move module interface descriptions, as returned by the node.

use serde::{Deserialize, Serialize};

use super::{AccountAddress, Hex};

/// A module's bytecode and, when the node has it, its interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveModuleBytecode {
    pub bytecode: Hex,
    #[serde(default)]
    pub abi: Option<MoveModule>,
}

/// Interface of a Move module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveModule {
    pub address: AccountAddress,
    pub name: String,
    #[serde(default)]
    pub friends: Vec<String>,
    #[serde(default)]
    pub exposed_functions: Vec<MoveFunction>,
    #[serde(default)]
    pub structs: Vec<MoveStruct>,
}

impl MoveModule {
    /// Find an exposed function by name.
    pub fn function(&self, name: &str) -> Option<&MoveFunction> {
        self.exposed_functions.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveFunctionVisibility {
    Private,
    Public,
    Friend,
}

/// Ability constraints on a generic type parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveFunctionGenericTypeParam {
    #[serde(default)]
    pub constraints: Vec<String>,
}

/// An exposed function. Parameter and return types are type-tag strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveFunction {
    pub name: String,
    pub visibility: MoveFunctionVisibility,
    pub is_entry: bool,
    #[serde(default)]
    pub is_view: bool,
    #[serde(default)]
    pub generic_type_params: Vec<MoveFunctionGenericTypeParam>,
    pub params: Vec<String>,
    #[serde(rename = "return", default)]
    pub return_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStructField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStructGenericTypeParam {
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub is_phantom: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveStruct {
    pub name: String,
    pub is_native: bool,
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub generic_type_params: Vec<MoveStructGenericTypeParam>,
    #[serde(default)]
    pub fields: Vec<MoveStructField>,
}
