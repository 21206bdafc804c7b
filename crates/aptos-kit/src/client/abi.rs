//! Remote ABI resolution.
//!
//! Fetches a module's interface from the node, locates a function, and turns
//! its parameter strings into [`TypeTag`]s so calls can be checked before
//! anything is signed.

use tracing::debug;

use super::ledger::LedgerClient;
use crate::error::{AbiError, Error};
use crate::types::{
    EntryFunctionArgument, FunctionId, MoveFunction, MoveFunctionGenericTypeParam, TypeTag,
    parse_type_tag,
};

/// Resolved signature of an entry function.
///
/// `parameters` excludes the leading `signer`/`&signer` parameters, which the
/// chain fills in from the transaction's signers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFunctionAbi {
    pub type_parameters: Vec<MoveFunctionGenericTypeParam>,
    pub parameters: Vec<TypeTag>,
    /// Number of signer parameters the function takes.
    pub signers: usize,
}

/// Resolved signature of a view function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFunctionAbi {
    pub type_parameters: Vec<MoveFunctionGenericTypeParam>,
    pub parameters: Vec<TypeTag>,
    pub return_types: Vec<TypeTag>,
}

impl EntryFunctionAbi {
    /// Build from a function description, requiring it to be an entry function.
    pub fn from_move_function(id: &FunctionId, function: &MoveFunction) -> Result<Self, AbiError> {
        if !function.is_entry {
            return Err(AbiError::NotAnEntryFunction(id.to_string()));
        }
        let all = parse_types(id, &function.params)?;
        let signers = all.iter().take_while(|param| param.is_signer()).count();
        let parameters = all.into_iter().skip(signers).collect();

        Ok(Self {
            type_parameters: function.generic_type_params.clone(),
            parameters,
            signers,
        })
    }

    /// Check caller-supplied type arguments and arguments against this signature.
    pub fn check(
        &self,
        id: &FunctionId,
        type_arguments: &[TypeTag],
        arguments: &[EntryFunctionArgument],
    ) -> Result<(), AbiError> {
        check_call(
            id,
            self.type_parameters.len(),
            &self.parameters,
            type_arguments,
            arguments,
        )
    }
}

impl ViewFunctionAbi {
    /// Build from a function description, requiring it to be a view function.
    pub fn from_move_function(id: &FunctionId, function: &MoveFunction) -> Result<Self, AbiError> {
        if !function.is_view {
            return Err(AbiError::NotAViewFunction(id.to_string()));
        }
        let parameters = parse_types(id, &function.params)?
            .into_iter()
            .filter(|param| !param.is_signer())
            .collect();
        let return_types = parse_types(id, &function.return_types)?;

        Ok(Self {
            type_parameters: function.generic_type_params.clone(),
            parameters,
            return_types,
        })
    }

    /// Check caller-supplied type arguments and arguments against this signature.
    pub fn check(
        &self,
        id: &FunctionId,
        type_arguments: &[TypeTag],
        arguments: &[EntryFunctionArgument],
    ) -> Result<(), AbiError> {
        check_call(
            id,
            self.type_parameters.len(),
            &self.parameters,
            type_arguments,
            arguments,
        )
    }
}

/// Fetch the description of `id` from the node.
pub async fn fetch_function(
    client: &dyn LedgerClient,
    id: &FunctionId,
) -> Result<MoveFunction, Error> {
    debug!(function = %id, "resolving ABI");

    let module = client
        .get_module(id.module.address, &id.module.name)
        .await?
        .ok_or_else(|| AbiError::ModuleNotFound(id.module.to_string()))?;
    let abi = module
        .abi
        .ok_or_else(|| AbiError::MissingAbi(id.module.to_string()))?;

    abi.exposed_functions
        .into_iter()
        .find(|function| function.name == id.name)
        .ok_or_else(|| {
            AbiError::FunctionNotFound {
                module: id.module.to_string(),
                function: id.name.clone(),
            }
            .into()
        })
}

/// Fetch and resolve the signature of an entry function.
pub async fn fetch_entry_function_abi(
    client: &dyn LedgerClient,
    id: &FunctionId,
) -> Result<EntryFunctionAbi, Error> {
    let function = fetch_function(client, id).await?;
    Ok(EntryFunctionAbi::from_move_function(id, &function)?)
}

/// Fetch and resolve the signature of a view function.
pub async fn fetch_view_function_abi(
    client: &dyn LedgerClient,
    id: &FunctionId,
) -> Result<ViewFunctionAbi, Error> {
    let function = fetch_function(client, id).await?;
    Ok(ViewFunctionAbi::from_move_function(id, &function)?)
}

fn parse_types(id: &FunctionId, types: &[String]) -> Result<Vec<TypeTag>, AbiError> {
    types
        .iter()
        .map(|ty| {
            parse_type_tag(ty, true).map_err(|source| AbiError::InvalidAbiType {
                function: id.to_string(),
                source,
            })
        })
        .collect()
}

fn check_call(
    id: &FunctionId,
    type_parameter_count: usize,
    parameters: &[TypeTag],
    type_arguments: &[TypeTag],
    arguments: &[EntryFunctionArgument],
) -> Result<(), AbiError> {
    if type_arguments.len() != type_parameter_count {
        return Err(AbiError::TypeArgumentCountMismatch {
            function: id.to_string(),
            expected: type_parameter_count,
            actual: type_arguments.len(),
        });
    }
    if arguments.len() != parameters.len() {
        return Err(AbiError::ArgumentCountMismatch {
            function: id.to_string(),
            expected: parameters.len(),
            actual: arguments.len(),
        });
    }
    for (position, (argument, parameter)) in arguments.iter().zip(parameters).enumerate() {
        if !argument.matches(parameter) {
            return Err(AbiError::ArgumentTypeMismatch {
                function: id.to_string(),
                position,
                expected: parameter.to_string(),
                actual: argument.kind().to_string(),
            });
        }
    }
    Ok(())
}
