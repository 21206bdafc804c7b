//! Read-only view function calls.

use tracing::debug;

use super::abi::{ViewFunctionAbi, fetch_view_function_abi};
use super::ledger::LedgerClient;
use crate::error::Error;
use crate::types::{EntryFunctionArgument, FunctionId, TypeTag, ViewFunction, encoding::to_bcs};

/// A view function call.
///
/// # Example
///
/// ```rust,no_run
/// # use aptos_kit::*;
/// # async fn example() -> Result<(), aptos_kit::Error> {
/// let aptos = Aptos::testnet().build();
/// let request = ViewRequest::new("0x1::coin::balance".parse()?)
///     .type_argument(TypeTag::aptos_coin())
///     .argument(AccountAddress::ONE);
/// let result = aptos.view(&request).await?;
/// println!("{result:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewRequest {
    pub function: FunctionId,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<EntryFunctionArgument>,
    /// Pre-fetched signature. When absent it is fetched from the node.
    pub abi: Option<ViewFunctionAbi>,
}

impl ViewRequest {
    pub fn new(function: FunctionId) -> Self {
        Self {
            function,
            type_arguments: Vec::new(),
            arguments: Vec::new(),
            abi: None,
        }
    }

    pub fn type_argument(mut self, type_argument: TypeTag) -> Self {
        self.type_arguments.push(type_argument);
        self
    }

    pub fn argument(mut self, argument: impl Into<EntryFunctionArgument>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    pub fn abi(mut self, abi: ViewFunctionAbi) -> Self {
        self.abi = Some(abi);
        self
    }

    /// Check the call against `abi` and encode it.
    pub fn to_view_function(&self, abi: &ViewFunctionAbi) -> Result<ViewFunction, Error> {
        abi.check(&self.function, &self.type_arguments, &self.arguments)?;
        let args = self
            .arguments
            .iter()
            .map(EntryFunctionArgument::to_bcs_bytes)
            .collect();
        Ok(ViewFunction::new(
            self.function.clone(),
            self.type_arguments.clone(),
            args,
        ))
    }
}

/// Resolve the view function's ABI if needed and build the request.
pub async fn generate_view_function(
    client: &dyn LedgerClient,
    request: &ViewRequest,
) -> Result<ViewFunction, Error> {
    match &request.abi {
        Some(abi) => request.to_view_function(abi),
        None => {
            let abi = fetch_view_function_abi(client, &request.function).await?;
            request.to_view_function(&abi)
        }
    }
}

/// Execute a view function and return its JSON-encoded results.
pub async fn view(
    client: &dyn LedgerClient,
    request: &ViewRequest,
) -> Result<Vec<serde_json::Value>, Error> {
    let function = generate_view_function(client, request).await?;
    debug!(function = %request.function, "view");
    Ok(client.view(to_bcs(&function)?).await?)
}
