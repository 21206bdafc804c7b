//! View function calls against the in-memory ledger.

use aptos_kit::encoding::to_bcs;
use aptos_kit::*;
use serde_json::json;

use crate::mock::{self, MockLedger};

#[tokio::test]
async fn test_view_balance() {
    let ledger = MockLedger::with_framework();
    ledger.set_view_result(vec![json!("1000")]);
    let aptos = mock::client(&ledger);

    let request = ViewRequest::new("0x1::coin::balance".parse().unwrap())
        .type_argument(TypeTag::aptos_coin())
        .argument(AccountAddress::ONE);
    let result = aptos.view(&request).await.unwrap();
    assert_eq!(result, vec![json!("1000")]);

    let expected = ViewFunction::new(
        "0x1::coin::balance".parse().unwrap(),
        vec![TypeTag::aptos_coin()],
        vec![AccountAddress::ONE.to_vec()],
    );
    assert_eq!(ledger.views(), vec![to_bcs(&expected).unwrap()]);
}

#[tokio::test]
async fn test_view_function_abi() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);

    let abi = aptos
        .view_function_abi(&"0x1::coin::name".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(abi.type_parameters.len(), 1);
    assert!(abi.parameters.is_empty());
    assert_eq!(abi.return_types, vec![TypeTag::Struct(Box::new(StructTag::string()))]);
}

#[tokio::test]
async fn test_view_with_supplied_abi() {
    let ledger = MockLedger::empty();
    ledger.set_view_result(vec![json!("5")]);
    let aptos = mock::client(&ledger);

    let abi = ViewFunctionAbi {
        type_parameters: vec![],
        parameters: vec![TypeTag::Address],
        return_types: vec![TypeTag::U64],
    };
    let request = ViewRequest::new("0xcafe::vault::balance".parse().unwrap())
        .argument(AccountAddress::ONE)
        .abi(abi);

    assert_eq!(aptos.view(&request).await.unwrap(), vec![json!("5")]);
    assert_eq!(ledger.module_requests(), 0);
}

#[tokio::test]
async fn test_entry_function_is_not_a_view_function() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);

    let request = ViewRequest::new("0x1::aptos_account::transfer".parse().unwrap())
        .argument(AccountAddress::ONE)
        .argument(1u64);
    let err = aptos.view(&request).await.unwrap_err();

    assert!(matches!(err, Error::Abi(AbiError::NotAViewFunction(_))));
    assert!(ledger.views().is_empty());
}

#[tokio::test]
async fn test_view_argument_mismatch() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);

    let request = ViewRequest::new("0x1::coin::balance".parse().unwrap())
        .type_argument(TypeTag::aptos_coin())
        .argument(true);
    let err = aptos.view(&request).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Abi(AbiError::ArgumentTypeMismatch { position: 0, .. })
    ));
    assert!(ledger.views().is_empty());
}
