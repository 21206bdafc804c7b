//! Calls that must be rejected before anything is signed or submitted.

use aptos_kit::*;

use crate::mock::{self, MockLedger};

async fn build_error(ledger: &std::sync::Arc<MockLedger>, builder: TransactionBuilder) -> Error {
    let err = builder.build().await.unwrap_err();
    assert!(ledger.submissions().is_empty());
    err
}

// =============================================================================
// Argument validation
// =============================================================================

#[tokio::test]
async fn test_argument_count_mismatch() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);

    let builder = aptos
        .transaction(alice.address(), "0x1::aptos_account::transfer".parse().unwrap())
        .argument(AccountAddress::ONE);
    let err = build_error(&ledger, builder).await;

    match err {
        Error::Abi(AbiError::ArgumentCountMismatch {
            function,
            expected,
            actual,
        }) => {
            assert_eq!(function, "0x1::aptos_account::transfer");
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("expected ArgumentCountMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_argument_type_mismatch() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);

    let builder = aptos
        .transaction(alice.address(), "0x1::aptos_account::transfer".parse().unwrap())
        .argument(AccountAddress::ONE)
        .argument("one thousand");
    let err = build_error(&ledger, builder).await;

    assert_eq!(
        err.to_string(),
        "Argument 1 of 0x1::aptos_account::transfer must be u64, got string"
    );
}

#[tokio::test]
async fn test_type_argument_count_mismatch() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);

    let builder = aptos
        .transaction(alice.address(), "0x1::coin::transfer".parse().unwrap())
        .argument(AccountAddress::ONE)
        .argument(10u64);
    let err = build_error(&ledger, builder).await;

    assert!(matches!(
        err,
        Error::Abi(AbiError::TypeArgumentCountMismatch {
            expected: 1,
            actual: 0,
            ..
        })
    ));

    let transaction = aptos
        .transaction(alice.address(), "0x1::coin::transfer".parse().unwrap())
        .type_argument("0x1::aptos_coin::AptosCoin".parse().unwrap())
        .argument(AccountAddress::ONE)
        .argument(10u64)
        .build()
        .await
        .unwrap();
    let TransactionPayload::EntryFunction(function) = &transaction.raw_transaction().payload else {
        panic!("expected an entry function payload");
    };
    assert_eq!(function.ty_args(), &[TypeTag::aptos_coin()]);
}

#[tokio::test]
async fn test_nested_argument_mismatch() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);

    let builder = aptos
        .transaction(alice.address(), "0xcafe::escrow::deposit".parse().unwrap())
        .argument(vec![1u8])
        .argument(Some(true));
    let err = build_error(&ledger, builder).await;

    assert!(matches!(
        err,
        Error::Abi(AbiError::ArgumentTypeMismatch { position: 1, .. })
    ));
}

#[tokio::test]
async fn test_raw_argument_accepted() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);

    let transaction = aptos
        .transaction(alice.address(), "0x1::aptos_account::transfer".parse().unwrap())
        .argument(AccountAddress::ONE)
        .argument(EntryFunctionArgument::Raw(7u64.to_le_bytes().to_vec()))
        .build()
        .await
        .unwrap();
    let TransactionPayload::EntryFunction(function) = &transaction.raw_transaction().payload else {
        panic!("expected an entry function payload");
    };
    assert_eq!(function.args()[1], 7u64.to_le_bytes().to_vec());
}

// =============================================================================
// Resolution failures
// =============================================================================

#[tokio::test]
async fn test_module_not_found() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);

    let builder = aptos.transaction(alice.address(), "0x1::nothing::here".parse().unwrap());
    let err = build_error(&ledger, builder).await;

    assert!(matches!(
        err,
        Error::Abi(AbiError::ModuleNotFound(ref module)) if module == "0x1::nothing"
    ));
}

#[tokio::test]
async fn test_function_not_found() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);

    let err = aptos
        .entry_function_abi(&"0x1::coin::mint_everything".parse().unwrap())
        .await
        .unwrap_err();

    match err {
        Error::Abi(AbiError::FunctionNotFound { module, function }) => {
            assert_eq!(module, "0x1::coin");
            assert_eq!(function, "mint_everything");
        }
        other => panic!("expected FunctionNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_module_without_abi() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);

    let err = aptos
        .entry_function_abi(&"0xcafe::stripped::run".parse().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Abi(AbiError::MissingAbi(_))));
}

#[tokio::test]
async fn test_deeply_nested_abi_type_is_an_error() {
    let ledger = MockLedger::empty();
    let deep_reference = format!("{}signer", "&".repeat(200_000));
    ledger.add_module(
        mock::escrow_address(),
        "hostile",
        vec![mock::entry("run", 0, &[deep_reference.as_str(), "u64"])],
    );
    let aptos = mock::client(&ledger);

    let err = aptos
        .entry_function_abi(&"0xcafe::hostile::run".parse().unwrap())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Abi(AbiError::InvalidAbiType {
            source: ParseTypeTagError::TooDeeplyNested(_),
            ..
        })
    ));
}

#[tokio::test]
async fn test_view_function_is_not_an_entry_function() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);

    let builder = aptos
        .transaction(alice.address(), "0x1::coin::balance".parse().unwrap())
        .type_argument(TypeTag::aptos_coin())
        .argument(AccountAddress::ONE);
    let err = build_error(&ledger, builder).await;

    assert!(matches!(
        err,
        Error::Abi(AbiError::NotAnEntryFunction(ref function)) if function == "0x1::coin::balance"
    ));
}

#[tokio::test]
async fn test_invalid_function_id() {
    let err = "0x1::coin".parse::<FunctionId>().unwrap_err();
    assert_eq!(err, AbiError::InvalidFunctionId("0x1::coin".to_string()));

    let err: Error = err.into();
    assert!(err.to_string().contains("address::module::function"));
}
