//! End-to-end transaction flows against the in-memory ledger.

use std::time::{SystemTime, UNIX_EPOCH};

use aptos_kit::*;
use futures::future::try_join_all;

use crate::mock::{self, CHAIN_ID, GAS_ESTIMATE, MockLedger};

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

// =============================================================================
// Single signer
// =============================================================================

#[tokio::test]
async fn test_transfer_envelope_defaults() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 7);
    let bob = Ed25519Account::generate().address();

    let before = now_secs();
    let transaction = aptos
        .transfer(alice.address(), bob, 1_000)
        .build()
        .await
        .unwrap();
    let raw = transaction.raw_transaction();

    assert_eq!(raw.sender, alice.address());
    assert_eq!(raw.sequence_number, 7);
    assert_eq!(raw.gas_unit_price, GAS_ESTIMATE);
    assert_eq!(raw.max_gas_amount, 200_000);
    assert_eq!(raw.chain_id, ChainId::new(CHAIN_ID));
    assert!(raw.expiration_timestamp_secs >= before + 20);
    assert!(raw.expiration_timestamp_secs <= now_secs() + 20);
    assert_eq!(transaction.fee_payer_address(), None);
    assert!(transaction.secondary_signer_addresses().is_empty());

    let TransactionPayload::EntryFunction(function) = &raw.payload else {
        panic!("expected an entry function payload");
    };
    assert_eq!(function.module().to_string(), "0x1::aptos_account");
    assert_eq!(function.function(), "transfer");
    assert_eq!(function.args()[0], bob.to_vec());
    assert_eq!(function.args()[1], 1_000u64.to_le_bytes().to_vec());
}

#[tokio::test]
async fn test_transfer_overrides() {
    let ledger = MockLedger::with_framework();
    let aptos = Aptos::with_client(ledger.clone())
        .chain_id(ChainId::new(9))
        .gas_unit_price(120)
        .max_gas_amount(5_000)
        .build();
    let alice = Ed25519Account::generate();

    // The sequence number override means the sender never has to exist.
    let transaction = aptos
        .transfer(alice.address(), AccountAddress::ONE, 1)
        .sequence_number(3)
        .gas_unit_price(101)
        .expiration_timestamp_secs(1_900_000_000)
        .build()
        .await
        .unwrap();
    let raw = transaction.raw_transaction();

    assert_eq!(raw.sequence_number, 3);
    assert_eq!(raw.gas_unit_price, 101);
    assert_eq!(raw.max_gas_amount, 5_000);
    assert_eq!(raw.expiration_timestamp_secs, 1_900_000_000);
    assert_eq!(raw.chain_id, ChainId::new(9));
}

#[tokio::test]
async fn test_transfer_signed_and_verified() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);

    let transaction = aptos
        .transfer(alice.address(), AccountAddress::ONE, 250)
        .build()
        .await
        .unwrap();
    let message = transaction.signing_message().unwrap();
    assert!(message.starts_with(HashValue::sha3_256(RAW_TRANSACTION_SALT).as_bytes()));

    let authenticator = sign_transaction(&alice, &transaction).unwrap();
    assert!(authenticator.verify(&message));
    assert_eq!(authenticator.auth_key(), Some(alice.auth_key()));

    // Any change to the envelope invalidates the signature.
    let AnyRawTransaction::Simple(mut tampered) = transaction.clone() else {
        panic!("expected a simple transaction");
    };
    tampered.raw_transaction.max_gas_amount += 1;
    let tampered: AnyRawTransaction = tampered.into();
    assert!(!authenticator.verify(&tampered.signing_message().unwrap()));

    let signed = assemble_signed_transaction(&transaction, authenticator, vec![], None).unwrap();
    assert!(matches!(
        signed.authenticator,
        TransactionAuthenticator::Ed25519 { .. }
    ));
}

#[tokio::test]
async fn test_send_submits_signed_bytes() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 12);

    let pending = aptos
        .transfer(alice.address(), AccountAddress::ONE, 42)
        .expiration_timestamp_secs(1_900_000_000)
        .send(&alice)
        .await
        .unwrap();

    assert_eq!(pending.sender, alice.address());
    assert_eq!(pending.sequence_number, 12);

    let submissions = ledger.submissions();
    assert_eq!(submissions.len(), 1);

    // Rebuilding with the same inputs yields the same envelope and, since
    // Ed25519 is deterministic, the same signed bytes.
    let transaction = aptos
        .transfer(alice.address(), AccountAddress::ONE, 42)
        .expiration_timestamp_secs(1_900_000_000)
        .build()
        .await
        .unwrap();
    let raw_bytes = transaction.raw_transaction().to_bcs_bytes().unwrap();
    assert!(submissions[0].starts_with(&raw_bytes));

    let authenticator = sign_transaction(&alice, &transaction).unwrap();
    let signed = assemble_signed_transaction(&transaction, authenticator, vec![], None).unwrap();
    assert_eq!(submissions[0], signed.to_bytes().unwrap());
    assert_eq!(pending.hash, signed.committed_hash().unwrap());
}

#[tokio::test]
async fn test_sign_and_submit() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = SingleKeyAccount::generate(KeyScheme::Secp256k1Ecdsa);
    ledger.add_account(alice.address(), 1);

    let transaction = aptos
        .transfer(alice.address(), AccountAddress::ONE, 5)
        .build()
        .await
        .unwrap();
    let pending = aptos.sign_and_submit(&alice, &transaction).await.unwrap();

    assert_eq!(pending.sender, alice.address());
    assert_eq!(ledger.submissions().len(), 1);

    let authenticator = sign_transaction(&alice, &transaction).unwrap();
    let signed = assemble_signed_transaction(&transaction, authenticator, vec![], None).unwrap();
    assert!(matches!(
        signed.authenticator,
        TransactionAuthenticator::SingleSender {
            sender: AccountAuthenticator::SingleKey { .. }
        }
    ));
}

#[tokio::test]
async fn test_send_rejects_other_signer() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);
    let mallory = mock::funded_account(&ledger, 0);

    let err = aptos
        .transfer(alice.address(), AccountAddress::ONE, 1)
        .send(&mallory)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::InvalidTransaction(_)), "{err:?}");
    assert!(ledger.submissions().is_empty());
}

#[tokio::test]
async fn test_missing_sender_account() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let ghost = Ed25519Account::generate();

    let err = aptos
        .transfer(ghost.address(), AccountAddress::ONE, 1)
        .build()
        .await
        .unwrap_err();

    match err {
        Error::InvalidTransaction(message) => {
            assert!(message.contains(&ghost.address().to_string()));
        }
        other => panic!("expected InvalidTransaction, got {other:?}"),
    }
}

// =============================================================================
// Sponsored and multi-agent
// =============================================================================

#[tokio::test]
async fn test_fee_payer_flow() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 4);
    let sponsor = Ed25519Account::generate();

    let transaction = aptos
        .transfer(alice.address(), AccountAddress::ONE, 10)
        .with_fee_payer()
        .build()
        .await
        .unwrap();
    assert_eq!(transaction.fee_payer_address(), Some(AccountAddress::ZERO));

    let sender_message = transaction.signing_message().unwrap();
    assert!(sender_message.starts_with(HashValue::sha3_256(RAW_TRANSACTION_WITH_DATA_SALT).as_bytes()));
    let sender_auth = sign_transaction(&alice, &transaction).unwrap();

    let (sponsored, sponsor_auth) = sign_as_fee_payer(&sponsor, transaction.clone()).unwrap();
    assert_eq!(sponsored.fee_payer_address(), Some(sponsor.address()));
    assert_eq!(sponsored.raw_transaction(), transaction.raw_transaction());
    assert!(sponsor_auth.verify(&sponsored.signing_message().unwrap()));
    assert!(sender_auth.verify(&sender_message));

    // Without the fee payer's signature the transaction cannot be assembled.
    let err = assemble_signed_transaction(&sponsored, sender_auth.clone(), vec![], None).unwrap_err();
    assert!(matches!(err, Error::InvalidTransaction(_)));

    let signed =
        assemble_signed_transaction(&sponsored, sender_auth, vec![], Some(sponsor_auth)).unwrap();
    match &signed.authenticator {
        TransactionAuthenticator::FeePayer {
            secondary_signer_addresses,
            fee_payer_address,
            ..
        } => {
            assert!(secondary_signer_addresses.is_empty());
            assert_eq!(*fee_payer_address, sponsor.address());
        }
        other => panic!("expected a fee payer authenticator, got {other:?}"),
    }

    let pending = aptos.submit(&signed).await.unwrap();
    assert_eq!(pending.sender, alice.address());
    assert_eq!(pending.sequence_number, 4);
}

#[tokio::test]
async fn test_send_refuses_sponsored_transaction() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);

    let err = aptos
        .transfer(alice.address(), AccountAddress::ONE, 1)
        .with_fee_payer()
        .send(&alice)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidTransaction(_)));
}

#[tokio::test]
async fn test_multi_agent_flow() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 2);
    let bob = Ed25519Account::generate();

    let transaction = aptos
        .transaction(alice.address(), "0xcafe::escrow::exchange".parse().unwrap())
        .argument(500u64)
        .secondary_signer(bob.address())
        .build()
        .await
        .unwrap();
    assert_eq!(transaction.secondary_signer_addresses(), &[bob.address()]);

    let message = transaction.signing_message().unwrap();
    assert!(message.starts_with(HashValue::sha3_256(RAW_TRANSACTION_WITH_DATA_SALT).as_bytes()));

    let alice_auth = sign_transaction(&alice, &transaction).unwrap();
    let bob_auth = sign_transaction(&bob, &transaction).unwrap();
    assert!(alice_auth.verify(&message));
    assert!(bob_auth.verify(&message));

    let signed =
        assemble_signed_transaction(&transaction, alice_auth, vec![bob_auth], None).unwrap();
    match &signed.authenticator {
        TransactionAuthenticator::MultiAgent {
            secondary_signer_addresses,
            secondary_signers,
            ..
        } => {
            assert_eq!(secondary_signer_addresses, &vec![bob.address()]);
            assert_eq!(secondary_signers.len(), 1);
        }
        other => panic!("expected a multi-agent authenticator, got {other:?}"),
    }

    aptos.submit(&signed).await.unwrap();
    assert_eq!(ledger.submissions().len(), 1);
}

#[tokio::test]
async fn test_multi_agent_with_fee_payer() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);
    let bob = Ed25519Account::generate();
    let sponsor = Ed25519Account::generate();

    let transaction = aptos
        .transaction(alice.address(), "0xcafe::escrow::exchange".parse().unwrap())
        .argument(1u64)
        .secondary_signer(bob.address())
        .with_fee_payer()
        .build()
        .await
        .unwrap();

    let alice_auth = sign_transaction(&alice, &transaction).unwrap();
    let bob_auth = sign_transaction(&bob, &transaction).unwrap();
    let (sponsored, sponsor_auth) = sign_as_fee_payer(&sponsor, transaction).unwrap();

    let signed =
        assemble_signed_transaction(&sponsored, alice_auth, vec![bob_auth], Some(sponsor_auth))
            .unwrap();
    match signed.authenticator {
        TransactionAuthenticator::FeePayer {
            secondary_signer_addresses,
            fee_payer_address,
            ..
        } => {
            assert_eq!(secondary_signer_addresses, vec![bob.address()]);
            assert_eq!(fee_payer_address, sponsor.address());
        }
        other => panic!("expected a fee payer authenticator, got {other:?}"),
    }
}

// =============================================================================
// Multi-key
// =============================================================================

#[tokio::test]
async fn test_multi_key_account_transfer() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);

    let keys = vec![
        PrivateKey::generate(KeyScheme::Ed25519),
        PrivateKey::generate(KeyScheme::Secp256k1Ecdsa),
        PrivateKey::generate(KeyScheme::Ed25519),
    ];
    let multi_key = MultiKey::new(
        keys.iter().map(|k| AnyPublicKey::new(k.public_key())).collect(),
        2,
    )
    .unwrap();
    let account =
        MultiKeyAccount::new(multi_key.clone(), vec![keys[2].clone(), keys[1].clone()]).unwrap();
    assert_eq!(account.signer_indices(), vec![1, 2]);
    assert_eq!(account.address(), multi_key.auth_key().derived_address());
    ledger.add_account(account.address(), 0);

    let transaction = aptos
        .transfer(account.address(), AccountAddress::ONE, 77)
        .build()
        .await
        .unwrap();
    let authenticator = sign_transaction(&account, &transaction).unwrap();
    assert!(authenticator.verify(&transaction.signing_message().unwrap()));

    let AccountAuthenticator::MultiKey { signatures, .. } = &authenticator else {
        panic!("expected a multi-key authenticator");
    };
    assert_eq!(signatures.bitmap().indices(), vec![1, 2]);

    let pending = aptos.sign_and_submit(&account, &transaction).await.unwrap();
    assert_eq!(pending.sender, account.address());
}

#[tokio::test]
async fn test_multi_key_account_below_threshold() {
    let keys = vec![
        PrivateKey::generate(KeyScheme::Ed25519),
        PrivateKey::generate(KeyScheme::Ed25519),
    ];
    let multi_key = MultiKey::new(
        keys.iter().map(|k| AnyPublicKey::new(k.public_key())).collect(),
        2,
    )
    .unwrap();

    let err = MultiKeyAccount::new(multi_key, vec![keys[0].clone()]).unwrap_err();
    assert_eq!(
        err,
        SignerError::MultiKey(MultiKeyError::NotEnoughSigners {
            signers: 1,
            threshold: 2
        })
    );
}

// =============================================================================
// Payload resolution
// =============================================================================

#[tokio::test]
async fn test_concurrent_payload_resolution() {
    let ledger = MockLedger::with_framework();

    let calls = vec![
        InputEntryFunctionData {
            arguments: vec![AccountAddress::ONE.into(), 1u64.into()],
            ..InputEntryFunctionData::new("0x1::aptos_account::transfer".parse().unwrap())
        },
        InputEntryFunctionData {
            type_arguments: vec![TypeTag::aptos_coin()],
            arguments: vec![AccountAddress::ONE.into(), 2u64.into()],
            ..InputEntryFunctionData::new("0x1::coin::transfer".parse().unwrap())
        },
        InputEntryFunctionData {
            arguments: vec![vec![1u8, 2, 3].into(), Some(9u64).into()],
            ..InputEntryFunctionData::new("0xcafe::escrow::deposit".parse().unwrap())
        },
    ];

    let payloads = try_join_all(
        calls
            .iter()
            .map(|data| generate_transaction_payload(ledger.as_ref(), data)),
    )
    .await
    .unwrap();

    assert_eq!(payloads.len(), 3);
    assert_eq!(ledger.module_requests(), 3);

    let TransactionPayload::EntryFunction(deposit) = &payloads[2] else {
        panic!("expected an entry function payload");
    };
    assert_eq!(deposit.args()[0], vec![3, 1, 2, 3]);
    assert_eq!(deposit.args()[1], vec![1, 9, 0, 0, 0, 0, 0, 0, 0]);

    let TransactionPayload::EntryFunction(coin) = &payloads[1] else {
        panic!("expected an entry function payload");
    };
    assert_eq!(coin.ty_args(), &[TypeTag::aptos_coin()]);
}

#[tokio::test]
async fn test_supplied_abi_skips_lookup() {
    let ledger = MockLedger::empty();
    let aptos = mock::client(&ledger);
    let alice = mock::funded_account(&ledger, 0);

    let abi = EntryFunctionAbi {
        type_parameters: vec![],
        parameters: vec![TypeTag::Address, TypeTag::U64],
        signers: 1,
    };
    let transaction = aptos
        .transfer(alice.address(), AccountAddress::ONE, 3)
        .abi(abi)
        .build()
        .await
        .unwrap();

    assert_eq!(ledger.module_requests(), 0);
    assert_eq!(transaction.raw_transaction().sender, alice.address());
}

#[tokio::test]
async fn test_entry_function_abi_lookup() {
    let ledger = MockLedger::with_framework();
    let aptos = mock::client(&ledger);

    let abi = aptos
        .entry_function_abi(&"0xcafe::escrow::exchange".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(abi.signers, 2);
    assert_eq!(abi.parameters, vec![TypeTag::U64]);
}
