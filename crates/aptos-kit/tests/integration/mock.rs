//! In-memory ledger used by the integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use aptos_kit::*;
use futures::future::BoxFuture;

/// Chain id reported by the mock node.
pub const CHAIN_ID: u8 = 4;

/// Gas unit price estimate reported by the mock node.
pub const GAS_ESTIMATE: u64 = 150;

/// A ledger that serves module ABIs and accounts from memory and records
/// every view request and submission it receives.
pub struct MockLedger {
    modules: Mutex<HashMap<(AccountAddress, String), MoveModuleBytecode>>,
    accounts: Mutex<HashMap<AccountAddress, u64>>,
    view_result: Mutex<Vec<serde_json::Value>>,
    views: Mutex<Vec<Vec<u8>>>,
    submissions: Mutex<Vec<Vec<u8>>>,
    module_requests: AtomicUsize,
}

impl MockLedger {
    /// An empty ledger with no modules or accounts.
    pub fn empty() -> Arc<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        Arc::new(Self {
            modules: Mutex::new(HashMap::new()),
            accounts: Mutex::new(HashMap::new()),
            view_result: Mutex::new(Vec::new()),
            views: Mutex::new(Vec::new()),
            submissions: Mutex::new(Vec::new()),
            module_requests: AtomicUsize::new(0),
        })
    }

    /// A ledger publishing the framework modules the tests call.
    pub fn with_framework() -> Arc<Self> {
        let ledger = Self::empty();
        ledger.add_module(
            AccountAddress::ONE,
            "aptos_account",
            vec![entry("transfer", 0, &["&signer", "address", "u64"])],
        );
        ledger.add_module(
            AccountAddress::ONE,
            "coin",
            vec![
                entry("transfer", 1, &["&signer", "address", "u64"]),
                view("balance", 1, &["address"], &["u64"]),
                view("name", 1, &[], &["0x1::string::String"]),
            ],
        );
        ledger.add_module(
            escrow_address(),
            "escrow",
            vec![
                entry("exchange", 0, &["&signer", "&signer", "u64"]),
                entry("deposit", 0, &["&signer", "vector<u8>", "0x1::option::Option<u64>"]),
            ],
        );
        ledger
            .modules
            .lock()
            .unwrap()
            .insert(
                (escrow_address(), "stripped".to_string()),
                MoveModuleBytecode {
                    bytecode: Hex::from_bytes(vec![0xa1, 0x1c, 0xeb, 0x0b]),
                    abi: None,
                },
            );
        ledger
    }

    pub fn add_module(&self, address: AccountAddress, name: &str, functions: Vec<MoveFunction>) {
        let module = MoveModuleBytecode {
            bytecode: Hex::from_bytes(vec![0xa1, 0x1c, 0xeb, 0x0b]),
            abi: Some(MoveModule {
                address,
                name: name.to_string(),
                friends: vec![],
                exposed_functions: functions,
                structs: vec![],
            }),
        };
        self.modules
            .lock()
            .unwrap()
            .insert((address, name.to_string()), module);
    }

    pub fn add_account(&self, address: AccountAddress, sequence_number: u64) {
        self.accounts
            .lock()
            .unwrap()
            .insert(address, sequence_number);
    }

    pub fn set_view_result(&self, result: Vec<serde_json::Value>) {
        *self.view_result.lock().unwrap() = result;
    }

    pub fn views(&self) -> Vec<Vec<u8>> {
        self.views.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<Vec<u8>> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn module_requests(&self) -> usize {
        self.module_requests.load(Ordering::SeqCst)
    }
}

impl LedgerClient for MockLedger {
    fn get_module<'a>(
        &'a self,
        address: AccountAddress,
        name: &'a str,
    ) -> BoxFuture<'a, Result<Option<MoveModuleBytecode>, RpcError>> {
        Box::pin(async move {
            self.module_requests.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .modules
                .lock()
                .unwrap()
                .get(&(address, name.to_string()))
                .cloned())
        })
    }

    fn get_account(
        &self,
        address: AccountAddress,
    ) -> BoxFuture<'_, Result<Option<AccountData>, RpcError>> {
        Box::pin(async move {
            Ok(self
                .accounts
                .lock()
                .unwrap()
                .get(&address)
                .map(|sequence_number| AccountData {
                    sequence_number: *sequence_number,
                    authentication_key: Hex::from_bytes(address.to_vec()),
                }))
        })
    }

    fn get_ledger_info(&self) -> BoxFuture<'_, Result<LedgerInfo, RpcError>> {
        Box::pin(async move {
            Ok(LedgerInfo {
                chain_id: CHAIN_ID,
                epoch: 1,
                ledger_version: 100,
                oldest_ledger_version: 0,
                ledger_timestamp: 1_700_000_000_000_000,
                block_height: 50,
                oldest_block_height: 0,
                node_role: Some("full_node".to_string()),
            })
        })
    }

    fn estimate_gas_price(&self) -> BoxFuture<'_, Result<GasEstimation, RpcError>> {
        Box::pin(async move {
            Ok(GasEstimation {
                gas_estimate: GAS_ESTIMATE,
                deprioritized_gas_estimate: Some(100),
                prioritized_gas_estimate: Some(200),
            })
        })
    }

    fn view(&self, request: Vec<u8>) -> BoxFuture<'_, Result<Vec<serde_json::Value>, RpcError>> {
        Box::pin(async move {
            self.views.lock().unwrap().push(request);
            Ok(self.view_result.lock().unwrap().clone())
        })
    }

    fn submit(
        &self,
        signed_transaction: Vec<u8>,
    ) -> BoxFuture<'_, Result<PendingTransaction, RpcError>> {
        Box::pin(async move {
            // A signed transaction opens with the sender and sequence number.
            if signed_transaction.len() < 40 {
                return Err(RpcError::InvalidResponse("transaction too short".to_string()));
            }
            let sender = AccountAddress::from_bytes(&signed_transaction[..32])
                .map_err(|e| RpcError::InvalidResponse(e.to_string()))?;
            let mut sequence_number = [0u8; 8];
            sequence_number.copy_from_slice(&signed_transaction[32..40]);

            let salt = HashValue::sha3_256(TRANSACTION_SALT);
            let hash = HashValue::sha3_256_of(&[salt.as_bytes(), &[0u8], &signed_transaction]);
            self.submissions.lock().unwrap().push(signed_transaction);

            Ok(PendingTransaction {
                hash,
                sender,
                sequence_number: u64::from_le_bytes(sequence_number),
                max_gas_amount: 0,
                gas_unit_price: 0,
                expiration_timestamp_secs: 0,
            })
        })
    }
}

/// Address the test-only `escrow` module lives at.
pub fn escrow_address() -> AccountAddress {
    "0xcafe".parse().unwrap()
}

pub fn entry(name: &str, generics: usize, params: &[&str]) -> MoveFunction {
    MoveFunction {
        name: name.to_string(),
        visibility: MoveFunctionVisibility::Public,
        is_entry: true,
        is_view: false,
        generic_type_params: vec![MoveFunctionGenericTypeParam::default(); generics],
        params: params.iter().map(|p| p.to_string()).collect(),
        return_types: vec![],
    }
}

pub fn view(name: &str, generics: usize, params: &[&str], returns: &[&str]) -> MoveFunction {
    MoveFunction {
        name: name.to_string(),
        visibility: MoveFunctionVisibility::Public,
        is_entry: false,
        is_view: true,
        generic_type_params: vec![MoveFunctionGenericTypeParam::default(); generics],
        params: params.iter().map(|p| p.to_string()).collect(),
        return_types: returns.iter().map(|r| r.to_string()).collect(),
    }
}

/// A client over `ledger` with the chain id left to the node.
pub fn client(ledger: &Arc<MockLedger>) -> Aptos {
    Aptos::with_client(ledger.clone()).build()
}

/// A funded Ed25519 account known to `ledger`.
pub fn funded_account(ledger: &MockLedger, sequence_number: u64) -> Ed25519Account {
    let account = Ed25519Account::generate();
    ledger.add_account(account.address(), sequence_number);
    account
}
