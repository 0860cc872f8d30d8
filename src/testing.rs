//! Scripted in-memory node for tests.
//!
//! Implements both client traits so flows run unmodified against it. Each
//! submitted transaction consumes the next [`ReceiptScript`]; every client
//! interaction is recorded as a [`MockEvent`] so tests can assert ordering
//! (e.g. that a dependent call is only submitted after its prerequisite
//! confirmed).

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, B256, Bytes, U256, address};
use alloy::rpc::types::Log;
use async_trait::async_trait;

use crate::chain::{ChainMetadata, SupportedChain};
use crate::error::Result;
use crate::tx::Receipt;
use crate::wallet::{ReadClient, WriteClient};

/// Route test logs through a subscriber honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs.
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// How the mock node treats one submitted transaction.
#[derive(Debug, Clone)]
pub(crate) enum ReceiptScript {
    /// Mined successfully on the first receipt poll.
    Confirm,
    /// Mined but reverted with the given reason.
    Revert(&'static str),
    /// Never produces a receipt.
    Never,
    /// Pending for N receipt polls, then mined successfully.
    PendingFor(u32),
}

/// A recorded client interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MockEvent {
    Submitted { to: Address, selector: Option<[u8; 4]> },
    ReceiptPolled(B256),
    Confirmed(B256),
}

#[derive(Debug)]
pub(crate) struct MockNode {
    chain: ChainMetadata,
    account: Address,
    scripts: Mutex<VecDeque<ReceiptScript>>,
    states: Mutex<HashMap<B256, ReceiptScript>>,
    events: Mutex<Vec<MockEvent>>,
    balances: Mutex<HashMap<Address, U256>>,
    call_returns: Mutex<VecDeque<Bytes>>,
    next_id: AtomicU64,
}

impl MockNode {
    pub(crate) fn new(scripts: Vec<ReceiptScript>) -> Self {
        init_tracing();
        Self {
            chain: SupportedChain::CeloAlfajores.metadata(),
            account: address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266"),
            scripts: Mutex::new(scripts.into()),
            states: Mutex::new(HashMap::new()),
            events: Mutex::new(Vec::new()),
            balances: Mutex::new(HashMap::new()),
            call_returns: Mutex::new(VecDeque::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub(crate) fn chain_meta(&self) -> &ChainMetadata {
        &self.chain
    }

    pub(crate) fn events(&self) -> Vec<MockEvent> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn set_balance(&self, address: Address, balance: U256) {
        self.balances.lock().unwrap().insert(address, balance);
    }

    /// Queue the raw return data for the next read-only call.
    pub(crate) fn push_call_return(&self, data: Bytes) {
        self.call_returns.lock().unwrap().push_back(data);
    }

    /// Queue a single uint256 return value for the next read-only call.
    pub(crate) fn push_uint_return(&self, value: U256) {
        use alloy::dyn_abi::DynSolValue;
        self.push_call_return(Bytes::from(DynSolValue::Uint(value, 256).abi_encode()));
    }

    /// Selectors of submitted transactions, in submission order.
    pub(crate) fn submitted_selectors(&self) -> Vec<Option<[u8; 4]>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                MockEvent::Submitted { selector, .. } => Some(selector),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: MockEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl WriteClient for MockNode {
    fn chain(&self) -> &ChainMetadata {
        &self.chain
    }

    fn address(&self) -> Address {
        self.account
    }

    async fn send_transaction(&self, to: Address, _value: U256, data: Bytes) -> Result<B256> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let hash = B256::from(U256::from(id));

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ReceiptScript::Confirm);
        self.states.lock().unwrap().insert(hash, script);

        let selector = data.get(..4).map(|s| {
            let mut sel = [0u8; 4];
            sel.copy_from_slice(s);
            sel
        });
        self.record(MockEvent::Submitted { to, selector });
        Ok(hash)
    }
}

#[async_trait]
impl ReadClient for MockNode {
    fn chain(&self) -> &ChainMetadata {
        &self.chain
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&address)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    async fn call(&self, _to: Address, _data: Bytes) -> Result<Bytes> {
        Ok(self
            .call_returns
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<Receipt>> {
        self.record(MockEvent::ReceiptPolled(hash));

        let mut states = self.states.lock().unwrap();
        let outcome = match states.get_mut(&hash) {
            None | Some(ReceiptScript::Never) => None,
            Some(ReceiptScript::PendingFor(remaining)) => {
                if *remaining > 0 {
                    *remaining -= 1;
                    None
                } else {
                    Some((true, None))
                }
            }
            Some(ReceiptScript::Confirm) => Some((true, None)),
            Some(ReceiptScript::Revert(reason)) => Some((false, Some((*reason).to_string()))),
        };
        drop(states);

        Ok(outcome.map(|(success, revert_reason)| {
            if success {
                self.record(MockEvent::Confirmed(hash));
            }
            Receipt {
                transaction_hash: hash,
                block_number: Some(1),
                success,
                logs: vec![Log {
                    transaction_hash: Some(hash),
                    ..Log::default()
                }],
                revert_reason,
            }
        }))
    }
}
