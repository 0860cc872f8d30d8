//! Per-chain client handles.
//!
//! [`ReadClient`] and [`WriteClient`] are the seams between the plugin's
//! flows and the network. Production handles wrap an alloy HTTP provider;
//! tests script an in-memory node against the same traits. Constructing a
//! handle performs no network I/O; endpoint reachability surfaces on the
//! first actual call.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::chain::ChainMetadata;
use crate::error::{EvmError, Result};
use crate::tx::Receipt;

/// Read-only chain queries: balances, contract reads, receipt lookups.
#[async_trait]
pub trait ReadClient: Send + Sync {
    /// The chain this client is bound to.
    fn chain(&self) -> &ChainMetadata;

    /// Native-token balance of an address.
    async fn balance(&self, address: Address) -> Result<U256>;

    /// Execute a read-only contract call and return the raw return data.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;

    /// Fetch the receipt for a transaction, `None` while still pending.
    async fn transaction_receipt(&self, hash: B256) -> Result<Option<Receipt>>;
}

/// Transaction signing and broadcast, bound to one account on one chain.
#[async_trait]
pub trait WriteClient: Send + Sync + std::fmt::Debug {
    /// The chain this client is bound to.
    fn chain(&self) -> &ChainMetadata;

    /// The signing account's address.
    fn address(&self) -> Address;

    /// Sign and broadcast a transaction; returns its hash once the node
    /// accepts it into the pending pool. Does not wait for mining.
    async fn send_transaction(&self, to: Address, value: U256, data: Bytes) -> Result<B256>;
}

fn parse_rpc_url(chain: &ChainMetadata) -> Result<url::Url> {
    chain
        .rpc_url
        .parse()
        .map_err(|e| EvmError::network(format!("invalid RPC URL '{}': {e}", chain.rpc_url)))
}

/// HTTP-backed read client.
pub struct HttpReadClient {
    provider: DynProvider,
    chain: ChainMetadata,
}

impl HttpReadClient {
    /// Bind a read client to the chain's RPC endpoint.
    pub fn new(chain: ChainMetadata) -> Result<Self> {
        let url = parse_rpc_url(&chain)?;
        let provider = ProviderBuilder::new().connect_http(url).erased();
        Ok(Self { provider, chain })
    }
}

#[async_trait]
impl ReadClient for HttpReadClient {
    fn chain(&self) -> &ChainMetadata {
        &self.chain
    }

    async fn balance(&self, address: Address) -> Result<U256> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| EvmError::network(format!("balance query failed: {e}")))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        self.provider
            .call(tx)
            .await
            .map_err(|e| EvmError::network(format!("contract read failed: {e}")))
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<Receipt>> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|e| EvmError::network(format!("receipt lookup failed: {e}")))?;
        Ok(receipt.map(Receipt::from_rpc))
    }
}

impl std::fmt::Debug for HttpReadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpReadClient")
            .field("chain", &self.chain.name)
            .finish_non_exhaustive()
    }
}

/// HTTP-backed write client with the signer bound as the wallet.
///
/// Submissions are serialized through an internal lock: one in-flight
/// broadcast per (credential, chain) pair, so concurrent handler
/// invocations cannot race on the account nonce.
pub struct HttpWriteClient {
    provider: DynProvider,
    chain: ChainMetadata,
    address: Address,
    submit_lock: Mutex<()>,
}

impl HttpWriteClient {
    /// Bind a write client to the chain's RPC endpoint with a signer.
    pub fn new(chain: ChainMetadata, signer: PrivateKeySigner) -> Result<Self> {
        let url = parse_rpc_url(&chain)?;
        let address = signer.address();
        let provider = ProviderBuilder::new().wallet(signer).connect_http(url).erased();
        Ok(Self {
            provider,
            chain,
            address,
            submit_lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl WriteClient for HttpWriteClient {
    fn chain(&self) -> &ChainMetadata {
        &self.chain
    }

    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, to: Address, value: U256, data: Bytes) -> Result<B256> {
        let _guard = self.submit_lock.lock().await;

        let tx = TransactionRequest::default()
            .with_to(to)
            .with_value(value)
            .with_input(data);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| EvmError::network(format!("broadcast failed: {e}")))?;
        let hash = *pending.tx_hash();

        tracing::debug!(chain = self.chain.name, %hash, "transaction broadcast");
        Ok(hash)
    }
}

impl std::fmt::Debug for HttpWriteClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpWriteClient")
            .field("chain", &self.chain.name)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
