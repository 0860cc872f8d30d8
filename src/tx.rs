//! Transaction submission and confirmation.
//!
//! A submitted transaction moves through Built → Signed → Pending →
//! {Confirmed | Reverted | Timeout}. Nothing here retries across those
//! states: a flow that needs sequencing (approve before addLiquidity) must
//! await [`await_confirmation`] before building the dependent call.

use std::time::Duration;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256, Bytes, U256};
use alloy::rpc::types::Log;
use serde::Serialize;
use tokio::time::{interval, timeout};

use crate::abi::Interface;
use crate::config::ConfirmationConfig;
use crate::error::{EvmError, Result};
use crate::wallet::{ReadClient, WriteClient};

/// Outcome of a mined transaction, as reported by the node.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    /// Transaction hash.
    pub transaction_hash: B256,
    /// Block the transaction was mined in.
    pub block_number: Option<u64>,
    /// Whether execution succeeded.
    pub success: bool,
    /// Logs emitted during execution, in order.
    pub logs: Vec<Log>,
    /// Revert reason, when the node reports one.
    pub revert_reason: Option<String>,
}

impl Receipt {
    /// Convert an RPC receipt into the plugin's receipt shape.
    #[must_use]
    pub fn from_rpc(receipt: alloy::rpc::types::TransactionReceipt) -> Self {
        use alloy::consensus::TxReceipt as _;
        Self {
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
            logs: receipt.inner.logs().to_vec(),
            revert_reason: None,
        }
    }
}

/// How long to wait for a receipt and how often to poll.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmationPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl From<&ConfirmationConfig> for ConfirmationPolicy {
    fn from(config: &ConfirmationConfig) -> Self {
        Self {
            timeout: config.timeout(),
            poll_interval: config.poll_interval(),
        }
    }
}

/// A terminal record of a confirmed write operation, returned to the host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    pub hash: B256,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
    pub chain_id: u64,
    pub logs: Vec<Log>,
}

/// Sign and broadcast a transaction.
///
/// Returns as soon as the node accepts it into the pending pool; mining is
/// observed separately via [`await_confirmation`].
pub async fn submit(
    write: &dyn WriteClient,
    to: Address,
    value: U256,
    data: Bytes,
) -> Result<B256> {
    write.send_transaction(to, value, data).await
}

/// Wait for a transaction to be mined.
///
/// Polls the node on `policy.poll_interval` until a receipt appears or
/// `policy.timeout` elapses. A successful receipt is returned as-is; a
/// failed one becomes [`EvmError::Reverted`] preserving the node's reason,
/// and an elapsed bound becomes [`EvmError::Timeout`] rather than waiting
/// indefinitely.
pub async fn await_confirmation(
    read: &dyn ReadClient,
    hash: B256,
    policy: ConfirmationPolicy,
) -> Result<Receipt> {
    let waited = timeout(policy.timeout, async {
        let mut ticker = interval(policy.poll_interval);
        loop {
            ticker.tick().await;

            let Some(receipt) = read.transaction_receipt(hash).await? else {
                tracing::debug!(%hash, "transaction pending");
                continue;
            };

            if receipt.success {
                tracing::debug!(%hash, block = ?receipt.block_number, "transaction confirmed");
                return Ok(receipt);
            }
            return Err(EvmError::Reverted {
                hash,
                reason: receipt
                    .revert_reason
                    .unwrap_or_else(|| "execution reverted".to_string()),
            });
        }
    })
    .await;

    match waited {
        Ok(outcome) => outcome,
        Err(_) => Err(EvmError::Timeout {
            hash,
            waited_secs: policy.timeout.as_secs(),
        }),
    }
}

/// A contract invocation described as data: target, interface, function,
/// arguments, attached value.
///
/// Every write action in this plugin is one or more of these executed in
/// sequence; the per-action modules differ only in the triples they build.
#[derive(Debug, Clone)]
pub struct ContractCall<'a> {
    pub to: Address,
    pub interface: &'a Interface,
    pub function: &'a str,
    pub args: Vec<DynSolValue>,
    pub value: U256,
}

impl ContractCall<'_> {
    /// ABI-encode the call data.
    pub fn encode(&self) -> Result<Bytes> {
        self.interface.encode_input(self.function, &self.args)
    }
}

/// Encode, submit, and confirm a contract call.
///
/// Returns only after the transaction is mined successfully; the result is
/// a terminal, immutable fact carrying the receipt's logs.
pub async fn execute(
    write: &dyn WriteClient,
    read: &dyn ReadClient,
    call: &ContractCall<'_>,
    policy: ConfirmationPolicy,
) -> Result<TransactionResult> {
    let data = call.encode()?;
    let hash = submit(write, call.to, call.value, data.clone()).await?;
    let receipt = await_confirmation(read, hash, policy).await?;

    Ok(TransactionResult {
        hash,
        from: write.address(),
        to: call.to,
        value: call.value,
        data,
        chain_id: write.chain().chain_id,
        logs: receipt.logs,
    })
}

/// Encode and execute a read-only call, decoding its return values.
pub async fn read_call(read: &dyn ReadClient, call: &ContractCall<'_>) -> Result<Vec<DynSolValue>> {
    let data = call.encode()?;
    let ret = read.call(call.to, data).await?;
    call.interface.decode_output(call.function, &ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::token_interface;
    use crate::testing::{MockEvent, MockNode, ReceiptScript};
    use alloy::primitives::address;

    const TOKEN: Address = address!("9b0f6f66e5c4fda6cfed9e8b1f0d7b9db0c9834a");

    #[tokio::test(start_paused = true)]
    async fn confirmed_receipt_is_returned() {
        let node = MockNode::new(vec![ReceiptScript::Confirm]);
        let hash = submit(&node, TOKEN, U256::ZERO, Bytes::new()).await.unwrap();

        let receipt = await_confirmation(&node, hash, ConfirmationPolicy::default())
            .await
            .unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.transaction_hash, hash);
    }

    #[tokio::test(start_paused = true)]
    async fn reverted_receipt_preserves_reason() {
        let node = MockNode::new(vec![ReceiptScript::Revert("ERC20: insufficient allowance")]);
        let hash = submit(&node, TOKEN, U256::ZERO, Bytes::new()).await.unwrap();

        let err = await_confirmation(&node, hash, ConfirmationPolicy::default())
            .await
            .unwrap_err();
        match err {
            EvmError::Reverted { reason, hash: h } => {
                assert_eq!(reason, "ERC20: insufficient allowance");
                assert_eq!(h, hash);
            }
            other => panic!("expected Reverted, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn missing_receipt_times_out() {
        let node = MockNode::new(vec![ReceiptScript::Never]);
        let hash = submit(&node, TOKEN, U256::ZERO, Bytes::new()).await.unwrap();

        let policy = ConfirmationPolicy {
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_secs(1),
        };
        let err = await_confirmation(&node, hash, policy).await.unwrap_err();
        assert!(matches!(err, EvmError::Timeout { waited_secs: 5, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn receipt_appearing_after_polls_confirms() {
        let node = MockNode::new(vec![ReceiptScript::PendingFor(3)]);
        let hash = submit(&node, TOKEN, U256::ZERO, Bytes::new()).await.unwrap();

        let receipt = await_confirmation(&node, hash, ConfirmationPolicy::default())
            .await
            .unwrap();
        assert!(receipt.success);
        // The node was polled while the transaction was still pending.
        let polls = node
            .events()
            .iter()
            .filter(|e| matches!(e, MockEvent::ReceiptPolled(_)))
            .count();
        assert!(polls >= 4);
    }

    #[tokio::test(start_paused = true)]
    async fn execute_returns_a_complete_result() {
        let node = MockNode::new(vec![ReceiptScript::Confirm]);
        let call = ContractCall {
            to: TOKEN,
            interface: token_interface(),
            function: "faucet",
            args: vec![],
            value: U256::ZERO,
        };

        let result = execute(&node, &node, &call, ConfirmationPolicy::default())
            .await
            .unwrap();
        assert_eq!(result.to, TOKEN);
        assert_eq!(result.from, WriteClient::address(&node));
        assert_eq!(result.value, U256::ZERO);
        assert_eq!(result.chain_id, node.chain_meta().chain_id);
        assert_eq!(&result.data[..4], token_interface().encode_input("faucet", &[]).unwrap().as_ref());
    }

    #[tokio::test(start_paused = true)]
    async fn encoding_failure_never_reaches_the_node() {
        let node = MockNode::new(vec![ReceiptScript::Confirm]);
        let call = ContractCall {
            to: TOKEN,
            interface: token_interface(),
            function: "mint",
            args: vec![],
            value: U256::ZERO,
        };

        let err = execute(&node, &node, &call, ConfirmationPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EvmError::Encoding(_)));
        assert!(node.events().is_empty());
    }
}
