//! Native-token transfer action.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::abi::scale_amount;
use crate::chain::SupportedChain;
use crate::error::{EvmError, Result};
use crate::tool::{DynTool, ToolDefinition, ToolError};
use crate::tx::{self, ConfirmationPolicy, TransactionResult};
use crate::wallet::{ReadClient, WalletProvider, WriteClient};

/// Parameters extracted from user text by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferParams {
    /// Chain to transfer on; the configured default when omitted.
    pub chain: Option<SupportedChain>,
    /// Recipient address, 0x-prefixed hex.
    pub to: String,
    /// Amount as a decimal string in whole native-token units.
    pub amount: String,
}

pub(crate) async fn transfer_flow(
    write: &dyn WriteClient,
    read: &dyn ReadClient,
    to: Address,
    value: U256,
    policy: ConfirmationPolicy,
) -> Result<TransactionResult> {
    let hash = tx::submit(write, to, value, Bytes::new()).await?;
    let receipt = tx::await_confirmation(read, hash, policy).await?;
    Ok(TransactionResult {
        hash,
        from: write.address(),
        to,
        value,
        data: Bytes::new(),
        chain_id: write.chain().chain_id,
        logs: receipt.logs,
    })
}

/// Transfers native tokens from the agent's account.
pub struct TransferAction {
    provider: Arc<WalletProvider>,
}

impl TransferAction {
    pub fn new(provider: Arc<WalletProvider>) -> Self {
        Self { provider }
    }

    /// Validate the parameter bag, then submit and confirm the transfer.
    pub async fn transfer(&self, params: &TransferParams) -> Result<TransactionResult> {
        let chain = params.chain.unwrap_or(self.provider.config().default_chain);
        let to: Address = params
            .to
            .parse()
            .map_err(|e| EvmError::invalid_input(format!("recipient '{}': {e}", params.to)))?;
        let value = scale_amount(&params.amount, chain.native_currency().decimals)?;

        let write = self.provider.write_client(chain)?;
        let read = self.provider.read_client(chain)?;
        let policy = ConfirmationPolicy::from(&self.provider.config().confirmation);
        transfer_flow(write.as_ref(), read.as_ref(), to, value, policy).await
    }
}

#[async_trait]
impl DynTool for TransferAction {
    fn name(&self) -> &str {
        "transfer"
    }

    fn description(&self) -> String {
        "Transfer native tokens (e.g. CELO) from the agent's wallet to an address. \
         Returns the confirmed transaction hash."
            .into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = serde_json::json!({
            "type": "object",
            "properties": {
                "chain": {
                    "type": "string",
                    "description": "Chain name (e.g. \"celo\", \"celoAlfajores\"). Omit for the default chain."
                },
                "to": {
                    "type": "string",
                    "description": "Recipient address, 0x-prefixed hex"
                },
                "amount": {
                    "type": "string",
                    "description": "Amount in whole native-token units, e.g. \"0.5\""
                }
            },
            "required": ["to", "amount"]
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let params: TransferParams = serde_json::from_value(args)?;
        let result = self
            .transfer(&params)
            .await
            .map_err(|e| ToolError::execution(format!("transfer failed: {e}")))?;
        serde_json::to_value(&result).map_err(Into::into)
    }
}
