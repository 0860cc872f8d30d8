//! Faucet claim action: mints test tokens to the agent's account.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::abi::token_interface;
use crate::chain::SupportedChain;
use crate::error::Result;
use crate::tool::{DynTool, ToolDefinition, ToolError};
use crate::tx::{self, ConfirmationPolicy, ContractCall, TransactionResult};
use crate::wallet::{ReadClient, WalletProvider, WriteClient};

/// Parameters extracted from user text by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct FaucetParams {
    /// Chain to claim on; the configured default when omitted.
    pub chain: Option<SupportedChain>,
}

pub(crate) async fn faucet_flow(
    write: &dyn WriteClient,
    read: &dyn ReadClient,
    token: Address,
    policy: ConfirmationPolicy,
) -> Result<TransactionResult> {
    let call = ContractCall {
        to: token,
        interface: token_interface(),
        function: "faucet",
        args: vec![],
        value: U256::ZERO,
    };
    tx::execute(write, read, &call, policy).await
}

/// Claims test tokens from the token contract's faucet.
pub struct FaucetAction {
    provider: Arc<WalletProvider>,
}

impl FaucetAction {
    pub fn new(provider: Arc<WalletProvider>) -> Self {
        Self { provider }
    }

    pub async fn claim(&self, params: &FaucetParams) -> Result<TransactionResult> {
        let chain = params.chain.unwrap_or(self.provider.config().default_chain);
        let token = self.provider.config().contracts.token;

        let write = self.provider.write_client(chain)?;
        let read = self.provider.read_client(chain)?;
        let policy = ConfirmationPolicy::from(&self.provider.config().confirmation);
        faucet_flow(write.as_ref(), read.as_ref(), token, policy).await
    }
}

#[async_trait]
impl DynTool for FaucetAction {
    fn name(&self) -> &str {
        "faucet"
    }

    fn description(&self) -> String {
        "Claim test tokens from the faucet into the agent's wallet. \
         Returns the confirmed transaction hash."
            .into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = serde_json::json!({
            "type": "object",
            "properties": {
                "chain": {
                    "type": "string",
                    "description": "Chain name. Omit for the default chain."
                }
            },
            "required": []
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let params: FaucetParams = serde_json::from_value(args)?;
        let result = self
            .claim(&params)
            .await
            .map_err(|e| ToolError::execution(format!("faucet failed: {e}")))?;
        serde_json::to_value(&result).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockNode, ReceiptScript};
    use alloy::primitives::address;

    const TOKEN: Address = address!("9b0f6f66e5c4fda6cfed9e8b1f0d7b9db0c9834a");

    #[tokio::test(start_paused = true)]
    async fn faucet_flow_targets_the_token_contract() {
        let node = MockNode::new(vec![ReceiptScript::Confirm]);
        let result = faucet_flow(&node, &node, TOKEN, ConfirmationPolicy::default())
            .await
            .unwrap();

        assert_eq!(result.to, TOKEN);
        assert_eq!(result.value, U256::ZERO);
        assert_eq!(result.data.len(), 4);
        assert_eq!(result.logs.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn faucet_revert_is_surfaced() {
        let node = MockNode::new(vec![ReceiptScript::Revert("faucet: cooldown active")]);
        let err = faucet_flow(&node, &node, TOKEN, ConfirmationPolicy::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("faucet: cooldown active"));
    }
}
