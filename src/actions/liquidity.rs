//! Liquidity actions against the exchange pool.
//!
//! Adding liquidity is a two-transaction sequence: an ERC-20 `approve` for
//! the exchange, then `addLiquidity`. Nothing on-chain enforces that order,
//! so the flow awaits the approval's confirmation before even building the
//! dependent call; submitting earlier would execute against stale allowance
//! state.

use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::U256;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::abi::{exchange_interface, scale_amount, token_interface};
use crate::chain::SupportedChain;
use crate::config::ContractAddresses;
use crate::error::Result;
use crate::tool::{DynTool, ToolDefinition, ToolError};
use crate::tx::{self, ConfirmationPolicy, ContractCall, TransactionResult};
use crate::wallet::{ReadClient, WalletProvider, WriteClient};

/// Parameters for adding liquidity.
#[derive(Debug, Clone, Deserialize)]
pub struct AddLiquidityParams {
    /// Chain to act on; the configured default when omitted.
    pub chain: Option<SupportedChain>,
    /// Token amount to deposit, as a decimal string.
    pub amount: String,
}

/// Parameters for removing liquidity.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveLiquidityParams {
    /// Chain to act on; the configured default when omitted.
    pub chain: Option<SupportedChain>,
    /// LP token amount to burn, as a decimal string.
    pub lp_amount: String,
}

pub(crate) async fn add_liquidity_flow(
    write: &dyn WriteClient,
    read: &dyn ReadClient,
    contracts: &ContractAddresses,
    amount: U256,
    policy: ConfirmationPolicy,
) -> Result<TransactionResult> {
    let approve = ContractCall {
        to: contracts.token,
        interface: token_interface(),
        function: "approve",
        args: vec![
            DynSolValue::Address(contracts.exchange),
            DynSolValue::Uint(amount, 256),
        ],
        value: U256::ZERO,
    };
    let approval = tx::execute(write, read, &approve, policy).await?;
    info!(hash = %approval.hash, "approval confirmed");

    // Only now is the dependent transaction built and signed.
    let add = ContractCall {
        to: contracts.exchange,
        interface: exchange_interface(),
        function: "addLiquidity",
        args: vec![DynSolValue::Uint(amount, 256)],
        value: U256::ZERO,
    };
    let result = tx::execute(write, read, &add, policy).await?;
    info!(hash = %result.hash, "liquidity added");
    Ok(result)
}

pub(crate) async fn remove_liquidity_flow(
    write: &dyn WriteClient,
    read: &dyn ReadClient,
    contracts: &ContractAddresses,
    lp_amount: U256,
    policy: ConfirmationPolicy,
) -> Result<TransactionResult> {
    let remove = ContractCall {
        to: contracts.exchange,
        interface: exchange_interface(),
        function: "removeLiquidity",
        args: vec![DynSolValue::Uint(lp_amount, 256)],
        value: U256::ZERO,
    };
    let result = tx::execute(write, read, &remove, policy).await?;
    info!(hash = %result.hash, "liquidity removed");
    Ok(result)
}

/// Deposits tokens into the exchange pool.
pub struct AddLiquidityAction {
    provider: Arc<WalletProvider>,
}

impl AddLiquidityAction {
    pub fn new(provider: Arc<WalletProvider>) -> Self {
        Self { provider }
    }

    pub async fn add_liquidity(&self, params: &AddLiquidityParams) -> Result<TransactionResult> {
        let chain = params.chain.unwrap_or(self.provider.config().default_chain);
        let amount = scale_amount(&params.amount, 18)?;
        let contracts = self.provider.config().contracts;

        let write = self.provider.write_client(chain)?;
        let read = self.provider.read_client(chain)?;
        let policy = ConfirmationPolicy::from(&self.provider.config().confirmation);
        add_liquidity_flow(write.as_ref(), read.as_ref(), &contracts, amount, policy).await
    }
}

#[async_trait]
impl DynTool for AddLiquidityAction {
    fn name(&self) -> &str {
        "addLiquidity"
    }

    fn description(&self) -> String {
        "Add liquidity to the pool: approves the exchange for the given token \
         amount, waits for confirmation, then deposits."
            .into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = serde_json::json!({
            "type": "object",
            "properties": {
                "chain": {
                    "type": "string",
                    "description": "Chain name. Omit for the default chain."
                },
                "amount": {
                    "type": "string",
                    "description": "Token amount to deposit, e.g. \"5\""
                }
            },
            "required": ["amount"]
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let params: AddLiquidityParams = serde_json::from_value(args)?;
        let result = self
            .add_liquidity(&params)
            .await
            .map_err(|e| ToolError::execution(format!("addLiquidity failed: {e}")))?;
        serde_json::to_value(&result).map_err(Into::into)
    }
}

/// Burns LP tokens and withdraws the underlying pair.
pub struct RemoveLiquidityAction {
    provider: Arc<WalletProvider>,
}

impl RemoveLiquidityAction {
    pub fn new(provider: Arc<WalletProvider>) -> Self {
        Self { provider }
    }

    pub async fn remove_liquidity(
        &self,
        params: &RemoveLiquidityParams,
    ) -> Result<TransactionResult> {
        let chain = params.chain.unwrap_or(self.provider.config().default_chain);
        let lp_amount = scale_amount(&params.lp_amount, 18)?;
        let contracts = self.provider.config().contracts;

        let write = self.provider.write_client(chain)?;
        let read = self.provider.read_client(chain)?;
        let policy = ConfirmationPolicy::from(&self.provider.config().confirmation);
        remove_liquidity_flow(write.as_ref(), read.as_ref(), &contracts, lp_amount, policy).await
    }
}

#[async_trait]
impl DynTool for RemoveLiquidityAction {
    fn name(&self) -> &str {
        "removeLiquidity"
    }

    fn description(&self) -> String {
        "Remove liquidity from the pool by burning LP tokens. \
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
                },
                "lp_amount": {
                    "type": "string",
                    "description": "LP token amount to burn, e.g. \"0.1\""
                }
            },
            "required": ["lp_amount"]
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let params: RemoveLiquidityParams = serde_json::from_value(args)?;
        let result = self
            .remove_liquidity(&params)
            .await
            .map_err(|e| ToolError::execution(format!("removeLiquidity failed: {e}")))?;
        serde_json::to_value(&result).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvmError;
    use crate::testing::{MockEvent, MockNode, ReceiptScript};

    fn eth(amount: u64) -> U256 {
        U256::from(amount) * U256::from(10).pow(U256::from(18))
    }

    fn selector(interface: &crate::abi::Interface, name: &str, args: &[DynSolValue]) -> [u8; 4] {
        let data = interface.encode_input(name, args).unwrap();
        [data[0], data[1], data[2], data[3]]
    }

    #[tokio::test(start_paused = true)]
    async fn add_liquidity_submits_dependent_call_only_after_approval_confirms() {
        // Approval stays pending for a few polls before confirming.
        let node = MockNode::new(vec![ReceiptScript::PendingFor(3), ReceiptScript::Confirm]);
        let contracts = ContractAddresses::default();
        let amount = eth(5);

        let result = add_liquidity_flow(
            &node,
            &node,
            &contracts,
            amount,
            ConfirmationPolicy::default(),
        )
        .await
        .unwrap();
        assert_eq!(result.to, contracts.exchange);

        let approve_sel = selector(
            token_interface(),
            "approve",
            &[
                DynSolValue::Address(contracts.exchange),
                DynSolValue::Uint(amount, 256),
            ],
        );
        let add_sel = selector(
            exchange_interface(),
            "addLiquidity",
            &[DynSolValue::Uint(amount, 256)],
        );
        assert_eq!(
            node.submitted_selectors(),
            vec![Some(approve_sel), Some(add_sel)]
        );

        // The approval's confirmation must precede the second submission.
        let events = node.events();
        let first_confirm = events
            .iter()
            .position(|e| matches!(e, MockEvent::Confirmed(_)))
            .expect("approval confirmed");
        let second_submit = events
            .iter()
            .enumerate()
            .filter(|(_, e)| matches!(e, MockEvent::Submitted { .. }))
            .map(|(i, _)| i)
            .nth(1)
            .expect("dependent call submitted");
        assert!(
            first_confirm < second_submit,
            "addLiquidity was submitted before the approval confirmed: {events:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_approval_aborts_the_sequence() {
        let node = MockNode::new(vec![ReceiptScript::Revert("ERC20: paused")]);
        let contracts = ContractAddresses::default();

        let err = add_liquidity_flow(
            &node,
            &node,
            &contracts,
            eth(5),
            ConfirmationPolicy::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EvmError::Reverted { .. }));
        // Only the approval was ever submitted.
        assert_eq!(node.submitted_selectors().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn remove_liquidity_is_a_single_exchange_call() {
        let node = MockNode::new(vec![ReceiptScript::Confirm]);
        let contracts = ContractAddresses::default();
        let lp = U256::from(10).pow(U256::from(17));

        let result = remove_liquidity_flow(
            &node,
            &node,
            &contracts,
            lp,
            ConfirmationPolicy::default(),
        )
        .await
        .unwrap();
        assert_eq!(result.to, contracts.exchange);
        assert_eq!(result.logs.len(), 1);

        let remove_sel = selector(
            exchange_interface(),
            "removeLiquidity",
            &[DynSolValue::Uint(lp, 256)],
        );
        assert_eq!(node.submitted_selectors(), vec![Some(remove_sel)]);
    }
}
