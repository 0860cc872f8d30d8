//! Read-only pool accounting: balances, reserve, and swap quotes.
//!
//! The quote goes through the exchange's `getAmountOfTokens`, whose reserve
//! argument order depends on swap direction: selling native tokens quotes
//! against (pool native balance, token reserve), selling pool tokens against
//! (token reserve, pool native balance).

use std::sync::Arc;

use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::abi::{display_amount, exchange_interface, scale_amount, token_interface};
use crate::chain::SupportedChain;
use crate::config::ContractAddresses;
use crate::error::{EvmError, Result};
use crate::tool::{DynTool, ToolDefinition, ToolError};
use crate::tx::{ContractCall, read_call};
use crate::wallet::{ReadClient, WalletProvider};

/// Parameters extracted from user text by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolInfoParams {
    /// Chain to query; the configured default when omitted.
    pub chain: Option<SupportedChain>,
    /// Swap request as the user phrased it, e.g. `"1 celo"` or `"100 icb"`.
    /// When omitted, only the snapshot is returned.
    pub amount_to_swap: Option<String>,
}

/// Which side of the pair is being sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDirection {
    NativeToToken,
    TokenToNative,
}

/// Point-in-time view of the pool and the agent's holdings.
#[derive(Debug, Clone)]
pub struct PoolSnapshot {
    pub account_native: U256,
    pub account_token: U256,
    pub account_lp: U256,
    pub pool_native: U256,
    pub token_reserve: U256,
}

fn single_uint(values: Vec<DynSolValue>, what: &str) -> Result<U256> {
    match values.first() {
        Some(DynSolValue::Uint(value, _)) => Ok(*value),
        other => Err(EvmError::encoding(format!(
            "{what}: expected a uint256 return, got {other:?}"
        ))),
    }
}

async fn read_uint(
    read: &dyn ReadClient,
    call: &ContractCall<'_>,
    what: &str,
) -> Result<U256> {
    single_uint(read_call(read, call).await?, what)
}

pub(crate) async fn pool_snapshot(
    read: &dyn ReadClient,
    contracts: &ContractAddresses,
    account: Address,
) -> Result<PoolSnapshot> {
    let account_native = read.balance(account).await?;
    let pool_native = read.balance(contracts.exchange).await?;

    let account_token = read_uint(
        read,
        &ContractCall {
            to: contracts.token,
            interface: token_interface(),
            function: "balanceOf",
            args: vec![DynSolValue::Address(account)],
            value: U256::ZERO,
        },
        "token balance",
    )
    .await?;

    let account_lp = read_uint(
        read,
        &ContractCall {
            to: contracts.exchange,
            interface: exchange_interface(),
            function: "balanceOf",
            args: vec![DynSolValue::Address(account)],
            value: U256::ZERO,
        },
        "LP balance",
    )
    .await?;

    let token_reserve = read_uint(
        read,
        &ContractCall {
            to: contracts.exchange,
            interface: exchange_interface(),
            function: "getReserve",
            args: vec![],
            value: U256::ZERO,
        },
        "pool reserve",
    )
    .await?;

    Ok(PoolSnapshot {
        account_native,
        account_token,
        account_lp,
        pool_native,
        token_reserve,
    })
}

/// Argument order for `getAmountOfTokens` given the swap direction.
pub(crate) fn quote_args(
    amount: U256,
    snapshot: &PoolSnapshot,
    direction: SwapDirection,
) -> [DynSolValue; 3] {
    let (input_reserve, output_reserve) = match direction {
        SwapDirection::NativeToToken => (snapshot.pool_native, snapshot.token_reserve),
        SwapDirection::TokenToNative => (snapshot.token_reserve, snapshot.pool_native),
    };
    [
        DynSolValue::Uint(amount, 256),
        DynSolValue::Uint(input_reserve, 256),
        DynSolValue::Uint(output_reserve, 256),
    ]
}

pub(crate) async fn quote_swap(
    read: &dyn ReadClient,
    contracts: &ContractAddresses,
    snapshot: &PoolSnapshot,
    amount: U256,
    direction: SwapDirection,
) -> Result<U256> {
    read_uint(
        read,
        &ContractCall {
            to: contracts.exchange,
            interface: exchange_interface(),
            function: "getAmountOfTokens",
            args: quote_args(amount, snapshot, direction).to_vec(),
            value: U256::ZERO,
        },
        "swap quote",
    )
    .await
}

/// Pull the decimal amount and direction out of a phrase like `"1 celo"`.
///
/// The direction is keyed on whether the phrase names the native currency;
/// anything else sells the pool token.
pub(crate) fn parse_swap_request(
    text: &str,
    native_symbol: &str,
) -> Result<(U256, SwapDirection)> {
    let digits_start = text
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| EvmError::invalid_input(format!("no amount in '{text}'")))?;
    let number: String = text[digits_start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let amount = scale_amount(&number, 18)?;

    let direction = if text.to_lowercase().contains(&native_symbol.to_lowercase()) {
        SwapDirection::NativeToToken
    } else {
        SwapDirection::TokenToNative
    };
    Ok((amount, direction))
}

/// Read-only pool information and swap quoting.
pub struct PoolInfoAction {
    provider: Arc<WalletProvider>,
}

impl PoolInfoAction {
    pub fn new(provider: Arc<WalletProvider>) -> Self {
        Self { provider }
    }

    pub async fn pool_info(&self, params: &PoolInfoParams) -> Result<Value> {
        let chain = params.chain.unwrap_or(self.provider.config().default_chain);
        let account = self.provider.account()?;
        let contracts = self.provider.config().contracts;
        let read = self.provider.read_client(chain)?;

        let snapshot = pool_snapshot(read.as_ref(), &contracts, account).await?;
        let mut info = serde_json::json!({
            "chain": chain,
            "account": {
                "native": display_amount(snapshot.account_native, 18),
                "token": display_amount(snapshot.account_token, 18),
                "lp": display_amount(snapshot.account_lp, 18),
            },
            "pool": {
                "native": display_amount(snapshot.pool_native, 18),
                "tokenReserve": display_amount(snapshot.token_reserve, 18),
            },
        });

        if let Some(request) = &params.amount_to_swap {
            let symbol = chain.native_currency().symbol;
            let (amount, direction) = parse_swap_request(request, symbol)?;
            let out = quote_swap(read.as_ref(), &contracts, &snapshot, amount, direction).await?;
            info["quote"] = serde_json::json!({
                "amountIn": display_amount(amount, 18),
                "amountOut": display_amount(out, 18),
                "direction": match direction {
                    SwapDirection::NativeToToken => "nativeToToken",
                    SwapDirection::TokenToNative => "tokenToNative",
                },
            });
        }
        Ok(info)
    }
}

#[async_trait]
impl DynTool for PoolInfoAction {
    fn name(&self) -> &str {
        "poolInfo"
    }

    fn description(&self) -> String {
        "Get pool information: the agent's balances, the pool's reserves, and \
         optionally how many tokens a swap would return."
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
                "amount_to_swap": {
                    "type": "string",
                    "description": "Swap to quote, e.g. \"1 celo\" or \"100 icb\". Optional."
                }
            },
            "required": []
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let params: PoolInfoParams = serde_json::from_value(args)?;
        self.pool_info(&params)
            .await
            .map_err(|e| ToolError::execution(format!("poolInfo failed: {e}")))
    }
}
