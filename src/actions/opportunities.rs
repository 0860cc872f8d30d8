//! Yield-opportunity lookup backed by the Merkl API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EvmError, Result};
use crate::tool::{DynTool, ToolDefinition, ToolError};

/// Optional client-side filters over the opportunity list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpportunityParams {
    /// Keep only pools with at least this APR (percent).
    pub min_apr: Option<f64>,
    /// Keep only pools with at least this TVL (USD).
    pub min_tvl: Option<f64>,
}

/// One token in an opportunity's pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolToken {
    pub symbol: String,
    /// USD price; the API omits it for unlisted tokens.
    pub price: Option<f64>,
}

/// A yield opportunity as reported by Merkl.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoolOpportunity {
    pub tvl: f64,
    pub apr: f64,
    pub daily_rewards: f64,
    pub tokens: Vec<PoolToken>,
}

/// Thin client for the Merkl opportunities endpoint.
#[derive(Debug, Clone)]
pub struct MerklClient {
    http: reqwest::Client,
    api_url: String,
    chain_id: u64,
}

impl MerklClient {
    pub fn new(api_url: impl Into<String>, chain_id: u64) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            chain_id,
        }
    }

    /// Fetch the opportunity list for the configured chain.
    pub async fn opportunities(&self) -> Result<Vec<PoolOpportunity>> {
        let url = format!("{}?chainId={}", self.api_url, self.chain_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| EvmError::network(format!("opportunities request failed: {e}")))?
            .error_for_status()
            .map_err(|e| EvmError::network(format!("opportunities request failed: {e}")))?;

        response
            .json()
            .await
            .map_err(|e| EvmError::network(format!("malformed opportunities response: {e}")))
    }
}

fn apply_filters(pools: Vec<PoolOpportunity>, params: &OpportunityParams) -> Vec<PoolOpportunity> {
    pools
        .into_iter()
        .filter(|pool| {
            params.min_apr.is_none_or(|min| pool.apr >= min)
                && params.min_tvl.is_none_or(|min| pool.tvl >= min)
        })
        .collect()
}

/// Lists yield opportunities for the configured chain.
pub struct OpportunitiesAction {
    client: MerklClient,
}

impl OpportunitiesAction {
    pub fn new(client: MerklClient) -> Self {
        Self { client }
    }

    pub async fn opportunities(&self, params: &OpportunityParams) -> Result<Vec<PoolOpportunity>> {
        let pools = self.client.opportunities().await?;
        Ok(apply_filters(pools, params))
    }
}

#[async_trait]
impl DynTool for OpportunitiesAction {
    fn name(&self) -> &str {
        "opportunities"
    }

    fn description(&self) -> String {
        "List yield opportunities (TVL, APR, daily rewards, pair tokens) for \
         the configured chain, optionally filtered by minimum APR or TVL."
            .into()
    }

    fn definition(&self) -> ToolDefinition {
        let params = serde_json::json!({
            "type": "object",
            "properties": {
                "min_apr": {
                    "type": "number",
                    "description": "Keep only pools with at least this APR, in percent. Optional."
                },
                "min_tvl": {
                    "type": "number",
                    "description": "Keep only pools with at least this TVL, in USD. Optional."
                }
            },
            "required": []
        });
        ToolDefinition::new(self.name(), self.description(), params)
    }

    async fn call_json(&self, args: Value) -> Result<Value, ToolError> {
        let params: OpportunityParams = serde_json::from_value(args)?;
        let pools = self
            .opportunities(&params)
            .await
            .map_err(|e| ToolError::execution(format!("opportunities failed: {e}")))?;
        serde_json::to_value(&pools).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<PoolOpportunity> {
        serde_json::from_str(
            r#"[
                {
                    "tvl": 1250000.5,
                    "apr": 12.4,
                    "dailyRewards": 420.0,
                    "tokens": [
                        { "symbol": "CELO", "price": 0.71 },
                        { "symbol": "ICB" }
                    ]
                },
                {
                    "tvl": 9000.0,
                    "apr": 88.1,
                    "dailyRewards": 15.5,
                    "tokens": [ { "symbol": "cUSD", "price": 1.0 } ]
                }
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn response_mapping_tolerates_missing_prices() {
        let pools = sample();
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].tokens[0].symbol, "CELO");
        assert_eq!(pools[0].tokens[1].price, None);
        assert_eq!(pools[0].daily_rewards, 420.0);
    }

    #[test]
    fn filters_drop_pools_below_thresholds() {
        let params = OpportunityParams {
            min_apr: Some(50.0),
            min_tvl: None,
        };
        let filtered = apply_filters(sample(), &params);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].apr, 88.1);

        let params = OpportunityParams {
            min_apr: None,
            min_tvl: Some(100_000.0),
        };
        let filtered = apply_filters(sample(), &params);
        assert_eq!(filtered.len(), 1);
        assert!(filtered[0].tvl > 100_000.0);

        let filtered = apply_filters(sample(), &OpportunityParams::default());
        assert_eq!(filtered.len(), 2);
    }
}
