//! Plugin configuration.
//!
//! Contract addresses, the default chain, RPC endpoints, and confirmation
//! bounds are explicit configuration here, deserializable from the host's
//! settings rather than baked into call sites.

use std::collections::HashMap;
use std::time::Duration;

use alloy::primitives::{Address, address};
use serde::{Deserialize, Serialize};

use crate::chain::SupportedChain;

/// Environment variable holding the hex-encoded private key.
pub const PRIVATE_KEY_ENV_VAR: &str = "EVM_PRIVATE_KEY";

/// Deployed contract addresses for the token/exchange pair the liquidity
/// and faucet actions target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// ERC-20 token with a `faucet()` entry point.
    pub token: Address,
    /// Exchange (pool) contract holding the native/token pair.
    pub exchange: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        // Placeholder Alfajores pair; real deployments override these
        // through the host's settings.
        Self {
            token: address!("9b0f6f66e5c4fda6cfed9e8b1f0d7b9db0c9834a"),
            exchange: address!("c1e0a2f29d4a2834f6e3c76bdb6e78e0a1d4ab8e"),
        }
    }
}

/// How long to wait for a receipt and how often to poll for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Maximum seconds to wait for a transaction to be mined.
    pub timeout_secs: u64,
    /// Milliseconds between receipt polls.
    pub poll_interval_ms: u64,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            poll_interval_ms: 2000,
        }
    }
}

impl ConfirmationConfig {
    /// The receipt wait bound as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The poll cadence as a [`Duration`].
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Top-level plugin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Per-chain RPC URL overrides. Chains not listed use the catalog
    /// default.
    pub rpc_urls: HashMap<SupportedChain, String>,
    /// Token and exchange contract addresses.
    pub contracts: ContractAddresses,
    /// Chain used when a parameter bag omits one.
    pub default_chain: SupportedChain,
    /// Receipt confirmation bounds.
    pub confirmation: ConfirmationConfig,
    /// Merkl opportunities API endpoint.
    pub merkl_api_url: String,
    /// Chain id passed to the Merkl API.
    pub merkl_chain_id: u64,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            rpc_urls: HashMap::new(),
            contracts: ContractAddresses::default(),
            default_chain: SupportedChain::CeloAlfajores,
            confirmation: ConfirmationConfig::default(),
            merkl_api_url: "https://api.merkl.xyz/v4/opportunities".to_string(),
            merkl_chain_id: SupportedChain::Celo.chain_id(),
        }
    }
}

impl PluginConfig {
    /// The RPC URL for a chain: the configured override if present,
    /// otherwise the catalog default.
    #[must_use]
    pub fn rpc_url(&self, chain: SupportedChain) -> String {
        self.rpc_urls
            .get(&chain)
            .cloned()
            .unwrap_or_else(|| chain.default_rpc_url().to_string())
    }
}
