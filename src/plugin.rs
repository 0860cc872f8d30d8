//! Plugin assembly: one wallet provider, one tool per supported action.

use std::sync::Arc;

use tracing::info;

use crate::actions::{
    AddLiquidityAction, FaucetAction, MerklClient, OpportunitiesAction, PoolInfoAction,
    RemoveLiquidityAction, TransferAction,
};
use crate::config::PluginConfig;
use crate::error::Result;
use crate::tool::BoxedTool;
use crate::wallet::WalletProvider;

/// The EVM plugin: wallet provider plus the action tools the host
/// registers with its agent runtime.
pub struct EvmPlugin {
    provider: Arc<WalletProvider>,
    config: PluginConfig,
}

impl EvmPlugin {
    /// Build the plugin from an optional hex private key and configuration.
    pub fn new(private_key: Option<&str>, config: PluginConfig) -> Result<Self> {
        let provider = Arc::new(WalletProvider::new(private_key, config.clone())?);
        info!(
            default_chain = %config.default_chain,
            has_credential = provider.has_credential(),
            "EVM plugin initialized"
        );
        Ok(Self { provider, config })
    }

    /// Build the plugin with the key from `EVM_PRIVATE_KEY`, if set.
    pub fn from_env(config: PluginConfig) -> Result<Self> {
        let provider = Arc::new(WalletProvider::from_env(config.clone())?);
        Ok(Self { provider, config })
    }

    /// Plugin name as registered with the host.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        "evm"
    }

    /// Chat-facing plugin description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        "EVM blockchain integration plugin"
    }

    /// The wallet provider backing every tool.
    #[must_use]
    pub fn provider(&self) -> &Arc<WalletProvider> {
        &self.provider
    }

    /// The action tools, ready for host registration:
    /// `transfer`, `faucet`, `addLiquidity`, `removeLiquidity`, `poolInfo`,
    /// `opportunities`.
    #[must_use]
    pub fn tools(&self) -> Vec<BoxedTool> {
        let merkl = MerklClient::new(
            self.config.merkl_api_url.clone(),
            self.config.merkl_chain_id,
        );
        vec![
            Box::new(TransferAction::new(Arc::clone(&self.provider))),
            Box::new(FaucetAction::new(Arc::clone(&self.provider))),
            Box::new(AddLiquidityAction::new(Arc::clone(&self.provider))),
            Box::new(RemoveLiquidityAction::new(Arc::clone(&self.provider))),
            Box::new(PoolInfoAction::new(Arc::clone(&self.provider))),
            Box::new(OpportunitiesAction::new(merkl)),
        ]
    }
}

impl std::fmt::Debug for EvmPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmPlugin")
            .field("default_chain", &self.config.default_chain)
            .finish_non_exhaustive()
    }
}
