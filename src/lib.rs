//! EVM action tools for conversational agent hosts.
//!
//! This crate lets an agent runtime execute EVM-chain token operations on a
//! user's behalf: native transfers, test-token faucet claims, add/remove
//! liquidity against a fixed exchange pair, read-only pool accounting, and
//! a Merkl-backed yield-opportunity lookup.
//!
//! # Architecture
//!
//! ```text
//! EvmPlugin
//!   └── tools() → Vec<BoxedTool>              (host registers these)
//!         │
//!         ▼ per call
//!   WalletProvider ── read_client / write_client per chain (cached)
//!   Interface      ── ABI encoding of the call data
//!   tx::execute    ── submit → await_confirmation → TransactionResult
//! ```
//!
//! Chain names resolve through a static catalog ([`chain::SupportedChain`]);
//! contract addresses, RPC overrides, and confirmation bounds come from
//! [`config::PluginConfig`]. Parameter bags arrive pre-extracted from user
//! text and are validated here: amounts as decimal strings scaled to base
//! units, addresses as checked hex.
//!
//! # Example
//!
//! ```rust,ignore
//! use plugin_evm::{EvmPlugin, PluginConfig};
//!
//! let plugin = EvmPlugin::from_env(PluginConfig::default())?;
//! for tool in plugin.tools() {
//!     host.register(tool);
//! }
//! ```

pub mod abi;
pub mod actions;
pub mod chain;
pub mod config;
pub mod error;
pub mod plugin;
pub mod tool;
pub mod tx;
pub mod wallet;

#[cfg(test)]
pub(crate) mod testing;

pub use chain::{ChainMetadata, SupportedChain};
pub use config::{ContractAddresses, PluginConfig};
pub use error::{EvmError, Result};
pub use plugin::EvmPlugin;
pub use tool::{BoxedTool, DynTool, ToolDefinition, ToolError};
pub use tx::{ConfirmationPolicy, ContractCall, Receipt, TransactionResult};
pub use wallet::WalletProvider;
