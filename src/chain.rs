//! Static chain registry.
//!
//! Maps a chain name to its network parameters: numeric chain id, default
//! RPC endpoint, native currency, block explorer. The catalog is fixed at
//! compile time; every chain name an action uses must resolve here or the
//! operation fails fast with [`EvmError::UnsupportedChain`].

use serde::{Deserialize, Serialize};

use crate::error::{EvmError, Result};

/// The EVM networks this plugin knows about.
///
/// Serde names match the chain-name strings the host passes in parameter
/// bags (`"celoAlfajores"`, `"ethereum"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub enum SupportedChain {
    Ethereum,
    Sepolia,
    Base,
    Polygon,
    Arbitrum,
    Optimism,
    Bsc,
    Avalanche,
    Celo,
    CeloAlfajores,
}

/// Native currency descriptor for a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

/// Network parameters for a supported chain.
///
/// Built from the static catalog; the wallet provider may substitute the
/// RPC URL with a configured override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainMetadata {
    pub chain_id: u64,
    pub name: &'static str,
    pub native_currency: NativeCurrency,
    pub rpc_url: String,
    pub block_explorer_url: &'static str,
}

impl SupportedChain {
    /// Every chain in the catalog.
    pub const ALL: [Self; 10] = [
        Self::Ethereum,
        Self::Sepolia,
        Self::Base,
        Self::Polygon,
        Self::Arbitrum,
        Self::Optimism,
        Self::Bsc,
        Self::Avalanche,
        Self::Celo,
        Self::CeloAlfajores,
    ];

    /// Resolve a chain name to a catalog entry.
    ///
    /// Fails with [`EvmError::UnsupportedChain`] when the name is unknown.
    pub fn resolve(name: &str) -> Result<Self> {
        name.parse()
    }

    /// The chain name as the host spells it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Sepolia => "sepolia",
            Self::Base => "base",
            Self::Polygon => "polygon",
            Self::Arbitrum => "arbitrum",
            Self::Optimism => "optimism",
            Self::Bsc => "bsc",
            Self::Avalanche => "avalanche",
            Self::Celo => "celo",
            Self::CeloAlfajores => "celoAlfajores",
        }
    }

    /// The numeric chain id (EIP-155).
    #[must_use]
    pub const fn chain_id(self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Sepolia => 11_155_111,
            Self::Base => 8453,
            Self::Polygon => 137,
            Self::Arbitrum => 42_161,
            Self::Optimism => 10,
            Self::Bsc => 56,
            Self::Avalanche => 43_114,
            Self::Celo => 42_220,
            Self::CeloAlfajores => 44_787,
        }
    }

    /// Default public RPC endpoint.
    #[must_use]
    pub const fn default_rpc_url(self) -> &'static str {
        match self {
            Self::Ethereum => "https://eth.llamarpc.com",
            Self::Sepolia => "https://rpc.sepolia.org",
            Self::Base => "https://mainnet.base.org",
            Self::Polygon => "https://polygon-rpc.com",
            Self::Arbitrum => "https://arb1.arbitrum.io/rpc",
            Self::Optimism => "https://mainnet.optimism.io",
            Self::Bsc => "https://bsc-dataseed.binance.org",
            Self::Avalanche => "https://api.avax.network/ext/bc/C/rpc",
            Self::Celo => "https://forno.celo.org",
            Self::CeloAlfajores => "https://alfajores-forno.celo-testnet.org",
        }
    }

    /// Block explorer base URL.
    #[must_use]
    pub const fn block_explorer_url(self) -> &'static str {
        match self {
            Self::Ethereum => "https://etherscan.io",
            Self::Sepolia => "https://sepolia.etherscan.io",
            Self::Base => "https://basescan.org",
            Self::Polygon => "https://polygonscan.com",
            Self::Arbitrum => "https://arbiscan.io",
            Self::Optimism => "https://optimistic.etherscan.io",
            Self::Bsc => "https://bscscan.com",
            Self::Avalanche => "https://snowtrace.io",
            Self::Celo => "https://celoscan.io",
            Self::CeloAlfajores => "https://alfajores.celoscan.io",
        }
    }

    /// Native currency of the chain. Every listed network uses 18 decimals.
    #[must_use]
    pub const fn native_currency(self) -> NativeCurrency {
        match self {
            Self::Ethereum | Self::Sepolia | Self::Base | Self::Arbitrum | Self::Optimism => {
                NativeCurrency {
                    name: "Ether",
                    symbol: "ETH",
                    decimals: 18,
                }
            }
            Self::Polygon => NativeCurrency {
                name: "POL",
                symbol: "POL",
                decimals: 18,
            },
            Self::Bsc => NativeCurrency {
                name: "BNB",
                symbol: "BNB",
                decimals: 18,
            },
            Self::Avalanche => NativeCurrency {
                name: "Avalanche",
                symbol: "AVAX",
                decimals: 18,
            },
            Self::Celo | Self::CeloAlfajores => NativeCurrency {
                name: "CELO",
                symbol: "CELO",
                decimals: 18,
            },
        }
    }

    /// Build the catalog entry for this chain with its default RPC URL.
    #[must_use]
    pub fn metadata(self) -> ChainMetadata {
        ChainMetadata {
            chain_id: self.chain_id(),
            name: self.as_str(),
            native_currency: self.native_currency(),
            rpc_url: self.default_rpc_url().to_string(),
            block_explorer_url: self.block_explorer_url(),
        }
    }
}

impl std::fmt::Display for SupportedChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SupportedChain {
    type Err = EvmError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|chain| chain.as_str() == s)
            .ok_or_else(|| EvmError::UnsupportedChain(s.to_string()))
    }
}
