//! Error types for EVM plugin operations.
//!
//! Every failure a chain operation can hit maps onto one [`EvmError`]
//! variant. Flows wrap these with a short operation prefix at the tool
//! boundary ("addLiquidity failed: ...") and re-raise them; nothing is
//! swallowed beyond diagnostic logging, and nothing is retried here.

use alloy::primitives::B256;

/// Result type alias for plugin operations.
pub type Result<T, E = EvmError> = std::result::Result<T, E>;

/// The error taxonomy for chain operations.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum EvmError {
    /// The requested chain name is not in the static catalog.
    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),

    /// A signing operation was requested but no private key was configured.
    #[error("no private key configured")]
    MissingCredential,

    /// ABI encoding or decoding failed (unknown function, argument type
    /// mismatch, malformed return data).
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The RPC endpoint could not be reached or rejected the request.
    #[error("network error: {0}")]
    Network(String),

    /// The transaction was mined but reverted on-chain.
    #[error("transaction {hash} reverted: {reason}")]
    Reverted {
        /// Hash of the reverted transaction.
        hash: B256,
        /// Revert reason as reported by the node.
        reason: String,
    },

    /// No receipt was observed within the configured confirmation bound.
    #[error("transaction {hash} not confirmed after {waited_secs}s")]
    Timeout {
        /// Hash of the transaction still pending when the bound elapsed.
        hash: B256,
        /// How long the caller waited.
        waited_secs: u64,
    },

    /// Malformed amount, address, or other upstream parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EvmError {
    /// Create an encoding error.
    #[must_use]
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create a network error.
    #[must_use]
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error reflects a transient network condition.
    ///
    /// Retrying is a host-level policy; this only classifies.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout { .. })
    }
}
