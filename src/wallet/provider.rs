//! Wallet provider: credential custody and per-chain client handles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use tracing::info;

use crate::chain::{ChainMetadata, SupportedChain};
use crate::config::{PRIVATE_KEY_ENV_VAR, PluginConfig};
use crate::error::{EvmError, Result};
use crate::wallet::clients::{HttpReadClient, HttpWriteClient, ReadClient, WriteClient};

/// Holds the signing credential and hands out per-chain clients.
///
/// The private key never leaves this type; callers only ever see the
/// derived address. Clients are created lazily on first request for a
/// chain and cached for the provider's lifetime, so there is at most one
/// write client (and therefore one submission queue) per chain.
pub struct WalletProvider {
    signer: Option<PrivateKeySigner>,
    config: PluginConfig,
    read_clients: Mutex<HashMap<SupportedChain, Arc<dyn ReadClient>>>,
    write_clients: Mutex<HashMap<SupportedChain, Arc<dyn WriteClient>>>,
}

impl WalletProvider {
    /// Create a provider from an optional hex private key.
    ///
    /// The key must be `0x`-prefixed and decode to a 32-byte secp256k1
    /// key; anything else fails with [`EvmError::InvalidInput`]. Without a
    /// key the provider serves read clients only.
    pub fn new(private_key: Option<&str>, config: PluginConfig) -> Result<Self> {
        let signer = private_key.map(parse_private_key).transpose()?;

        match &signer {
            Some(signer) => info!(address = %signer.address(), "wallet provider initialized"),
            None => info!("wallet provider initialized without credential (read-only)"),
        }

        Ok(Self {
            signer,
            config,
            read_clients: Mutex::new(HashMap::new()),
            write_clients: Mutex::new(HashMap::new()),
        })
    }

    /// Create a provider with the key from `EVM_PRIVATE_KEY`, if set.
    pub fn from_env(config: PluginConfig) -> Result<Self> {
        let key = std::env::var(PRIVATE_KEY_ENV_VAR).ok();
        Self::new(key.as_deref(), config)
    }

    /// The account address derived from the credential.
    ///
    /// Pure and deterministic; fails with [`EvmError::MissingCredential`]
    /// when the provider holds no key.
    pub fn account(&self) -> Result<Address> {
        self.signer
            .as_ref()
            .map(PrivateKeySigner::address)
            .ok_or(EvmError::MissingCredential)
    }

    /// Whether a signing credential is configured.
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.signer.is_some()
    }

    /// The plugin configuration this provider was built with.
    #[must_use]
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Catalog metadata for a chain, with the configured RPC override
    /// applied.
    #[must_use]
    pub fn chain_metadata(&self, chain: SupportedChain) -> ChainMetadata {
        let mut metadata = chain.metadata();
        metadata.rpc_url = self.config.rpc_url(chain);
        metadata
    }

    /// A read-only client for the chain, cached per chain.
    pub fn read_client(&self, chain: SupportedChain) -> Result<Arc<dyn ReadClient>> {
        let mut cache = self.read_clients.lock().expect("read client cache poisoned");
        if let Some(client) = cache.get(&chain) {
            return Ok(Arc::clone(client));
        }
        let client: Arc<dyn ReadClient> = Arc::new(HttpReadClient::new(self.chain_metadata(chain))?);
        cache.insert(chain, Arc::clone(&client));
        Ok(client)
    }

    /// A signing client for the chain, cached per chain.
    ///
    /// Fails with [`EvmError::MissingCredential`] when the provider was
    /// constructed without a key.
    pub fn write_client(&self, chain: SupportedChain) -> Result<Arc<dyn WriteClient>> {
        let signer = self.signer.as_ref().ok_or(EvmError::MissingCredential)?;

        let mut cache = self.write_clients.lock().expect("write client cache poisoned");
        if let Some(client) = cache.get(&chain) {
            return Ok(Arc::clone(client));
        }
        let client: Arc<dyn WriteClient> = Arc::new(HttpWriteClient::new(
            self.chain_metadata(chain),
            signer.clone(),
        )?);
        cache.insert(chain, Arc::clone(&client));
        Ok(client)
    }
}

impl std::fmt::Debug for WalletProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletProvider")
            .field("account", &self.signer.as_ref().map(PrivateKeySigner::address))
            .field("default_chain", &self.config.default_chain)
            .finish_non_exhaustive()
    }
}

fn parse_private_key(key: &str) -> Result<PrivateKeySigner> {
    let Some(hex) = key.strip_prefix("0x") else {
        return Err(EvmError::invalid_input("private key must be 0x-prefixed"));
    };
    hex.parse()
        .map_err(|e| EvmError::invalid_input(format!("invalid private key: {e}")))
}
