//! Wallet provider and per-chain client handles.
//!
//! ```text
//! WalletProvider (key custody + client cache)
//!   ├── account()              → derived address, no I/O
//!   ├── read_client(chain)     → Arc<dyn ReadClient>   (balances, reads, receipts)
//!   ├── write_client(chain)    → Arc<dyn WriteClient>  (sign + broadcast, serialized)
//!   └── chain_metadata(chain)  → registry entry with RPC override applied
//! ```
//!
//! The client traits are the seam tests mock; production handles are HTTP
//! providers built lazily and cached per chain.

mod clients;
mod provider;

pub use clients::{HttpReadClient, HttpWriteClient, ReadClient, WriteClient};
pub use provider::WalletProvider;
