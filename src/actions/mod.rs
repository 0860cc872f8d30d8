//! Per-operation action tools.
//!
//! Every write action here is the same shape: build a [`ContractCall`]
//! (or a plain value transfer), submit it, await confirmation, return a
//! [`TransactionResult`]. The modules differ only in the
//! contract/function/argument triples they assemble and the parameter bags
//! they validate.
//!
//! [`ContractCall`]: crate::tx::ContractCall
//! [`TransactionResult`]: crate::tx::TransactionResult

mod faucet;
mod liquidity;
mod opportunities;
mod pool_info;
mod transfer;

pub use faucet::{FaucetAction, FaucetParams};
pub use liquidity::{
    AddLiquidityAction, AddLiquidityParams, RemoveLiquidityAction, RemoveLiquidityParams,
};
pub use opportunities::{
    MerklClient, OpportunitiesAction, OpportunityParams, PoolOpportunity, PoolToken,
};
pub use pool_info::{PoolInfoAction, PoolInfoParams, SwapDirection};
pub use transfer::{TransferAction, TransferParams};
