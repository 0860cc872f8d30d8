//! Contract call encoding.
//!
//! An [`Interface`] is an ordered set of function signatures parsed once at
//! startup. Encoding is pure and deterministic: the same (interface,
//! function, args) triple always yields byte-identical call data. The
//! signatures in [`token_interface`] and [`exchange_interface`] are wire
//! contracts with the deployed bytecode; changing them breaks compatibility.

use std::sync::OnceLock;

use alloy::dyn_abi::{DynSolValue, FunctionExt, JsonAbiExt};
use alloy::json_abi::Function;
use alloy::primitives::utils::{ParseUnits, format_units, parse_units};
use alloy::primitives::{Bytes, U256};

use crate::error::{EvmError, Result};

/// A parsed contract interface, looked up by function name.
#[derive(Debug, Clone)]
pub struct Interface {
    functions: Vec<Function>,
}

impl Interface {
    /// Parse human-readable function signatures into an interface.
    ///
    /// Fails with [`EvmError::Encoding`] on a malformed signature.
    pub fn parse(signatures: &[&str]) -> Result<Self> {
        let functions = signatures
            .iter()
            .map(|sig| {
                Function::parse(sig)
                    .map_err(|e| EvmError::encoding(format!("bad signature '{sig}': {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { functions })
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Result<&Function> {
        self.functions
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| EvmError::encoding(format!("function '{name}' not in interface")))
    }

    /// ABI-encode a call to `name` with the given arguments.
    ///
    /// Fails with [`EvmError::Encoding`] when the function is absent or an
    /// argument's runtime type does not match the declared parameter type.
    pub fn encode_input(&self, name: &str, args: &[DynSolValue]) -> Result<Bytes> {
        let function = self.function(name)?;
        function
            .abi_encode_input(args)
            .map(Bytes::from)
            .map_err(|e| EvmError::encoding(format!("encoding call to '{name}': {e}")))
    }

    /// Decode the return data of a call to `name`.
    pub fn decode_output(&self, name: &str, data: &[u8]) -> Result<Vec<DynSolValue>> {
        let function = self.function(name)?;
        function
            .abi_decode_output(data)
            .map_err(|e| EvmError::encoding(format!("decoding return of '{name}': {e}")))
    }
}

/// Interface of the ERC-20 token contract with its faucet entry point.
pub fn token_interface() -> &'static Interface {
    static INTERFACE: OnceLock<Interface> = OnceLock::new();
    INTERFACE.get_or_init(|| {
        Interface::parse(&[
            "function approve(address spender, uint256 amount) returns (bool)",
            "function balanceOf(address owner) view returns (uint256)",
            "function faucet()",
        ])
        .expect("static token interface")
    })
}

/// Interface of the exchange (pool) contract.
pub fn exchange_interface() -> &'static Interface {
    static INTERFACE: OnceLock<Interface> = OnceLock::new();
    INTERFACE.get_or_init(|| {
        Interface::parse(&[
            "function addLiquidity(uint256 amount) payable returns (uint256)",
            "function removeLiquidity(uint256 amount) returns (uint256, uint256)",
            "function getAmountOfTokens(uint256 inputAmount, uint256 inputReserve, uint256 outputReserve) view returns (uint256)",
            "function getReserve() view returns (uint256)",
            "function balanceOf(address owner) view returns (uint256)",
        ])
        .expect("static exchange interface")
    })
}

/// Scale a decimal amount string to the token's integer base unit.
///
/// `"2"` with 18 decimals yields 2×10^18. Rejects negative amounts, more
/// fractional digits than the token allows, and values that overflow, all
/// with [`EvmError::InvalidInput`].
pub fn scale_amount(amount: &str, decimals: u8) -> Result<U256> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(EvmError::invalid_input("amount is empty"));
    }
    let parsed = parse_units(trimmed, decimals)
        .map_err(|e| EvmError::invalid_input(format!("amount '{trimmed}': {e}")))?;
    match parsed {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(_) => Err(EvmError::invalid_input(format!(
            "amount '{trimmed}' must be non-negative"
        ))),
    }
}

/// Render a base-unit amount back as a decimal string for chat output.
pub fn display_amount(value: U256, decimals: u8) -> String {
    format_units(value, decimals).unwrap_or_else(|_| value.to_string())
}
