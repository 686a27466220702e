// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ERC-20 `balanceOf` call encoding.

use std::str::FromStr;

use alloy::{
    primitives::{hex, Address},
    sol,
    sol_types::SolCall,
};

use super::amount::{parse_hex, AmountError};

sol! {
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Errors raised while preparing an ERC-20 call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Erc20Error {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

/// ABI-encoded `balanceOf(owner)` calldata as a `0x`-prefixed hex string.
pub fn balance_of_calldata(owner: &str) -> Result<String, Erc20Error> {
    let account =
        Address::from_str(owner).map_err(|e| Erc20Error::InvalidAddress(format!("{owner}: {e}")))?;
    let call = IERC20::balanceOfCall { account };
    Ok(hex::encode_prefixed(call.abi_encode()))
}

/// Collapse an ABI `uint256` return word into minimal hex (`0x0`, `0x58c5...`).
///
/// `eth_call` pads the word to 32 bytes; the literal zero check downstream
/// only recognises the minimal form.
pub fn decode_balance_word(word: &str) -> Result<String, AmountError> {
    let value = parse_hex(word)?;
    Ok(format!("0x{}", value.to_str_radix(16)))
}
