// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain constants and the default known-token table.

/// Aggregator chain identifier used when none is configured.
pub const DEFAULT_BLOCKCHAIN: &str = "base";

/// Address reported for the chain's native asset, which has no contract.
pub const NATIVE_TOKEN_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// A statically known ERC-20 token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Erc20Token {
    pub symbol: &'static str,
    pub name: &'static str,
    pub decimals: u32,
    pub address: &'static str,
}

/// Wrapped Ether on Base (OP Stack predeploy).
pub const WETH_TOKEN: Erc20Token = Erc20Token {
    symbol: "WETH",
    name: "Wrapped Ether",
    decimals: 18,
    address: "0x4200000000000000000000000000000000000006",
};

/// Bridged USDC on Base.
pub const USDBC_TOKEN: Erc20Token = Erc20Token {
    symbol: "USDbC",
    name: "USD Base Coin",
    decimals: 6,
    address: "0xd9aAEc86B65D86f6A7B5B1b0c42FFA531710b6CA",
};

/// Tokens queried one by one when the aggregator path is disabled.
pub const BASE_KNOWN_TOKENS: &[Erc20Token] = &[WETH_TOKEN, USDBC_TOKEN];
