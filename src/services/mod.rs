// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

pub mod wallet_assets;

pub use wallet_assets::{AssetError, BalanceSource, NftPage, TokenPage, WalletAssets};
