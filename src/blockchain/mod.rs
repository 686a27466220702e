// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance and asset normalization pipeline.
//!
//! This module provides functionality for:
//! - Scaling raw hex/decimal balances into decimal strings (`amount`)
//! - Reshaping aggregator asset records into `Token`/`Nft` (`normalize`)
//! - Forward-only cursor handling (`pagination`)
//! - Contract-by-contract balance aggregation for known tokens (`aggregate`)
//! - JSON-RPC access to the upstream aggregator (`upstream`)

pub mod aggregate;
pub mod amount;
pub mod erc20;
pub mod normalize;
pub mod pagination;
pub mod types;
pub mod upstream;

pub use aggregate::{AggregationError, KnownToken, KnownTokenAggregator, KnownTokenList};
pub use amount::{to_decimal_string, AmountError, RawBalance};
pub use normalize::{normalize_nfts, normalize_tokens, NormalizeError};
pub use pagination::{build_next_page, NextPage};
pub use types::*;
pub use upstream::{JsonRpcClient, RpcTransport, UpstreamError};
