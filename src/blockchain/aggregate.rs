// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Known-token balance aggregation.
//!
//! Used when the upstream cannot list a wallet's tokens itself: every token
//! in a configured [`KnownTokenList`] is queried with `eth_call` and the
//! results are merged into one list in table order.
//!
//! ## Failure model
//!
//! Fail-fast. The first failed query aborts the whole aggregation, pending
//! queries are dropped, and no partial list is returned.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::amount::{AmountError, RawBalance};
use super::erc20::{balance_of_calldata, decode_balance_word, Erc20Error};
use super::normalize::{normalize_tokens, NormalizeError, UpstreamAsset};
use super::types::{Erc20Token, BASE_KNOWN_TOKENS};
use super::upstream::{RpcTransport, UpstreamError};
use crate::models::{Token, DEFAULT_TOKEN_TYPE};

const ETH_CALL: &str = "eth_call";

/// A token whose balance is fetched contract by contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownToken {
    pub address: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
}

impl From<&Erc20Token> for KnownToken {
    fn from(token: &Erc20Token) -> Self {
        KnownToken {
            address: token.address.to_string(),
            symbol: token.symbol.to_string(),
            name: token.name.to_string(),
            decimals: token.decimals,
        }
    }
}

/// Ordered known-token table, fixed at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnownTokenList(Vec<KnownToken>);

impl KnownTokenList {
    pub fn new(tokens: Vec<KnownToken>) -> Self {
        Self(tokens)
    }

    /// WETH and USDbC on Base.
    pub fn base_defaults() -> Self {
        Self(BASE_KNOWN_TOKENS.iter().map(KnownToken::from).collect())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KnownToken> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Why a single known-token query failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenQueryError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Encoding(#[from] AmountError),

    #[error(transparent)]
    Call(#[from] Erc20Error),
}

/// Errors that end a known-token aggregation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregationError {
    #[error("Balance aggregation for {wallet} aborted at token {contract}: {source}")]
    Abort {
        wallet: String,
        contract: String,
        #[source]
        source: TokenQueryError,
    },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

/// Fetches balances for every configured known token.
pub struct KnownTokenAggregator {
    transport: Arc<dyn RpcTransport>,
    tokens: KnownTokenList,
}

impl KnownTokenAggregator {
    pub fn new(transport: Arc<dyn RpcTransport>, tokens: KnownTokenList) -> Self {
        Self { transport, tokens }
    }

    pub fn tokens(&self) -> &KnownTokenList {
        &self.tokens
    }

    /// Query every known token for `wallet` and return the holdings in
    /// table order, applying the same zero filter as the aggregator path.
    ///
    /// Queries run concurrently. The first failure cancels the rest.
    pub async fn aggregate(
        &self,
        wallet: &str,
        include_zero: bool,
    ) -> Result<Vec<Token>, AggregationError> {
        let queries = self.tokens.iter().map(|token| async move {
            self.query_balance(wallet, token)
                .await
                .map_err(|source| AggregationError::Abort {
                    wallet: wallet.to_string(),
                    contract: token.address.clone(),
                    source,
                })
        });
        let balances = try_join_all(queries).await?;

        let records = self
            .tokens
            .iter()
            .zip(balances)
            .map(|(token, balance)| UpstreamAsset {
                contract_address: Some(token.address.clone()),
                symbol: token.symbol.clone(),
                name: token.name.clone(),
                decimals: Some(token.decimals),
                token_type: Some(DEFAULT_TOKEN_TYPE.to_string()),
                balance: Some(RawBalance::Hex(balance)),
                ..Default::default()
            });

        let tokens = normalize_tokens(records, include_zero)?;

        tracing::debug!(
            wallet,
            queried = self.tokens.len(),
            returned = tokens.len(),
            "Aggregated known-token balances"
        );

        Ok(tokens)
    }

    async fn query_balance(
        &self,
        wallet: &str,
        token: &KnownToken,
    ) -> Result<String, TokenQueryError> {
        let data = balance_of_calldata(wallet)?;
        let params = json!([{ "to": token.address, "data": data }, "latest"]);

        tracing::debug!(wallet, token = %token.symbol, contract = %token.address, "Fetching known-token balance");

        let result = self.transport.call(ETH_CALL, params).await?;
        let word = match result {
            Value::String(word) => word,
            other => {
                return Err(UpstreamError::Decode {
                    method: ETH_CALL.to_string(),
                    reason: format!("expected hex string result, got {other}"),
                }
                .into())
            }
        };

        Ok(decode_balance_word(&word)?)
    }
}
