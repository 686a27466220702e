// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet token balances and NFT holdings.
//!
//! Entry point used by the HTTP handlers. Each call fetches one page from the
//! upstream, normalizes it and hands back the upstream cursor untouched.

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::{
    blockchain::{
        aggregate::{AggregationError, KnownTokenAggregator},
        normalize::{
            normalize_nfts, normalize_tokens, AccountBalancePage, NftsByOwnerPage, NormalizeError,
            UpstreamAsset, WalletTokenRecord,
        },
        upstream::{decode_result, RpcTransport, UpstreamError},
    },
    models::{Nft, Token, WalletAddress},
};

const GET_ACCOUNT_BALANCE: &str = "ankr_getAccountBalance";
const GET_NFTS_BY_OWNER: &str = "ankr_getNFTsByOwner";
const GET_WALLET_TOKEN_BALANCE: &str = "qn_getWalletTokenBalance";

/// Where token balances come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalanceSource {
    /// The aggregator lists every token the wallet holds, paginated.
    #[default]
    Aggregator,
    /// Each configured known token is queried with `eth_call`.
    KnownTokens,
    /// QuickNode's Token API lists the wallet's tokens in a single page.
    QuickNode,
}

impl BalanceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceSource::Aggregator => "aggregator",
            BalanceSource::KnownTokens => "known-tokens",
            BalanceSource::QuickNode => "quicknode",
        }
    }
}

impl std::str::FromStr for BalanceSource {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "aggregator" => Ok(BalanceSource::Aggregator),
            "known-tokens" | "known_tokens" => Ok(BalanceSource::KnownTokens),
            "quicknode" => Ok(BalanceSource::QuickNode),
            other => Err(format!(
                "unknown balance source `{other}` (expected `aggregator`, `known-tokens` or `quicknode`)"
            )),
        }
    }
}

/// Errors surfaced by [`WalletAssets`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),
}

/// One page of token holdings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPage {
    pub tokens: Vec<Token>,
    /// Upstream cursor; empty on the final page.
    pub next_page_token: String,
}

/// One page of NFT holdings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftPage {
    pub nfts: Vec<Nft>,
    /// Upstream cursor; empty on the final page.
    pub next_page_token: String,
}

/// Wallet asset queries against the configured upstream.
pub struct WalletAssets {
    aggregator: Arc<dyn RpcTransport>,
    known_tokens: KnownTokenAggregator,
    quicknode: Option<Arc<dyn RpcTransport>>,
    blockchain: String,
    balance_source: BalanceSource,
}

impl WalletAssets {
    pub fn new(
        aggregator: Arc<dyn RpcTransport>,
        known_tokens: KnownTokenAggregator,
        blockchain: impl Into<String>,
        balance_source: BalanceSource,
    ) -> Self {
        Self {
            aggregator,
            known_tokens,
            quicknode: None,
            blockchain: blockchain.into(),
            balance_source,
        }
    }

    /// Attach the QuickNode endpoint used by [`BalanceSource::QuickNode`].
    pub fn with_quicknode(mut self, transport: Arc<dyn RpcTransport>) -> Self {
        self.quicknode = Some(transport);
        self
    }

    pub fn blockchain(&self) -> &str {
        &self.blockchain
    }

    pub fn balance_source(&self) -> BalanceSource {
        self.balance_source
    }

    /// Fetch one page of fungible token balances for `address`.
    pub async fn get_token_balances(
        &self,
        address: &WalletAddress,
        include_zero_balance: bool,
        page_token: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<TokenPage, AssetError> {
        match self.balance_source {
            BalanceSource::Aggregator => {
                self.aggregated_balances(address, include_zero_balance, page_token, page_size)
                    .await
            }
            BalanceSource::KnownTokens => {
                if page_token.is_some_and(|t| !t.is_empty()) {
                    tracing::debug!(wallet = %address, "Known-token balances are a single page; ignoring pageToken");
                }
                let tokens = self
                    .known_tokens
                    .aggregate(address.as_str(), include_zero_balance)
                    .await?;
                Ok(TokenPage {
                    tokens,
                    next_page_token: String::new(),
                })
            }
            BalanceSource::QuickNode => {
                if page_token.is_some_and(|t| !t.is_empty()) {
                    tracing::debug!(wallet = %address, "QuickNode balances are a single page; ignoring pageToken");
                }
                self.quicknode_balances(address, include_zero_balance).await
            }
        }
    }

    async fn quicknode_balances(
        &self,
        address: &WalletAddress,
        include_zero_balance: bool,
    ) -> Result<TokenPage, AssetError> {
        let transport = self.quicknode.as_ref().ok_or_else(|| {
            UpstreamError::InvalidUrl("QuickNode provider URL is not configured".into())
        })?;

        let result = transport
            .call(
                GET_WALLET_TOKEN_BALANCE,
                json!([address.as_str(), include_zero_balance]),
            )
            .await
            .inspect_err(|e| tracing::warn!(wallet = %address, error = %e, "QuickNode balance query failed"))?;
        let records: Vec<WalletTokenRecord> = match result {
            Value::Null => Vec::new(),
            result => decode_result(GET_WALLET_TOKEN_BALANCE, result)?,
        };

        let received = records.len();
        let tokens = normalize_tokens(
            records.into_iter().map(UpstreamAsset::from),
            include_zero_balance,
        )?;

        tracing::info!(
            wallet = %address,
            received,
            returned = tokens.len(),
            "Fetched QuickNode token balances"
        );

        Ok(TokenPage {
            tokens,
            next_page_token: String::new(),
        })
    }

    async fn aggregated_balances(
        &self,
        address: &WalletAddress,
        include_zero_balance: bool,
        page_token: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<TokenPage, AssetError> {
        let mut params = self.base_params(address);
        if let Some(token) = page_token.filter(|t| !t.is_empty()) {
            params.insert("pageToken".into(), json!(token));
        }
        if let Some(size) = page_size {
            params.insert("pageSize".into(), json!(size));
        }

        let result = self
            .aggregator
            .call(GET_ACCOUNT_BALANCE, Value::Object(params))
            .await
            .inspect_err(|e| tracing::warn!(wallet = %address, error = %e, "Token balance query failed"))?;
        let page: AccountBalancePage = decode_result(GET_ACCOUNT_BALANCE, result)?;

        let received = page.assets.len();
        let tokens = normalize_tokens(
            page.assets.into_iter().map(UpstreamAsset::from),
            include_zero_balance,
        )?;

        tracing::info!(
            wallet = %address,
            received,
            returned = tokens.len(),
            has_next = !page.next_page_token.is_empty(),
            "Fetched token balances"
        );

        Ok(TokenPage {
            tokens,
            next_page_token: page.next_page_token,
        })
    }

    /// Fetch one page of NFTs held by `address`.
    pub async fn get_nfts(
        &self,
        address: &WalletAddress,
        include_metadata: bool,
        page_token: Option<&str>,
    ) -> Result<NftPage, AssetError> {
        let mut params = self.base_params(address);
        params.insert("includeMetadata".into(), json!(include_metadata));
        if let Some(token) = page_token.filter(|t| !t.is_empty()) {
            params.insert("pageToken".into(), json!(token));
        }

        let result = self
            .aggregator
            .call(GET_NFTS_BY_OWNER, Value::Object(params))
            .await
            .inspect_err(|e| tracing::warn!(wallet = %address, error = %e, "NFT query failed"))?;
        let page: NftsByOwnerPage = decode_result(GET_NFTS_BY_OWNER, result)?;

        let received = page.assets.len();
        let nfts = normalize_nfts(page.assets);

        tracing::info!(
            wallet = %address,
            received,
            returned = nfts.len(),
            has_next = !page.next_page_token.is_empty(),
            "Fetched NFTs"
        );

        Ok(NftPage {
            nfts,
            next_page_token: page.next_page_token,
        })
    }

    fn base_params(&self, address: &WalletAddress) -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("blockchain".into(), json!(self.blockchain));
        params.insert("walletAddress".into(), json!(address.as_str()));
        params
    }
}
