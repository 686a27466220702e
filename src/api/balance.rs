// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token balance endpoint.

use axum::{
    extract::{rejection::QueryRejection, OriginalUri, Path, Query, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    api::request_url,
    blockchain::pagination::{build_next_page, query_pairs},
    error::{ApiError, ErrorBody},
    models::{Token, WalletAddress},
    state::AppState,
};

pub const MAX_PAGE_SIZE: u32 = 1000;

/// Query parameters for the balance request.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BalanceQuery {
    /// Include tokens whose balance is zero. Only the literal `true` enables it.
    #[param(value_type = Option<bool>, default = false)]
    pub include_zero_balance: Option<String>,
    /// Cursor from a previous response's `nextPageToken`.
    pub page_token: Option<String>,
    /// Page size forwarded to the aggregator (1 to 1000).
    #[param(minimum = 1, maximum = 1000)]
    pub page_size: Option<u32>,
}

impl BalanceQuery {
    pub fn include_zero_balance(&self) -> bool {
        self.include_zero_balance.as_deref() == Some("true")
    }

    fn validated_page_size(&self) -> Result<Option<u32>, ApiError> {
        match self.page_size {
            Some(size) if size == 0 || size > MAX_PAGE_SIZE => Err(ApiError::bad_request(format!(
                "pageSize must be between 1 and {MAX_PAGE_SIZE}"
            ))),
            other => Ok(other),
        }
    }
}

/// One page of token balances.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalancesResponse {
    /// Queried wallet address.
    pub address: String,
    pub tokens: Vec<Token>,
    /// Empty on the last page.
    pub next_page_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_url: Option<String>,
}

/// Get the token balances held by a wallet.
///
/// Returns one page of fungible tokens with raw and formatted balances.
#[utoipa::path(
    get,
    path = "/api/user/{address}/balance",
    tag = "Assets",
    params(
        ("address" = String, Path, description = "Wallet address (0x + 40 hex characters)"),
        BalanceQuery
    ),
    responses(
        (status = 200, description = "Token balances retrieved", body = TokenBalancesResponse),
        (status = 400, description = "Invalid address or query", body = ErrorBody),
        (status = 502, description = "Upstream returned an error or malformed data", body = ErrorBody),
        (status = 503, description = "Upstream unavailable", body = ErrorBody),
        (status = 504, description = "Upstream timed out", body = ErrorBody)
    )
)]
pub async fn get_token_balances(
    State(state): State<AppState>,
    Path(address): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    query: Result<Query<BalanceQuery>, QueryRejection>,
) -> Result<Json<TokenBalancesResponse>, ApiError> {
    let address = WalletAddress::parse(&address)?;
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let page_size = query.validated_page_size()?;

    let page = state
        .assets
        .get_token_balances(
            &address,
            query.include_zero_balance(),
            query.page_token.as_deref(),
            page_size,
        )
        .await?;

    let base = request_url(state.public_base_url.as_ref(), &headers, &uri);
    let next = build_next_page(base.as_ref(), &query_pairs(uri.query()), &page.next_page_token);

    Ok(Json(TokenBalancesResponse {
        address: address.into(),
        tokens: page.tokens,
        next_page_token: next.page_token,
        next_page_url: next.url,
    }))
}
