// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! NFT holdings endpoint.

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
    models::{Nft, WalletAddress},
    state::AppState,
};

/// Query parameters for the NFT request.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct NftQuery {
    /// Ask upstream for names, images and traits.
    #[param(default = true)]
    pub include_metadata: Option<bool>,
    /// Cursor from a previous response's `nextPageToken`.
    pub page_token: Option<String>,
}

/// One page of NFTs.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NftListResponse {
    /// Queried wallet address.
    pub address: String,
    pub nfts: Vec<Nft>,
    /// Empty on the last page.
    pub next_page_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_url: Option<String>,
}

/// List the ERC-721 and ERC-1155 tokens held by a wallet.
#[utoipa::path(
    get,
    path = "/api/user/{address}/nfts",
    tag = "Assets",
    params(
        ("address" = String, Path, description = "Wallet address (0x + 40 hex characters)"),
        NftQuery
    ),
    responses(
        (status = 200, description = "NFTs retrieved", body = NftListResponse),
        (status = 400, description = "Invalid address or query", body = ErrorBody),
        (status = 502, description = "Upstream returned an error or malformed data", body = ErrorBody),
        (status = 503, description = "Upstream unavailable", body = ErrorBody),
        (status = 504, description = "Upstream timed out", body = ErrorBody)
    )
)]
pub async fn get_nfts(
    State(state): State<AppState>,
    Path(address): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    query: Result<Query<NftQuery>, QueryRejection>,
) -> Result<Json<NftListResponse>, ApiError> {
    let address = WalletAddress::parse(&address)?;
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let page = state
        .assets
        .get_nfts(
            &address,
            query.include_metadata.unwrap_or(true),
            query.page_token.as_deref(),
        )
        .await?;

    let base = request_url(state.public_base_url.as_ref(), &headers, &uri);
    let next = build_next_page(base.as_ref(), &query_pairs(uri.query()), &page.next_page_token);

    Ok(Json(NftListResponse {
        address: address.into(),
        nfts: page.nfts,
        next_page_token: next.page_token,
        next_page_url: next.url,
    }))
}
