// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header, HeaderMap, Uri},
    routing::get,
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use url::Url;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorBody,
    models::{Nft, NftType, Token, Trait},
    state::AppState,
};

pub mod balance;
pub mod health;
pub mod nfts;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/api/user/{address}/balance", get(balance::get_token_balances))
        .route("/api/user/{address}/nfts", get(nfts::get_nfts))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Absolute URL of the current request, without its query.
///
/// `public_base` wins when configured. Otherwise the scheme comes from
/// `X-Forwarded-Proto` (default `http`) and the host from `Host`.
pub(crate) fn request_url(public_base: Option<&Url>, headers: &HeaderMap, uri: &Uri) -> Option<Url> {
    let path = uri.path();

    if let Some(base) = public_base {
        let mut url = base.clone();
        let prefix = base.path().trim_end_matches('/');
        url.set_path(&format!("{prefix}{path}"));
        url.set_query(None);
        url.set_fragment(None);
        return Some(url);
    }

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))?;
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|s| *s == "http" || *s == "https")
        .unwrap_or("http");

    Url::parse(&format!("{scheme}://{host}{path}")).ok()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        balance::get_token_balances,
        nfts::get_nfts,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            Token,
            Nft,
            NftType,
            Trait,
            ErrorBody,
            balance::TokenBalancesResponse,
            nfts::NftListResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Assets", description = "Wallet token balances and NFT holdings"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
