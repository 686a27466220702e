// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with the active upstream configuration.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Overall health status.
    pub status: String,
    /// Chain identifier sent to the aggregator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blockchain: Option<String>,
    /// Where token balances come from (`aggregator`, `known-tokens` or `quicknode`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance_source: Option<String>,
}

/// Health check endpoint handler.
///
/// The service holds no connections of its own, so it is healthy whenever
/// it can answer.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        blockchain: Some(state.assets.blockchain().to_string()),
        balance_source: Some(state.assets.balance_source().as_str().to_string()),
    })
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        blockchain: None,
        balance_source: None,
    })
}
