// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    blockchain::{aggregate::AggregationError, upstream::UpstreamError},
    models::InvalidAddress,
    services::AssetError,
};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

/// JSON error body returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub error_code: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_request", message)
    }

    pub fn invalid_address(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_address", message)
    }

    pub fn bad_gateway(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, code, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "upstream_unavailable", message)
    }

    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, "upstream_timeout", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code.to_string(),
        });
        (self.status, body).into_response()
    }
}

impl From<InvalidAddress> for ApiError {
    fn from(err: InvalidAddress) -> Self {
        ApiError::invalid_address(err.to_string())
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match &err {
            UpstreamError::Api { message, .. } => ApiError::bad_gateway("upstream_api_error", message.clone()),
            UpstreamError::Decode { .. } => ApiError::bad_gateway("upstream_decode_error", err.to_string()),
            UpstreamError::Timeout { .. } => ApiError::gateway_timeout(err.to_string()),
            UpstreamError::Transport { .. } | UpstreamError::Http { .. } | UpstreamError::InvalidUrl(_) => {
                ApiError::service_unavailable(err.to_string())
            }
        }
    }
}

impl From<AssetError> for ApiError {
    fn from(err: AssetError) -> Self {
        tracing::error!(error = %err, "Wallet asset request failed");
        match err {
            AssetError::Upstream(upstream) => upstream.into(),
            AssetError::Normalize(normalize) => {
                ApiError::bad_gateway("upstream_data_invalid", normalize.to_string())
            }
            AssetError::Aggregation(AggregationError::Normalize(normalize)) => {
                ApiError::bad_gateway("upstream_data_invalid", normalize.to_string())
            }
            AssetError::Aggregation(abort @ AggregationError::Abort { .. }) => {
                ApiError::bad_gateway("aggregation_aborted", abort.to_string())
            }
        }
    }
}
