// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Common types and errors used throughout the rrsync library

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::{provider::Provider, store::StoreError};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Record operations against the zone store
    pub provider: Arc<Provider>,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Zone not found: {0}")]
    ZoneNotFound(String),

    /// PowerDNS rejected the change to `rrset` ("name type") with `reason`
    #[error("Failed to apply changes: {rrset} was rejected")]
    ApplyFailed { rrset: String, reason: String },

    #[error("Zone store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(zone) => ApiError::ZoneNotFound(zone),
            StoreError::Apply {
                name,
                record_type,
                message,
            } => ApiError::ApplyFailed {
                rrset: format!("{} {}", name, record_type),
                reason: message,
            },
            StoreError::Transport(msg) => ApiError::StoreUnavailable(msg),
            StoreError::Decode(msg) => ApiError::StoreUnavailable(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ZoneNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ApplyFailed { .. } => StatusCode::BAD_GATEWAY,
            ApiError::StoreUnavailable(_) => StatusCode::BAD_GATEWAY,
        };

        let details = match &self {
            ApiError::ApplyFailed { reason, .. } => Some(reason.clone()),
            _ => None,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            details,
        });

        (status, body).into_response()
    }
}
