// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Bearer token authentication middleware
//!
//! Requests to the record API must carry `Authorization: Bearer <token>`
//! matching the token configured with `API_TOKEN`.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Error response for authentication failures
#[derive(Serialize)]
pub struct AuthError {
    pub error: String,
}

/// Token that callers must present
#[derive(Clone)]
pub struct BearerToken(Arc<str>);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Arc::from(token.into()))
    }

    pub(crate) fn matches(&self, presented: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), presented.as_bytes())
    }
}

/// Byte comparison whose running time does not depend on where the inputs differ
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

fn unauthorized(message: &str) -> (StatusCode, Json<AuthError>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(AuthError {
            error: message.to_string(),
        }),
    )
}

/// Authentication middleware
///
/// # Errors
/// Returns 401 Unauthorized if:
/// - No Authorization header is present
/// - Authorization header is not a Bearer token
/// - Token is empty or does not match
pub async fn authenticate(
    State(expected): State<BearerToken>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<AuthError>)> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            warn!("Missing Authorization header");
            unauthorized("Missing Authorization header")
        })?;

    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        warn!("Invalid Authorization header format");
        return Err(unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>",
        ));
    };

    if token.is_empty() {
        warn!("Empty token in Authorization header");
        return Err(unauthorized("Empty token"));
    }

    if !expected.matches(token) {
        warn!("Invalid bearer token");
        return Err(unauthorized("Invalid token"));
    }

    debug!("Request authenticated");

    Ok(next.run(request).await)
}
