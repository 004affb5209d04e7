// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! rrsync API Server
//!
//! A lightweight HTTP REST API server that manages individual DNS records in
//! PowerDNS zones by:
//! - Fetching the zone's current RRsets from the PowerDNS API
//! - Planning the RRset replacements and deletions a request needs
//! - Applying them through the PowerDNS API, one RRset at a time

use anyhow::Context;
use axum::{
    extract::State,
    http::StatusCode,
    middleware as axum_middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Import from the library
use rrsync::{
    auth::{authenticate, BearerToken},
    config::Config,
    metrics, middleware,
    pdns::PdnsClient,
    provider::Provider,
    records, rrset,
    types::{AppState, ErrorResponse},
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        records::list_records,
        records::append_records,
        records::set_records,
        records::delete_records,
    ),
    components(
        schemas(
            records::RecordsRequest,
            records::RecordsResponse,
            records::RecordListResponse,
            rrset::Record,
        )
    ),
    tags(
        (name = "records", description = "Record management endpoints")
    ),
    info(
        title = "rrsync API",
        version = "0.1.0",
        description = "Record-level append/set/delete API for PowerDNS zones",
        license(name = "MIT")
    )
)]
struct ApiDoc;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Readiness check response
#[derive(Serialize)]
struct ReadyResponse {
    ready: bool,
    checks: Vec<String>,
}

/// Settings reported by the readiness check
#[derive(Clone)]
struct ReadyInfo {
    pdns_server_url: String,
    pdns_server_id: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Metrics endpoint for Prometheus scraping
async fn metrics_handler() -> Response {
    match metrics::gather_metrics() {
        Ok(metrics_text) => (
            StatusCode::OK,
            [("Content-Type", "text/plain; version=0.0.4")],
            metrics_text,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to gather metrics: {}", e),
                details: None,
            }),
        )
            .into_response(),
    }
}

/// Readiness check endpoint
///
/// PowerDNS is not probed; zone lookups surface store errors per request.
async fn ready_check(State(info): State<ReadyInfo>) -> Json<ReadyResponse> {
    Json(ReadyResponse {
        ready: true,
        checks: vec![
            format!("pdns_server_url: {}", info.pdns_server_url),
            format!("pdns_server_id: {}", info.pdns_server_id),
        ],
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .init();

    info!("starting rrsync api server v{}", env!("CARGO_PKG_VERSION"));

    // initialize metrics
    metrics::init_metrics();

    // get configuration from environment
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        error!("invalid configuration: {}", e);
        return Err(anyhow::anyhow!("invalid configuration: {}", e));
    }

    info!("powerdns api: {}", config.pdns_server_url);
    info!("powerdns server id: {}", config.pdns_server_id);
    info!("api port: {}", config.api_port);
    if config.disable_auth {
        warn!("authentication is disabled - record endpoints are unprotected!");
    } else {
        info!("authentication is enabled");
    }

    // create powerdns client
    let client = PdnsClient::new(config.pdns()).context("failed to create powerdns client")?;

    // create application state
    let state = AppState {
        provider: Arc::new(Provider::new(Arc::new(client))),
    };

    // build api routes
    let api_routes = records::router(state);

    // conditionally apply authentication middleware
    let api_routes = match (&config.api_token, config.disable_auth) {
        (_, true) | (None, _) => api_routes,
        (Some(token), false) => api_routes.layer(axum_middleware::from_fn_with_state(
            BearerToken::new(token.clone()),
            authenticate,
        )),
    };

    let ready_info = ReadyInfo {
        pdns_server_url: config.pdns_server_url.clone(),
        pdns_server_id: config.pdns_server_id.clone(),
    };

    // build main router
    let app = Router::new()
        .merge(SwaggerUi::new("/api/v1/docs").url("/api/v1/openapi.json", ApiDoc::openapi()))
        .route("/api/v1/health", get(health_check))
        .route("/api/v1/ready", get(ready_check).with_state(ready_info))
        .route("/metrics", get(metrics_handler))
        .nest("/api/v1", api_routes)
        .layer(axum_middleware::from_fn(middleware::track_metrics))
        .layer(TraceLayer::new_for_http());

    // start server
    let addr = format!("0.0.0.0:{}", config.api_port);

    info!("rrsync api server listening on {}", addr);
    info!("swagger ui available at http://{}/api/v1/docs", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app.into_make_service())
        .await
        .context("server error")?;

    Ok(())
}
