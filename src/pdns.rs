// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! PowerDNS HTTP API client
//!
//! Implements [`ZoneStore`] against the PowerDNS authoritative server API:
//!
//! - `GET   /api/v1/servers/{server_id}/zones?zone={name}` to locate a zone
//! - `GET   /api/v1/servers/{server_id}/zones/{zone_id}` to fetch its RRsets
//! - `PATCH /api/v1/servers/{server_id}/zones/{zone_id}` to replace or delete RRsets
//!
//! Every request carries the `X-API-Key` header. Requests are not retried.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::{
    metrics,
    rrset::{RecordSetChange, Zone},
    store::{StoreError, ZoneStore},
};

/// Default PowerDNS server id
pub const DEFAULT_SERVER_ID: &str = "localhost";

const API_KEY_HEADER: &str = "X-API-Key";

/// Connection settings for a PowerDNS server
#[derive(Debug, Clone)]
pub struct PdnsConfig {
    /// Base URL of the API (e.g., "http://pdns:8081")
    pub server_url: String,
    /// Server id in API paths (default: "localhost")
    pub server_id: String,
    /// Value for the `X-API-Key` header
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Zone entry returned by the zone listing
#[derive(Debug, Deserialize)]
struct ZoneSummary {
    id: String,
    name: String,
}

/// Body of an RRset PATCH request
#[derive(Debug, Serialize)]
struct PatchRrsets<'a> {
    rrsets: &'a [RecordSetChange],
}

/// PowerDNS API client
#[derive(Clone)]
pub struct PdnsClient {
    http: HttpClient,
    base_url: String,
    server_id: String,
    api_key: String,
}

/// Build the API base URL from a server address
///
/// Adds `http://` when no scheme is given and strips trailing slashes.
pub(crate) fn build_api_url(server: &str) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        server.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", server.trim_end_matches('/'))
    }
}

impl PdnsClient {
    /// Create a client for the configured server
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: PdnsConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build PowerDNS HTTP client")?;

        let base_url = build_api_url(&config.server_url);
        info!(
            "Creating PowerDNS client for {} (server id: {})",
            base_url, config.server_id
        );

        Ok(Self {
            http,
            base_url,
            server_id: config.server_id,
            api_key: config.api_key,
        })
    }

    fn zones_url(&self) -> String {
        format!("{}/api/v1/servers/{}/zones", self.base_url, self.server_id)
    }

    fn zone_url(&self, zone_id: &str) -> String {
        format!("{}/{}", self.zones_url(), zone_id)
    }

    /// Send a request, timing it under `call` in metrics
    async fn send(&self, call: &str, request: RequestBuilder) -> Result<Response, StoreError> {
        let start = Instant::now();
        let result = request.header(API_KEY_HEADER, &self.api_key).send().await;
        let duration = start.elapsed().as_secs_f64();

        match result {
            Ok(response) => {
                let ok = response.status().is_success();
                metrics::record_store_request(call, ok, duration);
                Ok(response)
            }
            Err(e) => {
                error!(call = %call, error = %e, "PowerDNS request failed");
                metrics::record_store_request(call, false, duration);
                Err(StoreError::Transport(e.to_string()))
            }
        }
    }

    /// Zone listing for `zone_name`; the server may return zero or many
    async fn list_zones(&self, zone_name: &str) -> Result<Vec<ZoneSummary>, StoreError> {
        let request = self
            .http
            .get(self.zones_url())
            .query(&[("zone", zone_name)]);
        let response = self.send("list_zones", request).await?;
        let response = check_status(response, zone_name).await?;

        response
            .json::<Vec<ZoneSummary>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    /// Exactly one zone must match `zone_name`
    async fn locate(&self, zone_name: &str) -> Result<ZoneSummary, StoreError> {
        let mut zones = self.list_zones(zone_name).await?;
        if zones.len() != 1 {
            debug!(
                "Zone lookup for {} matched {} zones",
                zone_name,
                zones.len()
            );
            return Err(StoreError::NotFound(zone_name.to_string()));
        }
        let zone = zones.remove(0);
        debug!("Resolved zone {} to id {}", zone.name, zone.id);
        Ok(zone)
    }

    async fn patch_rrset(&self, zone_id: &str, change: &RecordSetChange) -> Result<(), StoreError> {
        debug!(
            "Applying {} to {} {} in zone {}",
            change.changetype.as_str(),
            change.name,
            change.record_type,
            zone_id
        );

        let body = PatchRrsets {
            rrsets: std::slice::from_ref(change),
        };
        let request = self.http.patch(self.zone_url(zone_id)).json(&body);
        let response = self.send("patch_rrsets", request).await?;

        let status = response.status();
        if !status.is_success() {
            let message = error_text(response).await;
            error!(
                "PowerDNS rejected {} {} {}: {}",
                change.changetype.as_str(),
                change.name,
                change.record_type,
                message
            );
            return Err(StoreError::Apply {
                name: change.name.clone(),
                record_type: change.record_type.clone(),
                message: format!("HTTP {}: {}", status, message),
            });
        }

        Ok(())
    }
}

/// Map a non-success status to a [`StoreError`]
async fn check_status(response: Response, zone_name: &str) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound(zone_name.to_string()));
    }
    let message = error_text(response).await;
    Err(StoreError::Transport(format!("HTTP {}: {}", status, message)))
}

/// Error message from a PowerDNS error body (`{"error": "..."}`), or the raw text
async fn error_text(response: Response) -> String {
    #[derive(Deserialize)]
    struct PdnsError {
        error: String,
    }

    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    serde_json::from_str::<PdnsError>(&text)
        .map(|e| e.error)
        .unwrap_or_else(|_| text.trim().to_string())
}

#[async_trait]
impl ZoneStore for PdnsClient {
    async fn fetch_zone(&self, zone_name: &str) -> Result<Zone, StoreError> {
        let summary = self.locate(zone_name).await?;

        let request = self.http.get(self.zone_url(&summary.id));
        let response = self.send("get_zone", request).await?;
        let response = check_status(response, zone_name).await?;

        let zone = response
            .json::<Zone>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        debug!("Fetched zone {} with {} RRsets", zone.name, zone.rrsets.len());
        Ok(zone)
    }

    async fn zone_id(&self, zone_name: &str) -> Result<String, StoreError> {
        self.locate(zone_name).await.map(|z| z.id)
    }

    async fn apply(&self, zone_id: &str, changes: &[RecordSetChange]) -> Result<(), StoreError> {
        for change in changes {
            self.patch_rrset(zone_id, change).await?;
        }
        Ok(())
    }
}
