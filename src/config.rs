// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Server configuration from environment variables

use std::time::Duration;

use crate::pdns::{PdnsConfig, DEFAULT_SERVER_ID};

pub const DEFAULT_API_PORT: u16 = 8080;
pub const DEFAULT_PDNS_TIMEOUT_SECS: u64 = 30;

/// rrsync server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PowerDNS API base URL
    pub pdns_server_url: String,
    /// PowerDNS server id
    pub pdns_server_id: String,
    /// PowerDNS API key
    pub pdns_api_key: String,
    /// PowerDNS request timeout in seconds
    pub pdns_timeout_secs: u64,
    /// Port for the HTTP API
    pub api_port: u16,
    /// Bearer token required on record endpoints
    pub api_token: Option<String>,
    /// Serve record endpoints without authentication
    pub disable_auth: bool,
}

impl Config {
    /// Create configuration from environment variables
    ///
    /// Environment variables:
    /// - `PDNS_SERVER_URL`: PowerDNS API URL (required)
    /// - `PDNS_SERVER_ID`: PowerDNS server id (default: localhost)
    /// - `PDNS_API_KEY`: PowerDNS API key (required)
    /// - `PDNS_TIMEOUT_SECS`: PowerDNS request timeout (default: 30)
    /// - `API_PORT`: HTTP listen port (default: 8080)
    /// - `API_TOKEN`: bearer token for the record API
    /// - `DISABLE_AUTH`: skip bearer authentication (default: false)
    pub fn from_env() -> Self {
        let pdns_server_url = std::env::var("PDNS_SERVER_URL").unwrap_or_default();

        let pdns_server_id =
            std::env::var("PDNS_SERVER_ID").unwrap_or_else(|_| DEFAULT_SERVER_ID.to_string());

        let pdns_api_key = std::env::var("PDNS_API_KEY").unwrap_or_default();

        let pdns_timeout_secs = std::env::var("PDNS_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PDNS_TIMEOUT_SECS);

        let api_port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_API_PORT);

        let api_token = std::env::var("API_TOKEN").ok().filter(|t| !t.is_empty());

        let disable_auth = std::env::var("DISABLE_AUTH")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        Self {
            pdns_server_url,
            pdns_server_id,
            pdns_api_key,
            pdns_timeout_secs,
            api_port,
            api_token,
            disable_auth,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.pdns_server_url.is_empty() {
            return Err("PDNS_SERVER_URL must be set".to_string());
        }

        if self.pdns_api_key.is_empty() {
            return Err("PDNS_API_KEY must be set".to_string());
        }

        if self.pdns_server_id.is_empty() {
            return Err("PDNS_SERVER_ID cannot be empty".to_string());
        }

        if self.pdns_timeout_secs == 0 {
            return Err("PDNS_TIMEOUT_SECS must be greater than 0".to_string());
        }

        if !self.disable_auth && self.api_token.is_none() {
            return Err("API_TOKEN must be set unless DISABLE_AUTH=true".to_string());
        }

        Ok(())
    }

    /// PowerDNS client settings
    pub fn pdns(&self) -> PdnsConfig {
        PdnsConfig {
            server_url: self.pdns_server_url.clone(),
            server_id: self.pdns_server_id.clone(),
            api_key: self.pdns_api_key.clone(),
            timeout: Duration::from_secs(self.pdns_timeout_secs),
        }
    }
}
