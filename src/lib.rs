// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! rrsync - record-level DNS management on top of PowerDNS RRsets
//!
//! PowerDNS only lets clients replace or delete a whole RRset. rrsync offers
//! record-level operations on top of that model: append values to an RRset,
//! set an RRset to exactly the given values, and delete individual values.
//!
//! # Features
//!
//! - Pure RRset reconciliation: plan the minimal REPLACE/DELETE changes for a
//!   request against a zone snapshot
//! - PowerDNS HTTP API client
//! - HTTP REST API exposing list/append/set/delete per zone
//! - Prometheus metrics integration
//!
//! # Usage
//!
//! ## Planning changes
//!
//! ```rust
//! use rrsync::{merge_rrsets, Record, RecordContent, RecordSet, Zone};
//! use std::time::Duration;
//!
//! let zone = Zone {
//!     id: "example.com.".to_string(),
//!     name: "example.com.".to_string(),
//!     rrsets: vec![RecordSet {
//!         name: "www.example.com.".to_string(),
//!         record_type: "A".to_string(),
//!         ttl: 300,
//!         records: vec![RecordContent::new("192.0.2.1")],
//!         comments: vec![],
//!     }],
//! };
//!
//! let desired = vec![Record::new(
//!     "www.example.com.",
//!     "A",
//!     "192.0.2.2",
//!     Duration::from_secs(300),
//! )];
//!
//! let changes = merge_rrsets(&zone, &desired);
//! assert_eq!(changes[0].values(), vec!["192.0.2.1", "192.0.2.2"]);
//! ```
//!
//! ## Applying changes to PowerDNS
//!
//! ```rust,no_run
//! use rrsync::{PdnsClient, PdnsConfig, Provider, Record};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = PdnsClient::new(PdnsConfig {
//!         server_url: "http://127.0.0.1:8081".to_string(),
//!         server_id: "localhost".to_string(),
//!         api_key: "changeme".to_string(),
//!         timeout: Duration::from_secs(30),
//!     })?;
//!     let provider = Provider::new(Arc::new(client));
//!
//!     provider
//!         .append_records(
//!             "example.com.",
//!             vec![Record::new("www.example.com.", "A", "192.0.2.2", Duration::from_secs(300))],
//!         )
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## As a Binary
//!
//! ```bash
//! PDNS_SERVER_URL=http://127.0.0.1:8081 PDNS_API_KEY=changeme API_TOKEN=secret rrsync
//! ```

// Re-export public modules
pub mod auth;
pub mod config;
pub mod metrics;
pub mod middleware;
pub mod pdns;
pub mod provider;
pub mod reconcile;
pub mod records;
pub mod rrset;
pub mod store;
pub mod types;

// Re-export commonly used types

// Reconciliation
pub use reconcile::{convert_groups, cull_rrsets, group_records, merge_rrsets};

// Data model
pub use rrset::{ChangeType, Comment, Record, RecordContent, RecordSet, RecordSetChange, Zone};

// Zone store and PowerDNS client
pub use pdns::{PdnsClient, PdnsConfig};
pub use store::{StoreError, ZoneStore};

// Record operations
pub use provider::Provider;

// Error types
pub use types::{ApiError, AppState, ErrorResponse};

#[cfg(test)]
mod pdns_test;
#[cfg(test)]
mod rrset_test;
