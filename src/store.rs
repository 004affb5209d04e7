// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Zone store interface
//!
//! A zone store holds the authoritative RRsets for zones. The provider
//! reads a snapshot from it, plans changes with [`crate::reconcile`], and
//! writes those changes back.

use async_trait::async_trait;

use crate::rrset::{RecordSetChange, Zone};

/// Errors returned by a [`ZoneStore`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No zone, or more than one zone, matched the name
    #[error("Zone not found: {0}")]
    NotFound(String),

    /// The server rejected a change; earlier changes in the batch were applied
    #[error("Failed to apply change to {name} {record_type}: {message}")]
    Apply {
        name: String,
        record_type: String,
        message: String,
    },

    /// The request could not be sent or the server returned an unexpected status
    #[error("Zone store request failed: {0}")]
    Transport(String),

    /// The server response could not be parsed
    #[error("Invalid zone store response: {0}")]
    Decode(String),
}

/// Storage for zone RRsets
#[async_trait]
pub trait ZoneStore: Send + Sync {
    /// Fetch every RRset in the named zone
    async fn fetch_zone(&self, zone_name: &str) -> Result<Zone, StoreError>;

    /// Resolve a zone name to the store's zone id
    async fn zone_id(&self, zone_name: &str) -> Result<String, StoreError>;

    /// Apply changes in order, stopping at the first failure
    ///
    /// Changes before the failing one stay applied; changes after it are
    /// not attempted.
    async fn apply(&self, zone_id: &str, changes: &[RecordSetChange]) -> Result<(), StoreError>;
}
