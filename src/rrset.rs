// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record and RRset types
//!
//! Callers work with individual [`Record`]s (one name/type/value/TTL tuple).
//! PowerDNS works with [`RecordSet`]s: every value sharing a name and type,
//! with a single TTL. Changes are submitted as [`RecordSetChange`]s, which
//! either replace a whole RRset or delete it.
//!
//! The RRset types serialize to the PowerDNS HTTP API wire format.

use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};
use std::time::Duration;
use utoipa::ToSchema;

/// A single DNS record as supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Optional identifier (the zone id when listing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owner name (e.g., "www.example.com.")
    pub name: String,

    /// Record type (e.g., "A", "TXT")
    #[serde(rename = "type")]
    pub record_type: String,

    /// Record content (e.g., "192.0.2.1")
    pub value: String,

    /// TTL, serialized as whole seconds
    #[serde(with = "ttl_seconds")]
    #[schema(value_type = u64)]
    pub ttl: Duration,

    /// Priority (for MX and SRV records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

impl Record {
    /// Create a record with no id and no priority
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        value: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            record_type: record_type.into(),
            value: value.into(),
            ttl,
            priority: None,
        }
    }

    /// TTL truncated to whole seconds, saturating at `u32::MAX`
    pub fn ttl_secs(&self) -> u32 {
        u32::try_from(self.ttl.as_secs()).unwrap_or(u32::MAX)
    }
}

/// One value inside an RRset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RecordContent {
    pub content: String,
    #[serde(default)]
    pub disabled: bool,
}

impl RecordContent {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            disabled: false,
        }
    }
}

/// RRset comment, carried through unchanged
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct Comment {
    pub content: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub modified_at: u64,
}

/// All records in a zone sharing a name and type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct RecordSet {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    #[serde(default)]
    pub records: Vec<RecordContent>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl RecordSet {
    /// Content strings in RRset order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.content.as_str())
    }
}

/// Snapshot of a zone as returned by the zone store
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rrsets: Vec<RecordSet>,
}

/// How a [`RecordSetChange`] modifies the zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeType {
    /// Replace the whole RRset (creating it if absent)
    Replace,
    /// Remove the RRset
    Delete,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeType::Replace => "REPLACE",
            ChangeType::Delete => "DELETE",
        }
    }
}

/// Instruction to replace or delete one RRset
///
/// Serializes as one element of the `rrsets` array accepted by
/// `PATCH /api/v1/servers/{server_id}/zones/{zone_id}`.
///
/// A REPLACE always carries `records` and `comments`, even when empty:
/// PowerDNS leaves an RRset's comments untouched when the key is absent.
/// A DELETE carries neither.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct RecordSetChange {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub changetype: ChangeType,
    /// Only meaningful for REPLACE
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub records: Vec<RecordContent>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Serialize for RecordSetChange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.is_delete() { 4 } else { 6 };
        let mut state = serializer.serialize_struct("RecordSetChange", fields)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", &self.record_type)?;
        state.serialize_field("changetype", &self.changetype)?;
        state.serialize_field("ttl", &self.ttl)?;
        if self.is_delete() {
            state.skip_field("records")?;
            state.skip_field("comments")?;
        } else {
            state.serialize_field("records", &self.records)?;
            state.serialize_field("comments", &self.comments)?;
        }
        state.end()
    }
}

impl RecordSetChange {
    /// Replace the RRset at `name`/`record_type` with `records`
    pub fn replace(
        name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: u32,
        records: Vec<RecordContent>,
        comments: Vec<Comment>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            changetype: ChangeType::Replace,
            ttl,
            records,
            comments,
        }
    }

    /// Delete the RRset at `name`/`record_type`
    pub fn delete(name: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            changetype: ChangeType::Delete,
            ttl: 0,
            records: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn is_delete(&self) -> bool {
        self.changetype == ChangeType::Delete
    }

    /// Content strings in the order they will be written
    pub fn values(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.content.as_str()).collect()
    }
}

/// Serde adapter storing a [`Duration`] as whole seconds
mod ttl_seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(ttl: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(ttl.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
