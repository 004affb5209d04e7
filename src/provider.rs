// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Record-level operations on top of a [`ZoneStore`]
//!
//! The zone store only understands whole RRsets. [`Provider`] offers the
//! record-level view callers want:
//!
//! - [`Provider::get_records`] lists every value in a zone as a [`Record`]
//! - [`Provider::append_records`] adds values to existing RRsets
//! - [`Provider::set_records`] replaces RRsets with exactly the given values
//! - [`Provider::delete_records`] removes values, deleting RRsets left empty
//!
//! # Partial application
//!
//! Changes are applied one RRset at a time. If the store rejects one, the
//! operation returns that error: RRsets changed before it stay changed and
//! the remaining ones are left as they were.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::{
    metrics,
    reconcile,
    rrset::{Record, RecordSetChange},
    store::{StoreError, ZoneStore},
};

/// Record operations for zones held in a [`ZoneStore`]
#[derive(Clone)]
pub struct Provider {
    store: Arc<dyn ZoneStore>,
}

impl Provider {
    pub fn new(store: Arc<dyn ZoneStore>) -> Self {
        Self { store }
    }

    /// List every record in the zone
    ///
    /// Each value in an RRset becomes one record carrying the RRset's TTL
    /// and the zone id.
    pub async fn get_records(&self, zone: &str) -> Result<Vec<Record>, StoreError> {
        let snapshot = self.store.fetch_zone(zone).await?;

        let records: Vec<Record> = snapshot
            .rrsets
            .iter()
            .flat_map(|rrset| {
                let zone_id = &snapshot.id;
                rrset.records.iter().map(move |value| Record {
                    id: Some(zone_id.clone()),
                    name: rrset.name.clone(),
                    record_type: rrset.record_type.clone(),
                    value: value.content.clone(),
                    ttl: Duration::from_secs(u64::from(rrset.ttl)),
                    priority: None,
                })
            })
            .collect();

        debug!("Listed {} records in zone {}", records.len(), zone);
        Ok(records)
    }

    /// Add records to the zone, merging with existing RRsets
    ///
    /// Values already present are not added twice. Existing RRsets keep their
    /// comments but take the TTL of the first record given for them.
    ///
    /// Returns the records passed in.
    pub async fn append_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, StoreError> {
        let snapshot = self.store.fetch_zone(zone).await?;
        let changes = reconcile::merge_rrsets(&snapshot, &records);
        self.apply("append", &snapshot.id, &changes).await?;
        Ok(records)
    }

    /// Replace RRsets with exactly the given records
    ///
    /// The zone's current contents are not consulted: any RRset sharing a
    /// name and type with the input is overwritten, TTL and comments included.
    ///
    /// Returns the records passed in.
    pub async fn set_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, StoreError> {
        let zone_id = self.store.zone_id(zone).await?;
        let changes = reconcile::convert_groups(reconcile::group_records(&records));
        self.apply("set", &zone_id, &changes).await?;
        Ok(records)
    }

    /// Remove the given values from the zone
    ///
    /// Returns the records passed in, including any that were not present.
    pub async fn delete_records(
        &self,
        zone: &str,
        records: Vec<Record>,
    ) -> Result<Vec<Record>, StoreError> {
        let snapshot = self.store.fetch_zone(zone).await?;
        let changes = reconcile::cull_rrsets(&snapshot, &records);
        self.apply("delete", &snapshot.id, &changes).await?;
        Ok(records)
    }

    async fn apply(
        &self,
        operation: &str,
        zone_id: &str,
        changes: &[RecordSetChange],
    ) -> Result<(), StoreError> {
        let summary = reconcile::summarize(changes);
        info!(
            operation = %operation,
            zone = %zone_id,
            replaced = summary.replaced,
            deleted = summary.deleted,
            values = summary.values,
            "Applying planned RRset changes"
        );
        metrics::record_planned_changes(changes);

        self.store.apply(zone_id, changes).await
    }
}
