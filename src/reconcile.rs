// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! RRset reconciliation
//!
//! PowerDNS can only replace or delete a whole RRset. This module turns
//! record-level requests ("add these values", "remove these values") into
//! the RRset changes that produce the same result, given a snapshot of the
//! zone.
//!
//! Everything here is pure: the snapshot and the requested records are only
//! borrowed, and every call returns a freshly built list of
//! [`RecordSetChange`]s. Nothing is sent to the server.
//!
//! Records are matched to RRsets by [`key`], which is an exact,
//! case-sensitive comparison of name and type. Callers that want
//! case-insensitive matching must normalize names before calling in.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::rrset::{Record, RecordContent, RecordSet, RecordSetChange, Zone};

/// Grouping key for a name and type
pub fn key(name: &str, record_type: &str) -> String {
    format!("{}:{}", name, record_type)
}

/// Records bucketed by [`key`]
///
/// Buckets keep the order records were supplied in, duplicates included.
/// Keys iterate in the order they first appeared.
#[derive(Debug, Default)]
pub struct RecordGroups<'a> {
    order: Vec<String>,
    buckets: HashMap<String, Vec<&'a Record>>,
}

impl<'a> RecordGroups<'a> {
    /// Bucket for `key`, if one is still present
    pub fn get(&self, key: &str) -> Option<&[&'a Record]> {
        self.buckets.get(key).map(Vec::as_slice)
    }

    /// Remove and return the bucket for `key`
    pub fn take(&mut self, key: &str) -> Option<Vec<&'a Record>> {
        self.buckets.remove(key)
    }

    /// Number of buckets still present
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl<'a> IntoIterator for RecordGroups<'a> {
    type Item = Vec<&'a Record>;
    type IntoIter = std::vec::IntoIter<Vec<&'a Record>>;

    fn into_iter(mut self) -> Self::IntoIter {
        let remaining: Vec<_> = self
            .order
            .iter()
            .filter_map(|k| self.buckets.remove(k))
            .collect();
        remaining.into_iter()
    }
}

/// Group records by name and type
pub fn group_records(records: &[Record]) -> RecordGroups<'_> {
    let mut groups = RecordGroups::default();

    for record in records {
        let k = key(&record.name, &record.record_type);
        match groups.buckets.get_mut(&k) {
            Some(bucket) => bucket.push(record),
            None => {
                groups.order.push(k.clone());
                groups.buckets.insert(k, vec![record]);
            }
        }
    }

    groups
}

/// Content strings already present in an RRset
pub fn present_values(rrset: &RecordSet) -> HashSet<&str> {
    rrset.values().collect()
}

/// Copy `records` without any entry whose content matches a value in `to_remove`
///
/// Every matching entry is dropped, not just the first. Survivors keep
/// their relative order.
pub fn prune_values<'v>(
    records: &[RecordContent],
    to_remove: impl IntoIterator<Item = &'v str>,
) -> Vec<RecordContent> {
    let mut remaining = records.to_vec();
    for value in to_remove {
        remaining.retain(|r| r.content != value);
    }
    remaining
}

/// Build REPLACE changes for groups that have no existing RRset
///
/// TTL, name and type come from the first record of each group. Values are
/// written in group order without deduplication; if a caller supplies the
/// same value twice for a new RRset it is sent twice.
pub fn convert_groups(groups: RecordGroups<'_>) -> Vec<RecordSetChange> {
    groups
        .into_iter()
        .filter_map(|recs| {
            let first = recs.first()?;
            let records = recs
                .iter()
                .map(|r| RecordContent::new(r.value.clone()))
                .collect();
            Some(RecordSetChange::replace(
                first.name.clone(),
                first.record_type.clone(),
                first.ttl_secs(),
                records,
                Vec::new(),
            ))
        })
        .collect()
}

/// Plan an append of `desired` to `zone`
///
/// Each existing RRset that shares a key with some desired record is
/// replaced by its current values followed by the desired values not
/// already present. Comments are kept. The TTL becomes the TTL of the
/// first desired record for that key, even when it differs from the
/// RRset's current TTL.
///
/// Desired records with no matching RRset become new RRsets via
/// [`convert_groups`]. Merged changes come first, in snapshot order.
pub fn merge_rrsets(zone: &Zone, desired: &[Record]) -> Vec<RecordSetChange> {
    let mut groups = group_records(desired);
    let mut changes = Vec::with_capacity(groups.len());

    for rrset in &zone.rrsets {
        let k = key(&rrset.name, &rrset.record_type);
        let Some(recs) = groups.take(&k) else {
            continue;
        };
        let Some(first) = recs.first() else {
            continue;
        };

        let mut records = rrset.records.clone();
        let mut present = present_values(rrset);
        for rec in &recs {
            if present.insert(rec.value.as_str()) {
                records.push(RecordContent::new(rec.value.clone()));
            }
        }

        debug!(
            rrset = %k,
            existing = rrset.records.len(),
            merged = records.len(),
            "Merging records into existing RRset"
        );

        changes.push(RecordSetChange::replace(
            rrset.name.clone(),
            rrset.record_type.clone(),
            first.ttl_secs(),
            records,
            rrset.comments.clone(),
        ));
    }

    if !groups.is_empty() {
        debug!(count = groups.len(), "Creating RRsets with no existing match");
    }
    changes.extend(convert_groups(groups));
    changes
}

/// Plan removal of the values in `to_remove` from `zone`
///
/// RRsets left with no values are deleted. Otherwise the RRset is replaced
/// by its surviving values with its TTL and comments unchanged. Requested
/// removals that match no RRset are ignored.
pub fn cull_rrsets(zone: &Zone, to_remove: &[Record]) -> Vec<RecordSetChange> {
    let groups = group_records(to_remove);
    let mut changes = Vec::new();

    for rrset in &zone.rrsets {
        let k = key(&rrset.name, &rrset.record_type);
        let Some(recs) = groups.get(&k).filter(|recs| !recs.is_empty()) else {
            continue;
        };

        let remaining = prune_values(&rrset.records, recs.iter().map(|r| r.value.as_str()));

        debug!(
            rrset = %k,
            before = rrset.records.len(),
            after = remaining.len(),
            "Culling values from RRset"
        );

        if remaining.is_empty() {
            changes.push(RecordSetChange::delete(
                rrset.name.clone(),
                rrset.record_type.clone(),
            ));
        } else {
            changes.push(RecordSetChange::replace(
                rrset.name.clone(),
                rrset.record_type.clone(),
                rrset.ttl,
                remaining,
                rrset.comments.clone(),
            ));
        }
    }

    changes
}

/// Counts describing a planned list of changes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub replaced: usize,
    pub deleted: usize,
    pub values: usize,
}

/// Summarize a planned list of changes
pub fn summarize(changes: &[RecordSetChange]) -> ChangeSummary {
    changes
        .iter()
        .fold(ChangeSummary::default(), |mut summary, change| {
            if change.is_delete() {
                summary.deleted += 1;
            } else {
                summary.replaced += 1;
                summary.values += change.records.len();
            }
            summary
        })
}
