// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for rrset module

use super::rrset::*;
use std::time::Duration;

#[test]
fn test_record_ttl_secs_saturates() {
    let record = Record::new("www", "A", "1.1.1.1", Duration::from_secs(u64::MAX));
    assert_eq!(record.ttl_secs(), u32::MAX);

    let record = Record::new("www", "A", "1.1.1.1", Duration::from_millis(300_900));
    assert_eq!(record.ttl_secs(), 300);
}

#[test]
fn test_zone_deserializes_pdns_payload() {
    let json = r#"{
        "id": "example.com.",
        "name": "example.com.",
        "kind": "Native",
        "rrsets": [
            {"name": "www.example.com.", "type": "A", "ttl": 300,
             "records": [{"content": "192.0.2.1", "disabled": false},
                         {"content": "192.0.2.2", "disabled": true}],
             "comments": []},
            {"name": "example.com.", "type": "TXT", "ttl": 60,
             "records": [{"content": "\"hello\""}]}
        ]
    }"#;

    let zone: Zone = serde_json::from_str(json).unwrap();
    assert_eq!(zone.rrsets.len(), 2);
    assert_eq!(
        zone.rrsets[0].values().collect::<Vec<_>>(),
        vec!["192.0.2.1", "192.0.2.2"]
    );
    assert!(zone.rrsets[0].records[1].disabled);
    assert!(!zone.rrsets[1].records[0].disabled);
    assert!(zone.rrsets[1].comments.is_empty());
}

#[test]
fn test_replace_change_serialization() {
    let change = RecordSetChange::replace(
        "www.example.com.",
        "A",
        300,
        vec![RecordContent::new("192.0.2.1")],
        vec![Comment {
            content: "web".to_string(),
            account: "ops".to_string(),
            modified_at: 1_700_000_000,
        }],
    );

    let json = serde_json::to_value(&change).unwrap();
    assert_eq!(json["changetype"], "REPLACE");
    assert_eq!(json["type"], "A");
    assert_eq!(json["ttl"], 300);
    assert_eq!(json["records"][0]["content"], "192.0.2.1");
    assert_eq!(json["comments"][0]["account"], "ops");
}

#[test]
fn test_delete_change_omits_records() {
    let change = RecordSetChange::delete("www.example.com.", "A");
    assert!(change.is_delete());

    let json = serde_json::to_string(&change).unwrap();
    assert!(json.contains("\"changetype\":\"DELETE\""));
    assert!(!json.contains("records"));
    assert!(!json.contains("comments"));
}

#[test]
fn test_replace_always_carries_records_and_comments() {
    let change = RecordSetChange::replace("www.example.com.", "A", 60, Vec::new(), Vec::new());

    let json = serde_json::to_value(&change).unwrap();
    assert_eq!(json["comments"], serde_json::json!([]));
    assert_eq!(json["records"], serde_json::json!([]));

    let text = serde_json::to_string(&RecordSetChange::replace(
        "www",
        "A",
        60,
        vec![RecordContent::new("2.2.2.2")],
        Vec::new(),
    ))
    .unwrap();
    assert!(text.contains("\"comments\":[]"));
}
