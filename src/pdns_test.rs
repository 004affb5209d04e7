// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for the PowerDNS client

use super::pdns::*;
use crate::provider::Provider;
use crate::rrset::{ChangeType, Record, RecordContent, RecordSetChange};
use crate::store::{StoreError, ZoneStore};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ZONES_PATH: &str = "/api/v1/servers/localhost/zones";

fn client_for(server: &MockServer) -> PdnsClient {
    PdnsClient::new(PdnsConfig {
        server_url: server.uri(),
        server_id: DEFAULT_SERVER_ID.to_string(),
        api_key: "secret".to_string(),
        timeout: Duration::from_secs(5),
    })
    .expect("Failed to create PdnsClient")
}

async fn mount_zone_listing(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(ZONES_PATH))
        .and(query_param("zone", "example.com."))
        .and(header("X-API-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[test]
fn test_build_api_url() {
    assert_eq!(build_api_url("pdns:8081"), "http://pdns:8081");
    assert_eq!(build_api_url("http://pdns:8081/"), "http://pdns:8081");
    assert_eq!(build_api_url("https://pdns.example.com"), "https://pdns.example.com");
}

#[tokio::test]
async fn test_fetch_zone() {
    let server = MockServer::start().await;
    mount_zone_listing(
        &server,
        json!([{"id": "example.com.", "name": "example.com.", "kind": "Native"}]),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/example.com.", ZONES_PATH)))
        .and(header("X-API-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "example.com.",
            "name": "example.com.",
            "kind": "Native",
            "serial": 2025010101,
            "rrsets": [{
                "name": "www.example.com.",
                "type": "A",
                "ttl": 300,
                "records": [{"content": "192.0.2.1", "disabled": false}],
                "comments": [{"content": "web", "account": "ops", "modified_at": 1700000000}]
            }]
        })))
        .mount(&server)
        .await;

    let zone = client_for(&server).fetch_zone("example.com.").await.unwrap();
    assert_eq!(zone.id, "example.com.");
    assert_eq!(zone.rrsets.len(), 1);
    assert_eq!(zone.rrsets[0].ttl, 300);
    assert_eq!(zone.rrsets[0].records[0].content, "192.0.2.1");
    assert_eq!(zone.rrsets[0].comments[0].account, "ops");
}

#[tokio::test]
async fn test_zone_id_no_match_is_not_found() {
    let server = MockServer::start().await;
    mount_zone_listing(&server, json!([])).await;

    let err = client_for(&server).zone_id("example.com.").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(ref z) if z == "example.com."));
}

#[tokio::test]
async fn test_zone_id_multiple_matches_is_not_found() {
    let server = MockServer::start().await;
    mount_zone_listing(
        &server,
        json!([
            {"id": "example.com.", "name": "example.com."},
            {"id": "example.com.=2Fview", "name": "example.com."}
        ]),
    )
    .await;

    let err = client_for(&server).zone_id("example.com.").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn test_zone_listing_server_error_is_transport() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ZONES_PATH))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "backend down"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).zone_id("example.com.").await.unwrap_err();
    match err {
        StoreError::Transport(msg) => assert!(msg.contains("backend down")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_zone_listing_bad_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ZONES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server).zone_id("example.com.").await.unwrap_err();
    assert!(matches!(err, StoreError::Decode(_)));
}

#[tokio::test]
async fn test_apply_sends_one_patch_per_change() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/example.com.", ZONES_PATH)))
        .and(header("X-API-Key", "secret"))
        .and(body_json(json!({
            "rrsets": [{
                "name": "www.example.com.",
                "type": "A",
                "changetype": "REPLACE",
                "ttl": 300,
                "records": [{"content": "192.0.2.1", "disabled": false}],
                "comments": []
            }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/example.com.", ZONES_PATH)))
        .and(body_json(json!({
            "rrsets": [{
                "name": "old.example.com.",
                "type": "TXT",
                "changetype": "DELETE",
                "ttl": 0
            }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let changes = vec![
        RecordSetChange::replace(
            "www.example.com.",
            "A",
            300,
            vec![RecordContent::new("192.0.2.1")],
            Vec::new(),
        ),
        RecordSetChange::delete("old.example.com.", "TXT"),
    ];

    client_for(&server)
        .apply("example.com.", &changes)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_apply_stops_at_first_failure() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/example.com.", ZONES_PATH)))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({"error": "Duplicate record in RRset"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let changes = vec![
        RecordSetChange::replace(
            "dup.example.com.",
            "TXT",
            60,
            vec![RecordContent::new("a"), RecordContent::new("a")],
            Vec::new(),
        ),
        RecordSetChange::delete("old.example.com.", "TXT"),
    ];

    let err = client_for(&server)
        .apply("example.com.", &changes)
        .await
        .unwrap_err();

    match err {
        StoreError::Apply {
            name,
            record_type,
            message,
        } => {
            assert_eq!(name, "dup.example.com.");
            assert_eq!(record_type, "TXT");
            assert!(message.contains("422"));
            assert!(message.contains("Duplicate record in RRset"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_apply_empty_change_list_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    client_for(&server).apply("example.com.", &[]).await.unwrap();
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let client = PdnsClient::new(PdnsConfig {
        server_url: "127.0.0.1:1".to_string(),
        server_id: DEFAULT_SERVER_ID.to_string(),
        api_key: "secret".to_string(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = client.fetch_zone("example.com.").await.unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}

#[test]
fn test_change_serializes_changetype_uppercase() {
    let change = RecordSetChange::delete("www.example.com.", "A");
    assert_eq!(change.changetype, ChangeType::Delete);
    let json = serde_json::to_value(&change).unwrap();
    assert_eq!(json["changetype"], "DELETE");
}

#[tokio::test]
async fn test_set_records_patch_clears_comments() {
    let server = MockServer::start().await;
    mount_zone_listing(
        &server,
        json!([{"id": "example.com.", "name": "example.com.", "kind": "Native"}]),
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/example.com.", ZONES_PATH)))
        .and(header("X-API-Key", "secret"))
        .and(body_json(json!({
            "rrsets": [{
                "name": "mail.example.com.",
                "type": "MX",
                "changetype": "REPLACE",
                "ttl": 120,
                "records": [{"content": "30 c.", "disabled": false}],
                "comments": []
            }]
        })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let provider = Provider::new(Arc::new(client_for(&server)));
    provider
        .set_records(
            "example.com.",
            vec![Record::new(
                "mail.example.com.",
                "MX",
                "30 c.",
                Duration::from_secs(120),
            )],
        )
        .await
        .unwrap();
}
