// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! DNS record management API handlers
//!
//! This module implements HTTP handlers for record operations on a zone:
//! - Listing records
//! - Appending records to existing RRsets
//! - Setting RRsets to exactly the given records
//! - Deleting individual record values
//!
//! Each handler fetches the zone from PowerDNS, plans the RRset changes, and
//! applies them one RRset at a time.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use utoipa::ToSchema;

use crate::{
    metrics,
    rrset::Record,
    store::StoreError,
    types::{ApiError, AppState},
};

/// Records to append, set, or delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordsRequest {
    pub records: Vec<Record>,
}

/// Response from record mutations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordsResponse {
    pub success: bool,
    pub message: String,
    /// The records from the request
    pub records: Vec<Record>,
}

/// Records currently in a zone
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordListResponse {
    pub records: Vec<Record>,
    pub count: usize,
}

/// Record routes, relative to the API prefix
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/zones/{zone_name}/records",
            get(list_records)
                .post(append_records)
                .put(set_records)
                .delete(delete_records),
        )
        .with_state(state)
}

/// Reject requests that cannot change anything
fn validate_request(zone_name: &str, records: &[Record]) -> Result<(), ApiError> {
    if zone_name.is_empty() {
        return Err(ApiError::InvalidRequest(
            "Zone name cannot be empty".to_string(),
        ));
    }

    if records.is_empty() {
        return Err(ApiError::InvalidRequest(
            "At least one record is required".to_string(),
        ));
    }

    if let Some(record) = records
        .iter()
        .find(|r| r.name.is_empty() || r.record_type.is_empty())
    {
        return Err(ApiError::InvalidRequest(format!(
            "Record name and type are required (got name '{}', type '{}')",
            record.name, record.record_type
        )));
    }

    Ok(())
}

/// Log and count the outcome of a record operation
fn finish(
    operation: &str,
    zone_name: &str,
    result: Result<Vec<Record>, StoreError>,
) -> Result<Vec<Record>, ApiError> {
    match result {
        Ok(records) => {
            info!("{} of {} records in zone {} succeeded", operation, records.len(), zone_name);
            metrics::record_record_operation(operation, true);
            Ok(records)
        }
        Err(e) => {
            error!("{} in zone {} failed: {}", operation, zone_name, e);
            metrics::record_record_operation(operation, false);
            Err(e.into())
        }
    }
}

/// List all records in a zone
#[utoipa::path(
    get,
    path = "/api/v1/zones/{zone_name}/records",
    params(
        ("zone_name" = String, Path, description = "Zone name")
    ),
    responses(
        (status = 200, description = "Records in the zone", body = RecordListResponse),
        (status = 404, description = "Zone not found"),
        (status = 502, description = "PowerDNS request failed"),
    ),
    tag = "records"
)]
pub async fn list_records(
    State(state): State<AppState>,
    Path(zone_name): Path<String>,
) -> Result<Json<RecordListResponse>, ApiError> {
    info!("Listing records in zone {}", zone_name);

    let records = finish(
        "list",
        &zone_name,
        state.provider.get_records(&zone_name).await,
    )?;

    Ok(Json(RecordListResponse {
        count: records.len(),
        records,
    }))
}

/// Append records to a zone
///
/// Values are added to any existing RRset with the same name and type;
/// values already present are skipped.
#[utoipa::path(
    post,
    path = "/api/v1/zones/{zone_name}/records",
    request_body = RecordsRequest,
    params(
        ("zone_name" = String, Path, description = "Zone name")
    ),
    responses(
        (status = 201, description = "Records appended", body = RecordsResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Zone not found"),
        (status = 502, description = "PowerDNS rejected a change or was unreachable"),
    ),
    tag = "records"
)]
pub async fn append_records(
    State(state): State<AppState>,
    Path(zone_name): Path<String>,
    Json(request): Json<RecordsRequest>,
) -> Result<(StatusCode, Json<RecordsResponse>), ApiError> {
    info!(
        "Appending {} records to zone {}",
        request.records.len(),
        zone_name
    );
    validate_request(&zone_name, &request.records)?;

    let records = finish(
        "append",
        &zone_name,
        state
            .provider
            .append_records(&zone_name, request.records)
            .await,
    )?;

    Ok((
        StatusCode::CREATED,
        Json(RecordsResponse {
            success: true,
            message: format!("Records appended to zone {}", zone_name),
            records,
        }),
    ))
}

/// Set records in a zone
///
/// Every RRset named in the request is replaced by exactly the given values.
#[utoipa::path(
    put,
    path = "/api/v1/zones/{zone_name}/records",
    request_body = RecordsRequest,
    params(
        ("zone_name" = String, Path, description = "Zone name")
    ),
    responses(
        (status = 200, description = "Records set", body = RecordsResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Zone not found"),
        (status = 502, description = "PowerDNS rejected a change or was unreachable"),
    ),
    tag = "records"
)]
pub async fn set_records(
    State(state): State<AppState>,
    Path(zone_name): Path<String>,
    Json(request): Json<RecordsRequest>,
) -> Result<Json<RecordsResponse>, ApiError> {
    info!("Setting {} records in zone {}", request.records.len(), zone_name);
    validate_request(&zone_name, &request.records)?;

    let records = finish(
        "set",
        &zone_name,
        state.provider.set_records(&zone_name, request.records).await,
    )?;

    Ok(Json(RecordsResponse {
        success: true,
        message: format!("Records set in zone {}", zone_name),
        records,
    }))
}

/// Delete record values from a zone
///
/// RRsets left without values are removed.
#[utoipa::path(
    delete,
    path = "/api/v1/zones/{zone_name}/records",
    request_body = RecordsRequest,
    params(
        ("zone_name" = String, Path, description = "Zone name")
    ),
    responses(
        (status = 200, description = "Records deleted", body = RecordsResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Zone not found"),
        (status = 502, description = "PowerDNS rejected a change or was unreachable"),
    ),
    tag = "records"
)]
pub async fn delete_records(
    State(state): State<AppState>,
    Path(zone_name): Path<String>,
    Json(request): Json<RecordsRequest>,
) -> Result<Json<RecordsResponse>, ApiError> {
    info!(
        "Deleting {} records from zone {}",
        request.records.len(),
        zone_name
    );
    validate_request(&zone_name, &request.records)?;

    let records = finish(
        "delete",
        &zone_name,
        state
            .provider
            .delete_records(&zone_name, request.records)
            .await,
    )?;

    Ok(Json(RecordsResponse {
        success: true,
        message: format!("Records deleted from zone {}", zone_name),
        records,
    }))
}
