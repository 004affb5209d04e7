// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for rrsync
//!
//! - HTTP request metrics (count, duration, status codes)
//! - Record operations (list, append, set, delete) by result
//! - PowerDNS API calls by call and result, with latency
//! - Planned RRset changes by change type

use lazy_static::lazy_static;
use prometheus::{
    opts, register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec,
    TextEncoder,
};

use crate::rrset::RecordSetChange;

lazy_static! {
    /// HTTP request counter by method, path, and status code
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        opts!(
            "rrsync_http_requests_total",
            "Total number of HTTP requests processed"
        ),
        &["method", "path", "status"]
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric");

    /// HTTP request duration histogram
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "rrsync_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric");

    /// Record operations counter by operation and result
    pub static ref RECORD_OPERATIONS_TOTAL: CounterVec = register_counter_vec!(
        opts!(
            "rrsync_record_operations_total",
            "Total number of record operations"
        ),
        &["operation", "result"]
    )
    .expect("Failed to create RECORD_OPERATIONS_TOTAL metric");

    /// PowerDNS API calls by call and result
    pub static ref STORE_REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        opts!(
            "rrsync_store_requests_total",
            "Total number of PowerDNS API requests"
        ),
        &["call", "result"]
    )
    .expect("Failed to create STORE_REQUESTS_TOTAL metric");

    /// PowerDNS API call duration histogram
    pub static ref STORE_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "rrsync_store_request_duration_seconds",
        "PowerDNS API request duration in seconds",
        &["call"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to create STORE_REQUEST_DURATION_SECONDS metric");

    /// Planned RRset changes by change type
    pub static ref RRSET_CHANGES_TOTAL: CounterVec = register_counter_vec!(
        opts!(
            "rrsync_rrset_changes_total",
            "Total number of RRset changes planned"
        ),
        &["changetype"]
    )
    .expect("Failed to create RRSET_CHANGES_TOTAL metric");

    /// Application info metric
    pub static ref APP_INFO: CounterVec = register_counter_vec!(
        opts!(
            "rrsync_app_info",
            "Application information"
        ),
        &["version"]
    )
    .expect("Failed to create APP_INFO metric");
}

/// Initialize metrics with application info
pub fn init_metrics() {
    APP_INFO
        .with_label_values(&[env!("CARGO_PKG_VERSION")])
        .inc();
}

/// Generate metrics output in Prometheus format
pub fn gather_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration);
}

/// Record a record operation
pub fn record_record_operation(operation: &str, success: bool) {
    let result = if success { "success" } else { "error" };
    RECORD_OPERATIONS_TOTAL
        .with_label_values(&[operation, result])
        .inc();
}

/// Record a PowerDNS API call
pub fn record_store_request(call: &str, success: bool, duration: f64) {
    let result = if success { "success" } else { "error" };
    STORE_REQUESTS_TOTAL
        .with_label_values(&[call, result])
        .inc();
    STORE_REQUEST_DURATION_SECONDS
        .with_label_values(&[call])
        .observe(duration);
}

/// Count planned RRset changes
pub fn record_planned_changes(changes: &[RecordSetChange]) {
    for change in changes {
        RRSET_CHANGES_TOTAL
            .with_label_values(&[change.changetype.as_str()])
            .inc();
    }
}
