//! Request metrics.
//!
//! # Metrics
//! - `blobstore_requests_total` (counter): requests by method, status
//! - `blobstore_request_duration_seconds` (histogram): latency by method
//!
//! Methods outside the standard set are labelled `other` so clients cannot
//! grow the label space.

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one handled blob request.
pub fn record_request(method: &Method, status: u16, start: Instant) {
    let method = method_label(method);

    ::metrics::counter!(
        "blobstore_requests_total",
        "method" => method,
        "status" => status.to_string()
    )
    .increment(1);

    ::metrics::histogram!(
        "blobstore_request_duration_seconds",
        "method" => method
    )
    .record(start.elapsed().as_secs_f64());
}

/// Bounded label for `method`.
pub fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::HEAD => "HEAD",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::POST => "POST",
        Method::OPTIONS => "OPTIONS",
        Method::PATCH => "PATCH",
        Method::CONNECT => "CONNECT",
        Method::TRACE => "TRACE",
        _ => "other",
    }
}
