//! Metrics collection and exposition.
//!
//! # Metrics
//! - `ws_requests_total` (counter): requests by handler and status
//! - `ws_filter_rejections_total` (counter): rejected filter strings by reason
//! - `ws_route_overrides_total` (gauge): route keys with an override entry
//! - `ws_active_routes` / `ws_suppressed_routes` (gauge): last route table build

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint started");
    Ok(())
}

pub fn record_request(handler: &str, status: u16) {
    counter!(
        "ws_requests_total",
        "handler" => handler.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_filter_rejection(reason: &'static str) {
    counter!("ws_filter_rejections_total", "reason" => reason).increment(1);
}

pub fn record_route_table(overrides: usize, active: usize, suppressed: usize) {
    gauge!("ws_route_overrides_total").set(overrides as f64);
    gauge!("ws_active_routes").set(active as f64);
    gauge!("ws_suppressed_routes").set(suppressed as f64);
}
