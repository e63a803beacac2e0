//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bff_requests_total` (counter): requests by method, status, route
//! - `bff_request_duration_seconds` (histogram): latency by route
//! - `bff_circuit_open` (gauge): 1 while the recommendation circuit is open
//!
//! # Design Decisions
//! - Prometheus exporter on a dedicated listener, separate from the API port
//! - Metric updates are atomic increments; safe to call from any handler
//! - Recording is a no-op until the exporter is installed, so unit tests can
//!   exercise instrumented code paths freely

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with an HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics exporter listening");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Record a completed request with its final status.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    counter!(
        "bff_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "route" => route.to_string()
    )
    .increment(1);

    histogram!("bff_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Reflect the recommendation circuit state (1 = open, 0 = closed).
pub fn record_circuit_state(open: bool) {
    gauge!("bff_circuit_open").set(if open { 1.0 } else { 0.0 });
}
