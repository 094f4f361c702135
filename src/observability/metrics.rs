//! Metrics collection and exposition.
//!
//! # Metrics
//! - `devproxy_requests_total` (counter): requests by route, status
//! - `devproxy_request_duration_seconds` (histogram): latency by route
//! - `devproxy_cookies_captured_total` (counter): Set-Cookie pairs merged, by route
//! - `devproxy_cookie_parse_failures_total` (counter): skipped Set-Cookie values
//! - `devproxy_root_redirects_total` (counter): anonymous root hits sent to login
//! - `devproxy_cookie_identities` (gauge): identities with stored cookies

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(
    addr: SocketAddr,
) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(route: &str, status: u16, start: Instant) {
    let route = route.to_string();
    metrics::counter!(
        "devproxy_requests_total",
        "route" => route.clone(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("devproxy_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_cookies_captured(route: &str, count: usize) {
    metrics::counter!("devproxy_cookies_captured_total", "route" => route.to_string())
        .increment(count as u64);
}

pub fn record_cookie_parse_failure() {
    metrics::counter!("devproxy_cookie_parse_failures_total").increment(1);
}

pub fn record_root_redirect() {
    metrics::counter!("devproxy_root_redirects_total").increment(1);
}

pub fn record_cookie_identities(count: usize) {
    metrics::gauge!("devproxy_cookie_identities").set(count as f64);
}
