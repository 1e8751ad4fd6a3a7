//! Metrics collection and exposition.
//!
//! # Metrics
//! - `leafmint_mints_submitted_total` (counter): transactions broadcast
//! - `leafmint_mints_confirmed_total` (counter): confirmed mints
//! - `leafmint_mints_failed_total` (counter): rejected/reverted/lost mints
//! - `leafmint_observed_mints` (gauge): last polled contract total
//! - `leafmint_rpc_healthy` (gauge): 1=reachable, 0=unreachable

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a broadcast mint transaction.
pub fn record_mint_submitted() {
    counter!("leafmint_mints_submitted_total").increment(1);
}

/// Record the outcome of a mint attempt.
pub fn record_mint_outcome(confirmed: bool) {
    if confirmed {
        counter!("leafmint_mints_confirmed_total").increment(1);
    } else {
        counter!("leafmint_mints_failed_total").increment(1);
    }
}

/// Record the last observed mint total.
pub fn record_mint_count(observed: u64) {
    gauge!("leafmint_observed_mints").set(observed as f64);
}

/// Record RPC reachability.
pub fn record_rpc_health(healthy: bool) {
    gauge!("leafmint_rpc_healthy").set(if healthy { 1.0 } else { 0.0 });
}
