//! Prometheus metrics for the ranking server
//!
//! Labels are route names and outcomes only, never query text.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

use crate::error::{Result, ServerError};

pub const ROUTE_PAGE: &str = "page";
pub const ROUTE_DATASET: &str = "dataset";
pub const ROUTE_NODES: &str = "nodes";
pub const ROUTE_SEARCH: &str = "search";
pub const ROUTE_RANK_RANGE: &str = "rank_range";
pub const ROUTE_REFRESH: &str = "refresh";

pub const SOURCE_FILE: &str = "file";
pub const SOURCE_FALLBACK: &str = "fallback";

pub fn record_request(route: &str) {
    counter!("ranking_requests_total", "route" => route.to_string()).increment(1);
}

pub fn record_search(found: bool) {
    let outcome = if found { "found" } else { "not_found" };
    counter!("ranking_searches_total", "outcome" => outcome).increment(1);
}

pub fn record_dataset_load(source: &str, nodes: usize, duration: Duration) {
    counter!("ranking_dataset_loads_total", "source" => source.to_string()).increment(1);
    histogram!("ranking_dataset_load_duration_seconds", "source" => source.to_string())
        .record(duration.as_secs_f64());
    gauge!("ranking_dataset_nodes").set(nodes as f64);
}

pub fn record_cache_hit() {
    counter!("ranking_cache_lookups_total", "outcome" => "hit").increment(1);
}

pub fn record_cache_miss() {
    counter!("ranking_cache_lookups_total", "outcome" => "miss").increment(1);
}

/// A caller attached to a load already in flight
pub fn record_cache_coalesced() {
    counter!("ranking_cache_lookups_total", "outcome" => "coalesced").increment(1);
}

pub fn set_cache_populated(populated: bool) {
    gauge!("ranking_cache_populated").set(if populated { 1.0 } else { 0.0 });
}

pub fn record_refresh(duration: Duration) {
    counter!("ranking_refresh_total").increment(1);
    histogram!("ranking_refresh_duration_seconds").record(duration.as_secs_f64());
}

pub fn init_prometheus_recorder() -> Result<metrics_exporter_prometheus::PrometheusHandle> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::Metrics(e.to_string()))
}
