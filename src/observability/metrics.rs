//! Metrics collection.
//!
//! # Metrics
//! - `deployer_broadcasts_total` (counter): transactions by message kind, outcome
//! - `deployer_queries_total` (counter): contract queries by outcome
//! - `deployer_inclusion_seconds` (histogram): broadcast-to-inclusion latency
//!
//! # Design Decisions
//! - No exporter is installed here; a one-shot run has nothing to scrape
//! - Labels are static strings only

use std::time::Duration;

fn outcome(success: bool) -> &'static str {
    if success { "ok" } else { "error" }
}

/// Record a broadcast attempt.
pub fn record_broadcast(kind: &'static str, success: bool) {
    metrics::counter!("deployer_broadcasts_total", "kind" => kind, "outcome" => outcome(success))
        .increment(1);
}

/// Record a contract query.
pub fn record_query(success: bool) {
    metrics::counter!("deployer_queries_total", "outcome" => outcome(success)).increment(1);
}

/// Record how long a transaction took to be included.
pub fn record_inclusion_latency(elapsed: Duration) {
    metrics::histogram!("deployer_inclusion_seconds").record(elapsed.as_secs_f64());
}
