//! Metrics recorded through the `metrics` facade.
//!
//! No recorder is installed here; without one every call is a no-op.

use std::time::Duration;

use crate::report::Outcome;

pub const SCENARIOS_TOTAL: &str = "probe_scenarios_total";
pub const DISPATCH_LATENCY_MS: &str = "probe_dispatch_latency_ms";
pub const RATE_LIMIT_WAIT_MS: &str = "probe_rate_limit_wait_ms";

/// Describe all metrics so exporters can publish units and help text.
pub fn describe_metrics() {
    metrics::describe_counter!(SCENARIOS_TOTAL, "Scenarios executed, by outcome and fuzzer");
    metrics::describe_histogram!(
        DISPATCH_LATENCY_MS,
        metrics::Unit::Milliseconds,
        "Time spent waiting on the dispatcher"
    );
    metrics::describe_histogram!(
        RATE_LIMIT_WAIT_MS,
        metrics::Unit::Milliseconds,
        "Time spent waiting for a rate limit permit"
    );
}

pub fn record_scenario(outcome: Outcome, fuzzer: &str) {
    metrics::counter!(
        SCENARIOS_TOTAL,
        "outcome" => outcome.as_str(),
        "fuzzer" => fuzzer.to_string()
    )
    .increment(1);
}

pub fn record_dispatch_latency(elapsed: Duration) {
    metrics::histogram!(DISPATCH_LATENCY_MS).record(elapsed.as_secs_f64() * 1000.0);
}

pub fn record_rate_limit_wait(wait: Duration) {
    metrics::histogram!(RATE_LIMIT_WAIT_MS).record(wait.as_secs_f64() * 1000.0);
}
