//! Span utilities for scenario tracing.

use std::time::Duration;

use tracing::{info_span, Span};

/// Extension trait for recording scenario progress into a span.
pub trait SpanExt {
    /// Record the phase the scenario just entered.
    fn record_phase(&self, phase: &str);

    /// Record the final outcome, status code and dispatch latency.
    fn record_outcome(&self, outcome: &str, status: Option<u16>, latency: Duration);
}

impl SpanExt for Span {
    fn record_phase(&self, phase: &str) {
        self.record("phase", phase);
    }

    fn record_outcome(&self, outcome: &str, status: Option<u16>, latency: Duration) {
        self.record("outcome", outcome);
        if let Some(status) = status {
            self.record("status", status);
        }
        self.record("latency_ms", latency.as_millis() as u64);
    }
}

/// Factory for scenario spans.
pub struct ScenarioSpan;

impl ScenarioSpan {
    /// Create a span for one scenario execution.
    ///
    /// Fields included:
    /// - `scenario_id`, `fuzzer`, `method`, `path`: set at creation
    /// - `phase`: updated by `SpanExt::record_phase`
    /// - `outcome`, `status`, `latency_ms`: filled in by `SpanExt::record_outcome`
    pub fn new(scenario_id: u64, fuzzer: &str, method: &str, path: &str) -> Span {
        info_span!(
            "scenario",
            scenario_id,
            fuzzer = %fuzzer,
            method = %method,
            path = %path,
            phase = tracing::field::Empty,
            outcome = tracing::field::Empty,
            status = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        )
    }
}
