//! Telemetry: structured logging, scenario spans and metrics.
//!
//! Metrics go through the `metrics` facade only; installing an exporter is
//! left to the embedding application.

mod logging;
pub mod metrics;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use self::metrics::describe_metrics;
pub use spans::{ScenarioSpan, SpanExt};
