//! Result reporting: bounded diagnostics, result records and sinks.

pub mod bounded;
mod result;
mod sink;
mod stats;

pub use bounded::{to_bounded_string, to_bounded_value, BoundedError, BoundedSerializer};
pub use result::{ExecutionResult, Outcome};
pub use sink::{ResultCollector, ResultSink};
pub use stats::{ExecutionStatistics, OutcomeCounts, StatisticsSnapshot};
