//! Reporting callbacks.

use parking_lot::RwLock;

use super::result::{ExecutionResult, Outcome};

/// Receives every result exactly once, possibly from many tasks at once.
pub trait ResultSink: Send + Sync {
    fn record(&self, result: &ExecutionResult);
}

impl<F> ResultSink for F
where
    F: Fn(&ExecutionResult) + Send + Sync,
{
    fn record(&self, result: &ExecutionResult) {
        self(result)
    }
}

/// Keeps results in arrival order.
#[derive(Debug, Default)]
pub struct ResultCollector {
    results: RwLock<Vec<ExecutionResult>>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.read().is_empty()
    }

    pub fn snapshot(&self) -> Vec<ExecutionResult> {
        self.results.read().clone()
    }

    pub fn with_outcome(&self, outcome: Outcome) -> Vec<ExecutionResult> {
        self.results
            .read()
            .iter()
            .filter(|r| r.outcome == outcome)
            .cloned()
            .collect()
    }

    /// Take all results, leaving the collector empty.
    pub fn drain(&self) -> Vec<ExecutionResult> {
        std::mem::take(&mut *self.results.write())
    }
}

impl ResultSink for ResultCollector {
    fn record(&self, result: &ExecutionResult) {
        self.results.write().push(result.clone());
    }
}
