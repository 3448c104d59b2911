//! Per-scenario execution results.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::http::{HttpMethod, ResponseFamily};

/// Final classification of one scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// The service answered within the expected family.
    Pass,
    /// The service answered, but not as expected. A finding, not an engine fault.
    Fail,
    /// The request never got a response.
    Error,
    /// The scenario does not apply to this method.
    Skipped,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Error => "error",
            Self::Skipped => "skipped",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Fail | Self::Error)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything reported about one executed scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub id: u64,
    pub outcome: Outcome,
    pub fuzzer: String,
    pub description: String,
    pub method: HttpMethod,
    pub path: String,
    pub expected: ResponseFamily,
    /// Exact code the scenario advertised (e.g. `406`), for report text only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_label: Option<String>,
    pub actual_status: Option<u16>,
    pub actual_family: Option<ResponseFamily>,
    pub reason: String,
    /// Bounded JSON rendering of the exchange; empty for skipped scenarios.
    pub diagnostic: String,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl ExecutionResult {
    /// Text used for the expected side in messages: the label when set.
    pub fn expected_text(&self) -> String {
        self.expected_label
            .clone()
            .unwrap_or_else(|| self.expected.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Outcome::Skipped).unwrap(), "\"skipped\"");
        assert!(Outcome::Error.is_failure());
        assert!(!Outcome::Skipped.is_failure());
    }
}
