//! One fully specified fuzz attempt.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::dispatch::{DispatchRequest, DispatchResponse};
use crate::http::{Headers, HttpMethod, ResponseFamily};
use crate::report::Outcome;

/// Request body of a scenario.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Payload {
    #[default]
    Empty,
    Json(Value),
    /// Sent verbatim; used for deliberately malformed bodies.
    Raw(String),
}

impl Payload {
    pub fn to_body(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Json(doc) => Some(doc.to_string()),
            Self::Raw(text) => Some(text.clone()),
        }
    }

    /// Structured view of the payload; raw text is parsed when possible.
    pub fn as_document(&self) -> Option<Value> {
        match self {
            Self::Empty => None,
            Self::Json(doc) => Some(doc.clone()),
            Self::Raw(text) => serde_json::from_str(text).ok(),
        }
    }
}

/// Decision taken on a response that arrived.
///
/// Only [`Verdict::pass`] and [`Verdict::fail`] build one: `Error` and
/// `Skipped` belong to the executor, never to a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    passed: bool,
    reason: String,
}

impl Verdict {
    pub fn pass(reason: impl Into<String>) -> Self {
        Self { passed: true, reason: reason.into() }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self { passed: false, reason: reason.into() }
    }

    pub fn is_pass(&self) -> bool {
        self.passed
    }

    /// `Pass` or `Fail`.
    pub fn outcome(&self) -> Outcome {
        if self.passed {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn into_reason(self) -> String {
        self.reason
    }
}

/// Fuzzer-specific response classification, replacing the family match.
pub trait ResponseCheck: Send + Sync {
    fn check(&self, scenario: &Scenario, response: &DispatchResponse) -> Verdict;
}

impl<F> ResponseCheck for F
where
    F: Fn(&Scenario, &DispatchResponse) -> Verdict + Send + Sync,
{
    fn check(&self, scenario: &Scenario, response: &DispatchResponse) -> Verdict {
        self(scenario, response)
    }
}

/// A request shape plus the response family it should produce.
///
/// Optional fields default to no-ops: no headers, no query, empty payload,
/// nothing suppressed or skipped, family-based classification.
#[derive(Clone)]
pub struct Scenario {
    pub fuzzer: String,
    pub description: String,
    pub method: HttpMethod,
    pub path: String,
    pub expected: ResponseFamily,
    /// Exact expected code (e.g. `406`) shown in reports instead of the family.
    pub expected_label: Option<String>,
    pub headers: Headers,
    pub query: BTreeMap<String, String>,
    pub payload: Payload,
    /// Header names removed before dispatch, case-insensitively.
    pub suppressed_headers: BTreeSet<String>,
    /// Methods this fuzzer does not apply to.
    pub skip_methods: HashSet<HttpMethod>,
    pub check: Option<Arc<dyn ResponseCheck>>,
}

impl Scenario {
    pub fn new(
        fuzzer: impl Into<String>,
        description: impl Into<String>,
        method: HttpMethod,
        path: impl Into<String>,
        expected: ResponseFamily,
    ) -> Self {
        Self {
            fuzzer: fuzzer.into(),
            description: description.into(),
            method,
            path: path.into(),
            expected,
            expected_label: None,
            headers: Headers::new(),
            query: BTreeMap::new(),
            payload: Payload::Empty,
            suppressed_headers: BTreeSet::new(),
            skip_methods: HashSet::new(),
            check: None,
        }
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn suppressing(mut self, header: impl Into<String>) -> Self {
        self.suppressed_headers.insert(header.into());
        self
    }

    pub fn skipping(mut self, methods: impl IntoIterator<Item = HttpMethod>) -> Self {
        self.skip_methods.extend(methods);
        self
    }

    pub fn expecting_code(mut self, code: impl Into<String>) -> Self {
        self.expected_label = Some(code.into());
        self
    }

    pub fn with_check(mut self, check: impl ResponseCheck + 'static) -> Self {
        self.check = Some(Arc::new(check));
        self
    }

    pub fn is_skipped(&self) -> bool {
        self.skip_methods.contains(&self.method)
    }

    /// Label for the expected side of report messages.
    pub fn expected_text(&self) -> String {
        self.expected_label
            .clone()
            .unwrap_or_else(|| self.expected.to_string())
    }

    /// Request as sent: suppressed headers stripped.
    pub fn to_request(&self) -> DispatchRequest {
        DispatchRequest {
            method: self.method,
            path: self.path.clone(),
            headers: self.headers.without(&self.suppressed_headers),
            query: self.query.clone(),
            body: self.payload.to_body(),
        }
    }
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("fuzzer", &self.fuzzer)
            .field("description", &self.description)
            .field("method", &self.method)
            .field("path", &self.path)
            .field("expected", &self.expected)
            .field("expected_label", &self.expected_label)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("payload", &self.payload)
            .field("suppressed_headers", &self.suppressed_headers)
            .field("skip_methods", &self.skip_methods)
            .field("custom_check", &self.check.is_some())
            .finish()
    }
}
