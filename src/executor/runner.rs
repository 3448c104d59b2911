//! Scenario execution: skip check, rate limit, dispatch, classify, report.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn, Instrument, Span};

use super::dispatch::{DispatchError, DispatchRequest, DispatchResponse, Dispatcher};
use super::scenario::{Scenario, Verdict};
use crate::config::EngineConfig;
use crate::http::{Headers, ResponseFamily};
use crate::report::{BoundedSerializer, ExecutionResult, Outcome, ResultSink};
use crate::scheduler::RateLimiter;
use crate::telemetry::{metrics, ScenarioSpan, SpanExt};

/// Lifecycle of one scenario. Terminal at `Reported`; a transport failure
/// jumps from `Dispatched` straight to `Reported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioPhase {
    Built,
    Dispatched,
    Classified,
    Reported,
}

impl ScenarioPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::Dispatched => "dispatched",
            Self::Classified => "classified",
            Self::Reported => "reported",
        }
    }
}

/// Compare the actual status against the expected family.
///
/// A 5xx where a 4xx was expected is still `Fail`: the service answered.
pub fn classify(expected: ResponseFamily, expected_text: &str, status: u16) -> Verdict {
    let actual = ResponseFamily::of(status);
    if actual == expected {
        Verdict::pass(format!(
            "Call returned as expected: response code {} matches {}",
            status, expected_text
        ))
    } else if expected.is_4xx() && actual.is_5xx() {
        Verdict::fail(format!(
            "Call failed with a server error: expected {}, got {}",
            expected_text, status
        ))
    } else {
        Verdict::fail(format!(
            "Unexpected response code: expected {}, got {}",
            expected_text, status
        ))
    }
}

#[derive(Serialize)]
struct RequestView<'a> {
    method: &'a str,
    path: &'a str,
    headers: &'a Headers,
    query: &'a std::collections::BTreeMap<String, String>,
    body: Option<Value>,
}

#[derive(Serialize)]
struct ResponseView<'a> {
    status: u16,
    headers: &'a Headers,
    body: Option<Value>,
}

/// Request/response pair rendered into the diagnostic field.
#[derive(Serialize)]
struct Exchange<'a> {
    request: RequestView<'a>,
    response: Option<ResponseView<'a>>,
    error: Option<String>,
}

fn body_value(text: &str) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

impl<'a> Exchange<'a> {
    fn new(request: &'a DispatchRequest) -> Self {
        Self {
            request: RequestView {
                method: request.method.as_str(),
                path: &request.path,
                headers: &request.headers,
                query: &request.query,
                body: request.body.as_deref().and_then(body_value),
            },
            response: None,
            error: None,
        }
    }

    fn answered(mut self, response: &'a DispatchResponse) -> Self {
        self.response = Some(ResponseView {
            status: response.status,
            headers: &response.headers,
            body: body_value(&response.body),
        });
        self
    }

    fn failed(mut self, error: &DispatchError) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Classification before the result record is assembled.
struct Settled {
    outcome: Outcome,
    status: Option<u16>,
    reason: String,
    diagnostic: String,
    latency: Duration,
}

/// Runs scenarios against one target through a shared rate limiter.
pub struct ScenarioExecutor {
    dispatcher: Arc<dyn Dispatcher>,
    limiter: Arc<RateLimiter>,
    serializer: BoundedSerializer,
    sinks: Vec<Arc<dyn ResultSink>>,
    dispatch_timeout: Option<Duration>,
    max_concurrent: usize,
    next_id: AtomicU64,
}

impl ScenarioExecutor {
    pub fn new(dispatcher: Arc<dyn Dispatcher>, limiter: Arc<RateLimiter>, config: &EngineConfig) -> Self {
        Self {
            dispatcher,
            limiter,
            serializer: BoundedSerializer::new(config.report_max_depth),
            sinks: Vec::new(),
            dispatch_timeout: config.dispatch_timeout(),
            max_concurrent: config.max_concurrent_scenarios.max(1),
            next_id: AtomicU64::new(0),
        }
    }

    /// Register a reporting collaborator. Every result reaches every sink.
    pub fn with_sink(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Execute one scenario. Always yields exactly one result.
    pub async fn execute(&self, scenario: &Scenario) -> ExecutionResult {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let span = ScenarioSpan::new(id, &scenario.fuzzer, scenario.method.as_str(), &scenario.path);
        self.run(id, scenario, span.clone()).instrument(span).await
    }

    async fn run(&self, id: u64, scenario: &Scenario, span: Span) -> ExecutionResult {
        let started_at = Utc::now();
        let clock = Instant::now();
        span.record_phase(ScenarioPhase::Built.as_str());

        if scenario.is_skipped() {
            let settled = Settled {
                outcome: Outcome::Skipped,
                status: None,
                reason: format!("Skipping fuzzer for method {}", scenario.method),
                diagnostic: String::new(),
                latency: Duration::ZERO,
            };
            return self.report(id, scenario, started_at, clock, settled, &span);
        }

        self.limiter.acquire().await;

        let request = scenario.to_request();
        span.record_phase(ScenarioPhase::Dispatched.as_str());
        debug!(
            headers = request.headers.len(),
            has_body = request.body.is_some(),
            "dispatching scenario"
        );
        let sent = Instant::now();
        let response = self.dispatch(&request).await;
        let latency = sent.elapsed();
        metrics::record_dispatch_latency(latency);

        let settled = match response {
            Err(error) => Settled {
                outcome: Outcome::Error,
                status: None,
                reason: format!("Transport failure: {}", error),
                diagnostic: self.serializer.render(&Exchange::new(&request).failed(&error)),
                latency,
            },
            Ok(response) => {
                span.record_phase(ScenarioPhase::Classified.as_str());
                let verdict = match scenario.check.as_ref() {
                    Some(check) => check.check(scenario, &response),
                    None => classify(scenario.expected, &scenario.expected_text(), response.status),
                };
                Settled {
                    outcome: verdict.outcome(),
                    status: Some(response.status),
                    reason: verdict.into_reason(),
                    diagnostic: self.serializer.render(&Exchange::new(&request).answered(&response)),
                    latency,
                }
            }
        };
        self.report(id, scenario, started_at, clock, settled, &span)
    }

    async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchResponse, DispatchError> {
        match self.dispatch_timeout {
            Some(limit) => tokio::time::timeout(limit, self.dispatcher.dispatch(request))
                .await
                .unwrap_or_else(|_| {
                    Err(DispatchError::Timeout { after_ms: limit.as_millis() as u64 })
                }),
            None => self.dispatcher.dispatch(request).await,
        }
    }

    fn report(
        &self,
        id: u64,
        scenario: &Scenario,
        started_at: DateTime<Utc>,
        clock: Instant,
        settled: Settled,
        span: &Span,
    ) -> ExecutionResult {
        let result = ExecutionResult {
            id,
            outcome: settled.outcome,
            fuzzer: scenario.fuzzer.clone(),
            description: scenario.description.clone(),
            method: scenario.method,
            path: scenario.path.clone(),
            expected: scenario.expected,
            expected_label: scenario.expected_label.clone(),
            actual_status: settled.status,
            actual_family: settled.status.map(ResponseFamily::of),
            reason: settled.reason,
            diagnostic: settled.diagnostic,
            started_at,
            elapsed_ms: clock.elapsed().as_millis() as u64,
        };

        span.record_phase(ScenarioPhase::Reported.as_str());
        span.record_outcome(result.outcome.as_str(), result.actual_status, settled.latency);
        metrics::record_scenario(result.outcome, &result.fuzzer);
        match result.outcome {
            Outcome::Pass | Outcome::Skipped => info!(outcome = %result.outcome, reason = %result.reason, "scenario reported"),
            Outcome::Fail | Outcome::Error => warn!(outcome = %result.outcome, reason = %result.reason, "scenario reported"),
        }

        for sink in &self.sinks {
            let recorded = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.record(&result)));
            if let Err(payload) = recorded {
                error!(id = result.id, cause = %panic_message(payload.as_ref()), "result sink panicked");
            }
        }
        result
    }

    /// Execute many scenarios on separate tasks, at most `max_concurrent`
    /// in flight. One result per scenario, in completion order; a task that
    /// panics is reported as `Error`. A panicking sink is logged and skipped,
    /// so every sink still sees each scenario once.
    pub async fn execute_all(self: &Arc<Self>, scenarios: Vec<Scenario>) -> Vec<ExecutionResult> {
        let tasks = scenarios.into_iter().map(|scenario| {
            let executor = Arc::clone(self);
            async move {
                let worker = Arc::clone(&executor);
                let task = scenario.clone();
                match tokio::spawn(async move { worker.execute(&task).await }).await {
                    Ok(result) => result,
                    Err(join_error) => executor.report_crash(&scenario, join_error.to_string()),
                }
            }
        });
        stream::iter(tasks)
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await
    }

    fn report_crash(&self, scenario: &Scenario, cause: String) -> ExecutionResult {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let span = ScenarioSpan::new(id, &scenario.fuzzer, scenario.method.as_str(), &scenario.path);
        let settled = Settled {
            outcome: Outcome::Error,
            status: None,
            reason: format!("Scenario task failed: {}", cause),
            diagnostic: String::new(),
            latency: Duration::ZERO,
        };
        let _entered = span.enter();
        self.report(id, scenario, Utc::now(), Instant::now(), settled, &span)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_family_passes() {
        let verdict = classify(ResponseFamily::ClientError, "4xx", 404);
        assert_eq!(verdict.outcome(), Outcome::Pass);
    }

    #[test]
    fn server_error_when_client_error_expected_is_a_fail() {
        let verdict = classify(ResponseFamily::ClientError, "4xx", 503);
        assert_eq!(verdict.outcome(), Outcome::Fail);
        assert!(verdict.reason().contains("server error"));
    }

    #[test]
    fn out_of_range_status_never_matches_a_real_family() {
        assert_eq!(classify(ResponseFamily::Success, "2xx", 999).outcome(), Outcome::Fail);
        assert_eq!(classify(ResponseFamily::Zero, "0xx", 999).outcome(), Outcome::Pass);
    }

    #[test]
    fn transport_errors_render_into_the_diagnostic() {
        let request = DispatchRequest {
            method: crate::http::HttpMethod::Post,
            path: "/pets".into(),
            headers: Headers::new(),
            query: Default::default(),
            body: Some(r#"{"id":1}"#.into()),
        };
        let error = DispatchError::Connect("refused".into());
        let rendered = BoundedSerializer::new(6).render(&Exchange::new(&request).failed(&error));
        assert_eq!(
            rendered,
            r#"{"error":"Connection failed: refused","request":{"body":{"id":1},"headers":{},"method":"POST","path":"/pets","query":{}}}"#
        );
    }
}
