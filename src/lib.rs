//! Probe Core
//!
//! Payload mutation and scenario execution engine for contract-driven REST
//! API fuzzing. Fuzzer strategies build scenarios; this crate paces, sends,
//! classifies and reports them.
//!
//! # Components
//!
//! - **payload**: `#`-path navigation, field enumeration, mutation, cycle guard
//! - **report**: depth-bounded rendering, result records, sinks, statistics
//! - **scheduler**: shared per-target rate limiter
//! - **http**: response families, methods, headers
//! - **executor**: skip, acquire, dispatch, classify, report
//!
//! # Boundaries
//!
//! - No HTTP client: requests leave through the `Dispatcher` trait.
//! - No OpenAPI parsing or value generation: scenarios arrive fully built.
//! - No output formatting: results leave through `ResultSink`.

pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod payload;
pub mod report;
pub mod scheduler;
pub mod telemetry;

use std::sync::Arc;

use tracing::info;

use config::EngineConfig;
use error::EngineError;
use executor::{Dispatcher, FieldSweep, ScenarioExecutor};
use report::{ExecutionStatistics, ResultSink};
use scheduler::RateLimiter;
use telemetry::LogError;

/// A configured engine for one target service.
pub struct Engine {
    pub config: EngineConfig,
    pub limiter: Arc<RateLimiter>,
    pub statistics: Arc<ExecutionStatistics>,
    pub executor: Arc<ScenarioExecutor>,
}

impl Engine {
    /// Build the shared limiter, statistics sink and executor.
    ///
    /// Fails fast on invalid configuration.
    pub fn new(config: EngineConfig, dispatcher: Arc<dyn Dispatcher>) -> Result<Self, EngineError> {
        Self::with_sinks(config, dispatcher, Vec::new())
    }

    /// Like [`Engine::new`], also feeding results to extra sinks.
    pub fn with_sinks(
        config: EngineConfig,
        dispatcher: Arc<dyn Dispatcher>,
        sinks: Vec<Arc<dyn ResultSink>>,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let limiter = Arc::new(RateLimiter::new(config.max_requests_per_minute)?);
        let statistics = Arc::new(ExecutionStatistics::new());

        let mut executor = ScenarioExecutor::new(dispatcher, Arc::clone(&limiter), &config)
            .with_sink(statistics.clone());
        for sink in sinks {
            executor = executor.with_sink(sink);
        }

        info!(config = ?config.effective_summary(), "engine configured");
        Ok(Self {
            config,
            limiter,
            statistics,
            executor: Arc::new(executor),
        })
    }

    /// Install the tracing subscriber described by `config.log`.
    ///
    /// Call once at startup, before executing scenarios. Embedders that
    /// install their own subscriber skip this.
    pub fn init_logging(&self) -> Result<(), LogError> {
        telemetry::init_logging(&self.config.log.to_log_config())
    }

    /// Field sweep using the configured cycle threshold.
    pub fn field_sweep(&self) -> FieldSweep {
        FieldSweep::new(self.config.cyclic_max_repeats)
    }
}
