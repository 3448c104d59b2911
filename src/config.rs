//! Engine configuration from TOML files and environment variables.
//!
//! Every value has a default. Environment variables override file values;
//! missing or unparsable variables are ignored without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `PROBE_CORE_MAX_RPM` | 10000 | Max requests per minute against the target |
//! | `PROBE_CORE_REPORT_DEPTH` | 18 | Depth bound for diagnostic rendering |
//! | `PROBE_CORE_CYCLIC_REPEATS` | 2 | Repeats tolerated before a path counts as cyclic |
//! | `PROBE_CORE_MAX_CONCURRENT` | 8 | Scenarios in flight in `execute_all` |
//! | `PROBE_CORE_DISPATCH_TIMEOUT_MS` | 60000 | Per-dispatch timeout (0 = none) |
//! | `PROBE_CORE_LOG_LEVEL` | info | Tracing filter directive |
//! | `PROBE_CORE_LOG_FORMAT` | json | `json`, `pretty` or `compact` |

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::telemetry::{LogConfig, LogFormat};

pub const DEFAULT_MAX_REQUESTS_PER_MINUTE: u32 = 10_000;
/// Three levels of self-reference, six nodes each.
pub const DEFAULT_REPORT_MAX_DEPTH: usize = 18;
pub const DEFAULT_CYCLIC_MAX_REPEATS: usize = 2;
pub const DEFAULT_MAX_CONCURRENT_SCENARIOS: usize = 8;
pub const DEFAULT_DISPATCH_TIMEOUT_MS: u64 = 60_000;

/// Logging section of the engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Json }
    }
}

impl LogSettings {
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            format: self.format,
            level: self.level.clone(),
            output_path: None,
        }
    }
}

/// All engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_requests_per_minute: u32,
    pub report_max_depth: usize,
    pub cyclic_max_repeats: usize,
    pub max_concurrent_scenarios: usize,
    pub dispatch_timeout_ms: u64,
    pub log: LogSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_requests_per_minute: DEFAULT_MAX_REQUESTS_PER_MINUTE,
            report_max_depth: DEFAULT_REPORT_MAX_DEPTH,
            cyclic_max_repeats: DEFAULT_CYCLIC_MAX_REPEATS,
            max_concurrent_scenarios: DEFAULT_MAX_CONCURRENT_SCENARIOS,
            dispatch_timeout_ms: DEFAULT_DISPATCH_TIMEOUT_MS,
            log: LogSettings::default(),
        }
    }
}

/// Flat summary of effective values, for startup logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectiveConfig {
    pub max_requests_per_minute: u32,
    pub rate_interval_ms: u64,
    pub report_max_depth: usize,
    pub cyclic_max_repeats: usize,
    pub max_concurrent_scenarios: usize,
    pub dispatch_timeout_ms: u64,
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Parse an env var, returning `None` on missing or invalid.
fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|val| val.trim().parse::<T>().ok())
}

impl EngineConfig {
    /// Overlay `PROBE_CORE_*` variables, then apply floors.
    fn apply_env(mut self) -> Self {
        if let Some(rpm) = parse_env("PROBE_CORE_MAX_RPM") {
            self.max_requests_per_minute = rpm;
        }
        if let Some(depth) = parse_env("PROBE_CORE_REPORT_DEPTH") {
            self.report_max_depth = depth;
        }
        if let Some(repeats) = parse_env("PROBE_CORE_CYCLIC_REPEATS") {
            self.cyclic_max_repeats = repeats;
        }
        if let Some(concurrent) = parse_env("PROBE_CORE_MAX_CONCURRENT") {
            self.max_concurrent_scenarios = concurrent;
        }
        if let Some(timeout) = parse_env("PROBE_CORE_DISPATCH_TIMEOUT_MS") {
            self.dispatch_timeout_ms = timeout;
        }
        if let Ok(level) = std::env::var("PROBE_CORE_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.log.level = level.trim().to_string();
            }
        }
        if let Some(format) = parse_env("PROBE_CORE_LOG_FORMAT") {
            self.log.format = format;
        }
        self.with_floors()
    }

    fn with_floors(mut self) -> Self {
        self.max_concurrent_scenarios = self.max_concurrent_scenarios.max(1);
        self
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.max_requests_per_minute == 0 {
            return Err(EngineError::invalid(
                "max_requests_per_minute",
                "maxRequestsPerMinute must be > 0",
            ));
        }
        Ok(())
    }

    /// Executor-side dispatch timeout; `None` when disabled.
    pub fn dispatch_timeout(&self) -> Option<Duration> {
        (self.dispatch_timeout_ms > 0).then(|| Duration::from_millis(self.dispatch_timeout_ms))
    }

    pub fn effective_summary(&self) -> EffectiveConfig {
        let rate_interval_ms = match self.max_requests_per_minute {
            0 => 0,
            rpm => 60_000 / u64::from(rpm),
        };
        EffectiveConfig {
            max_requests_per_minute: self.max_requests_per_minute,
            rate_interval_ms,
            report_max_depth: self.report_max_depth,
            cyclic_max_repeats: self.cyclic_max_repeats,
            max_concurrent_scenarios: self.max_concurrent_scenarios,
            dispatch_timeout_ms: self.dispatch_timeout_ms,
            log_level: self.log.level.clone(),
            log_format: self.log.format,
        }
    }
}

/// Load configuration from defaults and environment variables.
pub fn load() -> EngineConfig {
    EngineConfig::default().apply_env()
}

/// Load configuration from a TOML file. Missing keys take defaults.
pub fn load_file(path: impl AsRef<Path>) -> Result<EngineConfig, EngineError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: EngineConfig = toml::from_str(&text).map_err(|source| EngineError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(config.with_floors())
}

/// Load a TOML file, then overlay environment variables.
pub fn load_layered(path: impl AsRef<Path>) -> Result<EngineConfig, EngineError> {
    Ok(load_file(path)?.apply_env())
}
