//! Outcome tallies across a run.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use super::result::{ExecutionResult, Outcome};
use super::sink::ResultSink;
use crate::http::ResponseFamily;

/// Counts per outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub pass: u64,
    pub fail: u64,
    pub error: u64,
    pub skipped: u64,
}

impl OutcomeCounts {
    fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Pass => self.pass += 1,
            Outcome::Fail => self.fail += 1,
            Outcome::Error => self.error += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.pass + self.fail + self.error + self.skipped
    }
}

/// Point-in-time view of [`ExecutionStatistics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    pub totals: OutcomeCounts,
    pub per_fuzzer: BTreeMap<String, OutcomeCounts>,
    pub families: BTreeMap<ResponseFamily, u64>,
}

#[derive(Default)]
struct AtomicCounts {
    pass: AtomicU64,
    fail: AtomicU64,
    error: AtomicU64,
    skipped: AtomicU64,
}

impl AtomicCounts {
    fn slot(&self, outcome: Outcome) -> &AtomicU64 {
        match outcome {
            Outcome::Pass => &self.pass,
            Outcome::Fail => &self.fail,
            Outcome::Error => &self.error,
            Outcome::Skipped => &self.skipped,
        }
    }

    fn load(&self) -> OutcomeCounts {
        OutcomeCounts {
            pass: self.pass.load(Ordering::Relaxed),
            fail: self.fail.load(Ordering::Relaxed),
            error: self.error.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

/// Lock-free run statistics: global and per-fuzzer outcome counts plus a
/// histogram of observed response families.
#[derive(Default)]
pub struct ExecutionStatistics {
    totals: AtomicCounts,
    per_fuzzer: DashMap<String, OutcomeCounts>,
    families: DashMap<ResponseFamily, u64>,
}

impl ExecutionStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, outcome: Outcome) -> u64 {
        self.totals.slot(outcome).load(Ordering::Relaxed)
    }

    pub fn totals(&self) -> OutcomeCounts {
        self.totals.load()
    }

    pub fn for_fuzzer(&self, fuzzer: &str) -> OutcomeCounts {
        self.per_fuzzer.get(fuzzer).map(|c| *c).unwrap_or_default()
    }

    pub fn snapshot(&self) -> StatisticsSnapshot {
        StatisticsSnapshot {
            totals: self.totals(),
            per_fuzzer: self
                .per_fuzzer
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
            families: self
                .families
                .iter()
                .map(|entry| (*entry.key(), *entry.value()))
                .collect(),
        }
    }
}

impl ResultSink for ExecutionStatistics {
    fn record(&self, result: &ExecutionResult) {
        self.totals.slot(result.outcome).fetch_add(1, Ordering::Relaxed);
        self.per_fuzzer
            .entry(result.fuzzer.clone())
            .or_default()
            .add(result.outcome);
        if let Some(family) = result.actual_family {
            *self.families.entry(family).or_insert(0) += 1;
        }
    }
}
