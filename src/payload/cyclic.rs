//! Detection of runaway self-reference while expanding schemas or payloads.
//!
//! A chain of visited segments is cyclic when some contiguous run of
//! segments repeats back-to-back more than `max_repeats` times. Every unit
//! length up to half the chain is tried, so direct (`a,a,a`) and indirect
//! (`a,b,c,a,b,c`) cycles are caught without knowing the period.

use super::path::PATH_SEPARATOR;

/// True when a unit of length >= 1 occurs more than `max_repeats` times
/// consecutively anywhere in `chain`. `max_repeats == 0` is never cyclic.
pub fn is_cyclic<S: PartialEq>(chain: &[S], max_repeats: usize) -> bool {
    if max_repeats == 0 || chain.len() < 2 {
        return false;
    }
    let needed = max_repeats + 1;
    let n = chain.len();
    let longest_unit = n / 2;

    for unit in 1..=longest_unit {
        if unit.saturating_mul(needed) > n {
            break;
        }
        for start in 0..=(n - unit * needed) {
            if repeats_at(chain, start, unit) >= needed {
                return true;
            }
        }
    }
    false
}

/// Consecutive occurrences of `chain[start..start + unit]` beginning at `start`.
fn repeats_at<S: PartialEq>(chain: &[S], start: usize, unit: usize) -> usize {
    let pattern = &chain[start..start + unit];
    let mut count = 1;
    let mut next = start + unit;
    while next + unit <= chain.len() && &chain[next..next + unit] == pattern {
        count += 1;
        next += unit;
    }
    count
}

/// [`is_cyclic`] over a flat `#`-joined path such as `node#next#node#next`.
pub fn is_cyclic_path(path: &str, max_repeats: usize) -> bool {
    let chain: Vec<&str> = path.split(PATH_SEPARATOR).filter(|s| !s.is_empty()).collect();
    is_cyclic(&chain, max_repeats)
}

/// Segments traversed during one generation pass. Push-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitChain {
    segments: Vec<String>,
}

impl VisitChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for VisitChain {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { segments: iter.into_iter().map(Into::into).collect() }
    }
}

/// Cycle detector with a fixed repeat threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclicGuard {
    max_repeats: usize,
}

impl CyclicGuard {
    pub fn new(max_repeats: usize) -> Self {
        Self { max_repeats }
    }

    pub fn max_repeats(&self) -> usize {
        self.max_repeats
    }

    pub fn is_cyclic<S: PartialEq>(&self, chain: &[S]) -> bool {
        is_cyclic(chain, self.max_repeats)
    }

    /// Whether descending into `next` keeps `chain` acyclic.
    pub fn admits(&self, chain: &VisitChain, next: &str) -> bool {
        let mut candidate: Vec<&str> = chain.segments.iter().map(String::as_str).collect();
        candidate.push(next);
        !is_cyclic(&candidate, self.max_repeats)
    }
}
