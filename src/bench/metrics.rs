//! Timing and per-run result records

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::suite::FunctionId;

/// Elapsed monotonic time of one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timing(Duration);

impl Timing {
    pub fn new(elapsed: Duration) -> Self {
        Self(elapsed)
    }

    pub fn from_millis_f64(ms: f64) -> Self {
        Self(Duration::from_secs_f64(ms.max(0.0) / 1000.0))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    pub fn as_millis_f64(&self) -> f64 {
        self.0.as_secs_f64() * 1000.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Serialize for Timing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_millis_f64())
    }
}

/// Timings of one suite within a run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteTimings {
    pub suite: String,
    pub timings: BTreeMap<FunctionId, Timing>,
}

/// Complete timing data for one run across all suites and functions
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    pub run_index: usize,
    /// Suites in the order they were run
    pub suites: Vec<SuiteTimings>,
}

impl ResultRecord {
    pub fn new(run_index: usize) -> Self {
        Self {
            run_index,
            suites: Vec::new(),
        }
    }

    pub fn push(&mut self, suite: SuiteTimings) {
        self.suites.push(suite);
    }

    pub fn timing(&self, suite: &str, function: FunctionId) -> Option<Timing> {
        self.suites
            .iter()
            .find(|s| s.suite == suite)
            .and_then(|s| s.timings.get(&function).copied())
    }

    /// All `(suite, timing)` pairs for one function, in run order
    pub fn timings_for(&self, function: FunctionId) -> impl Iterator<Item = (&str, Timing)> + '_ {
        self.suites
            .iter()
            .filter_map(move |s| s.timings.get(&function).map(|t| (s.suite.as_str(), *t)))
    }

    pub fn min_timing(&self, function: FunctionId) -> Option<Timing> {
        self.timings_for(function).map(|(_, t)| t).min()
    }

    pub fn max_timing(&self, function: FunctionId) -> Option<Timing> {
        self.timings_for(function).map(|(_, t)| t).max()
    }

    pub fn suite_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.suites.iter().map(|s| s.suite.as_str())
    }

    /// Every suite has a timing for every function
    pub fn is_complete(&self) -> bool {
        !self.suites.is_empty()
            && self
                .suites
                .iter()
                .all(|s| FunctionId::ALL.iter().all(|f| s.timings.contains_key(f)))
    }
}
