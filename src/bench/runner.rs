//! Benchmark runner
//!
//! Executes the full run × suite × function matrix strictly sequentially on
//! the calling thread. Suites never run in parallel; only the run as a whole
//! may move to another thread (see [`run_detached`]).

use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

use super::invoker::invoke;
use super::metrics::{ResultRecord, SuiteTimings};
use super::report::BenchmarkReport;
use crate::core::config::{validate_input, validate_runs};
use crate::core::error::{BenchError, BenchResult};
use crate::suite::{FunctionId, Suite};

#[derive(Debug)]
pub struct BenchmarkRunner {
    input: u32,
    runs: usize,
}

impl BenchmarkRunner {
    pub fn new(input: u32, runs: usize) -> BenchResult<Self> {
        validate_input(input)?;
        validate_runs(runs)?;
        Ok(Self { input, runs })
    }

    pub fn input(&self) -> u32 {
        self.input
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Run every function of every suite `runs` times.
    ///
    /// Suites are validated up front, so a configuration error never follows
    /// a timed call. The first failing invocation aborts the whole sequence.
    pub fn run(&self, suites: &[Suite]) -> BenchResult<Vec<ResultRecord>> {
        validate_suites(suites)?;

        info!(
            "Benchmarking {} suite(s), input {}, {} run(s)",
            suites.len(),
            self.input,
            self.runs
        );

        let mut records = Vec::with_capacity(self.runs);
        for run_index in 0..self.runs {
            let record = self.run_once(run_index, suites)?;
            debug!("Run {} complete", run_index);
            records.push(record);
        }

        info!("Benchmark finished: {} record(s)", records.len());
        Ok(records)
    }

    /// Like [`run`](Self::run), wrapped with run metadata
    pub fn run_report(&self, suites: &[Suite]) -> BenchResult<BenchmarkReport> {
        let records = self.run(suites)?;
        Ok(BenchmarkReport::new(
            self.input,
            self.runs,
            suites.iter().map(|s| s.name().to_string()).collect(),
            records,
        ))
    }

    fn run_once(&self, run_index: usize, suites: &[Suite]) -> BenchResult<ResultRecord> {
        let mut record = ResultRecord::new(run_index);

        for suite in suites {
            let mut timings = BTreeMap::new();
            for function in FunctionId::ALL {
                let f = suite.function(function).ok_or_else(|| {
                    BenchError::config(format!("suite '{}' has no '{}'", suite.name(), function))
                })?;

                let timed = invoke(f, self.input).map_err(|source| BenchError::Invocation {
                    suite: suite.name().to_string(),
                    function,
                    run_index,
                    source,
                })?;

                debug!(
                    "run {} {}.{} = {} in {:.3} ms",
                    run_index,
                    suite.name(),
                    function,
                    timed.value,
                    timed.elapsed.as_millis_f64()
                );
                timings.insert(function, timed.elapsed);
            }
            record.push(SuiteTimings {
                suite: suite.name().to_string(),
                timings,
            });
        }

        Ok(record)
    }
}

/// Non-empty, uniquely named, and every suite exposes every [`FunctionId`]
pub fn validate_suites(suites: &[Suite]) -> BenchResult<()> {
    if suites.is_empty() {
        return Err(BenchError::config("at least one suite is required"));
    }

    let mut names = HashSet::new();
    for suite in suites {
        if !names.insert(suite.name()) {
            return Err(BenchError::config(format!(
                "duplicate suite name '{}'",
                suite.name()
            )));
        }

        let missing = suite.missing_functions();
        if !missing.is_empty() {
            let missing: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
            return Err(BenchError::config(format!(
                "suite '{}' is missing: {}",
                suite.name(),
                missing.join(", ")
            )));
        }
    }
    Ok(())
}

/// Run the benchmark on tokio's blocking pool and resolve once with the full
/// report. Dropping the future abandons the result but not the work.
pub async fn run_detached(
    input: u32,
    runs: usize,
    suites: Vec<Suite>,
) -> BenchResult<BenchmarkReport> {
    let runner = BenchmarkRunner::new(input, runs)?;
    validate_suites(&suites)?;

    tokio::task::spawn_blocking(move || runner.run_report(&suites))
        .await
        .map_err(|e| BenchError::Join(e.to_string()))?
}
