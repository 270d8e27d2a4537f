//! Benchmark report and aggregate summary

use serde::Serialize;

use super::compare::{self, Annotation};
use super::metrics::{ResultRecord, Timing};
use crate::suite::FunctionId;

/// Full outcome of one benchmark invocation
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub input: u32,
    pub runs: usize,
    /// Suite names in execution order
    pub suites: Vec<String>,
    /// RFC 3339 completion time
    pub generated_at: String,
    pub records: Vec<ResultRecord>,
}

/// min/mean/max of one suite's timings for one function, in milliseconds
#[derive(Debug, Clone, Serialize)]
pub struct FunctionSummary {
    pub suite: String,
    pub function: FunctionId,
    pub min_ms: f64,
    pub mean_ms: f64,
    pub max_ms: f64,
    /// Number of runs in which this suite was (one of) the fastest
    pub wins: usize,
}

impl BenchmarkReport {
    pub fn new(input: u32, runs: usize, suites: Vec<String>, records: Vec<ResultRecord>) -> Self {
        Self {
            input,
            runs,
            suites,
            generated_at: chrono::Utc::now().to_rfc3339(),
            records,
        }
    }

    pub fn record(&self, run_index: usize) -> Option<&ResultRecord> {
        self.records.get(run_index)
    }

    pub fn fastest(&self, run_index: usize, function: FunctionId) -> Vec<&str> {
        self.record(run_index)
            .map(|r| compare::fastest_suites(r, function))
            .unwrap_or_default()
    }

    pub fn annotation(&self, run_index: usize, suite: &str, function: FunctionId) -> Option<Annotation> {
        self.record(run_index)
            .map(|r| compare::annotate(&self.records, r, suite, function))
    }

    /// Display label such as `"1.50x"`; empty when not fastest or no speed-up
    pub fn speedup_label(&self, run_index: usize, suite: &str, function: FunctionId) -> String {
        self.annotation(run_index, suite, function)
            .map(|a| a.label())
            .unwrap_or_default()
    }

    /// Per suite × function aggregate, suites in run order
    pub fn summary(&self) -> Vec<FunctionSummary> {
        let mut rows = Vec::with_capacity(self.suites.len() * FunctionId::ALL.len());

        for suite in &self.suites {
            for function in FunctionId::ALL {
                let timings: Vec<Timing> = self
                    .records
                    .iter()
                    .filter_map(|r| r.timing(suite, function))
                    .collect();
                if timings.is_empty() {
                    continue;
                }

                let ms: Vec<f64> = timings.iter().map(Timing::as_millis_f64).collect();
                let min = ms.iter().copied().fold(f64::INFINITY, f64::min);
                let max = ms.iter().copied().fold(0.0, f64::max);
                let mean = ms.iter().sum::<f64>() / ms.len() as f64;
                let wins = self
                    .records
                    .iter()
                    .filter(|r| compare::is_fastest(r, suite, function))
                    .count();

                rows.push(FunctionSummary {
                    suite: suite.clone(),
                    function,
                    min_ms: min,
                    mean_ms: mean,
                    max_ms: max,
                    wins,
                });
            }
        }
        rows
    }

    /// Suite with the most wins per function; ties go to the earlier suite
    pub fn overall_fastest(&self, function: FunctionId) -> Option<String> {
        let summary = self.summary();
        let mut best: Option<&FunctionSummary> = None;
        for row in summary.iter().filter(|r| r.function == function) {
            if best.map_or(true, |b| row.wins > b.wins) {
                best = Some(row);
            }
        }
        best.map(|b| b.suite.clone())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::metrics::fixtures::record;

    const F: FunctionId = FunctionId::Loop;

    fn report() -> BenchmarkReport {
        BenchmarkReport::new(
            10,
            2,
            vec!["A".into(), "B".into()],
            vec![
                record(0, vec![("A", vec![(F, 4.0)]), ("B", vec![(F, 2.0)])]),
                record(1, vec![("A", vec![(F, 1.0)]), ("B", vec![(F, 2.0)])]),
            ],
        )
    }

    #[test]
    fn test_fastest_and_labels() {
        let report = report();
        assert_eq!(report.fastest(0, F), vec!["B"]);
        assert_eq!(report.fastest(1, F), vec!["A"]);
        assert!(report.fastest(5, F).is_empty());

        assert_eq!(report.speedup_label(0, "B", F), "2x");
        assert_eq!(report.speedup_label(1, "A", F), "4x");
        assert_eq!(report.speedup_label(1, "B", F), "");
    }

    #[test]
    fn test_summary() {
        let summary = report().summary();
        assert_eq!(summary.len(), 2);

        let a = &summary[0];
        assert_eq!(a.suite, "A");
        assert!((a.min_ms - 1.0).abs() < 1e-9);
        assert!((a.max_ms - 4.0).abs() < 1e-9);
        assert!((a.mean_ms - 2.5).abs() < 1e-9);
        assert_eq!(a.wins, 1);

        assert_eq!(summary[1].wins, 1);
    }

    #[test]
    fn test_overall_fastest_tie_goes_to_first() {
        assert_eq!(report().overall_fastest(F), Some("A".to_string()));
        assert_eq!(report().overall_fastest(FunctionId::Memoized), None);
    }

    #[test]
    fn test_json_shape() {
        let json = report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["input"], 10);
        assert_eq!(value["records"][0]["suites"][1]["suite"], "B");
        assert_eq!(value["records"][0]["suites"][1]["timings"]["loop"], 2.0);
    }
}
