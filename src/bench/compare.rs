//! Fastest-suite and speed-up annotations derived from result records

use serde::Serialize;

use super::metrics::{ResultRecord, Timing};
use crate::suite::FunctionId;

/// Suites whose timing equals the record minimum for `function`.
///
/// Exact comparison: tied suites are all fastest.
pub fn fastest_suites(record: &ResultRecord, function: FunctionId) -> Vec<&str> {
    let Some(min) = record.min_timing(function) else {
        return Vec::new();
    };
    record
        .timings_for(function)
        .filter(|(_, t)| *t == min)
        .map(|(name, _)| name)
        .collect()
}

pub fn is_fastest(record: &ResultRecord, suite: &str, function: FunctionId) -> bool {
    match (record.timing(suite, function), record.min_timing(function)) {
        (Some(t), Some(min)) => t == min,
        _ => false,
    }
}

/// Slowest timing for `function` across every suite of every record
pub fn slowest_timing(history: &[ResultRecord], function: FunctionId) -> Option<Timing> {
    history.iter().filter_map(|r| r.max_timing(function)).max()
}

/// How many times faster `suite` is in `record` than the slowest timing seen
/// for `function` in `history`.
///
/// `None` unless `suite` is fastest in `record`. The current record always
/// takes part in the maximum, so the ratio is never below 1. A zero fastest
/// timing yields `None` since the ratio is undefined.
pub fn speedup_ratio(
    history: &[ResultRecord],
    record: &ResultRecord,
    suite: &str,
    function: FunctionId,
) -> Option<f64> {
    if !is_fastest(record, suite, function) {
        return None;
    }
    let fastest = record.timing(suite, function)?;
    let slowest = slowest_timing(history, function)
        .into_iter()
        .chain(record.max_timing(function))
        .max()
        .unwrap_or(fastest)
        .max(fastest);

    if fastest.is_zero() {
        return if slowest.is_zero() { Some(1.0) } else { None };
    }
    Some(slowest.as_millis_f64() / fastest.as_millis_f64())
}

/// `""` for no speed-up, two decimals below 2x, whole numbers otherwise
pub fn format_ratio(ratio: f64) -> String {
    if !ratio.is_finite() || ratio <= 1.0 {
        String::new()
    } else if ratio < 2.0 {
        format!("{:.2}x", ratio)
    } else {
        format!("{}x", ratio.round() as u64)
    }
}

/// Comparison annotation for one cell of a result table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Annotation {
    pub fastest: bool,
    pub ratio: Option<f64>,
}

impl Annotation {
    pub fn label(&self) -> String {
        self.ratio.map(format_ratio).unwrap_or_default()
    }
}

pub fn annotate(
    history: &[ResultRecord],
    record: &ResultRecord,
    suite: &str,
    function: FunctionId,
) -> Annotation {
    Annotation {
        fastest: is_fastest(record, suite, function),
        ratio: speedup_ratio(history, record, suite, function),
    }
}
