//! Plain-text rendering of benchmark reports

use crate::bench::BenchmarkReport;
use crate::suite::FunctionId;

const CELL_WIDTH: usize = 22;

/// One row per run, one column per suite × function.
///
/// Fastest cells are marked with `*` and followed by their speed-up, e.g.
/// `0.412 ms* (3x)`.
pub fn render_table(report: &BenchmarkReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Fibonacci({}) - {} run(s), {} suite(s)\n\n",
        report.input,
        report.runs,
        report.suites.len()
    ));

    let columns: Vec<(&str, FunctionId)> = report
        .suites
        .iter()
        .flat_map(|s| FunctionId::ALL.into_iter().map(move |f| (s.as_str(), f)))
        .collect();

    let header: Vec<String> = columns
        .iter()
        .map(|(suite, f)| format!("{:>width$}", format!("{} {}", suite, f), width = CELL_WIDTH))
        .collect();
    let rule = "-".repeat(5 + columns.len() * (CELL_WIDTH + 3));

    out.push_str(&format!("{:>5} | {}\n", "Run", header.join(" | ")));
    out.push_str(&rule);
    out.push('\n');

    for record in &report.records {
        let cells: Vec<String> = columns
            .iter()
            .map(|(suite, f)| {
                let cell = match report.annotation(record.run_index, suite, *f) {
                    Some(a) => {
                        let ms = record
                            .timing(suite, *f)
                            .map(|t| t.as_millis_f64())
                            .unwrap_or_default();
                        let label = a.label();
                        match (a.fastest, label.is_empty()) {
                            (true, false) => format!("{:.3} ms* ({})", ms, label),
                            (true, true) => format!("{:.3} ms*", ms),
                            (false, _) => format!("{:.3} ms", ms),
                        }
                    }
                    None => "-".to_string(),
                };
                format!("{:>width$}", cell, width = CELL_WIDTH)
            })
            .collect();
        out.push_str(&format!("{:>5} | {}\n", record.run_index + 1, cells.join(" | ")));
    }

    out
}

/// min/mean/max per suite and function, plus the overall winner per function
pub fn render_summary(report: &BenchmarkReport) -> String {
    let mut out = String::new();
    out.push_str("\nSummary (ms)\n");
    out.push_str(&format!(
        "{:<16} {:<10} {:>10} {:>10} {:>10} {:>6}\n",
        "Suite", "Function", "Min", "Mean", "Max", "Wins"
    ));
    for row in report.summary() {
        out.push_str(&format!(
            "{:<16} {:<10} {:>10.3} {:>10.3} {:>10.3} {:>6}\n",
            truncate(&row.suite, 16),
            row.function.as_str(),
            row.min_ms,
            row.mean_ms,
            row.max_ms,
            row.wins
        ));
    }

    out.push('\n');
    for f in FunctionId::ALL {
        if let Some(winner) = report.overall_fastest(f) {
            out.push_str(&format!("Fastest {:<10} {}\n", f.as_str(), winner));
        }
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}
