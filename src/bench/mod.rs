//! Benchmark engine
//!
//! - [`invoker`]: times a single call
//! - [`runner`]: runs the run × suite × function matrix
//! - [`compare`]: fastest suites and speed-up ratios
//! - [`report`]: run metadata and aggregates
//! - [`verify`]: untimed result agreement check

pub mod compare;
pub mod invoker;
pub mod metrics;
pub mod report;
pub mod runner;
pub mod verify;

pub use compare::{annotate, fastest_suites, format_ratio, speedup_ratio, Annotation};
pub use invoker::{invoke, Timed};
pub use metrics::{ResultRecord, SuiteTimings, Timing};
pub use report::{BenchmarkReport, FunctionSummary};
pub use runner::{run_detached, validate_suites, BenchmarkRunner};
pub use verify::verify_agreement;
