//! Fibonacci Bench
//!
//! A comparative micro-benchmark harness: several interchangeable suites
//! implement the same named operations, every function of every suite is
//! timed once per run, and each run yields a record from which the fastest
//! suite and its speed-up can be derived.
//!
//! ## Components
//!
//! - **Suites**: a name plus one callable per [`FunctionId`]. Native Rust
//!   implementations are always available; compiled WebAssembly modules are
//!   loaded asynchronously by [`wasm::load_module`].
//! - **Timed invoker**: calls one function once under a monotonic clock.
//! - **Runner**: executes the run × suite × function matrix sequentially and
//!   returns complete records or the first error.
//! - **Comparison**: fastest suites per record and the cross-run speed-up.
//!
//! ## Example
//!
//! ```no_run
//! use fibonacci_bench::{native_suite, BenchmarkRunner};
//!
//! let runner = BenchmarkRunner::new(25, 10)?;
//! let report = runner.run_report(&[native_suite()])?;
//! println!("{}", fibonacci_bench::monitor::render_table(&report));
//! # Ok::<(), fibonacci_bench::BenchError>(())
//! ```

pub mod bench;
pub mod core;
pub mod monitor;
pub mod suite;
pub mod wasm;

// Re-exports
pub use bench::{
    run_detached, verify_agreement, Annotation, BenchmarkReport, BenchmarkRunner, ResultRecord,
    Timing,
};
pub use crate::core::config::BenchConfig;
pub use crate::core::error::{BenchError, BenchResult, InvocationError};
pub use suite::{native_suite, FunctionId, Suite};
pub use wasm::{load_module, LoadedModule, ModuleSource};
