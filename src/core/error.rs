//! Error types for suite loading and benchmark execution

use thiserror::Error;

use crate::suite::FunctionId;

/// Failure raised by a benchmarked function while it is being invoked.
#[derive(Debug, Clone, Error)]
pub enum InvocationError {
    /// The compiled module trapped
    #[error("trap: {0}")]
    Trap(String),
    /// The result does not fit the host's numeric type
    #[error("result overflow for input {input}")]
    Overflow { input: u32 },
    #[error("{0}")]
    Other(String),
}

/// Top-level error for everything the harness does.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Invalid runs/input or an inconsistent suite set. Raised before any timing.
    #[error("configuration error: {0}")]
    Config(String),

    /// A compiled-module suite could not be built
    #[error("failed to load suite from {source_name}: {reason}")]
    SuiteLoad { source_name: String, reason: String },

    /// A benchmarked function failed; the whole run is aborted
    #[error("{suite}.{function} failed on run {run_index}: {source}")]
    Invocation {
        suite: String,
        function: FunctionId,
        run_index: usize,
        #[source]
        source: InvocationError,
    },

    /// Suites disagree on the value of a function
    #[error("{suite}.{function} returned {actual}, expected {expected}")]
    Mismatch {
        suite: String,
        function: FunctionId,
        expected: u64,
        actual: u64,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file error: {0}")]
    ConfigFile(String),

    /// The background benchmark task panicked or was cancelled
    #[error("benchmark task failed: {0}")]
    Join(String),
}

impl BenchError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        BenchError::Config(msg.into())
    }

    pub fn suite_load<S: Into<String>, R: ToString>(source_name: S, reason: R) -> Self {
        BenchError::SuiteLoad {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// True for errors detected before any function was timed
    pub fn is_config(&self) -> bool {
        matches!(self, BenchError::Config(_) | BenchError::ConfigFile(_))
    }
}

pub type BenchResult<T> = Result<T, BenchError>;
