//! Untimed cross-suite correctness check

use tracing::info;

use super::runner::validate_suites;
use crate::core::config::validate_input;
use crate::core::error::{BenchError, BenchResult};
use crate::suite::{FunctionId, Suite};

/// Call every function of every suite once with `input` and require one
/// common result. Returns the agreed value.
///
/// The reference is the first suite's `loop` result.
pub fn verify_agreement(input: u32, suites: &[Suite]) -> BenchResult<u64> {
    validate_input(input)?;
    validate_suites(suites)?;

    let mut expected: Option<u64> = None;
    for suite in suites {
        for function in FunctionId::ALL {
            let f = suite.function(function).ok_or_else(|| {
                BenchError::config(format!("suite '{}' has no '{}'", suite.name(), function))
            })?;
            let actual = f(input).map_err(|source| BenchError::Invocation {
                suite: suite.name().to_string(),
                function,
                run_index: 0,
                source,
            })?;

            match expected {
                None => expected = Some(actual),
                Some(want) if want != actual => {
                    return Err(BenchError::Mismatch {
                        suite: suite.name().to_string(),
                        function,
                        expected: want,
                        actual,
                    });
                }
                Some(_) => {}
            }
        }
    }

    let value = expected.ok_or_else(|| BenchError::config("no functions to verify"))?;
    info!("All suites agree: fib({}) = {}", input, value);
    Ok(value)
}
