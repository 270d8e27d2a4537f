//! Timed invocation of a single benchmarked function

use std::time::Instant;

use super::metrics::Timing;

/// Result value of one call together with how long it took
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Timing,
}

/// Call `f(input)` exactly once and measure it with a monotonic clock.
///
/// The value is passed through untouched and errors propagate unchanged;
/// a failed call produces no timing.
pub fn invoke<F, T, E>(f: F, input: u32) -> Result<Timed<T>, E>
where
    F: FnOnce(u32) -> Result<T, E>,
{
    let start = Instant::now();
    let value = f(input)?;
    let elapsed = Timing::new(start.elapsed());
    Ok(Timed { value, elapsed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_passes_value_through() {
        let timed = invoke(|n| Ok::<_, ()>(n as u64 * 2), 21).unwrap();
        assert_eq!(timed.value, 42);
        assert!(timed.elapsed.as_millis_f64() >= 0.0);
    }

    #[test]
    fn test_measures_elapsed() {
        let timed = invoke(
            |_| {
                std::thread::sleep(Duration::from_millis(5));
                Ok::<_, ()>(0u64)
            },
            1,
        )
        .unwrap();
        assert!(timed.elapsed.duration() >= Duration::from_millis(5));
    }

    #[test]
    fn test_error_propagates() {
        let mut calls = 0;
        let result = invoke(
            |_| {
                calls += 1;
                Err::<u64, _>("boom")
            },
            3,
        );
        assert_eq!(result, Err("boom"));
        assert_eq!(calls, 1);
    }
}
