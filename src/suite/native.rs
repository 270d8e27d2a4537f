//! Native Rust implementations of the benchmarked operations

use super::{FunctionId, Suite};

pub const NATIVE_SUITE_NAME: &str = "Native";

/// Iterative Fibonacci
pub fn fibonacci_loop(n: u32) -> u64 {
    let (mut a, mut b) = (0u64, 1u64);
    for _ in 0..n {
        let next = a.wrapping_add(b);
        a = b;
        b = next;
    }
    a
}

/// Naive exponential recursion
pub fn fibonacci_rec(n: u32) -> u64 {
    if n < 2 {
        return n as u64;
    }
    fibonacci_rec(n - 1).wrapping_add(fibonacci_rec(n - 2))
}

/// Recursion with a per-call memo table
pub fn fibonacci_memo(n: u32) -> u64 {
    fn go(n: usize, memo: &mut [Option<u64>]) -> u64 {
        if n < 2 {
            return n as u64;
        }
        if let Some(v) = memo[n] {
            return v;
        }
        let v = go(n - 1, memo).wrapping_add(go(n - 2, memo));
        memo[n] = Some(v);
        v
    }

    let mut memo = vec![None; n as usize + 1];
    go(n as usize, &mut memo)
}

/// Suite backed by the functions above
pub fn native_suite() -> Suite {
    Suite::new(NATIVE_SUITE_NAME)
        .with_function(FunctionId::Loop, fibonacci_loop)
        .with_function(FunctionId::Recursive, fibonacci_rec)
        .with_function(FunctionId::Memoized, fibonacci_memo)
}
