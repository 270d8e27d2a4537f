//! Benchmark suites
//!
//! A [`Suite`] is a named set of callables, one per [`FunctionId`]. The runner
//! only sees this capability set; whether a callable is native Rust or an
//! export of a compiled module is decided by the provider that built it.

pub mod native;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::error::InvocationError;

pub use native::native_suite;

/// The fixed set of benchmarked operations, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionId {
    Loop,
    Recursive,
    Memoized,
}

impl FunctionId {
    pub const ALL: [FunctionId; 3] = [FunctionId::Loop, FunctionId::Recursive, FunctionId::Memoized];

    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionId::Loop => "loop",
            FunctionId::Recursive => "recursive",
            FunctionId::Memoized => "memoized",
        }
    }

    /// Export names looked up in a compiled module, preferred first
    pub fn export_names(&self) -> [&'static str; 2] {
        match self {
            FunctionId::Loop => ["_fibonacciLoop", "fibonacciLoop"],
            FunctionId::Recursive => ["_fibonacciRec", "fibonacciRec"],
            FunctionId::Memoized => ["_fibonacciMemo", "fibonacciMemo"],
        }
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FunctionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FunctionId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown function '{}'", s))
    }
}

/// One benchmarked callable
pub type SuiteFn = Box<dyn Fn(u32) -> Result<u64, InvocationError> + Send + Sync>;

/// A named implementation set used as one arm of a comparison
pub struct Suite {
    name: String,
    functions: BTreeMap<FunctionId, SuiteFn>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: BTreeMap::new(),
        }
    }

    /// Register an infallible implementation
    pub fn with_function<F>(self, id: FunctionId, f: F) -> Self
    where
        F: Fn(u32) -> u64 + Send + Sync + 'static,
    {
        self.with_fallible(id, move |n| Ok(f(n)))
    }

    /// Register an implementation that may fail when invoked
    pub fn with_fallible<F>(mut self, id: FunctionId, f: F) -> Self
    where
        F: Fn(u32) -> Result<u64, InvocationError> + Send + Sync + 'static,
    {
        self.functions.insert(id, Box::new(f));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function(&self, id: FunctionId) -> Option<&SuiteFn> {
        self.functions.get(&id)
    }

    /// Identifiers from [`FunctionId::ALL`] this suite does not provide
    pub fn missing_functions(&self) -> Vec<FunctionId> {
        FunctionId::ALL
            .into_iter()
            .filter(|id| !self.functions.contains_key(id))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_functions().is_empty()
    }
}

impl fmt::Debug for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Suite")
            .field("name", &self.name)
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_order() {
        let mut ids = vec![FunctionId::Memoized, FunctionId::Loop, FunctionId::Recursive];
        ids.sort();
        assert_eq!(ids, FunctionId::ALL.to_vec());
    }

    #[test]
    fn test_parse_function_id() {
        assert_eq!("loop".parse::<FunctionId>(), Ok(FunctionId::Loop));
        assert_eq!("Memoized".parse::<FunctionId>(), Ok(FunctionId::Memoized));
        assert!("iterative".parse::<FunctionId>().is_err());
    }

    #[test]
    fn test_missing_functions() {
        let suite = Suite::new("partial").with_function(FunctionId::Loop, |n| n as u64);
        assert_eq!(suite.name(), "partial");
        assert!(!suite.is_complete());
        assert_eq!(
            suite.missing_functions(),
            vec![FunctionId::Recursive, FunctionId::Memoized]
        );

        let f = suite.function(FunctionId::Loop).unwrap();
        assert_eq!(f(7).unwrap(), 7);
    }

    #[test]
    fn test_serialized_name() {
        let json = serde_json::to_string(&FunctionId::Recursive).unwrap();
        assert_eq!(json, "\"recursive\"");
    }
}
