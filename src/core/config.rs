//! Configuration for the benchmark harness

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::{BenchError, BenchResult};

/// Largest Fibonacci index whose value fits in a `u64`
pub const MAX_INPUT: u32 = 93;

/// Main harness configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Fibonacci index passed to every function
    pub input: u32,

    /// Number of timed passes over all suites
    pub runs: usize,

    /// Compiled module to benchmark next to the native suite (path or URL)
    pub module: Option<String>,

    /// Check that all suites agree on results before timing
    pub verify: bool,

    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            input: 25,
            runs: 10,
            module: None,
            verify: true,
            log_level: "info".into(),
        }
    }
}

impl BenchConfig {
    /// Load config from TOML file
    pub fn load(path: &Path) -> BenchResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| BenchError::ConfigFile(e.to_string()))?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save(&self, path: &Path) -> BenchResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| BenchError::ConfigFile(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// `<config dir>/fibonacci-bench/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("fibonacci-bench").join("config.toml"))
    }

    /// Load from `path`, falling back to the default location, then to defaults
    pub fn load_or_default(path: Option<&Path>) -> BenchResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(p) if p.exists() => Self::load(&p),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> BenchResult<()> {
        validate_input(self.input)?;
        validate_runs(self.runs)
    }
}

pub fn validate_input(input: u32) -> BenchResult<()> {
    if input == 0 || input > MAX_INPUT {
        return Err(BenchError::config(format!(
            "input must be between 1 and {}, got {}",
            MAX_INPUT, input
        )));
    }
    Ok(())
}

pub fn validate_runs(runs: usize) -> BenchResult<()> {
    if runs == 0 {
        return Err(BenchError::config("runs must be at least 1"));
    }
    Ok(())
}
