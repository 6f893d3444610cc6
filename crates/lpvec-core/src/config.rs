//! Solver settings, built in code or loaded from JSON.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Settings handed to a backend for one solve.
///
/// Unset fields keep the backend's own default. JSON input uses the field
/// names as keys and rejects unknown keys:
///
/// ```
/// use lpvec_core::SolverConfig;
///
/// let config = SolverConfig::from_json_str(r#"{"time_limit": 10.0, "threads": 2}"#).unwrap();
/// assert_eq!(config.threads, Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Wall-clock limit in seconds.
    pub time_limit: Option<f64>,
    /// Relative MIP gap at which branch-and-bound stops.
    pub mip_gap: Option<f64>,
    /// Backend output level; 0 is silent.
    pub verbosity: Option<u32>,
    pub presolve: Option<bool>,
    pub threads: Option<u32>,
    /// Primal and dual feasibility tolerance.
    pub tolerance: Option<f64>,
    /// Echo backend output to the console.
    pub log_to_console: Option<bool>,
}

/// Failure to load a [`SolverConfig`].
#[derive(Debug)]
pub enum ConfigError {
    Read(std::io::Error),
    Parse(serde_json::Error),
    /// A field holds a value no backend accepts.
    OutOfRange { field: &'static str, value: f64 },
}

impl ConfigError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read(_) => "CONFIG_READ",
            ConfigError::Parse(_) => "CONFIG_PARSE",
            ConfigError::OutOfRange { .. } => "CONFIG_OUT_OF_RANGE",
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read(err) => write!(f, "[{}] Cannot read config: {}", self.code(), err),
            ConfigError::Parse(err) => {
                write!(f, "[{}] Invalid solver config: {}", self.code(), err)
            }
            ConfigError::OutOfRange { field, value } => {
                write!(f, "[{}] {} cannot be {}", self.code(), field, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::OutOfRange { .. } => None,
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(ConfigError::Parse)
    }

    /// Fields set in `other` replace those in `self`.
    pub fn overlay(self, other: &SolverConfig) -> Self {
        Self {
            time_limit: other.time_limit.or(self.time_limit),
            mip_gap: other.mip_gap.or(self.mip_gap),
            verbosity: other.verbosity.or(self.verbosity),
            presolve: other.presolve.or(self.presolve),
            threads: other.threads.or(self.threads),
            tolerance: other.tolerance.or(self.tolerance),
            log_to_console: other.log_to_console.or(self.log_to_console),
        }
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    pub fn with_verbosity(mut self, level: u32) -> Self {
        self.verbosity = Some(level);
        self
    }

    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    /// Check that every set numeric field is in range.
    ///
    /// Time limit and MIP gap must be non-negative; the tolerance must be
    /// positive. NaN is rejected everywhere.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("time_limit", self.time_limit, false),
            ("mip_gap", self.mip_gap, false),
            ("tolerance", self.tolerance, true),
        ];
        for (field, value, strictly_positive) in checks {
            let Some(value) = value else { continue };
            let in_range = if strictly_positive {
                value > 0.0
            } else {
                value >= 0.0
            };
            if !in_range {
                return Err(ConfigError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
