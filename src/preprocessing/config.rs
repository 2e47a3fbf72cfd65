//! Cleaning configuration
//!
//! The four stages, their order and the 1.5 fence multiplier are fixed.
//! Configuration only decides how the undefined cases (no values to average,
//! zero variance) are resolved and whether columns run on the rayon pool.

use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do with a column that has no present values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllMissingPolicy {
    /// Abort with `PrepError::AllMissingColumn`
    #[default]
    Fail,
    /// Leave the column all-null, turning NaN cells into nulls, and exclude it
    /// from outlier handling and scaling
    Skip,
}

/// What to do with a numeric column whose standard deviation is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantColumnPolicy {
    /// Every cell becomes 0.0
    #[default]
    Zero,
    /// Abort with `PrepError::DegenerateVariance`
    Fail,
}

/// Configuration for the cleaning pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleaningConfig {
    /// Policy for columns with no present values
    pub all_missing: AllMissingPolicy,

    /// Policy for zero-variance numeric columns
    pub constant_column: ConstantColumnPolicy,

    /// Process independent numeric columns on the rayon pool
    pub parallel: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            all_missing: AllMissingPolicy::Fail,
            constant_column: ConstantColumnPolicy::Zero,
            parallel: true,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the all-missing policy
    pub fn with_all_missing(mut self, policy: AllMissingPolicy) -> Self {
        self.all_missing = policy;
        self
    }

    /// Builder method to set the constant-column policy
    pub fn with_constant_column(mut self, policy: ConstantColumnPolicy) -> Self {
        self.constant_column = policy;
        self
    }

    /// Builder method to toggle column-parallel processing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Load a configuration from a JSON file.
    /// Missing fields take their default values, unknown fields are rejected.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        serde_json::from_str(&raw)
            .map_err(|e| PrepError::ConfigError(format!("{}: {}", path.display(), e)))
    }
}
