//! Data cleaning module
//!
//! Cleans a table in four fixed stages:
//! - Numeric imputation with the column mean
//! - Outlier replacement using Tukey (IQR) fences
//! - Standard scaling with the population standard deviation
//! - Categorical imputation with the column mode

mod config;
mod imputer;
mod outlier;
mod pipeline;
mod report;
mod scaler;
pub mod stats;

pub use config::{AllMissingPolicy, CleaningConfig, ConstantColumnPolicy};
pub use imputer::{impute_mean, impute_mode, Imputed};
pub use outlier::{outlier_mask, replace_outliers, OutlierBounds, OutlierReplacement, IQR_FACTOR};
pub use pipeline::Preprocessor;
pub use report::{CategoricalColumnReport, CleaningReport, NumericColumnReport};
pub use scaler::{ScalerParams, StandardScaler};

use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column kind used to route a column through the stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    /// Any integer or floating dtype
    Numeric,
    /// String dtype
    Categorical,
}

impl ColumnType {
    /// Classify a polars dtype, `None` when it is neither numeric nor string
    pub fn from_dtype(dtype: &DataType) -> Option<Self> {
        if dtype.is_primitive_numeric() {
            Some(ColumnType::Numeric)
        } else if matches!(dtype, DataType::String) {
            Some(ColumnType::Categorical)
        } else {
            None
        }
    }
}

/// Name and kind of one column, in table order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnType,
}

/// Partition every column of the frame into numeric and categorical.
///
/// Fails with `TypeMismatch` on the first column whose dtype is neither.
pub fn classify_columns(df: &DataFrame) -> Result<Vec<ColumnSchema>> {
    df.get_columns()
        .iter()
        .map(|col| {
            ColumnType::from_dtype(col.dtype())
                .map(|kind| ColumnSchema {
                    name: col.name().to_string(),
                    kind,
                })
                .ok_or_else(|| PrepError::TypeMismatch {
                    column: col.name().to_string(),
                    dtype: col.dtype().to_string(),
                })
        })
        .collect()
}

/// Descriptive statistics for one column, used for reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureStats {
    pub name: String,
    /// `None` for dtypes the cleaner does not accept
    pub kind: Option<ColumnType>,
    pub dtype: String,
    pub count: usize,
    pub null_count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unique_count: Option<usize>,
}

impl FeatureStats {
    fn empty(name: &str, series: &Series) -> Self {
        Self {
            name: name.to_string(),
            kind: ColumnType::from_dtype(series.dtype()),
            dtype: series.dtype().to_string(),
            count: series.len(),
            null_count: series.null_count(),
            mean: None,
            std: None,
            min: None,
            max: None,
            unique_count: None,
        }
    }

    /// Compute statistics from any series. NaN counts as missing in numeric columns.
    pub fn from_series(series: &Series) -> Result<Self> {
        let name = series.name().to_string();
        let mut fs = Self::empty(&name, series);

        match fs.kind {
            Some(ColumnType::Numeric) => {
                let casted = series.cast(&DataType::Float64)?;
                let present = stats::present_values(casted.f64()?);
                fs.null_count = fs.count - present.len();
                fs.mean = stats::mean(&present);
                fs.std = stats::population_std(&present);
                fs.min = present.iter().copied().reduce(f64::min);
                fs.max = present.iter().copied().reduce(f64::max);
            }
            Some(ColumnType::Categorical) => {
                fs.unique_count = Some(series.drop_nulls().n_unique()?);
            }
            None => {}
        }

        Ok(fs)
    }
}

/// Describe every column of the frame in table order
pub fn describe(df: &DataFrame) -> Result<Vec<FeatureStats>> {
    df.get_columns()
        .iter()
        .map(|col| FeatureStats::from_series(col.as_materialized_series()))
        .collect()
}
