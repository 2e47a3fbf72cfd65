//! Four-stage cleaning pipeline

use crate::error::{PrepError, Result};
use super::{
    classify_columns,
    config::{AllMissingPolicy, CleaningConfig},
    imputer::{impute_mean, impute_mode},
    outlier::{replace_outliers, OutlierReplacement},
    report::{CategoricalColumnReport, CleaningReport, NumericColumnReport},
    scaler::StandardScaler,
    ColumnType,
};
use polars::prelude::*;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Table cleaner.
///
/// Runs, in this order and over whole columns:
/// 1. numeric imputation with the mean of the original present values
/// 2. outlier replacement with Tukey fences, using the post-imputation mean
/// 3. standard scaling with the population standard deviation
/// 4. categorical imputation with the mode of the original values
///
/// Statistics are recomputed on every call and nothing carries over between calls.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    config: CleaningConfig,
}

impl Preprocessor {
    /// Create a preprocessor with the default configuration
    pub fn new() -> Self {
        Self::with_config(CleaningConfig::default())
    }

    /// Create a preprocessor with a custom configuration
    pub fn with_config(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean the table and hand it back
    pub fn process(&self, mut df: DataFrame) -> Result<DataFrame> {
        self.process_in_place(&mut df)?;
        Ok(df)
    }

    /// Clean the table in place and return the statistics of this call.
    ///
    /// The stages run on a working copy that replaces `df` only once all four
    /// succeed. On error `df` is left exactly as it was passed in.
    pub fn process_in_place(&self, df: &mut DataFrame) -> Result<CleaningReport> {
        let start = Instant::now();

        let schema = classify_columns(df)?;
        let numeric: Vec<&str> = schema
            .iter()
            .filter(|c| c.kind == ColumnType::Numeric)
            .map(|c| c.name.as_str())
            .collect();
        let categorical: Vec<&str> = schema
            .iter()
            .filter(|c| c.kind == ColumnType::Categorical)
            .map(|c| c.name.as_str())
            .collect();

        let mut report = CleaningReport {
            rows: df.height(),
            numeric: numeric.iter().map(|&n| NumericColumnReport::new(n)).collect(),
            categorical: categorical.iter().map(|&n| CategoricalColumnReport::new(n)).collect(),
            elapsed_secs: 0.0,
        };

        let mut work = Self::cast_numeric_to_f64(df, &numeric)?;

        if work.height() == 0 {
            debug!("Empty table, nothing to clean");
            *df = work;
            return Ok(report);
        }

        debug!(columns = numeric.len(), "Stage 1: numeric imputation");
        let active = self.impute_numeric(&mut work, &numeric, &mut report.numeric)?;

        debug!(columns = active.len(), "Stage 2: outlier replacement");
        self.handle_outliers(&mut work, &active, &mut report.numeric)?;

        debug!(columns = active.len(), "Stage 3: standard scaling");
        self.scale(&mut work, &active, &mut report.numeric)?;

        debug!(columns = categorical.len(), "Stage 4: categorical imputation");
        self.impute_categorical(&mut work, &categorical, &mut report.categorical)?;

        *df = work;
        report.elapsed_secs = start.elapsed().as_secs_f64();

        info!(
            rows = report.rows,
            numeric = report.numeric.len(),
            categorical = report.categorical.len(),
            missing_filled = report.total_missing_filled(),
            outliers_replaced = report.total_outliers_replaced(),
            elapsed_secs = report.elapsed_secs,
            "Table cleaned"
        );

        Ok(report)
    }

    /// Cast numeric columns to Float64 so they can hold means and z-scores
    fn cast_numeric_to_f64(df: &DataFrame, numeric: &[&str]) -> Result<DataFrame> {
        let mut result = df.clone();
        for name in numeric {
            let col = df
                .column(name)
                .map_err(|_| PrepError::FeatureNotFound(name.to_string()))?;
            if col.dtype() != &DataType::Float64 {
                let casted = col.cast(&DataType::Float64)?;
                result.with_column(casted)?;
            }
        }
        Ok(result)
    }

    /// Apply `f` to each named column, in parallel when asked.
    /// Results keep column order and the first error in column order wins.
    fn map_columns<T, F>(df: &DataFrame, columns: &[&str], parallel: bool, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(&Series) -> Result<T> + Sync + Send,
    {
        let run = |name: &&str| -> Result<T> {
            let series = df
                .column(name)
                .map_err(|_| PrepError::FeatureNotFound(name.to_string()))?
                .as_materialized_series();
            f(series)
        };

        let results: Vec<Result<T>> = if parallel {
            columns.par_iter().map(run).collect()
        } else {
            columns.iter().map(run).collect()
        };

        results.into_iter().collect()
    }

    fn report_for<'r>(reports: &'r mut [NumericColumnReport], name: &str) -> Option<&'r mut NumericColumnReport> {
        reports.iter_mut().find(|r| r.name == name)
    }

    /// Stage 1. Returns the columns that hold values and continue to stages 2 and 3.
    fn impute_numeric<'a>(
        &self,
        df: &mut DataFrame,
        numeric: &[&'a str],
        reports: &mut [NumericColumnReport],
    ) -> Result<Vec<&'a str>> {
        let imputed = Self::map_columns(df, numeric, false, impute_mean)?;

        let mut active = Vec::with_capacity(numeric.len());
        for (&name, result) in numeric.iter().zip(imputed) {
            let Some(mean) = result.fill_value else {
                match self.config.all_missing {
                    AllMissingPolicy::Fail => {
                        return Err(PrepError::AllMissingColumn {
                            column: name.to_string(),
                            kind: ColumnType::Numeric,
                        });
                    }
                    AllMissingPolicy::Skip => {
                        warn!(column = name, "Numeric column has no values, skipping");
                        if let Some(r) = Self::report_for(reports, name) {
                            r.skipped = true;
                        }
                        let height = df.height();
                        df.with_column(Series::full_null(name.into(), height, &DataType::Float64))?;
                        continue;
                    }
                }
            };

            if let Some(r) = Self::report_for(reports, name) {
                r.impute_mean = Some(mean);
                r.missing_filled = result.filled;
            }
            if result.filled > 0 {
                df.with_column(result.series)?;
            }
            active.push(name);
        }

        Ok(active)
    }

    /// Stage 2
    fn handle_outliers(
        &self,
        df: &mut DataFrame,
        active: &[&str],
        reports: &mut [NumericColumnReport],
    ) -> Result<()> {
        let replaced: Vec<OutlierReplacement> =
            Self::map_columns(df, active, self.config.parallel, replace_outliers)?;

        for (&name, result) in active.iter().zip(replaced) {
            if let (Some(r), Some(bounds)) = (Self::report_for(reports, name), result.bounds) {
                r.q1 = Some(bounds.q1);
                r.q3 = Some(bounds.q3);
                r.lower = Some(bounds.lower);
                r.upper = Some(bounds.upper);
                r.outlier_mean = Some(bounds.mean);
                r.outliers_replaced = result.replaced;
            }
            if result.replaced > 0 {
                df.with_column(result.series)?;
            }
        }

        Ok(())
    }

    /// Stage 3
    fn scale(
        &self,
        df: &mut DataFrame,
        active: &[&str],
        reports: &mut [NumericColumnReport],
    ) -> Result<()> {
        let mut scaler = StandardScaler::new(self.config.constant_column);
        scaler.fit(df, active, self.config.parallel)?;

        for (name, params) in scaler.params() {
            if params.is_constant() {
                warn!(column = %name, "Constant numeric column, scaled values set to 0");
            }
            if let Some(r) = Self::report_for(reports, name) {
                r.scale_mean = Some(params.mean);
                r.scale_std = Some(params.std);
                r.constant = params.is_constant();
            }
        }

        scaler.transform(df, self.config.parallel)
    }

    /// Stage 4
    fn impute_categorical(
        &self,
        df: &mut DataFrame,
        categorical: &[&str],
        reports: &mut [CategoricalColumnReport],
    ) -> Result<()> {
        let imputed = Self::map_columns(df, categorical, false, impute_mode)?;

        for ((&name, result), r) in categorical.iter().zip(imputed).zip(reports.iter_mut()) {
            let Some(mode) = result.fill_value else {
                match self.config.all_missing {
                    AllMissingPolicy::Fail => {
                        return Err(PrepError::AllMissingColumn {
                            column: name.to_string(),
                            kind: ColumnType::Categorical,
                        });
                    }
                    AllMissingPolicy::Skip => {
                        warn!(column = name, "Categorical column has no values, skipping");
                        r.skipped = true;
                        continue;
                    }
                }
            };

            r.mode = Some(mode);
            r.missing_filled = result.filled;
            if result.filled > 0 {
                df.with_column(result.series)?;
            }
        }

        Ok(())
    }
}
