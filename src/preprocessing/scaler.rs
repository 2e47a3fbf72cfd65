//! Standard scaling: (x - mean) / std with the population standard deviation

use super::config::ConstantColumnPolicy;
use super::stats;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Parameters fitted for one column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: f64,
    /// Population standard deviation (denominator N)
    pub std: f64,
}

impl ScalerParams {
    /// Zero variance, so the column cannot be divided by its std
    pub fn is_constant(&self) -> bool {
        self.std == 0.0
    }
}

/// Standard scaler fitted once per cleaning call
#[derive(Debug, Clone)]
pub struct StandardScaler {
    policy: ConstantColumnPolicy,
    params: Vec<(String, ScalerParams)>,
}

impl StandardScaler {
    /// Create an unfitted scaler
    pub fn new(policy: ConstantColumnPolicy) -> Self {
        Self {
            policy,
            params: Vec::new(),
        }
    }

    /// Fit the scaler to the given columns.
    ///
    /// Columns without present values are left out of the fitted set. Under
    /// `ConstantColumnPolicy::Fail` the first zero-variance column in column
    /// order is reported.
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str], parallel: bool) -> Result<&mut Self> {
        let fit_one = |name: &&str| -> Result<Option<(String, ScalerParams)>> {
            let series = df
                .column(name)
                .map_err(|_| PrepError::FeatureNotFound(name.to_string()))?
                .as_materialized_series();
            Ok(Self::compute_params(series)?.map(|p| (name.to_string(), p)))
        };

        let fitted: Vec<Result<Option<(String, ScalerParams)>>> = if parallel {
            columns.par_iter().map(fit_one).collect()
        } else {
            columns.iter().map(fit_one).collect()
        };

        let mut params = Vec::with_capacity(fitted.len());
        for entry in fitted {
            let Some((name, p)) = entry? else { continue };
            if p.is_constant() && self.policy == ConstantColumnPolicy::Fail {
                return Err(PrepError::DegenerateVariance { column: name });
            }
            params.push((name, p));
        }

        self.params = params;
        Ok(self)
    }

    /// Scale every fitted column of the frame in place.
    /// All replacement columns are built before any is written back.
    pub fn transform(&self, df: &mut DataFrame, parallel: bool) -> Result<()> {
        let frame: &DataFrame = df;
        let scale_one = |(name, params): &(String, ScalerParams)| -> Result<Series> {
            let series = frame
                .column(name)
                .map_err(|_| PrepError::FeatureNotFound(name.clone()))?
                .as_materialized_series();
            Self::scale_series(series, params)
        };

        let replacements: Vec<Series> = if parallel {
            self.params.par_iter().map(scale_one).collect::<Vec<_>>()
        } else {
            self.params.iter().map(scale_one).collect::<Vec<_>>()
        }
        .into_iter()
        .collect::<Result<_>>()?;

        for scaled in replacements {
            df.with_column(scaled)?;
        }

        Ok(())
    }

    /// Fitted parameters in column order
    pub fn params(&self) -> &[(String, ScalerParams)] {
        &self.params
    }

    /// Parameters for one column
    pub fn get(&self, column: &str) -> Option<&ScalerParams> {
        self.params
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, p)| p)
    }

    fn compute_params(series: &Series) -> Result<Option<ScalerParams>> {
        let ca = series
            .f64()
            .map_err(|e| PrepError::DataError(e.to_string()))?;

        let present = stats::present_values(ca);
        let (Some(mean), Some(std)) = (stats::mean(&present), stats::population_std(&present)) else {
            return Ok(None);
        };

        let name = series.name().as_str();
        Ok(Some(ScalerParams {
            mean: stats::check_finite(name, "mean", mean)?,
            std: stats::check_finite(name, "standard deviation", std)?,
        }))
    }

    fn scale_series(series: &Series, params: &ScalerParams) -> Result<Series> {
        let ca = series
            .f64()
            .map_err(|e| PrepError::DataError(e.to_string()))?;

        let scaled: Float64Chunked = if params.is_constant() {
            ca.into_iter().map(|opt| opt.map(|_| 0.0)).collect()
        } else {
            ca.into_iter()
                .map(|opt| opt.map(|v| (v - params.mean) / params.std))
                .collect()
        };

        Ok(scaled.with_name(series.name().clone()).into_series())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_values(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name).unwrap().f64().unwrap().into_iter().flatten().collect()
    }

    #[test]
    fn test_standard_scaler() {
        let mut df = DataFrame::new(vec![
            Series::new("a".into(), &[1.0, 2.0, 3.0, 4.0, 5.0]).into(),
        ])
        .unwrap();

        let mut scaler = StandardScaler::new(ConstantColumnPolicy::Zero);
        scaler.fit(&df, &["a"], false).unwrap();
        scaler.transform(&mut df, false).unwrap();

        let values = column_values(&df, "a");
        assert!(stats::mean(&values).unwrap().abs() < 1e-10);
        assert!((stats::population_std(&values).unwrap() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_population_denominator() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).into(),
        ])
        .unwrap();

        let mut scaler = StandardScaler::new(ConstantColumnPolicy::Zero);
        scaler.fit(&df, &["a"], false).unwrap();

        let params = scaler.get("a").unwrap();
        assert!((params.mean - 5.0).abs() < 1e-12);
        assert!((params.std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_column_zero_policy() {
        let mut df = DataFrame::new(vec![
            Series::new("c".into(), &[0.1, 0.1, 0.1]).into(),
        ])
        .unwrap();

        let mut scaler = StandardScaler::new(ConstantColumnPolicy::Zero);
        scaler.fit(&df, &["c"], false).unwrap();
        assert!(scaler.get("c").unwrap().is_constant());

        scaler.transform(&mut df, false).unwrap();
        assert_eq!(column_values(&df, "c"), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_constant_column_fail_policy() {
        let df = DataFrame::new(vec![
            Series::new("ok".into(), &[1.0, 2.0, 3.0]).into(),
            Series::new("c".into(), &[5.0, 5.0, 5.0]).into(),
        ])
        .unwrap();

        let mut scaler = StandardScaler::new(ConstantColumnPolicy::Fail);
        let err = scaler.fit(&df, &["ok", "c"], true).unwrap_err();
        assert!(matches!(err, PrepError::DegenerateVariance { column } if column == "c"));
    }

    #[test]
    fn test_overflowing_std_rejected() {
        // Finite mean of 0, but the squared deviations exceed f64::MAX
        let df = DataFrame::new(vec![
            Series::new("wide".into(), &[1e200, -1e200]).into(),
        ])
        .unwrap();

        let mut scaler = StandardScaler::new(ConstantColumnPolicy::Zero);
        let err = scaler.fit(&df, &["wide"], false).unwrap_err();
        assert!(matches!(
            err,
            PrepError::NonFiniteColumn { ref column, statistic: "standard deviation" } if column == "wide"
        ));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let df = DataFrame::new(vec![
            Series::new("a".into(), &[1.0, 5.0, 2.5, 9.0]).into(),
            Series::new("b".into(), &[10.0, -3.0, 4.0, 0.5]).into(),
        ])
        .unwrap();

        let mut seq = df.clone();
        let mut par = df.clone();

        let mut scaler = StandardScaler::new(ConstantColumnPolicy::Zero);
        scaler.fit(&df, &["a", "b"], false).unwrap();
        scaler.transform(&mut seq, false).unwrap();

        let mut scaler = StandardScaler::new(ConstantColumnPolicy::Zero);
        scaler.fit(&df, &["a", "b"], true).unwrap();
        scaler.transform(&mut par, true).unwrap();

        assert!(seq.equals(&par));
    }

    #[test]
    fn test_missing_column() {
        let df = DataFrame::new(vec![Series::new("a".into(), &[1.0, 2.0]).into()]).unwrap();
        let mut scaler = StandardScaler::new(ConstantColumnPolicy::Zero);
        let err = scaler.fit(&df, &["nope"], false).unwrap_err();
        assert!(matches!(err, PrepError::FeatureNotFound(_)));
    }
}
