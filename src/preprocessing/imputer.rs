//! Missing value imputation: column mean for numeric data, mode for categorical

use super::stats;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use tracing::debug;

/// Outcome of imputing one column
#[derive(Debug, Clone)]
pub struct Imputed<T> {
    pub series: Series,
    /// `None` when the column had no present values; the series is returned unchanged
    pub fill_value: Option<T>,
    /// Number of cells that were replaced
    pub filled: usize,
}

impl<T> Imputed<T> {
    fn untouched(series: &Series) -> Self {
        Self {
            series: series.clone(),
            fill_value: None,
            filled: 0,
        }
    }
}

/// Replace null and NaN cells of a Float64 series with the mean of its present values
pub fn impute_mean(series: &Series) -> Result<Imputed<f64>> {
    let ca = series
        .f64()
        .map_err(|e| PrepError::DataError(e.to_string()))?;

    let present = stats::present_values(ca);
    let Some(mean) = stats::mean(&present) else {
        return Ok(Imputed::untouched(series));
    };
    let mean = stats::check_finite(series.name().as_str(), "mean", mean)?;

    let missing = ca.len() - present.len();
    if missing == 0 {
        return Ok(Imputed {
            series: series.clone(),
            fill_value: Some(mean),
            filled: 0,
        });
    }

    let filled: Float64Chunked = ca
        .into_iter()
        .map(|opt| if stats::is_missing(opt) { Some(mean) } else { opt })
        .collect();

    debug!(column = %series.name(), mean, filled = missing, "Imputed numeric column");

    Ok(Imputed {
        series: filled.with_name(series.name().clone()).into_series(),
        fill_value: Some(mean),
        filled: missing,
    })
}

/// Replace null cells of a String series with its most frequent value
pub fn impute_mode(series: &Series) -> Result<Imputed<String>> {
    let ca = series
        .str()
        .map_err(|e| PrepError::DataError(e.to_string()))?;

    let present: Vec<&str> = ca.into_iter().flatten().collect();
    let Some(mode) = stats::mode(&present).map(str::to_owned) else {
        return Ok(Imputed::untouched(series));
    };

    let missing = ca.null_count();
    if missing == 0 {
        return Ok(Imputed {
            series: series.clone(),
            fill_value: Some(mode),
            filled: 0,
        });
    }

    let filled: StringChunked = ca
        .into_iter()
        .map(|opt| Some(opt.unwrap_or(mode.as_str())))
        .collect();

    debug!(column = %series.name(), mode = %mode, filled = missing, "Imputed categorical column");

    Ok(Imputed {
        series: filled.with_name(series.name().clone()).into_series(),
        fill_value: Some(mode),
        filled: missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_imputation() {
        let series = Series::new("a".into(), &[Some(1.0), None, Some(3.0), Some(4.0)]);
        let imputed = impute_mean(&series).unwrap();

        let col = imputed.series.f64().unwrap();
        // Mean of [1, 3, 4] = 8/3
        assert!((col.get(1).unwrap() - 8.0 / 3.0).abs() < 1e-12);
        assert_eq!(imputed.filled, 1);
        assert_eq!(imputed.series.name().as_str(), "a");
    }

    #[test]
    fn test_mean_imputation_treats_nan_as_missing() {
        let series = Series::new("a".into(), &[1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0]);
        let imputed = impute_mean(&series).unwrap();

        assert!((imputed.fill_value.unwrap() - 3.6).abs() < 1e-12);
        let col = imputed.series.f64().unwrap();
        assert!((col.get(2).unwrap() - 3.6).abs() < 1e-12);
        assert_eq!(imputed.series.null_count(), 0);
    }

    #[test]
    fn test_mean_imputation_all_missing() {
        let series = Series::new("a".into(), &[None::<f64>, None, None]);
        let imputed = impute_mean(&series).unwrap();

        assert!(imputed.fill_value.is_none());
        assert_eq!(imputed.filled, 0);
        assert_eq!(imputed.series.null_count(), 3);
    }

    #[test]
    fn test_mean_imputation_rejects_infinite_values() {
        let series = Series::new("a".into(), &[1.0, 2.0, f64::INFINITY]);
        assert!(matches!(
            impute_mean(&series),
            Err(PrepError::NonFiniteColumn { statistic: "mean", .. })
        ));
    }

    #[test]
    fn test_mean_imputation_rejects_overflowing_sum() {
        let series = Series::new("a".into(), &[f64::MAX, f64::MAX, 0.0]);
        assert!(matches!(
            impute_mean(&series),
            Err(PrepError::NonFiniteColumn { ref column, .. }) if column == "a"
        ));
    }

    #[test]
    fn test_mean_imputation_rejects_strings() {
        let series = Series::new("s".into(), &["a", "b"]);
        assert!(matches!(impute_mean(&series), Err(PrepError::DataError(_))));
    }

    #[test]
    fn test_mode_imputation() {
        let series = Series::new("c".into(), &[Some("A"), Some("B"), None, Some("A"), Some("B"), Some("C")]);
        let imputed = impute_mode(&series).unwrap();

        assert_eq!(imputed.fill_value.as_deref(), Some("A"));
        assert_eq!(imputed.filled, 1);
        let values: Vec<&str> = imputed.series.str().unwrap().into_iter().flatten().collect();
        assert_eq!(values, vec!["A", "B", "A", "A", "B", "C"]);
    }

    #[test]
    fn test_mode_imputation_is_idempotent() {
        let series = Series::new("c".into(), &[Some("x"), None, Some("y"), Some("x")]);
        let once = impute_mode(&series).unwrap();
        let twice = impute_mode(&once.series).unwrap();

        assert_eq!(twice.filled, 0);
        assert!(once.series.equals_missing(&twice.series));
    }

    #[test]
    fn test_mode_imputation_all_missing() {
        let series = Series::new("c".into(), &[None::<&str>, None]);
        let imputed = impute_mode(&series).unwrap();
        assert!(imputed.fill_value.is_none());
        assert_eq!(imputed.series.null_count(), 2);
    }
}
