//! Outlier detection and replacement
//!
//! Uses Tukey fences: values strictly outside
//! `[Q1 - 1.5 * IQR, Q3 + 1.5 * IQR]` are outliers and are replaced by
//! the column mean taken before any replacement. Quartiles use linear
//! interpolation between order statistics.

use super::stats;
use crate::error::{PrepError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tukey fence multiplier
pub const IQR_FACTOR: f64 = 1.5;

/// Fences and substitution value computed from one column snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
    /// Mean of the snapshot, substituted for every outlier
    pub mean: f64,
}

impl OutlierBounds {
    /// Compute bounds from the present values of a column, `None` when empty
    pub fn from_values(values: &[f64]) -> Result<Option<Self>> {
        let ca = Float64Chunked::from_slice(PlSmallStr::EMPTY, values);
        let (Some(q1), Some(q3), Some(mean)) = (
            ca.quantile(0.25, QuantileMethod::Linear)?,
            ca.quantile(0.75, QuantileMethod::Linear)?,
            stats::mean(values),
        ) else {
            return Ok(None);
        };
        let iqr = q3 - q1;

        Ok(Some(Self {
            q1,
            q3,
            lower: q1 - IQR_FACTOR * iqr,
            upper: q3 + IQR_FACTOR * iqr,
            mean,
        }))
    }

    /// Interquartile range
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Whether a value lies strictly outside the fences
    #[inline]
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Outcome of the outlier pass over one column
#[derive(Debug, Clone)]
pub struct OutlierReplacement {
    pub series: Series,
    /// `None` when the column had no present values
    pub bounds: Option<OutlierBounds>,
    pub replaced: usize,
}

/// Flag the cells of a Float64 series that fall outside the bounds.
/// Missing cells are never flagged.
pub fn outlier_mask(series: &Series, bounds: &OutlierBounds) -> Result<Vec<bool>> {
    let ca = series
        .f64()
        .map_err(|e| PrepError::DataError(e.to_string()))?;

    Ok(ca
        .into_iter()
        .map(|opt| opt.is_some_and(|v| bounds.is_outlier(v)))
        .collect())
}

/// Replace the outliers of a Float64 series with its pre-replacement mean
pub fn replace_outliers(series: &Series) -> Result<OutlierReplacement> {
    let ca = series
        .f64()
        .map_err(|e| PrepError::DataError(e.to_string()))?;

    let present = stats::present_values(ca);
    let Some(bounds) = OutlierBounds::from_values(&present)? else {
        return Ok(OutlierReplacement {
            series: series.clone(),
            bounds: None,
            replaced: 0,
        });
    };
    for (statistic, value) in [
        ("lower fence", bounds.lower),
        ("upper fence", bounds.upper),
        ("mean", bounds.mean),
    ] {
        stats::check_finite(series.name().as_str(), statistic, value)?;
    }

    let mask = outlier_mask(series, &bounds)?;
    let replaced = mask.iter().filter(|&&m| m).count();
    if replaced == 0 {
        return Ok(OutlierReplacement {
            series: series.clone(),
            bounds: Some(bounds),
            replaced: 0,
        });
    }

    let transformed: Float64Chunked = ca
        .into_iter()
        .zip(mask)
        .map(|(opt, is_outlier)| if is_outlier { Some(bounds.mean) } else { opt })
        .collect();

    debug!(
        column = %series.name(),
        lower = bounds.lower,
        upper = bounds.upper,
        mean = bounds.mean,
        replaced,
        "Replaced outliers"
    );

    Ok(OutlierReplacement {
        series: transformed.with_name(series.name().clone()).into_series(),
        bounds: Some(bounds),
        replaced,
    })
}
