//! Column reductions shared by the cleaning stages
//!
//! Every function here is a pure reduction over one column snapshot. Callers
//! collect the present values first; a numeric cell is absent when it is null
//! or NaN.

use crate::error::{PrepError, Result};
use ndarray::ArrayView1;
use polars::prelude::*;
use std::collections::HashMap;

/// Collect the present (non-null, non-NaN) values of a float column
pub fn present_values(ca: &Float64Chunked) -> Vec<f64> {
    ca.into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .collect()
}

/// Whether a numeric cell counts as missing
#[inline]
pub fn is_missing(value: Option<f64>) -> bool {
    value.map_or(true, f64::is_nan)
}

/// Arithmetic mean, `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    ArrayView1::from(values).mean()
}

/// Population standard deviation (denominator N), `None` for an empty slice
pub fn population_std(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(ArrayView1::from(values).std(0.0))
}

/// Pass a fitted statistic through, rejecting infinities and NaN
pub fn check_finite(column: &str, statistic: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(PrepError::NonFiniteColumn {
            column: column.to_string(),
            statistic,
        })
    }
}

/// Most frequent value.
///
/// Ties go to the value whose running count reaches the maximum first when
/// scanning in column order.
pub fn mode<'a>(values: &[&'a str]) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::with_capacity(values.len());
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let max = counts.values().copied().max()?;

    let mut running: HashMap<&str, usize> = HashMap::with_capacity(counts.len());
    for &v in values {
        let count = running.entry(v).or_insert(0);
        *count += 1;
        if *count == max {
            return Some(v);
        }
    }

    None
}
