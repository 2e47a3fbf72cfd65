//! Per-column statistics computed during one cleaning call
//!
//! The report is informational. It is rebuilt on every call and never fed back
//! into the pipeline.

use serde::{Deserialize, Serialize};

/// Statistics for one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericColumnReport {
    pub name: String,
    /// Cells filled during imputation
    pub missing_filled: usize,
    /// Mean of the original present values
    pub impute_mean: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    /// Mean substituted for outliers, taken before any substitution
    pub outlier_mean: Option<f64>,
    pub outliers_replaced: usize,
    pub scale_mean: Option<f64>,
    pub scale_std: Option<f64>,
    /// Zero variance before scaling
    pub constant: bool,
    /// Column had no present values and was left untouched
    pub skipped: bool,
}

impl NumericColumnReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            missing_filled: 0,
            impute_mean: None,
            q1: None,
            q3: None,
            lower: None,
            upper: None,
            outlier_mean: None,
            outliers_replaced: 0,
            scale_mean: None,
            scale_std: None,
            constant: false,
            skipped: false,
        }
    }
}

/// Statistics for one categorical column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalColumnReport {
    pub name: String,
    pub mode: Option<String>,
    pub missing_filled: usize,
    pub skipped: bool,
}

impl CategoricalColumnReport {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mode: None,
            missing_filled: 0,
            skipped: false,
        }
    }
}

/// Summary of one cleaning call, columns in table order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    pub rows: usize,
    pub numeric: Vec<NumericColumnReport>,
    pub categorical: Vec<CategoricalColumnReport>,
    /// Wall time of the call in seconds
    pub elapsed_secs: f64,
}

impl CleaningReport {
    /// Look up a numeric column by name
    pub fn numeric_column(&self, name: &str) -> Option<&NumericColumnReport> {
        self.numeric.iter().find(|c| c.name == name)
    }

    /// Look up a categorical column by name
    pub fn categorical_column(&self, name: &str) -> Option<&CategoricalColumnReport> {
        self.categorical.iter().find(|c| c.name == name)
    }

    pub fn total_missing_filled(&self) -> usize {
        self.numeric.iter().map(|c| c.missing_filled).sum::<usize>()
            + self.categorical.iter().map(|c| c.missing_filled).sum::<usize>()
    }

    pub fn total_outliers_replaced(&self) -> usize {
        self.numeric.iter().map(|c| c.outliers_replaced).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals() {
        let mut a = NumericColumnReport::new("a");
        a.missing_filled = 2;
        a.outliers_replaced = 1;
        let mut c = CategoricalColumnReport::new("c");
        c.missing_filled = 3;

        let report = CleaningReport {
            rows: 10,
            numeric: vec![a],
            categorical: vec![c],
            elapsed_secs: 0.0,
        };

        assert_eq!(report.total_missing_filled(), 5);
        assert_eq!(report.total_outliers_replaced(), 1);
        assert!(report.numeric_column("a").is_some());
        assert!(report.categorical_column("a").is_none());
    }

    #[test]
    fn test_report_serialize() {
        let report = CleaningReport {
            rows: 1,
            ..Default::default()
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"rows\":1"));
    }
}
