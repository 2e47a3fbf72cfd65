//! Error types for the kolosal-prep cleaning pipeline

use thiserror::Error;

use crate::preprocessing::ColumnType;

/// Result type alias for cleaning operations
pub type Result<T> = std::result::Result<T, PrepError>;

/// Main error type for the cleaning pipeline
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Column '{column}' has no non-missing values, {kind:?} fill value is undefined")]
    AllMissingColumn { column: String, kind: ColumnType },

    #[error("Column '{column}' has zero standard deviation and cannot be standardized")]
    DegenerateVariance { column: String },

    #[error("Column '{column}' has a non-finite {statistic}, infinite values or f64 overflow cannot be cleaned")]
    NonFiniteColumn { column: String, statistic: &'static str },

    #[error("Column '{column}' has unsupported dtype {dtype}, expected numeric or string")]
    TypeMismatch { column: String, dtype: String },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        PrepError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        PrepError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PrepError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_all_missing_display() {
        let err = PrepError::AllMissingColumn {
            column: "age".to_string(),
            kind: ColumnType::Numeric,
        };
        assert_eq!(
            err.to_string(),
            "Column 'age' has no non-missing values, Numeric fill value is undefined"
        );
    }

    #[test]
    fn test_non_finite_display() {
        let err = PrepError::NonFiniteColumn {
            column: "x".to_string(),
            statistic: "mean",
        };
        assert_eq!(
            err.to_string(),
            "Column 'x' has a non-finite mean, infinite values or f64 overflow cannot be cleaned"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PrepError = io_err.into();
        assert!(matches!(err, PrepError::IoError(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: PrepError = json_err.into();
        assert!(matches!(err, PrepError::SerializationError(_)));
    }
}
