//! CSV loading and saving

use crate::error::{PrepError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Markers read as missing in addition to empty fields
const DEFAULT_NULL_MARKERS: [&str; 3] = ["NA", "NaN", "null"];

/// Delimited-text loader
#[derive(Debug, Clone)]
pub struct DataLoader {
    delimiter: u8,
    has_header: bool,
    infer_schema_length: Option<usize>,
    null_markers: Vec<String>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a loader for comma separated files with a header row
    pub fn new() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            infer_schema_length: Some(1000),
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the first row is a header
    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Rows scanned to infer column dtypes, `None` scans the whole file
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Replace the strings read as missing values
    pub fn with_null_markers(mut self, markers: Vec<String>) -> Self {
        self.null_markers = markers;
        self
    }

    /// Load a delimited file. Empty fields and null markers become nulls.
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let null_values = (!self.null_markers.is_empty()).then(|| {
            NullValues::AllColumns(self.null_markers.iter().map(|m| m.as_str().into()).collect())
        });
        let parse_opts = CsvParseOptions::default()
            .with_separator(self.delimiter)
            .with_null_values(null_values);

        let df = CsvReadOptions::default()
            .with_has_header(self.has_header)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| PrepError::DataError(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), rows = df.height(), cols = df.width(), "Loaded CSV");
        Ok(df)
    }

    /// Pick the delimiter from the extension (`.tsv` is tab separated) and load
    pub fn load_auto(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "tsv" => self.clone().with_delimiter(b'\t').load_csv(path),
            "csv" | "txt" | "" => self.load_csv(path),
            other => Err(PrepError::DataError(format!("Unsupported file format: {}", other))),
        }
    }
}

/// Delimited-text writer
pub struct DataSaver;

impl DataSaver {
    /// Save to CSV with a header row
    pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(df)
            .map_err(|e| PrepError::DataError(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), rows = df.height(), "Saved CSV");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_csv_with_missing() {
        let file = write_temp("x,y,c\n1.0,7,A\n2.0,8,B\n,9,\nNaN,10,A\n", ".csv");
        let df = DataLoader::new().load_csv(file.path()).unwrap();

        assert_eq!(df.height(), 4);
        assert_eq!(df.width(), 3);
        assert_eq!(df.column("x").unwrap().null_count(), 2);
        assert_eq!(df.column("c").unwrap().null_count(), 1);
        assert!(df.column("y").unwrap().dtype().is_primitive_numeric());
        assert_eq!(df.column("c").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_load_auto_tsv() {
        let file = write_temp("a\tb\n1\tx\n2\ty\n", ".tsv");
        let df = DataLoader::new().load_auto(file.path()).unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_load_auto_rejects_unknown_extension() {
        let file = write_temp("{}", ".parquet");
        let err = DataLoader::new().load_auto(file.path()).unwrap_err();
        assert!(matches!(err, PrepError::DataError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = DataLoader::new().load_csv("/nonexistent/data.csv").unwrap_err();
        assert!(matches!(err, PrepError::IoError(_)));
    }

    #[test]
    fn test_save_and_reload() {
        let mut df = df!("a" => &[1.5, 2.5], "c" => &["x", "y"]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        DataSaver::save_csv(&mut df, &path).unwrap();
        let reloaded = DataLoader::new().load_csv(&path).unwrap();

        assert!(df.equals(&reloaded));
    }
}
