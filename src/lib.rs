//! kolosal-prep - Tabular data cleaning
//!
//! Cleans an in-memory table (a polars [`DataFrame`](polars::prelude::DataFrame))
//! in four fixed stages:
//! 1. numeric columns: missing cells take the column mean
//! 2. numeric columns: values outside the Tukey fences take the column mean
//! 3. numeric columns: standardized to mean 0, population std 1
//! 4. categorical columns: missing cells take the column mode
//!
//! # Modules
//!
//! - [`preprocessing`] - Column classification, the cleaning stages and the pipeline
//! - [`error`] - Error type shared by the crate
//! - [`utils`] - CSV loading and saving
//! - [`cli`] - Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use kolosal_prep::prelude::*;
//! use polars::prelude::*;
//!
//! # fn main() -> kolosal_prep::Result<()> {
//! let df = df!(
//!     "age" => &[Some(25.0), None, Some(35.0)],
//!     "city" => &[Some("NYC"), Some("LA"), None],
//! )?;
//! let cleaned = Preprocessor::new().process(df)?;
//! assert_eq!(cleaned.height(), 3);
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Cleaning
pub mod preprocessing;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{PrepError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{PrepError, Result};

    // Cleaning
    pub use crate::preprocessing::{
        classify_columns, AllMissingPolicy, CleaningConfig, CleaningReport, ColumnType,
        ConstantColumnPolicy, Preprocessor,
    };

    // IO
    pub use crate::utils::{DataLoader, DataSaver};
}
