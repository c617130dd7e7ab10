use std::path::PathBuf;

use thiserror::Error;

/// Failure reading or writing parser data on disk.
///
/// Only the strict loaders and the harvest writer return this; parsing itself
/// never fails.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid parser config {path:?}: {source}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read CSV {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },

    #[error("Failed to write CSV {path:?}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: polars::error::PolarsError,
    },

    #[error("CSV {path:?} has no column '{column}'")]
    MissingColumn { path: PathBuf, column: String },
}
