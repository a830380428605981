//! Dataset loading error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a state's dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// No backing file exists for the requested state code
    #[error("No dataset for state {state}: file not found: {path:?}")]
    NotFound { state: String, path: PathBuf },

    /// The backing file exists but could not be read
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV structure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Header row is missing a required column or has the wrong temporal column
    #[error("Schema error: {0}")]
    Schema(String),

    /// A cell could not be parsed into its column type
    #[error("Line {line}: cannot parse {column} value {value:?}")]
    Parse {
        line: u64,
        column: &'static str,
        value: String,
    },
}

impl DatasetError {
    pub(crate) fn from_io(state: &str, path: PathBuf, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            DatasetError::NotFound {
                state: state.to_string(),
                path,
            }
        } else {
            DatasetError::Io { path, source: err }
        }
    }
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
