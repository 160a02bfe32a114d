//! Error types for source ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a source file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Required input file is absent. Fatal for the whole run.
    #[error("input file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Malformed CSV content or an I/O failure while reading it.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl IngestError {
    /// True for the missing-input condition that halts a run.
    pub fn is_missing_input(&self) -> bool {
        matches!(self, IngestError::FileNotFound { .. })
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/processed/cleaned_cmu-sleep.csv"),
        };
        assert_eq!(
            err.to_string(),
            "input file not found: /data/processed/cleaned_cmu-sleep.csv"
        );
        assert!(err.is_missing_input());
    }
}
