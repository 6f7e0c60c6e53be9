//! Error types for the feedback service
//!
//! This module provides error handling using thiserror for structured error
//! definitions; the binary propagates with anyhow.

use thiserror::Error;

/// Main error type for feedback operations
#[derive(Error, Debug)]
pub enum AvaliacaoError {
    /// Submitted feedback failed presence or range checks
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Could not obtain or use a pooled connection
    #[error("Connection pool error: {0}")]
    Pool(String),

    /// Spreadsheet rendering failed
    #[error("Export error: {0}")]
    Export(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl AvaliacaoError {
    /// True for errors caused by client input rather than the server
    pub fn is_validation(&self) -> bool {
        matches!(self, AvaliacaoError::Validation(_))
    }
}

/// Result type alias for feedback operations
pub type Result<T> = std::result::Result<T, AvaliacaoError>;

impl From<rusqlite::Error> for AvaliacaoError {
    fn from(err: rusqlite::Error) -> Self {
        AvaliacaoError::Database(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AvaliacaoError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AvaliacaoError::Export(err.to_string())
    }
}

/// Convert anyhow::Error to AvaliacaoError
impl From<anyhow::Error> for AvaliacaoError {
    fn from(err: anyhow::Error) -> Self {
        AvaliacaoError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AvaliacaoError::Validation("rating must be between 1 and 5".to_string());
        assert_eq!(
            err.to_string(),
            "Validation error: rating must be between 1 and 5"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_error_conversion() {
        let sqlite_err = rusqlite::Error::QueryReturnedNoRows;
        let err: AvaliacaoError = sqlite_err.into();
        assert!(matches!(err, AvaliacaoError::Database(_)));
        assert!(!err.is_validation());
    }
}
