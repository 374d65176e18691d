//! Application error handling

use std::path::Path;
use thiserror::Error;

use domain_allocation::AllocationError;
use domain_extraction::ExtractionError;

/// Errors raised around the two engines: files, settings and the ledger
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Family config {path}: {message}")]
    FamilyConfig { path: String, message: String },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error("Ledger error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed ledger {path}: {message}")]
    MalformedLedger { path: String, message: String },

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    pub fn family_config(path: impl Into<String>, message: impl ToString) -> Self {
        Self::FamilyConfig {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn malformed_ledger(path: &Path, message: impl Into<String>) -> Self {
        Self::MalformedLedger {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Whether the error came from reading the bill rather than the setup
    pub fn is_bill_error(&self) -> bool {
        matches!(self, AppError::Extraction(_) | AppError::Allocation(_))
    }
}

/// Convenience alias
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_io_error_names_path() {
        let err = AppError::io(
            &PathBuf::from("bills/march.txt"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert_eq!(err.to_string(), "Cannot read bills/march.txt: no such file");
        assert!(!err.is_bill_error());
    }

    #[test]
    fn test_extraction_error_is_transparent() {
        let err = AppError::from(ExtractionError::missing("voice lines"));
        assert_eq!(err.to_string(), ExtractionError::missing("voice lines").to_string());
        assert!(err.is_bill_error());
    }
}
