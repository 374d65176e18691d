//! Extraction errors
//!
//! Structural failures abort the bill: no partial totals are returned for
//! a bill whose mandatory sections cannot be read.

use thiserror::Error;

/// Errors that can occur while extracting a bill
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// A mandatory section or figure could not be located
    #[error("Missing section: {section}")]
    MissingSection {
        section: String,
    },

    /// A section was found but its amount could not be read
    #[error("Malformed amount in {section}: {text:?}")]
    MalformedAmount {
        section: String,
        text: String,
    },

    /// A date in a section could not be read
    #[error("Malformed date in {section}: {text:?}")]
    MalformedDate {
        section: String,
        text: String,
    },

    /// The document has no pages
    #[error("Bill document has no text")]
    EmptyDocument,
}

impl ExtractionError {
    /// Creates a missing section error
    pub fn missing(section: impl Into<String>) -> Self {
        ExtractionError::MissingSection {
            section: section.into(),
        }
    }

    /// Creates a malformed amount error
    pub fn malformed_amount(section: impl Into<String>, text: impl Into<String>) -> Self {
        ExtractionError::MalformedAmount {
            section: section.into(),
            text: text.into(),
        }
    }

    /// Returns the section the error refers to, if any
    pub fn section(&self) -> Option<&str> {
        match self {
            ExtractionError::MissingSection { section }
            | ExtractionError::MalformedAmount { section, .. }
            | ExtractionError::MalformedDate { section, .. } => Some(section),
            ExtractionError::EmptyDocument => None,
        }
    }
}
