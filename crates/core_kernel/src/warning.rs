//! Non-fatal findings surfaced to the caller
//!
//! Warnings never stop a bill from being processed, but they must always
//! reach the caller. Each one renders as a human-readable line.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifiers::PhoneNumber;
use crate::money::Money;

/// A non-fatal condition found while extracting or allocating a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A derived total disagrees with an authoritative one by more than a cent
    Reconciliation {
        scope: String,
        expected: Money,
        actual: Money,
    },

    /// A voice line is reported on the bill but is not billable
    ExcludedLine {
        phone: PhoneNumber,
        reason: String,
    },

    /// The same authoritative figure appears with different values
    ConflictingTotals {
        label: String,
        values: Vec<Money>,
    },

    /// A section was found without the detail needed for full fidelity
    MissingDetail {
        section: String,
        detail: String,
    },

    /// The bill's reported line count differs from the lines it enumerates
    LineCountMismatch {
        reported: u32,
        enumerated: u32,
    },
}

impl Warning {
    /// Creates a reconciliation warning
    pub fn reconciliation(scope: impl Into<String>, expected: Money, actual: Money) -> Self {
        Warning::Reconciliation {
            scope: scope.into(),
            expected,
            actual,
        }
    }

    /// Creates a missing-detail warning
    pub fn missing_detail(section: impl Into<String>, detail: impl Into<String>) -> Self {
        Warning::MissingDetail {
            section: section.into(),
            detail: detail.into(),
        }
    }

    /// Signed difference `expected - actual` for reconciliation warnings
    pub fn delta(&self) -> Option<Money> {
        match self {
            Warning::Reconciliation { expected, actual, .. } => Some(*expected - *actual),
            _ => None,
        }
    }

    /// Returns true for reconciliation mismatches
    pub fn is_reconciliation(&self) -> bool {
        matches!(self, Warning::Reconciliation { .. })
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::Reconciliation { scope, expected, actual } => {
                let delta = *expected - *actual;
                let sign = if delta.is_negative() { "-" } else { "+" };
                write!(
                    f,
                    "RECONCILIATION MISMATCH ({scope}): expected {expected}, got {actual}, difference {sign}{}",
                    delta.abs()
                )
            }
            Warning::ExcludedLine { phone, reason } => {
                write!(f, "{} - non-billable voice line ({reason})", phone.as_str())
            }
            Warning::ConflictingTotals { label, values } => {
                let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(
                    f,
                    "conflicting {label} figures on the bill: {}; using the first",
                    rendered.join(", ")
                )
            }
            Warning::MissingDetail { section, detail } => {
                write!(f, "{section}: {detail}")
            }
            Warning::LineCountMismatch { reported, enumerated } => {
                write!(
                    f,
                    "bill reports {reported} voice lines but enumerates {enumerated}"
                )
            }
        }
    }
}
