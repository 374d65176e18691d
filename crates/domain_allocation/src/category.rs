//! Allocation categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// One allocated charge category of the bill
///
/// The declaration order is the order rows are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Rule A: voice plan split per billable line
    Voice,
    /// Rule B: wearable plan, pass-through per device
    Wearable,
    /// Rule C: connected device plan, pass-through per device
    Connected,
    /// Rule D: net equipment charge per device
    Equipment,
    /// Rule E: Netflix split by adults
    Netflix,
    /// Rule F: usage charged to the line's owner
    Usage,
}

impl Category {
    /// Every category, in row order
    pub const ALL: [Category; 6] = [
        Category::Voice,
        Category::Wearable,
        Category::Connected,
        Category::Equipment,
        Category::Netflix,
        Category::Usage,
    ];

    /// Row description prefix
    pub fn label(&self) -> &'static str {
        match self {
            Category::Voice => "Voice Plan",
            Category::Wearable => "Wearable Plan",
            Category::Connected => "Connected Plan",
            Category::Equipment => "Equipment",
            Category::Netflix => "Netflix",
            Category::Usage => "Usage",
        }
    }

    /// Ledger column value
    pub fn ledger_category(&self) -> &'static str {
        match self {
            Category::Voice | Category::Wearable | Category::Connected | Category::Netflix => {
                "service"
            }
            Category::Equipment => "equipment",
            Category::Usage => "misc",
        }
    }

    /// Parses a ledger description prefix back into a category
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| label.starts_with(c.label()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Voice => "voice",
            Category::Wearable => "wearable",
            Category::Connected => "connected",
            Category::Equipment => "equipment",
            Category::Netflix => "netflix",
            Category::Usage => "usage",
        };
        write!(f, "{name}")
    }
}
