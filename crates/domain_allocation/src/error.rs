//! Allocation errors

use thiserror::Error;

use core_kernel::Money;

use crate::category::Category;

/// Errors that abort the allocation of a bill
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// A phone number or device on the bill has no owner in the family config
    #[error("Unknown {category} identifier {identifier}. {guidance}")]
    UnknownEntity {
        identifier: String,
        category: Category,
        guidance: String,
    },

    /// A per-unit split would divide a non-zero subtotal by zero
    #[error("Cannot split {subtotal} of {category} charges: no billable units")]
    ZeroDenominator {
        category: Category,
        subtotal: Money,
    },

    /// The family configuration is invalid or unsupported
    #[error("Invalid family configuration: {0}")]
    Configuration(String),
}

impl AllocationError {
    /// Creates an unknown entity error with configuration guidance
    pub fn unknown_entity(identifier: impl Into<String>, category: Category) -> Self {
        let identifier = identifier.into();
        let kind = match category {
            Category::Wearable => "wearable",
            Category::Connected => "connected",
            Category::Voice | Category::Usage => "voice",
            Category::Equipment | Category::Netflix => "voice | wearable | connected",
        };
        let guidance = format!(
            "Add it to the devices of the owning family in family_config.yaml, e.g.\n  \
             - {{ number: \"{identifier}\", kind: {kind} }}"
        );
        AllocationError::UnknownEntity {
            identifier,
            category,
            guidance,
        }
    }

    pub fn zero_denominator(category: Category, subtotal: Money) -> Self {
        AllocationError::ZeroDenominator { category, subtotal }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        AllocationError::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_entity_guidance() {
        let err = AllocationError::unknown_entity("8573403847", Category::Equipment);
        let message = err.to_string();
        assert!(message.contains("8573403847"));
        assert!(message.contains("equipment"));
        assert!(message.contains("number: \"8573403847\""));
    }
}
