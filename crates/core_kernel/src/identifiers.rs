//! Strongly-typed identifiers for billing entities
//!
//! Using newtype wrappers around strings provides type safety and prevents
//! accidental mixing of phone numbers, device identifiers and family codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while parsing an identifier
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    #[error("Empty {0} identifier")]
    Empty(&'static str),
}

macro_rules! define_id {
    ($name:ident, $kind:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns the kind of entity this identifier names
            pub fn kind() -> &'static str {
                $kind
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }
    };
}

define_id!(FamilyId, "family");
define_id!(DeviceId, "device");
define_id!(PhoneNumber, "phone");

impl FamilyId {
    /// Creates a family code, normalized to upper case
    pub fn new(code: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Err(IdentifierError::Empty(Self::kind()));
        }
        Ok(Self(code.to_uppercase()))
    }
}

impl FromStr for FamilyId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl PhoneNumber {
    /// Parses a North American phone number in any common rendering
    ///
    /// `(410) 227-2625`, `410-227-2625`, `+1 410 227 2625` and `4102272625`
    /// all normalize to the ten digits `4102272625`.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        let digits = match digits.len() {
            10 => digits,
            11 if digits.starts_with('1') => digits[1..].to_string(),
            _ => return Err(IdentifierError::InvalidPhoneNumber(raw.to_string())),
        };
        Ok(Self(digits))
    }

    /// Builds a number from the three captured groups of a bill rendering
    pub fn from_parts(area: &str, exchange: &str, line: &str) -> Result<Self, IdentifierError> {
        Self::parse(&format!("{area}{exchange}{line}"))
    }

    /// Renders the number the way the bill prints it
    pub fn formatted(&self) -> String {
        format!("({}) {}-{}", &self.0[..3], &self.0[3..6], &self.0[6..])
    }

    /// Last four digits, used in human-readable descriptions
    pub fn last_four(&self) -> &str {
        &self.0[6..]
    }
}

impl FromStr for PhoneNumber {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl DeviceId {
    /// Creates a device identifier from free text
    pub fn new(raw: impl AsRef<str>) -> Result<Self, IdentifierError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            return Err(IdentifierError::Empty(Self::kind()));
        }
        match PhoneNumber::parse(raw) {
            Ok(phone) => Ok(Self::from(phone)),
            Err(_) => Ok(Self(raw.to_string())),
        }
    }
}

impl FromStr for DeviceId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Devices on the bill are identified by the number of the line they sit on
impl From<PhoneNumber> for DeviceId {
    fn from(phone: PhoneNumber) -> Self {
        Self(phone.0)
    }
}

impl From<&PhoneNumber> for DeviceId {
    fn from(phone: &PhoneNumber) -> Self {
        Self(phone.0.clone())
    }
}
