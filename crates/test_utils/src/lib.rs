//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! family ledger test suite.
//!
//! # Modules
//!
//! - `fixtures`: A sample carrier bill and the family configuration it belongs to
//! - `builders`: Builders for synthetic bill text, family configs and bill totals
//! - `assertions`: Custom assertion helpers for ledger rows and warnings
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;
