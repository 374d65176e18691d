//! Core Kernel - Foundational types for the family mobile ledger
//!
//! This crate provides the building blocks shared by the extraction and
//! allocation engines:
//! - Money with precise decimal arithmetic and cent rounding
//! - Identifiers for phone lines, devices and families
//! - Billing cycle dates
//! - Warnings that must reach the caller without stopping processing

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod warning;

pub use money::{Money, MoneyError, CENT_PLACES};
pub use temporal::{BillingCycle, TemporalError};
pub use identifiers::{DeviceId, FamilyId, IdentifierError, PhoneNumber};
pub use warning::Warning;
