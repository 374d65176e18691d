//! Bill Allocation - Per-Family Ledger Rows
//!
//! This crate splits the charges of one extracted bill across the families
//! sharing the account and produces one ledger row per category.
//!
//! # Rules
//!
//! - **A, Voice**: per-line rate over billable lines only
//! - **B, Wearables** and **C, Connected**: plan fee passed through per device
//! - **D, Equipment**: net device amount to the device's owner
//! - **E, Netflix**: split by adults
//! - **F, Usage**: charged to the line's owner
//!
//! Shares are computed at full precision and rounded only when a row is
//! produced. Rounding drift is moved onto the largest shares so every row
//! adds up to its rounded category total.
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_allocation::Allocator;
//!
//! let allocation = Allocator::new(&config).allocate(&totals)?;
//! for row in &allocation.rows {
//!     println!("{}: {}", row.description, row.amount);
//! }
//! ```

pub mod allocator;
pub mod category;
pub mod error;
pub mod family;
pub mod ledger_row;
pub mod reconcile;
pub mod rules;
pub mod validation;

pub use allocator::{Allocation, Allocator};
pub use category::Category;
pub use error::AllocationError;
pub use family::{Device, DeviceKind, Family, FamilyConfig, PlanSplit, SplitStrategy};
pub use ledger_row::LedgerRow;
pub use reconcile::{reconcile, Reconciled};
pub use rules::CategoryShares;
pub use validation::validate_total_due;
