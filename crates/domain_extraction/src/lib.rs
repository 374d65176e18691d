//! Bill Extraction - Text to Structured Totals
//!
//! This crate turns the page text of a mobile carrier bill into a
//! `BillTotals` record: plan subtotals, the voice lines with their transfer
//! status, net equipment charges per device, and usage charges per line.
//!
//! # Bill Layout
//!
//! - **Plans banner**: `11 VOICE LINES = $260.00 | 3 WEARABLES = $54.66`
//! - **Bill summary**: one row per line, with its type and plan charge
//! - **Equipment**: per-device paragraphs of installments and credits,
//!   normally on page 3
//! - **Usage**: one-time charges keyed by phone number
//!
//! Labeled figures are matched with whitespace collapsed so that wrapped
//! labels still match. Equipment is read by a line-oriented state machine
//! (see [`equipment`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_extraction::{BillDocument, BillParser};
//!
//! let document = BillDocument::from_text(&std::fs::read_to_string("bill.txt")?);
//! let totals = BillParser::new().with_detail_page(3).parse(&document)?;
//!
//! for warning in &totals.warnings {
//!     eprintln!("{warning}");
//! }
//! ```

pub mod bill;
pub mod equipment;
pub mod error;
pub mod page;
pub mod parser;
pub mod patterns;
pub mod sections;
pub mod totals;
pub mod usage;
pub mod voice_lines;

pub use bill::{
    BillTotals, EquipmentEntry, EquipmentFidelity, ExclusionReason, UsageCharge, VoiceLineRecord,
};
pub use equipment::{EquipmentMachine, EquipmentState};
pub use error::ExtractionError;
pub use page::{BillDocument, BillPage, PAGE_SEPARATOR};
pub use parser::{BillParser, DEFAULT_DETAIL_PAGE};

/// Parses a document with the default equipment detail page
pub fn extract(document: &BillDocument) -> Result<BillTotals, ExtractionError> {
    BillParser::new().parse(document)
}
