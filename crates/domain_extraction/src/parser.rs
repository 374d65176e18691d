//! Bill parser
//!
//! Runs every recognizer over one bill document and assembles the result
//! into a single `BillTotals`.

use tracing::{info, instrument, warn};

use crate::bill::BillTotals;
use crate::equipment::extract_equipment;
use crate::error::ExtractionError;
use crate::page::BillDocument;
use crate::patterns::collapse_whitespace;
use crate::totals::{extract_cycle, extract_netflix, extract_plan_subtotals, extract_total_due};
use crate::usage::extract_usage;
use crate::voice_lines::scan_voice_lines;

/// Page that normally carries the per-device equipment detail
pub const DEFAULT_DETAIL_PAGE: usize = 3;

/// Extracts structured totals from bill text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BillParser {
    detail_page: usize,
}

impl Default for BillParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BillParser {
    pub fn new() -> Self {
        Self {
            detail_page: DEFAULT_DETAIL_PAGE,
        }
    }

    /// Sets the 1-based page searched first for equipment detail
    pub fn with_detail_page(mut self, page: usize) -> Self {
        self.detail_page = page.max(1);
        self
    }

    pub fn detail_page(&self) -> usize {
        self.detail_page
    }

    /// Parses one bill
    ///
    /// Parsing is pure: the same document always yields the same totals and
    /// warnings, in the same order.
    ///
    /// # Errors
    ///
    /// Fails when the document is empty, when a mandatory figure (billing
    /// dates, total due, voice subtotal) is missing, or when a located
    /// amount cannot be read. No partial totals are returned.
    #[instrument(skip(self, document), fields(pages = document.pages().len(), detail_page = self.detail_page))]
    pub fn parse(&self, document: &BillDocument) -> Result<BillTotals, ExtractionError> {
        if document.is_empty() {
            return Err(ExtractionError::EmptyDocument);
        }

        let full_text = document.full_text();
        let collapsed = collapse_whitespace(&full_text);

        let cycle = extract_cycle(&collapsed)?;
        let (total_due, conflict) = extract_total_due(&collapsed)?;
        let plans = extract_plan_subtotals(&collapsed)?;
        let netflix_subtotal = extract_netflix(&full_text);

        let voice = scan_voice_lines(document, plans.reported_voice_lines)?;
        let equipment = extract_equipment(document, self.detail_page)?;
        let usage = extract_usage(document)?;
        let usage_subtotal = usage.total();

        let mut warnings = Vec::new();
        if let Some(conflict) = conflict {
            warn!(%conflict, "conflicting totals");
            warnings.push(conflict);
        }
        warnings.extend(voice.warnings);
        warnings.extend(equipment.warnings);
        warnings.extend(usage.warnings);

        let totals = BillTotals {
            cycle,
            total_due,
            voice_subtotal: plans.voice,
            wearable_subtotal: plans.wearable,
            connected_subtotal: plans.connected,
            netflix_subtotal,
            equipment_subtotal: equipment.subtotal,
            usage_subtotal,
            reported_voice_lines: plans.reported_voice_lines,
            voice_lines: voice.records,
            equipment: equipment.scan.net,
            equipment_entries: equipment.scan.entries,
            equipment_fidelity: equipment.fidelity,
            usage: usage.charges,
            warnings,
        };

        info!(
            cycle = %totals.cycle.label(),
            total_due = %totals.total_due,
            billable_lines = totals.billable_line_count(),
            devices = totals.equipment.len(),
            warnings = totals.warnings.len(),
            "bill extracted"
        );

        Ok(totals)
    }

    /// Splits raw text on form feeds and parses it
    pub fn parse_text(&self, text: &str) -> Result<BillTotals, ExtractionError> {
        self.parse(&BillDocument::from_text(text))
    }
}
