//! Bill processing pipeline
//!
//! Extraction then allocation for one bill, and a batch runner that keeps
//! going when one bill fails. Nothing is written for a failing bill.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use core_kernel::{Money, Warning};
use domain_allocation::{Allocator, FamilyConfig, LedgerRow};
use domain_extraction::{BillDocument, BillParser, BillTotals};

use crate::error::{AppError, AppResult};
use crate::ledger::{AppendSummary, Ledger};
use crate::settings::AppSettings;

/// Everything produced for one bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillOutcome {
    pub totals: BillTotals,
    /// Six rows, in category order
    pub rows: Vec<LedgerRow>,
    /// Extraction warnings, then allocation warnings
    pub warnings: Vec<Warning>,
}

impl BillOutcome {
    /// Sum of the row amounts
    pub fn allocated(&self) -> Money {
        self.rows.iter().map(|row| row.amount).sum()
    }

    pub fn has_reconciliation_warnings(&self) -> bool {
        self.warnings.iter().any(Warning::is_reconciliation)
    }
}

/// Extracts and allocates one bill
///
/// # Errors
///
/// Returns `Extraction` when a mandatory figure is missing and `Allocation`
/// when a line or device has no owner or a share has no denominator.
pub fn process_bill(
    document: &BillDocument,
    config: &FamilyConfig,
    settings: &AppSettings,
) -> AppResult<BillOutcome> {
    let totals = BillParser::new()
        .with_detail_page(settings.equipment_detail_page)
        .parse(document)?;
    let allocation = Allocator::new(config).allocate(&totals)?;

    let mut warnings = totals.warnings.clone();
    warnings.extend(allocation.warnings);

    Ok(BillOutcome {
        totals,
        rows: allocation.rows,
        warnings,
    })
}

/// Reads a bill text file, pages separated by form feeds, and processes it
pub fn process_bill_file(
    path: &Path,
    config: &FamilyConfig,
    settings: &AppSettings,
) -> AppResult<BillOutcome> {
    let text = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    process_bill(&BillDocument::from_text(&text), config, settings)
}

/// Result of one bill of a batch
#[derive(Debug)]
pub struct BillRun {
    pub path: PathBuf,
    pub result: AppResult<(BillOutcome, Option<AppendSummary>)>,
}

impl BillRun {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Processes bills one after another
///
/// Each bill is independent: a failure is logged and recorded, and the
/// remaining bills still run. With a ledger, the rows of every successful
/// bill are appended before the next bill starts; without one (dry run)
/// nothing is written.
pub fn run_batch(
    paths: &[PathBuf],
    config: &FamilyConfig,
    settings: &AppSettings,
    ledger: Option<&Ledger>,
) -> Vec<BillRun> {
    paths
        .iter()
        .map(|path| {
            let result = process_bill_file(path, config, settings).and_then(|outcome| {
                let appended = ledger.map(|l| l.append(&outcome.rows)).transpose()?;
                Ok((outcome, appended))
            });

            match &result {
                Ok((outcome, appended)) => info!(
                    bill = %path.display(),
                    cycle = %outcome.totals.cycle.label(),
                    allocated = %outcome.allocated(),
                    appended = appended.map(|a| a.appended).unwrap_or_default(),
                    "bill processed"
                ),
                Err(err) => error!(bill = %path.display(), error = %err, "bill skipped"),
            }

            BillRun {
                path: path.clone(),
                result,
            }
        })
        .collect()
}
