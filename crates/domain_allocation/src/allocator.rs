//! Allocation engine
//!
//! Applies rules A to F to one bill, reconciles each category into a
//! ledger row and validates the rows against the bill's total due.

use tracing::{info, instrument};

use core_kernel::{Money, Warning};
use domain_extraction::BillTotals;

use crate::category::Category;
use crate::error::AllocationError;
use crate::family::FamilyConfig;
use crate::ledger_row::LedgerRow;
use crate::reconcile::reconcile;
use crate::rules::{self, CategoryShares};
use crate::validation::validate_total_due;

/// Rows and warnings for one bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// One row per category, in category order
    pub rows: Vec<LedgerRow>,
    /// Reconciliation findings from allocation
    pub warnings: Vec<Warning>,
}

impl Allocation {
    pub fn row(&self, category: Category) -> Option<&LedgerRow> {
        self.rows.iter().find(|row| row.category == category)
    }

    /// Sum of all row amounts
    pub fn total(&self) -> Money {
        self.rows.iter().map(|row| row.amount).sum()
    }
}

/// Allocates bills against one family configuration
#[derive(Debug, Clone, Copy)]
pub struct Allocator<'a> {
    config: &'a FamilyConfig,
}

impl<'a> Allocator<'a> {
    pub fn new(config: &'a FamilyConfig) -> Self {
        Self { config }
    }

    /// Allocates one bill
    ///
    /// All six rows are produced, each carrying every configured family.
    /// Allocation is all-or-nothing: when any rule fails no rows are
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns `UnknownEntity` when a billable line, device or usage charge
    /// has no owner, and `ZeroDenominator` when a non-zero subtotal has no
    /// units to be split across.
    #[instrument(skip(self, totals), fields(cycle = %totals.cycle.label(), total_due = %totals.total_due))]
    pub fn allocate(&self, totals: &BillTotals) -> Result<Allocation, AllocationError> {
        let shares = [
            rules::voice(totals, self.config)?,
            rules::wearable(totals, self.config)?,
            rules::connected(totals, self.config)?,
            rules::equipment(totals, self.config)?,
            rules::netflix(totals, self.config)?,
            rules::usage(totals, self.config)?,
        ];

        let mut rows = Vec::with_capacity(shares.len());
        let mut warnings = Vec::new();

        for category_shares in &shares {
            let (row, warning) = self.to_row(totals, category_shares);
            rows.push(row);
            warnings.extend(warning);
        }

        warnings.extend(validate_total_due(&rows, totals.total_due));

        let allocation = Allocation { rows, warnings };
        info!(
            rows = allocation.rows.len(),
            allocated = %allocation.total(),
            warnings = allocation.warnings.len(),
            "bill allocated"
        );
        Ok(allocation)
    }

    fn to_row(&self, totals: &BillTotals, shares: &CategoryShares) -> (LedgerRow, Option<Warning>) {
        let reconciled = reconcile(shares, self.config);

        let row = LedgerRow {
            date: totals.cycle.due_date,
            description: format!("{} {}", shares.category.label(), totals.cycle.label()),
            category: shares.category,
            amount: reconciled.target,
            amounts: reconciled.amounts,
            shares: shares.units.clone(),
        };

        (row, reconciled.warning)
    }
}
