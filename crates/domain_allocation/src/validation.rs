//! Total-due validation

use tracing::{info, warn};

use core_kernel::{Money, Warning};

use crate::ledger_row::LedgerRow;

/// Compares the allocated rows against the bill's total due
///
/// A difference above one cent is returned as a warning carrying the
/// signed difference; the rows themselves are never withheld.
pub fn validate_total_due(rows: &[LedgerRow], total_due: Money) -> Option<Warning> {
    let allocated: Money = rows.iter().map(|row| row.amount).sum();

    if allocated.within(&total_due, Money::CENT) {
        info!(%total_due, %allocated, "allocation matches total due");
        return None;
    }

    warn!(
        %total_due,
        %allocated,
        difference = %(total_due - allocated),
        "allocation does not match total due"
    );
    Some(Warning::reconciliation("total due", total_due, allocated))
}
