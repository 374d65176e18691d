//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for ledger rows and warnings that
//! give more meaningful error messages than standard assertions.

use core_kernel::{FamilyId, Money, Warning};
use domain_allocation::{Category, LedgerRow};

/// Asserts that a row's family charges add up to its amount
pub fn assert_row_balanced(row: &LedgerRow) {
    assert_eq!(
        row.allocated(),
        row.amount,
        "Row '{}' is unbalanced: families {:?} sum to {}, row amount {}",
        row.description,
        row.amounts,
        row.allocated(),
        row.amount
    );
}

/// Asserts that every row is balanced and carries only whole cents
pub fn assert_rows_balanced(rows: &[LedgerRow]) {
    for row in rows {
        assert_row_balanced(row);
        for (family, amount) in &row.amounts {
            assert_eq!(
                *amount,
                amount.round_to_cents(),
                "Row '{}' charges {} a fractional cent amount {}",
                row.description,
                family,
                amount
            );
        }
    }
}

/// Asserts the charge of one family in the row of one category
pub fn assert_family_charge(rows: &[LedgerRow], category: Category, family: &FamilyId, expected: Money) {
    let row = rows
        .iter()
        .find(|row| row.category == category)
        .unwrap_or_else(|| panic!("No {category} row in {} rows", rows.len()));
    assert_eq!(
        row.amount_for(family),
        expected,
        "{} charge for {} is {}, expected {}",
        category,
        family,
        row.amount_for(family),
        expected
    );
}

/// Asserts that rows are emitted for every category, in order
pub fn assert_all_categories(rows: &[LedgerRow]) {
    let categories: Vec<Category> = rows.iter().map(|row| row.category).collect();
    assert_eq!(categories, Category::ALL.to_vec(), "Unexpected row categories");
}

/// Asserts that no reconciliation warning was raised
pub fn assert_no_reconciliation_warnings(warnings: &[Warning]) {
    let mismatches: Vec<String> = warnings
        .iter()
        .filter(|w| w.is_reconciliation())
        .map(|w| w.to_string())
        .collect();
    assert!(
        mismatches.is_empty(),
        "Unexpected reconciliation warnings: {mismatches:#?}"
    );
}

/// Asserts that a reconciliation warning for `scope` carries `delta`
pub fn assert_reconciliation_delta(warnings: &[Warning], scope: &str, delta: Money) {
    let found = warnings.iter().find(|w| {
        matches!(w, Warning::Reconciliation { scope: s, .. } if s == scope)
    });
    match found {
        Some(warning) => assert_eq!(
            warning.delta(),
            Some(delta),
            "Reconciliation delta for {scope}: {warning}"
        ),
        None => panic!("No reconciliation warning for {scope} in {warnings:#?}"),
    }
}
