//! Ledger rows produced by allocation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{FamilyId, Money};

use crate::category::Category;

/// Per-family charges for one category of one billing cycle
///
/// Amounts are rounded to cents. Every configured family has an entry,
/// zero when it has no contribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Due date of the bill
    pub date: NaiveDate,
    /// Category label with the cycle, e.g. `Voice Plan Mar 2025`
    pub description: String,
    pub category: Category,
    /// Category total, rounded to cents
    pub amount: Money,
    /// Charge per family
    pub amounts: BTreeMap<FamilyId, Money>,
    /// Share units per family (lines, devices or adults)
    pub shares: BTreeMap<FamilyId, u32>,
}

impl LedgerRow {
    /// Charge to one family
    pub fn amount_for(&self, family: &FamilyId) -> Money {
        self.amounts.get(family).copied().unwrap_or_default()
    }

    /// Share units held by one family
    pub fn shares_for(&self, family: &FamilyId) -> u32 {
        self.shares.get(family).copied().unwrap_or_default()
    }

    pub fn share_total(&self) -> u32 {
        self.shares.values().sum()
    }

    /// Sum of the per-family charges
    pub fn allocated(&self) -> Money {
        self.amounts.values().sum()
    }

    /// Returns true if the family charges add up to the row amount
    pub fn is_balanced(&self) -> bool {
        self.allocated() == self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance() {
        let jj = FamilyId::new("JJ").unwrap();
        let ks = FamilyId::new("KS").unwrap();
        let row = LedgerRow {
            date: NaiveDate::from_ymd_opt(2025, 3, 24).unwrap(),
            description: "Netflix Mar 2025".to_string(),
            category: Category::Netflix,
            amount: Money::new(dec!(24.00)),
            amounts: BTreeMap::from([
                (jj.clone(), Money::new(dec!(12.00))),
                (ks.clone(), Money::new(dec!(12.00))),
            ]),
            shares: BTreeMap::from([(jj.clone(), 2), (ks, 2)]),
        };
        assert!(row.is_balanced());
        assert_eq!(row.share_total(), 4);
        assert_eq!(row.amount_for(&jj), Money::new(dec!(12.00)));
        assert_eq!(row.amount_for(&FamilyId::new("RE").unwrap()), Money::zero());
    }
}
