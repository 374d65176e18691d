//! Balance report
//!
//! Sums every family column of the ledger. A positive balance is owed to
//! the account holder, a negative one is a credit.

use std::fmt;

use core_kernel::{FamilyId, Money};
use domain_allocation::{FamilyConfig, LedgerRow};

use crate::ledger::LedgerEntry;

pub const REPORT_TITLE: &str = "=== FAMILY MOBILE LEDGER BALANCES ===";

/// Running balance of one family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyBalance {
    pub id: FamilyId,
    pub name: String,
    pub balance: Money,
}

impl fmt::Display for FamilyBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): ", self.name, self.id)?;
        if self.balance.is_positive() {
            write!(f, "owes {}", self.balance)
        } else if self.balance.is_negative() {
            write!(f, "has credit of {}", self.balance.abs())
        } else {
            write!(f, "balanced ({})", Money::zero())
        }
    }
}

/// Balances of every configured family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReport {
    pub balances: Vec<FamilyBalance>,
}

impl BalanceReport {
    /// Builds the report in configuration order
    pub fn from_entries(entries: &[LedgerEntry], config: &FamilyConfig) -> Self {
        let balances = config
            .families()
            .iter()
            .map(|family| FamilyBalance {
                id: family.id.clone(),
                name: family.name.clone(),
                balance: entries
                    .iter()
                    .map(|entry| entry.charge_for(&family.id))
                    .sum::<Money>()
                    .round_to_cents(),
            })
            .collect();
        Self { balances }
    }

    pub fn balance(&self, family: &FamilyId) -> Money {
        self.balances
            .iter()
            .find(|b| &b.id == family)
            .map(|b| b.balance)
            .unwrap_or_default()
    }

    /// Sum of the positive balances
    pub fn total_outstanding(&self) -> Money {
        self.balances
            .iter()
            .map(|b| b.balance)
            .filter(Money::is_positive)
            .sum()
    }
}

impl fmt::Display for BalanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_TITLE}")?;
        writeln!(f)?;
        for balance in &self.balances {
            writeln!(f, "{balance}")?;
        }
        writeln!(f)?;
        write!(f, "Total Outstanding: {}", self.total_outstanding())
    }
}

/// Plain-text table of the rows of one bill, one column per family
pub struct RowTable<'a> {
    pub rows: &'a [LedgerRow],
    pub config: &'a FamilyConfig,
}

impl fmt::Display for RowTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<26}{:>10}", "Description", "Amount")?;
        for id in self.config.family_ids() {
            write!(f, "{:>10}", id.as_str())?;
        }
        for row in self.rows {
            writeln!(f)?;
            write!(f, "{:<26}{:>10}", row.description, row.amount.to_string())?;
            for id in self.config.family_ids() {
                write!(f, "{:>10}", row.amount_for(id).to_string())?;
            }
        }
        Ok(())
    }
}
