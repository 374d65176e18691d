//! Penny-drift reconciliation
//!
//! Rounding each family's share independently can leave the rounded shares
//! a cent or so away from the rounded category total. That residual is
//! moved onto the families with the largest absolute shares, one cent each,
//! so the row always adds up. Ties go to the priority family, then to
//! configuration order.
//!
//! A residual larger than rounding alone can produce is not drift: it is
//! left in place and reported.

use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use core_kernel::{FamilyId, Money, Warning};

use crate::family::FamilyConfig;
use crate::rules::CategoryShares;

/// Rounded shares of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Rounded category total
    pub target: Money,
    /// Rounded charge per family
    pub amounts: BTreeMap<FamilyId, Money>,
    /// Residual moved between families, zero when none was needed
    pub adjustment: Money,
    /// Set when the residual was too large to be rounding drift
    pub warning: Option<Warning>,
}

/// Rounds shares to cents and corrects penny drift
pub fn reconcile(shares: &CategoryShares, config: &FamilyConfig) -> Reconciled {
    let target = shares.subtotal.round_to_cents();
    let mut amounts: BTreeMap<FamilyId, Money> = shares
        .shares
        .iter()
        .map(|(family, exact)| (family.clone(), exact.round_to_cents()))
        .collect();

    let rounded_total: Money = amounts.values().sum();
    let residual = target - rounded_total;

    if residual.is_zero() {
        return Reconciled {
            target,
            amounts,
            adjustment: Money::zero(),
            warning: None,
        };
    }

    let candidates = drift_order(shares, config);
    let tolerance = Money::new(dec!(0.005)).multiply(candidates.len().into());

    if candidates.is_empty() || residual.abs() > tolerance {
        warn!(
            category = %shares.category,
            expected = %target,
            actual = %rounded_total,
            "category shares do not reconcile"
        );
        return Reconciled {
            target,
            amounts,
            adjustment: Money::zero(),
            warning: Some(Warning::reconciliation(
                shares.category.to_string(),
                target,
                rounded_total,
            )),
        };
    }

    let step = if residual.is_negative() { -Money::CENT } else { Money::CENT };
    let cents = residual.abs().to_cents();
    for family in candidates.iter().cycle().take(cents as usize) {
        if let Some(amount) = amounts.get_mut(*family) {
            *amount += step;
        }
        debug!(category = %shares.category, %family, %step, "penny drift assigned");
    }

    Reconciled {
        target,
        amounts,
        adjustment: residual,
        warning: None,
    }
}

/// Families with a non-zero share, largest absolute share first
fn drift_order<'a>(shares: &'a CategoryShares, config: &FamilyConfig) -> Vec<&'a FamilyId> {
    let priority = config.priority_family();
    let mut order: Vec<(&FamilyId, Money)> = shares
        .shares
        .iter()
        .filter(|(_, exact)| !exact.is_zero())
        .map(|(family, exact)| (family, exact.abs()))
        .collect();

    order.sort_by(|(a, a_share), (b, b_share)| {
        b_share
            .cmp(a_share)
            .then_with(|| (*b == priority).cmp(&(*a == priority)))
            .then_with(|| config.position(a).cmp(&config.position(b)))
    });

    order.into_iter().map(|(family, _)| family).collect()
}
