//! Allocation rules
//!
//! | Rule | Category | Split |
//! |------|----------|-------|
//! | A | Voice | subtotal ÷ billable lines, times the lines each family owns |
//! | B | Wearable | subtotal ÷ configured wearables, passed through to owners |
//! | C | Connected | subtotal ÷ configured connected devices, passed through |
//! | D | Equipment | net amount per device, charged to its owner |
//! | E | Netflix | subtotal × family adults ÷ total adults |
//! | F | Usage | each line's usage, charged to its owner |
//!
//! Rules compute exact shares at full precision. Rounding happens later,
//! when the shares are reconciled into a ledger row.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::info;

use core_kernel::{FamilyId, Money};
use domain_extraction::BillTotals;

use crate::category::Category;
use crate::error::AllocationError;
use crate::family::{DeviceKind, FamilyConfig};

/// Exact, unrounded shares of one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryShares {
    pub category: Category,
    /// Category total the rounded shares must add up to
    pub subtotal: Money,
    /// Exact share per family; every configured family is present
    pub shares: BTreeMap<FamilyId, Money>,
    /// Share units per family
    pub units: BTreeMap<FamilyId, u32>,
}

impl CategoryShares {
    /// Zero shares for every configured family
    pub fn empty(category: Category, subtotal: Money, config: &FamilyConfig) -> Self {
        Self {
            category,
            subtotal,
            shares: config.family_ids().map(|id| (id.clone(), Money::zero())).collect(),
            units: config.family_ids().map(|id| (id.clone(), 0)).collect(),
        }
    }

    /// Adds an amount and its units to a family
    pub fn credit(&mut self, family: &FamilyId, amount: Money, units: u32) {
        *self.shares.entry(family.clone()).or_default() += amount;
        *self.units.entry(family.clone()).or_default() += units;
    }

    pub fn exact_total(&self) -> Money {
        self.shares.values().sum()
    }

    pub fn total_units(&self) -> u32 {
        self.units.values().sum()
    }
}

/// Rule A: voice lines
///
/// The rate denominator is the number of billable lines, so a transferred
/// line counts toward neither the rate nor any family's tally. When the
/// bill enumerates no voice rows, the configured voice lines form the tally
/// and the bill's billable count forms the denominator.
pub fn voice(totals: &BillTotals, config: &FamilyConfig) -> Result<CategoryShares, AllocationError> {
    let subtotal = totals.voice_subtotal;
    let mut result = CategoryShares::empty(Category::Voice, subtotal, config);

    let mut tally: BTreeMap<FamilyId, u32> = BTreeMap::new();
    let denominator = if totals.voice_lines.is_empty() {
        for (family, _) in config.devices_of_kind(DeviceKind::Voice) {
            *tally.entry(family.clone()).or_default() += 1;
        }
        totals.billable_line_count()
    } else {
        for line in totals.billable_voice_lines() {
            let family = config
                .owner_of_phone(&line.phone)
                .ok_or_else(|| AllocationError::unknown_entity(line.phone.as_str(), Category::Voice))?;
            *tally.entry(family.clone()).or_default() += 1;
        }
        tally.values().sum()
    };

    if denominator == 0 {
        return if subtotal.is_zero() {
            Ok(result)
        } else {
            Err(AllocationError::zero_denominator(Category::Voice, subtotal))
        };
    }

    let rate = per_unit(Category::Voice, subtotal, denominator)?;
    for (family, lines) in &tally {
        result.credit(family, rate.multiply(Decimal::from(*lines)), *lines);
    }

    info!(rule = "A", %subtotal, billable_lines = denominator, %rate, "voice shares");
    Ok(result)
}

/// Rule B: wearable plans
pub fn wearable(totals: &BillTotals, config: &FamilyConfig) -> Result<CategoryShares, AllocationError> {
    pass_through(Category::Wearable, DeviceKind::Wearable, totals.wearable_subtotal, config)
}

/// Rule C: connected device plans
pub fn connected(totals: &BillTotals, config: &FamilyConfig) -> Result<CategoryShares, AllocationError> {
    pass_through(Category::Connected, DeviceKind::Connected, totals.connected_subtotal, config)
}

/// Splits a plan subtotal evenly across configured devices of one kind
fn pass_through(
    category: Category,
    kind: DeviceKind,
    subtotal: Money,
    config: &FamilyConfig,
) -> Result<CategoryShares, AllocationError> {
    let mut result = CategoryShares::empty(category, subtotal, config);
    let owners: Vec<&FamilyId> = config.devices_of_kind(kind).map(|(family, _)| family).collect();

    if owners.is_empty() {
        return if subtotal.is_zero() {
            Ok(result)
        } else {
            Err(AllocationError::zero_denominator(category, subtotal))
        };
    }

    let fee = per_unit(category, subtotal, owners.len() as u32)?;
    for family in owners {
        result.credit(family, fee, 1);
    }

    info!(%category, %subtotal, devices = result.total_units(), %fee, "pass-through shares");
    Ok(result)
}

/// Rule D: equipment, net per device
pub fn equipment(totals: &BillTotals, config: &FamilyConfig) -> Result<CategoryShares, AllocationError> {
    let mut result = CategoryShares::empty(Category::Equipment, totals.equipment_total(), config);

    for (device, net) in &totals.equipment {
        let family = config
            .owner_of_device(device)
            .ok_or_else(|| AllocationError::unknown_entity(device.as_str(), Category::Equipment))?;
        result.credit(family, *net, 1);
    }

    info!(rule = "D", subtotal = %result.subtotal, devices = totals.equipment.len(), "equipment shares");
    Ok(result)
}

/// Rule E: Netflix, by adults
pub fn netflix(totals: &BillTotals, config: &FamilyConfig) -> Result<CategoryShares, AllocationError> {
    let subtotal = totals.netflix_subtotal;
    let mut result = CategoryShares::empty(Category::Netflix, subtotal, config);
    let total_adults = config.total_adults();

    if total_adults == 0 {
        return if subtotal.is_zero() {
            Ok(result)
        } else {
            Err(AllocationError::zero_denominator(Category::Netflix, subtotal))
        };
    }

    for family in config.families() {
        let share = subtotal
            .multiply(Decimal::from(family.adults))
            .divide(Decimal::from(total_adults))
            .map_err(|_| AllocationError::zero_denominator(Category::Netflix, subtotal))?;
        result.credit(&family.id, share, family.adults);
    }

    info!(rule = "E", %subtotal, total_adults, "netflix shares");
    Ok(result)
}

/// Rule F: usage, to the line's owner
pub fn usage(totals: &BillTotals, config: &FamilyConfig) -> Result<CategoryShares, AllocationError> {
    let mut result = CategoryShares::empty(Category::Usage, totals.usage_total(), config);

    for charge in &totals.usage {
        let family = config
            .owner_of_phone(&charge.phone)
            .ok_or_else(|| AllocationError::unknown_entity(charge.phone.as_str(), Category::Usage))?;
        result.credit(family, charge.amount, 1);
    }

    info!(rule = "F", subtotal = %result.subtotal, lines = totals.usage.len(), "usage shares");
    Ok(result)
}

fn per_unit(category: Category, subtotal: Money, units: u32) -> Result<Money, AllocationError> {
    subtotal
        .divide(Decimal::from(units))
        .map_err(|_| AllocationError::zero_denominator(category, subtotal))
}
