//! Structured result of extracting one bill
//!
//! `BillTotals` is produced once per parsed bill and handed by value to the
//! allocation engine. Nothing mutates it after extraction.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use core_kernel::{BillingCycle, DeviceId, Money, PhoneNumber, Warning};

/// Why a reported voice line is not billable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The line's number moved to another line during the cycle
    Transferred,
    /// The line was cancelled during the cycle
    Removed,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::Transferred => write!(f, "transferred"),
            ExclusionReason::Removed => write!(f, "removed"),
        }
    }
}

/// One voice line as enumerated in the bill summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceLineRecord {
    /// Line number
    pub phone: PhoneNumber,
    /// Plans column; absent when the bill prints a gap or `-`
    pub plan: Option<String>,
    /// Free-text description printed next to the number (e.g. `Old number`)
    pub description: Option<String>,
    /// Why the line is excluded from the per-line split, if it is
    pub exclusion: Option<ExclusionReason>,
}

impl VoiceLineRecord {
    /// A line is billable iff it has a plan and is not excluded
    pub fn is_billable(&self) -> bool {
        self.plan.is_some() && self.exclusion.is_none()
    }
}

/// One installment or credit figure attributed to a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentEntry {
    /// Device the figure belongs to
    pub device: DeviceId,
    /// Positive for installments, negative for promotional credits
    pub amount: Money,
}

impl EquipmentEntry {
    pub fn is_credit(&self) -> bool {
        self.amount.is_negative()
    }
}

/// One-time usage charge for a phone number, summed across entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCharge {
    pub phone: PhoneNumber,
    pub amount: Money,
}

/// How much equipment detail the bill provided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentFidelity {
    /// Per-device paragraphs were found
    Detailed,
    /// Only the section subtotal was found
    SubtotalOnly,
    /// The bill has no equipment section
    Absent,
}

/// Every figure the allocation engine needs from one bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillTotals {
    /// Service window and due date
    pub cycle: BillingCycle,
    /// Amount the bill says is due
    pub total_due: Money,
    /// Voice plan subtotal (`N VOICE LINES = $x`)
    pub voice_subtotal: Money,
    /// Wearable plan subtotal
    pub wearable_subtotal: Money,
    /// Connected device plan subtotal
    pub connected_subtotal: Money,
    /// Netflix add-on charge
    pub netflix_subtotal: Money,
    /// Equipment section subtotal as printed
    pub equipment_subtotal: Money,
    /// One-time usage subtotal
    pub usage_subtotal: Money,
    /// Voice line count as printed on the bill, billable or not
    pub reported_voice_lines: u32,
    /// Voice lines enumerated in the bill summary
    pub voice_lines: Vec<VoiceLineRecord>,
    /// Net equipment amount per device
    pub equipment: BTreeMap<DeviceId, Money>,
    /// Raw installment and credit figures behind `equipment`
    pub equipment_entries: Vec<EquipmentEntry>,
    /// Level of equipment detail found
    pub equipment_fidelity: EquipmentFidelity,
    /// Usage charges, one per phone number
    pub usage: Vec<UsageCharge>,
    /// Non-fatal findings from extraction
    pub warnings: Vec<Warning>,
}

impl BillTotals {
    /// Voice lines that count toward the per-line rate
    pub fn billable_voice_lines(&self) -> impl Iterator<Item = &VoiceLineRecord> {
        self.voice_lines.iter().filter(|line| line.is_billable())
    }

    /// Voice lines that were reported but excluded
    pub fn excluded_voice_lines(&self) -> impl Iterator<Item = &VoiceLineRecord> {
        self.voice_lines.iter().filter(|line| !line.is_billable())
    }

    /// Number of lines in the per-line rate denominator
    ///
    /// When the summary enumerates voice lines, the billable ones are
    /// counted directly. Otherwise the reported count is reduced by the
    /// number of excluded lines that were detected.
    pub fn billable_line_count(&self) -> u32 {
        if self.voice_lines.is_empty() {
            return self.reported_voice_lines;
        }
        let enumerated = self.billable_voice_lines().count() as u32;
        if enumerated > 0 {
            enumerated
        } else {
            let excluded = self.excluded_voice_lines().count() as u32;
            self.reported_voice_lines.saturating_sub(excluded)
        }
    }

    /// Sum of all net device amounts
    pub fn equipment_total(&self) -> Money {
        self.equipment.values().sum()
    }

    /// Sum of all usage charges
    pub fn usage_total(&self) -> Money {
        self.usage.iter().map(|charge| charge.amount).sum()
    }

    /// Sum of the six category subtotals that are allocated
    pub fn allocatable_total(&self) -> Money {
        self.voice_subtotal
            + self.wearable_subtotal
            + self.connected_subtotal
            + self.netflix_subtotal
            + self.equipment_total()
            + self.usage_total()
    }

    /// Usage amount charged to one number
    pub fn usage_for(&self, phone: &PhoneNumber) -> Money {
        self.usage
            .iter()
            .filter(|charge| &charge.phone == phone)
            .map(|charge| charge.amount)
            .sum()
    }
}
