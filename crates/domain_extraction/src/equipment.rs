//! Equipment section state machine
//!
//! Equipment line items are not columnar. Each device is a paragraph that
//! opens with the device's phone number and may carry installment and
//! promotional-credit figures on following lines, usually closed by a line
//! holding only the device's net amount:
//!
//! ```text
//! EQUIPMENT $59.59
//! (410) 227-2625 Apple iPhone 15
//! Installment 14 of 24 $37.30
//! Promotional credit -$3.96
//! $33.34
//!
//! (202) 258-6292 Samsung Galaxy S23 $26.25
//! ```
//!
//! The walk has two states, `SeekingDevice` and `InDeviceBody`. A device's
//! value is committed in two phases. The header amount (or, without one,
//! the body installments) netted with the body credits is provisional, and
//! only a standalone amount line may replace it.
//! Paragraphs are resolved only once the whole block has been walked; a
//! paragraph with neither a provisional nor a final figure resolves to zero.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use core_kernel::{DeviceId, Money, Warning};

use crate::bill::{EquipmentEntry, EquipmentFidelity};
use crate::error::ExtractionError;
use crate::page::BillDocument;
use crate::patterns::{
    amounts_in, leading_phone, standalone_amount, AMOUNT_RE, EQUIPMENT_HEADER_RE,
    NEGATIVE_AMOUNT_RE,
};
use crate::sections::SectionSpec;

/// State of the equipment walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipmentState {
    /// Between paragraphs, waiting for a phone-number line
    SeekingDevice,
    /// Inside the paragraph of the given device
    InDeviceBody(DeviceId),
}

/// Evidence gathered for one device paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
struct DeviceParagraph {
    device: DeviceId,
    /// Amount printed on the header line
    header_amount: Option<Money>,
    /// Positive figures from body lines
    installments: Vec<Money>,
    /// Negative figures from body lines
    credits: Vec<Money>,
    /// Standalone amount that closed the paragraph
    finalized: Option<Money>,
}

impl DeviceParagraph {
    fn new(device: DeviceId, header_amount: Option<Money>) -> Self {
        Self {
            device,
            header_amount,
            installments: Vec::new(),
            credits: Vec::new(),
            finalized: None,
        }
    }

    /// Positive figures of the provisional net
    ///
    /// The header amount is the provisional value. Body installments stand
    /// in only when the header carries no amount.
    fn base_figures(&self) -> Vec<Money> {
        match self.header_amount {
            Some(amount) => vec![amount],
            None => self.installments.clone(),
        }
    }

    /// Provisional net, or `None` while unresolved
    fn provisional(&self) -> Option<Money> {
        let base = self.base_figures();
        if base.is_empty() && self.credits.is_empty() {
            return None;
        }
        Some(base.iter().chain(self.credits.iter()).sum())
    }

    /// Resolves the paragraph into entries whose sum is the device's net
    fn into_entries(self) -> Vec<EquipmentEntry> {
        let evidence: Vec<Money> = self
            .base_figures()
            .into_iter()
            .chain(self.credits.iter().copied())
            .collect();
        let evidence_total: Money = evidence.iter().sum();

        let amounts = match (self.finalized, self.provisional()) {
            (Some(total), _) if !evidence.is_empty() && evidence_total == total => evidence,
            (Some(total), _) => vec![total],
            (None, Some(_)) => evidence,
            (None, None) => vec![Money::zero()],
        };

        amounts
            .into_iter()
            .map(|amount| EquipmentEntry {
                device: self.device.clone(),
                amount,
            })
            .collect()
    }
}

/// Result of walking one equipment block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentScan {
    /// Installment and credit entries, in bill order
    pub entries: Vec<EquipmentEntry>,
    /// Net amount per device
    pub net: BTreeMap<DeviceId, Money>,
    /// Number of device paragraphs seen
    pub paragraphs: usize,
}

impl EquipmentScan {
    pub fn total(&self) -> Money {
        self.net.values().sum()
    }
}

/// Line-by-line walker over an equipment block
#[derive(Debug)]
pub struct EquipmentMachine {
    state: EquipmentState,
    paragraphs: Vec<DeviceParagraph>,
}

impl Default for EquipmentMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl EquipmentMachine {
    pub fn new() -> Self {
        Self {
            state: EquipmentState::SeekingDevice,
            paragraphs: Vec::new(),
        }
    }

    pub fn state(&self) -> &EquipmentState {
        &self.state
    }

    /// Feeds one line of the block
    pub fn feed(&mut self, line: &str) {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            if let EquipmentState::InDeviceBody(device) = &self.state {
                debug!(%device, "paragraph closed by blank line");
            }
            self.state = EquipmentState::SeekingDevice;
            return;
        }

        if let Some((phone, end)) = leading_phone(trimmed) {
            let device = DeviceId::from(phone);
            let header_amount = AMOUNT_RE
                .find(&trimmed[end..])
                .and_then(|m| Money::parse(m.as_str()).ok());
            debug!(%device, provisional = ?header_amount, "device paragraph opened");
            self.paragraphs
                .push(DeviceParagraph::new(device.clone(), header_amount));
            self.state = EquipmentState::InDeviceBody(device);
            return;
        }

        let EquipmentState::InDeviceBody(device) = &self.state else {
            return;
        };
        let device = device.clone();
        let Some(paragraph) = self.paragraphs.last_mut() else {
            return;
        };

        if let Some(total) = standalone_amount(trimmed) {
            debug!(%device, %total, "device amount finalized");
            paragraph.finalized = Some(total);
            self.state = EquipmentState::SeekingDevice;
        } else if NEGATIVE_AMOUNT_RE.is_match(trimmed) {
            let credits: Vec<Money> = amounts_in(trimmed)
                .into_iter()
                .filter(Money::is_negative)
                .collect();
            debug!(%device, ?credits, "credit evidence");
            paragraph.credits.extend(credits);
        } else if let Some(first) = amounts_in(trimmed).into_iter().next() {
            debug!(%device, installment = %first, "installment evidence");
            paragraph.installments.push(first);
        }
    }

    /// Ends the block and resolves every paragraph
    pub fn finish(self) -> EquipmentScan {
        let mut scan = EquipmentScan {
            paragraphs: self.paragraphs.len(),
            ..EquipmentScan::default()
        };

        for paragraph in self.paragraphs {
            if paragraph.finalized.is_none() && paragraph.provisional().is_none() {
                debug!(device = %paragraph.device, "unresolved paragraph defaults to zero");
            }
            for entry in paragraph.into_entries() {
                *scan.net.entry(entry.device.clone()).or_default() += entry.amount;
                scan.entries.push(entry);
            }
        }

        scan
    }
}

/// Walks a block of equipment lines
pub fn scan_equipment_block<'a, I>(lines: I) -> EquipmentScan
where
    I: IntoIterator<Item = &'a str>,
{
    let mut machine = EquipmentMachine::new();
    for line in lines {
        machine.feed(line);
    }
    machine.finish()
}

/// Equipment figures for one bill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentExtraction {
    pub subtotal: Money,
    pub fidelity: EquipmentFidelity,
    pub scan: EquipmentScan,
    pub warnings: Vec<Warning>,
}

/// Finds and walks the equipment detail
///
/// The detail is expected on `detail_page`; other pages carrying the
/// section header are tried next, in page order. Without any device
/// paragraph the header subtotal is kept at reduced fidelity.
pub fn extract_equipment(
    document: &BillDocument,
    detail_page: usize,
) -> Result<EquipmentExtraction, ExtractionError> {
    let spec = SectionSpec::new("equipment", &EQUIPMENT_HEADER_RE);

    let mut candidates: Vec<_> = document.pages().iter().collect();
    candidates.sort_by_key(|page| (page.index != detail_page, page.index));

    let mut subtotal_only: Option<Money> = None;

    for page in candidates {
        let Some(section) = spec.locate(&page.text)? else {
            continue;
        };
        let subtotal = section.header_amount.unwrap_or_default();
        let scan = scan_equipment_block(section.lines.iter().copied());

        if scan.paragraphs == 0 {
            debug!(page = page.index, "equipment header without device paragraphs");
            subtotal_only.get_or_insert(subtotal);
            continue;
        }

        debug!(page = page.index, devices = scan.net.len(), "equipment detail found");
        let mut warnings = Vec::new();
        let parsed = scan.total();
        if !parsed.within(&subtotal, Money::CENT) {
            warn!(%subtotal, %parsed, "equipment entries do not sum to the section subtotal");
            warnings.push(Warning::reconciliation("equipment", subtotal, parsed));
        }

        return Ok(EquipmentExtraction {
            subtotal,
            fidelity: EquipmentFidelity::Detailed,
            scan,
            warnings,
        });
    }

    match subtotal_only {
        Some(subtotal) => {
            let mut warnings = Vec::new();
            if !subtotal.is_zero() {
                warn!(%subtotal, "equipment subtotal without per-device detail");
                warnings.push(Warning::missing_detail(
                    "equipment",
                    format!("no per-device breakdown found; only the {subtotal} subtotal is available"),
                ));
                warnings.push(Warning::reconciliation("equipment", subtotal, Money::zero()));
            }
            Ok(EquipmentExtraction {
                subtotal,
                fidelity: EquipmentFidelity::SubtotalOnly,
                scan: EquipmentScan::default(),
                warnings,
            })
        }
        None => Ok(EquipmentExtraction {
            subtotal: Money::zero(),
            fidelity: EquipmentFidelity::Absent,
            scan: EquipmentScan::default(),
            warnings: Vec::new(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn device(number: &str) -> DeviceId {
        DeviceId::new(number).unwrap()
    }

    fn net(scan: &EquipmentScan, number: &str) -> Option<Money> {
        scan.net.get(&device(number)).copied()
    }

    #[test]
    fn test_standalone_line_finalizes_device() {
        let scan = scan_equipment_block(vec![
            "(410) 227-2625 Apple iPhone 15",
            "Installment 14 of 24 $37.30",
            "Promotional credit -$3.96",
            "$33.34",
        ]);
        assert_eq!(net(&scan, "4102272625"), Some(Money::new(dec!(33.34))));
        assert_eq!(scan.entries.len(), 2);
        assert!(scan.entries[1].is_credit());
    }

    #[test]
    fn test_credit_nets_when_no_standalone_line() {
        let scan = scan_equipment_block(vec![
            "(410) 227-2625 Apple iPhone 15 $37.30",
            "Promotional credit -$3.96",
            "",
        ]);
        assert_eq!(net(&scan, "4102272625"), Some(Money::new(dec!(33.34))));
    }

    #[test]
    fn test_body_figure_does_not_replace_header_amount() {
        let scan = scan_equipment_block(vec![
            "(410) 227-2625 Apple iPhone 15 $37.30",
            "Remaining balance $410.30",
            "Promotional credit -$3.96",
            "",
        ]);
        assert_eq!(net(&scan, "4102272625"), Some(Money::new(dec!(33.34))));
        let amounts: Vec<Money> = scan.entries.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![Money::new(dec!(37.30)), Money::new(dec!(-3.96))]);
    }

    #[test]
    fn test_installments_used_without_header_amount() {
        let scan = scan_equipment_block(vec![
            "(410) 227-2625 Apple iPhone 15",
            "Installment 14 of 24 $37.30",
            "Promotional credit -$3.96",
            "",
        ]);
        assert_eq!(net(&scan, "4102272625"), Some(Money::new(dec!(33.34))));
    }

    #[test]
    fn test_inline_amount_is_provisional() {
        let scan = scan_equipment_block(vec!["(202) 258-6292 Samsung Galaxy $26.25", ""]);
        assert_eq!(net(&scan, "2022586292"), Some(Money::new(dec!(26.25))));
    }

    #[test]
    fn test_later_standalone_line_wins_over_inline_amount() {
        let scan = scan_equipment_block(vec![
            "(202) 258-6292 Samsung Galaxy $30.00",
            "Adjusted for early upgrade",
            "$26.25",
        ]);
        assert_eq!(net(&scan, "2022586292"), Some(Money::new(dec!(26.25))));
        assert_eq!(scan.entries.len(), 1);
    }

    #[test]
    fn test_unresolved_device_defaults_to_zero() {
        let scan = scan_equipment_block(vec![
            "(857) 340-3847 Apple Watch",
            "Paid off",
            "",
            "$12.00",
        ]);
        assert_eq!(net(&scan, "8573403847"), Some(Money::zero()));
    }

    #[test]
    fn test_blank_line_returns_to_seeking() {
        let mut machine = EquipmentMachine::new();
        machine.feed("(857) 340-3847 Apple Watch");
        assert_eq!(
            machine.state(),
            &EquipmentState::InDeviceBody(device("8573403847"))
        );
        machine.feed("   ");
        assert_eq!(machine.state(), &EquipmentState::SeekingDevice);
    }

    #[test]
    fn test_standalone_line_returns_to_seeking() {
        let mut machine = EquipmentMachine::new();
        machine.feed("(410) 227-2625 iPhone");
        machine.feed("$33.34");
        assert_eq!(machine.state(), &EquipmentState::SeekingDevice);
        machine.feed("$99.99");
        let scan = machine.finish();
        assert_eq!(scan.total(), Money::new(dec!(33.34)));
    }

    #[test]
    fn test_repeated_device_paragraphs_are_summed() {
        let scan = scan_equipment_block(vec![
            "(410) 227-2625 iPhone",
            "$37.30",
            "(410) 227-2625 Trade-in promotion",
            "-$3.96",
        ]);
        assert_eq!(scan.paragraphs, 2);
        assert_eq!(net(&scan, "4102272625"), Some(Money::new(dec!(33.34))));
    }

    #[test]
    fn test_detail_page_preferred() {
        let document = BillDocument::from_pages(vec![
            "EQUIPMENT $59.59\nSee page 3 for details",
            "THIS BILL SUMMARY",
            "EQUIPMENT $59.59\n(410) 227-2625 iPhone\n$33.34\n\n(202) 258-6292 Galaxy $26.25\nSERVICES $18.00",
        ]);
        let extraction = extract_equipment(&document, 3).unwrap();
        assert_eq!(extraction.fidelity, EquipmentFidelity::Detailed);
        assert_eq!(extraction.scan.total(), Money::new(dec!(59.59)));
        assert!(extraction.warnings.is_empty());
    }

    #[test]
    fn test_falls_back_to_other_pages() {
        let document = BillDocument::from_pages(vec![
            "EQUIPMENT $26.25\n(202) 258-6292 Galaxy $26.25",
        ]);
        let extraction = extract_equipment(&document, 3).unwrap();
        assert_eq!(extraction.fidelity, EquipmentFidelity::Detailed);
        assert_eq!(extraction.subtotal, Money::new(dec!(26.25)));
    }

    #[test]
    fn test_subtotal_only_warns() {
        let document = BillDocument::from_pages(vec!["EQUIPMENT $59.59\nSee your online account"]);
        let extraction = extract_equipment(&document, 3).unwrap();
        assert_eq!(extraction.fidelity, EquipmentFidelity::SubtotalOnly);
        assert_eq!(extraction.subtotal, Money::new(dec!(59.59)));
        assert_eq!(extraction.warnings.len(), 2);
    }

    #[test]
    fn test_conservation_mismatch_warns() {
        let document = BillDocument::from_pages(vec![
            "EQUIPMENT $60.00\n(202) 258-6292 Galaxy $26.25",
        ]);
        let extraction = extract_equipment(&document, 1).unwrap();
        assert_eq!(extraction.warnings.len(), 1);
        assert_eq!(
            extraction.warnings[0].delta(),
            Some(Money::new(dec!(33.75)))
        );
    }

    #[test]
    fn test_absent_section() {
        let document = BillDocument::from_pages(vec!["SERVICES $18.00"]);
        let extraction = extract_equipment(&document, 3).unwrap();
        assert_eq!(extraction.fidelity, EquipmentFidelity::Absent);
        assert!(extraction.subtotal.is_zero());
    }
}
