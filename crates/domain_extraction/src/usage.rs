//! One-time usage charges
//!
//! ```text
//! CHARGED USAGE $2.34
//! (410) 227-2625 International call to Canada $0.50
//! (347) 636-6212 Data pass
//!   $1.84
//! ```
//!
//! A phone-prefixed line opens a record. Its charge is the first amount on
//! that line, or on the next continuation line when the phone line has none.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use core_kernel::{Money, PhoneNumber, Warning};

use crate::bill::UsageCharge;
use crate::error::ExtractionError;
use crate::page::BillDocument;
use crate::patterns::{amounts_in, leading_phone, USAGE_HEADER_RE, USAGE_TERMINATOR_RE};
use crate::sections::SectionSpec;

/// Usage charges found on the bill
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageScan {
    /// One charge per phone number, in number order
    pub charges: Vec<UsageCharge>,
    pub warnings: Vec<Warning>,
}

impl UsageScan {
    pub fn total(&self) -> Money {
        self.charges.iter().map(|charge| charge.amount).sum()
    }
}

/// Scans every usage section of the bill
pub fn extract_usage(document: &BillDocument) -> Result<UsageScan, ExtractionError> {
    let spec = SectionSpec::new("usage", &USAGE_HEADER_RE).with_terminator(&USAGE_TERMINATOR_RE);

    let mut per_phone: BTreeMap<PhoneNumber, Money> = BTreeMap::new();
    let mut warnings = Vec::new();

    for page in document.pages() {
        let Some(section) = spec.locate(&page.text)? else {
            continue;
        };

        let records = scan_usage_lines(section.lines.iter().copied());
        let section_total: Money = records.iter().map(|(_, amount)| *amount).sum();

        if let Some(expected) = section.header_amount {
            if !section_total.within(&expected, Money::CENT) {
                warn!(page = page.index, %expected, parsed = %section_total, "usage section does not reconcile");
                warnings.push(Warning::reconciliation("usage", expected, section_total));
            }
        }

        for (phone, amount) in records {
            *per_phone.entry(phone).or_default() += amount;
        }
    }

    let charges = per_phone
        .into_iter()
        .map(|(phone, amount)| UsageCharge { phone, amount })
        .collect::<Vec<_>>();
    debug!(charges = charges.len(), "usage charges");

    Ok(UsageScan { charges, warnings })
}

/// Walks the body of one usage section
///
/// Returns one `(phone, amount)` pair per record; a record whose charge is
/// never printed is dropped.
pub fn scan_usage_lines<'a, I>(lines: I) -> Vec<(PhoneNumber, Money)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut records = Vec::new();
    let mut open: Option<PhoneNumber> = None;

    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if let Some(phone) = open.take() {
                debug!(%phone, "usage record without amount");
            }
            continue;
        }

        if let Some((phone, end)) = leading_phone(trimmed) {
            match amounts_in(&trimmed[end..]).first() {
                Some(amount) => {
                    records.push((phone, *amount));
                    open = None;
                }
                None => open = Some(phone),
            }
            continue;
        }

        if let Some(phone) = open.take() {
            match amounts_in(trimmed).first() {
                Some(amount) => records.push((phone, *amount)),
                None => debug!(%phone, "usage record without amount"),
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn phone(number: &str) -> PhoneNumber {
        PhoneNumber::parse(number).unwrap()
    }

    #[test]
    fn test_amount_on_phone_line() {
        let records = scan_usage_lines(vec!["(410) 227-2625 International call $0.50"]);
        assert_eq!(records, vec![(phone("4102272625"), Money::new(dec!(0.50)))]);
    }

    #[test]
    fn test_amount_on_continuation_line() {
        let records = scan_usage_lines(vec!["(347) 636-6212 Data pass", "  $1.84"]);
        assert_eq!(records, vec![(phone("3476366212"), Money::new(dec!(1.84)))]);
    }

    #[test]
    fn test_blank_line_closes_record() {
        let records = scan_usage_lines(vec!["(347) 636-6212 Data pass", "", "$1.84"]);
        assert!(records.is_empty());
    }

    #[test]
    fn test_same_number_summed() {
        let document = BillDocument::from_pages(vec![
            "CHARGED USAGE $2.34\n\
             (410) 227-2625 Call to Canada $0.50\n\
             (410) 227-2625 Data pass $1.84\n\
             TAXES & FEES\n\
             (410) 227-2625 Regulatory fee $3.00",
        ]);
        let scan = extract_usage(&document).unwrap();
        assert_eq!(scan.charges.len(), 1);
        assert_eq!(scan.charges[0].amount, Money::new(dec!(2.34)));
        assert!(scan.warnings.is_empty());
    }

    #[test]
    fn test_header_amount_reconciled() {
        let document = BillDocument::from_pages(vec![
            "ONE-TIME CHARGES $5.00\n(410) 227-2625 Call to Canada $0.50",
        ]);
        let scan = extract_usage(&document).unwrap();
        assert_eq!(scan.warnings.len(), 1);
        assert!(scan.warnings[0].is_reconciliation());
    }

    #[test]
    fn test_no_usage_section() {
        let document = BillDocument::from_pages(vec!["EQUIPMENT $10.00"]);
        assert_eq!(extract_usage(&document).unwrap(), UsageScan::default());
    }
}
