//! Voice-line enumeration and transfer detection
//!
//! The bill summary lists one row per line:
//!
//! ```text
//! (410) 227-2625 Voice $26.00 $33.34 - - $59.34
//! (240) 988-3906 - Old number Voice - - - - $0.00
//! ```
//!
//! A voice row whose plans column is empty (`-`), or whose description marks
//! it as an old number, is a transfer: it is counted in the lines the bill
//! reports but never in the per-line denominator. A row with a single amount
//! after the line type has no plans column at all; that amount is the row
//! total, so the row is treated the same way.
//!
//! A summary whose voice rows do not match the line count the bill reports,
//! even a summary with no voice rows at all, gets a line-count warning.

use tracing::{debug, warn};

use core_kernel::{PhoneNumber, Warning};

use crate::bill::{ExclusionReason, VoiceLineRecord};
use crate::error::ExtractionError;
use crate::page::BillDocument;
use crate::patterns::{leading_phone, BILL_SUMMARY_HEADER_RE, LINE_KIND_RE};
use crate::sections::SectionSpec;

/// Voice lines found in the bill summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceLineScan {
    pub records: Vec<VoiceLineRecord>,
    pub warnings: Vec<Warning>,
}

/// Placeholders the bill prints in an empty column
const EMPTY_COLUMN: &[&str] = &["-", "—", "–", "N/A"];

/// Walks the bill summary of the first page that has one
pub fn scan_voice_lines(
    document: &BillDocument,
    reported_lines: u32,
) -> Result<VoiceLineScan, ExtractionError> {
    let spec = SectionSpec::new("bill summary", &BILL_SUMMARY_HEADER_RE);

    let mut section = None;
    for page in document.pages() {
        if let Some(found) = spec.locate(&page.text)? {
            section = Some(found);
            break;
        }
    }

    let Some(section) = section else {
        debug!("no bill summary section; voice lines not enumerated");
        return Ok(VoiceLineScan::default());
    };

    let mut scan = VoiceLineScan::default();
    let mut lines = section.lines.iter().peekable();

    while let Some(line) = lines.next() {
        let Some((phone, end)) = leading_phone(line) else {
            continue;
        };

        let mut rest = line[end..].to_string();
        if !LINE_KIND_RE.is_match(&rest) {
            // A long description can push the line type onto the next line
            if let Some(next) = lines.next_if(|next| leading_phone(next).is_none()) {
                rest.push(' ');
                rest.push_str(next.trim());
            }
        }

        let Some(record) = parse_row(phone, &rest) else {
            continue;
        };

        if let Some(reason) = record.exclusion {
            let label = record
                .description
                .clone()
                .unwrap_or_else(|| reason.to_string());
            warn!(phone = %record.phone, %reason, "voice line excluded from per-line split");
            scan.warnings.push(Warning::ExcludedLine {
                phone: record.phone.clone(),
                reason: label,
            });
        }

        debug!(phone = %record.phone, plan = ?record.plan, billable = record.is_billable(), "voice line");
        scan.records.push(record);
    }

    let enumerated = scan.records.len() as u32;
    if enumerated != reported_lines {
        warn!(reported_lines, enumerated, "voice line count mismatch");
        scan.warnings.push(Warning::LineCountMismatch {
            reported: reported_lines,
            enumerated,
        });
    }

    Ok(scan)
}

/// Parses the part of a summary row after the phone number
///
/// Returns `None` for rows that are not voice lines.
fn parse_row(phone: PhoneNumber, rest: &str) -> Option<VoiceLineRecord> {
    let kind = LINE_KIND_RE.find(rest)?;
    if kind.as_str() != "Voice" {
        return None;
    }

    let description = rest[..kind.start()]
        .trim()
        .trim_start_matches(['-', '–', '—'])
        .trim();
    let description = (!description.is_empty()).then(|| description.to_string());

    // The last column is the row total, never the plan
    let columns: Vec<&str> = rest[kind.end()..].split_whitespace().collect();
    let plan = match columns.as_slice() {
        [plan, _, ..] if !EMPTY_COLUMN.contains(plan) => Some(plan.to_string()),
        _ => None,
    };

    let exclusion = classify(description.as_deref(), plan.is_some());

    Some(VoiceLineRecord {
        phone,
        plan,
        description,
        exclusion,
    })
}

fn classify(description: Option<&str>, has_plan: bool) -> Option<ExclusionReason> {
    let description = description.unwrap_or_default().to_lowercase();

    if description.contains("remov") || description.contains("cancel") {
        Some(ExclusionReason::Removed)
    } else if !has_plan || description.contains("old number") || description.contains("transfer") {
        Some(ExclusionReason::Transferred)
    } else {
        None
    }
}
