//! Labeled figures printed once on the bill
//!
//! Dates, the total due and the plan subtotals are simple label-and-amount
//! patterns. They are matched against the whole document with whitespace
//! collapsed, so a label wrapped onto a second line is still recognized.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use core_kernel::temporal::{parse_bill_date, resolve_month_day_window};
use core_kernel::{BillingCycle, Money, Warning};

use crate::error::ExtractionError;
use crate::patterns::{
    BILL_PERIOD_RE, CONNECTED_RE, DUE_BY_RE, ISSUE_DATE_RE, MONTH_WINDOW_RE, NETFLIX_RE,
    TOTAL_DUE_RE, VOICE_LINES_RE, WEARABLES_RE,
};

/// Plan subtotals from the plans banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSubtotals {
    pub voice: Money,
    pub reported_voice_lines: u32,
    pub wearable: Money,
    pub connected: Money,
}

/// Reads the billing cycle
///
/// The due date comes from `Your bill is due by ...`, falling back to the
/// issue date. The service window comes from `bill period Mon DD - Mon DD`,
/// falling back to the first `Mon DD - Mon DD` on the bill, and finally to
/// a one-month window ending on the due date.
pub fn extract_cycle(collapsed: &str) -> Result<BillingCycle, ExtractionError> {
    let issue_date = first_date(collapsed, &ISSUE_DATE_RE, "bill issue date")?;
    let due_by = first_date(collapsed, &DUE_BY_RE, "due date")?;

    let due_date = due_by
        .or(issue_date)
        .ok_or_else(|| ExtractionError::missing("bill issue date / due date"))?;
    let anchor_year = issue_date.unwrap_or(due_date).year();

    let window = BILL_PERIOD_RE
        .captures(collapsed)
        .or_else(|| MONTH_WINDOW_RE.captures(collapsed));

    let cycle = match window {
        Some(caps) => {
            let (start, end) = resolve_month_day_window(&caps[1], &caps[2], anchor_year)
                .map_err(|_| ExtractionError::MalformedDate {
                    section: "billing cycle".to_string(),
                    text: caps[0].to_string(),
                })?;
            BillingCycle::new(start, end, due_date).map_err(|_| ExtractionError::MalformedDate {
                section: "billing cycle".to_string(),
                text: caps[0].to_string(),
            })?
        }
        None => BillingCycle::ending_on(due_date),
    };

    debug!(start = %cycle.start, end = %cycle.end, due = %cycle.due_date, "billing cycle");
    Ok(cycle)
}

fn first_date(
    collapsed: &str,
    pattern: &regex::Regex,
    section: &str,
) -> Result<Option<NaiveDate>, ExtractionError> {
    match pattern.captures(collapsed) {
        Some(caps) => parse_bill_date(&caps[1])
            .map(Some)
            .map_err(|_| ExtractionError::MalformedDate {
                section: section.to_string(),
                text: caps[1].to_string(),
            }),
        None => Ok(None),
    }
}

/// Reads the total due
///
/// Every occurrence is read. When occurrences disagree the first is kept
/// and a `ConflictingTotals` warning is returned.
pub fn extract_total_due(collapsed: &str) -> Result<(Money, Option<Warning>), ExtractionError> {
    let mut values = Vec::new();
    for caps in TOTAL_DUE_RE.captures_iter(collapsed) {
        let value = Money::parse(&caps[1])
            .map_err(|_| ExtractionError::malformed_amount("total due", &caps[0]))?;
        values.push(value);
    }

    let first = *values
        .first()
        .ok_or_else(|| ExtractionError::missing("total due"))?;

    let mut distinct: Vec<Money> = Vec::new();
    for value in values {
        if !distinct.contains(&value) {
            distinct.push(value);
        }
    }

    let warning = (distinct.len() > 1).then(|| Warning::ConflictingTotals {
        label: "total due".to_string(),
        values: distinct,
    });

    Ok((first, warning))
}

/// Reads the plans banner
///
/// The voice figure is mandatory; wearables and connected devices default
/// to zero when the bill has none.
pub fn extract_plan_subtotals(collapsed: &str) -> Result<PlanSubtotals, ExtractionError> {
    let voice = VOICE_LINES_RE
        .captures(collapsed)
        .ok_or_else(|| ExtractionError::missing("voice lines"))?;
    let reported_voice_lines = voice[1]
        .parse::<u32>()
        .map_err(|_| ExtractionError::malformed_amount("voice lines", &voice[0]))?;
    let voice_subtotal = Money::parse(&voice[2])
        .map_err(|_| ExtractionError::malformed_amount("voice lines", &voice[0]))?;

    Ok(PlanSubtotals {
        voice: voice_subtotal,
        reported_voice_lines,
        wearable: optional_figure(collapsed, &WEARABLES_RE, "wearables")?,
        connected: optional_figure(collapsed, &CONNECTED_RE, "connected devices")?,
    })
}

fn optional_figure(
    collapsed: &str,
    pattern: &regex::Regex,
    section: &str,
) -> Result<Money, ExtractionError> {
    match pattern.captures(collapsed) {
        Some(caps) => Money::parse(&caps[1])
            .map_err(|_| ExtractionError::malformed_amount(section, &caps[0])),
        None => Ok(Money::zero()),
    }
}

/// Reads the Netflix add-on charge
///
/// Netflix can be mentioned several times (plan perk, add-on line, service
/// detail). The largest amount printed on a Netflix line is the charge.
pub fn extract_netflix(text: &str) -> Money {
    let amounts: Vec<Money> = NETFLIX_RE
        .captures_iter(text)
        .filter_map(|caps| Money::parse(&caps[1]).ok())
        .collect();
    debug!(?amounts, "netflix amounts");
    amounts.into_iter().max().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::collapse_whitespace;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cycle_from_bill_period() {
        let text = "Bill issue date Mar 03, 2025 Your bill is due by Mar 24, 2025. bill period Mar 04 - Apr 03";
        let cycle = extract_cycle(text).unwrap();
        assert_eq!(cycle.due_date, date(2025, 3, 24));
        assert_eq!(cycle.start, date(2025, 3, 4));
        assert_eq!(cycle.end, date(2025, 4, 3));
    }

    #[test]
    fn test_cycle_falls_back_to_issue_date() {
        let cycle = extract_cycle("Bill issue date Jun 24, 2025").unwrap();
        assert_eq!(cycle.due_date, date(2025, 6, 24));
        assert_eq!(cycle.end, date(2025, 6, 24));
    }

    #[test]
    fn test_cycle_wraps_year() {
        let text = "Bill issue date Dec 03, 2024 Regular charges Dec 04 - Jan 03";
        let cycle = extract_cycle(text).unwrap();
        assert_eq!(cycle.end, date(2025, 1, 3));
    }

    #[test]
    fn test_cycle_missing_dates() {
        let err = extract_cycle("TOTAL DUE $10.00").unwrap_err();
        assert_eq!(err.section(), Some("bill issue date / due date"));
    }

    #[test]
    fn test_total_due_conflict_keeps_first() {
        let (total, warning) = extract_total_due("TOTAL DUE $393.59 ... TOTAL DUE $395.00").unwrap();
        assert_eq!(total, Money::new(dec!(393.59)));
        assert!(matches!(warning, Some(Warning::ConflictingTotals { ref values, .. }) if values.len() == 2));
    }

    #[test]
    fn test_total_due_repeated_same_value() {
        let (_, warning) = extract_total_due("TOTAL DUE $393.59 TOTAL DUE $393.59").unwrap();
        assert!(warning.is_none());
    }

    #[test]
    fn test_plan_banner_wrapped() {
        let text = collapse_whitespace(
            "PLANS\n11 VOICE\nLINES = $260.00 | 1 CONNECTED DEVICE = $0.00 | 3 WEARABLES = $54.66",
        );
        let plans = extract_plan_subtotals(&text).unwrap();
        assert_eq!(plans.reported_voice_lines, 11);
        assert_eq!(plans.voice, Money::new(dec!(260.00)));
        assert_eq!(plans.connected, Money::zero());
        assert_eq!(plans.wearable, Money::new(dec!(54.66)));
    }

    #[test]
    fn test_missing_voice_banner() {
        let err = extract_plan_subtotals("3 WEARABLES = $54.66").unwrap_err();
        assert_eq!(err, ExtractionError::missing("voice lines"));
    }

    #[test]
    fn test_netflix_takes_largest() {
        let text = "Netflix Standard with ads included $0.00\nNetflix Premium add-on $18.00\n";
        assert_eq!(extract_netflix(text), Money::new(dec!(18.00)));
        assert_eq!(extract_netflix("no streaming"), Money::zero());
    }
}
