//! Billing cycle dates
//!
//! A bill covers a service window (the cycle) and is payable on a due date.
//! Ledger rows are dated with the due date and labelled with its month.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must not be after end {end}")]
    InvalidPeriod {
        start: String,
        end: String,
    },

    #[error("Unparsable date: {0}")]
    UnparsableDate(String),
}

/// The service window and payment date of one bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BillingCycle {
    /// First day of service (inclusive)
    pub start: NaiveDate,
    /// Last day of service (inclusive)
    pub end: NaiveDate,
    /// Date the bill is payable
    pub due_date: NaiveDate,
}

impl BillingCycle {
    /// Creates a new cycle
    pub fn new(start: NaiveDate, end: NaiveDate, due_date: NaiveDate) -> Result<Self, TemporalError> {
        if start > end {
            return Err(TemporalError::InvalidPeriod {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end, due_date })
    }

    /// A one-month cycle ending on the due date, used when the bill does
    /// not print its service window
    pub fn ending_on(due_date: NaiveDate) -> Self {
        let start = due_date
            .checked_sub_months(Months::new(1))
            .unwrap_or(due_date);
        Self {
            start,
            end: due_date,
            due_date,
        }
    }

    /// Month label used in ledger descriptions, e.g. `Mar 2025`
    pub fn label(&self) -> String {
        self.due_date.format("%b %Y").to_string()
    }

    /// Number of days in the service window
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Returns true if the date falls inside the service window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Parses a bill date such as `Mar 03, 2025`
pub fn parse_bill_date(text: &str) -> Result<NaiveDate, TemporalError> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDate::parse_from_str(&normalized, "%b %d, %Y")
        .map_err(|_| TemporalError::UnparsableDate(text.to_string()))
}

/// Resolves a `Mon DD` pair to dates, anchoring the year on `anchor`
///
/// When the end month precedes the start month the window crosses a year
/// boundary and the end moves into the following year.
pub fn resolve_month_day_window(
    start: &str,
    end: &str,
    anchor_year: i32,
) -> Result<(NaiveDate, NaiveDate), TemporalError> {
    let parse = |text: &str, year: i32| {
        let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
        NaiveDate::parse_from_str(&format!("{normalized} {year}"), "%b %d %Y")
            .map_err(|_| TemporalError::UnparsableDate(text.to_string()))
    };

    let start_date = parse(start, anchor_year)?;
    let mut end_date = parse(end, anchor_year)?;
    if end_date < start_date {
        end_date = parse(end, anchor_year + 1)?;
    }
    Ok((start_date, end_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_cycle_label_uses_due_month() {
        let cycle = BillingCycle::new(date(2025, 3, 4), date(2025, 4, 3), date(2025, 3, 24)).unwrap();
        assert_eq!(cycle.label(), "Mar 2025");
        assert_eq!(cycle.days(), 31);
    }

    #[test]
    fn test_inverted_cycle_rejected() {
        let result = BillingCycle::new(date(2025, 4, 3), date(2025, 3, 4), date(2025, 3, 24));
        assert!(matches!(result, Err(TemporalError::InvalidPeriod { .. })));
    }

    #[test]
    fn test_parse_bill_date() {
        assert_eq!(parse_bill_date("Mar 03, 2025").unwrap(), date(2025, 3, 3));
        assert!(parse_bill_date("March third").is_err());
    }

    #[test]
    fn test_window_wraps_year() {
        let (start, end) = resolve_month_day_window("Dec 04", "Jan 03", 2024).unwrap();
        assert_eq!(start, date(2024, 12, 4));
        assert_eq!(end, date(2025, 1, 3));
    }

    #[test]
    fn test_ending_on_fallback() {
        let cycle = BillingCycle::ending_on(date(2025, 6, 24));
        assert_eq!(cycle.start, date(2025, 5, 24));
        assert!(cycle.contains(date(2025, 6, 1)));
    }
}
