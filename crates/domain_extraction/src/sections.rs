//! Section location within a page
//!
//! A section starts at a header line and runs until the next all-caps
//! heading bearing its own amount, an optional terminator line, or the end
//! of the page.

use regex::Regex;

use core_kernel::Money;

use crate::error::ExtractionError;
use crate::patterns::{is_heading_with_amount, AMOUNT_RE};

/// A located section of bill text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// Name used in errors and warnings
    pub name: &'static str,
    /// The header line itself
    pub header: &'a str,
    /// Amount printed on the header line, if any
    pub header_amount: Option<Money>,
    /// Body lines between the header and the end of the section
    pub lines: Vec<&'a str>,
}

impl<'a> Section<'a> {
    /// Returns true if the body holds no non-blank line
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}

/// Describes how to find one section
#[derive(Debug, Clone, Copy)]
pub struct SectionSpec<'r> {
    pub name: &'static str,
    pub header: &'r Regex,
    pub terminator: Option<&'r Regex>,
}

impl<'r> SectionSpec<'r> {
    pub fn new(name: &'static str, header: &'r Regex) -> Self {
        Self {
            name,
            header,
            terminator: None,
        }
    }

    pub fn with_terminator(mut self, terminator: &'r Regex) -> Self {
        self.terminator = Some(terminator);
        self
    }

    /// Finds the first occurrence of the section in `text`
    ///
    /// # Errors
    ///
    /// Returns `MalformedAmount` if the header carries an amount that
    /// cannot be read.
    pub fn locate<'a>(&self, text: &'a str) -> Result<Option<Section<'a>>, ExtractionError> {
        let mut lines = text.lines();

        let header = loop {
            match lines.next() {
                Some(line) if self.header.is_match(line) => break line,
                Some(_) => continue,
                None => return Ok(None),
            }
        };

        let header_amount = match AMOUNT_RE.find(header) {
            Some(m) => Some(
                Money::parse(m.as_str())
                    .map_err(|_| ExtractionError::malformed_amount(self.name, header))?,
            ),
            None => None,
        };

        let body = lines
            .take_while(|line| {
                !is_heading_with_amount(line)
                    && !self.terminator.is_some_and(|t| t.is_match(line))
            })
            .map(str::trim_end)
            .collect();

        Ok(Some(Section {
            name: self.name,
            header,
            header_amount,
            lines: body,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{EQUIPMENT_HEADER_RE, USAGE_HEADER_RE, USAGE_TERMINATOR_RE};
    use rust_decimal_macros::dec;

    const PAGE: &str = "\
EQUIPMENT $59.59
(410) 227-2625 Apple iPhone 15
$33.34

SERVICES $18.00
Netflix Premium $18.00";

    #[test]
    fn test_section_ends_at_next_heading() {
        let section = SectionSpec::new("equipment", &EQUIPMENT_HEADER_RE)
            .locate(PAGE)
            .unwrap()
            .unwrap();
        assert_eq!(section.header_amount, Some(Money::new(dec!(59.59))));
        assert_eq!(section.lines, vec!["(410) 227-2625 Apple iPhone 15", "$33.34", ""]);
    }

    #[test]
    fn test_section_runs_to_end_of_page() {
        let text = "EQUIPMENT $26.25\n(202) 258-6292 Galaxy $26.25";
        let section = SectionSpec::new("equipment", &EQUIPMENT_HEADER_RE)
            .locate(text)
            .unwrap()
            .unwrap();
        assert_eq!(section.lines.len(), 1);
    }

    #[test]
    fn test_missing_section() {
        let result = SectionSpec::new("equipment", &EQUIPMENT_HEADER_RE).locate("SERVICES $1.00");
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_terminator_closes_section() {
        let text = "CHARGED USAGE\n(410) 227-2625 Talk: 12 mins $0.50\nTAXES & FEES\nState tax $1.00";
        let section = SectionSpec::new("usage", &USAGE_HEADER_RE)
            .with_terminator(&USAGE_TERMINATOR_RE)
            .locate(text)
            .unwrap()
            .unwrap();
        assert_eq!(section.header_amount, None);
        assert_eq!(section.lines, vec!["(410) 227-2625 Talk: 12 mins $0.50"]);
    }
}
