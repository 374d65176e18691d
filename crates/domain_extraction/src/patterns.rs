//! Text patterns recognized on the bill
//!
//! Patterns are compiled once and shared by every section scanner. Labeled
//! figures use `\s+` between words so that a label wrapped across two lines
//! still matches.

use once_cell::sync::Lazy;
use regex::Regex;

use core_kernel::{Money, PhoneNumber};

/// A dollar amount: `$33.34`, `-$3.96`, `$-3.96`, `$1,234.56`
pub const AMOUNT: &str = r"-?\$-?(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}";

const MONTH: &str = r"(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("bill pattern must compile")
}

pub static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| compile(AMOUNT));

/// A line holding nothing but one amount
pub static STANDALONE_AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"^\s*({AMOUNT})\s*$")));

/// A negative amount anywhere on a line
pub static NEGATIVE_AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?:-\$|\$-)(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2}"));

/// A line starting with a parenthesized-area-code phone number
pub static PHONE_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*\((\d{3})\)\s*(\d{3})-(\d{4})"));

/// An all-caps heading followed by its own amount, e.g. `SERVICES $18.00`
pub static HEADING_WITH_AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"^\s*[A-Z][A-Z0-9&/\- ]*[A-Z]\s+({AMOUNT})\s*$")));

pub static ISSUE_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)Bill\s+issue\s+date[:\s]*({MONTH}\s+\d{{1,2}},\s+\d{{4}})"
    ))
});

pub static DUE_BY_RE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(r"(?i)due\s+by\s+({MONTH}\s+\d{{1,2}},\s+\d{{4}})"))
});

pub static BILL_PERIOD_RE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"(?i)bill\s+period\s+({MONTH}\s+\d{{1,2}})\s*[-–]\s*({MONTH}\s+\d{{1,2}})"
    ))
});

/// Any `Mon DD - Mon DD` window
pub static MONTH_WINDOW_RE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"\b({MONTH}\s+\d{{1,2}})\s*[-–]\s*({MONTH}\s+\d{{1,2}})\b"
    ))
});

pub static TOTAL_DUE_RE: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"TOTAL\s+DUE\s*({AMOUNT}|\d+\.\d{{2}})")));

pub static VOICE_LINES_RE: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"(\d+)\s+VOICE\s+LINES?\s*=\s*({AMOUNT})")));

pub static WEARABLES_RE: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"WEARABLES?\s*=\s*({AMOUNT})")));

pub static CONNECTED_RE: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"CONNECTED\s+DEVICES?\s*=\s*({AMOUNT})")));

/// Netflix amounts on the same line as the word Netflix
pub static NETFLIX_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)Netflix[^\n$]{0,120}?(\$(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2})"));

pub static EQUIPMENT_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| compile(&format!(r"^\s*EQUIPMENT\s+({AMOUNT})\s*$")));

pub static BILL_SUMMARY_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)^\s*THIS\s+BILL\s+SUMMARY\b"));

pub static USAGE_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    compile(&format!(
        r"^\s*(?:CHARGED\s+USAGE|ONE-TIME\s+CHARGES)(?:\s+({AMOUNT}))?\s*$"
    ))
});

/// Headings that close the usage section even without an amount
pub static USAGE_TERMINATOR_RE: Lazy<Regex> =
    Lazy::new(|| compile(r"^\s*(?:OTHER|TAXES|SERVICES)\b|(?i:Bill\s+issue\s+date)"));

/// Line type column of a bill summary row
pub static LINE_KIND_RE: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b(Voice|Wearable|Connected(?:\s+[Dd]evice)?|Mobile\s+[Ii]nternet)\b")
});

/// Parses the phone number at the start of a line
pub fn leading_phone(line: &str) -> Option<(PhoneNumber, usize)> {
    let caps = PHONE_PREFIX_RE.captures(line)?;
    let end = caps.get(0)?.end();
    PhoneNumber::from_parts(&caps[1], &caps[2], &caps[3])
        .ok()
        .map(|phone| (phone, end))
}

/// Every amount on a line, in order of appearance
pub fn amounts_in(line: &str) -> Vec<Money> {
    AMOUNT_RE
        .find_iter(line)
        .filter_map(|m| Money::parse(m.as_str()).ok())
        .collect()
}

/// The amount of a line that holds nothing else
pub fn standalone_amount(line: &str) -> Option<Money> {
    STANDALONE_AMOUNT_RE
        .captures(line)
        .and_then(|caps| Money::parse(&caps[1]).ok())
}

/// Returns true for an all-caps heading carrying its own amount
pub fn is_heading_with_amount(line: &str) -> bool {
    HEADING_WITH_AMOUNT_RE.is_match(line)
}

/// Collapses every run of whitespace, line breaks included, to one space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
