//! CSV ledger
//!
//! The ledger is one CSV file shared across bills: `Date Due`,
//! `Description`, `Category`, `Amount`, then one column per family code.
//! Rows are appended, never rewritten. A row whose date and description are
//! already present is skipped, so processing the same bill twice leaves the
//! file unchanged. Hand-entered rows (payments, corrections) are read back
//! like any other row.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use core_kernel::{FamilyId, Money};
use domain_allocation::{FamilyConfig, LedgerRow};

use crate::error::{AppError, AppResult};

pub const DATE_COLUMN: &str = "Date Due";
pub const DESCRIPTION_COLUMN: &str = "Description";
pub const CATEGORY_COLUMN: &str = "Category";
pub const AMOUNT_COLUMN: &str = "Amount";

/// Leading columns, before the family columns
pub const FIXED_COLUMNS: [&str; 4] = [DATE_COLUMN, DESCRIPTION_COLUMN, CATEGORY_COLUMN, AMOUNT_COLUMN];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One ledger row as stored in the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub amount: Money,
    /// Charge per family column; negative for payments
    pub charges: BTreeMap<FamilyId, Money>,
}

impl LedgerEntry {
    pub fn charge_for(&self, family: &FamilyId) -> Money {
        self.charges.get(family).copied().unwrap_or_default()
    }

    fn key(&self) -> (NaiveDate, String) {
        (self.date, self.description.clone())
    }
}

impl From<&LedgerRow> for LedgerEntry {
    fn from(row: &LedgerRow) -> Self {
        Self {
            date: row.date,
            description: row.description.clone(),
            category: row.category.ledger_category().to_string(),
            amount: row.amount,
            charges: row.amounts.clone(),
        }
    }
}

/// Outcome of one append
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppendSummary {
    pub appended: usize,
    /// Rows already present in the ledger
    pub skipped: usize,
}

/// A ledger file with its family columns
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    families: Vec<FamilyId>,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>, families: impl IntoIterator<Item = FamilyId>) -> Self {
        Self {
            path: path.into(),
            families: families.into_iter().collect(),
        }
    }

    /// Ledger with one column per configured family, in configuration order
    pub fn for_config(path: impl Into<PathBuf>, config: &FamilyConfig) -> Self {
        Self::new(path, config.family_ids().cloned())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header written to a new ledger file
    pub fn headers(&self) -> Vec<String> {
        FIXED_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.families.iter().map(|f| f.to_string()))
            .collect()
    }

    /// Reads every row of the ledger
    ///
    /// A missing or empty file reads as an empty ledger. Blank amount cells
    /// read as zero.
    ///
    /// # Errors
    ///
    /// Returns `MalformedLedger` for a missing date or description column,
    /// or a cell that is not a date or an amount.
    pub fn read(&self) -> AppResult<Vec<LedgerEntry>> {
        let Some(headers) = self.existing_headers()? else {
            return Ok(Vec::new());
        };

        let column = |name: &str| headers.iter().position(|h| h == name);
        let date_at = column(DATE_COLUMN)
            .ok_or_else(|| AppError::malformed_ledger(&self.path, "no 'Date Due' column"))?;
        let description_at = column(DESCRIPTION_COLUMN)
            .ok_or_else(|| AppError::malformed_ledger(&self.path, "no 'Description' column"))?;
        let category_at = column(CATEGORY_COLUMN);
        let amount_at = column(AMOUNT_COLUMN);
        let family_columns: Vec<(usize, FamilyId)> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !FIXED_COLUMNS.contains(&h.as_str()))
            .filter_map(|(i, h)| FamilyId::new(h).ok().map(|id| (i, id)))
            .collect();

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&self.path)?;
        let mut entries = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let line = index + 2;
            let cell = |at: usize| record.get(at).unwrap_or("").trim();

            let date = NaiveDate::parse_from_str(cell(date_at), DATE_FORMAT).map_err(|_| {
                AppError::malformed_ledger(
                    &self.path,
                    format!("line {line}: invalid date '{}'", cell(date_at)),
                )
            })?;
            let amount_cell = |at: usize| -> AppResult<Money> {
                let text = cell(at);
                if text.is_empty() {
                    return Ok(Money::zero());
                }
                Money::parse(text).map_err(|_| {
                    AppError::malformed_ledger(
                        &self.path,
                        format!("line {line}: invalid amount '{text}' in '{}'", headers[at]),
                    )
                })
            };

            let mut charges = BTreeMap::new();
            for (at, family) in &family_columns {
                charges.insert(family.clone(), amount_cell(*at)?);
            }

            entries.push(LedgerEntry {
                date,
                description: cell(description_at).to_string(),
                category: category_at.map(|at| cell(at).to_string()).unwrap_or_default(),
                amount: match amount_at {
                    Some(at) => amount_cell(at)?,
                    None => charges.values().copied().sum(),
                },
                charges,
            });
        }

        debug!(path = %self.path.display(), rows = entries.len(), "ledger read");
        Ok(entries)
    }

    /// Appends rows not yet in the ledger
    ///
    /// Creates the file, with its header, when it does not exist. Rows are
    /// written in the column order of the existing header.
    ///
    /// # Errors
    ///
    /// Returns `MalformedLedger` when the existing header lacks a column for
    /// a configured family, and `Io`/`Csv` when the file cannot be written.
    pub fn append(&self, rows: &[LedgerRow]) -> AppResult<AppendSummary> {
        let existing_headers = self.existing_headers()?;
        let headers = match &existing_headers {
            Some(headers) => {
                if let Some(missing) = self.families.iter().find(|f| !headers.contains(&f.to_string())) {
                    return Err(AppError::malformed_ledger(
                        &self.path,
                        format!("no column for family {missing}; add it to the header first"),
                    ));
                }
                headers.clone()
            }
            None => self.headers(),
        };

        let mut seen: HashSet<(NaiveDate, String)> =
            self.read()?.iter().map(LedgerEntry::key).collect();
        let mut summary = AppendSummary::default();
        let mut fresh = Vec::new();
        for row in rows {
            let entry = LedgerEntry::from(row);
            if seen.insert(entry.key()) {
                fresh.push(entry);
                summary.appended += 1;
            } else {
                debug!(description = %row.description, date = %row.date, "row already in ledger");
                summary.skipped += 1;
            }
        }

        if fresh.is_empty() && existing_headers.is_some() {
            info!(path = %self.path.display(), skipped = summary.skipped, "ledger already up to date");
            return Ok(summary);
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::io(&self.path, e))?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);

        if existing_headers.is_none() {
            writer.write_record(&headers)?;
        }
        for entry in &fresh {
            writer.write_record(render(entry, &headers))?;
        }
        writer.flush().map_err(|e| AppError::io(&self.path, e))?;

        info!(
            path = %self.path.display(),
            appended = summary.appended,
            skipped = summary.skipped,
            "ledger updated"
        );
        Ok(summary)
    }

    fn existing_headers(&self) -> AppResult<Option<Vec<String>>> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::io(&self.path, e)),
        }

        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&self.path)?;
        let headers = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
        Ok(Some(headers))
    }
}

/// Amount cell: two decimals, no currency symbol
pub fn format_amount(amount: Money) -> String {
    format!("{:.2}", amount.round_to_cents().amount())
}

fn render(entry: &LedgerEntry, headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|header| match header.as_str() {
            DATE_COLUMN => entry.date.format(DATE_FORMAT).to_string(),
            DESCRIPTION_COLUMN => entry.description.clone(),
            CATEGORY_COLUMN => entry.category.clone(),
            AMOUNT_COLUMN => format_amount(entry.amount),
            code => FamilyId::new(code)
                .map(|family| format_amount(entry.charge_for(&family)))
                .unwrap_or_default(),
        })
        .collect()
}
