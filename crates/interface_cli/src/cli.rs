//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

use crate::settings::{AppSettings, DEFAULT_SETTINGS_FILE};

/// Split a shared family mobile bill into per-family ledger rows
#[derive(Debug, Clone, Parser)]
#[command(name = "family-ledger", version, about)]
pub struct Cli {
    /// Ledger CSV to append rows to
    #[arg(long = "ledger-csv", value_name = "PATH")]
    pub ledger_csv: Option<PathBuf>,

    /// Family configuration YAML
    #[arg(long = "family-config", value_name = "PATH")]
    pub family_config: Option<PathBuf>,

    /// Page expected to hold the equipment detail (1-based)
    #[arg(long = "detail-page", value_name = "N")]
    pub detail_page: Option<usize>,

    /// Print the rows without writing the ledger
    #[arg(long)]
    pub dry_run: bool,

    /// Settings file
    #[arg(long, value_name = "PATH", env = "FAMILY_LEDGER_SETTINGS", default_value = DEFAULT_SETTINGS_FILE)]
    pub settings: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Bill text files, pages separated by form feeds
    #[arg(value_name = "BILL_TEXT")]
    pub bills: Vec<PathBuf>,
}

impl Cli {
    /// Flags given on the command line override loaded settings
    pub fn apply(&self, mut settings: AppSettings) -> AppSettings {
        if let Some(path) = &self.ledger_csv {
            settings.ledger_path = path.clone();
        }
        if let Some(path) = &self.family_config {
            settings.family_config_path = path.clone();
        }
        if let Some(page) = self.detail_page {
            settings.equipment_detail_page = page;
        }
        settings.log_json |= self.log_json;
        settings
    }
}
