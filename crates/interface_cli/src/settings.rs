//! Application settings
//!
//! Layered the usual way: built-in defaults, then an optional
//! `family-ledger.toml`, then `FAMILY_LEDGER_*` environment variables.
//! Command-line flags are applied on top by the binary.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use domain_extraction::DEFAULT_DETAIL_PAGE;

use crate::error::AppResult;

/// Default settings file, looked up in the working directory
pub const DEFAULT_SETTINGS_FILE: &str = "family-ledger.toml";

/// Prefix of the environment variables that override settings
pub const ENV_PREFIX: &str = "FAMILY_LEDGER";

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Ledger CSV the rows are appended to
    pub ledger_path: PathBuf,
    /// Family configuration YAML
    pub family_config_path: PathBuf,
    /// 1-based page expected to hold the equipment detail
    pub equipment_detail_page: usize,
    /// Log filter used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("expenses.csv"),
            family_config_path: PathBuf::from("family_config.yaml"),
            equipment_detail_page: DEFAULT_DETAIL_PAGE,
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl AppSettings {
    /// Loads settings from an optional file and the environment
    ///
    /// A missing settings file is not an error.
    ///
    /// # Errors
    ///
    /// Returns `Settings` when the file cannot be parsed or a value has the
    /// wrong type.
    pub fn load(settings_file: Option<&Path>) -> AppResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = settings_file {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Loads settings from TOML text, without the environment
    pub fn from_toml(text: &str) -> AppResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
