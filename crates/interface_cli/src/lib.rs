//! Family Ledger - Command-Line Orchestration
//!
//! Glue around the extraction and allocation engines:
//!
//! - [`settings`]: application settings from file and environment
//! - [`family_file`]: `family_config.yaml` loading and validation
//! - [`pipeline`]: one bill from text to ledger rows, and batches of bills
//! - [`ledger`]: the CSV ledger, appended with de-duplication
//! - [`report`]: per-family balances from the ledger
//!
//! The `family-ledger` binary wires these together.

pub mod cli;
pub mod error;
pub mod family_file;
pub mod ledger;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod settings;

pub use cli::Cli;
pub use error::{AppError, AppResult};
pub use family_file::{load_family_config, parse_family_config, FamilyConfigFile};
pub use ledger::{AppendSummary, Ledger, LedgerEntry};
pub use logging::init_tracing;
pub use pipeline::{process_bill, process_bill_file, run_batch, BillOutcome, BillRun};
pub use report::{BalanceReport, FamilyBalance, RowTable};
pub use settings::AppSettings;
