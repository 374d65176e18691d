//! family-ledger binary
//!
//! Processes bill text files into the ledger, then prints the balance
//! report. With no bills, only the report is printed.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

use interface_cli::{
    init_tracing, load_family_config, run_batch, AppSettings, BalanceReport, Cli, Ledger,
    RowTable,
};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let settings = AppSettings::load(Some(&cli.settings))
        .with_context(|| format!("loading settings from {}", cli.settings.display()))?;
    let settings = cli.apply(settings);
    init_tracing(&settings.log_level, settings.log_json);

    let config = load_family_config(&settings.family_config_path).with_context(|| {
        format!(
            "loading family configuration from {}",
            settings.family_config_path.display()
        )
    })?;
    let ledger = Ledger::for_config(&settings.ledger_path, &config);

    let runs = run_batch(
        &cli.bills,
        &config,
        &settings,
        (!cli.dry_run).then_some(&ledger),
    );

    let mut failed = 0;
    for run in &runs {
        println!("== {}", run.path.display());
        match &run.result {
            Ok((outcome, appended)) => {
                println!(
                    "{}: total due {}, allocated {}",
                    outcome.totals.cycle.label(),
                    outcome.totals.total_due,
                    outcome.allocated()
                );
                println!("{}", RowTable { rows: &outcome.rows, config: &config });
                for warning in &outcome.warnings {
                    println!("WARNING: {warning}");
                }
                match appended {
                    Some(summary) => println!(
                        "{} rows appended, {} already in {}",
                        summary.appended,
                        summary.skipped,
                        ledger.path().display()
                    ),
                    None => println!("dry run: ledger not written"),
                }
            }
            Err(err) => {
                failed += 1;
                println!("FAILED: {err}");
            }
        }
        println!();
    }

    let entries = ledger
        .read()
        .with_context(|| format!("reading ledger {}", ledger.path().display()))?;
    println!("{}", BalanceReport::from_entries(&entries, &config));

    if failed > 0 {
        eprintln!("{failed} of {} bills failed", runs.len());
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
