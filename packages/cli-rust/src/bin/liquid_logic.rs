//! `liquid-logic` binary.
//!
//! Usage:
//!   liquid-logic table --columns cols.json --rows rows.json --sort age:desc --page 2
//!   liquid-logic form --schema form.json --data data.json --output json
//!
//! Exit status is 0 on success, 1 when the form is invalid and 2 on input
//! errors.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use liquid_logic_cli::{run_form, run_table, Cli, Command, LogFormat, TableConfig};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    match format {
        LogFormat::Text => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Runs the selected command and prints its output; `Ok(false)` means an
/// invalid form.
fn run(cli: &Cli) -> Result<bool> {
    match &cli.command {
        Command::Table(args) => {
            let output = run_table(args, &TableConfig::default())
                .with_context(|| format!("table command failed for {}", args.rows.display()))?;
            println!("{output}");
            Ok(true)
        }
        Command::Form(args) => {
            let outcome = run_form(args)
                .with_context(|| format!("form command failed for {}", args.schema.display()))?;
            println!("{}", outcome.output);
            Ok(outcome.valid)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
