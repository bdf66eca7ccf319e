//! Fixed-Width Batch CLI
//!
//! # Usage
//!
//! ```bash
//! fixed-width-batch ledger input.dat --valid valid.dat --reject reject.dat
//! fixed-width-batch copy infile.dat outfile.dat
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use fixed_width_batch::config::DEFAULT_COPY_VALUE;
use fixed_width_batch::{
    run, CopyConfig, FailurePolicy, LedgerConfig, LedgerOptions, Mode, Result, RunReport,
    TypePolicy, WithdrawalMode,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "fixed-width-batch",
    about = "Batch processor for fixed-width ledger and copy records."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply interest and fees; write valid and reject files.
    Ledger {
        /// Input file, one 35+ character record per line
        input: PathBuf,
        /// Output file for processed records
        #[arg(long)]
        valid: PathBuf,
        /// Output file for rejected lines
        #[arg(long)]
        reject: PathBuf,
        /// Withdrawal arithmetic
        #[arg(long = "withdraw-mode", value_enum, default_value_t = WithdrawMode::Legacy)]
        withdraw_mode: WithdrawMode,
        /// Accept transaction types other than DEPOSIT and WITHDRAW
        #[arg(long = "allow-unknown-types")]
        allow_unknown_types: bool,
        /// Abort the run at the first rejected record
        #[arg(long = "fail-fast")]
        fail_fast: bool,
        /// Date stamped on the summary (YYYY-MM-DD, default today)
        #[arg(long = "process-date")]
        process_date: Option<NaiveDate>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy records, injecting a default value into the third field.
    Copy {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Value written into the injected field
        #[arg(long = "default-value", default_value = DEFAULT_COPY_VALUE)]
        default_value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum WithdrawMode {
    /// balance + amount - fee
    Legacy,
    /// balance - amount - fee
    Debit,
}

impl From<WithdrawMode> for WithdrawalMode {
    fn from(mode: WithdrawMode) -> Self {
        match mode {
            WithdrawMode::Legacy => WithdrawalMode::Legacy,
            WithdrawMode::Debit => WithdrawalMode::Debit,
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = execute(Cli::parse()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    let mut json = false;
    let mode = match cli.command {
        Commands::Ledger {
            input,
            valid,
            reject,
            withdraw_mode,
            allow_unknown_types,
            fail_fast,
            process_date,
            json: as_json,
        } => {
            json = as_json;
            let options = LedgerOptions {
                withdrawal_mode: withdraw_mode.into(),
                type_policy: if allow_unknown_types {
                    TypePolicy::PassThrough
                } else {
                    TypePolicy::Strict
                },
                failure_policy: if fail_fast {
                    FailurePolicy::AbortOnFirstError
                } else {
                    FailurePolicy::SkipAndReport
                },
            };
            let mut config = LedgerConfig::new(input, valid, reject).with_options(options);
            if let Some(date) = process_date {
                config = config.with_process_date(date);
            }
            Mode::Ledger(config)
        }
        Commands::Copy {
            input,
            output,
            default_value,
        } => Mode::Copy(CopyConfig::new(input, output).with_default_value(default_value)),
    };

    let report = run(&mode)?;
    match &report {
        RunReport::Ledger(summary) if json => println!("{}", summary.to_json()?),
        _ => println!("{}", report),
    }

    Ok(())
}
