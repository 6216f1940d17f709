//! dtrack CLI - financial metrics for ledger transactions in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dtrack_core::Granularity;

mod commands;
mod output;

use commands::{buckets, demo, logs, metrics, transactions, SnapshotArgs};

/// dtrack - revenue, expenses and profit from ledger and custom transactions
#[derive(Parser)]
#[command(name = "dt", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show revenue, expenses, profit and their month-over-month change
    Metrics {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show received totals per day or month
    Buckets {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Bucket size (day or month)
        #[arg(short, long, default_value = "day")]
        granularity: Granularity,
        /// Output as JSON
        #[arg(long, conflicts_with = "csv")]
        json: bool,
        /// Output as CSV
        #[arg(long)]
        csv: bool,
    },

    /// List the merged transactions, newest first
    Transactions {
        #[command(flatten)]
        snapshot: SnapshotArgs,
        /// Show at most N transactions
        #[arg(short, long)]
        limit: Option<usize>,
        /// Output as JSON
        #[arg(long, conflicts_with = "csv")]
        json: bool,
        /// Output as CSV
        #[arg(long)]
        csv: bool,
    },

    /// Generate deterministic demo records
    Demo {
        /// Number of labeled accounts
        #[arg(long, default_value = "3")]
        accounts: usize,
        /// Ledger transactions per account
        #[arg(long, default_value = "10")]
        count: usize,
        /// Custom (off-chain) transactions
        #[arg(long, default_value = "5")]
        custom: usize,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Reference time (RFC 3339); defaults to the current time
        #[arg(long)]
        now: Option<String>,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Metrics { snapshot, json } => metrics::run(snapshot, json),
        Commands::Buckets { snapshot, granularity, json, csv } => buckets::run(snapshot, granularity, json, csv),
        Commands::Transactions { snapshot, limit, json, csv } => transactions::run(snapshot, limit, json, csv),
        Commands::Demo { accounts, count, custom, output, now } => demo::run(accounts, count, custom, output, now),
        Commands::Logs { command } => logs::run(command),
    }
}
