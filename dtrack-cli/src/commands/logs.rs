//! `dt logs` - command history and per-source fetch health

use anyhow::Result;
use chrono::FixedOffset;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;
use dtrack_core::{EntryPoint, LogEntry, LogFilter, LoggingService, SourceStats};

use super::{get_context, get_dtrack_dir};
use crate::output::{create_table, format_timestamp, success};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent entries, newest first
    List {
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Only failed source fetches
        #[arg(long)]
        errors: bool,
        /// Only entries for this source (e.g. file:txs.json)
        #[arg(long)]
        source: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete entries older than a number of days
    Clear {
        #[arg(long, default_value = "30")]
        older_than_days: u64,
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,
        #[arg(long)]
        json: bool,
    },
    /// Fetches, failures and records read per source, plus event totals
    Stats {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let logger = LoggingService::new(&get_dtrack_dir(), EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::List {
            limit,
            errors,
            source,
            json,
        } => {
            let filter = LogFilter {
                errors_only: errors,
                source,
            };
            list(&logger, &filter, limit, json)
        }
        LogsCommands::Clear {
            older_than_days,
            yes,
            json,
        } => clear(&logger, older_than_days, yes || json, json),
        LogsCommands::Stats { json } => stats(&logger, json),
    }
}

fn list(logger: &LoggingService, filter: &LogFilter, limit: usize, json: bool) -> Result<()> {
    let entries = logger.recent(filter, limit)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("Nothing logged yet.");
        return Ok(());
    }

    let tz = get_context()?.timezone();
    let mut table = create_table();
    table.set_header(vec!["When", "Command", "Event", "Source", "Records", "Error"]);
    for entry in &entries {
        table.add_row(entry_row(entry, &tz));
    }
    println!("{}", table);
    Ok(())
}

fn entry_row(entry: &LogEntry, tz: &FixedOffset) -> Vec<String> {
    vec![
        format_timestamp(entry.timestamp_ms, tz),
        entry.command.clone().unwrap_or_default(),
        entry.event.clone(),
        entry.source.clone().unwrap_or_default(),
        entry.record_count.map(|n| n.to_string()).unwrap_or_default(),
        entry
            .error
            .as_deref()
            .map(|e| e.red().to_string())
            .unwrap_or_default(),
    ]
}

fn clear(logger: &LoggingService, days: u64, confirmed: bool, json: bool) -> Result<()> {
    let confirmed = confirmed
        || Confirm::new()
            .with_prompt(format!("Delete log entries older than {} days?", days))
            .default(false)
            .interact()?;
    if !confirmed {
        println!("Nothing deleted.");
        return Ok(());
    }

    let deleted = logger.prune_older_than_days(days)?;
    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        success(&format!("Deleted {} entries", deleted));
    }
    Ok(())
}

fn stats(logger: &LoggingService, json: bool) -> Result<()> {
    let sources = logger.source_stats()?;
    let events = logger.event_counts()?;
    let total = logger.count()?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "entries": total,
                "events": events,
                "sources": sources,
                "database": logger.db_path().to_string_lossy(),
            }))?
        );
        return Ok(());
    }

    if sources.is_empty() {
        println!("No source fetches logged yet.");
    } else {
        let tz = get_context()?.timezone();
        let mut table = create_table();
        table.set_header(vec!["Source", "Fetches", "Failures", "Records", "Last seen", "Last error"]);
        for s in &sources {
            table.add_row(source_row(s, &tz));
        }
        println!("{}", table);
    }

    let breakdown = events
        .iter()
        .map(|e| format!("{} {}", e.count, e.event))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{} entries in {}", total, logger.db_path().display());
    if !breakdown.is_empty() {
        println!("  {}", breakdown.dimmed());
    }
    Ok(())
}

fn source_row(stats: &SourceStats, tz: &FixedOffset) -> Vec<String> {
    let failures = if stats.failures > 0 {
        stats.failures.to_string().red().to_string()
    } else {
        "0".to_string()
    };
    vec![
        stats.source.clone(),
        stats.fetches.to_string(),
        failures,
        stats.records.to_string(),
        format_timestamp(stats.last_seen_ms, tz),
        stats.last_error.clone().unwrap_or_default(),
    ]
}
