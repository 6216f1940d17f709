//! CLI command implementations

pub mod buckets;
pub mod demo;
pub mod logs;
pub mod metrics;
pub mod transactions;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::Args;
use dtrack_core::adapters::mock::mock_accounts;
use dtrack_core::adapters::{load_label_overrides, JsonFileSource, MockSource};
use dtrack_core::ports::RecordSource;
use dtrack_core::{DtrackContext, EntryPoint, LogEvent, LoggingService, Snapshot};

use crate::output;

/// Accounts generated by --demo
const DEMO_ACCOUNTS: usize = 3;

/// Where transactions come from, shared by every reporting command
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// JSON file of records (array, or object with a "transactions" array); repeatable
    #[arg(short, long = "input")]
    pub inputs: Vec<PathBuf>,
    /// JSON file of user label overrides keyed by transaction id
    #[arg(long)]
    pub labels: Option<PathBuf>,
    /// Include generated demo transactions
    #[arg(long)]
    pub demo: bool,
    /// Reference time (RFC 3339); defaults to the current time
    #[arg(long)]
    pub now: Option<String>,
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (it shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let dtrack_dir = get_dtrack_dir();
    std::fs::create_dir_all(&dtrack_dir).ok()?;
    LoggingService::new(&dtrack_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// Get the dtrack directory from environment or default
pub fn get_dtrack_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("DTRACK_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .map(|home| home.join(".dtrack"))
            .unwrap_or_else(|| PathBuf::from(".dtrack"))
    }
}

/// Get or create dtrack context
pub fn get_context() -> Result<DtrackContext> {
    let dtrack_dir = get_dtrack_dir();

    std::fs::create_dir_all(&dtrack_dir)
        .with_context(|| format!("Failed to create dtrack directory: {:?}", dtrack_dir))?;

    DtrackContext::new(&dtrack_dir).context("Failed to initialize dtrack context")
}

/// Reference time in the configured zone
///
/// This is the only place the system clock is read.
pub fn resolve_now(now: Option<&str>, tz: FixedOffset) -> Result<DateTime<FixedOffset>> {
    match now {
        Some(s) => {
            let parsed = DateTime::parse_from_rfc3339(s.trim())
                .with_context(|| format!("Invalid --now '{}': expected RFC 3339, e.g. 2025-06-15T12:00:00Z", s))?;
            Ok(parsed.with_timezone(&tz))
        }
        None => Ok(Utc::now().with_timezone(&tz)),
    }
}

/// Gather, normalize and merge every requested source
///
/// File sources come first, so on an id collision file records win over
/// demo records. Source failures are printed as warnings and logged.
pub fn collect_snapshot(
    ctx: &DtrackContext,
    args: &SnapshotArgs,
    now_ms: i64,
    command: &str,
    logger: &Option<LoggingService>,
) -> Result<Snapshot> {
    if args.inputs.is_empty() && !args.demo {
        anyhow::bail!("No transactions to read: pass --input FILE or --demo");
    }

    let overrides = match &args.labels {
        Some(path) => load_label_overrides(path)
            .with_context(|| format!("Failed to load label overrides from {}", path.display()))?,
        None => HashMap::new(),
    };

    let files: Vec<JsonFileSource> = args.inputs.iter().map(JsonFileSource::new).collect();
    let demo = args
        .demo
        .then(|| MockSource::new(mock_accounts(DEMO_ACCOUNTS), now_ms));

    let mut sources: Vec<&dyn RecordSource> = files.iter().map(|f| f as &dyn RecordSource).collect();
    if let Some(mock) = &demo {
        sources.push(mock);
    }

    let snapshot = ctx.snapshot_service.collect(&sources, &overrides, now_ms);

    for warning in &snapshot.warnings {
        output::warning(&format!("warning: {}", warning));
    }
    if let Some(l) = logger {
        let _ = l.log_snapshot(command, &snapshot);
    }

    Ok(snapshot)
}
