//! Demo command - generate deterministic sample records

use std::path::PathBuf;

use anyhow::{Context, Result};
use dtrack_core::adapters::mock::mock_accounts;
use dtrack_core::adapters::MockSource;
use dtrack_core::services::logging::EVENT_COMMAND_EXECUTED;
use dtrack_core::{LogEvent, SourceRecord};

use super::{get_context, get_logger, log_event, resolve_now};
use crate::output;

/// Write generated records as a JSON array readable by `--input`
pub fn run(
    accounts: usize,
    count: usize,
    custom: usize,
    output_path: Option<PathBuf>,
    now: Option<String>,
) -> Result<()> {
    let ctx = get_context()?;
    let logger = get_logger();
    log_event(&logger, LogEvent::new(EVENT_COMMAND_EXECUTED).with_command("demo"));

    let now = resolve_now(now.as_deref(), ctx.timezone())?;
    let source = MockSource::new(mock_accounts(accounts), now.timestamp_millis()).with_counts(count, custom);

    let records: Vec<SourceRecord> = source.transactions().into_iter().map(SourceRecord::from).collect();
    let content = serde_json::to_string_pretty(&records)?;

    match output_path {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            output::success(&format!("Wrote {} demo records to {}", records.len(), path.display()));
        }
        None => println!("{}", content),
    }

    Ok(())
}
