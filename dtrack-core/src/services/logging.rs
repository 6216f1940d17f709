//! Event log in logs.duckdb
//!
//! Each CLI run records which command ran and, per record source, whether
//! the fetch worked and how many records it produced. Amounts, labels,
//! account names and transaction ids never reach the log.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use chrono::Utc;
use duckdb::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::log_migrations::LOG_MIGRATIONS;
use crate::services::snapshot::Snapshot;

pub const EVENT_COMMAND_EXECUTED: &str = "command_executed";
pub const EVENT_SNAPSHOT_COLLECTED: &str = "snapshot_collected";
pub const EVENT_SOURCE_FAILED: &str = "source_failed";
pub const EVENT_METRICS_COMPUTED: &str = "metrics_computed";

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Who is writing to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    /// Another program embedding dtrack-core
    Library,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Library => "library",
        }
    }
}

/// An event waiting to be written
#[derive(Debug, Clone, Default, Serialize)]
pub struct LogEvent {
    pub event: String,
    pub command: Option<String>,
    pub source: Option<String>,
    pub record_count: Option<i64>,
    pub error: Option<String>,
}

impl LogEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            ..Default::default()
        }
    }

    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Name of the record source the event is about
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.record_count = Some(i64::try_from(count).unwrap_or(i64::MAX));
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// A stored row of sys_logs
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp_ms: i64,
    pub entry_point: String,
    pub app_version: String,
    pub event: String,
    pub command: Option<String>,
    pub source: Option<String>,
    pub record_count: Option<i64>,
    pub error: Option<String>,
}

impl LogEntry {
    fn from_row(row: &Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            timestamp_ms: row.get("timestamp")?,
            entry_point: row.get("entry_point")?,
            app_version: row.get("app_version")?,
            event: row.get("event")?,
            command: row.get("command")?,
            source: row.get("source")?,
            record_count: row.get("record_count")?,
            error: row.get("error")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventCount {
    pub event: String,
    pub count: u64,
}

/// Fetch history of one record source across all logged snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    pub source: String,
    /// Successful fetches
    pub fetches: u64,
    pub failures: u64,
    /// Records read over all successful fetches
    pub records: i64,
    pub last_seen_ms: i64,
    /// Error of the most recent failure, if any
    pub last_error: Option<String>,
}

/// Which rows `recent` returns
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub errors_only: bool,
    pub source: Option<String>,
}

/// Writer and reader for logs.duckdb
///
/// The connection sits behind a mutex so one service can be shared
/// between threads; every call holds the lock for a single statement.
pub struct LoggingService {
    conn: Mutex<Connection>,
    db_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
}

impl LoggingService {
    /// Open logs.duckdb under `dtrack_dir`, creating and migrating it as needed
    pub fn new(
        dtrack_dir: &Path,
        entry_point: EntryPoint,
        app_version: impl Into<String>,
    ) -> Result<Self> {
        std::fs::create_dir_all(dtrack_dir)?;
        let db_path = dtrack_dir.join("logs.duckdb");
        let conn = Connection::open(&db_path)?;
        migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path,
            entry_point,
            app_version: app_version.into(),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow!("log database lock poisoned: {}", e))
    }

    /// Append one event stamped with the current wall-clock time
    pub fn log(&self, event: LogEvent) -> Result<()> {
        self.conn()?.execute(
            "INSERT INTO sys_logs \
             (timestamp, entry_point, app_version, event, command, source, record_count, error) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                Utc::now().timestamp_millis(),
                self.entry_point.as_str(),
                self.app_version,
                event.event,
                event.command,
                event.source,
                event.record_count,
                event.error,
            ],
        )?;
        Ok(())
    }

    pub fn log_command(&self, command: &str) -> Result<()> {
        self.log(LogEvent::new(EVENT_COMMAND_EXECUTED).with_command(command))
    }

    /// One row per source: `snapshot_collected` with its record count, or
    /// `source_failed` with its error
    pub fn log_snapshot(&self, command: &str, snapshot: &Snapshot) -> Result<()> {
        for report in &snapshot.sources {
            let event = match &report.error {
                Some(error) => LogEvent::new(EVENT_SOURCE_FAILED).with_error(error.as_str()),
                None => LogEvent::new(EVENT_SNAPSHOT_COLLECTED).with_count(report.records),
            };
            self.log(event.with_command(command).with_source(report.name.as_str()))?;
        }
        Ok(())
    }

    /// Newest rows first
    pub fn recent(&self, filter: &LogFilter, limit: usize) -> Result<Vec<LogEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT * FROM sys_logs \
             WHERE (NOT CAST(? AS BOOLEAN) OR error IS NOT NULL) \
               AND (CAST(? AS VARCHAR) IS NULL OR source = ?) \
             ORDER BY id DESC LIMIT ?",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(
            params![filter.errors_only, filter.source, filter.source, limit],
            LogEntry::from_row,
        )?;
        Ok(rows.collect::<duckdb::Result<Vec<_>>>()?)
    }

    pub fn count(&self) -> Result<u64> {
        let count = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM sys_logs", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Most frequent first
    pub fn event_counts(&self) -> Result<Vec<EventCount>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT event, COUNT(*) AS n FROM sys_logs GROUP BY event ORDER BY n DESC, event",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(EventCount {
                event: row.get(0)?,
                count: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<duckdb::Result<Vec<_>>>()?)
    }

    /// Per-source fetch history, sources with failures first
    pub fn source_stats(&self) -> Result<Vec<SourceStats>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT source, \
                    COUNT(*) FILTER (WHERE event = ?) AS fetches, \
                    COUNT(*) FILTER (WHERE event = ?) AS failures, \
                    CAST(COALESCE(SUM(record_count) FILTER (WHERE event = ?), 0) AS BIGINT), \
                    MAX(timestamp), \
                    arg_max(error, id) FILTER (WHERE event = ?) \
             FROM sys_logs \
             WHERE source IS NOT NULL AND event IN (?, ?) \
             GROUP BY source \
             ORDER BY failures DESC, source",
        )?;
        let rows = stmt.query_map(
            params![
                EVENT_SNAPSHOT_COLLECTED,
                EVENT_SOURCE_FAILED,
                EVENT_SNAPSHOT_COLLECTED,
                EVENT_SOURCE_FAILED,
                EVENT_SNAPSHOT_COLLECTED,
                EVENT_SOURCE_FAILED,
            ],
            |row| {
                Ok(SourceStats {
                    source: row.get(0)?,
                    fetches: row.get(1)?,
                    failures: row.get(2)?,
                    records: row.get(3)?,
                    last_seen_ms: row.get(4)?,
                    last_error: row.get(5)?,
                })
            },
        )?;
        Ok(rows.collect::<duckdb::Result<Vec<_>>>()?)
    }

    /// Delete rows stamped before `cutoff_ms`
    pub fn prune_before(&self, cutoff_ms: i64) -> Result<u64> {
        let deleted = self
            .conn()?
            .execute("DELETE FROM sys_logs WHERE timestamp < ?", [cutoff_ms])?;
        Ok(deleted as u64)
    }

    /// Delete rows older than `days` days
    pub fn prune_older_than_days(&self, days: u64) -> Result<u64> {
        let span = i64::try_from(days)
            .unwrap_or(i64::MAX)
            .saturating_mul(DAY_MS);
        self.prune_before(Utc::now().timestamp_millis().saturating_sub(span))
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

/// Apply every embedded migration not yet listed in sys_migrations
///
/// 000_migrations.sql only creates the tracking table if missing, so it is
/// run unconditionally first.
fn migrate(conn: &Connection) -> Result<()> {
    let Some((_, bootstrap)) = LOG_MIGRATIONS.first() else {
        return Ok(());
    };
    conn.execute_batch(bootstrap)?;

    let applied: Vec<String> = {
        let mut stmt = conn.prepare("SELECT migration_name FROM sys_migrations")?;
        let names = stmt.query_map([], |row| row.get(0))?;
        names.collect::<duckdb::Result<_>>()?
    };

    for (name, sql) in LOG_MIGRATIONS {
        if applied.iter().any(|a| a == name) {
            continue;
        }
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO sys_migrations (migration_name) VALUES (?)", [name])?;
    }
    Ok(())
}
