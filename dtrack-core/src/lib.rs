//! dtrack core - transaction normalization and financial metrics
//!
//! This crate implements the dashboard's computation core following
//! hexagonal architecture:
//!
//! - **domain**: Canonical transactions, raw record variants, label vocabulary, buckets, metrics
//! - **ports**: Trait definitions for external collaborators (RecordSource, UsdConverter)
//! - **services**: Normalization, bucketing, metrics, formatting, export, logging
//! - **adapters**: Concrete collaborators (JSON files, mock data, fixed-rate pricing)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use chrono::FixedOffset;

use adapters::FixedRateConverter;
use config::Config;
use ports::UsdConverter;
use services::{MetricsService, SnapshotService};

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{
    CanonicalTransaction, FinancialMetrics, Granularity, LabelVocabulary, RawRecord, SourceRecord,
    TimeBucket,
};
pub use services::{EntryPoint, LogEntry, LogEvent, LogFilter, LoggingService, Snapshot, SourceStats};

/// Main context for dtrack operations
///
/// Built once at startup from the data directory and passed by reference
/// to whatever needs it. Holds the configuration and the services bound
/// to it; it never caches transactions or metrics.
pub struct DtrackContext {
    pub dtrack_dir: PathBuf,
    pub config: Config,
    pub converter: Arc<dyn UsdConverter>,
    pub snapshot_service: SnapshotService,
    pub metrics_service: MetricsService,
}

impl DtrackContext {
    /// Create a new dtrack context
    pub fn new(dtrack_dir: &Path) -> Result<Self> {
        let config = Config::load(dtrack_dir)?;
        Ok(Self::with_config(dtrack_dir, config))
    }

    /// Create a context from an already loaded configuration
    pub fn with_config(dtrack_dir: &Path, config: Config) -> Self {
        let vocabulary = config.vocabulary();
        let converter: Arc<dyn UsdConverter> = Arc::new(FixedRateConverter::from_settings(&config.pricing));

        let snapshot_service = SnapshotService::new(Arc::clone(&converter), vocabulary.clone());
        let metrics_service = MetricsService::new(vocabulary);

        Self {
            dtrack_dir: dtrack_dir.to_path_buf(),
            config,
            converter,
            snapshot_service,
            metrics_service,
        }
    }

    /// Zone used for local day/month boundaries
    pub fn timezone(&self) -> FixedOffset {
        self.config.timezone()
    }
}
