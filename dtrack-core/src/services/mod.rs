//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Normalization,
//! bucketing, metrics and formatting are pure functions; the service structs
//! bind them to configured collaborators.

pub mod bucketing;
pub mod export;
pub mod format;
pub mod logging;
pub mod metrics;
pub mod normalize;
mod snapshot;

pub use bucketing::{aggregate_by_period, bucket_totals, bucket_trend, roll_up_months};
pub use export::{export_buckets_csv, export_transactions_csv};
pub use format::{format_currency, format_percentage, truncate_principal};
pub use logging::{EntryPoint, EventCount, LogEntry, LogEvent, LogFilter, LoggingService, SourceStats};
pub use metrics::{compute_financial_metrics, percentage_change, period_metrics, MetricsService};
pub use normalize::{merge_by_id, parse_date_ms, sort_newest_first, Normalizer};
pub use snapshot::{Snapshot, SnapshotService, SourceReport};
