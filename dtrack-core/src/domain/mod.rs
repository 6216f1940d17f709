//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with classification rules - no I/O or external dependencies.

mod account;
pub mod bucket;
pub mod labels;
pub mod metrics;
pub mod raw;
pub mod result;
mod transaction;

pub use account::{LabeledAccount, StoredAccount};
pub use bucket::{BucketMetric, BucketTotals, Granularity, TimeBucket};
pub use labels::{LabelSettings, LabelVocabulary};
pub use metrics::{BreakdownSlice, FinancialMetrics, FrequencyPoint, PeriodMetrics, RevenuePoint};
pub use raw::{CustomEntry, LedgerOperation, LedgerOperationKind, LedgerTransfer, LegacyMock, RawRecord, SourceRecord};
pub use transaction::{fingerprint, normalize_label, CanonicalTransaction, UNKNOWN_SENTINEL};
