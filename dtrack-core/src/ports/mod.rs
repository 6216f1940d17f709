//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external collaborators. The core depends
//! only on these traits, never on a concrete ledger client or backend.

mod pricing;
mod record_source;

pub use pricing::UsdConverter;
pub use record_source::{FetchRecordsResult, RecordSource};
