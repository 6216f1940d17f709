//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - Fixed-rate price table for UsdConverter
//! - JSON files for RecordSource (index/backend exports)
//! - Deterministic mock data for RecordSource (demos and tests)

pub mod file_source;
pub mod mock;
pub mod pricing;

pub use file_source::{load_label_overrides, JsonFileSource};
pub use mock::MockSource;
pub use pricing::FixedRateConverter;
