//! Raw record source port
//!
//! Defines the interface for gathering raw transaction records from
//! external collaborators (ledger index, CRUD backend, files, mock data).

use crate::domain::result::Result;
use crate::domain::SourceRecord;

/// Result of fetching records from a source
#[derive(Debug, Default)]
pub struct FetchRecordsResult {
    pub records: Vec<SourceRecord>,
    pub warnings: Vec<String>,
}

/// Raw record source trait
///
/// Implementations do their own I/O. The snapshot service calls every source
/// once per snapshot and treats a failing source as empty.
pub trait RecordSource: Send + Sync {
    /// Source name (e.g., "index", "backend", "file:txs.json")
    fn name(&self) -> &str;

    /// Fetch all records currently available
    fn fetch_records(&self) -> Result<FetchRecordsResult>;
}
