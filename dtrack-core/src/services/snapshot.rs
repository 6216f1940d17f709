//! Snapshot service - gather one immutable transaction set from all sources

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{CanonicalTransaction, LabelVocabulary};
use crate::ports::{RecordSource, UsdConverter};
use crate::services::normalize::{merge_by_id, sort_newest_first, Normalizer};

/// Outcome of fetching a single source
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub name: String,
    pub records: usize,
    pub error: Option<String>,
}

/// Merged, de-duplicated transactions plus what happened while collecting them
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    /// Newest first
    pub transactions: Vec<CanonicalTransaction>,
    pub sources: Vec<SourceReport>,
    pub warnings: Vec<String>,
    /// Records that normalized to nothing or lost a merge
    pub dropped: usize,
}

impl Snapshot {
    pub fn failed_sources(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|s| s.error.is_some())
    }
}

/// Snapshot service
pub struct SnapshotService {
    converter: Arc<dyn UsdConverter>,
    vocabulary: LabelVocabulary,
}

impl SnapshotService {
    pub fn new(converter: Arc<dyn UsdConverter>, vocabulary: LabelVocabulary) -> Self {
        Self {
            converter,
            vocabulary,
        }
    }

    /// Fetch every source once, normalize, merge by id and sort
    ///
    /// Sources are merged in the given order, so on an id collision the
    /// earlier source wins. A failing source contributes no records and is
    /// reported as a warning; collection itself never fails.
    pub fn collect(
        &self,
        sources: &[&dyn RecordSource],
        label_overrides: &HashMap<String, String>,
        now_ms: i64,
    ) -> Snapshot {
        let normalizer = Normalizer::new(self.converter.as_ref(), &self.vocabulary, now_ms)
            .with_label_overrides(label_overrides);

        let mut reports = Vec::with_capacity(sources.len());
        let mut warnings = Vec::new();
        let mut normalized = Vec::new();
        let mut read = 0usize;

        for source in sources {
            match source.fetch_records() {
                Ok(result) => {
                    read += result.records.len();
                    reports.push(SourceReport {
                        name: source.name().to_string(),
                        records: result.records.len(),
                        error: None,
                    });
                    warnings.extend(
                        result
                            .warnings
                            .into_iter()
                            .map(|w| format!("{}: {}", source.name(), w)),
                    );
                    normalized.extend(normalizer.normalize_all(&result.records));
                }
                Err(e) => {
                    warnings.push(format!("{}: {}", source.name(), e));
                    reports.push(SourceReport {
                        name: source.name().to_string(),
                        records: 0,
                        error: Some(e.to_string()),
                    });
                }
            }
        }

        let mut transactions = merge_by_id(normalized);
        sort_newest_first(&mut transactions);

        Snapshot {
            dropped: read.saturating_sub(transactions.len()),
            transactions,
            sources: reports,
            warnings,
        }
    }
}
