//! Raw transaction records as delivered by upstream collaborators
//!
//! Each known source format is one variant, selected by the explicit
//! `source` discriminant:
//!
//! ```json
//! { "source": "ledger_transfer", "id": 42, "owner": "...", "to": "...", ... }
//! { "source": "custom_entry", "id": "c-1", "amount_cents": 1250, ... }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::StoredAccount;
use super::transaction::CanonicalTransaction;

/// Default number of decimals for ledger base units (e8s)
pub const DEFAULT_LEDGER_DECIMALS: u32 = 8;

/// One upstream record, tagged by source format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RawRecord {
    /// Already canonical, passed through unchanged
    Canonical(CanonicalTransaction),
    /// Ledger index transfer between two accounts
    LedgerTransfer(LedgerTransfer),
    /// Ledger index mint/burn/approve event
    LedgerOperation(LedgerOperation),
    /// User-entered transaction from the CRUD backend
    CustomEntry(CustomEntry),
    /// Legacy/mock shape with a date string and a direction type
    LegacyMock(LegacyMock),
}

impl RawRecord {
    /// Record id if the variant carries one
    pub fn id(&self) -> Option<String> {
        match self {
            RawRecord::Canonical(tx) => Some(tx.id.clone()),
            RawRecord::LedgerTransfer(t) => Some(t.id.to_string()),
            RawRecord::LedgerOperation(o) => Some(o.id.to_string()),
            RawRecord::CustomEntry(c) => Some(c.id.clone()),
            RawRecord::LegacyMock(m) => m.id.clone(),
        }
    }

    /// Whether the record is backed by a ledger event
    pub fn is_ledger(&self) -> bool {
        matches!(
            self,
            RawRecord::LedgerTransfer(_) | RawRecord::LedgerOperation(_)
        )
    }
}

/// Transfer event from the ledger index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerTransfer {
    /// Index block id (nat64)
    pub id: u64,
    #[serde(default)]
    pub ledger_id: Option<String>,
    /// Identifier of the tracked account; decides the direction
    pub owner: String,
    #[serde(default)]
    pub account_label: String,
    pub from: String,
    pub to: String,
    /// Amount in ledger base units
    pub amount: u64,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub timestamp_nanos: Option<u64>,
}

impl LedgerTransfer {
    pub fn is_received(&self) -> bool {
        self.to == self.owner
    }
}

/// Kind of a non-transfer ledger event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerOperationKind {
    Mint,
    Burn,
    Approve,
}

/// Mint, burn or approve event from the ledger index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerOperation {
    pub id: u64,
    pub kind: LedgerOperationKind,
    #[serde(default)]
    pub ledger_id: Option<String>,
    #[serde(default)]
    pub account_label: String,
    pub amount: u64,
    #[serde(default)]
    pub decimals: Option<u32>,
    #[serde(default)]
    pub timestamp_nanos: Option<u64>,
}

/// Custom transaction as stored by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomEntry {
    pub id: String,
    /// Signed amount in USD cents
    pub amount_cents: i64,
    #[serde(default)]
    pub timestamp_ms: Option<u64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub account: Option<StoredAccount>,
}

/// A record as read from a source
///
/// Known variants are decoded eagerly; anything else is kept as plain JSON so
/// the normalizer can still salvage what it can.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceRecord {
    Typed(RawRecord),
    Untyped(serde_json::Value),
}

impl From<RawRecord> for SourceRecord {
    fn from(record: RawRecord) -> Self {
        SourceRecord::Typed(record)
    }
}

impl From<CanonicalTransaction> for SourceRecord {
    fn from(tx: CanonicalTransaction) -> Self {
        SourceRecord::Typed(RawRecord::Canonical(tx))
    }
}

/// Legacy mock record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyMock {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub date: Option<String>,
    /// "received" or anything else (treated as outbound)
    #[serde(default, rename = "type")]
    pub direction: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
}

impl LegacyMock {
    pub fn is_received(&self) -> bool {
        self.direction.as_deref() == Some("received")
    }
}
