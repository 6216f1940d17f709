//! Normalization - raw records to canonical transactions
//!
//! Every known source format has one conversion function, selected by the
//! record's variant. Conversion never fails: missing or garbled fields are
//! replaced by defaults (amount 0, timestamp `now`, "unknown" strings).
//! Untagged objects get their variant from their field shape; canonical
//! records may spell the timestamp `timestamp_ms` or `timestampMs`.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Value as JsonValue};

use crate::domain::labels::{APPROVE_LABEL, CUSTOM_LABEL};
use crate::domain::raw::DEFAULT_LEDGER_DECIMALS;
use crate::domain::{
    fingerprint, CanonicalTransaction, CustomEntry, LabelVocabulary, LedgerOperation,
    LedgerOperationKind, LedgerTransfer, LegacyMock, RawRecord, SourceRecord, UNKNOWN_SENTINEL,
};
use crate::ports::UsdConverter;

/// Largest scale a Decimal can carry
const MAX_DECIMAL_SCALE: u32 = 28;

/// Converts raw records into canonical transactions
///
/// Holds the collaborators a conversion may need: the USD converter for
/// ledger amounts, the vocabulary for default ledger labels, user label
/// overrides, and the reference time substituted for missing timestamps.
pub struct Normalizer<'a> {
    converter: &'a dyn UsdConverter,
    vocabulary: &'a LabelVocabulary,
    label_overrides: Option<&'a HashMap<String, String>>,
    now_ms: i64,
}

impl<'a> Normalizer<'a> {
    pub fn new(converter: &'a dyn UsdConverter, vocabulary: &'a LabelVocabulary, now_ms: i64) -> Self {
        Self {
            converter,
            vocabulary,
            label_overrides: None,
            now_ms,
        }
    }

    /// Apply user-set labels (keyed by transaction id) to ledger records
    pub fn with_label_overrides(mut self, overrides: &'a HashMap<String, String>) -> Self {
        self.label_overrides = Some(overrides);
        self
    }

    /// Normalize a record read from a source
    ///
    /// Returns `None` only for empty/falsy input.
    pub fn normalize(&self, record: &SourceRecord) -> Option<CanonicalTransaction> {
        match record {
            SourceRecord::Typed(raw) => Some(self.normalize_record(raw)),
            SourceRecord::Untyped(value) => self.normalize_value(value),
        }
    }

    /// Normalize a typed record; always succeeds
    pub fn normalize_record(&self, record: &RawRecord) -> CanonicalTransaction {
        match record {
            RawRecord::Canonical(tx) => tx.clone(),
            RawRecord::LedgerTransfer(transfer) => self.from_transfer(transfer),
            RawRecord::LedgerOperation(operation) => self.from_operation(operation),
            RawRecord::CustomEntry(entry) => self.from_custom(entry),
            RawRecord::LegacyMock(mock) => self.from_legacy(mock),
        }
    }

    /// Normalize arbitrary JSON
    ///
    /// Tagged objects go through their variant. Untagged objects get a
    /// discriminant inferred once (canonical fields, or a legacy `date`) and
    /// are then dispatched the same way; anything still unreadable falls back
    /// to field-by-field defaults.
    pub fn normalize_value(&self, value: &JsonValue) -> Option<CanonicalTransaction> {
        if is_falsy(value) {
            return None;
        }

        let map = match value {
            JsonValue::Object(map) => map,
            _ => return Some(self.defaults_only()),
        };

        if let Ok(record) = serde_json::from_value::<RawRecord>(value.clone()) {
            return Some(self.normalize_record(&record));
        }

        if !map.contains_key("source") {
            if let Some(source) = infer_source(map) {
                let mut tagged = map.clone();
                tagged.insert("source".to_string(), JsonValue::String(source.to_string()));
                if let Ok(record) = serde_json::from_value::<RawRecord>(JsonValue::Object(tagged)) {
                    return Some(self.normalize_record(&record));
                }
            }
        }

        Some(self.best_effort(map))
    }

    /// Normalize many records, dropping only the empty ones
    pub fn normalize_all<'r>(
        &self,
        records: impl IntoIterator<Item = &'r SourceRecord>,
    ) -> Vec<CanonicalTransaction> {
        records.into_iter().filter_map(|r| self.normalize(r)).collect()
    }

    // =========================================================================
    // Per-variant conversions
    // =========================================================================

    fn from_transfer(&self, transfer: &LedgerTransfer) -> CanonicalTransaction {
        let id = transfer.id.to_string();
        let tokens = scale_base_units(transfer.amount, transfer.decimals);
        let usd = self.converter.to_usd(transfer.ledger_id.as_deref(), tokens);

        let (amount, default_label) = if transfer.is_received() {
            (usd, self.vocabulary.received.as_str())
        } else {
            (-usd, self.vocabulary.sent.as_str())
        };

        let label = self.override_for(&id).unwrap_or(default_label).to_string();
        CanonicalTransaction::new(
            id,
            amount,
            self.nanos_to_ms(transfer.timestamp_nanos),
            account_or_unknown(&transfer.account_label),
            label,
        )
    }

    fn from_operation(&self, operation: &LedgerOperation) -> CanonicalTransaction {
        let id = operation.id.to_string();
        let tokens = scale_base_units(operation.amount, operation.decimals);

        let (amount, default_label) = match operation.kind {
            LedgerOperationKind::Mint => (
                self.converter.to_usd(operation.ledger_id.as_deref(), tokens),
                self.vocabulary.received.as_str(),
            ),
            LedgerOperationKind::Burn => (
                -self.converter.to_usd(operation.ledger_id.as_deref(), tokens),
                self.vocabulary.sent.as_str(),
            ),
            // Approvals grant an allowance; no value moves
            LedgerOperationKind::Approve => (Decimal::ZERO, APPROVE_LABEL),
        };

        let label = self.override_for(&id).unwrap_or(default_label).to_string();
        CanonicalTransaction::new(
            id,
            amount,
            self.nanos_to_ms(operation.timestamp_nanos),
            account_or_unknown(&operation.account_label),
            label,
        )
    }

    fn from_custom(&self, entry: &CustomEntry) -> CanonicalTransaction {
        let timestamp_ms = entry
            .timestamp_ms
            .filter(|ts| *ts > 0)
            .and_then(|ts| i64::try_from(ts).ok())
            .unwrap_or(self.now_ms);

        let label = entry
            .label
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .unwrap_or(CUSTOM_LABEL);

        let account = entry
            .account
            .as_ref()
            .map(|a| a.key())
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| CUSTOM_LABEL.to_string());

        CanonicalTransaction::new(
            entry.id.clone(),
            Decimal::new(entry.amount_cents, 2),
            timestamp_ms,
            account,
            label,
        )
        .custom()
    }

    fn from_legacy(&self, mock: &LegacyMock) -> CanonicalTransaction {
        let magnitude = mock.amount.unwrap_or(Decimal::ZERO).abs();
        let amount = if mock.is_received() { magnitude } else { -magnitude };

        let timestamp_ms = mock
            .date
            .as_deref()
            .and_then(parse_date_ms)
            .unwrap_or(self.now_ms);

        let account = mock.account.as_deref().unwrap_or("");
        let id = match mock.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => fingerprint(
                "legacy",
                &[
                    mock.date.as_deref().unwrap_or(""),
                    &magnitude.to_string(),
                    mock.direction.as_deref().unwrap_or(""),
                    account,
                ],
            ),
        };

        CanonicalTransaction::new(
            id,
            amount,
            timestamp_ms,
            account_or_unknown(account),
            mock.label.as_deref().map(account_or_unknown).unwrap_or_else(|| UNKNOWN_SENTINEL.to_string()),
        )
    }

    /// Field-by-field salvage of an unrecognized object
    fn best_effort(&self, map: &Map<String, JsonValue>) -> CanonicalTransaction {
        let id = match map.get("id") {
            Some(JsonValue::String(s)) => s.clone(),
            Some(JsonValue::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let amount = map.get("amount").and_then(json_decimal).unwrap_or(Decimal::ZERO);

        let timestamp_ms = map
            .get("timestamp_ms")
            .or_else(|| map.get("timestampMs"))
            .and_then(json_millis)
            .or_else(|| map.get("date").and_then(|d| d.as_str()).and_then(parse_date_ms))
            .unwrap_or(self.now_ms);

        let text = |key: &str| {
            map.get(key)
                .and_then(|v| v.as_str())
                .map(account_or_unknown)
                .unwrap_or_else(|| UNKNOWN_SENTINEL.to_string())
        };

        let is_custom = map
            .get("is_custom")
            .or_else(|| map.get("isCustom"))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let mut tx = CanonicalTransaction::new(id, amount, timestamp_ms, text("account"), text("label"));
        tx.is_custom = is_custom;
        tx
    }

    fn defaults_only(&self) -> CanonicalTransaction {
        CanonicalTransaction::new("", Decimal::ZERO, self.now_ms, UNKNOWN_SENTINEL, UNKNOWN_SENTINEL)
    }

    fn override_for(&self, id: &str) -> Option<&str> {
        self.label_overrides
            .and_then(|m| m.get(id))
            .map(String::as_str)
            .filter(|l| !l.trim().is_empty())
    }

    /// Ledger nanoseconds to milliseconds; missing or zero means `now`
    fn nanos_to_ms(&self, nanos: Option<u64>) -> i64 {
        match nanos {
            Some(n) if n > 0 => (n / 1_000_000) as i64,
            _ => self.now_ms,
        }
    }
}

// =============================================================================
// Merging
// =============================================================================

/// De-duplicate by id, keeping the first occurrence and the input order
///
/// Records without an id cannot be told apart and are dropped.
pub fn merge_by_id(transactions: impl IntoIterator<Item = CanonicalTransaction>) -> Vec<CanonicalTransaction> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for tx in transactions {
        if tx.id.is_empty() {
            continue;
        }
        if seen.insert(tx.id.clone()) {
            merged.push(tx);
        }
    }

    merged
}

/// Sort newest first (the order transaction lists are displayed in)
pub fn sort_newest_first(transactions: &mut [CanonicalTransaction]) {
    transactions.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
}

// =============================================================================
// Helpers
// =============================================================================

fn is_falsy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => true,
        JsonValue::Bool(b) => !b,
        JsonValue::Number(n) => n.as_f64().map_or(true, |f| f == 0.0),
        JsonValue::String(s) => s.is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
    }
}

/// Pick a variant for an untagged object
fn infer_source(map: &Map<String, JsonValue>) -> Option<&'static str> {
    let numeric = |key: &str| map.get(key).map_or(false, |v| v.is_number());
    let timestamped = numeric("timestamp_ms") || numeric("timestampMs");
    if numeric("amount") && timestamped && map.get("id").map_or(false, |v| v.is_string()) {
        return Some("canonical");
    }
    if map.get("date").map_or(false, |v| v.is_string()) {
        return Some("legacy_mock");
    }
    None
}

fn account_or_unknown(value: &str) -> String {
    if value.trim().is_empty() {
        UNKNOWN_SENTINEL.to_string()
    } else {
        value.to_string()
    }
}

/// Base units to tokens (`amount / 10^decimals`)
fn scale_base_units(amount: u64, decimals: Option<u32>) -> Decimal {
    let scale = decimals.unwrap_or(DEFAULT_LEDGER_DECIMALS).min(MAX_DECIMAL_SCALE);
    Decimal::try_from_i128_with_scale(i128::from(amount), scale).unwrap_or(Decimal::ZERO)
}

fn json_decimal(value: &JsonValue) -> Option<Decimal> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .map(Decimal::from)
            .or_else(|| n.as_f64().and_then(Decimal::from_f64)),
        JsonValue::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn json_millis(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        _ => None,
    }
}

/// Parse a date string to epoch milliseconds
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS` and
/// `YYYY-MM-DD`; naive forms are read as UTC.
pub fn parse_date_ms(input: &str) -> Option<i64> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::FixedRateConverter;
    use crate::domain::labels::{RECEIVED_LABEL, SENT_LABEL};
    use crate::domain::StoredAccount;
    use serde_json::json;

    const NOW: i64 = 1_750_000_000_000;

    fn with_normalizer<T>(f: impl FnOnce(&Normalizer) -> T) -> T {
        let converter = FixedRateConverter::default();
        let vocabulary = LabelVocabulary::default();
        let normalizer = Normalizer::new(&converter, &vocabulary, NOW);
        f(&normalizer)
    }

    fn transfer(to: &str) -> LedgerTransfer {
        LedgerTransfer {
            id: 42,
            ledger_id: None,
            owner: "me".to_string(),
            account_label: "Treasury".to_string(),
            from: "them".to_string(),
            to: to.to_string(),
            amount: 150_000_000, // 1.5 tokens
            decimals: None,
            timestamp_nanos: Some(1_736_899_200_123_456_789),
        }
    }

    #[test]
    fn test_canonical_passthrough() {
        let tx = CanonicalTransaction::new("7", Decimal::new(-1234, 2), 99, "acct", "Refund").custom();
        let out = with_normalizer(|n| n.normalize_record(&RawRecord::Canonical(tx.clone())));
        assert_eq!(out, tx);
    }

    #[test]
    fn test_transfer_direction_and_conversion() {
        let received = with_normalizer(|n| n.normalize_record(&RawRecord::LedgerTransfer(transfer("me"))));
        assert_eq!(received.amount_usd, Decimal::new(75, 1)); // 1.5 * $5
        assert_eq!(received.label, RECEIVED_LABEL);
        assert_eq!(received.timestamp_ms, 1_736_899_200_123);
        assert_eq!(received.account_label, "Treasury");
        assert!(!received.is_custom);

        let sent = with_normalizer(|n| n.normalize_record(&RawRecord::LedgerTransfer(transfer("them"))));
        assert_eq!(sent.amount_usd, Decimal::new(-75, 1));
        assert_eq!(sent.label, SENT_LABEL);
    }

    #[test]
    fn test_transfer_label_override_and_missing_timestamp() {
        let converter = FixedRateConverter::default();
        let vocabulary = LabelVocabulary::default();
        let mut overrides = HashMap::new();
        overrides.insert("42".to_string(), "Invoice Payment".to_string());
        let normalizer = Normalizer::new(&converter, &vocabulary, NOW).with_label_overrides(&overrides);

        let mut t = transfer("me");
        t.timestamp_nanos = Some(0);
        let tx = normalizer.normalize_record(&RawRecord::LedgerTransfer(t));
        assert_eq!(tx.label, "Invoice Payment");
        assert_eq!(tx.timestamp_ms, NOW);
    }

    #[test]
    fn test_ledger_operations() {
        let op = |kind| LedgerOperation {
            id: 9,
            kind,
            ledger_id: None,
            account_label: String::new(),
            amount: 200_000_000,
            decimals: Some(8),
            timestamp_nanos: None,
        };

        let mint = with_normalizer(|n| n.normalize_record(&RawRecord::LedgerOperation(op(LedgerOperationKind::Mint))));
        assert_eq!(mint.amount_usd, Decimal::from(10));
        assert_eq!(mint.account_label, UNKNOWN_SENTINEL);
        assert_eq!(mint.timestamp_ms, NOW);

        let burn = with_normalizer(|n| n.normalize_record(&RawRecord::LedgerOperation(op(LedgerOperationKind::Burn))));
        assert_eq!(burn.amount_usd, Decimal::from(-10));
        assert_eq!(burn.label, SENT_LABEL);

        let approve = with_normalizer(|n| n.normalize_record(&RawRecord::LedgerOperation(op(LedgerOperationKind::Approve))));
        assert_eq!(approve.amount_usd, Decimal::ZERO);
        assert_eq!(approve.label, APPROVE_LABEL);
    }

    #[test]
    fn test_custom_entry_defaults() {
        let entry = CustomEntry {
            id: "c-1".to_string(),
            amount_cents: -2550,
            timestamp_ms: None,
            label: Some("  ".to_string()),
            account: None,
        };
        let tx = with_normalizer(|n| n.normalize_record(&RawRecord::CustomEntry(entry)));
        assert_eq!(tx.amount_usd, Decimal::new(-2550, 2));
        assert_eq!(tx.timestamp_ms, NOW);
        assert_eq!(tx.label, CUSTOM_LABEL);
        assert_eq!(tx.account_label, CUSTOM_LABEL);
        assert!(tx.is_custom);

        let entry = CustomEntry {
            id: "c-2".to_string(),
            amount_cents: 100,
            timestamp_ms: Some(1_000),
            label: Some("Crowdfund".to_string()),
            account: Some(StoredAccount::Offchain("Patreon".to_string())),
        };
        let tx = with_normalizer(|n| n.normalize_record(&RawRecord::CustomEntry(entry)));
        assert_eq!(tx.timestamp_ms, 1_000);
        assert_eq!(tx.account_label, "Patreon");
    }

    #[test]
    fn test_legacy_sign_and_date() {
        let received = LegacyMock {
            amount: Some(Decimal::from(-40)),
            date: Some("2025-01-15".to_string()),
            direction: Some("received".to_string()),
            ..Default::default()
        };
        let tx = with_normalizer(|n| n.normalize_record(&RawRecord::LegacyMock(received)));
        assert_eq!(tx.amount_usd, Decimal::from(40));
        assert_eq!(tx.timestamp_ms, 1_736_899_200_000);
        assert!(tx.id.starts_with("legacy-"));

        let sent = LegacyMock {
            amount: Some(Decimal::from(40)),
            date: Some("not a date".to_string()),
            direction: Some("sent".to_string()),
            ..Default::default()
        };
        let tx = with_normalizer(|n| n.normalize_record(&RawRecord::LegacyMock(sent)));
        assert_eq!(tx.amount_usd, Decimal::from(-40));
        assert_eq!(tx.timestamp_ms, NOW);
        assert_eq!(tx.account_label, UNKNOWN_SENTINEL);
    }

    #[test]
    fn test_falsy_values_yield_none() {
        with_normalizer(|n| {
            assert!(n.normalize_value(&json!(null)).is_none());
            assert!(n.normalize_value(&json!(false)).is_none());
            assert!(n.normalize_value(&json!(0)).is_none());
            assert!(n.normalize_value(&json!("")).is_none());
            assert!(n.normalize_value(&json!({})).is_none());
            assert!(n.normalize_value(&json!([])).is_none());
        });
    }

    #[test]
    fn test_untagged_canonical_and_legacy() {
        with_normalizer(|n| {
            let tx = n
                .normalize_value(&json!({"id": "a", "amount": 12.5, "timestamp_ms": 5, "account": "x", "label": "y", "isCustom": true}))
                .unwrap();
            assert_eq!(tx.amount_usd, Decimal::new(125, 1));
            assert_eq!(tx.timestamp_ms, 5);
            assert!(tx.is_custom);

            let tx = n
                .normalize_value(&json!({"date": "2025-01-15T10:00:00Z", "type": "sent", "amount": 3}))
                .unwrap();
            assert_eq!(tx.amount_usd, Decimal::from(-3));
            assert_eq!(tx.timestamp_ms, 1_736_935_200_000);
        });
    }

    #[test]
    fn test_camel_case_timestamp_is_canonical() {
        let value = json!({"id": "a", "amount": 3, "timestampMs": 9, "account": "x", "label": "y"});
        let map = value.as_object().unwrap();
        assert_eq!(infer_source(map), Some("canonical"));

        let snake = json!({"id": "a", "amount": 3, "timestamp_ms": 9});
        assert_eq!(infer_source(snake.as_object().unwrap()), Some("canonical"));
        assert_eq!(infer_source(json!({"amount": 3, "timestampMs": 9}).as_object().unwrap()), None);

        with_normalizer(|n| {
            let tx = n.normalize_value(&value).unwrap();
            assert_eq!(tx.timestamp_ms, 9);
            assert_eq!(tx.account_label, "x");
            assert_eq!(tx.amount_usd, Decimal::from(3));
        });
    }

    #[test]
    fn test_best_effort_never_fails() {
        with_normalizer(|n| {
            let tx = n
                .normalize_value(&json!({"id": 17, "amount": "garbled", "label": 3, "date": 12}))
                .unwrap();
            assert_eq!(tx.id, "17");
            assert_eq!(tx.amount_usd, Decimal::ZERO);
            assert_eq!(tx.timestamp_ms, NOW);
            assert_eq!(tx.label, UNKNOWN_SENTINEL);
            assert_eq!(tx.account_label, UNKNOWN_SENTINEL);

            let tx = n.normalize_value(&json!({"amount": "19.99", "timestampMs": 77})).unwrap();
            assert_eq!(tx.amount_usd, Decimal::new(1999, 2));
            assert_eq!(tx.timestamp_ms, 77);
            assert!(tx.id.is_empty());

            let tx = n.normalize_value(&json!("just text")).unwrap();
            assert_eq!(tx.timestamp_ms, NOW);
        });
    }

    #[test]
    fn test_merge_first_occurrence_wins() {
        let a = CanonicalTransaction::new("1", Decimal::ONE, 10, "a", "first");
        let b = CanonicalTransaction::new("1", Decimal::TEN, 20, "b", "second");
        let c = CanonicalTransaction::new("2", Decimal::ONE, 30, "c", "other");
        let nameless = CanonicalTransaction::new("", Decimal::ONE, 40, "d", "x");

        let merged = merge_by_id(vec![a.clone(), b, c.clone(), nameless]);
        assert_eq!(merged, vec![a, c]);
    }

    #[test]
    fn test_merge_with_itself_is_idempotent() {
        let txs: Vec<CanonicalTransaction> = (0..5)
            .map(|i| CanonicalTransaction::new(i.to_string(), Decimal::from(i), i, "a", "l"))
            .collect();

        let doubled = merge_by_id(txs.iter().cloned().chain(txs.iter().cloned()));
        assert_eq!(doubled, merge_by_id(txs.clone()));
        assert_eq!(doubled, txs);
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date_ms("2025-01-15"), Some(1_736_899_200_000));
        assert_eq!(parse_date_ms("2025-01-15 00:00:01"), Some(1_736_899_201_000));
        assert_eq!(parse_date_ms("2025-01-15T00:00:00.500"), Some(1_736_899_200_500));
        assert_eq!(parse_date_ms("2025-01-15T02:00:00+02:00"), Some(1_736_899_200_000));
        assert_eq!(parse_date_ms("15/01/2025"), None);
        assert_eq!(parse_date_ms(""), None);
    }

    #[test]
    fn test_sort_newest_first() {
        let mut txs = vec![
            CanonicalTransaction::new("1", Decimal::ONE, 10, "a", "x"),
            CanonicalTransaction::new("2", Decimal::ONE, 30, "a", "x"),
            CanonicalTransaction::new("3", Decimal::ONE, 20, "a", "x"),
        ];
        sort_newest_first(&mut txs);
        let ids: Vec<&str> = txs.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3", "1"]);
    }
}
