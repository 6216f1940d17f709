//! Integration tests for dtrack-core
//!
//! These tests run the full pipeline the CLI uses: settings.json on disk,
//! JSON file sources, snapshot collection, bucketing and metrics. Every test
//! passes an explicit `now`.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use tempfile::TempDir;

use dtrack_core::adapters::mock::mock_accounts;
use dtrack_core::adapters::{load_label_overrides, JsonFileSource, MockSource};
use dtrack_core::ports::RecordSource;
use dtrack_core::services::{bucket_totals, export_transactions_csv};
use dtrack_core::{DtrackContext, Granularity};

// ============================================================================
// Test Helpers
// ============================================================================

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

/// Ledger export: one inbound and one outbound transfer for account "me"
/// plus a mint, all in June 2025
const LEDGER_JSON: &str = r#"[
    {"source": "ledger_transfer", "id": 1, "owner": "me", "account_label": "Treasury",
     "from": "alice", "to": "me", "amount": 2000000000, "timestamp_nanos": 1748944800000000000},
    {"source": "ledger_transfer", "id": 2, "owner": "me", "account_label": "Treasury",
     "from": "me", "to": "bob", "amount": 600000000, "timestamp_nanos": 1748948400000000000},
    {"source": "ledger_operation", "id": 3, "kind": "mint", "account_label": "Treasury",
     "amount": 100000000, "timestamp_nanos": 1746352800000000000}
]"#;

/// Backend export: custom entries, one duplicating a ledger id, one garbled
const BACKEND_JSON: &str = r#"{"transactions": [
    {"source": "custom_entry", "id": "c-1", "amount_cents": 4000, "timestamp_ms": 1749038400000,
     "label": "Crowdfund", "account": {"Offchain": "Patreon"}},
    {"source": "canonical", "id": "1", "amount": 999, "timestamp_ms": 1749038400000,
     "account": "dup", "label": "dup"},
    {"amount": "garbled"},
    null
]}"#;

fn create_sources(dir: &Path) -> (JsonFileSource, JsonFileSource) {
    let ledger = write_file(dir, "ledger.json", LEDGER_JSON);
    let backend = write_file(dir, "backend.json", BACKEND_JSON);
    (JsonFileSource::new(ledger), JsonFileSource::new(backend))
}

// ============================================================================
// End-to-end pipeline
// ============================================================================

#[test]
fn test_file_sources_to_metrics() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = DtrackContext::new(temp_dir.path()).unwrap();
    let (ledger, backend) = create_sources(temp_dir.path());

    let now = at("2025-06-15T12:00:00Z");
    let snapshot = ctx
        .snapshot_service
        .collect(&[&ledger, &backend], &HashMap::new(), now.timestamp_millis());

    // 3 ledger + c-1; the duplicate id "1" lost the merge, the garbled
    // record has no id and null is empty
    assert_eq!(snapshot.transactions.len(), 4);
    assert!(snapshot.warnings.is_empty());
    let first = snapshot.transactions.iter().find(|t| t.id == "1").unwrap();
    assert_eq!(first.account_label, "Treasury");

    // 20 tokens in at $5, 6 tokens out
    assert_eq!(first.amount_usd, Decimal::from(100));
    let sent = snapshot.transactions.iter().find(|t| t.id == "2").unwrap();
    assert_eq!(sent.amount_usd, Decimal::from(-30));
    assert_eq!(sent.label, "On-chain Payment");

    let metrics = ctx.metrics_service.financial_metrics(&snapshot.transactions, &now);

    // on-chain: 100 (June) + 5 (May mint); off-chain: 40 custom
    assert_eq!(metrics.total_on_chain_revenue, Decimal::from(105));
    assert_eq!(metrics.total_off_chain_revenue, Decimal::from(40));
    assert_eq!(metrics.total_expenses, Decimal::from(-30));
    assert_eq!(metrics.net_profit, Decimal::from(115));
    assert_eq!(metrics.total_on_chain_transactions, 3);

    // June to date vs all of May
    assert_eq!(metrics.current_period.on_chain_revenue, Decimal::from(100));
    assert_eq!(metrics.previous_period.on_chain_revenue, Decimal::from(5));
    assert_eq!(metrics.on_chain_revenue_chart.len(), 6);
    assert_eq!(metrics.on_chain_revenue_chart[5].name, "Jun");
    assert_eq!(metrics.on_chain_revenue_chart[5].on_chain_revenue, Decimal::from(100));
}

#[test]
fn test_snapshot_is_deterministic() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = DtrackContext::new(temp_dir.path()).unwrap();
    let (ledger, backend) = create_sources(temp_dir.path());
    let now = at("2025-06-15T12:00:00Z");

    let a = ctx
        .snapshot_service
        .collect(&[&ledger, &backend], &HashMap::new(), now.timestamp_millis());
    let b = ctx
        .snapshot_service
        .collect(&[&ledger, &backend], &HashMap::new(), now.timestamp_millis());

    assert_eq!(a.transactions, b.transactions);
    assert_eq!(
        ctx.metrics_service.financial_metrics(&a.transactions, &now),
        ctx.metrics_service.financial_metrics(&b.transactions, &now)
    );
}

#[test]
fn test_missing_file_degrades_to_warning() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = DtrackContext::new(temp_dir.path()).unwrap();
    let (ledger, _) = create_sources(temp_dir.path());
    let missing = JsonFileSource::new(temp_dir.path().join("nope.json"));

    let snapshot = ctx
        .snapshot_service
        .collect(&[&missing, &ledger], &HashMap::new(), 0);

    assert_eq!(snapshot.transactions.len(), 3);
    assert_eq!(snapshot.warnings.len(), 1);
    assert!(snapshot.warnings[0].starts_with("file:"));
}

#[test]
fn test_all_sources_failing_yields_zero_metrics() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = DtrackContext::new(temp_dir.path()).unwrap();
    let broken = JsonFileSource::new(write_file(temp_dir.path(), "broken.json", "{\"not\": \"a list\"}"));
    let now = at("2025-06-15T12:00:00Z");

    let snapshot = ctx
        .snapshot_service
        .collect(&[&broken], &HashMap::new(), now.timestamp_millis());
    let metrics = ctx.metrics_service.financial_metrics(&snapshot.transactions, &now);

    assert!(snapshot.transactions.is_empty());
    assert_eq!(metrics.total_revenue, Decimal::ZERO);
    assert_eq!(metrics.total_revenue_change, 0.0);
    assert_eq!(metrics.on_chain_revenue_chart.len(), 6);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_settings_drive_pricing_and_labels() {
    let temp_dir = TempDir::new().unwrap();
    write_file(
        temp_dir.path(),
        "settings.json",
        r#"{
            "labels": {"sent": "Outgoing", "received": "Incoming", "onChain": ["Payroll"]},
            "pricing": {"defaultUsdPerToken": 2}
        }"#,
    );
    let ctx = DtrackContext::new(temp_dir.path()).unwrap();
    let (ledger, _) = create_sources(temp_dir.path());

    let snapshot = ctx.snapshot_service.collect(&[&ledger], &HashMap::new(), 0);
    let received = snapshot.transactions.iter().find(|t| t.id == "1").unwrap();
    let sent = snapshot.transactions.iter().find(|t| t.id == "2").unwrap();

    assert_eq!(received.amount_usd, Decimal::from(40));
    assert_eq!(received.label, "Incoming");
    assert_eq!(sent.label, "Outgoing");
    assert!(ctx.metrics_service.vocabulary().is_expense(sent));
}

#[test]
fn test_day_buckets_follow_configured_offset() {
    let temp_dir = TempDir::new().unwrap();
    // UTC+14: the 10:00Z transfers land on the next local day
    write_file(temp_dir.path(), "settings.json", r#"{"display": {"utcOffsetMinutes": 840}}"#);
    let ctx = DtrackContext::new(temp_dir.path()).unwrap();
    let (ledger, backend) = create_sources(temp_dir.path());

    let snapshot = ctx
        .snapshot_service
        .collect(&[&ledger, &backend], &HashMap::new(), 0);
    let tz: FixedOffset = ctx.timezone();
    let buckets = ctx
        .metrics_service
        .buckets(&snapshot.transactions, Granularity::Day, &tz);

    let keys: Vec<&str> = buckets.iter().map(|b| b.period_key.as_str()).collect();
    assert_eq!(keys, vec!["2025-05-05", "2025-06-04", "2025-06-05"]);

    // transfer in and transfer out share June 4; only the inbound one counts
    assert_eq!(buckets[1].total_received, Decimal::from(100));
    assert_eq!(buckets[1].transaction_count, 1);
    assert_eq!(buckets[2].total_received, Decimal::from(40));

    let expected: Decimal = snapshot.transactions.iter().map(|t| t.received_amount()).sum();
    assert_eq!(bucket_totals(&buckets).total_received, expected);
}

// ============================================================================
// Label overrides, mock data, export
// ============================================================================

#[test]
fn test_label_override_file() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = DtrackContext::new(temp_dir.path()).unwrap();
    let (ledger, _) = create_sources(temp_dir.path());
    let overrides_path = write_file(
        temp_dir.path(),
        "labels.json",
        r#"[{"id": 1, "label": "Subscription"}, {"id": "c-1", "label": "ignored"}]"#,
    );

    let overrides = load_label_overrides(&overrides_path).unwrap();
    let snapshot = ctx.snapshot_service.collect(&[&ledger], &overrides, 0);

    let tx = snapshot.transactions.iter().find(|t| t.id == "1").unwrap();
    assert_eq!(tx.label, "Subscription");
}

#[test]
fn test_mock_source_round_trips_through_file() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = DtrackContext::new(temp_dir.path()).unwrap();
    let now_ms = at("2025-06-15T12:00:00Z").timestamp_millis();

    let mock = MockSource::new(mock_accounts(2), now_ms).with_counts(4, 3);
    let records = mock.fetch_records().unwrap().records;
    let path = write_file(
        temp_dir.path(),
        "demo.json",
        &serde_json::to_string(&records).unwrap(),
    );

    let direct = ctx.snapshot_service.collect(&[&mock], &HashMap::new(), now_ms);
    let from_file = ctx
        .snapshot_service
        .collect(&[&JsonFileSource::new(path)], &HashMap::new(), now_ms);

    assert_eq!(direct.transactions, from_file.transactions);
    assert_eq!(direct.transactions.len(), 11);
}

#[test]
fn test_csv_export_of_snapshot() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = DtrackContext::new(temp_dir.path()).unwrap();
    let (ledger, _) = create_sources(temp_dir.path());
    let snapshot = ctx.snapshot_service.collect(&[&ledger], &HashMap::new(), 0);

    let mut buf = Vec::new();
    export_transactions_csv(&snapshot.transactions, &ctx.timezone(), &mut buf).unwrap();
    let csv = String::from_utf8(buf).unwrap();

    // header + one row per transaction
    assert_eq!(csv.lines().count(), 4);
    assert!(csv.contains("Treasury"));
}
