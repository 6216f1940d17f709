//! CSV export of transactions and time buckets

use std::io::Write;

use chrono::TimeZone;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::result::Result;
use crate::domain::{CanonicalTransaction, TimeBucket};

#[derive(Serialize)]
struct TransactionRow<'a> {
    id: &'a str,
    date: String,
    timestamp_ms: i64,
    account: &'a str,
    label: &'a str,
    amount_usd: Decimal,
    is_custom: bool,
}

#[derive(Serialize)]
struct BucketRow<'a> {
    period: &'a str,
    total_received: Decimal,
    transaction_count: u64,
}

/// Write transactions as CSV with a header row
///
/// `date` is the local time in `tz` (RFC 3339), left empty when the
/// timestamp cannot be represented.
pub fn export_transactions_csv<W: Write, Tz: TimeZone>(
    transactions: &[CanonicalTransaction],
    tz: &Tz,
    writer: W,
) -> Result<()>
where
    Tz::Offset: std::fmt::Display,
{
    let mut wtr = csv::Writer::from_writer(writer);

    // serialize() only emits headers on the first row
    if transactions.is_empty() {
        wtr.write_record([
            "id",
            "date",
            "timestamp_ms",
            "account",
            "label",
            "amount_usd",
            "is_custom",
        ])?;
    }

    for tx in transactions {
        wtr.serialize(TransactionRow {
            id: &tx.id,
            date: tx.local_time(tz).map(|t| t.to_rfc3339()).unwrap_or_default(),
            timestamp_ms: tx.timestamp_ms,
            account: &tx.account_label,
            label: &tx.label,
            amount_usd: tx.amount_usd,
            is_custom: tx.is_custom,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write time buckets as CSV with a header row
pub fn export_buckets_csv<W: Write>(buckets: &[TimeBucket], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    if buckets.is_empty() {
        wtr.write_record(["period", "total_received", "transaction_count"])?;
    }

    for bucket in buckets {
        wtr.serialize(BucketRow {
            period: &bucket.period_key,
            total_received: bucket.total_received,
            transaction_count: bucket.transaction_count,
        })?;
    }

    wtr.flush()?;
    Ok(())
}
