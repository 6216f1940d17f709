//! Bucketing - group transactions into day or month periods
//!
//! Period keys are computed in a caller-supplied time zone, so the same
//! transactions bucket the same way on every machine. Output is sparse: a
//! period appears only if at least one transaction falls in it.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, TimeZone};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::{BucketMetric, BucketTotals, CanonicalTransaction, Granularity, TimeBucket};

/// Group transactions by local day or month
///
/// `total_received` sums `max(amount, 0)` and `transaction_count` counts the
/// transactions that added to it. A period whose transactions are all
/// outbound still gets a (zero) bucket. Transactions whose timestamp cannot
/// be represented in `tz` are skipped. Totals saturate at the `Decimal`
/// range.
pub fn aggregate_by_period<Tz: TimeZone>(
    transactions: &[CanonicalTransaction],
    granularity: Granularity,
    tz: &Tz,
) -> Vec<TimeBucket>
where
    Tz::Offset: std::fmt::Display,
{
    // Keyed by calendar fields: formatted years past 9999 carry a sign
    // and would not sort as strings
    let mut buckets: BTreeMap<(i32, u32, u32), TimeBucket> = BTreeMap::new();

    for tx in transactions {
        let Some(local) = tx.local_time(tz) else {
            continue;
        };
        let day = match granularity {
            Granularity::Day => local.day(),
            Granularity::Month => 0,
        };
        let bucket = buckets
            .entry((local.year(), local.month(), day))
            .or_insert_with(|| TimeBucket::empty(local.format(granularity.key_format()).to_string()));

        let received = tx.received_amount();
        if received > Decimal::ZERO {
            bucket.total_received = bucket.total_received.saturating_add(received);
            bucket.transaction_count += 1;
        }
    }

    buckets.into_values().collect()
}

/// Year and month at the start of a period key (`YYYY-MM[-DD]`, years
/// outside 0000-9999 signed)
fn parse_year_month(key: &str) -> Option<(i32, u32)> {
    let (sign, rest) = match key.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, key.strip_prefix('+').unwrap_or(key)),
    };
    let mut parts = rest.split('-');
    let year: i32 = parts.next()?.parse().ok()?;
    let month: u32 = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(sign * year, month, 1).map(|_| (sign * year, month))
}

/// Sum day buckets into month buckets (`YYYY-MM-DD` -> `YYYY-MM`)
///
/// Keys that are already monthly pass through and merge with their days.
/// Keys that do not start with a valid year and month are skipped.
pub fn roll_up_months(daily: &[TimeBucket]) -> Vec<TimeBucket> {
    let mut months: BTreeMap<(i32, u32), TimeBucket> = BTreeMap::new();

    for day in daily {
        let Some((year, month)) = parse_year_month(&day.period_key) else {
            continue;
        };
        let entry = months.entry((year, month)).or_insert_with(|| {
            let key = NaiveDate::from_ymd_opt(year, month, 1)
                .map(|d| d.format(Granularity::Month.key_format()).to_string())
                .unwrap_or_default();
            TimeBucket::empty(key)
        });
        entry.total_received = entry.total_received.saturating_add(day.total_received);
        entry.transaction_count = entry.transaction_count.saturating_add(day.transaction_count);
    }

    months.into_values().collect()
}

/// Totals across all buckets (chart header figures)
pub fn bucket_totals(buckets: &[TimeBucket]) -> BucketTotals {
    buckets.iter().fold(BucketTotals::default(), |mut acc, b| {
        acc.total_received = acc.total_received.saturating_add(b.total_received);
        acc.transaction_count = acc.transaction_count.saturating_add(b.transaction_count);
        acc
    })
}

/// Percentage change between the last two buckets for one metric
///
/// `(last - prev) / |prev| * 100`; 0 when there are fewer than two buckets
/// or the earlier value is 0.
pub fn bucket_trend(buckets: &[TimeBucket], metric: BucketMetric) -> f64 {
    let [.., prev, last] = buckets else {
        return 0.0;
    };

    let prev = metric.value(prev);
    let last = metric.value(last);
    if prev.is_zero() {
        return 0.0;
    }

    last
        .checked_sub(prev)
        .and_then(|delta| delta.checked_div(prev.abs()))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}
