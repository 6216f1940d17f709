//! Time bucket domain model

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Bucket size for period aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Month,
}

impl Granularity {
    /// chrono format string producing the period key
    pub fn key_format(&self) -> &'static str {
        match self {
            Granularity::Day => "%Y-%m-%d",
            Granularity::Month => "%Y-%m",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Granularity::Day),
            "month" | "monthly" => Ok(Granularity::Month),
            other => Err(format!("unknown granularity '{}' (expected day or month)", other)),
        }
    }
}

/// Received totals for one day or month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucket {
    /// "YYYY-MM-DD" or "YYYY-MM"
    pub period_key: String,
    pub total_received: Decimal,
    pub transaction_count: u64,
}

impl TimeBucket {
    pub fn empty(period_key: impl Into<String>) -> Self {
        Self {
            period_key: period_key.into(),
            total_received: Decimal::ZERO,
            transaction_count: 0,
        }
    }
}

/// Which bucket field a trend is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketMetric {
    TotalReceived,
    TransactionCount,
}

impl BucketMetric {
    pub fn value(&self, bucket: &TimeBucket) -> Decimal {
        match self {
            BucketMetric::TotalReceived => bucket.total_received,
            BucketMetric::TransactionCount => Decimal::from(bucket.transaction_count),
        }
    }
}

/// Sums across a bucket series (chart header figures)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketTotals {
    pub total_received: Decimal,
    pub transaction_count: u64,
}
