//! Metrics service - dashboard figures from a transaction snapshot
//!
//! Pure computation over an immutable snapshot and an explicit `now`. All
//! calendar arithmetic happens in `now`'s time zone.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::domain::labels::{is_on_chain_revenue, is_summary_off_chain_revenue};
use crate::domain::{
    BreakdownSlice, CanonicalTransaction, FinancialMetrics, FrequencyPoint, Granularity,
    LabelVocabulary, PeriodMetrics, RevenuePoint, TimeBucket,
};
use crate::services::bucketing::aggregate_by_period;

/// Number of months in the revenue chart, ending with the current month
pub const REVENUE_CHART_MONTHS: i32 = 6;

pub const ON_CHAIN_REVENUE_NAME: &str = "On-Chain Revenue";
pub const OFF_CHAIN_REVENUE_NAME: &str = "Off-Chain Revenue";

/// Period-over-period change in percent
///
/// `(current - previous) / previous * 100`. With no previous value the
/// result is `+Infinity` for growth from nothing and 0 otherwise.
pub fn percentage_change(current: Decimal, previous: Decimal) -> f64 {
    if previous.is_zero() {
        return if current > Decimal::ZERO { f64::INFINITY } else { 0.0 };
    }

    current
        .checked_sub(previous)
        .and_then(|delta| delta.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|pct| pct.to_f64())
        .unwrap_or(0.0)
}

/// Revenue, expenses and profit over one set of transactions
///
/// Revenue only counts inbound amounts and expenses only outbound ones, so
/// expenses are never positive and `net_profit` is a signed sum. Sums
/// saturate at the `Decimal` range instead of overflowing.
pub fn period_metrics<'a>(
    transactions: impl IntoIterator<Item = &'a CanonicalTransaction>,
    vocabulary: &LabelVocabulary,
) -> PeriodMetrics {
    let mut m = PeriodMetrics::default();

    for tx in transactions {
        let received = tx.received_amount();
        if is_on_chain_revenue(tx) {
            m.on_chain_revenue = m.on_chain_revenue.saturating_add(received);
        }
        if vocabulary.is_off_chain_revenue(tx) {
            m.off_chain_revenue = m.off_chain_revenue.saturating_add(received);
        }
        if vocabulary.is_expense(tx) {
            m.total_expenses = m.total_expenses.saturating_add(tx.amount_usd.min(Decimal::ZERO));
        }
    }

    m.total_revenue = m.on_chain_revenue.saturating_add(m.off_chain_revenue);
    m.net_profit = m.total_revenue.saturating_add(m.total_expenses);
    m
}

/// Compute every dashboard figure
///
/// - headline totals cover the whole snapshot
/// - changes compare the current month to date with the whole previous month
/// - the revenue chart is dense: always six months, oldest first
/// - frequency histograms count inbound on-chain transactions
pub fn compute_financial_metrics<Tz: TimeZone>(
    transactions: &[CanonicalTransaction],
    now: &DateTime<Tz>,
    vocabulary: &LabelVocabulary,
) -> FinancialMetrics
where
    Tz::Offset: std::fmt::Display,
{
    let tz = now.timezone();
    let now_ms = now.timestamp_millis();
    let this_month = (now.year(), now.month());
    let last_month = shift_month(this_month, -1);

    // Local dates once; timestamps chrono cannot place are left out of
    // calendar figures but still count toward the headline totals
    let dated: Vec<(&CanonicalTransaction, NaiveDate)> = transactions
        .iter()
        .filter_map(|tx| tx.local_time(&tz).map(|t| (tx, t.date_naive())))
        .collect();

    let current_period = period_metrics(
        dated
            .iter()
            .filter(|(tx, d)| (d.year(), d.month()) == this_month && tx.timestamp_ms <= now_ms)
            .map(|(tx, _)| *tx),
        vocabulary,
    );
    let previous_period = period_metrics(
        dated
            .iter()
            .filter(|(_, d)| (d.year(), d.month()) == last_month)
            .map(|(tx, _)| *tx),
        vocabulary,
    );

    // Headline split
    let mut total_on_chain_revenue = Decimal::ZERO;
    let mut total_off_chain_revenue = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;
    let mut total_on_chain_transactions = 0u64;

    for tx in transactions {
        let received = tx.received_amount();
        if is_on_chain_revenue(tx) {
            total_on_chain_revenue = total_on_chain_revenue.saturating_add(received);
            total_on_chain_transactions += 1;
        }
        if is_summary_off_chain_revenue(tx) {
            total_off_chain_revenue = total_off_chain_revenue.saturating_add(received);
        }
        if vocabulary.is_expense(tx) {
            total_expenses = total_expenses.saturating_add(tx.amount_usd.min(Decimal::ZERO));
        }
    }

    let total_revenue = total_on_chain_revenue.saturating_add(total_off_chain_revenue);
    let net_profit = total_revenue.saturating_add(total_expenses);

    FinancialMetrics {
        total_revenue,
        total_revenue_change: percentage_change(current_period.total_revenue, previous_period.total_revenue),
        net_profit,
        net_profit_change: percentage_change(current_period.net_profit, previous_period.net_profit),
        total_expenses,
        total_expenses_change: percentage_change(current_period.total_expenses, previous_period.total_expenses),
        total_on_chain_transactions,
        total_on_chain_revenue,
        total_off_chain_revenue,
        current_period,
        previous_period,
        on_chain_revenue_chart: revenue_chart(&dated, this_month),
        revenue_breakdown: vec![
            BreakdownSlice {
                name: ON_CHAIN_REVENUE_NAME.to_string(),
                value: total_on_chain_revenue,
            },
            BreakdownSlice {
                name: OFF_CHAIN_REVENUE_NAME.to_string(),
                value: total_off_chain_revenue,
            },
        ],
        monthly_frequency: monthly_frequency(&dated),
        weekly_frequency: weekly_frequency(&dated),
    }
}

/// Inbound on-chain revenue per month for the six months ending at `end`
fn revenue_chart(dated: &[(&CanonicalTransaction, NaiveDate)], end: (i32, u32)) -> Vec<RevenuePoint> {
    (0..REVENUE_CHART_MONTHS)
        .rev()
        .map(|back| {
            let month = shift_month(end, -back);
            let on_chain_revenue = dated
                .iter()
                .filter(|(tx, d)| (d.year(), d.month()) == month && is_on_chain_revenue(tx))
                .fold(Decimal::ZERO, |acc, (tx, _)| acc.saturating_add(tx.received_amount()));
            RevenuePoint {
                name: month_label(month, "%b"),
                on_chain_revenue,
            }
        })
        .collect()
}

/// Inbound, non-custom transactions feed the frequency histograms
fn is_counted(tx: &CanonicalTransaction) -> bool {
    is_on_chain_revenue(tx) && tx.is_inbound()
}

/// Counts per calendar month, oldest first, labelled "Jan '25"
fn monthly_frequency(dated: &[(&CanonicalTransaction, NaiveDate)]) -> Vec<FrequencyPoint> {
    let mut counts: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for (tx, d) in dated {
        if is_counted(tx) {
            *counts.entry((d.year(), d.month())).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(month, count)| FrequencyPoint {
            name: month_label(month, "%b '%y"),
            count,
        })
        .collect()
}

/// Counts per ISO-8601 week number, labelled "W<n>"
///
/// Weeks from different years share a bar; bars are ordered by label as
/// strings, so "W10" sorts before "W2".
fn weekly_frequency(dated: &[(&CanonicalTransaction, NaiveDate)]) -> Vec<FrequencyPoint> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for (tx, d) in dated {
        if is_counted(tx) {
            *counts.entry(format!("W{}", d.iso_week().week())).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .map(|(name, count)| FrequencyPoint { name, count })
        .collect()
}

/// Move a (year, month) pair by whole months, wrapping across years
fn shift_month((year, month): (i32, u32), delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn month_label((year, month): (i32, u32), format: &str) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format(format).to_string())
        .unwrap_or_default()
}

/// Metrics service
///
/// Binds the configured label vocabulary to the pure metric functions.
pub struct MetricsService {
    vocabulary: LabelVocabulary,
}

impl MetricsService {
    pub fn new(vocabulary: LabelVocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &LabelVocabulary {
        &self.vocabulary
    }

    /// Full dashboard figures for a snapshot
    pub fn financial_metrics<Tz: TimeZone>(
        &self,
        transactions: &[CanonicalTransaction],
        now: &DateTime<Tz>,
    ) -> FinancialMetrics
    where
        Tz::Offset: std::fmt::Display,
    {
        compute_financial_metrics(transactions, now, &self.vocabulary)
    }

    /// Received totals per day or month in `tz`
    pub fn buckets<Tz: TimeZone>(
        &self,
        transactions: &[CanonicalTransaction],
        granularity: Granularity,
        tz: &Tz,
    ) -> Vec<TimeBucket>
    where
        Tz::Offset: std::fmt::Display,
    {
        aggregate_by_period(transactions, granularity, tz)
    }
}
