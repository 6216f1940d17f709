//! Financial metrics domain model
//!
//! Everything here is derived data, recomputed on every call.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Figures for one period (current month to date, or previous month)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodMetrics {
    pub on_chain_revenue: Decimal,
    pub off_chain_revenue: Decimal,
    pub total_revenue: Decimal,
    /// Never positive: expenses are carried with a negative sign
    pub total_expenses: Decimal,
    /// Signed sum: `total_revenue + total_expenses`
    pub net_profit: Decimal,
}

/// One point of the six-month on-chain revenue series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    /// Short month name, e.g. "Jan"
    pub name: String,
    pub on_chain_revenue: Decimal,
}

/// One slice of the revenue breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownSlice {
    pub name: String,
    pub value: Decimal,
}

/// One bar of a transaction frequency histogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyPoint {
    pub name: String,
    pub count: u64,
}

/// Complete set of dashboard figures
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    pub total_revenue: Decimal,
    #[serde(serialize_with = "serialize_change")]
    pub total_revenue_change: f64,
    pub net_profit: Decimal,
    #[serde(serialize_with = "serialize_change")]
    pub net_profit_change: f64,
    pub total_expenses: Decimal,
    #[serde(serialize_with = "serialize_change")]
    pub total_expenses_change: f64,
    pub total_on_chain_transactions: u64,
    pub total_on_chain_revenue: Decimal,
    pub total_off_chain_revenue: Decimal,
    pub current_period: PeriodMetrics,
    pub previous_period: PeriodMetrics,
    pub on_chain_revenue_chart: Vec<RevenuePoint>,
    pub revenue_breakdown: Vec<BreakdownSlice>,
    pub monthly_frequency: Vec<FrequencyPoint>,
    pub weekly_frequency: Vec<FrequencyPoint>,
}

/// JSON has no infinity; infinite growth is written as the string "Infinity"
fn serialize_change<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_f64(0.0)
    } else if *value > 0.0 {
        serializer.serialize_str("Infinity")
    } else {
        serializer.serialize_str("-Infinity")
    }
}
