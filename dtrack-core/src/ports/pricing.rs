//! Currency conversion port

use rust_decimal::Decimal;

/// Converts token amounts into USD
///
/// Conversion happens before normalization finishes: canonical transactions
/// only ever carry USD amounts.
pub trait UsdConverter: Send + Sync {
    /// Convert a token amount (already scaled by the ledger decimals)
    ///
    /// # Arguments
    /// * `ledger_id` - Ledger the tokens belong to, if known
    /// * `tokens` - Signed token amount
    fn to_usd(&self, ledger_id: Option<&str>, tokens: Decimal) -> Decimal;
}
