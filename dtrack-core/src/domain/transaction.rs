//! Canonical transaction domain model

use std::sync::OnceLock;

use chrono::{DateTime, TimeZone};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Sentinel used when a record carries no usable account or label
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// The unit of all computation: one already USD-converted transaction
///
/// Positive amounts are inbound, negative amounts outbound. Instances are
/// never mutated after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalTransaction {
    /// Unique within a source; merged sets are de-duplicated by id
    pub id: String,
    #[serde(rename = "amount")]
    pub amount_usd: Decimal,
    /// Milliseconds since the Unix epoch
    #[serde(alias = "timestampMs")]
    pub timestamp_ms: i64,
    #[serde(rename = "account")]
    pub account_label: String,
    /// Free-text category that drives classification
    pub label: String,
    /// True if entered manually (off-chain) rather than derived from the ledger
    #[serde(default, alias = "isCustom")]
    pub is_custom: bool,
}

impl CanonicalTransaction {
    /// Create a new on-chain transaction
    pub fn new(
        id: impl Into<String>,
        amount_usd: Decimal,
        timestamp_ms: i64,
        account_label: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            amount_usd,
            timestamp_ms,
            account_label: account_label.into(),
            label: label.into(),
            is_custom: false,
        }
    }

    /// Mark the transaction as user-entered
    pub fn custom(mut self) -> Self {
        self.is_custom = true;
        self
    }

    /// Inbound part of the amount: `max(amount, 0)`
    pub fn received_amount(&self) -> Decimal {
        self.amount_usd.max(Decimal::ZERO)
    }

    pub fn is_inbound(&self) -> bool {
        self.amount_usd > Decimal::ZERO
    }

    /// Label in the form used for vocabulary lookups
    pub fn normalized_label(&self) -> String {
        normalize_label(&self.label)
    }

    /// Timestamp in the given zone, `None` if outside the representable range
    pub fn local_time<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        tz.timestamp_millis_opt(self.timestamp_ms).single()
    }
}

/// Normalize a label for comparison: trim, lowercase, keep only `[a-z0-9]`
///
/// "On-chain Payment" and "  onchain payment " both become "onchainpayment".
pub fn normalize_label(label: &str) -> String {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    let re = NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9]").expect("static pattern"));
    re.replace_all(&label.trim().to_lowercase(), "").to_string()
}

/// Deterministic id for records that arrive without one
///
/// SHA256 over the pipe-joined parts, truncated to 16 hex chars.
pub fn fingerprint(prefix: &str, parts: &[&str]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(parts.join("|").as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}-{}", prefix, hex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_label_normalization() {
        assert_eq!(normalize_label("On-chain Payment"), "onchainpayment");
        assert_eq!(normalize_label("  Invoice Payment "), "invoicepayment");
        assert_eq!(normalize_label("Onchain-grant"), "onchaingrant");
        assert_eq!(normalize_label(""), "");
    }

    #[test]
    fn test_received_amount() {
        let inbound = CanonicalTransaction::new("1", Decimal::new(10050, 2), 0, "a", "x");
        let outbound = CanonicalTransaction::new("2", Decimal::new(-3000, 2), 0, "a", "x");
        assert_eq!(inbound.received_amount(), Decimal::new(10050, 2));
        assert_eq!(outbound.received_amount(), Decimal::ZERO);
        assert!(inbound.is_inbound());
        assert!(!outbound.is_inbound());
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = fingerprint("legacy", &["2025-01-15", "12.5", "received", "acct"]);
        let b = fingerprint("legacy", &["2025-01-15", "12.5", "received", "acct"]);
        let c = fingerprint("legacy", &["2025-01-16", "12.5", "received", "acct"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), "legacy-".len() + 16);
    }

    #[test]
    fn test_serde_accepts_camel_case_custom_flag() {
        let json = r#"{"id":"c-1","amount":12.5,"timestamp_ms":1000,"account":"custom","label":"Refund","isCustom":true}"#;
        let tx: CanonicalTransaction = serde_json::from_str(json).unwrap();
        assert!(tx.is_custom);
        assert_eq!(tx.amount_usd, Decimal::new(125, 1));
        assert_eq!(tx.account_label, "custom");
    }

    #[test]
    fn test_local_time_out_of_range() {
        let tx = CanonicalTransaction::new("1", Decimal::ONE, i64::MAX, "a", "x");
        assert!(tx.local_time(&Utc).is_none());
    }
}
