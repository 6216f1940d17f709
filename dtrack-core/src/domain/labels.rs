//! Label vocabulary and classification rules
//!
//! Classification is driven by data, not by per-string branching: the
//! vocabulary holds normalized label sets loaded from configuration, and the
//! predicates only test membership.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::transaction::{normalize_label, CanonicalTransaction};

pub const SENT_LABEL: &str = "On-chain Payment";
pub const RECEIVED_LABEL: &str = "On-chain Revenue";
pub const APPROVE_LABEL: &str = "Approve";
pub const CUSTOM_LABEL: &str = "custom";

/// Known on-chain labels (user-assignable categories for ledger transactions)
pub const DEFAULT_ON_CHAIN_LABELS: &[&str] = &[
    "Subscription",
    "Invoice Payment",
    "Refund",
    "Investment",
    "Crowdfund",
    "Onchain-grant",
];

/// Known custom (off-chain) labels
pub const DEFAULT_CUSTOM_LABELS: &[&str] = &[
    "Subscription",
    "Invoice Payment",
    "Refund",
    "Investment",
    "Crowdfund",
];

/// Label vocabulary as written in settings.json
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelSettings {
    #[serde(default = "default_on_chain")]
    pub on_chain: Vec<String>,
    #[serde(default = "default_custom")]
    pub custom: Vec<String>,
    #[serde(default = "default_sent")]
    pub sent: String,
    #[serde(default = "default_received")]
    pub received: String,
}

fn default_on_chain() -> Vec<String> {
    DEFAULT_ON_CHAIN_LABELS.iter().map(|s| s.to_string()).collect()
}

fn default_custom() -> Vec<String> {
    DEFAULT_CUSTOM_LABELS.iter().map(|s| s.to_string()).collect()
}

fn default_sent() -> String {
    SENT_LABEL.to_string()
}

fn default_received() -> String {
    RECEIVED_LABEL.to_string()
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            on_chain: default_on_chain(),
            custom: default_custom(),
            sent: default_sent(),
            received: default_received(),
        }
    }
}

/// Normalized label sets used by the classification predicates
#[derive(Debug, Clone)]
pub struct LabelVocabulary {
    on_chain: HashSet<String>,
    custom: HashSet<String>,
    sent_norm: String,
    /// Display label for outbound ledger transactions
    pub sent: String,
    /// Display label for inbound ledger transactions
    pub received: String,
}

impl LabelVocabulary {
    pub fn from_settings(settings: &LabelSettings) -> Self {
        Self {
            on_chain: settings.on_chain.iter().map(|s| normalize_label(s)).collect(),
            custom: settings.custom.iter().map(|s| normalize_label(s)).collect(),
            sent_norm: normalize_label(&settings.sent),
            sent: settings.sent.clone(),
            received: settings.received.clone(),
        }
    }

    /// Add a label to the on-chain set
    pub fn with_on_chain_label(mut self, label: &str) -> Self {
        self.on_chain.insert(normalize_label(label));
        self
    }

    /// Add a label to the custom set
    pub fn with_custom_label(mut self, label: &str) -> Self {
        self.custom.insert(normalize_label(label));
        self
    }

    pub fn is_on_chain_label(&self, label: &str) -> bool {
        self.on_chain.contains(&normalize_label(label))
    }

    pub fn is_custom_label(&self, label: &str) -> bool {
        self.custom.contains(&normalize_label(label))
    }

    /// Off-chain revenue: user-entered, a known custom label, or a known
    /// on-chain label that mentions a grant
    pub fn is_off_chain_revenue(&self, tx: &CanonicalTransaction) -> bool {
        if tx.is_custom {
            return true;
        }
        let norm = tx.normalized_label();
        if self.custom.contains(&norm) {
            return true;
        }
        self.on_chain.contains(&norm) && norm.contains("grant")
    }

    /// Expense: a known on-chain label or the sent label
    pub fn is_expense(&self, tx: &CanonicalTransaction) -> bool {
        let norm = tx.normalized_label();
        self.on_chain.contains(&norm) || norm == self.sent_norm
    }
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        Self::from_settings(&LabelSettings::default())
    }
}

/// On-chain side of the summary revenue split
pub fn is_on_chain_revenue(tx: &CanonicalTransaction) -> bool {
    !tx.is_custom
}

/// Off-chain side of the summary revenue split: user-entered, or a label
/// mentioning "off-chain" or "grant" (case-insensitive)
pub fn is_summary_off_chain_revenue(tx: &CanonicalTransaction) -> bool {
    if tx.is_custom {
        return true;
    }
    let lower = tx.label.to_lowercase();
    lower.contains("off-chain") || lower.contains("grant")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn tx(label: &str, custom: bool) -> CanonicalTransaction {
        let tx = CanonicalTransaction::new("1", Decimal::ONE, 0, "acct", label);
        if custom {
            tx.custom()
        } else {
            tx
        }
    }

    #[test]
    fn test_off_chain_revenue_rules() {
        let vocab = LabelVocabulary::default();

        assert!(vocab.is_off_chain_revenue(&tx("anything", true)));
        assert!(vocab.is_off_chain_revenue(&tx("invoice payment", false)));
        // on-chain label containing "grant"
        assert!(vocab.is_off_chain_revenue(&tx("Onchain-grant", false)));
        // "grant" alone is not in the on-chain set
        assert!(!vocab.is_off_chain_revenue(&tx("grant", false)));
        assert!(!vocab.is_off_chain_revenue(&tx(RECEIVED_LABEL, false)));
    }

    #[test]
    fn test_expense_rules() {
        let vocab = LabelVocabulary::default();

        assert!(vocab.is_expense(&tx(SENT_LABEL, false)));
        assert!(vocab.is_expense(&tx("on-chain payment", false)));
        assert!(vocab.is_expense(&tx("Refund", true)));
        assert!(!vocab.is_expense(&tx(RECEIVED_LABEL, false)));
        assert!(!vocab.is_expense(&tx("salary", false)));
    }

    #[test]
    fn test_vocabulary_is_configurable() {
        let settings = LabelSettings {
            on_chain: vec!["Payroll".to_string()],
            custom: vec![],
            sent: "Outgoing".to_string(),
            received: "Incoming".to_string(),
        };
        let vocab = LabelVocabulary::from_settings(&settings).with_custom_label("Donation");

        assert!(vocab.is_expense(&tx("payroll", false)));
        assert!(vocab.is_expense(&tx("OUTGOING", false)));
        assert!(!vocab.is_expense(&tx(SENT_LABEL, false)));
        assert!(vocab.is_off_chain_revenue(&tx("donation", false)));
        assert!(vocab.is_custom_label("Donation"));
        assert!(vocab.is_on_chain_label("pay-roll"));
    }

    #[test]
    fn test_summary_split() {
        assert!(is_on_chain_revenue(&tx("x", false)));
        assert!(!is_on_chain_revenue(&tx("x", true)));

        assert!(is_summary_off_chain_revenue(&tx("Off-chain sale", false)));
        assert!(is_summary_off_chain_revenue(&tx("Research Grant", false)));
        assert!(!is_summary_off_chain_revenue(&tx("offchain", false)));
    }

    #[test]
    fn test_settings_defaults_from_partial_json() {
        let settings: LabelSettings = serde_json::from_str(r#"{"sent":"Paid"}"#).unwrap();
        assert_eq!(settings.sent, "Paid");
        assert_eq!(settings.received, RECEIVED_LABEL);
        assert_eq!(settings.on_chain.len(), DEFAULT_ON_CHAIN_LABELS.len());
    }
}
