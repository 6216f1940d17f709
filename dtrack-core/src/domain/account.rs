//! Labeled account domain model

use serde::{Deserialize, Serialize};

/// Where an account lives: on the ledger or only in the user's books
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoredAccount {
    /// Ledger account (owner principal + optional hex subaccount)
    Icrc1 {
        owner: String,
        #[serde(default)]
        subaccount: Option<String>,
    },
    /// Free-form off-chain account name
    Offchain(String),
}

impl StoredAccount {
    /// Stable key for display and lookups
    ///
    /// Ledger accounts render as `owner` or `owner.subaccount`; a subaccount of
    /// all zeros is the default one and is omitted.
    pub fn key(&self) -> String {
        match self {
            StoredAccount::Icrc1 { owner, subaccount } => match subaccount.as_deref() {
                Some(sub) if !sub.is_empty() && !sub.chars().all(|c| c == '0') => {
                    format!("{}.{}", owner, sub.trim_start_matches('0'))
                }
                _ => owner.clone(),
            },
            StoredAccount::Offchain(name) => name.clone(),
        }
    }

    pub fn is_on_chain(&self) -> bool {
        matches!(self, StoredAccount::Icrc1 { .. })
    }
}

/// A wallet account the user tagged with a human-readable name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabeledAccount {
    pub account: StoredAccount,
    pub label: String,
    #[serde(default)]
    pub product: String,
}

impl LabeledAccount {
    pub fn new(account: StoredAccount, label: impl Into<String>) -> Self {
        Self {
            account,
            label: label.into(),
            product: String::new(),
        }
    }

    /// Validate account data
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.label.trim().is_empty() {
            return Err("account label cannot be empty");
        }
        if self.account.key().trim().is_empty() {
            return Err("account identifier cannot be empty");
        }
        Ok(())
    }
}
