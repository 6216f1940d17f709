//! Mock data provider for demos and tests
//!
//! Generates deterministic transactions: the same seed string and `now`
//! always produce the same records, so a dashboard stays stable per account.
//! - index-like transactions spread between 2025-01-01 and `now`
//! - custom transactions within the 90 days before `now`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use crate::domain::result::Result;
use crate::domain::{CanonicalTransaction, LabeledAccount, StoredAccount, SourceRecord};
use crate::ports::{FetchRecordsResult, RecordSource};

/// Label pool for generated transactions
pub const MOCK_LABELS: &[&str] = &[
    "payment",
    "salary",
    "refund",
    "transfer",
    "purchase",
    "fee",
    "reimbursement",
];

/// Labels generated with an outbound (negative) amount
const OUTBOUND_LABELS: &[&str] = &["payment", "purchase", "fee", "transfer"];

/// 2025-01-01T00:00:00Z
const MOCK_START_MS: i64 = 1_735_689_600_000;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Seed an RNG from the first 8 bytes of SHA256(seed)
fn rng_from_seed(seed: &str) -> StdRng {
    let digest = Sha256::digest(seed.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    StdRng::seed_from_u64(u64::from_le_bytes(bytes))
}

/// Amount with 2 decimals between min and max dollars
fn random_amount(rng: &mut StdRng, min: i64, max: i64) -> Decimal {
    let cents = rng.gen_range(min * 100..=max * 100);
    Decimal::new(cents, 2)
}

fn random_label(rng: &mut StdRng) -> &'static str {
    MOCK_LABELS[rng.gen_range(0..MOCK_LABELS.len())]
}

/// Generate index-like transactions for one account, newest first
pub fn mock_index_transactions(
    account: &str,
    ledger_id: &str,
    count: usize,
    now_ms: i64,
) -> Vec<CanonicalTransaction> {
    let mut rng = rng_from_seed(&format!("{}::{}::index", account, ledger_id));
    let start = MOCK_START_MS.min(now_ms);
    let mut transactions = Vec::with_capacity(count);

    for _ in 0..count {
        let mut amount = random_amount(&mut rng, 1, 300);
        let label = random_label(&mut rng);
        if OUTBOUND_LABELS.contains(&label) {
            amount = -amount;
        }
        let timestamp_ms = rng.gen_range(start..=now_ms);
        let id = rng.gen_range(0..1_000_000_000_000u64).to_string();

        transactions.push(CanonicalTransaction::new(
            id,
            amount,
            timestamp_ms,
            account,
            label,
        ));
    }

    transactions.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
    transactions
}

/// Generate user-entered transactions, newest first
pub fn mock_custom_transactions(seed: &str, count: usize, now_ms: i64) -> Vec<CanonicalTransaction> {
    let mut rng = rng_from_seed(&format!("{}::custom", seed));
    let mut transactions = Vec::with_capacity(count);

    for _ in 0..count {
        let amount = random_amount(&mut rng, 1, 300);
        let label = if rng.gen_bool(0.5) {
            "custom"
        } else {
            random_label(&mut rng)
        };
        let days_back = rng.gen_range(0..90i64);
        let jitter = rng.gen_range(0..DAY_MS);
        let timestamp_ms = now_ms - days_back * DAY_MS - jitter;
        let id = format!("c-{}", rng.gen_range(0..1_000_000_000_000u64));

        transactions.push(
            CanonicalTransaction::new(id, amount, timestamp_ms, "custom", label).custom(),
        );
    }

    transactions.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
    transactions
}

/// Demo labeled accounts
pub fn mock_accounts(count: usize) -> Vec<LabeledAccount> {
    const NAMES: &[&str] = &["Treasury", "Operations", "Grants", "Payroll", "Marketing", "Reserve"];

    (0..count)
        .map(|i| {
            let name = NAMES[i % NAMES.len()];
            let label = if i < NAMES.len() {
                name.to_string()
            } else {
                format!("{} {}", name, i / NAMES.len() + 1)
            };
            let owner = format!("{}-{:05}-cai", name.to_lowercase(), i);
            LabeledAccount::new(StoredAccount::Icrc1 { owner, subaccount: None }, label)
        })
        .collect()
}

/// Record source serving generated data for a set of accounts
pub struct MockSource {
    accounts: Vec<LabeledAccount>,
    ledger_id: String,
    per_account: usize,
    custom_count: usize,
    now_ms: i64,
}

impl MockSource {
    pub fn new(accounts: Vec<LabeledAccount>, now_ms: i64) -> Self {
        Self {
            accounts,
            ledger_id: String::new(),
            per_account: 10,
            custom_count: 5,
            now_ms,
        }
    }

    pub fn with_ledger_id(mut self, ledger_id: impl Into<String>) -> Self {
        self.ledger_id = ledger_id.into();
        self
    }

    pub fn with_counts(mut self, per_account: usize, custom_count: usize) -> Self {
        self.per_account = per_account;
        self.custom_count = custom_count;
        self
    }

    /// All generated transactions, index first, then custom
    pub fn transactions(&self) -> Vec<CanonicalTransaction> {
        let mut all: Vec<CanonicalTransaction> = self
            .accounts
            .iter()
            .flat_map(|a| {
                let mut txs =
                    mock_index_transactions(&a.account.key(), &self.ledger_id, self.per_account, self.now_ms);
                for tx in &mut txs {
                    tx.account_label = a.label.clone();
                }
                txs
            })
            .collect();
        all.extend(mock_custom_transactions("default-custom", self.custom_count, self.now_ms));
        all
    }
}

impl RecordSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_records(&self) -> Result<FetchRecordsResult> {
        Ok(FetchRecordsResult {
            records: self.transactions().into_iter().map(SourceRecord::from).collect(),
            warnings: Vec::new(),
        })
    }
}
