//! Fixed-rate USD converter

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::config::PricingSettings;
use crate::ports::UsdConverter;

/// Converts tokens at a configured price per ledger
///
/// Ledgers without an explicit price use the default rate.
#[derive(Debug, Clone)]
pub struct FixedRateConverter {
    default_rate: Decimal,
    ledger_rates: HashMap<String, Decimal>,
}

impl FixedRateConverter {
    pub fn new(default_rate: Decimal) -> Self {
        Self {
            default_rate,
            ledger_rates: HashMap::new(),
        }
    }

    pub fn from_settings(settings: &PricingSettings) -> Self {
        Self {
            default_rate: settings.default_usd_per_token,
            ledger_rates: settings.ledgers.clone(),
        }
    }

    /// Set the price for one ledger
    pub fn with_ledger_rate(mut self, ledger_id: impl Into<String>, rate: Decimal) -> Self {
        self.ledger_rates.insert(ledger_id.into(), rate);
        self
    }

    pub fn rate_for(&self, ledger_id: Option<&str>) -> Decimal {
        ledger_id
            .and_then(|id| self.ledger_rates.get(id))
            .copied()
            .unwrap_or(self.default_rate)
    }
}

impl Default for FixedRateConverter {
    fn default() -> Self {
        Self::from_settings(&PricingSettings::default())
    }
}

impl UsdConverter for FixedRateConverter {
    fn to_usd(&self, ledger_id: Option<&str>, tokens: Decimal) -> Decimal {
        // Overflow only happens for absurd inputs; treat it as no value
        tokens.checked_mul(self.rate_for(ledger_id)).unwrap_or(Decimal::ZERO)
    }
}
