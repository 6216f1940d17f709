//! Configuration management
//!
//! Settings live in `settings.json` inside the dtrack directory:
//! ```json
//! {
//!   "labels": { "onChain": [...], "custom": [...], "sent": "...", "received": "..." },
//!   "pricing": { "defaultUsdPerToken": 5, "ledgers": { "<ledger id>": 5 } },
//!   "display": { "utcOffsetMinutes": 0 }
//! }
//! ```
//! Keys this crate does not manage are preserved on save.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use chrono::{FixedOffset, Offset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{LabelSettings, LabelVocabulary};

/// Environment override for the display offset (for CI/testing)
pub const UTC_OFFSET_ENV: &str = "DTRACK_UTC_OFFSET_MINUTES";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    labels: LabelSettings,
    #[serde(default)]
    pricing: PricingSettings,
    #[serde(default)]
    display: DisplaySettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Token price settings used by the fixed-rate converter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSettings {
    #[serde(default = "default_usd_per_token")]
    pub default_usd_per_token: Decimal,
    /// Per-ledger overrides keyed by ledger id
    #[serde(default)]
    pub ledgers: HashMap<String, Decimal>,
}

fn default_usd_per_token() -> Decimal {
    Decimal::from(5)
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            default_usd_per_token: default_usd_per_token(),
            ledgers: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisplaySettings {
    #[serde(default)]
    utc_offset_minutes: i32,
}

/// dtrack configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub labels: LabelSettings,
    pub pricing: PricingSettings,
    /// Offset used to decide which local day/month a timestamp falls in
    pub utc_offset_minutes: i32,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            labels: LabelSettings::default(),
            pricing: PricingSettings::default(),
            utc_offset_minutes: 0,
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the dtrack directory
    ///
    /// A missing or unreadable settings file yields defaults. The display
    /// offset can be overridden via DTRACK_UTC_OFFSET_MINUTES.
    pub fn load(dtrack_dir: &Path) -> Result<Self> {
        let settings_path = dtrack_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let utc_offset_minutes = std::env::var(UTC_OFFSET_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<i32>().ok())
            .unwrap_or(raw.display.utc_offset_minutes);

        Ok(Self {
            labels: raw.labels.clone(),
            pricing: raw.pricing.clone(),
            utc_offset_minutes,
            _raw_settings: raw,
        })
    }

    /// Save config to the dtrack directory
    /// Preserves other settings that the CLI doesn't manage
    pub fn save(&self, dtrack_dir: &Path) -> Result<()> {
        let settings_path = dtrack_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        settings.labels = self.labels.clone();
        settings.pricing = self.pricing.clone();
        settings.display.utc_offset_minutes = self.utc_offset_minutes;

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// Zone used for local day/month boundaries
    ///
    /// Offsets outside +/-24h fall back to UTC.
    pub fn timezone(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
    }

    /// Classification vocabulary built from the label settings
    pub fn vocabulary(&self) -> LabelVocabulary {
        LabelVocabulary::from_settings(&self.labels)
    }
}
