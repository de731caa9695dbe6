//! # Fulfillment Configuration
//!
//! Pricing, notification, order log and database settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FULFILLMENT_TAX_RATE_PPM=88750                                     │
//! │     FULFILLMENT_WEBHOOK_URL=https://hooks.example.com/orders           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/fulfillment/fulfillment.toml (Linux)                     │
//! │     ~/Library/Application Support/com.fulfillment.pipeline/... (macOS) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     10% tax, free shipping above $100.00, $5.00 shipping               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [pricing]
//! tax_rate_ppm = 100000                 # 10%; 88750 is 8.875%
//! free_shipping_threshold_cents = 10000 # strictly above this ships free
//! shipping_rate_cents = 500
//!
//! [notification]
//! webhook_url = "https://hooks.example.com/orders"
//! timeout_secs = 10
//!
//! [log]
//! dir = "/var/log/fulfillment"
//! file_name = "orders.log"
//!
//! [database]
//! path = "/var/lib/fulfillment/fulfillment.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use fulfillment_core::validation::{validate_amount_cents, validate_http_url, validate_tax_rate_ppm};
use fulfillment_core::{Money, PricingPolicy, TaxRate};

use crate::error::{PipelineError, PipelineResult};

const CONFIG_FILE_NAME: &str = "fulfillment.toml";

// =============================================================================
// Pricing Settings
// =============================================================================

/// Tax and shipping parameters used to recompute order totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Tax rate in parts per million (100000 = 10%).
    #[serde(default = "default_tax_rate_ppm")]
    pub tax_rate_ppm: u32,

    /// Subtotals strictly greater than this ship free.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold_cents: i64,

    /// Flat shipping fee below the threshold.
    #[serde(default = "default_shipping_rate")]
    pub shipping_rate_cents: i64,
}

fn default_tax_rate_ppm() -> u32 {
    100_000
}

fn default_free_shipping_threshold() -> i64 {
    10_000
}

fn default_shipping_rate() -> i64 {
    500
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            tax_rate_ppm: default_tax_rate_ppm(),
            free_shipping_threshold_cents: default_free_shipping_threshold(),
            shipping_rate_cents: default_shipping_rate(),
        }
    }
}

// =============================================================================
// Notification Settings
// =============================================================================

/// Webhook delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Endpoint receiving `order_processed` events. No URL, no webhook.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            webhook_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

// =============================================================================
// Log + Database Settings
// =============================================================================

/// Where committed orders are appended as text lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_log_file_name")]
    pub file_name: String,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_file_name() -> String {
    "orders.log".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            dir: default_log_dir(),
            file_name: default_log_file_name(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("fulfillment.db")
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete fulfillment configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FulfillmentConfig {
    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub notification: NotificationSettings,

    #[serde(default)]
    pub log: LogSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl FulfillmentConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (explicit path, else the platform config dir)
    /// 3. Environment variables
    ///
    /// The result is validated before it is returned.
    pub fn load(config_path: Option<PathBuf>) -> PipelineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading fulfillment config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load fulfillment config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration as pretty TOML, creating parent directories.
    pub fn save(&self, config_path: Option<PathBuf>) -> PipelineResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| PipelineError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Fulfillment config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> PipelineResult<()> {
        validate_tax_rate_ppm(self.pricing.tax_rate_ppm)?;
        validate_amount_cents(
            "free_shipping_threshold",
            self.pricing.free_shipping_threshold_cents,
        )?;
        validate_amount_cents("shipping_rate", self.pricing.shipping_rate_cents)?;

        if let Some(ref url) = self.notification.webhook_url {
            validate_http_url("webhook_url", url)?;
        }

        if self.notification.timeout_secs == 0 {
            return Err(PipelineError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.log.file_name.trim().is_empty() {
            return Err(PipelineError::InvalidConfig(
                "log file_name must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies `FULFILLMENT_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from an arbitrary key lookup.
    ///
    /// Unparseable numeric values are ignored with a warning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup("FULFILLMENT_TAX_RATE_PPM") {
            match raw.parse::<u32>() {
                Ok(ppm) => {
                    debug!(ppm, "Overriding tax rate from environment");
                    self.pricing.tax_rate_ppm = ppm;
                }
                Err(_) => warn!(value = %raw, "Ignoring unparseable FULFILLMENT_TAX_RATE_PPM"),
            }
        }

        if let Some(raw) = lookup("FULFILLMENT_FREE_SHIPPING_THRESHOLD_CENTS") {
            match raw.parse::<i64>() {
                Ok(cents) => self.pricing.free_shipping_threshold_cents = cents,
                Err(_) => warn!(
                    value = %raw,
                    "Ignoring unparseable FULFILLMENT_FREE_SHIPPING_THRESHOLD_CENTS"
                ),
            }
        }

        if let Some(raw) = lookup("FULFILLMENT_SHIPPING_RATE_CENTS") {
            match raw.parse::<i64>() {
                Ok(cents) => self.pricing.shipping_rate_cents = cents,
                Err(_) => warn!(value = %raw, "Ignoring unparseable FULFILLMENT_SHIPPING_RATE_CENTS"),
            }
        }

        if let Some(url) = lookup("FULFILLMENT_WEBHOOK_URL") {
            debug!(url = %url, "Overriding webhook URL from environment");
            self.notification.webhook_url = Some(url).filter(|u| !u.trim().is_empty());
        }

        if let Some(dir) = lookup("FULFILLMENT_LOG_DIR") {
            self.log.dir = PathBuf::from(dir);
        }

        if let Some(path) = lookup("FULFILLMENT_DB_PATH") {
            self.database.path = PathBuf::from(path);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "fulfillment", "pipeline")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Converts the pricing section into the core pricing policy.
    pub fn pricing_policy(&self) -> PricingPolicy {
        PricingPolicy::new(
            TaxRate::from_ppm(self.pricing.tax_rate_ppm),
            Money::from_cents(self.pricing.free_shipping_threshold_cents),
            Money::from_cents(self.pricing.shipping_rate_cents),
        )
    }

    /// Full path of the order log file.
    pub fn log_destination(&self) -> PathBuf {
        self.log.dir.join(&self.log.file_name)
    }

    /// Returns the webhook URL if configured.
    pub fn webhook_url(&self) -> Option<&str> {
        self.notification.webhook_url.as_deref()
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = FulfillmentConfig::default();
        assert_eq!(config.pricing.tax_rate_ppm, 100_000);
        assert_eq!(config.pricing.free_shipping_threshold_cents, 10_000);
        assert_eq!(config.pricing.shipping_rate_cents, 500);
        assert_eq!(config.webhook_url(), None);
        assert_eq!(config.log_destination(), PathBuf::from("logs").join("orders.log"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = FulfillmentConfig::default();

        config.pricing.tax_rate_ppm = 1_000_001;
        assert!(config.validate().is_err());
        config.pricing.tax_rate_ppm = 88_750;

        config.pricing.shipping_rate_cents = -1;
        assert!(config.validate().is_err());
        config.pricing.shipping_rate_cents = 0;

        config.notification.webhook_url = Some("ftp://example.com".to_string());
        assert!(config.validate().is_err());
        config.notification.webhook_url = Some("https://example.com/hook".to_string());
        assert!(config.validate().is_ok());

        config.log.file_name = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: FulfillmentConfig = toml::from_str(
            r#"
            [pricing]
            tax_rate_ppm = 88750

            [log]
            dir = "/tmp/fulfillment"
            "#,
        )
        .unwrap();

        assert_eq!(config.pricing.tax_rate_ppm, 88_750);
        assert_eq!(config.pricing.shipping_rate_cents, 500);
        assert_eq!(
            config.log_destination(),
            PathBuf::from("/tmp/fulfillment/orders.log")
        );
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("FULFILLMENT_TAX_RATE_PPM", "88750"),
            ("FULFILLMENT_SHIPPING_RATE_CENTS", "not-a-number"),
            ("FULFILLMENT_WEBHOOK_URL", "http://localhost:9000/hook"),
            ("FULFILLMENT_DB_PATH", "/data/f.db"),
        ]
        .into_iter()
        .collect();

        let mut config = FulfillmentConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.pricing.tax_rate_ppm, 88_750);
        assert_eq!(config.pricing.shipping_rate_cents, 500);
        assert_eq!(config.webhook_url(), Some("http://localhost:9000/hook"));
        assert_eq!(config.database.path, PathBuf::from("/data/f.db"));
    }

    #[test]
    fn test_pricing_policy_conversion() {
        let policy = FulfillmentConfig::default().pricing_policy();
        assert_eq!(policy.tax_rate, TaxRate::from_percentage(10.0));
        assert_eq!(policy.free_shipping_threshold, Money::from_cents(10_000));
        assert_eq!(policy.shipping_rate, Money::from_cents(500));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("fulfillment-config-{}", uuid::Uuid::new_v4()));
        let path = dir.join("fulfillment.toml");

        let mut config = FulfillmentConfig::default();
        config.pricing.tax_rate_ppm = 72_500;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[pricing]"));

        let loaded: FulfillmentConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);

        std::fs::remove_dir_all(dir).ok();
    }
}
