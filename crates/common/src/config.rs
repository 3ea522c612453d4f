//! Application configuration.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Discovery configuration.
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    /// Moderation configuration.
    #[serde(default)]
    pub moderation: ModerationConfig,
    /// Blind date configuration.
    #[serde(default)]
    pub blind_date: BlindDateConfig,
    /// Payment configuration.
    #[serde(default)]
    pub payments: PaymentConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Discovery configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Default search radius in kilometers when a user has none configured.
    #[serde(default = "default_radius_km")]
    pub default_radius_km: f64,
    /// Default number of candidates returned per request.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

/// Moderation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    /// Lower the phone-detection confidence threshold from 0.6 to 0.3.
    #[serde(default)]
    pub strict_mode: bool,
    /// Fine charged per recorded violation.
    #[serde(default = "default_fine_amount")]
    pub fine_amount: Decimal,
    /// Suspension window applied when a violation is detected, in hours.
    #[serde(default = "default_suspension_hours")]
    pub suspension_hours: i64,
}

/// Blind date configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BlindDateConfig {
    /// Hours between a successful join and the scheduled date.
    #[serde(default = "default_schedule_offset_hours")]
    pub schedule_offset_hours: i64,
    /// Hours a pending request may wait for a partner before the escrow is
    /// refunded.
    #[serde(default = "default_refund_window_hours")]
    pub refund_window_hours: i64,
}

/// Payment configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Delay before a pending payment is settled, in seconds.
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

const fn default_radius_km() -> f64 {
    50.0
}

const fn default_limit() -> usize {
    20
}

fn default_fine_amount() -> Decimal {
    Decimal::new(500, 1) // 50.0
}

const fn default_suspension_hours() -> i64 {
    24
}

const fn default_schedule_offset_hours() -> i64 {
    24
}

const fn default_refund_window_hours() -> i64 {
    48
}

const fn default_settle_delay_secs() -> u64 {
    2
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            default_radius_km: default_radius_km(),
            default_limit: default_limit(),
        }
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            strict_mode: false,
            fine_amount: default_fine_amount(),
            suspension_hours: default_suspension_hours(),
        }
    }
}

impl Default for BlindDateConfig {
    fn default() -> Self {
        Self {
            schedule_offset_hours: default_schedule_offset_hours(),
            refund_window_hours: default_refund_window_hours(),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            settle_delay_secs: default_settle_delay_secs(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `LOVEAR_ENV`)
    /// 3. Environment variables with `LOVEAR_` prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = std::env::var("LOVEAR_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LOVEAR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("LOVEAR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
