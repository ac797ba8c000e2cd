//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Pricing tables are injected into the contracts from here rather than living in
//! process-wide constants, so tests and deployments can swap them.

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::env;
use tracing::debug;

use crate::error::AppError;

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default level used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human readable output
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Rate and fee tables for every contract kind
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct PricingConfig {
    #[serde(default)]
    pub month_to_month: MonthToMonthPricing,

    #[serde(default)]
    pub term: TermPricing,

    #[serde(default)]
    pub prepaid: PrepaidPricing,
}

/// Month-to-month pricing
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MonthToMonthPricing {
    /// Cost of every billed minute
    #[serde(default = "default_mtm_rate")]
    pub rate_per_minute: Decimal,

    /// Fixed fee added on every month advance
    #[serde(default = "default_mtm_fee")]
    pub monthly_fee: Decimal,
}

fn default_mtm_rate() -> Decimal {
    dec!(0.05)
}

fn default_mtm_fee() -> Decimal {
    dec!(50.00)
}

impl Default for MonthToMonthPricing {
    fn default() -> Self {
        Self {
            rate_per_minute: default_mtm_rate(),
            monthly_fee: default_mtm_fee(),
        }
    }
}

/// Term contract pricing
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TermPricing {
    /// Cost of every billed minute beyond the free allotment
    #[serde(default = "default_term_rate")]
    pub rate_per_minute: Decimal,

    /// Fixed fee added on every month advance
    #[serde(default = "default_term_fee")]
    pub monthly_fee: Decimal,

    /// One-time deposit charged in the starting month, refunded after term
    #[serde(default = "default_term_deposit")]
    pub deposit: Decimal,

    /// Free minutes granted at the start of every month
    #[serde(default = "default_term_free_minutes")]
    pub free_minutes: u32,
}

fn default_term_rate() -> Decimal {
    dec!(0.10)
}

fn default_term_fee() -> Decimal {
    dec!(20.00)
}

fn default_term_deposit() -> Decimal {
    dec!(300.00)
}

fn default_term_free_minutes() -> u32 {
    100
}

impl Default for TermPricing {
    fn default() -> Self {
        Self {
            rate_per_minute: default_term_rate(),
            monthly_fee: default_term_fee(),
            deposit: default_term_deposit(),
            free_minutes: default_term_free_minutes(),
        }
    }
}

/// Prepaid contract pricing
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PrepaidPricing {
    /// Cost of every billed minute
    #[serde(default = "default_prepaid_rate")]
    pub rate_per_minute: Decimal,

    /// Credit below which the line is topped up at month advance
    #[serde(default = "default_prepaid_minimum_credit")]
    pub minimum_credit: Decimal,

    /// Amount of credit added by each top-up
    #[serde(default = "default_prepaid_top_up")]
    pub top_up_amount: Decimal,
}

fn default_prepaid_rate() -> Decimal {
    dec!(0.025)
}

fn default_prepaid_minimum_credit() -> Decimal {
    dec!(10.00)
}

fn default_prepaid_top_up() -> Decimal {
    dec!(25.00)
}

impl Default for PrepaidPricing {
    fn default() -> Self {
        Self {
            rate_per_minute: default_prepaid_rate(),
            minimum_credit: default_prepaid_minimum_credit(),
            top_up_amount: default_prepaid_top_up(),
        }
    }
}

impl PricingConfig {
    /// Validate pricing configuration
    pub fn validate(&self) -> Result<(), AppError> {
        let amounts = [
            ("month_to_month.rate_per_minute", self.month_to_month.rate_per_minute),
            ("month_to_month.monthly_fee", self.month_to_month.monthly_fee),
            ("term.rate_per_minute", self.term.rate_per_minute),
            ("term.monthly_fee", self.term.monthly_fee),
            ("term.deposit", self.term.deposit),
            ("prepaid.rate_per_minute", self.prepaid.rate_per_minute),
            ("prepaid.minimum_credit", self.prepaid.minimum_credit),
        ];

        for (name, value) in amounts {
            if value < Decimal::ZERO {
                return Err(AppError::Config(format!("{} cannot be negative", name)));
            }
        }

        // A non-positive top-up would never bring the balance under the threshold
        if self.prepaid.top_up_amount <= Decimal::ZERO {
            return Err(AppError::Config(
                "prepaid.top_up_amount must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Environment source; keys are `PHONELINE__` followed by `__`-separated paths
fn environment() -> Environment {
    Environment::with_prefix("PHONELINE")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables, e.g. PHONELINE__PRICING__TERM__DEPOSIT
            .add_source(environment())
            .build()?;

        debug!("Loaded configuration for run mode {}", run_mode);
        config.try_deserialize()
    }

    /// Load and validate in one step
    pub fn load_validated() -> Result<Self, AppError> {
        let config = Self::load()?;
        config.pricing.validate()?;
        Ok(config)
    }
}
