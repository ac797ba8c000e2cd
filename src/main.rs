//! Phoneline Billing demo runner
//!
//! Loads pricing configuration, drives one line of every contract kind through
//! a year of synthetic calls and logs each line's statement and settlement.

use anyhow::Context;
use chrono::{NaiveDate, TimeZone, Utc};
use phoneline_contracts::BillingCycle;
use phoneline_core::{models::Call, AppConfig};
use rust_decimal_macros::dec;
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const MTM_LINE: &str = "416-555-0101";
const TERM_LINE: &str = "416-555-0102";
const PREPAID_LINE: &str = "416-555-0103";

/// Initialize tracing/logging
fn init_tracing(config: &AppConfig) {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| config.logging.level.clone());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "phoneline_billing={},phoneline_contracts={},phoneline_core={}",
            log_level, log_level, log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.logging.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }
}

/// Calls placed by a line in a month, varied per line and month
fn synthetic_calls(number: &str, line_index: u32, month: u32, year: i32) -> anyhow::Result<Vec<Call>> {
    let count = 3 + (month + line_index) % 4;

    (0..count)
        .map(|i| {
            let day = 1 + (i * 7 + line_index) % 28;
            let time = Utc
                .with_ymd_and_hms(year, month, day, 9 + i, 0, 0)
                .single()
                .with_context(|| format!("invalid call time {}-{}-{}", year, month, day))?;
            let seconds = 45 + (month * 613 + i * 1_237 + line_index * 401) % 2_400;
            Ok(Call::new(number, time, seconds))
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load_validated().context("failed to load configuration")?;
    init_tracing(&config);

    info!(
        "Starting Phoneline Billing v{}",
        env!("CARGO_PKG_VERSION")
    );

    let year = 2023;
    let start = NaiveDate::from_ymd_opt(year, 1, 1).context("invalid start date")?;
    let term_finish = NaiveDate::from_ymd_opt(year, 9, 30).context("invalid finish date")?;

    let mut cycle = BillingCycle::new(config.pricing.clone());
    cycle.register_month_to_month(MTM_LINE, start)?;
    cycle.register_term(TERM_LINE, start, term_finish)?;
    cycle.register_prepaid(PREPAID_LINE, start, dec!(40.00))?;

    let lines = [MTM_LINE, TERM_LINE, PREPAID_LINE];

    for month in 1..=12 {
        cycle.advance_month(month, year)?;
        for (index, number) in (0u32..).zip(lines) {
            let calls = synthetic_calls(number, index, month, year)?;
            cycle.record_calls(&calls)?;
        }
    }

    for number in lines {
        let statement = cycle.statement(number)?;
        info!(
            "Statement for {}:\n{}",
            number,
            serde_json::to_string_pretty(&statement)?
        );

        let owed = cycle.cancel(number)?;
        info!("Line {} settled: {} owed", number, owed);
    }

    Ok(())
}
