//! Monthly bill model
//!
//! Accumulates the minutes and fixed costs of one line for one month.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::traits::BillLedger;

/// Bill for a single line and month
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    /// Unique identifier
    pub id: Uuid,

    /// Billing month (1-12)
    pub month: u32,

    /// Billing year
    pub year: i32,

    /// Rate label set by the contract (e.g. "TERM")
    rate_label: Option<String>,

    /// Cost of every billed minute
    rate_per_minute: Decimal,

    /// Sum of monthly fees, deposits and prepaid credit
    fixed_cost: Decimal,

    /// Minutes charged at the rate
    billed_minutes: u64,

    /// Minutes covered by a free allotment
    free_minutes: u64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Serializable snapshot of a bill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillSummary {
    pub month: u32,
    pub year: i32,
    pub rate_label: Option<String>,
    pub rate_per_minute: Decimal,
    pub fixed_cost: Decimal,
    pub billed_minutes: u64,
    pub free_minutes: u64,
    pub minutes_cost: Decimal,
    pub total_cost: Decimal,
}

impl Bill {
    /// Create an empty bill for a month
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            month,
            year,
            rate_label: None,
            rate_per_minute: Decimal::ZERO,
            fixed_cost: Decimal::ZERO,
            billed_minutes: 0,
            free_minutes: 0,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn rate_label(&self) -> Option<&str> {
        self.rate_label.as_deref()
    }

    #[inline]
    pub fn rate_per_minute(&self) -> Decimal {
        self.rate_per_minute
    }

    #[inline]
    pub fn fixed_cost(&self) -> Decimal {
        self.fixed_cost
    }

    #[inline]
    pub fn billed_minutes(&self) -> u64 {
        self.billed_minutes
    }

    #[inline]
    pub fn free_minutes(&self) -> u64 {
        self.free_minutes
    }

    /// Cost of the billed minutes alone
    pub fn minutes_cost(&self) -> Decimal {
        Decimal::from(self.billed_minutes) * self.rate_per_minute
    }

    /// Total minutes recorded, billed or free
    pub fn total_minutes(&self) -> u64 {
        self.billed_minutes + self.free_minutes
    }

    /// Snapshot for reporting
    pub fn summary(&self) -> BillSummary {
        BillSummary {
            month: self.month,
            year: self.year,
            rate_label: self.rate_label.clone(),
            rate_per_minute: self.rate_per_minute,
            fixed_cost: self.fixed_cost,
            billed_minutes: self.billed_minutes,
            free_minutes: self.free_minutes,
            minutes_cost: self.minutes_cost(),
            total_cost: self.total_cost(),
        }
    }
}

impl BillLedger for Bill {
    fn set_rate(&mut self, label: &str, per_minute_rate: Decimal) {
        self.rate_label = Some(label.to_string());
        self.rate_per_minute = per_minute_rate;
    }

    fn add_fixed_cost(&mut self, amount: Decimal) {
        self.fixed_cost += amount;
    }

    fn add_billed_minutes(&mut self, count: u32) {
        self.billed_minutes += u64::from(count);
    }

    fn add_free_minutes(&mut self, count: u32) {
        self.free_minutes += u64::from(count);
    }

    fn total_cost(&self) -> Decimal {
        self.fixed_cost + self.minutes_cost()
    }
}
