//! Common traits
//!
//! Defines the ledger abstraction the contracts write into.

use rust_decimal::Decimal;

/// Per-month accumulator a contract prices calls into
///
/// Contracts only ever talk to a bill through this trait, so the driver can
/// supply any ledger that keeps these totals.
pub trait BillLedger {
    /// Set the rate label and the cost of each billed minute
    fn set_rate(&mut self, label: &str, per_minute_rate: Decimal);

    /// Add a fixed amount (fee, deposit, prepaid credit when negative)
    fn add_fixed_cost(&mut self, amount: Decimal);

    /// Record minutes charged at the current rate
    fn add_billed_minutes(&mut self, count: u32);

    /// Record minutes covered by a free allotment
    fn add_free_minutes(&mut self, count: u32);

    /// Fixed costs plus billed minutes at the current rate
    fn total_cost(&self) -> Decimal;
}
