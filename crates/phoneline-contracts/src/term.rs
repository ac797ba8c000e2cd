//! Term contract
//!
//! A fixed-term commitment. The customer pays a deposit in the starting month
//! and a reduced monthly fee, and every month begins with an allotment of free
//! minutes that calls draw down before the per-minute rate applies.
//!
//! Settlement depends on when the line is cancelled relative to the
//! contractual end date:
//!
//! - on or before `finish`: the customer owes the month's total, which still
//!   carries the deposit, so the deposit is forfeited
//! - after `finish`: the deposit is refunded against the month's total

use chrono::{Datelike, NaiveDate};
use phoneline_core::{config::TermPricing, models::Call, traits::BillLedger, AppResult};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::contract::{validate_period, ContractKind, ContractState};

/// Term contract for a phone line
#[derive(Debug, Clone)]
pub struct TermContract<B> {
    pub(crate) state: ContractState<B>,

    /// Start month and year, kept after cancellation clears `start`
    start_period: (u32, i32),

    /// Contractual end date
    finish: NaiveDate,

    /// Free minutes left in the current month
    freebies: u32,

    /// First day of the month most recently advanced to
    point: NaiveDate,

    pricing: TermPricing,
}

impl<B: BillLedger> TermContract<B> {
    /// Create an inactive contract with the default pricing
    pub fn new(start: NaiveDate, finish: NaiveDate) -> Self {
        Self::with_pricing(start, finish, TermPricing::default())
    }

    /// Create an inactive contract with explicit pricing
    pub fn with_pricing(start: NaiveDate, finish: NaiveDate, pricing: TermPricing) -> Self {
        Self {
            state: ContractState::new(start),
            start_period: (start.month(), start.year()),
            finish,
            freebies: pricing.free_minutes,
            point: start,
            pricing,
        }
    }

    #[inline]
    pub fn finish(&self) -> NaiveDate {
        self.finish
    }

    /// Free minutes left in the current month
    #[inline]
    pub fn freebies(&self) -> u32 {
        self.freebies
    }

    /// First day of the month most recently advanced to
    #[inline]
    pub fn point(&self) -> NaiveDate {
        self.point
    }

    /// Whether `(month, year)` is the month the contract started in
    pub fn is_start_period(&self, month: u32, year: i32) -> bool {
        self.start_period == (month, year)
    }

    #[instrument(skip(self, bill))]
    pub(crate) fn new_month(&mut self, month: u32, year: i32, mut bill: B) -> AppResult<Option<B>> {
        self.state.ensure_open()?;
        let first_of_month = validate_period(month, year)?;

        bill.set_rate(ContractKind::Term.rate_label(), self.pricing.rate_per_minute);
        bill.add_fixed_cost(self.pricing.monthly_fee);

        if self.is_start_period(month, year) {
            bill.add_fixed_cost(self.pricing.deposit);
            info!(deposit = %self.pricing.deposit, "Term deposit charged");
        }

        self.freebies = self.pricing.free_minutes;
        self.point = first_of_month;

        info!(freebies = self.freebies, "Term contract advanced");
        Ok(self.state.bind(bill))
    }

    pub(crate) fn bill_call(&mut self, call: &Call) -> AppResult<()> {
        let minutes = call.billable_minutes();
        let bill = self.state.active_bill()?;

        if 0 < self.freebies && self.freebies < minutes {
            // Record what was left before zeroing the allotment
            let free = self.freebies;
            bill.add_free_minutes(free);
            bill.add_billed_minutes(minutes - free);
            self.freebies = 0;
            debug!(call_id = %call.id, free, billed = minutes - free, "Free minutes exhausted");
        } else if self.freebies >= minutes {
            self.freebies -= minutes;
            bill.add_free_minutes(minutes);
            debug!(call_id = %call.id, free = minutes, remaining = self.freebies, "Call covered by free minutes");
        } else {
            bill.add_billed_minutes(minutes);
            debug!(call_id = %call.id, billed = minutes, "Billed call minutes");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub(crate) fn cancel_contract(&mut self) -> AppResult<Decimal> {
        let total = self.state.close()?;

        let owed = if self.point <= self.finish {
            total
        } else {
            total - self.pricing.deposit
        };

        info!(%owed, point = %self.point, finish = %self.finish, "Term contract cancelled");
        Ok(owed)
    }
}
