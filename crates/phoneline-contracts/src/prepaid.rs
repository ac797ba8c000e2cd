//! Prepaid contract
//!
//! The balance is kept as the amount owed to the provider, so loaded credit is
//! negative. Each month the previous bill's total becomes the new balance and
//! the line is topped up until at least the minimum credit is available.

use chrono::NaiveDate;
use phoneline_core::{
    config::PrepaidPricing, models::Call, traits::BillLedger, AppError, AppResult,
};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument};

use crate::contract::{validate_period, ContractKind, ContractState};

/// Prepaid contract for a phone line
#[derive(Debug, Clone)]
pub struct PrepaidContract<B> {
    pub(crate) state: ContractState<B>,

    /// Not used for pricing
    finish: Option<NaiveDate>,

    /// Amount owed to the provider; negative is credit
    balance: Decimal,

    pricing: PrepaidPricing,
}

impl<B: BillLedger> PrepaidContract<B> {
    /// Create an inactive contract with `balance` of credit loaded
    pub fn new(start: NaiveDate, balance: Decimal) -> AppResult<Self> {
        Self::with_pricing(start, balance, PrepaidPricing::default())
    }

    /// Create an inactive contract with explicit pricing
    pub fn with_pricing(start: NaiveDate, balance: Decimal, pricing: PrepaidPricing) -> AppResult<Self> {
        if balance < Decimal::ZERO {
            return Err(AppError::InvalidInput(format!(
                "prepaid balance cannot be negative: {}",
                balance
            )));
        }
        if pricing.top_up_amount <= Decimal::ZERO {
            return Err(AppError::InvalidInput(format!(
                "prepaid top-up amount must be positive: {}",
                pricing.top_up_amount
            )));
        }

        Ok(Self {
            state: ContractState::new(start),
            finish: None,
            balance: -balance,
            pricing,
        })
    }

    /// Amount owed to the provider; negative is credit
    #[inline]
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Credit available to the customer
    #[inline]
    pub fn credit(&self) -> Decimal {
        -self.balance
    }

    #[inline]
    pub(crate) fn finish(&self) -> Option<NaiveDate> {
        self.finish
    }

    /// Top up until at least `minimum_credit` is available
    ///
    /// Returns the number of top-ups applied.
    fn top_up(&mut self) -> Decimal {
        let threshold = -self.pricing.minimum_credit;
        if self.balance <= threshold {
            return Decimal::ZERO;
        }

        let top_ups = ((self.balance - threshold) / self.pricing.top_up_amount).ceil();
        self.balance -= top_ups * self.pricing.top_up_amount;
        top_ups
    }

    #[instrument(skip(self, bill))]
    pub(crate) fn new_month(&mut self, month: u32, year: i32, mut bill: B) -> AppResult<Option<B>> {
        self.state.ensure_open()?;
        validate_period(month, year)?;

        bill.set_rate(ContractKind::Prepaid.rate_label(), self.pricing.rate_per_minute);

        // Carry the previous month forward; nothing to carry on the first month
        if let Some(previous) = self.state.bill() {
            self.balance = previous.total_cost();
            debug!(balance = %self.balance, "Carried balance from previous bill");
        }

        let top_ups = self.top_up();
        if top_ups > Decimal::ZERO {
            info!(%top_ups, amount = %self.pricing.top_up_amount, "Prepaid line topped up");
        }

        bill.add_fixed_cost(self.balance);

        info!(balance = %self.balance, "Prepaid contract advanced");
        Ok(self.state.bind(bill))
    }

    pub(crate) fn bill_call(&mut self, call: &Call) -> AppResult<()> {
        self.state.bill_minutes(call)
    }

    #[instrument(skip(self))]
    pub(crate) fn cancel_contract(&mut self) -> AppResult<Decimal> {
        let total = self.state.close()?;

        // Remaining credit is forfeited, never refunded
        let owed = if total <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            total
        };

        info!(%owed, %total, "Prepaid contract cancelled");
        Ok(owed)
    }
}
