//! Month-to-month contract
//!
//! No commitment: a flat monthly fee and every minute billed at the MTM rate.

use chrono::NaiveDate;
use phoneline_core::{
    config::MonthToMonthPricing, models::Call, traits::BillLedger, AppResult,
};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::contract::{validate_period, ContractKind, ContractState};

/// Month-to-month contract for a phone line
#[derive(Debug, Clone)]
pub struct MonthToMonthContract<B> {
    pub(crate) state: ContractState<B>,

    /// Not used for pricing
    finish: Option<NaiveDate>,

    pricing: MonthToMonthPricing,
}

impl<B: BillLedger> MonthToMonthContract<B> {
    /// Create an inactive contract with the default pricing
    pub fn new(start: NaiveDate) -> Self {
        Self::with_pricing(start, MonthToMonthPricing::default())
    }

    /// Create an inactive contract with explicit pricing
    pub fn with_pricing(start: NaiveDate, pricing: MonthToMonthPricing) -> Self {
        Self {
            state: ContractState::new(start),
            finish: None,
            pricing,
        }
    }

    #[inline]
    pub(crate) fn finish(&self) -> Option<NaiveDate> {
        self.finish
    }

    #[instrument(skip(self, bill))]
    pub(crate) fn new_month(&mut self, month: u32, year: i32, mut bill: B) -> AppResult<Option<B>> {
        self.state.ensure_open()?;
        validate_period(month, year)?;

        bill.set_rate(
            ContractKind::MonthToMonth.rate_label(),
            self.pricing.rate_per_minute,
        );
        bill.add_fixed_cost(self.pricing.monthly_fee);

        info!(fee = %self.pricing.monthly_fee, "Month-to-month contract advanced");
        Ok(self.state.bind(bill))
    }

    pub(crate) fn bill_call(&mut self, call: &Call) -> AppResult<()> {
        self.state.bill_minutes(call)
    }

    #[instrument(skip(self))]
    pub(crate) fn cancel_contract(&mut self) -> AppResult<Decimal> {
        let owed = self.state.close()?;
        info!(%owed, "Month-to-month contract cancelled");
        Ok(owed)
    }
}
