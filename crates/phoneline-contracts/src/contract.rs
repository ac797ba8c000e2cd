//! Contract sum type
//!
//! A phone line is governed by exactly one contract kind. Each kind prices the
//! month advance, the individual call and the final settlement differently;
//! the enum dispatches to the variant so every kind must implement all three.

use chrono::NaiveDate;
use phoneline_core::{
    models::{Bill, Call},
    traits::BillLedger,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::month_to_month::MonthToMonthContract;
use crate::prepaid::PrepaidContract;
use crate::term::TermContract;

/// Contract kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    /// No commitment, every minute billed
    MonthToMonth,
    /// Fixed term with deposit and monthly free minutes
    Term,
    /// Credit loaded up front and topped up monthly
    Prepaid,
}

impl ContractKind {
    /// Label written on the bill when the rate is set
    pub fn rate_label(&self) -> &'static str {
        match self {
            ContractKind::MonthToMonth => "MTM",
            ContractKind::Term => "TERM",
            ContractKind::Prepaid => "PREPAID",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rate_label())
    }
}

/// Lifecycle state every contract kind carries
///
/// `start` is cleared on cancellation; `bill` is the ledger for the month
/// most recently advanced to.
#[derive(Debug, Clone)]
pub(crate) struct ContractState<B> {
    start: Option<NaiveDate>,
    bill: Option<B>,
}

impl<B: BillLedger> ContractState<B> {
    pub(crate) fn new(start: NaiveDate) -> Self {
        Self {
            start: Some(start),
            bill: None,
        }
    }

    #[inline]
    pub(crate) fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    #[inline]
    pub(crate) fn bill(&self) -> Option<&B> {
        self.bill.as_ref()
    }

    /// Fail if the contract has been cancelled
    pub(crate) fn ensure_open(&self) -> AppResult<NaiveDate> {
        self.start.ok_or(AppError::ContractCancelled)
    }

    /// Bind the bill for a new month and hand back the previous one
    pub(crate) fn bind(&mut self, bill: B) -> Option<B> {
        self.bill.replace(bill)
    }

    /// Ledger for the active month
    pub(crate) fn active_bill(&mut self) -> AppResult<&mut B> {
        self.ensure_open()?;
        self.bill.as_mut().ok_or(AppError::NoActiveBill)
    }

    /// Charge every minute of the call at the configured rate
    pub(crate) fn bill_minutes(&mut self, call: &Call) -> AppResult<()> {
        let minutes = call.billable_minutes();
        self.active_bill()?.add_billed_minutes(minutes);
        debug!(call_id = %call.id, minutes, "Billed call minutes");
        Ok(())
    }

    /// Clear the start date and return the active bill's total cost
    pub(crate) fn close(&mut self) -> AppResult<Decimal> {
        let total = self.active_bill()?.total_cost();
        self.start = None;
        Ok(total)
    }
}

/// Check a month/year pair handed to `new_month`
pub(crate) fn validate_period(month: u32, year: i32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| AppError::InvalidInput(format!("invalid billing period {}/{}", month, year)))
}

/// A phone-line contract
#[derive(Debug, Clone)]
pub enum Contract<B = Bill> {
    MonthToMonth(MonthToMonthContract<B>),
    Term(TermContract<B>),
    Prepaid(PrepaidContract<B>),
}

impl<B: BillLedger> Contract<B> {
    /// Contract kind
    pub fn kind(&self) -> ContractKind {
        match self {
            Contract::MonthToMonth(_) => ContractKind::MonthToMonth,
            Contract::Term(_) => ContractKind::Term,
            Contract::Prepaid(_) => ContractKind::Prepaid,
        }
    }

    /// Advance to a new month
    ///
    /// Binds `bill` as the active ledger, sets the rate and adds the month's
    /// fixed costs. The previously active bill, if any, is returned so the
    /// caller can archive it.
    pub fn new_month(&mut self, month: u32, year: i32, bill: B) -> AppResult<Option<B>> {
        match self {
            Contract::MonthToMonth(c) => c.new_month(month, year, bill),
            Contract::Term(c) => c.new_month(month, year, bill),
            Contract::Prepaid(c) => c.new_month(month, year, bill),
        }
    }

    /// Price a call into the active bill
    ///
    /// `new_month` must have been called for the month the call was made in.
    pub fn bill_call(&mut self, call: &Call) -> AppResult<()> {
        match self {
            Contract::MonthToMonth(c) => c.bill_call(call),
            Contract::Term(c) => c.bill_call(call),
            Contract::Prepaid(c) => c.bill_call(call),
        }
    }

    /// Close the contract and return the amount owed
    ///
    /// The contract cannot be advanced or billed afterwards.
    pub fn cancel_contract(&mut self) -> AppResult<Decimal> {
        match self {
            Contract::MonthToMonth(c) => c.cancel_contract(),
            Contract::Term(c) => c.cancel_contract(),
            Contract::Prepaid(c) => c.cancel_contract(),
        }
    }

    fn state(&self) -> &ContractState<B> {
        match self {
            Contract::MonthToMonth(c) => &c.state,
            Contract::Term(c) => &c.state,
            Contract::Prepaid(c) => &c.state,
        }
    }

    /// Start date, `None` once cancelled
    pub fn start(&self) -> Option<NaiveDate> {
        self.state().start()
    }

    /// Contractual end date, if the kind has one
    pub fn finish(&self) -> Option<NaiveDate> {
        match self {
            Contract::MonthToMonth(c) => c.finish(),
            Contract::Term(c) => Some(c.finish()),
            Contract::Prepaid(c) => c.finish(),
        }
    }

    /// Bill for the month most recently advanced to
    pub fn bill(&self) -> Option<&B> {
        self.state().bill()
    }

    /// Whether a month has been advanced to and the contract is not cancelled
    pub fn is_active(&self) -> bool {
        self.state().start().is_some() && self.state().bill().is_some()
    }

    /// Whether `cancel_contract` has been called
    pub fn is_cancelled(&self) -> bool {
        self.state().start().is_none()
    }
}

impl<B> From<MonthToMonthContract<B>> for Contract<B> {
    fn from(contract: MonthToMonthContract<B>) -> Self {
        Contract::MonthToMonth(contract)
    }
}

impl<B> From<TermContract<B>> for Contract<B> {
    fn from(contract: TermContract<B>) -> Self {
        Contract::Term(contract)
    }
}

impl<B> From<PrepaidContract<B>> for Contract<B> {
    fn from(contract: PrepaidContract<B>) -> Self {
        Contract::Prepaid(contract)
    }
}
