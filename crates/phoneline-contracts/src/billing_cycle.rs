//! Monthly billing cycle
//!
//! Drives a set of phone lines through their contracts:
//! - Register lines with a contract of any kind
//! - Advance every started line to a new month with a fresh bill
//! - Route calls to the line that placed them
//! - Cancel lines and collect the settlement
//!
//! Closed bills are archived per line so a customer's history can be reported.

use chrono::{Datelike, NaiveDate};
use phoneline_core::{
    models::{Bill, BillSummary, Call},
    AppError, AppResult, PricingConfig,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

use crate::contract::{validate_period, Contract, ContractKind};
use crate::month_to_month::MonthToMonthContract;
use crate::prepaid::PrepaidContract;
use crate::term::TermContract;

/// A phone line and everything billed to it
#[derive(Debug, Clone)]
pub struct PhoneLine {
    number: String,
    contract: Contract,
    history: Vec<Bill>,
    settlement: Option<Decimal>,
}

impl PhoneLine {
    #[inline]
    pub fn number(&self) -> &str {
        &self.number
    }

    #[inline]
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    #[inline]
    pub fn kind(&self) -> ContractKind {
        self.contract.kind()
    }

    /// Closed bills, oldest first
    #[inline]
    pub fn history(&self) -> &[Bill] {
        &self.history
    }

    /// Amount collected on cancellation
    #[inline]
    pub fn settlement(&self) -> Option<Decimal> {
        self.settlement
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.contract.is_cancelled()
    }
}

/// Billing cycle over many lines
///
/// Months must be advanced in chronological order and every call must fall in
/// the month most recently advanced to.
#[derive(Debug, Clone, Default)]
pub struct BillingCycle {
    pricing: PricingConfig,
    lines: BTreeMap<String, PhoneLine>,
    period: Option<(u32, i32)>,
}

impl BillingCycle {
    /// Create a cycle that prices new contracts with `pricing`
    pub fn new(pricing: PricingConfig) -> Self {
        Self {
            pricing,
            lines: BTreeMap::new(),
            period: None,
        }
    }

    /// Month and year most recently advanced to
    #[inline]
    pub fn period(&self) -> Option<(u32, i32)> {
        self.period
    }

    #[inline]
    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Add a line governed by `contract`
    #[instrument(skip(self, contract))]
    pub fn register(&mut self, number: &str, contract: Contract) -> AppResult<()> {
        if self.lines.contains_key(number) {
            warn!("Line already registered: {}", number);
            return Err(AppError::LineAlreadyExists(number.to_string()));
        }

        let kind = contract.kind();
        self.lines.insert(
            number.to_string(),
            PhoneLine {
                number: number.to_string(),
                contract,
                history: Vec::new(),
                settlement: None,
            },
        );

        info!("Registered {} line {}", kind, number);
        Ok(())
    }

    /// Add a month-to-month line priced with this cycle's pricing
    pub fn register_month_to_month(&mut self, number: &str, start: NaiveDate) -> AppResult<()> {
        let contract =
            MonthToMonthContract::with_pricing(start, self.pricing.month_to_month.clone());
        self.register(number, Contract::MonthToMonth(contract))
    }

    /// Add a term line priced with this cycle's pricing
    pub fn register_term(&mut self, number: &str, start: NaiveDate, finish: NaiveDate) -> AppResult<()> {
        if finish < start {
            return Err(AppError::InvalidInput(format!(
                "term finish {} is before start {}",
                finish, start
            )));
        }

        let contract = TermContract::with_pricing(start, finish, self.pricing.term.clone());
        self.register(number, Contract::Term(contract))
    }

    /// Add a prepaid line with `balance` of credit loaded
    pub fn register_prepaid(&mut self, number: &str, start: NaiveDate, balance: Decimal) -> AppResult<()> {
        let contract = PrepaidContract::with_pricing(start, balance, self.pricing.prepaid.clone())?;
        self.register(number, Contract::Prepaid(contract))
    }

    /// Advance every started, uncancelled line to `(month, year)`
    ///
    /// Each line gets a fresh bill; the bill it replaces is archived. Lines
    /// whose contract starts after the month are left inactive.
    #[instrument(skip(self))]
    pub fn advance_month(&mut self, month: u32, year: i32) -> AppResult<usize> {
        let first_of_month = validate_period(month, year)?;

        if let Some((current_month, current_year)) = self.period {
            if (year, month) <= (current_year, current_month) {
                return Err(AppError::InvalidInput(format!(
                    "cannot advance to {}/{}: already at {}/{}",
                    month, year, current_month, current_year
                )));
            }
        }

        let last_of_month = last_day_of_month(first_of_month);
        let mut advanced = 0;

        for line in self.lines.values_mut() {
            let Some(start) = line.contract.start() else {
                continue;
            };
            if start > last_of_month {
                debug!("Line {} starts {}, not yet active", line.number, start);
                continue;
            }

            if let Some(previous) = line.contract.new_month(month, year, Bill::new(month, year))? {
                line.history.push(previous);
            }
            advanced += 1;
        }

        self.period = Some((month, year));
        info!("Advanced {} lines to {}/{}", advanced, month, year);
        Ok(advanced)
    }

    /// Price a call into the bill of the line that placed it
    pub fn record_call(&mut self, call: &Call) -> AppResult<()> {
        let (month, year) = self.period.ok_or(AppError::NoActiveBill)?;
        if (call.month(), call.year()) != (month, year) {
            return Err(AppError::InvalidInput(format!(
                "call {} made in {}/{} but cycle is at {}/{}",
                call.id,
                call.month(),
                call.year(),
                month,
                year
            )));
        }

        let line = self
            .lines
            .get_mut(&call.caller_number)
            .ok_or_else(|| AppError::LineNotFound(call.caller_number.clone()))?;

        line.contract.bill_call(call)
    }

    /// Price a batch of calls, stopping at the first failure
    pub fn record_calls<'a, I>(&mut self, calls: I) -> AppResult<usize>
    where
        I: IntoIterator<Item = &'a Call>,
    {
        let mut count = 0;
        for call in calls {
            self.record_call(call)?;
            count += 1;
        }

        debug!("Recorded {} calls", count);
        Ok(count)
    }

    /// Cancel a line and return the amount owed
    ///
    /// The final bill stays available through [`BillingCycle::current_bill`].
    #[instrument(skip(self))]
    pub fn cancel(&mut self, number: &str) -> AppResult<Decimal> {
        let line = self
            .lines
            .get_mut(number)
            .ok_or_else(|| AppError::LineNotFound(number.to_string()))?;

        let owed = line.contract.cancel_contract()?;
        line.settlement = Some(owed);

        info!("Cancelled {} line {}, owed {}", line.kind(), number, owed);
        Ok(owed)
    }

    /// Look up a line
    pub fn line(&self, number: &str) -> AppResult<&PhoneLine> {
        self.lines
            .get(number)
            .ok_or_else(|| AppError::LineNotFound(number.to_string()))
    }

    /// Closed bills for a line, oldest first
    pub fn history(&self, number: &str) -> AppResult<&[Bill]> {
        Ok(self.line(number)?.history())
    }

    /// Open bill for a line, `None` if it has never been advanced
    pub fn current_bill(&self, number: &str) -> AppResult<Option<&Bill>> {
        Ok(self.line(number)?.contract.bill())
    }

    /// Every bill of a line, closed and open, as report snapshots
    pub fn statement(&self, number: &str) -> AppResult<Vec<BillSummary>> {
        let line = self.line(number)?;
        Ok(line
            .history
            .iter()
            .chain(line.contract.bill())
            .map(Bill::summary)
            .collect())
    }

    /// Numbers of lines that have not been cancelled
    pub fn active_lines(&self) -> Vec<&str> {
        self.lines
            .values()
            .filter(|line| !line.is_cancelled())
            .map(|line| line.number.as_str())
            .collect()
    }
}

fn last_day_of_month(first_of_month: NaiveDate) -> NaiveDate {
    let (year, month) = if first_of_month.month() == 12 {
        (first_of_month.year() + 1, 1)
    } else {
        (first_of_month.year(), first_of_month.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(first_of_month)
}
