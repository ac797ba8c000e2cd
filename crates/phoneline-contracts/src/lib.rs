//! Contract pricing rules for phoneline billing
//!
//! This crate holds the contract kinds that decide, month by month, how a
//! line's calls are priced and what is owed when the line is cancelled, plus
//! the billing cycle that drives many lines through them.
//!
//! # Contracts
//!
//! - `MonthToMonthContract` - flat monthly fee, every minute billed
//! - `TermContract` - deposit, reduced fee, monthly free minutes, deposit
//!   refunded when cancelled after the term
//! - `PrepaidContract` - credit carried between months and topped up
//!
//! All three are wrapped by the `Contract` enum, which is what callers hold.
//!
//! # Driver
//!
//! - `BillingCycle` - registers lines, advances months, routes calls,
//!   cancels lines and keeps each line's bill history

pub mod billing_cycle;
pub mod contract;
pub mod month_to_month;
pub mod prepaid;
pub mod term;

pub use billing_cycle::{BillingCycle, PhoneLine};
pub use contract::{Contract, ContractKind};
pub use month_to_month::MonthToMonthContract;
pub use prepaid::PrepaidContract;
pub use term::TermContract;
