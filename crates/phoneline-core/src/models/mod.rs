//! Domain models for phoneline billing
//!
//! This module contains the bill and call records the contracts operate on.

pub mod bill;
pub mod call;

pub use bill::{Bill, BillSummary};
pub use call::{Call, SECONDS_PER_MINUTE};
