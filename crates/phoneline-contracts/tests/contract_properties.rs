//! Property tests for contract pricing
//!
//! Arbitrary call durations and balances, checked against the invariants each
//! contract kind guarantees.

use chrono::NaiveDate;
use phoneline_contracts::{Contract, MonthToMonthContract, PrepaidContract, TermContract};
use phoneline_core::{
    models::{Bill, Call},
    traits::BillLedger,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn call_of(seconds: u32) -> Call {
    Call {
        duration_seconds: seconds,
        ..Default::default()
    }
}

fn minutes(seconds: u32) -> u64 {
    u64::from(seconds.div_ceil(60))
}

proptest! {
    #[test]
    fn prop_minutes_round_up(seconds in 0u32..100_000) {
        let billed = call_of(seconds).billable_minutes();
        prop_assert!(u64::from(billed) * 60 >= u64::from(seconds));
        prop_assert!(u64::from(billed) * 60 < u64::from(seconds) + 60);
    }

    #[test]
    fn prop_month_to_month_bills_every_minute(durations in prop::collection::vec(0u32..10_000, 0..40)) {
        let mut contract: Contract =
            Contract::MonthToMonth(MonthToMonthContract::new(date(2023, 1, 1)));
        contract.new_month(1, 2023, Bill::new(1, 2023)).unwrap();
        for &seconds in &durations {
            contract.bill_call(&call_of(seconds)).unwrap();
        }

        let total: u64 = durations.iter().map(|&s| minutes(s)).sum();
        let bill = contract.bill().unwrap();
        prop_assert_eq!(bill.billed_minutes(), total);
        prop_assert_eq!(bill.free_minutes(), 0);
        prop_assert_eq!(bill.fixed_cost(), dec!(50.00));
    }

    #[test]
    fn prop_term_minutes_are_conserved(
        months in prop::collection::vec(prop::collection::vec(0u32..7_200, 0..20), 1..6)
    ) {
        let mut contract: Contract =
            Contract::Term(TermContract::new(date(2023, 1, 1), date(2023, 12, 31)));

        for (index, durations) in months.iter().enumerate() {
            let month = index as u32 + 1;
            contract.new_month(month, 2023, Bill::new(month, 2023)).unwrap();
            if let Contract::Term(term) = &contract {
                prop_assert_eq!(term.freebies(), 100);
            }

            for &seconds in durations {
                contract.bill_call(&call_of(seconds)).unwrap();
            }

            let total: u64 = durations.iter().map(|&s| minutes(s)).sum();
            let bill = contract.bill().unwrap();
            prop_assert_eq!(bill.free_minutes() + bill.billed_minutes(), total);
            prop_assert!(bill.free_minutes() <= 100);

            let expected_fixed = if month == 1 { dec!(320.00) } else { dec!(20.00) };
            prop_assert_eq!(bill.fixed_cost(), expected_fixed);
        }
    }

    #[test]
    fn prop_term_settlement_depends_on_finish(finish_month in 1u32..=12, cancel_month in 1u32..=12) {
        let finish = date(2023, finish_month, 1);
        let mut contract: Contract =
            Contract::Term(TermContract::new(date(2023, 1, 1), finish));
        contract.new_month(cancel_month, 2023, Bill::new(cancel_month, 2023)).unwrap();

        let total = contract.bill().unwrap().total_cost();
        let owed = contract.cancel_contract().unwrap();

        if cancel_month <= finish_month {
            prop_assert_eq!(owed, total);
        } else {
            prop_assert_eq!(owed, total - dec!(300.00));
        }
    }

    #[test]
    fn prop_prepaid_month_starts_with_minimum_credit(
        loaded in 0u32..200,
        usage in prop::collection::vec(0u32..200_000, 1..8)
    ) {
        let mut contract: Contract = Contract::Prepaid(
            PrepaidContract::new(date(2023, 1, 1), Decimal::from(loaded)).unwrap(),
        );

        for (index, &seconds) in usage.iter().enumerate() {
            let month = index as u32 + 1;
            contract.new_month(month, 2023, Bill::new(month, 2023)).unwrap();
            prop_assert!(contract.bill().unwrap().fixed_cost() <= dec!(-10.00));
            contract.bill_call(&call_of(seconds)).unwrap();
        }
    }

    #[test]
    fn prop_prepaid_never_refunds_credit(loaded in 0u32..200, seconds in 0u32..200_000) {
        let mut contract: Contract = Contract::Prepaid(
            PrepaidContract::new(date(2023, 1, 1), Decimal::from(loaded)).unwrap(),
        );
        contract.new_month(1, 2023, Bill::new(1, 2023)).unwrap();
        contract.bill_call(&call_of(seconds)).unwrap();

        let total = contract.bill().unwrap().total_cost();
        let owed = contract.cancel_contract().unwrap();

        if total <= Decimal::ZERO {
            prop_assert_eq!(owed, Decimal::ZERO);
        } else {
            prop_assert_eq!(owed, total);
        }
    }
}
