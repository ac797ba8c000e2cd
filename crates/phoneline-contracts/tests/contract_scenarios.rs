//! Scenario tests across contract kinds
//!
//! Walks lines through several months the way a billing run does and checks
//! bills and settlements end to end.

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use phoneline_contracts::{BillingCycle, Contract, ContractKind, PrepaidContract, TermContract};
    use phoneline_core::{
        models::{Bill, Call},
        traits::BillLedger,
        AppError,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn call(number: &str, year: i32, month: u32, seconds: u32) -> Call {
        let time = Utc.with_ymd_and_hms(year, month, 3, 8, 15, 0).unwrap();
        Call::new(number, time, seconds)
    }

    #[test]
    fn test_term_january_then_february() {
        let mut contract: Contract =
            Contract::Term(TermContract::new(date(2023, 1, 1), date(2023, 12, 31)));

        contract.new_month(1, 2023, Bill::new(1, 2023)).unwrap();
        contract.bill_call(&call("100", 2023, 1, 50 * 60)).unwrap();

        let january = contract.bill().unwrap();
        assert_eq!(january.free_minutes(), 50);
        assert_eq!(january.billed_minutes(), 0);
        assert_eq!(january.fixed_cost(), dec!(320.00));

        let january = contract
            .new_month(2, 2023, Bill::new(2, 2023))
            .unwrap()
            .unwrap();
        assert_eq!(january.total_cost(), dec!(320.00));

        contract.bill_call(&call("100", 2023, 2, 120 * 60)).unwrap();
        let february = contract.bill().unwrap();
        assert_eq!(february.free_minutes(), 100);
        assert_eq!(february.billed_minutes(), 20);
        assert_eq!(february.minutes_cost(), dec!(2.00));
        assert_eq!(february.fixed_cost(), dec!(20.00));
    }

    #[test]
    fn test_prepaid_first_month_keeps_loaded_credit() {
        let mut contract: Contract =
            Contract::Prepaid(PrepaidContract::new(date(2023, 1, 1), dec!(30.00)).unwrap());
        contract.new_month(1, 2023, Bill::new(1, 2023)).unwrap();

        assert_eq!(contract.bill().unwrap().fixed_cost(), dec!(-30.00));
        assert_eq!(contract.bill().unwrap().rate_label(), Some("PREPAID"));
    }

    #[test]
    fn test_year_of_mixed_lines() {
        let mut cycle = BillingCycle::default();
        cycle.register_month_to_month("416-555-0001", date(2023, 1, 1)).unwrap();
        cycle
            .register_term("416-555-0002", date(2023, 1, 1), date(2023, 6, 30))
            .unwrap();
        cycle
            .register_prepaid("416-555-0003", date(2023, 1, 1), dec!(20.00))
            .unwrap();

        for month in 1..=8 {
            cycle.advance_month(month, 2023).unwrap();
            let calls = vec![
                call("416-555-0001", 2023, month, 30 * 60),
                call("416-555-0002", 2023, month, 110 * 60),
                call("416-555-0003", 2023, month, 200 * 60),
            ];
            cycle.record_calls(&calls).unwrap();
        }

        assert_eq!(cycle.history("416-555-0001").unwrap().len(), 7);

        // August: 50.00 fee + 30 minutes at 0.05
        assert_eq!(cycle.cancel("416-555-0001").unwrap(), dec!(51.50));

        // August is past the June finish: 20.00 + 10 minutes at 0.10 - 300.00
        assert_eq!(cycle.cancel("416-555-0002").unwrap(), dec!(-279.00));

        // Prepaid always carries at least 10.00 of credit into the month and
        // 200 minutes cost 5.00, so the line ends in credit
        assert_eq!(cycle.cancel("416-555-0003").unwrap(), Decimal::ZERO);

        assert!(cycle.active_lines().is_empty());
    }

    #[test]
    fn test_term_cancelled_mid_term_forfeits_deposit() {
        let mut cycle = BillingCycle::default();
        cycle
            .register_term("100", date(2023, 3, 15), date(2024, 3, 14))
            .unwrap();
        cycle.advance_month(3, 2023).unwrap();
        cycle.advance_month(4, 2023).unwrap();

        // April: no deposit in the bill, nothing refunded either
        assert_eq!(cycle.cancel("100").unwrap(), dec!(20.00));
        assert_eq!(cycle.history("100").unwrap()[0].fixed_cost(), dec!(320.00));
    }

    #[test]
    fn test_statement_lists_every_month() {
        let mut cycle = BillingCycle::default();
        cycle.register_prepaid("100", date(2023, 1, 1), dec!(5.00)).unwrap();

        for month in 1..=3 {
            cycle.advance_month(month, 2023).unwrap();
        }

        let statement = cycle.statement("100").unwrap();
        assert_eq!(statement.len(), 3);
        assert!(statement.iter().all(|s| s.rate_label.as_deref() == Some("PREPAID")));
        // 5.00 topped up once to 30.00 credit, no calls, carried unchanged
        assert!(statement.iter().all(|s| s.total_cost == dec!(-30.00)));
    }

    #[test]
    fn test_line_kind_reported() {
        let mut cycle = BillingCycle::default();
        cycle.register_prepaid("100", date(2023, 1, 1), dec!(5.00)).unwrap();
        assert_eq!(cycle.line("100").unwrap().kind(), ContractKind::Prepaid);
        assert_eq!(
            cycle.line("404").unwrap_err(),
            AppError::LineNotFound("404".to_string())
        );
    }
}
