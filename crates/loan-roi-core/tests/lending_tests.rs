use loan_roi_core::lending::amortization::{AmortizationSchedule, MAX_MONTHS, PAYOFF_TOLERANCE};
use loan_roi_core::lending::max_loan::{calc_max_loan, MAX_LOAN_SEARCH_CEILING};
use loan_roi_core::lending::scenarios::calculate_multi_scenarios;
use loan_roi_core::lending::simulation::simulate;
use loan_roi_core::lending::strategies::find_strategies;
use loan_roi_core::lending::LoanInputs;
use loan_roi_core::payment::{compute_monthly_payment, monthly_rate};
use loan_roi_core::{BreakEven, DEBT_RATIO_MAX};
use pretty_assertions::assert_eq;
use proptest::prelude::{prop_assert, prop_assume, proptest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn family_apartment() -> LoanInputs {
    LoanInputs {
        property_price: dec!(320000),
        manual_down_payment: dec!(40000),
        notary_fees_rate: dec!(7.5),
        insurance_yearly_rate: dec!(0.25),
        monthly_income: dec!(5200),
        credit_years: 20,
        interest_rate: dec!(3.4),
        payment_overdrive: dec!(0),
        income_injection: dec!(0),
        property_tax: dec!(120),
        monthly_rent: dec!(1400),
        monthly_expenses: dec!(180),
        occupancy_rate: dec!(95),
        rent_indexation_rate: dec!(1.5),
        property_appreciation_rate: dec!(1.5),
    }
}

// ---------------------------------------------------------------------------
// Payment formula
// ---------------------------------------------------------------------------

#[test]
fn test_thirty_year_textbook_payment() {
    // 100k at 5% over 30 years: 536.82
    let p = compute_monthly_payment(dec!(100000), dec!(5), 30).unwrap();
    assert!((p - dec!(536.82)).abs() < dec!(0.01), "got {}", p);
}

#[test]
fn test_zero_rate_is_straight_line() {
    let p = compute_monthly_payment(dec!(120000), dec!(0), 10).unwrap();
    assert_eq!(p, dec!(1000));
}

#[test]
fn test_zero_years_rejected() {
    assert!(compute_monthly_payment(dec!(120000), dec!(3), 0).is_err());
}

// ---------------------------------------------------------------------------
// Simulation end to end
// ---------------------------------------------------------------------------

#[test]
fn test_simulation_end_to_end() {
    let input = family_apartment();
    let out = simulate(&input).unwrap();
    let r = &out.result;

    assert_eq!(r.borrowed_principal, dec!(280000));
    assert_eq!(r.notary_fees, dec!(24000));
    assert_eq!(r.total_cash_invested, dec!(64000));
    assert_eq!(r.timeline.len() as u32, r.months_to_payoff);
    assert_eq!(r.months_to_payoff, 240);
    assert!(r.debt_ratio < DEBT_RATIO_MAX);
    assert!(r.max_loan > r.borrowed_principal);

    let last = r.timeline.last().unwrap();
    assert!(last.remaining_balance <= PAYOFF_TOLERANCE);
    assert!(r.final_property_value > input.property_price);
}

#[test]
fn test_timeline_invariants() {
    let r = simulate(&family_apartment()).unwrap().result;

    for pair in r.timeline.windows(2) {
        assert!(pair[1].remaining_balance <= pair[0].remaining_balance);
        assert_eq!(pair[1].month, pair[0].month + 1);
    }
    for p in &r.timeline {
        assert_eq!(p.equity, p.property_value - p.remaining_balance);
        assert_eq!(p.net_result, p.equity - p.total_cash_invested_so_far);
        assert_eq!(p.year, (p.month + 11) / 12);
    }

    let interest: Decimal = r.timeline.iter().map(|p| p.paid_interest).sum();
    assert_eq!(interest, r.total_interest);
}

#[test]
fn test_principal_paid_matches_borrowed() {
    let r = simulate(&family_apartment()).unwrap().result;
    let principal: Decimal = r.timeline.iter().map(|p| p.paid_principal).sum();
    let last = r.timeline.last().unwrap();
    assert!((principal + last.remaining_balance - r.borrowed_principal).abs() < dec!(0.000001));
}

#[test]
fn test_rent_indexed_on_year_boundaries() {
    let r = simulate(&family_apartment()).unwrap().result;
    let t = &r.timeline;
    // Cashflow only moves when indexation applies (month 13, 25, ...)
    assert_eq!(t[0].monthly_cashflow, t[11].monthly_cashflow);
    assert!(t[12].monthly_cashflow > t[11].monthly_cashflow);
    assert_eq!(t[12].monthly_cashflow, t[23].monthly_cashflow);
}

#[test]
fn test_break_evens_serialize_as_number_or_label() {
    let mut input = family_apartment();
    input.monthly_rent = dec!(0);
    input.monthly_expenses = dec!(0);
    let r = simulate(&input).unwrap().result;
    assert_eq!(r.break_even_years, BreakEven::Never);

    let json = serde_json::to_value(&r).unwrap();
    assert_eq!(json["break_even_years"], serde_json::json!("Never"));
    assert!(json["equity_break_even_years"].is_number() || json["equity_break_even_years"] == "> Term");
}

#[test]
fn test_optional_growth_fields_default_to_zero() {
    let json = r#"{
        "property_price": 200000,
        "manual_down_payment": 20000,
        "notary_fees_rate": 8,
        "insurance_yearly_rate": 0.3,
        "monthly_income": 4500,
        "credit_years": 20,
        "interest_rate": 3.5,
        "payment_overdrive": 0,
        "income_injection": 0,
        "property_tax": 90,
        "monthly_rent": 950,
        "monthly_expenses": 120,
        "occupancy_rate": 100
    }"#;
    let input: LoanInputs = serde_json::from_str(json).unwrap();
    assert_eq!(input.rent_indexation_rate, Decimal::ZERO);
    assert_eq!(input.property_appreciation_rate, Decimal::ZERO);

    let r = simulate(&input).unwrap().result;
    assert_eq!(r.final_property_value, dec!(200000));
}

#[test]
fn test_invalid_inputs_rejected() {
    let mut input = family_apartment();
    input.interest_rate = dec!(-1);
    assert!(simulate(&input).is_err());

    let mut input = family_apartment();
    input.credit_years = 0;
    assert!(simulate(&input).is_err());

    let mut input = family_apartment();
    input.occupancy_rate = dec!(120);
    assert!(calc_max_loan(&input).is_err());
}

#[test]
fn test_extreme_rates_are_errors() {
    let mut input = family_apartment();
    input.interest_rate = dec!(150);
    input.credit_years = 50;
    assert!(simulate(&input).is_err());
    assert!(calc_max_loan(&input).is_err());
    assert!(calculate_multi_scenarios(&input).is_err());
    assert!(find_strategies(&input).is_err());

    assert!(compute_monthly_payment(dec!(100000), dec!(20), 1000).is_err());
}

#[test]
fn test_highest_accepted_rate_runs() {
    let mut input = family_apartment();
    input.interest_rate = dec!(100);
    input.credit_years = 50;
    let r = simulate(&input).unwrap().result;
    assert!(r.timeline.len() <= MAX_MONTHS as usize);
    assert!(r.debt_ratio > DEBT_RATIO_MAX);
}

#[test]
fn test_zero_income_keeps_ratio_zero() {
    let mut input = family_apartment();
    input.monthly_income = dec!(0);
    let r = simulate(&input).unwrap().result;
    assert_eq!(r.debt_ratio, Decimal::ZERO);
    assert_eq!(r.max_loan, Decimal::ZERO);
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_scenarios_cover_four_durations() {
    let out = calculate_multi_scenarios(&family_apartment()).unwrap().result;
    let durations: Vec<u32> = out.iter().map(|s| s.duration).collect();
    assert_eq!(durations, vec![10, 15, 20, 25]);

    let twenty = &out[2];
    let sim = simulate(&family_apartment()).unwrap().result;
    assert_eq!(twenty.monthly_payment, sim.final_monthly_payment);
    assert_eq!(twenty.total_interest, sim.total_interest);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(24))]

    #[test]
    fn prop_more_overdrive_never_slows_payoff(
        principal in 20_000u32..400_000,
        rate_tenths in 0u32..80,
        years in 5u32..30,
        overdrive in 0u32..50,
        extra in 1u32..50,
    ) {
        let mut input = family_apartment();
        input.property_price = Decimal::from(principal);
        input.manual_down_payment = dec!(0);
        input.interest_rate = Decimal::from(rate_tenths) / dec!(10);
        input.credit_years = years;
        input.payment_overdrive = Decimal::from(overdrive);

        let slow = input.own_payment().unwrap();
        input.payment_overdrive = Decimal::from(overdrive + extra);
        let fast = input.own_payment().unwrap();

        let rate = monthly_rate(input.interest_rate);
        let p = input.borrowed_principal();
        let slow_run = AmortizationSchedule::for_payment(p, rate, &slow).summarize();
        let fast_run = AmortizationSchedule::for_payment(p, rate, &fast).summarize();

        prop_assert!(fast_run.months_to_payoff <= slow_run.months_to_payoff);
        prop_assert!(fast_run.total_interest <= slow_run.total_interest);
    }

    #[test]
    fn prop_max_loan_is_affordable(
        income in 1_000u32..20_000,
        rate_tenths in 0u32..80,
        years in 5u32..30,
        tax in 0u32..300,
    ) {
        let mut input = family_apartment();
        input.monthly_income = Decimal::from(income);
        input.interest_rate = Decimal::from(rate_tenths) / dec!(10);
        input.credit_years = years;
        input.property_tax = Decimal::from(tax);

        let out = calc_max_loan(&input).unwrap().result;
        if out.max_loan > Decimal::ZERO {
            prop_assert!(out.monthly_payment <= out.payment_ceiling);
        }

        prop_assume!(out.max_loan < MAX_LOAN_SEARCH_CEILING - dec!(1));
        let one_more = input
            .compose_payment(
                out.max_loan + dec!(1),
                input.credit_years,
                input.payment_overdrive,
                input.income_injection,
            )
            .unwrap()
            .total();
        prop_assert!(one_more > out.payment_ceiling);
    }

    #[test]
    fn prop_timeline_monotonic_and_terminates(
        principal in 1_000u32..1_000_000,
        rate_tenths in 0u32..200,
        years in 1u32..=50,
        overdrive in 0u32..=100,
        injection in 0u32..=40,
    ) {
        let mut input = family_apartment();
        input.property_price = Decimal::from(principal);
        input.manual_down_payment = dec!(0);
        input.interest_rate = Decimal::from(rate_tenths) / dec!(10);
        input.credit_years = years;
        input.payment_overdrive = Decimal::from(overdrive);
        input.income_injection = Decimal::from(injection);

        let r = simulate(&input).unwrap().result;
        for pair in r.timeline.windows(2) {
            prop_assert!(pair[1].remaining_balance <= pair[0].remaining_balance);
        }
        let last = r.timeline.last().unwrap();
        prop_assert!(
            last.remaining_balance <= PAYOFF_TOLERANCE || r.timeline.len() == MAX_MONTHS as usize
        );
        prop_assert!(r.timeline.len() <= MAX_MONTHS as usize);
    }

    #[test]
    fn prop_longer_durations_lower_payment(
        principal in 50_000u32..500_000,
        rate_tenths in 1u32..80,
    ) {
        let mut input = family_apartment();
        input.property_price = Decimal::from(principal);
        input.manual_down_payment = dec!(0);
        input.interest_rate = Decimal::from(rate_tenths) / dec!(10);

        let out = calculate_multi_scenarios(&input).unwrap().result;
        for pair in out.windows(2) {
            prop_assert!(pair[1].monthly_payment < pair[0].monthly_payment);
            prop_assert!(pair[1].total_interest > pair[0].total_interest);
        }
    }
}
