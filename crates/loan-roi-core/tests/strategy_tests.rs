use loan_roi_core::lending::strategies::{
    classify, evaluate_grid, find_strategies, find_strategies_on_grid, StrategyGrid, StrategyKind,
    RATIO_TOLERANCE,
};
use loan_roi_core::lending::LoanInputs;
use loan_roi_core::DEBT_RATIO_MAX;
use pretty_assertions::assert_eq;
use proptest::prelude::{prop_assert, proptest};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn comfortable_borrower() -> LoanInputs {
    LoanInputs {
        property_price: dec!(320000),
        manual_down_payment: dec!(40000),
        notary_fees_rate: dec!(7.5),
        insurance_yearly_rate: dec!(0.25),
        monthly_income: dec!(10000),
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
// Grid
// ---------------------------------------------------------------------------

#[test]
fn test_default_grid_is_fine() {
    assert_eq!(StrategyGrid::default(), StrategyGrid::fine());
    assert_eq!(StrategyGrid::fine().points().count(), 21 * 21);
    assert_eq!(StrategyGrid::coarse().points().count(), 11 * 11);
}

#[test]
fn test_grid_starts_at_origin() {
    let first = StrategyGrid::coarse().points().next().unwrap();
    assert_eq!(first, (Decimal::ZERO, Decimal::ZERO));
}

// ---------------------------------------------------------------------------
// Strategy selection
// ---------------------------------------------------------------------------

#[test]
fn test_comfortable_borrower_gets_speed_and_balance() {
    let out = find_strategies(&comfortable_borrower()).unwrap();
    let names: Vec<&str> = out.result.iter().map(|s| s.name.as_str()).collect();
    // Rent never covers the payment, so no cashflow-positive pick
    assert_eq!(names, vec!["Max Speed", "Balanced Approach"]);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_max_speed_dominates_payment_and_payoff() {
    let input = comfortable_borrower();
    let candidates = evaluate_grid(&input, &StrategyGrid::fine()).unwrap();
    let picks = classify(&candidates);
    let speed = &picks[0];

    let top_payment = candidates.iter().map(|c| c.monthly_payment).max().unwrap();
    assert_eq!(speed.monthly_payment, top_payment);
    assert!(candidates.iter().all(|c| c.months_to_payoff >= speed.months_to_payoff));
}

#[test]
fn test_balanced_pick_respects_limits() {
    let out = find_strategies(&comfortable_borrower()).unwrap().result;
    let balanced = out
        .iter()
        .find(|s| s.name == StrategyKind::Balanced.name())
        .unwrap();
    assert!(balanced.years_saved >= dec!(5));
    assert!(balanced.debt_ratio < dec!(0.33));
    assert_eq!(balanced.description, StrategyKind::Balanced.description());
}

#[test]
fn test_cashflow_positive_when_rent_covers_payment() {
    let mut input = comfortable_borrower();
    input.monthly_rent = dec!(4000);
    let out = find_strategies_on_grid(&input, &StrategyGrid::coarse())
        .unwrap()
        .result;
    let cash = out
        .iter()
        .find(|s| s.name == StrategyKind::CashflowPositive.name())
        .unwrap();
    assert!(cash.net_rent_cashflow >= Decimal::ZERO);
}

#[test]
fn test_stretched_borrower_gets_empty_list_and_warning() {
    let mut input = comfortable_borrower();
    input.monthly_income = dec!(3000);
    let out = find_strategies(&input).unwrap();
    assert!(out.result.is_empty());
    assert_eq!(out.warnings.len(), 1);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(8))]

    #[test]
    fn prop_every_strategy_is_feasible(
        income in 3_000u32..15_000,
        rate_tenths in 0u32..70,
        years in 10u32..30,
    ) {
        let mut input = comfortable_borrower();
        input.monthly_income = Decimal::from(income);
        input.interest_rate = Decimal::from(rate_tenths) / dec!(10);
        input.credit_years = years;

        let out = find_strategies_on_grid(&input, &StrategyGrid::coarse()).unwrap().result;
        prop_assert!(out.len() <= 3);
        for s in &out {
            prop_assert!(s.debt_ratio <= DEBT_RATIO_MAX + RATIO_TOLERANCE);
            prop_assert!(s.interest_saved >= Decimal::ZERO);
            prop_assert!(s.years_saved >= Decimal::ZERO);
            prop_assert!(s.months_to_payoff <= years * 12);
        }
    }
}
