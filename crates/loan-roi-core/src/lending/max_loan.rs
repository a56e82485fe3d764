use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{validate_loan_inputs, LoanInputs};
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::{LoanRoiResult, DEBT_RATIO_MAX};

/// Upper bound of the principal search range.
pub const MAX_LOAN_SEARCH_CEILING: Decimal = dec!(3000000);

/// Bisection steps; fixed so results are reproducible.
pub const MAX_LOAN_ITERATIONS: u32 = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxLoanResult {
    /// Largest principal whose composed payment stays within the ceiling
    pub max_loan: Money,
    /// Monthly income × debt ratio cap
    pub payment_ceiling: Money,
    /// Composed monthly payment at `max_loan`
    pub monthly_payment: Money,
}

/// Largest principal the borrower's income supports under [`DEBT_RATIO_MAX`],
/// keeping the record's duration, rate, overdrive, insurance, tax and injection.
pub fn calc_max_loan(input: &LoanInputs) -> LoanRoiResult<ComputationOutput<MaxLoanResult>> {
    let start = Instant::now();
    validate_loan_inputs(input)?;

    let mut warnings = Vec::new();
    let max_loan = solve_max_loan(input)?;
    let payment_ceiling = input.monthly_income * DEBT_RATIO_MAX;
    let monthly_payment = input
        .compose_payment(
            max_loan,
            input.credit_years,
            input.payment_overdrive,
            input.income_injection,
        )?
        .total();

    if max_loan.is_zero() {
        warnings.push(
            "Fixed monthly charges already consume the allowed debt ratio; no loan is possible"
                .into(),
        );
    } else if MAX_LOAN_SEARCH_CEILING - max_loan < dec!(1) {
        warnings.push(format!(
            "Borrowing capacity reaches the {MAX_LOAN_SEARCH_CEILING} search ceiling"
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Binary search on principal against the 37% debt ratio",
        input,
        warnings,
        elapsed,
        MaxLoanResult {
            max_loan,
            payment_ceiling,
            monthly_payment,
        },
    ))
}

pub(crate) fn solve_max_loan(input: &LoanInputs) -> LoanRoiResult<Money> {
    let ceiling = input.monthly_income * DEBT_RATIO_MAX;
    let mut low = Decimal::ZERO;
    let mut high = MAX_LOAN_SEARCH_CEILING;

    for _ in 0..MAX_LOAN_ITERATIONS {
        let mid = (low + high) / dec!(2);
        let payment = input
            .compose_payment(
                mid,
                input.credit_years,
                input.payment_overdrive,
                input.income_injection,
            )?
            .total();

        if payment > ceiling {
            high = mid;
        } else {
            low = mid;
        }
    }

    tracing::debug!(%low, %high, %ceiling, "max loan bisection finished");
    Ok(low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lending::fixtures::rental_flat;

    fn payment_at(input: &LoanInputs, principal: Money) -> Money {
        input
            .compose_payment(
                principal,
                input.credit_years,
                input.payment_overdrive,
                input.income_injection,
            )
            .unwrap()
            .total()
    }

    #[test]
    fn test_max_loan_respects_ceiling() {
        let input = rental_flat();
        let out = calc_max_loan(&input).unwrap().result;
        assert_eq!(out.payment_ceiling, dec!(1480));
        assert!(out.monthly_payment <= out.payment_ceiling);
        // Roughly (1480 - 100) / (1.1 * 0.005114 + 0.00025)
        assert!(out.max_loan > dec!(230000) && out.max_loan < dec!(240000));
    }

    #[test]
    fn test_max_loan_is_tight() {
        let input = rental_flat();
        let max = solve_max_loan(&input).unwrap();
        assert!(payment_at(&input, max + dec!(1)) > input.monthly_income * DEBT_RATIO_MAX);
    }

    #[test]
    fn test_fixed_charges_above_ceiling_give_zero() {
        let mut input = rental_flat();
        input.property_tax = dec!(2000);
        let out = calc_max_loan(&input).unwrap();
        assert_eq!(out.result.max_loan, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_injection_reduces_capacity() {
        let mut input = rental_flat();
        let without = solve_max_loan(&input).unwrap();
        input.income_injection = dec!(5);
        let with = solve_max_loan(&input).unwrap();
        assert!(with < without);
    }

    #[test]
    fn test_high_income_hits_search_ceiling() {
        let mut input = rental_flat();
        input.monthly_income = dec!(1000000);
        let out = calc_max_loan(&input).unwrap();
        assert!(MAX_LOAN_SEARCH_CEILING - out.result.max_loan < dec!(0.01));
        assert!(out.warnings[0].contains("ceiling"));
    }
}
