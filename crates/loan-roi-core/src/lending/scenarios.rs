use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::amortization::AmortizationSchedule;
use super::{validate_loan_inputs, LoanInputs};
use crate::error::LoanRoiError;
use crate::payment::monthly_rate;
use crate::types::{pct, with_metadata, ComputationOutput, Money, Rate};
use crate::{LoanRoiResult, DEBT_RATIO_MAX};

/// Loan terms compared side by side, in output order.
pub const SCENARIO_DURATIONS: [u32; 4] = [10, 15, 20, 25];

/// Month at which the equity snapshot is taken.
const EQUITY_SNAPSHOT_MONTH: u32 = 120;

/// Outcome of borrowing the same principal over one fixed duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiScenarioResult {
    /// Loan duration in years
    pub duration: u32,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_paid: Money,
    pub debt_ratio: Rate,
    /// Year-one rent less expenses less payment
    pub cashflow: Money,
    /// Debt ratio within the 37% cap
    pub is_viable: bool,
    /// Property value less open balance after 120 months
    pub equity_at_10_years: Money,
}

pub fn calculate_multi_scenarios(
    input: &LoanInputs,
) -> LoanRoiResult<ComputationOutput<Vec<MultiScenarioResult>>> {
    let start = Instant::now();
    validate_loan_inputs(input)?;

    let results = SCENARIO_DURATIONS
        .iter()
        .map(|&years| run_duration(input, years))
        .collect::<LoanRoiResult<Vec<_>>>()?;

    let mut warnings = Vec::new();
    if results.iter().all(|r| !r.is_viable) {
        warnings.push("No duration keeps the debt ratio within 37%".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-duration comparison (10/15/20/25 years)",
        input,
        warnings,
        elapsed,
        results,
    ))
}

fn run_duration(input: &LoanInputs, years: u32) -> LoanRoiResult<MultiScenarioResult> {
    let principal = input.borrowed_principal();
    let payment = input.compose_payment(
        principal,
        years,
        input.payment_overdrive,
        input.income_injection,
    )?;
    let monthly_payment = payment.total();
    let debt_ratio = payment.debt_ratio(input.monthly_income);
    let rate = monthly_rate(input.interest_rate);

    let schedule = AmortizationSchedule::for_payment(principal, rate, &payment);
    let snapshot = schedule.clone().capped_at(EQUITY_SNAPSHOT_MONTH).summarize();
    let summary = schedule.summarize();
    let balance_at_snapshot = if snapshot.is_repaid() {
        Decimal::ZERO
    } else {
        snapshot.final_balance
    };

    let months = Decimal::from(summary.months_to_payoff);
    let total_paid = months * payment.loan_service()
        + months * payment.insurance
        + months * payment.property_tax;

    let value_growth = Decimal::ONE + pct(input.property_appreciation_rate) / dec!(12);
    let value_at_snapshot = input.property_price
        * value_growth
            .checked_powu(EQUITY_SNAPSHOT_MONTH as u64)
            .ok_or_else(|| LoanRoiError::Overflow {
                context: "property value at snapshot".into(),
            })?;

    Ok(MultiScenarioResult {
        duration: years,
        monthly_payment,
        total_interest: summary.total_interest,
        total_paid,
        debt_ratio,
        cashflow: input.net_rent_cashflow(monthly_payment),
        is_viable: debt_ratio <= DEBT_RATIO_MAX,
        equity_at_10_years: value_at_snapshot - balance_at_snapshot,
    })
}
