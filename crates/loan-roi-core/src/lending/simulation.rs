use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::amortization::{AmortizationSchedule, MAX_MONTHS, PAYOFF_TOLERANCE};
use super::max_loan::solve_max_loan;
use super::{validate_loan_inputs, LoanInputs};
use crate::payment::monthly_rate;
use crate::types::{pct, with_metadata, BreakEven, ComputationOutput, Money, Rate};
use crate::{LoanRoiResult, DEBT_RATIO_MAX};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// State of the investment at the end of one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub month: u32,
    /// 1-based loan year the month falls in
    pub year: u32,
    pub remaining_balance: Money,
    pub paid_interest: Money,
    pub paid_principal: Money,
    pub property_value: Money,
    /// Property value less remaining balance
    pub equity: Money,
    pub monthly_cashflow: Money,
    /// Sum of monthly cashflows so far
    pub cumulative_cashflow: Money,
    /// Down payment + fees + every negative cashflow absorbed, less positive ones
    pub total_cash_invested_so_far: Money,
    /// Equity less cash invested so far
    pub net_result: Money,
}

/// Full outcome of a single loan + rental simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub borrowed_principal: Money,
    pub final_monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub debt_ratio: Rate,
    pub months_to_payoff: u32,
    pub timeline: Vec<TimelinePoint>,
    /// Year-one rent after occupancy
    pub rent_income: Money,
    /// Year-one rent less expenses less payment
    pub net_rent_cashflow: Money,
    /// Average principal repaid per month over year one
    pub monthly_principal_paid: Money,
    /// Average property value gain per month over year one
    pub monthly_appreciation: Money,
    /// Cashflow + principal + appreciation
    pub total_monthly_economic_gain: Money,
    /// Net rent cashflow as % of the monthly payment
    pub rent_roi: Decimal,
    /// Annualised economic gain as % of the initial cash invested
    pub total_roi: Decimal,
    /// Years until monthly cashflow is non-negative
    pub break_even_years: BreakEven,
    /// Years until equity exceeds the cash invested
    pub equity_break_even_years: BreakEven,
    pub max_loan: Money,
    pub final_property_value: Money,
    pub notary_fees: Money,
    pub monthly_insurance: Money,
    /// Down payment + notary fees
    pub total_cash_invested: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate the loan month by month alongside the rental it finances.
pub fn simulate(input: &LoanInputs) -> LoanRoiResult<ComputationOutput<SimulationResult>> {
    let start = Instant::now();
    validate_loan_inputs(input)?;

    let mut warnings = Vec::new();
    let result = run_simulation(input, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly amortisation with rent indexation and property appreciation",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

pub(crate) fn run_simulation(
    input: &LoanInputs,
    warnings: &mut Vec<String>,
) -> LoanRoiResult<SimulationResult> {
    let notary_fees = input.notary_fees();
    let principal = input.borrowed_principal();
    let initial_cash_invested = input.manual_down_payment + notary_fees;

    let payment = input.own_payment()?;
    let final_monthly_payment = payment.total();

    let base_rent = input.effective_rent();
    let rent_growth = Decimal::ONE + pct(input.rent_indexation_rate);
    let value_growth = Decimal::ONE + pct(input.property_appreciation_rate) / dec!(12);

    let mut indexation = Decimal::ONE;
    let mut property_value = input.property_price;
    let mut cash_invested = initial_cash_invested;
    let mut total_interest = Decimal::ZERO;
    let mut equity_break_even_month: Option<u32> = None;
    let mut timeline = Vec::new();

    let schedule =
        AmortizationSchedule::for_payment(principal, monthly_rate(input.interest_rate), &payment);

    for step in schedule {
        total_interest += step.interest;

        if step.month > 1 && step.month % 12 == 1 {
            indexation *= rent_growth;
        }
        property_value *= value_growth;

        let rent = base_rent * indexation;
        let expenses = input.monthly_expenses * indexation;
        let monthly_cashflow = rent - expenses - final_monthly_payment;
        cash_invested -= monthly_cashflow;

        let equity = property_value - step.balance;
        let net_result = equity - cash_invested;
        if equity_break_even_month.is_none() && net_result > Decimal::ZERO {
            equity_break_even_month = Some(step.month);
        }

        timeline.push(TimelinePoint {
            month: step.month,
            year: step.month.div_ceil(12),
            remaining_balance: step.balance,
            paid_interest: step.interest,
            paid_principal: step.principal,
            property_value,
            equity,
            monthly_cashflow,
            cumulative_cashflow: initial_cash_invested - cash_invested,
            total_cash_invested_so_far: cash_invested,
            net_result,
        });
    }

    let months = timeline.len() as u32;
    let months_dec = Decimal::from(months);
    let total_paid = months_dec * payment.loan_service()
        + months_dec * payment.insurance
        + months_dec * payment.property_tax;
    let debt_ratio = payment.debt_ratio(input.monthly_income);

    // --- Year-one snapshot ---
    let first_year = &timeline[..timeline.len().min(12)];
    let (monthly_principal_paid, monthly_appreciation) = match first_year.last() {
        Some(last) => {
            let count = Decimal::from(first_year.len() as u32);
            let principal_sum: Money = first_year.iter().map(|p| p.paid_principal).sum();
            (
                principal_sum / count,
                (last.property_value - input.property_price) / count,
            )
        }
        None => (Decimal::ZERO, Decimal::ZERO),
    };

    let net_rent_cashflow = input.net_rent_cashflow(final_monthly_payment);
    let total_monthly_economic_gain =
        net_rent_cashflow + monthly_principal_paid + monthly_appreciation;

    let rent_roi = if final_monthly_payment > Decimal::ZERO {
        net_rent_cashflow / final_monthly_payment * dec!(100)
    } else {
        Decimal::ZERO
    };
    let total_roi = if initial_cash_invested > Decimal::ZERO {
        total_monthly_economic_gain * dec!(12) / initial_cash_invested * dec!(100)
    } else {
        Decimal::ZERO
    };

    let break_even_years = timeline
        .iter()
        .position(|p| p.monthly_cashflow >= Decimal::ZERO)
        .map(|idx| BreakEven::from_months(idx as u32))
        .unwrap_or(BreakEven::Never);
    let equity_break_even_years = equity_break_even_month
        .map(BreakEven::from_months)
        .unwrap_or(BreakEven::BeyondTerm);

    let max_loan = solve_max_loan(input)?;

    let final_property_value = timeline
        .last()
        .map(|p| p.property_value)
        .unwrap_or(input.property_price);

    // --- Warnings ---
    if debt_ratio > DEBT_RATIO_MAX {
        warnings.push(format!(
            "Debt ratio {:.1}% exceeds the {:.0}% limit",
            debt_ratio * dec!(100),
            DEBT_RATIO_MAX * dec!(100)
        ));
    }
    if timeline
        .last()
        .is_some_and(|p| p.remaining_balance > PAYOFF_TOLERANCE)
    {
        tracing::warn!(months = MAX_MONTHS, "loan not retired within simulation cap");
        warnings.push(format!(
            "Balance not retired within {} months; payment barely covers interest",
            MAX_MONTHS
        ));
    }
    if input.manual_down_payment < input.property_price * dec!(0.1) {
        warnings.push("Down payment is below 10% of the property price".into());
    }

    tracing::debug!(
        months,
        %total_interest,
        %debt_ratio,
        "simulation complete"
    );

    Ok(SimulationResult {
        borrowed_principal: principal,
        final_monthly_payment,
        total_paid,
        total_interest,
        debt_ratio,
        months_to_payoff: months,
        timeline,
        rent_income: base_rent,
        net_rent_cashflow,
        monthly_principal_paid,
        monthly_appreciation,
        total_monthly_economic_gain,
        rent_roi,
        total_roi,
        break_even_years,
        equity_break_even_years,
        max_loan,
        final_property_value,
        notary_fees,
        monthly_insurance: payment.insurance,
        total_cash_invested: initial_cash_invested,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
