//! Rent-vesting: keep the current home as a rental, rent a new residence, and
//! buy a second property as an investment.
//!
//! Two views are produced from the same inputs. The bank view discounts both
//! rents to 70% when computing the debt ratio; the cash view uses full rents.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanRoiError;
use crate::lending::{MAX_AMOUNT, MAX_INTEREST_RATE};
use crate::payment::{compute_monthly_payment, debt_ratio};
use crate::types::{pct, with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::LoanRoiResult;

/// Share of rental income a lender counts as income.
pub const RENT_WEIGHTING: Decimal = dec!(0.7);

/// Yearly growth applied to both property values.
pub const PROPERTY_GROWTH: Decimal = dec!(0.02);

pub const PROJECTION_YEARS: u32 = 20;

/// Heuristic: the existing mortgage is assumed to have this many years of
/// payments left, with this share of each payment going to principal.
const EXISTING_REMAINING_YEARS: Decimal = dec!(15);
const EXISTING_PRINCIPAL_SHARE: Decimal = dec!(0.6);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioInputs {
    pub monthly_income: Money,
    pub current_home_value: Money,
    /// Monthly payment on the existing home's mortgage
    pub current_home_mortgage: Money,
    /// Monthly rent once the current home is let out
    pub current_home_rent_income: Money,
    pub inv_price: Money,
    pub inv_down_payment: Money,
    /// Annual interest rate on the investment loan, %
    pub inv_rate: Percent,
    /// Investment loan duration in years
    pub inv_duration: u32,
    /// Monthly rent from the investment property
    pub inv_rent: Money,
    /// Rent paid for the new residence
    pub new_living_rent: Money,
}

/// Combined position at the end of one projection year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTimelinePoint {
    pub year: u32,
    pub assets: Money,
    pub debt: Money,
    pub equity: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioResult {
    /// Salary + both full rents
    pub total_income: Money,
    /// Both mortgages + new living rent
    pub total_expenses: Money,
    pub net_cashflow: Money,
    /// Salary + 70% of both rents
    pub bank_income: Money,
    /// Principal + interest on the investment loan
    pub inv_monthly_payment: Money,
    pub bank_debt_ratio: Rate,
    /// Years 0 through 20
    pub net_worth_projection: Vec<PortfolioTimelinePoint>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

pub fn calculate_portfolio(
    input: &PortfolioInputs,
) -> LoanRoiResult<ComputationOutput<PortfolioResult>> {
    let start = Instant::now();
    validate_input(input)?;

    let mut warnings = Vec::new();

    let bank_income = input.monthly_income
        + input.current_home_rent_income * RENT_WEIGHTING
        + input.inv_rent * RENT_WEIGHTING;

    let inv_principal = (input.inv_price - input.inv_down_payment).max(Decimal::ZERO);
    let inv_monthly_payment = compute_monthly_payment(inv_principal, input.inv_rate, input.inv_duration)?;

    let total_debt_payments = input.current_home_mortgage + inv_monthly_payment;
    let bank_debt_ratio = debt_ratio(total_debt_payments, bank_income);

    let total_income = input.monthly_income + input.current_home_rent_income + input.inv_rent;
    let total_expenses = total_debt_payments + input.new_living_rent;
    let net_cashflow = total_income - total_expenses;

    let net_worth_projection = project_net_worth(input, inv_principal, inv_monthly_payment);

    if input.current_home_mortgage > Decimal::ZERO {
        warnings.push(
            "Existing home debt is approximated: 15 years of payments outstanding, 60% of each payment to principal"
                .into(),
        );
    }
    if net_cashflow < Decimal::ZERO {
        warnings.push(format!("Monthly cash position is negative ({net_cashflow:.2})"));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rent-vesting two-property projection (bank view at 70% rent weighting)",
        input,
        warnings,
        elapsed,
        PortfolioResult {
            total_income,
            total_expenses,
            net_cashflow,
            bank_income,
            inv_monthly_payment,
            bank_debt_ratio,
            net_worth_projection,
        },
    ))
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

fn project_net_worth(
    input: &PortfolioInputs,
    inv_principal: Money,
    inv_monthly_payment: Money,
) -> Vec<PortfolioTimelinePoint> {
    let annual_inv_payment = inv_monthly_payment * dec!(12);
    let annual_existing_payment = input.current_home_mortgage * dec!(12);
    let existing_principal_per_year = annual_existing_payment * EXISTING_PRINCIPAL_SHARE;
    let inv_rate = pct(input.inv_rate);
    let growth = Decimal::ONE + PROPERTY_GROWTH;

    let mut home_value = input.current_home_value;
    let mut inv_value = input.inv_price;
    let mut home_debt = annual_existing_payment * EXISTING_REMAINING_YEARS;
    let mut inv_debt = inv_principal;

    let mut points = Vec::with_capacity(PROJECTION_YEARS as usize + 1);

    for year in 0..=PROJECTION_YEARS {
        if year > 0 {
            let interest = inv_debt * inv_rate;
            let principal = (annual_inv_payment - interest).max(Decimal::ZERO);
            inv_debt = (inv_debt - principal).max(Decimal::ZERO);
            home_debt = (home_debt - existing_principal_per_year).max(Decimal::ZERO);

            home_value *= growth;
            inv_value *= growth;
        }

        let assets = home_value + inv_value;
        let debt = home_debt + inv_debt;
        points.push(PortfolioTimelinePoint {
            year,
            assets,
            debt,
            equity: assets - debt,
        });
    }

    points
}

fn validate_input(input: &PortfolioInputs) -> LoanRoiResult<()> {
    let non_negative = [
        ("monthly_income", input.monthly_income),
        ("current_home_value", input.current_home_value),
        ("current_home_mortgage", input.current_home_mortgage),
        ("current_home_rent_income", input.current_home_rent_income),
        ("inv_price", input.inv_price),
        ("inv_down_payment", input.inv_down_payment),
        ("inv_rate", input.inv_rate),
        ("inv_rent", input.inv_rent),
        ("new_living_rent", input.new_living_rent),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(LoanRoiError::invalid(field, "Value cannot be negative"));
        }
        if field != "inv_rate" && value > MAX_AMOUNT {
            return Err(LoanRoiError::invalid(
                field,
                format!("Amount cannot exceed {MAX_AMOUNT}"),
            ));
        }
    }
    if input.inv_rate > MAX_INTEREST_RATE {
        return Err(LoanRoiError::invalid(
            "inv_rate",
            format!("Interest rate cannot exceed {MAX_INTEREST_RATE}%"),
        ));
    }
    if input.inv_duration == 0 || input.inv_duration > 50 {
        return Err(LoanRoiError::invalid(
            "inv_duration",
            "Investment loan duration must be between 1 and 50 years",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
