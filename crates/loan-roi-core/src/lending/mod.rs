//! Single-property loan analytics: month-by-month simulation, borrowing
//! capacity, fixed-duration comparison and payoff strategy search.
//!
//! Every entry point takes a [`LoanInputs`] record, validates it, and returns
//! a fresh result inside the standard [`ComputationOutput`](crate::ComputationOutput)
//! envelope.

pub mod amortization;
pub mod max_loan;
pub mod scenarios;
pub mod simulation;
pub mod strategies;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanRoiError;
use crate::payment::compute_monthly_payment;
use crate::types::{pct, Money, Percent};
use crate::LoanRoiResult;

use amortization::{PaymentComposition, MAX_MONTHS};

/// Largest accepted money amount on an input record.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

/// Largest accepted annual interest rate, %.
pub const MAX_INTEREST_RATE: Decimal = dec!(100);

/// Largest accepted yearly rent indexation or appreciation, %.
pub const MAX_GROWTH_RATE: Decimal = dec!(50);

/// Caller-supplied description of a buy-to-let purchase and its financing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInputs {
    pub property_price: Money,
    pub manual_down_payment: Money,
    /// Notary / closing fees as % of price
    pub notary_fees_rate: Percent,
    /// Borrower insurance, yearly % of the borrowed principal
    pub insurance_yearly_rate: Percent,
    pub monthly_income: Money,
    pub credit_years: u32,
    /// Annual nominal interest rate, %
    pub interest_rate: Percent,
    /// % boost applied to the principal-and-interest payment
    pub payment_overdrive: Percent,
    /// % of monthly income added to every payment
    pub income_injection: Percent,
    /// Monthly property tax
    pub property_tax: Money,
    pub monthly_rent: Money,
    pub monthly_expenses: Money,
    pub occupancy_rate: Percent,
    /// Yearly rent increase, %
    #[serde(default)]
    pub rent_indexation_rate: Percent,
    /// Yearly property value increase, %
    #[serde(default)]
    pub property_appreciation_rate: Percent,
}

impl LoanInputs {
    /// Price less down payment, never negative.
    pub fn borrowed_principal(&self) -> Money {
        (self.property_price - self.manual_down_payment).max(Decimal::ZERO)
    }

    pub fn notary_fees(&self) -> Money {
        self.property_price * pct(self.notary_fees_rate)
    }

    /// Gross rent scaled by occupancy.
    pub fn effective_rent(&self) -> Money {
        self.monthly_rent * pct(self.occupancy_rate)
    }

    /// Year-one rent less expenses less the full monthly payment.
    pub fn net_rent_cashflow(&self, monthly_payment: Money) -> Money {
        self.effective_rent() - self.monthly_expenses - monthly_payment
    }

    /// Build the monthly payment for `principal` repaid over `years` with the
    /// given acceleration settings. Insurance, tax and income come from `self`.
    pub fn compose_payment(
        &self,
        principal: Money,
        years: u32,
        overdrive: Percent,
        injection: Percent,
    ) -> LoanRoiResult<PaymentComposition> {
        let base_pi = compute_monthly_payment(principal, self.interest_rate, years)?;
        Ok(PaymentComposition {
            base_pi,
            overdriven_pi: base_pi * (Decimal::ONE + pct(overdrive)),
            insurance: principal * pct(self.insurance_yearly_rate) / dec!(12),
            property_tax: self.property_tax,
            injection: self.monthly_income * pct(injection),
        })
    }

    /// Payment built from the record's own principal, duration and settings.
    pub fn own_payment(&self) -> LoanRoiResult<PaymentComposition> {
        self.compose_payment(
            self.borrowed_principal(),
            self.credit_years,
            self.payment_overdrive,
            self.income_injection,
        )
    }
}

pub(crate) fn validate_loan_inputs(input: &LoanInputs) -> LoanRoiResult<()> {
    let non_negative = [
        ("property_price", input.property_price),
        ("manual_down_payment", input.manual_down_payment),
        ("notary_fees_rate", input.notary_fees_rate),
        ("insurance_yearly_rate", input.insurance_yearly_rate),
        ("monthly_income", input.monthly_income),
        ("interest_rate", input.interest_rate),
        ("payment_overdrive", input.payment_overdrive),
        ("income_injection", input.income_injection),
        ("property_tax", input.property_tax),
        ("monthly_rent", input.monthly_rent),
        ("monthly_expenses", input.monthly_expenses),
        ("occupancy_rate", input.occupancy_rate),
        ("rent_indexation_rate", input.rent_indexation_rate),
        ("property_appreciation_rate", input.property_appreciation_rate),
    ];
    for (field, value) in non_negative {
        if value < Decimal::ZERO {
            return Err(LoanRoiError::invalid(field, "Value cannot be negative"));
        }
    }

    let amounts = [
        ("property_price", input.property_price),
        ("manual_down_payment", input.manual_down_payment),
        ("monthly_income", input.monthly_income),
        ("property_tax", input.property_tax),
        ("monthly_rent", input.monthly_rent),
        ("monthly_expenses", input.monthly_expenses),
    ];
    for (field, value) in amounts {
        if value > MAX_AMOUNT {
            return Err(LoanRoiError::invalid(
                field,
                format!("Amount cannot exceed {MAX_AMOUNT}"),
            ));
        }
    }

    if input.interest_rate > MAX_INTEREST_RATE {
        return Err(LoanRoiError::invalid(
            "interest_rate",
            format!("Interest rate cannot exceed {MAX_INTEREST_RATE}%"),
        ));
    }

    let growth = [
        ("rent_indexation_rate", input.rent_indexation_rate),
        ("property_appreciation_rate", input.property_appreciation_rate),
    ];
    for (field, value) in growth {
        if value > MAX_GROWTH_RATE {
            return Err(LoanRoiError::invalid(
                field,
                format!("Growth rate cannot exceed {MAX_GROWTH_RATE}% per year"),
            ));
        }
    }

    let max_years = MAX_MONTHS / 12;
    if input.credit_years == 0 || input.credit_years > max_years {
        return Err(LoanRoiError::invalid(
            "credit_years",
            format!("Credit duration must be between 1 and {max_years} years"),
        ));
    }

    if input.occupancy_rate > dec!(100) {
        return Err(LoanRoiError::invalid(
            "occupancy_rate",
            "Occupancy rate cannot exceed 100%",
        ));
    }

    Ok(())
}
