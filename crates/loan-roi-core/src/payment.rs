use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanRoiError;
use crate::types::{pct, Money, Percent, Rate};
use crate::LoanRoiResult;

/// Periodic rate for monthly compounding of an annual percentage.
pub fn monthly_rate(annual_rate: Percent) -> Rate {
    pct(annual_rate) / dec!(12)
}

/// Fixed monthly payment that fully amortises `principal` over `years`.
///
/// Zero interest falls back to straight-line repayment, which is the limit
/// of the annuity identity as the rate tends to zero.
pub fn compute_monthly_payment(
    principal: Money,
    annual_rate: Percent,
    years: u32,
) -> LoanRoiResult<Money> {
    if years == 0 {
        return Err(LoanRoiError::invalid(
            "years",
            "Loan duration must be at least one year",
        ));
    }

    let n = years as u64 * 12;
    let r = monthly_rate(annual_rate);

    if r.is_zero() {
        return Ok(principal / Decimal::from(n));
    }

    let factor = (Decimal::ONE + r)
        .checked_powu(n)
        .ok_or_else(|| LoanRoiError::Overflow {
            context: "annuity payment factor".into(),
        })?;
    let denom = Decimal::ONE - Decimal::ONE / factor;

    if denom.is_zero() {
        return Err(LoanRoiError::DivisionByZero {
            context: "annuity payment factor".into(),
        });
    }

    Ok(principal * r / denom)
}

/// Share of income consumed by `payment`; zero when there is no income.
pub fn debt_ratio(payment: Money, monthly_income: Money) -> Rate {
    if monthly_income > Decimal::ZERO {
        payment / monthly_income
    } else {
        Decimal::ZERO
    }
}
