//! Shared month-by-month principal/interest loop.
//!
//! The simulator, the duration comparator and the strategy search all walk
//! the same schedule, so the payoff rules (no negative amortisation, no
//! overshoot, 600-month cap, 0.1 payoff tolerance) live here once.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::payment::debt_ratio;
use crate::types::{Money, Rate};

/// Hard cap on simulated months (50 years).
pub const MAX_MONTHS: u32 = 600;

/// Balance at or below which the loan is treated as repaid.
pub const PAYOFF_TOLERANCE: Decimal = dec!(0.1);

/// Breakdown of one monthly payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentComposition {
    /// Annuity principal + interest before overdrive
    pub base_pi: Money,
    /// Principal + interest after overdrive
    pub overdriven_pi: Money,
    /// Monthly borrower insurance
    pub insurance: Money,
    pub property_tax: Money,
    /// Share of income added to the payment
    pub injection: Money,
}

impl PaymentComposition {
    /// Everything the borrower pays each month.
    pub fn total(&self) -> Money {
        self.overdriven_pi + self.insurance + self.property_tax + self.injection
    }

    /// The part of the payment that services the loan itself.
    pub fn loan_service(&self) -> Money {
        self.overdriven_pi + self.injection
    }

    pub fn debt_ratio(&self, monthly_income: Money) -> Rate {
        debt_ratio(self.total(), monthly_income)
    }
}

/// One month of the schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmortizationStep {
    pub month: u32,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

/// Aggregate of a schedule run to completion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSummary {
    pub months_to_payoff: u32,
    pub total_interest: Money,
    pub final_balance: Money,
}

impl AmortizationSummary {
    pub fn is_repaid(&self) -> bool {
        self.final_balance <= PAYOFF_TOLERANCE
    }
}

/// Iterator over the months of a fixed-payment loan.
///
/// Yields while the balance is positive, stopping after the month in which
/// it falls to [`PAYOFF_TOLERANCE`] or once `max_months` have been produced.
#[derive(Debug, Clone)]
pub struct AmortizationSchedule {
    balance: Money,
    monthly_rate: Rate,
    payment: Money,
    month: u32,
    max_months: u32,
    repaid: bool,
}

impl AmortizationSchedule {
    /// `payment` and `injection` together are applied to interest first,
    /// then principal.
    pub fn new(
        principal: Money,
        monthly_rate: Rate,
        payment: Money,
        injection: Money,
        max_months: u32,
    ) -> Self {
        Self {
            balance: principal,
            monthly_rate,
            payment: payment + injection,
            month: 0,
            max_months,
            repaid: false,
        }
    }

    /// Schedule for a composed payment, capped at [`MAX_MONTHS`].
    pub fn for_payment(principal: Money, monthly_rate: Rate, payment: &PaymentComposition) -> Self {
        Self::new(
            principal,
            monthly_rate,
            payment.overdriven_pi,
            payment.injection,
            MAX_MONTHS,
        )
    }

    /// Same schedule, stopped early after `max_months`.
    pub fn capped_at(mut self, max_months: u32) -> Self {
        self.max_months = max_months.min(self.max_months);
        self
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Run the remaining months and report payoff time, interest and balance.
    pub fn summarize(mut self) -> AmortizationSummary {
        let mut total_interest = Decimal::ZERO;
        for step in self.by_ref() {
            total_interest += step.interest;
        }
        AmortizationSummary {
            months_to_payoff: self.month,
            total_interest,
            final_balance: self.balance,
        }
    }
}

impl Iterator for AmortizationSchedule {
    type Item = AmortizationStep;

    fn next(&mut self) -> Option<AmortizationStep> {
        if self.repaid || self.balance <= Decimal::ZERO || self.month >= self.max_months {
            return None;
        }

        self.month += 1;
        let interest = self.balance * self.monthly_rate;
        let principal = (self.payment - interest)
            .max(Decimal::ZERO)
            .min(self.balance);
        self.balance -= principal;

        if self.balance <= PAYOFF_TOLERANCE {
            self.repaid = true;
        }

        Some(AmortizationStep {
            month: self.month,
            interest,
            principal,
            balance: self.balance,
        })
    }
}
