//! Payoff strategy search.
//!
//! Every (overdrive, injection) pair on a fixed grid is priced and amortised;
//! pairs that keep the debt ratio within the cap become candidates. Each named
//! strategy is then a fold over the candidates in scan order (overdrive
//! ascending, then injection ascending) where a later candidate only replaces
//! the current pick when strictly better, so the first-found wins ties.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::amortization::AmortizationSchedule;
use super::{validate_loan_inputs, LoanInputs};
use crate::payment::monthly_rate;
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::{LoanRoiResult, DEBT_RATIO_MAX};

/// Slack allowed above [`DEBT_RATIO_MAX`] when screening grid points.
pub const RATIO_TOLERANCE: Decimal = dec!(0.0001);

const BALANCED_MIN_YEARS_SAVED: Decimal = dec!(5);
const BALANCED_MAX_RATIO: Decimal = dec!(0.33);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Scan ranges for overdrive and injection, in whole percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyGrid {
    pub overdrive_max: u32,
    pub overdrive_step: u32,
    pub injection_max: u32,
    pub injection_step: u32,
}

impl StrategyGrid {
    /// 21 × 21 points: overdrive 0–100% by 5, injection 0–40% by 2.
    pub fn fine() -> Self {
        Self {
            overdrive_max: 100,
            overdrive_step: 5,
            injection_max: 40,
            injection_step: 2,
        }
    }

    /// 11 × 11 points: overdrive 0–100% by 10, injection 0–50% by 5.
    pub fn coarse() -> Self {
        Self {
            overdrive_max: 100,
            overdrive_step: 10,
            injection_max: 50,
            injection_step: 5,
        }
    }

    /// Grid points in scan order.
    pub fn points(&self) -> impl Iterator<Item = (Percent, Percent)> + '_ {
        let overdrives = (0..=self.overdrive_max).step_by(self.overdrive_step.max(1) as usize);
        overdrives.flat_map(move |od| {
            (0..=self.injection_max)
                .step_by(self.injection_step.max(1) as usize)
                .map(move |inj| (Decimal::from(od), Decimal::from(inj)))
        })
    }
}

impl Default for StrategyGrid {
    fn default() -> Self {
        Self::fine()
    }
}

/// The named buckets a candidate can be picked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    MaxSpeed,
    Balanced,
    CashflowPositive,
}

impl StrategyKind {
    /// Output order.
    pub const ALL: [StrategyKind; 3] = [
        StrategyKind::MaxSpeed,
        StrategyKind::Balanced,
        StrategyKind::CashflowPositive,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::MaxSpeed => "Max Speed",
            StrategyKind::Balanced => "Balanced Approach",
            StrategyKind::CashflowPositive => "Cashflow Positive",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::MaxSpeed => {
                "Highest payment the debt ratio allows: fastest payoff and largest interest saving"
            }
            StrategyKind::Balanced => {
                "Saves at least 5 years while keeping the debt ratio under 33%"
            }
            StrategyKind::CashflowPositive => {
                "Fastest payoff that still leaves the rental cashflow non-negative"
            }
        }
    }

    fn qualifies(&self, c: &GridPoint) -> bool {
        match self {
            StrategyKind::MaxSpeed => true,
            StrategyKind::Balanced => {
                c.years_saved >= BALANCED_MIN_YEARS_SAVED && c.debt_ratio < BALANCED_MAX_RATIO
            }
            StrategyKind::CashflowPositive => c.net_rent_cashflow >= Decimal::ZERO,
        }
    }

    /// Whether `challenger` strictly beats `incumbent` for this bucket.
    fn beats(&self, challenger: &GridPoint, incumbent: &GridPoint) -> bool {
        match self {
            StrategyKind::MaxSpeed => challenger.monthly_payment > incumbent.monthly_payment,
            StrategyKind::Balanced => challenger.interest_saved > incumbent.interest_saved,
            StrategyKind::CashflowPositive => {
                challenger.months_to_payoff < incumbent.months_to_payoff
            }
        }
    }

    /// Best qualifying candidate, first-found on ties.
    pub fn select<'a>(&self, candidates: &'a [GridPoint]) -> Option<&'a GridPoint> {
        candidates
            .iter()
            .filter(|c| self.qualifies(c))
            .fold(None, |best, c| match best {
                Some(b) if !self.beats(c, b) => Some(b),
                _ => Some(c),
            })
    }
}

/// One feasible grid point, fully evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub overdrive: Percent,
    pub injection: Percent,
    pub monthly_payment: Money,
    pub months_to_payoff: u32,
    pub total_interest: Money,
    pub interest_saved: Money,
    pub years_saved: Decimal,
    pub net_rent_cashflow: Money,
    pub debt_ratio: Rate,
}

/// A named payoff strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub name: String,
    pub description: String,
    /// % boost on principal + interest
    pub overdrive: Percent,
    /// % of income added to the payment
    pub injection: Percent,
    pub monthly_payment: Money,
    pub months_to_payoff: u32,
    pub total_interest: Money,
    /// Interest saved against the unaccelerated loan
    pub interest_saved: Money,
    pub years_saved: Decimal,
    pub net_rent_cashflow: Money,
    pub debt_ratio: Rate,
}

impl StrategyResult {
    fn from_point(kind: StrategyKind, p: &GridPoint) -> Self {
        Self {
            name: kind.name().into(),
            description: kind.description().into(),
            overdrive: p.overdrive,
            injection: p.injection,
            monthly_payment: p.monthly_payment,
            months_to_payoff: p.months_to_payoff,
            total_interest: p.total_interest,
            interest_saved: p.interest_saved,
            years_saved: p.years_saved,
            net_rent_cashflow: p.net_rent_cashflow,
            debt_ratio: p.debt_ratio,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Named payoff strategies on the default (fine) grid.
pub fn find_strategies(
    input: &LoanInputs,
) -> LoanRoiResult<ComputationOutput<Vec<StrategyResult>>> {
    find_strategies_on_grid(input, &StrategyGrid::default())
}

/// Named payoff strategies on an explicit grid.
///
/// An empty list means no grid point keeps the debt ratio within the cap.
pub fn find_strategies_on_grid(
    input: &LoanInputs,
    grid: &StrategyGrid,
) -> LoanRoiResult<ComputationOutput<Vec<StrategyResult>>> {
    let start = Instant::now();
    validate_loan_inputs(input)?;

    let candidates = evaluate_grid(input, grid)?;
    let strategies = classify(&candidates);

    let mut warnings = Vec::new();
    if strategies.is_empty() {
        warnings.push("No overdrive/injection combination satisfies the 37% debt ratio".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exhaustive overdrive × injection grid search",
        &serde_json::json!({ "inputs": input, "grid": grid }),
        warnings,
        elapsed,
        strategies,
    ))
}

/// Price and amortise every grid point, keeping the feasible ones in scan order.
pub fn evaluate_grid(input: &LoanInputs, grid: &StrategyGrid) -> LoanRoiResult<Vec<GridPoint>> {
    let principal = input.borrowed_principal();
    let rate = monthly_rate(input.interest_rate);

    let baseline_payment =
        input.compose_payment(principal, input.credit_years, Decimal::ZERO, Decimal::ZERO)?;
    let baseline = AmortizationSchedule::for_payment(principal, rate, &baseline_payment).summarize();
    let baseline_years = Decimal::from(baseline.months_to_payoff) / dec!(12);

    let mut candidates = Vec::new();
    let mut scanned = 0usize;

    for (overdrive, injection) in grid.points() {
        scanned += 1;
        let payment = input.compose_payment(principal, input.credit_years, overdrive, injection)?;
        let debt_ratio = payment.debt_ratio(input.monthly_income);
        if debt_ratio > DEBT_RATIO_MAX + RATIO_TOLERANCE {
            continue;
        }

        let run = AmortizationSchedule::for_payment(principal, rate, &payment).summarize();
        let years = Decimal::from(run.months_to_payoff) / dec!(12);
        let monthly_payment = payment.total();

        candidates.push(GridPoint {
            overdrive,
            injection,
            monthly_payment,
            months_to_payoff: run.months_to_payoff,
            total_interest: run.total_interest,
            interest_saved: (baseline.total_interest - run.total_interest).max(Decimal::ZERO),
            years_saved: (baseline_years - years).max(Decimal::ZERO),
            net_rent_cashflow: input.net_rent_cashflow(monthly_payment),
            debt_ratio,
        });
    }

    tracing::debug!(
        scanned,
        feasible = candidates.len(),
        baseline_months = baseline.months_to_payoff,
        "strategy grid evaluated"
    );
    Ok(candidates)
}

/// Pick each bucket's winner and drop buckets that repeat an earlier pick.
pub fn classify(candidates: &[GridPoint]) -> Vec<StrategyResult> {
    let mut picked: Vec<StrategyResult> = Vec::new();
    for kind in StrategyKind::ALL {
        let Some(point) = kind.select(candidates) else {
            continue;
        };
        let duplicate = picked
            .iter()
            .any(|s| s.overdrive == point.overdrive && s.injection == point.injection);
        if !duplicate {
            picked.push(StrategyResult::from_point(kind, point));
        }
    }
    picked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
