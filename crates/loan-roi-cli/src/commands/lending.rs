use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use loan_roi_core::lending::max_loan;
use loan_roi_core::lending::scenarios;
use loan_roi_core::lending::simulation;
use loan_roi_core::lending::strategies::{self, StrategyGrid};
use loan_roi_core::lending::LoanInputs;
use loan_roi_core::payment::compute_monthly_payment;

use crate::input;

/// Arguments shared by every command that takes a loan record
#[derive(Args)]
pub struct LoanArgs {
    /// Path to a JSON loan record (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GridChoice {
    /// Overdrive 0-100% by 5, injection 0-40% by 2
    Fine,
    /// Overdrive 0-100% by 10, injection 0-50% by 5
    Coarse,
}

impl From<GridChoice> for StrategyGrid {
    fn from(choice: GridChoice) -> Self {
        match choice {
            GridChoice::Fine => StrategyGrid::fine(),
            GridChoice::Coarse => StrategyGrid::coarse(),
        }
    }
}

/// Arguments for the payoff strategy search
#[derive(Args)]
pub struct StrategiesArgs {
    /// Path to a JSON loan record (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Search grid resolution
    #[arg(long, value_enum, default_value = "fine")]
    pub grid: GridChoice,
}

/// Arguments for a standalone annuity payment
#[derive(Args)]
pub struct PaymentArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate in percent (e.g. 3.7)
    #[arg(long)]
    pub rate: Decimal,

    /// Duration in years
    #[arg(long)]
    pub years: u32,
}

#[derive(Debug, Serialize)]
struct PaymentOutput {
    monthly_payment: Decimal,
    principal: Decimal,
    annual_rate: Decimal,
    years: u32,
    total_paid: Decimal,
    total_interest: Decimal,
}

pub fn run_simulate(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanInputs = input::load(args.input.as_deref(), "simulation")?;
    let result = simulation::simulate(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_max_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanInputs = input::load(args.input.as_deref(), "max loan")?;
    let result = max_loan::calc_max_loan(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_scenarios(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanInputs = input::load(args.input.as_deref(), "duration scenarios")?;
    let result = scenarios::calculate_multi_scenarios(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_strategies(args: StrategiesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanInputs = input::load(args.input.as_deref(), "strategy search")?;
    let grid = StrategyGrid::from(args.grid);
    let result = strategies::find_strategies_on_grid(&loan, &grid)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.principal < Decimal::ZERO {
        return Err("--principal cannot be negative".into());
    }
    if args.rate < Decimal::ZERO {
        return Err("--rate cannot be negative".into());
    }

    let monthly_payment = compute_monthly_payment(args.principal, args.rate, args.years)?;
    let total_paid = monthly_payment * Decimal::from(args.years) * Decimal::from(12);

    let output = PaymentOutput {
        monthly_payment,
        principal: args.principal,
        annual_rate: args.rate,
        years: args.years,
        total_paid,
        total_interest: total_paid - args.principal,
    };
    Ok(serde_json::json!({ "result": serde_json::to_value(output)? }))
}
