use clap::Args;
use serde_json::Value;

use loan_roi_core::portfolio::rent_vesting::{self, PortfolioInputs};

use crate::input;

/// Arguments for the rent-vesting projection
#[derive(Args)]
pub struct PortfolioArgs {
    /// Path to a JSON portfolio record (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_portfolio(args: PortfolioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let portfolio: PortfolioInputs = input::load(args.input.as_deref(), "portfolio projection")?;
    let result = rent_vesting::calculate_portfolio(&portfolio)?;
    Ok(serde_json::to_value(result)?)
}
