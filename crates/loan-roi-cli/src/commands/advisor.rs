use clap::Args;
use serde_json::Value;

use loan_roi_core::advisor::prompt::{self, AdvisorConfig, DEFAULT_MODEL};
use loan_roi_core::advisor::recommendations;
use loan_roi_core::lending::scenarios::calculate_multi_scenarios;
use loan_roi_core::lending::simulation::simulate;
use loan_roi_core::lending::strategies::{find_strategies_on_grid, StrategyGrid};
use loan_roi_core::lending::LoanInputs;

use super::lending::GridChoice;
use crate::input;

/// Arguments for rule-based recommendations
#[derive(Args)]
pub struct RecommendArgs {
    /// Path to a JSON loan record (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for building an advisor request
#[derive(Args)]
pub struct PromptArgs {
    /// Path to a JSON loan record (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// API key for the text-generation service
    #[arg(long, env = "LOAN_ROI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model name for the text-generation service
    #[arg(long, env = "LOAN_ROI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Include the 10/15/20/25 year comparison
    #[arg(long)]
    pub with_scenarios: bool,

    /// Include payoff strategies searched on this grid
    #[arg(long, value_enum)]
    pub with_strategies: Option<GridChoice>,
}

pub fn run_recommend(args: RecommendArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanInputs = input::load(args.input.as_deref(), "recommendations")?;
    let simulation = simulate(&loan)?;
    let recs = recommendations::get_recommendations(&loan, &simulation.result);
    Ok(serde_json::json!({
        "result": recs,
        "warnings": simulation.warnings,
    }))
}

pub fn run_prompt(args: PromptArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanInputs = input::load(args.input.as_deref(), "advisor prompt")?;
    let config = AdvisorConfig {
        api_key: args.api_key,
        model: args.model,
    };

    let simulation = simulate(&loan)?.result;
    let scenarios = if args.with_scenarios {
        Some(calculate_multi_scenarios(&loan)?.result)
    } else {
        None
    };
    let strategies = match args.with_strategies {
        Some(choice) => Some(find_strategies_on_grid(&loan, &StrategyGrid::from(choice))?.result),
        None => None,
    };

    let request = prompt::prepare_analysis(
        &config,
        &loan,
        &simulation,
        scenarios.as_deref(),
        strategies.as_deref(),
    )?;
    tracing::debug!(model = %request.model, chars = request.prompt.len(), "advisor request prepared");
    Ok(serde_json::json!({ "result": serde_json::to_value(request)? }))
}
