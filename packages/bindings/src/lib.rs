use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use loan_roi_core::advisor::prompt::{self, AdvisorConfig};
use loan_roi_core::advisor::recommendations;
use loan_roi_core::lending::scenarios::{self, MultiScenarioResult};
use loan_roi_core::lending::simulation::{self, SimulationResult};
use loan_roi_core::lending::strategies::{self, StrategyGrid, StrategyResult};
use loan_roi_core::lending::{max_loan, LoanInputs};
use loan_roi_core::payment;
use loan_roi_core::portfolio::rent_vesting::{self, PortfolioInputs};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse<T: serde::de::DeserializeOwned>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Lending
// ---------------------------------------------------------------------------

#[napi]
pub fn simulate_loan(input_json: String) -> NapiResult<String> {
    let input: LoanInputs = parse(&input_json)?;
    let output = simulation::simulate(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calc_max_loan(input_json: String) -> NapiResult<String> {
    let input: LoanInputs = parse(&input_json)?;
    let output = max_loan::calc_max_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_multi_scenarios(input_json: String) -> NapiResult<String> {
    let input: LoanInputs = parse(&input_json)?;
    let output = scenarios::calculate_multi_scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct StrategySearch {
    inputs: LoanInputs,
    #[serde(default)]
    grid: Option<StrategyGrid>,
}

/// Accepts `{ "inputs": {...}, "grid": {...} }`; the grid defaults to the fine scan.
#[napi]
pub fn find_strategies(input_json: String) -> NapiResult<String> {
    let search: StrategySearch = parse(&input_json)?;
    let grid = search.grid.unwrap_or_default();
    let output =
        strategies::find_strategies_on_grid(&search.inputs, &grid).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct PaymentQuery {
    principal: Decimal,
    annual_rate: Decimal,
    years: u32,
}

#[napi]
pub fn compute_monthly_payment(input_json: String) -> NapiResult<String> {
    let q: PaymentQuery = parse(&input_json)?;
    let monthly = payment::compute_monthly_payment(q.principal, q.annual_rate, q.years)
        .map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({ "monthly_payment": monthly.to_string() }))
        .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Portfolio
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_portfolio(input_json: String) -> NapiResult<String> {
    let input: PortfolioInputs = parse(&input_json)?;
    let output = rent_vesting::calculate_portfolio(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Advisor
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct AdvisorPayload {
    inputs: LoanInputs,
    result: SimulationResult,
    #[serde(default)]
    scenarios: Option<Vec<MultiScenarioResult>>,
    #[serde(default)]
    strategies: Option<Vec<StrategyResult>>,
    #[serde(default)]
    config: AdvisorConfig,
}

/// Accepts `{ "inputs": {...}, "result": {...} }` where `result` is a simulation result.
#[napi]
pub fn get_recommendations(input_json: String) -> NapiResult<String> {
    let payload: AdvisorPayload = parse(&input_json)?;
    let recs = recommendations::get_recommendations(&payload.inputs, &payload.result);
    serde_json::to_string(&recs).map_err(to_napi_error)
}

#[napi]
pub fn build_analysis_prompt(input_json: String) -> NapiResult<String> {
    let payload: AdvisorPayload = parse(&input_json)?;
    Ok(prompt::build_analysis_prompt(
        &payload.inputs,
        &payload.result,
        payload.scenarios.as_deref(),
        payload.strategies.as_deref(),
    ))
}

/// Returns the request with its API key, for the JS side to forward.
#[napi]
pub fn prepare_analysis(input_json: String) -> NapiResult<String> {
    let payload: AdvisorPayload = parse(&input_json)?;
    let request = prompt::prepare_analysis(
        &payload.config,
        &payload.inputs,
        &payload.result,
        payload.scenarios.as_deref(),
        payload.strategies.as_deref(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&serde_json::json!({
        "model": request.model,
        "api_key": request.api_key,
        "prompt": request.prompt,
    }))
    .map_err(to_napi_error)
}
