use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanRoiError;
use crate::lending::scenarios::MultiScenarioResult;
use crate::lending::simulation::SimulationResult;
use crate::lending::strategies::StrategyResult;
use crate::lending::LoanInputs;
use crate::{LoanRoiResult, DEBT_RATIO_MAX};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Credentials and model for the text-generation service. Always passed in
/// explicitly by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
        }
    }
}

/// Everything needed to issue one analysis request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub prompt: String,
}

/// Compact euro amount: `€1.25M`, `€12.5k`, `€950.00`.
pub fn k_format(value: Decimal) -> String {
    let round = |v: Decimal, dp: u32| v.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    if value.abs() >= dec!(1000000) {
        format!("€{:.2}M", round(value / dec!(1000000), 2))
    } else if value.abs() >= dec!(1000) {
        format!("€{:.1}k", round(value / dec!(1000), 1))
    } else {
        format!("€{:.2}", round(value, 2))
    }
}

/// Percentage with fixed decimals from a decimal ratio (0.355 → "35.50").
pub fn percent_label(ratio: Decimal, dp: u32) -> String {
    let v = (ratio * dec!(100)).round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, v)
}

/// Summary text describing the investment for the text-generation service.
pub fn build_analysis_prompt(
    inputs: &LoanInputs,
    result: &SimulationResult,
    scenarios: Option<&[MultiScenarioResult]>,
    strategies: Option<&[StrategyResult]>,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Act as a senior financial advisor and real estate expert. Analyze the following \
         real estate investment scenario and provide a concise, actionable report.\n\n",
    );

    prompt.push_str("**Investment Profile:**\n");
    prompt.push_str(&format!("- Property Price: {}\n", k_format(inputs.property_price)));
    prompt.push_str(&format!("- Down Payment: {}\n", k_format(inputs.manual_down_payment)));
    prompt.push_str(&format!("- Loan Duration: {} years\n", inputs.credit_years));
    prompt.push_str(&format!("- Interest Rate: {}%\n", inputs.interest_rate.normalize()));
    prompt.push_str(&format!("- Monthly Income: {}\n", k_format(inputs.monthly_income)));
    prompt.push('\n');

    prompt.push_str("**Simulation Results:**\n");
    prompt.push_str(&format!(
        "- Monthly Mortgage Payment: {}\n",
        k_format(result.final_monthly_payment)
    ));
    prompt.push_str(&format!(
        "- Debt Ratio: {}% (Limit: {}%)\n",
        percent_label(result.debt_ratio, 2),
        percent_label(DEBT_RATIO_MAX, 0)
    ));
    prompt.push_str(&format!("- Monthly Cashflow: {}\n", k_format(result.net_rent_cashflow)));
    prompt.push_str(&format!(
        "- Total Economic Gain (Monthly): {}\n",
        k_format(result.total_monthly_economic_gain)
    ));
    prompt.push_str(&format!(
        "- Real Profit Break-Even: {} years\n",
        result.equity_break_even_years
    ));
    prompt.push_str(&format!(
        "- Total ROI (Annualized): {:.2}%\n",
        result
            .total_roi
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    ));

    if let Some(scenarios) = scenarios.filter(|s| !s.is_empty()) {
        prompt.push('\n');
        prompt.push_str("**Loan Duration Comparison:**\n");
        for s in scenarios {
            prompt.push_str(&format!(
                "- {} years: payment {}, total interest {}, debt ratio {}%, equity at 10 years {}{}\n",
                s.duration,
                k_format(s.monthly_payment),
                k_format(s.total_interest),
                percent_label(s.debt_ratio, 1),
                k_format(s.equity_at_10_years),
                if s.is_viable { "" } else { " (not viable)" }
            ));
        }
    }

    if let Some(strategies) = strategies.filter(|s| !s.is_empty()) {
        prompt.push('\n');
        prompt.push_str("**Payoff Strategies:**\n");
        for s in strategies {
            prompt.push_str(&format!(
                "- {}: overdrive {}%, injection {}%, payment {}, paid off in {:.1} years, interest saved {}\n",
                s.name,
                s.overdrive.normalize(),
                s.injection.normalize(),
                k_format(s.monthly_payment),
                Decimal::from(s.months_to_payoff) / dec!(12),
                k_format(s.interest_saved)
            ));
        }
    }

    prompt.push_str(
        "\n**Task:**\n\
         1. **Verdict**: Is this a good investment? (Yes/No/Caution)\n\
         2. **Risk Analysis**: Highlight key risks (cashflow, debt ratio, market).\n\
         3. **Strategy**: Suggest 1-2 specific moves to improve this.\n\
         4. **Explanation**: Briefly explain why the cashflow might be negative but the \
         investment is still profitable (Economic Gain).\n\n\
         Keep it professional, encouraging, but realistic. Format with Markdown.\n",
    );

    prompt
}

/// Pair the prompt with the caller's credentials.
pub fn prepare_analysis(
    config: &AdvisorConfig,
    inputs: &LoanInputs,
    result: &SimulationResult,
    scenarios: Option<&[MultiScenarioResult]>,
    strategies: Option<&[StrategyResult]>,
) -> LoanRoiResult<AnalysisRequest> {
    let api_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or_else(|| LoanRoiError::invalid("api_key", "An API key is required for AI analysis"))?;

    Ok(AnalysisRequest {
        model: config.model.clone(),
        api_key: api_key.to_string(),
        prompt: build_analysis_prompt(inputs, result, scenarios, strategies),
    })
}
