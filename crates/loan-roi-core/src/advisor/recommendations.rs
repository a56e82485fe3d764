use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::prompt::{k_format, percent_label};
use crate::lending::simulation::SimulationResult;
use crate::lending::LoanInputs;
use crate::DEBT_RATIO_MAX;

/// Down payments below this share of the price are flagged.
const LOW_DOWN_PAYMENT_SHARE: Decimal = dec!(0.1);

/// Plain-language notes on a simulated loan, most urgent first.
pub fn get_recommendations(inputs: &LoanInputs, result: &SimulationResult) -> Vec<String> {
    let mut recs = Vec::new();

    if inputs.manual_down_payment < inputs.property_price * LOW_DOWN_PAYMENT_SHARE {
        recs.push(format!(
            "Down payment {} is low (<10%). A larger contribution lowers both risk and the monthly payment.",
            k_format(inputs.manual_down_payment)
        ));
    }

    if result.debt_ratio > DEBT_RATIO_MAX {
        recs.push(format!(
            "Debt Ratio Alert: {}% > {}%. Borrow less or raise income before applying.",
            percent_label(result.debt_ratio, 1),
            percent_label(DEBT_RATIO_MAX, 0)
        ));
    }

    if result.net_rent_cashflow < Decimal::ZERO {
        recs.push(format!(
            "Negative Cashflow: {} per month comes out of your own pocket.",
            k_format(result.net_rent_cashflow.abs())
        ));
        if result.total_monthly_economic_gain > Decimal::ZERO {
            recs.push(format!(
                "HOWEVER: total wealth still grows by {} per month (principal repaid plus appreciation). This works as a \"forced savings\" plan.",
                k_format(result.total_monthly_economic_gain)
            ));
        }
    } else {
        recs.push(format!(
            "Positive Cashflow! The property returns {} per month.",
            k_format(result.net_rent_cashflow)
        ));
    }

    recs.push(format!(
        "Real Profit Break-Even: net worth overtakes total cash invested after {} years.",
        result.equity_break_even_years
    ));

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lending::fixtures::rental_flat;
    use crate::lending::simulation::simulate;

    fn recommend(input: &LoanInputs) -> Vec<String> {
        let result = simulate(input).unwrap().result;
        get_recommendations(input, &result)
    }

    #[test]
    fn test_break_even_line_always_last() {
        let recs = recommend(&rental_flat());
        assert!(recs.last().unwrap().starts_with("Real Profit Break-Even"));
    }

    #[test]
    fn test_ten_percent_down_not_flagged() {
        let recs = recommend(&rental_flat());
        assert!(!recs.iter().any(|r| r.starts_with("Down payment")));
    }

    #[test]
    fn test_low_down_payment_flagged_first() {
        let mut input = rental_flat();
        input.manual_down_payment = dec!(10000);
        input.monthly_income = dec!(8000);
        let recs = recommend(&input);
        assert!(recs[0].starts_with("Down payment €10.0k is low"));
    }

    #[test]
    fn test_debt_ratio_alert_one_decimal() {
        let mut input = rental_flat();
        input.monthly_income = dec!(2000);
        let result = simulate(&input).unwrap().result;
        let recs = get_recommendations(&input, &result);
        let expected = format!("Debt Ratio Alert: {}%", percent_label(result.debt_ratio, 1));
        assert!(recs.iter().any(|r| r.starts_with(&expected)));
    }

    #[test]
    fn test_negative_cashflow_notes() {
        let input = rental_flat();
        let result = simulate(&input).unwrap().result;
        assert!(result.net_rent_cashflow < Decimal::ZERO);
        let recs = get_recommendations(&input, &result);
        assert!(recs.iter().any(|r| r.starts_with("Negative Cashflow")));
        let forced = recs.iter().any(|r| r.contains("forced savings"));
        assert_eq!(forced, result.total_monthly_economic_gain > Decimal::ZERO);
    }

    #[test]
    fn test_positive_cashflow_note() {
        let mut input = rental_flat();
        input.monthly_rent = dec!(3000);
        let recs = recommend(&input);
        assert!(recs.iter().any(|r| r.starts_with("Positive Cashflow!")));
        assert!(!recs.iter().any(|r| r.starts_with("Negative Cashflow")));
    }
}
