use valuation_core::CapitalInputs;

/// Cost of equity via CAPM: risk-free rate plus beta times the market premium.
pub fn cost_of_equity(beta: f64, risk_free_rate: f64, market_return: f64) -> f64 {
    risk_free_rate + beta * (market_return - risk_free_rate)
}

/// Weighted average cost of capital.
///
/// A company with neither debt nor equity has no capital structure to weight;
/// that degenerate case yields `0.0` rather than an error. No plausibility
/// bounds are enforced at this layer — upstream resolvers discard implausible
/// tax rates and debt costs before they get here.
pub fn wacc(inputs: &CapitalInputs) -> f64 {
    let total_capital = inputs.equity + inputs.debt;
    if total_capital == 0.0 {
        return 0.0;
    }

    let coe = cost_of_equity(inputs.beta, inputs.risk_free_rate, inputs.market_return);
    (inputs.equity / total_capital) * coe
        + (inputs.debt / total_capital) * inputs.cost_of_debt * (1.0 - inputs.tax_rate)
}
