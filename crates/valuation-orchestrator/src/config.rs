use anyhow::{bail, Result};
use dcf_engine::{DEFAULT_HORIZON_YEARS, DEFAULT_PERPETUITY_GROWTH};
use serde::{Deserialize, Serialize};

/// Documented fallback defaults for inputs no reliable source resolved.
///
/// One explicit value passed into the orchestrator, so the engine carries no
/// hidden global state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValuationDefaults {
    /// Annualized risk-free rate when the FRED lookup fails (10y Treasury).
    pub risk_free_rate: f64,
    /// Long-run market return for CAPM.
    pub market_return: f64,
    /// Effective tax rate when statements yield no reliable figure.
    pub tax_rate: f64,
    /// Cost of debt when statements yield no reliable figure.
    pub cost_of_debt: f64,
    /// Beta when the provider reports none (1.0 = moves with the market).
    pub beta: f64,
    /// Explicit projection horizon, in years.
    pub horizon_years: usize,
    /// Perpetuity growth behind the terminal value.
    pub perpetuity_growth: f64,
}

impl Default for ValuationDefaults {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0441,
            market_return: 0.08,
            tax_rate: 0.25,
            cost_of_debt: 0.05,
            beta: 1.0,
            horizon_years: DEFAULT_HORIZON_YEARS,
            perpetuity_growth: DEFAULT_PERPETUITY_GROWTH,
        }
    }
}

impl ValuationDefaults {
    /// Validated constructor. Out-of-range values here are programmer errors,
    /// not data-quality problems, so they fail loudly instead of degrading.
    pub fn new(
        risk_free_rate: f64,
        market_return: f64,
        tax_rate: f64,
        cost_of_debt: f64,
        beta: f64,
        horizon_years: usize,
        perpetuity_growth: f64,
    ) -> Result<Self> {
        if horizon_years == 0 {
            bail!("projection horizon must be at least 1 year");
        }
        if !(0.0..1.5).contains(&tax_rate) {
            bail!("tax_rate must be in [0, 1.5)");
        }
        for (name, value) in [
            ("risk_free_rate", risk_free_rate),
            ("market_return", market_return),
            ("cost_of_debt", cost_of_debt),
            ("beta", beta),
            ("perpetuity_growth", perpetuity_growth),
        ] {
            if !value.is_finite() {
                bail!("{name} must be finite");
            }
        }

        Ok(Self {
            risk_free_rate,
            market_return,
            tax_rate,
            cost_of_debt,
            beta,
            horizon_years,
            perpetuity_growth,
        })
    }
}
