use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One historical annual free-cash-flow observation.
///
/// `year` may be absent when the source lacks dating; position in the series
/// (most-recent-first) then implies recency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FcfEntry {
    #[serde(default)]
    pub year: Option<i32>,
    pub value: f64,
}

/// One projected FCF value, tagged with the calendar year it falls in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedFcf {
    pub year: i32,
    pub value: f64,
}

/// Inputs to the cost-of-capital model. All rates are annualized fractions;
/// `debt` and `equity` are market values in the same currency unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CapitalInputs {
    pub beta: f64,
    pub debt: f64,
    pub equity: f64,
    pub cost_of_debt: f64,
    pub tax_rate: f64,
    pub risk_free_rate: f64,
    pub market_return: f64,
}

/// How the applied growth rate is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthMethod {
    #[default]
    Cagr,
    Average,
}

impl GrowthMethod {
    pub fn to_label(&self) -> &'static str {
        match self {
            GrowthMethod::Cagr => "CAGR",
            GrowthMethod::Average => "Average",
        }
    }
}

/// Compound and simple year-over-year growth derived from an FCF history.
/// Both values are always finite; degenerate computations are sanitized to
/// the default assumption before they get here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRates {
    pub cagr: f64,
    pub average: f64,
}

/// Valuation verdict relative to the market price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    Undervalued,
    Overvalued,
    Fair,
    Unknown,
}

impl Classification {
    pub fn to_label(&self) -> &'static str {
        match self {
            Classification::Undervalued => "Undervalued",
            Classification::Overvalued => "Overvalued",
            Classification::Fair => "Fairly valued",
            Classification::Unknown => "Unknown",
        }
    }
}

/// Everything one valuation run needs, already resolved by collaborators.
///
/// The engine is ticker-agnostic: `symbol` is a label, never resolved here,
/// and no field triggers I/O. Scalars left as `None` fall back to the
/// orchestrator's documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationRequest {
    pub symbol: String,
    /// Historical FCF observations, most-recent-first.
    #[serde(default)]
    pub fcf_history: Vec<FcfEntry>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
    #[serde(default)]
    pub total_debt: f64,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default)]
    pub growth_method: GrowthMethod,
    /// Explicit growth override, only honored under the CAGR method.
    #[serde(default)]
    pub growth_override: Option<f64>,
    #[serde(default)]
    pub tax_rate: Option<f64>,
    #[serde(default)]
    pub cost_of_debt: Option<f64>,
    #[serde(default)]
    pub risk_free_rate: Option<f64>,
}

/// Result of one valuation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationResult {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub intrinsic_value_per_share: Option<f64>,
    pub current_price: f64,
    /// Intrinsic value minus price, absolute.
    pub difference: Option<f64>,
    /// Difference as a percentage of the market price.
    pub difference_pct: Option<f64>,
    pub classification: Classification,
    /// `(intrinsic - price) / intrinsic`; the margin-of-safety fraction.
    pub safety_margin: Option<f64>,
    pub growth_method: GrowthMethod,
    /// Rate actually fed into the projection (after any override).
    pub growth_rate_applied: f64,
    /// Rates detected from the history, before any override.
    pub growth_rates: GrowthRates,
    pub capm: f64,
    pub wacc: f64,
    pub risk_free_rate: f64,
    pub market_return: f64,
    pub tax_rate: f64,
    pub cost_of_debt: f64,
    pub beta: f64,
    /// Market value of equity used as the WACC equity leg.
    pub market_cap: f64,
    pub total_debt: f64,
    pub shares_outstanding: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub equity_value: Option<f64>,
    /// Terminal (perpetuity) value at the end of the horizon, undiscounted.
    pub terminal_value: Option<f64>,
    /// Historical series, each entry tagged with its (possibly inferred) year.
    pub historical_fcf: Vec<FcfEntry>,
    pub projected_fcf: Vec<ProjectedFcf>,
    /// Human-readable notes about fallbacks and overrides applied.
    #[serde(default)]
    pub notes: Vec<String>,
}
