//! Composition of the DCF pipeline: growth selection, cost of capital,
//! projection, discounting, and classification against the market price.

use chrono::{Datelike, Utc};
use dcf_engine::{capital, growth, intrinsic, projection};
use valuation_core::{
    CapitalInputs, Classification, FcfEntry, GrowthMethod, ProjectedFcf, ValuationRequest,
    ValuationResult,
};

pub mod config;
pub mod screen;

pub use config::ValuationDefaults;
pub use screen::{value_screen, FilterCheck, ScreenInputs};

/// Runs the full valuation pipeline for one request.
///
/// Stateless and synchronous: every supplementary scalar arrives already
/// resolved (or falls back to [`ValuationDefaults`]), so a run is a pure
/// function of its inputs. Data-quality problems degrade to defaults or
/// `None` fields — they never surface as errors.
pub struct ValuationOrchestrator {
    defaults: ValuationDefaults,
}

impl ValuationOrchestrator {
    pub fn new(defaults: ValuationDefaults) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ValuationDefaults {
        &self.defaults
    }

    pub fn run(&self, request: &ValuationRequest) -> ValuationResult {
        let timestamp = Utc::now();
        let base_year = timestamp.year();

        tracing::info!(
            "Running DCF valuation for {} ({} history entries, method {:?})",
            request.symbol,
            request.fcf_history.len(),
            request.growth_method
        );

        // Non-finite history values would poison every downstream rate; drop
        // them at the boundary.
        let values: Vec<f64> = request
            .fcf_history
            .iter()
            .map(|entry| entry.value)
            .filter(|value| value.is_finite())
            .collect();

        let growth_rates = growth::estimate_growth(&values);

        // The explicit override is only meaningful when CAGR drives the
        // projection; under the average method it is ignored.
        let (growth_rate_applied, overridden) = match request.growth_method {
            GrowthMethod::Cagr => match request.growth_override.filter(|g| g.is_finite()) {
                Some(g) => (g, true),
                None => (growth_rates.cagr, false),
            },
            GrowthMethod::Average => (growth_rates.average, false),
        };

        let price = request.current_price.unwrap_or(0.0);
        let beta = request.beta.filter(|b| b.is_finite()).unwrap_or(self.defaults.beta);
        let tax_rate = request.tax_rate.unwrap_or(self.defaults.tax_rate);
        let cost_of_debt = request.cost_of_debt.unwrap_or(self.defaults.cost_of_debt);
        let risk_free_rate = request.risk_free_rate.unwrap_or(self.defaults.risk_free_rate);

        let shares = request
            .shares_outstanding
            .filter(|s| s.is_finite() && *s > 0.0);
        let market_cap = shares.unwrap_or(0.0) * price;

        let capital_inputs = CapitalInputs {
            beta,
            debt: request.total_debt,
            equity: market_cap,
            cost_of_debt,
            tax_rate,
            risk_free_rate,
            market_return: self.defaults.market_return,
        };
        let capm = capital::cost_of_equity(beta, risk_free_rate, self.defaults.market_return);
        let wacc = capital::wacc(&capital_inputs);

        let current_fcf = values.first().copied().unwrap_or(0.0);
        let projected = projection::project_fcf(
            current_fcf,
            growth_rate_applied,
            self.defaults.horizon_years,
        );

        let discounted = intrinsic::discount(&projected, wacc, self.defaults.perpetuity_growth);

        let enterprise_value = discounted.map(|d| d.enterprise_value);
        let equity_value =
            enterprise_value.map(|ev| intrinsic::equity_value(ev, request.total_debt));
        let intrinsic_value_per_share =
            equity_value.and_then(|eq| intrinsic::per_share_value(eq, shares));

        let difference = intrinsic_value_per_share.map(|value| value - price);
        let difference_pct = difference.and_then(|diff| {
            if price != 0.0 {
                Some(diff / price * 100.0)
            } else {
                None
            }
        });
        let safety_margin = intrinsic_value_per_share.and_then(|value| {
            if price != 0.0 && value != 0.0 {
                Some((value - price) / value)
            } else {
                None
            }
        });

        let classification = classify(intrinsic_value_per_share, price);

        // Tag both series with calendar years; undated history entries get a
        // year inferred from their position.
        let historical_fcf: Vec<FcfEntry> = request
            .fcf_history
            .iter()
            .enumerate()
            .map(|(index, entry)| FcfEntry {
                year: Some(entry.year.unwrap_or(base_year - index as i32)),
                value: entry.value,
            })
            .collect();
        let projected_fcf: Vec<ProjectedFcf> = projected
            .iter()
            .enumerate()
            .map(|(index, value)| ProjectedFcf {
                year: base_year + index as i32 + 1,
                value: *value,
            })
            .collect();

        let mut notes = Vec::new();
        if values.len() < 2 {
            notes.push(format!(
                "Fewer than 2 FCF observations; assuming {:.0}% growth.",
                growth::DEFAULT_GROWTH_RATE * 100.0
            ));
        }
        if request.tax_rate.is_none() {
            notes.push(format!(
                "No reliable tax rate resolved; using the {:.0}% default.",
                self.defaults.tax_rate * 100.0
            ));
        }
        if request.cost_of_debt.is_none() {
            notes.push(format!(
                "No reliable cost of debt resolved; using the {:.0}% default.",
                self.defaults.cost_of_debt * 100.0
            ));
        }
        if request.risk_free_rate.is_none() {
            notes.push(format!(
                "Risk-free rate not supplied; using the {:.2}% default.",
                self.defaults.risk_free_rate * 100.0
            ));
        }
        if overridden {
            notes.push(format!(
                "Growth override applied: {:.2}%.",
                growth_rate_applied * 100.0
            ));
        }

        if intrinsic_value_per_share.is_none() {
            tracing::warn!(
                "Valuation undefined for {} (wacc {:.4}, shares {:?})",
                request.symbol,
                wacc,
                shares
            );
        } else {
            tracing::debug!(
                "{}: intrinsic {:.2} vs price {:.2} -> {:?}",
                request.symbol,
                intrinsic_value_per_share.unwrap_or_default(),
                price,
                classification
            );
        }

        ValuationResult {
            symbol: request.symbol.clone(),
            timestamp,
            intrinsic_value_per_share,
            current_price: price,
            difference,
            difference_pct,
            classification,
            safety_margin,
            growth_method: request.growth_method,
            growth_rate_applied,
            growth_rates,
            capm,
            wacc,
            risk_free_rate,
            market_return: self.defaults.market_return,
            tax_rate,
            cost_of_debt,
            beta,
            market_cap,
            total_debt: request.total_debt,
            shares_outstanding: shares,
            enterprise_value,
            equity_value,
            terminal_value: discounted.map(|d| d.terminal_value),
            historical_fcf,
            projected_fcf,
            notes,
        }
    }
}

impl Default for ValuationOrchestrator {
    fn default() -> Self {
        Self::new(ValuationDefaults::default())
    }
}

/// Classify intrinsic value against market price with a ±10% fair band.
/// Unknown when either side is unavailable (a zero price counts as absent).
pub fn classify(intrinsic_value: Option<f64>, price: f64) -> Classification {
    match intrinsic_value {
        Some(value) if price != 0.0 => {
            if value > price * 1.10 {
                Classification::Undervalued
            } else if value < price * 0.90 {
                Classification::Overvalued
            } else {
                Classification::Fair
            }
        }
        _ => Classification::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn request(symbol: &str) -> ValuationRequest {
        ValuationRequest {
            symbol: symbol.to_string(),
            fcf_history: vec![
                FcfEntry { year: Some(2025), value: 121.0e9 },
                FcfEntry { year: Some(2024), value: 110.0e9 },
                FcfEntry { year: Some(2023), value: 100.0e9 },
            ],
            current_price: Some(10.0),
            shares_outstanding: Some(100.0e9),
            total_debt: 0.0,
            beta: Some(1.0),
            growth_method: GrowthMethod::Cagr,
            growth_override: None,
            tax_rate: Some(0.25),
            cost_of_debt: Some(0.05),
            risk_free_rate: Some(0.04),
        }
    }

    #[test]
    fn test_all_equity_scenario_wacc_equals_capm() {
        // shares * price = 1000, no debt: wacc must equal the cost of equity.
        let mut req = request("EQTY");
        req.shares_outstanding = Some(100.0);
        req.current_price = Some(10.0);
        req.fcf_history = vec![
            FcfEntry { year: None, value: 120.0 },
            FcfEntry { year: None, value: 100.0 },
        ];
        let result = ValuationOrchestrator::default().run(&req);
        assert_relative_eq!(result.capm, 0.08, epsilon = 1e-12);
        assert_relative_eq!(result.wacc, 0.08, epsilon = 1e-12);
        assert_relative_eq!(result.market_cap, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pipeline_produces_full_projection_and_value() {
        let result = ValuationOrchestrator::default().run(&request("GROW"));
        assert_eq!(result.projected_fcf.len(), 5);
        assert!(result.intrinsic_value_per_share.is_some());
        assert!(result.enterprise_value.unwrap() > 0.0);
        assert!(result.terminal_value.unwrap() > 0.0);
        // 10% CAGR from the steady series drives year one.
        assert_relative_eq!(result.growth_rates.cagr, 0.10, epsilon = 1e-9);
        assert_relative_eq!(
            result.projected_fcf[0].value,
            121.0e9 * 1.10,
            epsilon = 1.0
        );
    }

    #[test]
    fn test_difference_and_classification_are_consistent() {
        let result = ValuationOrchestrator::default().run(&request("DIFF"));
        let intrinsic = result.intrinsic_value_per_share.unwrap();
        let difference = result.difference.unwrap();
        assert_relative_eq!(difference, intrinsic - 10.0, epsilon = 1e-9);
        assert_relative_eq!(
            result.difference_pct.unwrap(),
            difference / 10.0 * 100.0,
            epsilon = 1e-9
        );
        assert_eq!(result.classification, classify(Some(intrinsic), 10.0));
    }

    #[test]
    fn test_growth_override_only_applies_to_cagr() {
        let mut req = request("OVRD");
        req.growth_override = Some(0.07);
        let result = ValuationOrchestrator::default().run(&req);
        assert_relative_eq!(result.growth_rate_applied, 0.07, epsilon = 1e-12);
        assert!(result.notes.iter().any(|n| n.contains("override")));

        req.growth_method = GrowthMethod::Average;
        let result = ValuationOrchestrator::default().run(&req);
        assert_relative_eq!(
            result.growth_rate_applied,
            result.growth_rates.average,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_non_finite_override_is_ignored() {
        let mut req = request("NANG");
        req.growth_override = Some(f64::NAN);
        let result = ValuationOrchestrator::default().run(&req);
        assert_relative_eq!(result.growth_rate_applied, result.growth_rates.cagr, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_price_yields_unknown_classification() {
        let mut req = request("NOPX");
        req.current_price = None;
        let result = ValuationOrchestrator::default().run(&req);
        // No price means no equity leg: wacc degenerates to 0 and the
        // valuation is undefined end to end.
        assert_eq!(result.wacc, 0.0);
        assert!(result.intrinsic_value_per_share.is_none());
        assert_eq!(result.classification, Classification::Unknown);
        assert!(result.difference.is_none());
    }

    #[test]
    fn test_missing_shares_blocks_per_share_value() {
        let mut req = request("NOSH");
        req.shares_outstanding = None;
        req.total_debt = 500.0e9;
        let result = ValuationOrchestrator::default().run(&req);
        // Debt alone still yields a usable WACC, but nothing to divide by.
        assert!(result.wacc > 0.0);
        assert!(result.enterprise_value.is_some());
        assert!(result.intrinsic_value_per_share.is_none());
        assert_eq!(result.classification, Classification::Unknown);
    }

    #[test]
    fn test_short_history_falls_back_to_default_growth() {
        let mut req = request("ONEY");
        req.fcf_history = vec![FcfEntry { year: Some(2025), value: 50.0e9 }];
        let result = ValuationOrchestrator::default().run(&req);
        assert_relative_eq!(result.growth_rate_applied, 0.05, epsilon = 1e-12);
        assert!(result.notes.iter().any(|n| n.contains("Fewer than 2")));
    }

    #[test]
    fn test_year_tagging_of_series() {
        let mut req = request("YRTG");
        req.fcf_history = vec![
            FcfEntry { year: Some(2025), value: 1.0 },
            FcfEntry { year: None, value: 2.0 },
        ];
        let result = ValuationOrchestrator::default().run(&req);
        let base_year = result.timestamp.date_naive().year();
        assert_eq!(result.historical_fcf[0].year, Some(2025));
        assert_eq!(result.historical_fcf[1].year, Some(base_year - 1));
        assert_eq!(result.projected_fcf[0].year, base_year + 1);
        assert_eq!(result.projected_fcf[4].year, base_year + 5);
    }

    #[test]
    fn test_fallback_notes_for_unresolved_scalars() {
        let mut req = request("DFLT");
        req.tax_rate = None;
        req.cost_of_debt = None;
        req.risk_free_rate = None;
        let result = ValuationOrchestrator::default().run(&req);
        assert_relative_eq!(result.tax_rate, 0.25, epsilon = 1e-12);
        assert_relative_eq!(result.cost_of_debt, 0.05, epsilon = 1e-12);
        assert_relative_eq!(result.risk_free_rate, 0.0441, epsilon = 1e-12);
        assert_eq!(result.notes.len(), 3);
    }

    #[test]
    fn test_classify_bands() {
        assert_eq!(classify(Some(111.0), 100.0), Classification::Undervalued);
        assert_eq!(classify(Some(110.0), 100.0), Classification::Fair);
        assert_eq!(classify(Some(90.0), 100.0), Classification::Fair);
        assert_eq!(classify(Some(89.9), 100.0), Classification::Overvalued);
        assert_eq!(classify(None, 100.0), Classification::Unknown);
        assert_eq!(classify(Some(50.0), 0.0), Classification::Unknown);
    }
}
