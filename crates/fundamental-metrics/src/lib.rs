//! Resolution of supplementary capital inputs from multi-year financial
//! statements: effective tax rate, cost of debt, and dividend-yield cleanup.
//!
//! These are the caller-side plausibility filters the valuation engine relies
//! on — implausible samples are dropped here so the engine can trust every
//! scalar it receives. When nothing survives the filters the resolved value
//! is `None` and the orchestrator falls back to its documented defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest effective tax rate still treated as reliable. Rates at or above
/// this (one-off charges, tiny pre-tax bases) say nothing about the ongoing
/// tax burden.
pub const MAX_PLAUSIBLE_TAX_RATE: f64 = 1.5;

/// One fiscal year of statement lines needed to derive rates.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatementSample {
    pub year: i32,
    #[serde(default)]
    pub income_tax_expense: Option<f64>,
    #[serde(default)]
    pub pretax_income: Option<f64>,
    #[serde(default)]
    pub interest_expense: Option<f64>,
    #[serde(default)]
    pub total_debt: Option<f64>,
}

/// Rates derived from statement samples, with the surviving per-year values
/// kept for reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedRates {
    pub tax_rate: Option<f64>,
    pub tax_samples: BTreeMap<i32, f64>,
    pub cost_of_debt: Option<f64>,
    pub cost_samples: BTreeMap<i32, f64>,
}

/// Derive the average effective tax rate and cost of debt from yearly samples.
///
/// Tax rate per year is `|tax| / |pretax|` for years with a non-zero pre-tax
/// result, kept only inside `[0, `[`MAX_PLAUSIBLE_TAX_RATE`]`)`. Cost of debt
/// per year is `|interest| / debt` for years with positive debt. The resolved
/// value is the arithmetic mean of the surviving samples.
pub fn resolve_rates(samples: &[StatementSample]) -> ResolvedRates {
    let mut tax_samples = BTreeMap::new();
    let mut cost_samples = BTreeMap::new();

    for sample in samples {
        if let (Some(tax), Some(pretax)) = (sample.income_tax_expense, sample.pretax_income) {
            if tax.is_finite() && pretax.is_finite() && pretax != 0.0 {
                let rate = tax.abs() / pretax.abs();
                if (0.0..MAX_PLAUSIBLE_TAX_RATE).contains(&rate) {
                    tax_samples.insert(sample.year, rate);
                }
            }
        }

        if let (Some(interest), Some(debt)) = (sample.interest_expense, sample.total_debt) {
            if interest.is_finite() && debt.is_finite() && debt > 0.0 {
                cost_samples.insert(sample.year, interest.abs() / debt);
            }
        }
    }

    ResolvedRates {
        tax_rate: mean_of(&tax_samples),
        cost_of_debt: mean_of(&cost_samples),
        tax_samples,
        cost_samples,
    }
}

fn mean_of(samples: &BTreeMap<i32, f64>) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.values().sum::<f64>() / samples.len() as f64)
    }
}

/// Clean a reported dividend yield.
///
/// Some providers report the yield in percent rather than as a fraction, and
/// some report stale values wildly inconsistent with `dividend_rate / price`.
/// Percent-scale values (> 5) are rescaled, negatives are discarded, and a
/// reported yield more than `max(4x computed, 10%)` is replaced by the
/// computed one.
pub fn normalize_dividend_yield(
    reported_yield: Option<f64>,
    dividend_rate: Option<f64>,
    price: Option<f64>,
) -> Option<f64> {
    let reported = reported_yield.filter(|value| value.is_finite()).and_then(|value| {
        let value = if value > 5.0 { value / 100.0 } else { value };
        if value < 0.0 {
            None
        } else {
            Some(value)
        }
    });

    let computed = match (
        dividend_rate.filter(|value| value.is_finite()),
        price.filter(|value| value.is_finite()),
    ) {
        (Some(rate), Some(price)) if price != 0.0 => Some((rate / price).max(0.0)),
        _ => None,
    };

    match (reported, computed) {
        (None, computed) => computed,
        (Some(reported), Some(computed)) => {
            let upper_bound = (computed * 4.0).max(0.1);
            if reported > upper_bound {
                Some(computed)
            } else {
                Some(reported)
            }
        }
        (Some(reported), None) => Some(reported),
    }
}
