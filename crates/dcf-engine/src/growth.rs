use valuation_core::GrowthRates;

/// Growth assumed when the history is too short or a computation degenerates.
pub const DEFAULT_GROWTH_RATE: f64 = 0.05;

/// Derive compound (CAGR) and simple year-over-year average growth from a
/// historical FCF series ordered most-recent-first.
///
/// Fewer than two observations mean there is nothing to measure and both
/// rates fall back to [`DEFAULT_GROWTH_RATE`]. Every computed rate passes
/// through the same sanitization, so the returned values are always finite.
pub fn estimate_growth(values: &[f64]) -> GrowthRates {
    if values.len() < 2 {
        return GrowthRates {
            cagr: DEFAULT_GROWTH_RATE,
            average: DEFAULT_GROWTH_RATE,
        };
    }

    let first = values[0]; // most recent
    let last = values[values.len() - 1]; // oldest
    let periods = (values.len() - 1) as f64;

    // CAGR is only defined for a positive-to-positive path.
    let cagr = if first > 0.0 && last > 0.0 {
        let ratio = first / last;
        if ratio > 0.0 {
            sanitize(ratio.powf(1.0 / periods) - 1.0)
        } else {
            DEFAULT_GROWTH_RATE
        }
    } else {
        DEFAULT_GROWTH_RATE
    };

    // Year-over-year rates in chronological order, skipping zero denominators.
    let chronological: Vec<f64> = values.iter().rev().copied().collect();
    let rates: Vec<f64> = chronological
        .windows(2)
        .filter_map(|pair| {
            let denominator = pair[0].abs();
            if denominator == 0.0 {
                None
            } else {
                Some((pair[1] - pair[0]) / denominator)
            }
        })
        .collect();

    let average = if rates.is_empty() {
        DEFAULT_GROWTH_RATE
    } else {
        sanitize(rates.iter().sum::<f64>() / rates.len() as f64)
    };

    GrowthRates { cagr, average }
}

fn sanitize(rate: f64) -> f64 {
    if rate.is_finite() {
        rate
    } else {
        DEFAULT_GROWTH_RATE
    }
}
