/// Default perpetuity growth behind the terminal value.
pub const DEFAULT_PERPETUITY_GROWTH: f64 = 0.02;

/// Minimum spread kept between the discount rate and the terminal growth.
pub const MIN_GROWTH_SPREAD: f64 = 0.005;

/// Present value of a projected FCF series plus its terminal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountedValue {
    /// PV of the explicit projection years.
    pub explicit_pv: f64,
    /// Terminal (perpetuity) value at the end of the horizon, undiscounted.
    pub terminal_value: f64,
    /// Terminal value discounted back to the present.
    pub terminal_pv: f64,
    /// Total enterprise present value.
    pub enterprise_value: f64,
}

/// Discount a projected series at `wacc` with a perpetuity tail.
///
/// Returns `None` whenever the valuation is mathematically undefined — empty
/// projection, non-positive WACC, terminal growth at or above the discount
/// rate, or a negative adjusted growth — signaling "no valuation" rather than
/// producing a misleading number. The terminal growth is clamped to
/// `wacc - `[`MIN_GROWTH_SPREAD`] so the perpetuity denominator never
/// collapses.
pub fn discount(projection: &[f64], wacc: f64, perpetuity_growth: f64) -> Option<DiscountedValue> {
    if projection.is_empty() || wacc <= 0.0 {
        return None;
    }

    let explicit_pv: f64 = projection
        .iter()
        .enumerate()
        .map(|(i, fcf)| fcf / (1.0 + wacc).powi(i as i32 + 1))
        .sum();

    if wacc <= perpetuity_growth {
        return None;
    }
    let adjusted_growth = perpetuity_growth.min(wacc - MIN_GROWTH_SPREAD);
    if adjusted_growth < 0.0 {
        return None;
    }

    let spread = wacc - adjusted_growth;
    if spread == 0.0 {
        return None;
    }

    let final_fcf = projection[projection.len() - 1];
    let terminal_value = final_fcf * (1.0 + adjusted_growth) / spread;
    let terminal_pv = terminal_value / (1.0 + wacc).powi(projection.len() as i32);

    Some(DiscountedValue {
        explicit_pv,
        terminal_value,
        terminal_pv,
        enterprise_value: explicit_pv + terminal_pv,
    })
}

/// Equity value: enterprise value less total debt.
pub fn equity_value(enterprise_value: f64, total_debt: f64) -> f64 {
    enterprise_value - total_debt
}

/// Per-share intrinsic value; `None` when shares outstanding are zero,
/// negative, or unknown.
pub fn per_share_value(equity_value: f64, shares_outstanding: Option<f64>) -> Option<f64> {
    match shares_outstanding {
        Some(shares) if shares > 0.0 => Some(equity_value / shares),
        _ => None,
    }
}
