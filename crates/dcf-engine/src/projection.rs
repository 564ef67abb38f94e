/// Default explicit projection horizon, in years.
pub const DEFAULT_HORIZON_YEARS: usize = 5;

/// Project future FCF from the current value at a constant growth rate.
///
/// Positive cash flows compound multiplicatively. Negative cash flows follow
/// a different recurrence: growth shrinks the loss instead of amplifying it,
/// first by `(-current * growth) + current` and from then on by extrapolating
/// the period-over-period improvement, `(prev - prev_prev) * (1 + growth) +
/// prev`. This sign-dependent rule keeps projections directionally sane for
/// loss-making companies and must not be collapsed into a single geometric
/// series.
///
/// The output always has exactly `horizon` entries.
pub fn project_fcf(current_fcf: f64, growth_rate: f64, horizon: usize) -> Vec<f64> {
    let mut projection = Vec::with_capacity(horizon);

    for i in 0..horizon {
        let next = if i == 0 {
            if current_fcf > 0.0 {
                current_fcf * (1.0 + growth_rate)
            } else {
                (-current_fcf * growth_rate) + current_fcf
            }
        } else {
            let prev = projection[i - 1];
            let prev_prev = if i == 1 { current_fcf } else { projection[i - 2] };
            if prev > 0.0 {
                prev * (1.0 + growth_rate)
            } else {
                (prev - prev_prev) * (1.0 + growth_rate) + prev
            }
        };
        projection.push(next);
    }

    projection
}
