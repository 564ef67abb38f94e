use serde::{Deserialize, Serialize};

/// One pass/fail check of the value screen, with the display strings the
/// report layer shows verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterCheck {
    pub name: String,
    pub value: String,
    pub criterion: String,
    pub passed: bool,
}

/// Ratio inputs for the value screen. Every field is optional — a missing
/// input renders as "N/D" and fails its check.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScreenInputs {
    pub price: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub revenue_per_share: Option<f64>,
    pub book_value_per_share: Option<f64>,
    /// Return on equity as a fraction (0.12 = 12%).
    pub roe: Option<f64>,
    pub total_debt: Option<f64>,
    pub market_cap: Option<f64>,
    pub volume: Option<f64>,
    /// Year-over-year revenue growth as a fraction.
    pub revenue_growth: Option<f64>,
    pub ebitda: Option<f64>,
    pub interest_expense: Option<f64>,
    /// Margin of safety from the valuation result, as a fraction.
    pub safety_margin: Option<f64>,
}

/// Classic value-investing checklist over the supplied ratios.
pub fn value_screen(inputs: &ScreenInputs) -> Vec<FilterCheck> {
    let mut checks = Vec::with_capacity(9);

    let pe = inputs.pe_ratio.filter(|v| v.is_finite());
    checks.push(check("P/E", fmt_ratio(pe), "< 20", pe.map_or(false, |v| v <= 20.0)));

    let ps = ratio(inputs.price, inputs.revenue_per_share);
    checks.push(check("P/S", fmt_ratio(ps), "< 2", ps.map_or(false, |v| v <= 2.0)));

    let pb = ratio(inputs.price, inputs.book_value_per_share);
    checks.push(check("P/B", fmt_ratio(pb), "< 1", pb.map_or(false, |v| v <= 1.0)));

    let roe = inputs.roe.filter(|v| v.is_finite());
    checks.push(check("ROE", fmt_pct(roe), "> 10%", roe.map_or(false, |v| v > 0.10)));

    // Debt/Capital always renders: an unlevered company legitimately shows 0.00%.
    let debt = inputs.total_debt.unwrap_or(0.0);
    let capital = debt + inputs.market_cap.unwrap_or(0.0);
    let debt_to_capital = if capital != 0.0 { debt / capital } else { 0.0 };
    checks.push(check(
        "Debt/Capital",
        fmt_pct(Some(debt_to_capital)),
        "< 25%",
        debt_to_capital < 0.25,
    ));

    let volume = inputs.volume.filter(|v| v.is_finite() && *v != 0.0);
    checks.push(check(
        "Volume",
        volume.map_or("N/D".to_string(), |v| format!("{v:.0}")),
        "> 250k",
        volume.map_or(false, |v| v > 250_000.0),
    ));

    let revenue_growth = inputs.revenue_growth.filter(|v| v.is_finite());
    checks.push(check(
        "Revenue Growth",
        fmt_pct(revenue_growth),
        "> 0%",
        revenue_growth.map_or(false, |v| v > 0.0),
    ));

    let icr = ratio(inputs.ebitda.or(Some(0.0)), inputs.interest_expense);
    checks.push(check("ICR", fmt_ratio(icr), "> 2", icr.map_or(false, |v| v > 2.0)));

    let safety_margin = inputs.safety_margin.filter(|v| v.is_finite());
    checks.push(check(
        "Safety Margin",
        fmt_pct(safety_margin),
        "> 0%",
        safety_margin.map_or(false, |v| v > 0.0),
    ));

    checks
}

fn check(name: &str, value: String, criterion: &str, passed: bool) -> FilterCheck {
    FilterCheck {
        name: name.to_string(),
        value,
        criterion: criterion.to_string(),
        passed,
    }
}

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 && n.is_finite() && d.is_finite() => Some(n / d),
        _ => None,
    }
}

fn fmt_ratio(value: Option<f64>) -> String {
    value.map_or("N/D".to_string(), |v| format!("{v:.2}"))
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or("N/D".to_string(), |v| format!("{:.2}%", v * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs_fail_everything_except_debt_to_capital() {
        let checks = value_screen(&ScreenInputs::default());
        assert_eq!(checks.len(), 9);
        for check in &checks {
            if check.name == "Debt/Capital" {
                assert!(check.passed, "unlevered company should pass the debt check");
                assert_eq!(check.value, "0.00%");
            } else {
                assert!(!check.passed, "{} should fail without data", check.name);
            }
        }
    }

    #[test]
    fn test_missing_inputs_render_placeholder() {
        let checks = value_screen(&ScreenInputs::default());
        let pe = checks.iter().find(|c| c.name == "P/E").unwrap();
        assert_eq!(pe.value, "N/D");
        assert_eq!(pe.criterion, "< 20");
    }

    #[test]
    fn test_value_stock_passes_the_screen() {
        let inputs = ScreenInputs {
            price: Some(40.0),
            pe_ratio: Some(12.0),
            revenue_per_share: Some(30.0),
            book_value_per_share: Some(50.0),
            roe: Some(0.15),
            total_debt: Some(100.0e9),
            market_cap: Some(900.0e9),
            volume: Some(1_000_000.0),
            revenue_growth: Some(0.06),
            ebitda: Some(50.0e9),
            interest_expense: Some(5.0e9),
            safety_margin: Some(0.20),
        };
        let checks = value_screen(&inputs);
        assert!(checks.iter().all(|c| c.passed), "{checks:?}");
    }

    #[test]
    fn test_expensive_stock_fails_multiples() {
        let inputs = ScreenInputs {
            price: Some(300.0),
            pe_ratio: Some(45.0),
            revenue_per_share: Some(20.0),
            book_value_per_share: Some(10.0),
            ..Default::default()
        };
        let checks = value_screen(&inputs);
        let by_name = |name: &str| checks.iter().find(|c| c.name == name).unwrap();
        assert!(!by_name("P/E").passed);
        assert!(!by_name("P/S").passed);
        assert!(!by_name("P/B").passed);
        assert_eq!(by_name("P/S").value, "15.00");
    }

    #[test]
    fn test_levered_balance_sheet_fails_debt_check() {
        let inputs = ScreenInputs {
            total_debt: Some(400.0),
            market_cap: Some(600.0),
            ..Default::default()
        };
        let checks = value_screen(&inputs);
        let debt = checks.iter().find(|c| c.name == "Debt/Capital").unwrap();
        assert!(!debt.passed);
        assert_eq!(debt.value, "40.00%");
    }

    #[test]
    fn test_icr_needs_interest_expense() {
        let no_interest = value_screen(&ScreenInputs {
            ebitda: Some(10.0e9),
            ..Default::default()
        });
        assert!(!no_interest.iter().find(|c| c.name == "ICR").unwrap().passed);

        let covered = value_screen(&ScreenInputs {
            ebitda: Some(10.0e9),
            interest_expense: Some(1.0e9),
            ..Default::default()
        });
        let icr = covered.iter().find(|c| c.name == "ICR").unwrap();
        assert!(icr.passed);
        assert_eq!(icr.value, "10.00");
    }
}
