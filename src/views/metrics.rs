//! Goodness-of-fit of `predicted_iv` against `impl_volatility`.
//!
//! Computed over rows carrying both values. R² follows the usual regression
//! score `1 - SS_res / SS_tot` and is undefined when the actual values have no
//! variance.

use statrs::statistics::Statistics;

use super::ViewPanel;
use crate::data::{OptionTable, OptionType};

#[derive(Debug, Clone, PartialEq)]
pub struct FitMetrics {
    /// Number of complete (actual, predicted) pairs
    pub count: usize,
    /// Coefficient of determination; `None` when actual IV is constant
    pub r2: Option<f64>,
    /// Root mean squared error
    pub rmse: f64,
    /// Mean absolute error
    pub mae: f64,
    /// Mean of `predicted - actual`
    pub bias: f64,
}

/// Fit statistics for one option type, or all rows when `option_type` is `None`.
pub fn fit_metrics(table: &OptionTable, option_type: Option<OptionType>) -> Option<FitMetrics> {
    let pairs: Vec<(f64, f64)> = table
        .iter()
        .filter(|r| option_type.map_or(true, |t| r.option_type == t))
        .filter_map(|r| Some((r.impl_volatility?, r.predicted_iv?)))
        .collect();

    if pairs.is_empty() {
        return None;
    }

    let actual: Vec<f64> = pairs.iter().map(|&(a, _)| a).collect();
    let errors: Vec<f64> = pairs.iter().map(|&(a, p)| p - a).collect();

    let actual_mean = actual.iter().mean();
    let ss_tot: f64 = actual.iter().map(|a| (a - actual_mean).powi(2)).sum();
    let ss_res: f64 = errors.iter().map(|e| e * e).sum();
    let n = pairs.len() as f64;

    Some(FitMetrics {
        count: pairs.len(),
        r2: (ss_tot > 0.0).then(|| 1.0 - ss_res / ss_tot),
        rmse: (ss_res / n).sqrt(),
        mae: errors.iter().map(|e| e.abs()).mean(),
        bias: errors.iter().mean(),
    })
}

fn describe(label: &str, metrics: Option<&FitMetrics>) -> String {
    match metrics {
        None => format!("{}: no complete observations", label),
        Some(m) => format!(
            "{}: n={} R²={} RMSE={:.4} MAE={:.4} bias={:+.4}",
            label,
            m.count,
            m.r2.map_or_else(|| "n/a".to_string(), |r| format!("{:.4}", r)),
            m.rmse,
            m.mae,
            m.bias
        ),
    }
}

/// Text panels for all rows, puts and calls.
pub fn metrics_panels(table: &OptionTable) -> Vec<ViewPanel> {
    let mut panels = vec![ViewPanel::Text(describe(
        "All",
        fit_metrics(table, None).as_ref(),
    ))];
    for option_type in OptionType::ALL {
        panels.push(ViewPanel::Text(describe(
            option_type.label(),
            fit_metrics(table, Some(option_type)).as_ref(),
        )));
    }
    panels
}
