use tracing::debug;

use super::ViewPanel;
use crate::data::{OptionTable, OptionType};
use crate::render::{ChartSpec, ScatterChart};

/// `(impl_volatility, predicted_iv)` for every row carrying both values.
pub fn scatter_points(table: &OptionTable) -> Vec<(f64, f64)> {
    table
        .iter()
        .filter_map(|r| Some((r.impl_volatility?, r.predicted_iv?)))
        .collect()
}

/// One predicted-vs-actual scatter per option type, puts first.
///
/// A tag with no rows yields a placeholder instead of a chart.
pub fn scatter_panels(table: &OptionTable) -> Vec<ViewPanel> {
    OptionType::ALL
        .iter()
        .map(|&option_type| {
            let subset = table.with_option_type(option_type);
            if subset.is_empty() {
                debug!(option_type = %option_type, "no rows for scatter panel");
                return ViewPanel::Placeholder {
                    label: option_type.label().to_string(),
                    message: format!("No data for {} options.", option_type.flag()),
                };
            }

            let points = scatter_points(&subset);
            debug!(option_type = %option_type, points = points.len(), "built scatter panel");
            ViewPanel::Chart {
                label: option_type.label().to_string(),
                chart: ChartSpec::Scatter(ScatterChart {
                    stem: format!("scatter_{}", option_type.flag().to_ascii_lowercase()),
                    title: format!("Predicted vs Actual IV ({})", option_type.label()),
                    x_label: "Actual IV".to_string(),
                    y_label: "Predicted IV".to_string(),
                    points,
                }),
            }
        })
        .collect()
}
