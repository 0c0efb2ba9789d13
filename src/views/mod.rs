//! Dashboard views.
//!
//! Each view is a pure function of the filtered table (plus its own local
//! widget value) that returns [`ViewPanel`]s. Charts are returned as specs for
//! the renderer; empty results become placeholders, never chart specs.

pub mod metrics;
pub mod scatter;
pub mod strikes;
pub mod timeseries;

use crate::render::ChartSpec;

pub use metrics::{fit_metrics, metrics_panels, FitMetrics};
pub use scatter::{scatter_panels, scatter_points};
pub use strikes::{melt, strike_panels, LongRecord, Series, StrikeSelection};
pub use timeseries::{daily_means, time_series_panel, DailyMean, OptionChoice};

/// File stems of every chart the views can emit.
pub const CHART_STEMS: &[&str] = &[
    "timeseries_all",
    "timeseries_put",
    "timeseries_call",
    "scatter_p",
    "scatter_c",
    "strikes_p",
    "strikes_c",
];

/// One output slot of a view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewPanel {
    /// A chart to hand to the renderer.
    Chart { label: String, chart: ChartSpec },
    /// Shown instead of a chart when there is nothing to plot.
    Placeholder { label: String, message: String },
    /// Non-blocking warning; computation carries on.
    Warning(String),
    /// Plain informational text.
    Text(String),
}

impl ViewPanel {
    pub fn is_chart(&self) -> bool {
        matches!(self, ViewPanel::Chart { .. })
    }
}
