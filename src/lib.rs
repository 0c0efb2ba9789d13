//! # Option-Dash: Implied Volatility Dashboard Renderer
//!
//! `option-dash` loads a CSV of option records and renders filterable charts comparing
//! observed implied volatility (`impl_volatility`) with a model's forecast
//! (`predicted_iv`).
//!
//! A dashboard run is a stateless function of the loaded table and the current widget
//! values: every run re-filters the immutable table, recomputes every view and writes
//! the charts as SVG files.
//!
//! ## Views
//!
//! - **Aggregate time series**: daily mean actual vs. predicted IV, optionally
//!   restricted to puts or calls
//! - **Scatter comparison**: predicted vs. actual IV, one panel per option type
//! - **Per-strike time series**: up to 5 strikes, faceted by series
//! - **Fit metrics**: R², RMSE, MAE and bias of the predictions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use option_dash::{render_dashboard, DashboardConfig, OptionChoice, WidgetState};
//!
//! let config = DashboardConfig {
//!     data_path: "data/gru_data.csv".into(),
//!     ..DashboardConfig::default()
//! };
//! let widgets = WidgetState {
//!     option_choice: OptionChoice::Put,
//!     strikes: Some(vec![100.0, 125.0]),
//!     ..WidgetState::default()
//! };
//!
//! let report = render_dashboard(&config, &widgets)?;
//! println!("{}", report);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Input Format
//!
//! A header row with at least `date`, `strike_price`, `cp_flag` (`P`/`C`),
//! `impl_volatility` and `predicted_iv`. Empty volatility cells are treated as
//! missing values.

// ================================================================================================
// MODULES
// ================================================================================================

pub mod dashboard;
pub mod data;
pub mod filter;
pub mod render;
pub mod views;

// ================================================================================================
// IMPORTS
// ================================================================================================

use anyhow::{Context, Result};
use tracing::info;

// ================================================================================================
// PUBLIC RE-EXPORTS
// ================================================================================================

// Data model and loading
pub use data::{
    load_option_table, read_option_table, LoaderError, OptionRecord, OptionTable, OptionType,
    DEFAULT_DATA_PATH,
};

// Filter controls and the global filter stage
pub use filter::{
    apply_filters, DateRange, FilterBounds, FilterSelection, SelectionError, StrikeRange,
};

// Views
pub use views::{
    daily_means, fit_metrics, melt, DailyMean, FitMetrics, LongRecord, OptionChoice, Series,
    StrikeSelection, ViewPanel,
};

// Rendering
pub use render::{ChartRenderer, ChartSpec, SvgRenderer};

// Dashboard pipeline
pub use dashboard::{
    build_views, run_dashboard, ChartConfig, DashboardConfig, DashboardReport, Panel, Section,
    WidgetState,
};

// ================================================================================================
// DEFAULT CONFIGURATIONS
// ================================================================================================

/// Pre-configured dashboard settings.
///
/// - [`standard()`]: full-size charts, reads the default data path
/// - [`compact()`]: small charts for quick looks
pub mod default_configs {
    use crate::dashboard::{ChartConfig, DashboardConfig};

    /// Full-size 1280x720 charts.
    pub fn standard() -> DashboardConfig {
        DashboardConfig::default()
    }

    /// 640x400 charts with 240px facet rows.
    ///
    /// # Example
    ///
    /// ```rust
    /// use option_dash::default_configs;
    ///
    /// let config = default_configs::compact();
    /// assert_eq!(config.chart.width, 640);
    /// ```
    pub fn compact() -> DashboardConfig {
        DashboardConfig {
            chart: ChartConfig::compact(),
            ..DashboardConfig::default()
        }
    }
}

/// Load the configured CSV and render one dashboard run to SVG files.
///
/// # Arguments
///
/// * `config` - Data path, output directory, chart sizes and strike settings.
/// * `widgets` - Current widget values. Untouched widgets (`None`) take their
///   defaults: the full date and strike ranges, and the first
///   `config.max_strikes` strikes of the filtered table.
///
/// # Errors
///
/// * [`LoaderError`] if the file is missing, lacks a required column, or holds a
///   malformed row
/// * [`SelectionError`] if the table is empty or a selected range is inverted
/// * I/O errors from writing the charts
///
/// Empty view results are not errors; they appear as placeholders in the report.
pub fn render_dashboard(config: &DashboardConfig, widgets: &WidgetState) -> Result<DashboardReport> {
    let table = load_option_table(&config.data_path)
        .with_context(|| format!("failed to load {}", config.data_path.display()))?;

    let mut renderer = SvgRenderer::new(&config.output_dir, config.chart.clone())?;
    let report = run_dashboard(&table, widgets, config, &mut renderer)?;

    info!(
        charts = report.chart_paths().len(),
        output_dir = %config.output_dir.display(),
        "dashboard rendered"
    );
    Ok(report)
}
