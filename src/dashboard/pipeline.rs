use anyhow::Result;
use tracing::{debug, info};

use super::config::DashboardConfig;
use super::report::{
    DashboardReport, Panel, Section, METRICS_TITLE, SCATTER_TITLE, STRIKES_TITLE,
    TIME_SERIES_TITLE,
};
use super::widgets::WidgetState;
use crate::data::OptionTable;
use crate::filter::{apply_filters, FilterBounds, FilterSelection, SelectionError};
use crate::render::ChartRenderer;
use crate::views::{
    metrics_panels, scatter_panels, strike_panels, time_series_panel, StrikeSelection, ViewPanel,
};

/// All views computed for one widget state, before rendering.
#[derive(Debug, Clone)]
pub struct DashboardViews {
    pub bounds: FilterBounds,
    pub selection: FilterSelection,
    pub filtered: OptionTable,
    pub strikes: StrikeSelection,
    /// `(section title, panels)` in display order
    pub sections: Vec<(&'static str, Vec<ViewPanel>)>,
}

/// Compute every view from the raw table and the current widget values.
///
/// Pure: the table is only read, and nothing is drawn.
pub fn build_views(
    table: &OptionTable,
    widgets: &WidgetState,
    config: &DashboardConfig,
) -> Result<DashboardViews, SelectionError> {
    let bounds =
        FilterBounds::from_table(table, config.strike_step).ok_or(SelectionError::EmptyTable)?;
    let selection = widgets.selection(&bounds)?;
    let filtered = apply_filters(table, &selection);

    let strikes = StrikeSelection::resolve(
        &filtered,
        widgets.strikes.as_deref(),
        config.max_strikes,
    );
    debug!(
        available = strikes.available.len(),
        selected = strikes.selected.len(),
        "resolved strike selection"
    );

    let sections = vec![
        (
            TIME_SERIES_TITLE,
            vec![time_series_panel(&filtered, widgets.option_choice)],
        ),
        (SCATTER_TITLE, scatter_panels(&filtered)),
        (
            STRIKES_TITLE,
            strike_panels(&filtered, &strikes, config.max_strikes),
        ),
        (METRICS_TITLE, metrics_panels(&filtered)),
    ];

    Ok(DashboardViews {
        bounds,
        selection,
        filtered,
        strikes,
        sections,
    })
}

fn realize(panel: ViewPanel, renderer: &mut dyn ChartRenderer) -> Result<Panel> {
    Ok(match panel {
        ViewPanel::Chart { label, chart } => Panel::Chart {
            label,
            path: renderer.render(&chart)?,
        },
        ViewPanel::Placeholder { label, message } => Panel::Placeholder { label, message },
        ViewPanel::Warning(msg) => Panel::Warning(msg),
        ViewPanel::Text(msg) => Panel::Text(msg),
    })
}

/// One dashboard rerun: compute every view and render its charts.
pub fn run_dashboard(
    table: &OptionTable,
    widgets: &WidgetState,
    config: &DashboardConfig,
    renderer: &mut dyn ChartRenderer,
) -> Result<DashboardReport> {
    let views = build_views(table, widgets, config)?;
    info!(
        total_rows = table.len(),
        filtered_rows = views.filtered.len(),
        choice = %widgets.option_choice,
        "computed dashboard views"
    );

    renderer.begin_run()?;
    let mut sections = Vec::with_capacity(views.sections.len());
    for (title, panels) in views.sections {
        let panels = panels
            .into_iter()
            .map(|p| realize(p, renderer))
            .collect::<Result<Vec<_>>>()?;
        sections.push(Section {
            title: title.to_string(),
            panels,
        });
    }

    Ok(DashboardReport {
        bounds: views.bounds,
        selection: views.selection,
        available_strikes: views.strikes.available,
        total_rows: table.len(),
        filtered_rows: views.filtered.len(),
        sections,
    })
}
