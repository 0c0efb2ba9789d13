use std::fmt;
use std::path::PathBuf;

use crate::filter::{FilterBounds, FilterSelection};
use crate::views::strikes::format_strike;

pub const TIME_SERIES_TITLE: &str = "Time Series: actual vs Predicted Volatility";
pub const SCATTER_TITLE: &str = "Scatter: Predicted vs Actual";
pub const STRIKES_TITLE: &str = "Time Series by Strike Price";
pub const METRICS_TITLE: &str = "Fit Metrics";

/// A rendered output slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Chart { label: String, path: PathBuf },
    Placeholder { label: String, message: String },
    Warning(String),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: String,
    pub panels: Vec<Panel>,
}

impl Section {
    pub fn charts(&self) -> impl Iterator<Item = &PathBuf> {
        self.panels.iter().filter_map(|p| match p {
            Panel::Chart { path, .. } => Some(path),
            _ => None,
        })
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.panels.iter().filter_map(|p| match p {
            Panel::Warning(msg) => Some(msg.as_str()),
            _ => None,
        })
    }
}

/// Result of one dashboard rerun.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardReport {
    pub bounds: FilterBounds,
    pub selection: FilterSelection,
    /// Strikes offered by the multi-select after global filtering
    pub available_strikes: Vec<f64>,
    pub total_rows: usize,
    pub filtered_rows: usize,
    pub sections: Vec<Section>,
}

impl DashboardReport {
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Every chart written during the run, in section order.
    pub fn chart_paths(&self) -> Vec<&PathBuf> {
        self.sections.iter().flat_map(|s| s.charts()).collect()
    }
}

impl fmt::Display for DashboardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Option Volatility Analysis Dashboard")?;
        writeln!(
            f,
            "Filters: dates {} .. {}, strikes {} .. {} (step {})",
            self.selection.dates.start,
            self.selection.dates.end,
            format_strike(self.selection.strikes.min),
            format_strike(self.selection.strikes.max),
            self.bounds.strike_step
        )?;
        writeln!(f, "Rows: {} of {}", self.filtered_rows, self.total_rows)?;

        for section in &self.sections {
            writeln!(f)?;
            writeln!(f, "== {}", section.title)?;
            for panel in &section.panels {
                match panel {
                    Panel::Chart { label, path } => {
                        writeln!(f, "  [{}] {}", label, path.display())?
                    }
                    Panel::Placeholder { label, message } => {
                        writeln!(f, "  [{}] {}", label, message)?
                    }
                    Panel::Warning(msg) => writeln!(f, "  WARNING: {}", msg)?,
                    Panel::Text(msg) => writeln!(f, "  {}", msg)?,
                }
            }
        }
        Ok(())
    }
}
