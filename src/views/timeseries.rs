use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Deserialize;
use statrs::statistics::Statistics;
use tracing::debug;

use super::ViewPanel;
use crate::data::{OptionTable, OptionType};
use crate::render::{ChartSpec, LineChart, LineSeries};

/// Option-type selector of the aggregate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionChoice {
    #[default]
    All,
    Put,
    Call,
}

impl OptionChoice {
    /// The tag to restrict to, or `None` for no extra filtering.
    pub fn option_type(&self) -> Option<OptionType> {
        match self {
            OptionChoice::All => None,
            OptionChoice::Put => Some(OptionType::Put),
            OptionChoice::Call => Some(OptionType::Call),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionChoice::All => "All",
            OptionChoice::Put => "Put",
            OptionChoice::Call => "Call",
        }
    }

    /// Apply the selector to an already globally filtered table.
    pub fn select(&self, table: &OptionTable) -> OptionTable {
        match self.option_type() {
            Some(option_type) => table.with_option_type(option_type),
            None => table.clone(),
        }
    }
}

impl fmt::Display for OptionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OptionChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(OptionChoice::All),
            "put" | "p" => Ok(OptionChoice::Put),
            "call" | "c" => Ok(OptionChoice::Call),
            other => Err(format!(
                "unknown option type '{}' (expected all, put or call)",
                other
            )),
        }
    }
}

/// Per-date means of the two volatility columns.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyMean {
    pub date: NaiveDate,
    /// `None` when every value on this date is missing
    pub impl_volatility: Option<f64>,
    pub predicted_iv: Option<f64>,
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

/// Group rows by date (ascending) and average both volatility columns.
///
/// Missing values are skipped; a date with no rows does not appear.
pub fn daily_means(table: &OptionTable) -> Vec<DailyMean> {
    let mut groups: BTreeMap<NaiveDate, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for record in table {
        let (actual, predicted) = groups.entry(record.date).or_default();
        actual.extend(record.impl_volatility);
        predicted.extend(record.predicted_iv);
    }

    groups
        .into_iter()
        .map(|(date, (actual, predicted))| DailyMean {
            date,
            impl_volatility: mean(&actual),
            predicted_iv: mean(&predicted),
        })
        .collect()
}

/// Dual-line chart of daily mean actual vs. predicted volatility.
pub fn time_series_panel(table: &OptionTable, choice: OptionChoice) -> ViewPanel {
    let selected = choice.select(table);
    let means = daily_means(&selected);
    debug!(choice = %choice, rows = selected.len(), dates = means.len(), "aggregated time series");

    let actual = means.iter().map(|m| (m.date, m.impl_volatility)).collect();
    let predicted = means.iter().map(|m| (m.date, m.predicted_iv)).collect();

    let chart = LineChart {
        stem: format!("timeseries_{}", choice.label().to_ascii_lowercase()),
        title: format!("Actual vs Predicted Volatility ({})", choice.label()),
        x_label: "Date".to_string(),
        y_label: "Volatility".to_string(),
        legend_title: "Series".to_string(),
        series: vec![
            LineSeries::new("impl_volatility", actual),
            LineSeries::new("predicted_iv", predicted),
        ],
    };

    ViewPanel::Chart {
        label: choice.label().to_string(),
        chart: ChartSpec::Line(chart),
    }
}
