use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, warn};

use super::ViewPanel;
use crate::data::{OptionRecord, OptionTable, OptionType};
use crate::render::{ChartSpec, Facet, FacetedLineChart, LineSeries};

/// Which value column a long-form row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    ImplVolatility,
    PredictedIv,
}

impl Series {
    pub const ALL: [Series; 2] = [Series::ImplVolatility, Series::PredictedIv];

    /// Source column name, used as the series label.
    pub fn column(&self) -> &'static str {
        match self {
            Series::ImplVolatility => "impl_volatility",
            Series::PredictedIv => "predicted_iv",
        }
    }

    fn value(&self, record: &OptionRecord) -> Option<f64> {
        match self {
            Series::ImplVolatility => record.impl_volatility,
            Series::PredictedIv => record.predicted_iv,
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A long-form row: one value column of one option record.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub date: NaiveDate,
    pub strike_price: f64,
    pub option_type: OptionType,
    pub series: Series,
    pub value: Option<f64>,
}

/// Stack the two volatility columns into a single value column.
///
/// Output has exactly `2 * table.len()` rows: every `impl_volatility` row in
/// table order, followed by every `predicted_iv` row.
pub fn melt(table: &OptionTable) -> Vec<LongRecord> {
    Series::ALL
        .iter()
        .flat_map(|&series| {
            table.iter().map(move |r| LongRecord {
                date: r.date,
                strike_price: r.strike_price,
                option_type: r.option_type,
                series,
                value: series.value(r),
            })
        })
        .collect()
}

/// Strikes chosen in the multi-select, resolved against what the filtered
/// table offers.
#[derive(Debug, Clone, PartialEq)]
pub struct StrikeSelection {
    /// Sorted distinct strikes of the filtered table
    pub available: Vec<f64>,
    /// Requested strikes present in `available`, in request order
    pub selected: Vec<f64>,
    /// Requested strikes the filtered table does not contain
    pub unavailable: Vec<f64>,
}

impl StrikeSelection {
    /// With no request, the first `default_count` available strikes are selected.
    pub fn resolve(table: &OptionTable, requested: Option<&[f64]>, default_count: usize) -> Self {
        let available = table.unique_strikes();
        let mut selected: Vec<f64> = Vec::new();
        let mut unavailable = Vec::new();

        match requested {
            None => selected.extend(available.iter().take(default_count)),
            Some(strikes) => {
                for &strike in strikes {
                    if selected.contains(&strike) || unavailable.contains(&strike) {
                        continue;
                    }
                    if available.contains(&strike) {
                        selected.push(strike);
                    } else {
                        unavailable.push(strike);
                    }
                }
            }
        }

        Self {
            available,
            selected,
            unavailable,
        }
    }
}

/// Strike label without a trailing `.0` for whole numbers.
pub fn format_strike(strike: f64) -> String {
    if strike.fract() == 0.0 {
        format!("{:.0}", strike)
    } else {
        format!("{}", strike)
    }
}

fn facet_series(rows: &[&LongRecord], series: Series, strikes: &[f64]) -> Vec<LineSeries> {
    strikes
        .iter()
        .filter_map(|&strike| {
            let mut points: Vec<(NaiveDate, Option<f64>)> = rows
                .iter()
                .filter(|r| r.series == series && r.strike_price == strike)
                .map(|r| (r.date, r.value))
                .collect();
            if points.is_empty() {
                return None;
            }
            points.sort_by_key(|(date, _)| *date);
            Some(LineSeries::new(format_strike(strike), points))
        })
        .collect()
}

/// Per-strike time series, one faceted chart per option type.
///
/// Selecting more than `max_strikes` adds a warning but every selected strike
/// is still plotted. An empty selection produces no panels.
pub fn strike_panels(
    table: &OptionTable,
    selection: &StrikeSelection,
    max_strikes: usize,
) -> Vec<ViewPanel> {
    let mut panels = Vec::new();

    for &strike in &selection.unavailable {
        warn!(strike, "requested strike not present in filtered data");
        panels.push(ViewPanel::Warning(format!(
            "Strike {} is not available in the filtered data.",
            format_strike(strike)
        )));
    }

    if selection.selected.is_empty() {
        return panels;
    }

    if selection.selected.len() > max_strikes {
        warn!(
            selected = selection.selected.len(),
            max_strikes, "strike selection exceeds soft cap"
        );
        panels.push(ViewPanel::Warning(format!(
            "Please select at most {} strike prices.",
            max_strikes
        )));
    }

    let mut strikes = selection.selected.clone();
    strikes.sort_by(|a, b| a.total_cmp(b));

    let subset = table.filter(|r| strikes.contains(&r.strike_price));
    let long = melt(&subset);
    debug!(rows = subset.len(), long_rows = long.len(), "reshaped strike selection");

    for option_type in OptionType::ALL {
        let rows: Vec<&LongRecord> = long
            .iter()
            .filter(|r| r.option_type == option_type)
            .collect();

        if rows.is_empty() {
            panels.push(ViewPanel::Placeholder {
                label: option_type.label().to_string(),
                message: format!(
                    "No {} option data for selected strikes.",
                    option_type.flag()
                ),
            });
            continue;
        }

        let facets = Series::ALL
            .iter()
            .map(|&series| Facet {
                label: format!("Series={}", series.column()),
                series: facet_series(&rows, series, &strikes),
            })
            .collect();

        panels.push(ViewPanel::Chart {
            label: option_type.label().to_string(),
            chart: ChartSpec::Faceted(FacetedLineChart {
                stem: format!("strikes_{}", option_type.flag().to_ascii_lowercase()),
                title: format!("IV by Strike ({})", option_type.label()),
                x_label: "Date".to_string(),
                y_label: "IV".to_string(),
                legend_title: "Strike".to_string(),
                facets,
            }),
        });
    }

    panels
}
