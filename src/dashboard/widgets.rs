use chrono::NaiveDate;
use serde::Deserialize;

use crate::filter::{DateRange, FilterBounds, FilterSelection, SelectionError, StrikeRange};
use crate::views::OptionChoice;

/// Current value of every dashboard widget.
///
/// `None` means "untouched": the widget shows its default (full date range,
/// full strike range, first strikes of the multi-select).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WidgetState {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub strike_min: Option<f64>,
    pub strike_max: Option<f64>,
    pub option_choice: OptionChoice,
    pub strikes: Option<Vec<f64>>,
}

impl WidgetState {
    /// Resolve the date picker and strike slider against the table bounds.
    ///
    /// A half-specified range takes the missing end from the bounds.
    pub fn selection(&self, bounds: &FilterBounds) -> Result<FilterSelection, SelectionError> {
        let dates = match (self.start_date, self.end_date) {
            (None, None) => None,
            (start, end) => Some(DateRange::new(
                start.unwrap_or(bounds.date_min),
                end.unwrap_or(bounds.date_max),
            )),
        };

        let strikes = match (self.strike_min, self.strike_max) {
            (None, None) => None,
            (min, max) => Some(StrikeRange::new(
                min.unwrap_or(bounds.strike_min as f64),
                max.unwrap_or(bounds.strike_max as f64),
            )),
        };

        bounds.resolve(dates, strikes)
    }
}
