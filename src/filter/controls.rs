use chrono::NaiveDate;
use thiserror::Error;

use crate::data::OptionTable;

/// Default slider increment for the strike range control.
pub const DEFAULT_STRIKE_STEP: i64 = 25;

#[derive(Error, Debug, PartialEq)]
pub enum SelectionError {
    #[error("Cannot derive filter bounds from an empty table")]
    EmptyTable,

    #[error("Date range start {start} is after end {end}")]
    InvertedDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Strike range minimum {min} is above maximum {max}")]
    InvertedStrikeRange { min: f64, max: f64 },
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Inclusive strike range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeRange {
    pub min: f64,
    pub max: f64,
}

impl StrikeRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, strike: f64) -> bool {
        self.min <= strike && strike <= self.max
    }
}

/// The two ranges the global filter stage applies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterSelection {
    pub dates: DateRange,
    pub strikes: StrikeRange,
}

/// Widget bounds derived from the loaded table.
///
/// Strike bounds are whole numbers: the minimum is floored and the maximum
/// ceiled so that the default (full-range) selection keeps every row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterBounds {
    pub date_min: NaiveDate,
    pub date_max: NaiveDate,
    pub strike_min: i64,
    pub strike_max: i64,
    pub strike_step: i64,
}

impl FilterBounds {
    /// Derive control bounds; `None` when the table is empty.
    pub fn from_table(table: &OptionTable, strike_step: i64) -> Option<Self> {
        let (date_min, date_max) = table.date_range()?;
        let (strike_lo, strike_hi) = table.strike_range()?;
        Some(Self {
            date_min,
            date_max,
            strike_min: strike_lo.floor() as i64,
            strike_max: strike_hi.ceil() as i64,
            strike_step: strike_step.max(1),
        })
    }

    /// The selection a freshly rendered sidebar starts with.
    pub fn full_selection(&self) -> FilterSelection {
        FilterSelection {
            dates: DateRange::new(self.date_min, self.date_max),
            strikes: StrikeRange::new(self.strike_min as f64, self.strike_max as f64),
        }
    }

    /// Resolve user selections against the bounds.
    ///
    /// Missing selections default to the full range. Supplied ranges are kept
    /// exactly as requested, so a range outside the data filters to no rows.
    pub fn resolve(
        &self,
        dates: Option<DateRange>,
        strikes: Option<StrikeRange>,
    ) -> Result<FilterSelection, SelectionError> {
        let full = self.full_selection();

        let dates = match dates {
            None => full.dates,
            Some(range) if range.start > range.end => {
                return Err(SelectionError::InvertedDateRange {
                    start: range.start,
                    end: range.end,
                })
            }
            Some(range) => range,
        };

        let strikes = match strikes {
            None => full.strikes,
            Some(range) if range.min > range.max => {
                return Err(SelectionError::InvertedStrikeRange {
                    min: range.min,
                    max: range.max,
                })
            }
            Some(range) => range,
        };

        Ok(FilterSelection { dates, strikes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{OptionRecord, OptionType};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    fn table() -> OptionTable {
        [(3, 90.5), (1, 210.25), (7, 150.0)]
            .into_iter()
            .map(|(d, strike)| OptionRecord {
                date: day(d),
                strike_price: strike,
                option_type: OptionType::Call,
                impl_volatility: Some(0.2),
                predicted_iv: Some(0.2),
            })
            .collect()
    }

    #[test]
    fn test_bounds_cover_every_row() {
        let bounds = FilterBounds::from_table(&table(), DEFAULT_STRIKE_STEP).unwrap();
        assert_eq!(bounds.date_min, day(1));
        assert_eq!(bounds.date_max, day(7));
        assert_eq!(bounds.strike_min, 90);
        assert_eq!(bounds.strike_max, 211);
        assert_eq!(bounds.strike_step, 25);
    }

    #[test]
    fn test_empty_table_has_no_bounds() {
        assert!(FilterBounds::from_table(&OptionTable::default(), 25).is_none());
    }

    #[test]
    fn test_resolve_keeps_requested_ranges() {
        let bounds = FilterBounds::from_table(&table(), DEFAULT_STRIKE_STEP).unwrap();

        let sel = bounds
            .resolve(
                Some(DateRange::new(day(2), day(20))),
                Some(StrikeRange::new(140.0, 140.0)),
            )
            .unwrap();
        assert_eq!(sel.dates, DateRange::new(day(2), day(20)));
        assert_eq!(sel.strikes, StrikeRange::new(140.0, 140.0));

        let sel = bounds.resolve(None, None).unwrap();
        assert_eq!(sel, bounds.full_selection());
    }

    #[test]
    fn test_resolve_rejects_inverted() {
        let bounds = FilterBounds::from_table(&table(), DEFAULT_STRIKE_STEP).unwrap();

        let err = bounds
            .resolve(Some(DateRange::new(day(5), day(2))), None)
            .unwrap_err();
        assert!(matches!(err, SelectionError::InvertedDateRange { .. }));

        let err = bounds
            .resolve(None, Some(StrikeRange::new(200.0, 100.0)))
            .unwrap_err();
        assert!(matches!(err, SelectionError::InvertedStrikeRange { .. }));
    }
}
