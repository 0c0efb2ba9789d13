use chrono::NaiveDate;
use std::fmt;

/// Option type as encoded in the `cp_flag` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionType {
    Put,
    Call,
}

impl OptionType {
    /// Both tags, in the order the per-type panels are laid out.
    pub const ALL: [OptionType; 2] = [OptionType::Put, OptionType::Call];

    /// Parse a single-character tag (`"P"` / `"C"`).
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim() {
            "P" => Some(Self::Put),
            "C" => Some(Self::Call),
            _ => None,
        }
    }

    /// Single-character tag as stored in the CSV.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Put => "P",
            Self::Call => "C",
        }
    }

    /// Human-readable label used for tab/panel titles.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Put => "Put Options",
            Self::Call => "Call Options",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

/// One observation: a (date, strike, option type) row of the input CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRecord {
    /// Observation date
    pub date: NaiveDate,
    /// Strike price
    pub strike_price: f64,
    /// Put or call
    pub option_type: OptionType,
    /// Observed implied volatility (as decimal, e.g. 0.25 for 25%)
    pub impl_volatility: Option<f64>,
    /// Model-predicted implied volatility (as decimal)
    pub predicted_iv: Option<f64>,
}

/// Immutable table of option records.
///
/// Every transformation returns a new table; the loaded source is never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionTable {
    records: Vec<OptionRecord>,
}

impl OptionTable {
    pub fn new(records: Vec<OptionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OptionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionRecord> {
        self.records.iter()
    }

    /// Copy of the rows satisfying `predicate`, in original order.
    pub fn filter<F>(&self, predicate: F) -> OptionTable
    where
        F: Fn(&OptionRecord) -> bool,
    {
        OptionTable::new(self.records.iter().filter(|r| predicate(r)).cloned().collect())
    }

    /// Rows of a single option type.
    pub fn with_option_type(&self, option_type: OptionType) -> OptionTable {
        self.filter(|r| r.option_type == option_type)
    }

    /// Earliest and latest observation dates, or `None` for an empty table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Smallest and largest strike, or `None` for an empty table.
    pub fn strike_range(&self) -> Option<(f64, f64)> {
        if self.records.is_empty() {
            return None;
        }
        let min = self
            .records
            .iter()
            .map(|r| r.strike_price)
            .fold(f64::INFINITY, f64::min);
        let max = self
            .records
            .iter()
            .map(|r| r.strike_price)
            .fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }

    /// Sorted distinct strikes (exact numeric match, no rounding).
    pub fn unique_strikes(&self) -> Vec<f64> {
        let mut strikes: Vec<f64> = self.records.iter().map(|r| r.strike_price).collect();
        strikes.sort_by(|a, b| a.total_cmp(b));
        strikes.dedup();
        strikes
    }
}

impl FromIterator<OptionRecord> for OptionTable {
    fn from_iter<I: IntoIterator<Item = OptionRecord>>(iter: I) -> Self {
        OptionTable::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a OptionTable {
    type Item = &'a OptionRecord;
    type IntoIter = std::slice::Iter<'a, OptionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
