//! CSV loader for option-record files.
//!
//! The file must carry a header row with at least the columns listed in
//! [`REQUIRED_COLUMNS`]; extra columns are ignored. `date` accepts ISO dates,
//! ISO timestamps (time discarded), `MM/DD/YYYY` and `YYYYMMDD`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::types::{OptionRecord, OptionTable, OptionType};

/// Default location of the dashboard's input file.
pub const DEFAULT_DATA_PATH: &str = "/data/gru_data.csv";

/// Columns that must be present in the header row.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "date",
    "strike_price",
    "cp_flag",
    "impl_volatility",
    "predicted_iv",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y%m%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Malformed row at line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw CSV row before type conversion.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    strike_price: f64,
    cp_flag: String,
    impl_volatility: Option<f64>,
    predicted_iv: Option<f64>,
}

impl CsvRow {
    fn into_record(self, line: u64) -> Result<OptionRecord, LoaderError> {
        let date = parse_date(&self.date).ok_or_else(|| LoaderError::Malformed {
            line,
            message: format!("unparseable date '{}'", self.date),
        })?;
        let option_type =
            OptionType::from_flag(&self.cp_flag).ok_or_else(|| LoaderError::Malformed {
                line,
                message: format!("unknown cp_flag '{}' (expected P or C)", self.cp_flag),
            })?;

        Ok(OptionRecord {
            date,
            strike_price: self.strike_price,
            option_type,
            impl_volatility: self.impl_volatility.filter(|v| v.is_finite()),
            predicted_iv: self.predicted_iv.filter(|v| v.is_finite()),
        })
    }
}

/// Parse a calendar date, discarding any time-of-day component.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Load the option table from a CSV file.
pub fn load_option_table<P: AsRef<Path>>(path: P) -> Result<OptionTable, LoaderError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(LoaderError::FileNotFound(path.to_path_buf()));
    }

    let file = std::fs::File::open(path)?;
    let table = read_option_table(file)?;
    info!(path = %path.display(), rows = table.len(), "loaded option records");
    Ok(table)
}

/// Read option records from any CSV source.
pub fn read_option_table<R: std::io::Read>(source: R) -> Result<OptionTable, LoaderError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(LoaderError::MissingColumn((*column).to_string()));
        }
    }
    debug!(columns = headers.len(), "header validated");

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: CsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| LoaderError::Malformed {
                line,
                message: e.to_string(),
            })?;
        records.push(row.into_record(line)?);
    }

    Ok(OptionTable::new(records))
}
