use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use super::widgets::WidgetState;
use crate::data::DEFAULT_DATA_PATH;
use crate::filter::DEFAULT_STRIKE_STEP;

/// Chart canvas settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartConfig {
    /// Canvas width in pixels
    #[serde(default = "default_width")]
    pub width: u32,
    /// Canvas height in pixels for single charts
    #[serde(default = "default_height")]
    pub height: u32,
    /// Height of each facet row in faceted charts
    #[serde(default = "default_facet_height")]
    pub facet_height: u32,
    /// Marker radius for scatter points
    #[serde(default = "default_point_size")]
    pub point_size: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            facet_height: default_facet_height(),
            point_size: default_point_size(),
        }
    }
}

impl ChartConfig {
    /// Small canvases for quick looks and tests
    pub fn compact() -> Self {
        Self {
            width: 640,
            height: 400,
            facet_height: 240,
            point_size: 2,
        }
    }
}

/// Main configuration struct for a dashboard run.
///
/// Loaded from TOML; every field is optional. Dates in the `[widgets]` table
/// are quoted strings, e.g. `start_date = "2020-01-02"`.
///
/// ```toml
/// data_path = "data/gru_data.csv"
/// output_dir = "out"
///
/// [chart]
/// width = 1600
///
/// [widgets]
/// option_choice = "put"
/// strikes = [100.0, 125.0]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardConfig {
    /// Input CSV
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Directory the SVG charts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Strike slider increment
    #[serde(default = "default_strike_step")]
    pub strike_step: i64,

    /// Soft cap on the strike multi-select; also the default selection size
    #[serde(default = "default_max_strikes")]
    pub max_strikes: usize,

    #[serde(default)]
    pub chart: ChartConfig,

    /// Initial widget values
    #[serde(default)]
    pub widgets: WidgetState,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            output_dir: default_output_dir(),
            strike_step: default_strike_step(),
            max_strikes: default_max_strikes(),
            chart: ChartConfig::default(),
            widgets: WidgetState::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).context("invalid dashboard configuration")?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dashboard")
}

fn default_strike_step() -> i64 {
    DEFAULT_STRIKE_STEP
}

fn default_max_strikes() -> usize {
    5
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_facet_height() -> u32 {
    360
}

fn default_point_size() -> u32 {
    3
}
