//! Chart rendering.
//!
//! Views describe charts as [`ChartSpec`] values and never draw directly; a
//! [`ChartRenderer`] turns each spec into an artifact on disk.

pub mod spec;
pub mod svg;

use anyhow::Result;
use std::path::PathBuf;

pub use spec::{ChartSpec, Facet, FacetedLineChart, LineChart, LineSeries, ScatterChart};
pub use svg::SvgRenderer;

/// Output backend for chart specifications.
pub trait ChartRenderer {
    /// Called once before a dashboard run draws anything.
    fn begin_run(&mut self) -> Result<()> {
        Ok(())
    }

    /// Draw `chart` and return the path of the produced artifact.
    fn render(&mut self, chart: &ChartSpec) -> Result<PathBuf>;
}
