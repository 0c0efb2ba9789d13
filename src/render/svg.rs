use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{debug, info};

use super::spec::{ChartSpec, FacetedLineChart, LineChart, LineSeries, ScatterChart};
use super::ChartRenderer;
use crate::dashboard::config::ChartConfig;
use crate::views::CHART_STEMS;

const REFERENCE_GREY: RGBColor = RGBColor(170, 170, 170);

/// Writes each chart as `<output_dir>/<stem>.svg`.
pub struct SvgRenderer {
    output_dir: PathBuf,
    config: ChartConfig,
}

impl SvgRenderer {
    /// Create the renderer, creating `output_dir` if needed.
    pub fn new<P: AsRef<Path>>(output_dir: P, config: ChartConfig) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("failed to create output directory {}", output_dir.display())
        })?;
        Ok(Self { output_dir, config })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

impl ChartRenderer for SvgRenderer {
    /// Remove charts left by a previous run so only this run's output remains.
    fn begin_run(&mut self) -> Result<()> {
        for stem in CHART_STEMS {
            let path = self.output_dir.join(format!("{}.svg", stem));
            match std::fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed stale chart"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("failed to remove {}", path.display()))
                }
            }
        }
        Ok(())
    }

    fn render(&mut self, chart: &ChartSpec) -> Result<PathBuf> {
        let path = self.output_dir.join(format!("{}.svg", chart.stem()));
        debug!(path = %path.display(), title = chart.title(), "rendering chart");

        match chart {
            ChartSpec::Line(c) => draw_line_chart(&path, c, &self.config),
            ChartSpec::Scatter(c) => draw_scatter_chart(&path, c, &self.config),
            ChartSpec::Faceted(c) => draw_faceted_chart(&path, c, &self.config),
        }
        .with_context(|| format!("failed to render {}", path.display()))?;

        info!(path = %path.display(), "chart written");
        Ok(path)
    }
}

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

fn day_number(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

fn format_day(x: &i32) -> String {
    NaiveDate::from_num_days_from_ce_opt(*x)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Date axis covering every point; a single date still gets a one-day span.
fn date_range<'a, I>(series: I) -> Range<i32>
where
    I: IntoIterator<Item = &'a LineSeries>,
{
    let days: Vec<i32> = series
        .into_iter()
        .flat_map(|s| s.points.iter().map(|(d, _)| day_number(*d)))
        .collect();
    match (days.iter().min(), days.iter().max()) {
        (Some(&lo), Some(&hi)) if lo < hi => lo..hi,
        (Some(&lo), Some(_)) => lo..lo + 1,
        _ => {
            let today = day_number(NaiveDate::default());
            today..today + 1
        }
    }
}

/// Value axis with 5% padding on both ends.
fn value_range<I: IntoIterator<Item = f64>>(values: I) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let span = hi - lo;
    let padding = if span > 0.0 { span * 0.05 } else { 0.05 };
    (lo - padding)..(hi + padding)
}

fn series_values<'a, I>(series: I) -> impl Iterator<Item = f64> + 'a
where
    I: IntoIterator<Item = &'a LineSeries> + 'a,
{
    series
        .into_iter()
        .flat_map(|s| s.points.iter().filter_map(|(_, v)| *v))
}

fn series_color(idx: usize) -> RGBAColor {
    Palette99::pick(idx).to_rgba()
}

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn draw_dated_lines(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    caption: &str,
    x_label: &str,
    y_label: &str,
    legend_title: &str,
    series: &[LineSeries],
    x_range: Range<i32>,
    y_range: Range<f64>,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .margin(20)
        .caption(caption, ("sans-serif", 24))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .x_label_formatter(&format_day)
        .draw()?;

    for (idx, s) in series.iter().enumerate() {
        let color = series_color(idx);
        let segments: Vec<Vec<(i32, f64)>> = s
            .segments()
            .into_iter()
            .map(|seg| seg.into_iter().map(|(d, v)| (day_number(d), v)).collect())
            .collect();

        // Isolated points have no line to show them
        let singles: Vec<(i32, f64)> = segments
            .iter()
            .filter(|seg| seg.len() == 1)
            .map(|seg| seg[0])
            .collect();
        chart.draw_series(singles.into_iter().map(|pt| Circle::new(pt, 2, color.filled())))?;

        chart
            .draw_series(
                segments
                    .into_iter()
                    .map(|seg| PathElement::new(seg, color.stroke_width(2))),
            )?
            .label(format!("{}={}", legend_title, s.name))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

fn draw_line_chart(path: &Path, chart: &LineChart, config: &ChartConfig) -> Result<()> {
    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = date_range(&chart.series);
    let y_range = value_range(series_values(&chart.series));
    draw_dated_lines(
        &root,
        &chart.title,
        &chart.x_label,
        &chart.y_label,
        &chart.legend_title,
        &chart.series,
        x_range,
        y_range,
    )?;

    root.present()?;
    Ok(())
}

fn draw_faceted_chart(path: &Path, chart: &FacetedLineChart, config: &ChartConfig) -> Result<()> {
    let rows = chart.facets.len().max(1);
    let height = config.facet_height * rows as u32 + 60;
    let root = SVGBackend::new(path, (config.width, height)).into_drawing_area();
    root.fill(&WHITE)?;
    let body = root.titled(&chart.title, ("sans-serif", 30))?;

    // Facets share both axes
    let x_range = date_range(chart.facets.iter().flat_map(|f| f.series.iter()));
    let y_range = value_range(series_values(chart.facets.iter().flat_map(|f| f.series.iter())));

    for (area, facet) in body.split_evenly((rows, 1)).iter().zip(&chart.facets) {
        draw_dated_lines(
            area,
            &facet.label,
            &chart.x_label,
            &chart.y_label,
            &chart.legend_title,
            &facet.series,
            x_range.clone(),
            y_range.clone(),
        )?;
    }

    root.present()?;
    Ok(())
}

fn draw_scatter_chart(path: &Path, chart: &ScatterChart, config: &ChartConfig) -> Result<()> {
    let root = SVGBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    // Same range on both axes so the y = x reference is a true diagonal
    let range = value_range(chart.points.iter().flat_map(|&(x, y)| [x, y]));

    let mut plot = ChartBuilder::on(&root)
        .margin(20)
        .caption(&chart.title, ("sans-serif", 30))
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(range.clone(), range.clone())?;

    plot.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()?;

    plot.draw_series(std::iter::once(PathElement::new(
        vec![(range.start, range.start), (range.end, range.end)],
        REFERENCE_GREY.stroke_width(1),
    )))?;

    plot.draw_series(
        chart
            .points
            .iter()
            .map(|&pt| Circle::new(pt, config.point_size, BLUE.filled())),
    )?;

    root.present()?;
    Ok(())
}
