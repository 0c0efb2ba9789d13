use chrono::NaiveDate;

/// A named line over dates. `None` values break the line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

impl LineSeries {
    pub fn new(name: impl Into<String>, points: Vec<(NaiveDate, Option<f64>)>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    /// Contiguous runs of present values, in point order.
    pub fn segments(&self) -> Vec<Vec<(NaiveDate, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for &(date, value) in &self.points {
            match value {
                Some(v) => current.push((date, v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub stem: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterChart {
    pub stem: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
}

/// One facet row of a faceted chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Facet {
    pub label: String,
    pub series: Vec<LineSeries>,
}

/// Line charts stacked vertically, sharing axes labels and legend.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetedLineChart {
    pub stem: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub legend_title: String,
    pub facets: Vec<Facet>,
}

/// Everything a renderer needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartSpec {
    Line(LineChart),
    Scatter(ScatterChart),
    Faceted(FacetedLineChart),
}

impl ChartSpec {
    /// File stem the chart is written under.
    pub fn stem(&self) -> &str {
        match self {
            ChartSpec::Line(c) => &c.stem,
            ChartSpec::Scatter(c) => &c.stem,
            ChartSpec::Faceted(c) => &c.stem,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Line(c) => &c.title,
            ChartSpec::Scatter(c) => &c.title,
            ChartSpec::Faceted(c) => &c.title,
        }
    }
}
