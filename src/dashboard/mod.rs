//! One dashboard rerun: widget state in, rendered report out.

pub mod config;
pub mod pipeline;
pub mod report;
pub mod widgets;

pub use config::{ChartConfig, DashboardConfig};
pub use pipeline::{build_views, run_dashboard, DashboardViews};
pub use report::{DashboardReport, Panel, Section};
pub use widgets::WidgetState;
