//! Option volatility dashboard
//!
//! # Usage
//!
//! ```bash
//! # Render every chart with default widget values
//! option-dash render --data /data/gru_data.csv --output dashboard
//!
//! # Narrow the filters and pick strikes
//! option-dash render --start 2020-01-02 --end 2020-03-31 \
//!     --strike-min 100 --strike-max 300 --option-type put --strikes 150,175,200
//!
//! # Show the widget bounds and the strikes on offer
//! option-dash inspect --data /data/gru_data.csv
//!
//! # Start from a TOML config; flags override it
//! option-dash --config dashboard.toml render
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use option_dash::filter::FilterBounds;
use option_dash::views::strikes::format_strike;
use option_dash::{
    apply_filters, load_option_table, render_dashboard, DashboardConfig, OptionChoice,
    OptionType,
};

#[derive(Parser)]
#[command(name = "option-dash")]
#[command(about = "Render actual vs. predicted implied volatility charts from a CSV")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render every view for one set of widget values
    Render {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output directory for SVG charts
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Option type for the aggregate time series (all, put, call)
        #[arg(long)]
        option_type: Option<OptionChoice>,

        /// Strikes for the per-strike view, comma separated
        #[arg(long, value_delimiter = ',')]
        strikes: Option<Vec<f64>>,
    },

    /// Print filter bounds and the strikes available after filtering
    Inspect {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Input CSV
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// First date of the range (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    start: Option<NaiveDate>,

    /// Last date of the range (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date_arg)]
    end: Option<NaiveDate>,

    /// Lower strike bound
    #[arg(long)]
    strike_min: Option<f64>,

    /// Upper strike bound
    #[arg(long)]
    strike_max: Option<f64>,
}

impl FilterArgs {
    fn apply(&self, config: &mut DashboardConfig) {
        if let Some(data) = &self.data {
            config.data_path = data.clone();
        }
        let widgets = &mut config.widgets;
        widgets.start_date = self.start.or(widgets.start_date);
        widgets.end_date = self.end.or(widgets.end_date);
        widgets.strike_min = self.strike_min.or(widgets.strike_min);
        widgets.strike_max = self.strike_max.or(widgets.strike_max);
    }
}

fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{}': {}", s, e))
}

const DEFAULT_LOG_FILTER: &str = "option_dash=info";

/// `RUST_LOG` when set and valid, otherwise info for this crate.
fn log_filter(env: Option<String>) -> EnvFilter {
    env.filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn cmd_inspect(config: &DashboardConfig) -> Result<()> {
    let table = load_option_table(&config.data_path)
        .with_context(|| format!("failed to load {}", config.data_path.display()))?;
    let bounds = FilterBounds::from_table(&table, config.strike_step)
        .context("the data file contains no rows")?;
    let selection = config.widgets.selection(&bounds)?;
    let filtered = apply_filters(&table, &selection);

    println!("Data: {} ({} rows)", config.data_path.display(), table.len());
    println!("Date range:   {} .. {}", bounds.date_min, bounds.date_max);
    println!(
        "Strike range: {} .. {} (step {})",
        bounds.strike_min, bounds.strike_max, bounds.strike_step
    );
    println!();
    println!(
        "Selected: dates {} .. {}, strikes {} .. {}",
        selection.dates.start,
        selection.dates.end,
        format_strike(selection.strikes.min),
        format_strike(selection.strikes.max)
    );
    println!("Rows after filtering: {}", filtered.len());
    for option_type in OptionType::ALL {
        println!(
            "  {}: {}",
            option_type.label(),
            filtered.with_option_type(option_type).len()
        );
    }

    let strikes: Vec<String> = filtered
        .unique_strikes()
        .into_iter()
        .map(format_strike)
        .collect();
    println!("Available strikes ({}): {}", strikes.len(), strikes.join(", "));
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::from_file(path)?,
        None => DashboardConfig::default(),
    };

    match cli.command {
        Commands::Render {
            filters,
            output,
            option_type,
            strikes,
        } => {
            filters.apply(&mut config);
            if let Some(output) = output {
                config.output_dir = output;
            }
            if let Some(choice) = option_type {
                config.widgets.option_choice = choice;
            }
            if strikes.is_some() {
                config.widgets.strikes = strikes;
            }

            let report = render_dashboard(&config, &config.widgets)?;
            print!("{}", report);
        }
        Commands::Inspect { filters } => {
            filters.apply(&mut config);
            cmd_inspect(&config)?;
        }
    }

    Ok(())
}
