
use option_dash::dashboard::report::{METRICS_TITLE, SCATTER_TITLE, STRIKES_TITLE, TIME_SERIES_TITLE};
use option_dash::{
    default_configs, render_dashboard, run_dashboard, DashboardConfig, LoaderError, OptionChoice,
    OptionTable, OptionType, Panel, SelectionError, SvgRenderer, WidgetState,
};
use test_utils::{load_fixture, ymd, RecordingRenderer, FIXTURE_PATH};

/// Full rerun with default widgets: every section present, five charts drawn.
#[test]
fn test_default_run() {
    let table = load_fixture();
    let config = DashboardConfig::default();
    let mut renderer = RecordingRenderer::default();

    let report = run_dashboard(&table, &WidgetState::default(), &config, &mut renderer)
        .expect("dashboard run failed");

    let titles: Vec<&str> = report.sections.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![TIME_SERIES_TITLE, SCATTER_TITLE, STRIKES_TITLE, METRICS_TITLE]
    );
    assert_eq!(
        renderer.stems(),
        vec!["timeseries_all", "scatter_p", "scatter_c", "strikes_p", "strikes_c"]
    );
    assert_eq!(report.total_rows, 60);
    assert_eq!(report.filtered_rows, 60);
    assert_eq!(report.available_strikes.len(), 6);

    let metrics = report.section(METRICS_TITLE).unwrap();
    assert_eq!(metrics.panels.len(), 3);
    assert!(metrics.warnings().next().is_none());
}

/// An option type with no rows never reaches the renderer.
#[test]
fn test_placeholder_skips_renderer() {
    let table: OptionTable = load_fixture().with_option_type(OptionType::Call);
    let widgets = WidgetState {
        option_choice: OptionChoice::Put,
        ..WidgetState::default()
    };
    let mut renderer = RecordingRenderer::default();

    let report =
        run_dashboard(&table, &widgets, &DashboardConfig::default(), &mut renderer).unwrap();

    let stems = renderer.stems();
    assert!(!stems.contains(&"scatter_p"));
    assert!(!stems.contains(&"strikes_p"));
    assert!(stems.contains(&"scatter_c"));
    // The aggregate chart is still drawn, just without data points
    assert!(stems.contains(&"timeseries_put"));

    let scatter = report.section(SCATTER_TITLE).unwrap();
    assert_eq!(
        scatter.panels[0],
        Panel::Placeholder {
            label: "Put Options".to_string(),
            message: "No data for P options.".to_string(),
        }
    );
}

/// Six strikes: warning in the report, computation proceeds.
#[test]
fn test_over_selection_in_report() {
    let table = load_fixture();
    let widgets = WidgetState {
        strikes: Some(vec![100.0, 125.0, 150.0, 175.0, 200.0, 225.0]),
        ..WidgetState::default()
    };
    let mut renderer = RecordingRenderer::default();
    let report =
        run_dashboard(&table, &widgets, &DashboardConfig::default(), &mut renderer).unwrap();

    let strikes = report.section(STRIKES_TITLE).unwrap();
    let warnings: Vec<&str> = strikes.warnings().collect();
    assert_eq!(warnings, vec!["Please select at most 5 strike prices."]);
    assert_eq!(strikes.charts().count(), 2);

    let text = report.to_string();
    assert!(text.contains("WARNING: Please select at most 5 strike prices."));
    assert!(text.contains("== Fit Metrics"));
}

/// Narrowed filters flow into every view.
#[test]
fn test_filters_shared_by_views() {
    let table = load_fixture();
    let widgets = WidgetState {
        start_date: Some(ymd(2020, 1, 7)),
        strike_min: Some(200.0),
        strikes: Some(vec![]),
        ..WidgetState::default()
    };
    let mut renderer = RecordingRenderer::default();
    let report =
        run_dashboard(&table, &widgets, &DashboardConfig::default(), &mut renderer).unwrap();

    // 2 dates x strikes {200, 225} x 2 types
    assert_eq!(report.filtered_rows, 8);
    assert_eq!(report.available_strikes, vec![200.0, 225.0]);
    assert!(report.section(STRIKES_TITLE).unwrap().panels.is_empty());
    assert_eq!(renderer.stems(), vec!["timeseries_all", "scatter_p", "scatter_c"]);
}

/// Empty tables and inverted ranges are selection errors.
#[test]
fn test_selection_errors() {
    let mut renderer = RecordingRenderer::default();
    let config = DashboardConfig::default();

    let err = run_dashboard(&OptionTable::default(), &WidgetState::default(), &config, &mut renderer)
        .unwrap_err();
    assert_eq!(
        err.downcast_ref::<SelectionError>(),
        Some(&SelectionError::EmptyTable)
    );

    let widgets = WidgetState {
        strike_min: Some(200.0),
        strike_max: Some(100.0),
        ..WidgetState::default()
    };
    let err = run_dashboard(&load_fixture(), &widgets, &config, &mut renderer).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SelectionError>(),
        Some(SelectionError::InvertedStrikeRange { .. })
    ));
    assert!(renderer.charts.is_empty());
}

/// End to end: the SVG renderer writes one file per chart.
#[test]
fn test_render_dashboard_writes_svg() {
    let out = tempfile::tempdir().expect("tempdir");
    let config = DashboardConfig {
        data_path: FIXTURE_PATH.into(),
        output_dir: out.path().join("charts"),
        ..default_configs::compact()
    };

    let report = render_dashboard(&config, &WidgetState::default()).expect("render failed");
    let paths = report.chart_paths();
    assert_eq!(paths.len(), 5);
    for path in paths {
        assert!(path.starts_with(out.path()));
        let svg = std::fs::read_to_string(path).expect("chart file missing");
        assert!(svg.contains("<svg"), "{} is not an SVG", path.display());
    }
}

/// A standalone renderer draws a chart spec straight to disk.
#[test]
fn test_svg_renderer_direct() {
    use option_dash::ChartRenderer;

    let out = tempfile::tempdir().expect("tempdir");
    let table = load_fixture();
    let mut renderer =
        SvgRenderer::new(out.path(), default_configs::compact().chart).expect("renderer");

    let panel = option_dash::views::time_series_panel(&table, OptionChoice::All);
    let option_dash::ViewPanel::Chart { chart, .. } = panel else {
        panic!("expected chart");
    };
    let path = renderer.render(&chart).unwrap();
    assert_eq!(renderer.output_dir(), out.path());
    assert_eq!(path, out.path().join("timeseries_all.svg"));
    assert!(path.exists());
}

/// A missing data file surfaces as a typed loader error.
#[test]
fn test_missing_data_file() {
    let out = tempfile::tempdir().expect("tempdir");
    let config = DashboardConfig {
        data_path: "tests/data/does_not_exist.csv".into(),
        output_dir: out.path().to_path_buf(),
        ..DashboardConfig::default()
    };
    let err = render_dashboard(&config, &WidgetState::default()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LoaderError>(),
        Some(LoaderError::FileNotFound(_))
    ));
}

fn svg_files(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("read output dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".svg"))
        .collect();
    names.sort();
    names
}

/// A rerun into the same directory leaves only that run's charts behind.
#[test]
fn test_rerun_removes_previous_charts() {
    let out = tempfile::tempdir().expect("tempdir");
    let config = DashboardConfig {
        data_path: FIXTURE_PATH.into(),
        output_dir: out.path().to_path_buf(),
        ..default_configs::compact()
    };
    // Files the dashboard did not write are left alone
    std::fs::write(out.path().join("notes.svg"), "<svg/>").unwrap();

    render_dashboard(&config, &WidgetState::default()).unwrap();
    assert_eq!(svg_files(out.path()).len(), 6);

    let widgets = WidgetState {
        strikes: Some(vec![]),
        ..WidgetState::default()
    };
    let report = render_dashboard(&config, &widgets).unwrap();
    assert_eq!(report.chart_paths().len(), 3);
    assert_eq!(
        svg_files(out.path()),
        vec!["notes.svg", "scatter_c.svg", "scatter_p.svg", "timeseries_all.svg"]
    );
}

/// A date range after the data yields an empty table and placeholders everywhere.
#[test]
fn test_out_of_range_dates_render_placeholders() {
    let table = load_fixture();
    let widgets = WidgetState {
        start_date: Some(ymd(2021, 1, 1)),
        end_date: Some(ymd(2021, 12, 31)),
        ..WidgetState::default()
    };
    let mut renderer = RecordingRenderer::default();
    let report =
        run_dashboard(&table, &widgets, &DashboardConfig::default(), &mut renderer).unwrap();

    assert_eq!(report.filtered_rows, 0);
    assert!(report.available_strikes.is_empty());
    assert_eq!(renderer.stems(), vec!["timeseries_all"]);

    let scatter = report.section(SCATTER_TITLE).unwrap();
    assert!(scatter
        .panels
        .iter()
        .all(|p| matches!(p, Panel::Placeholder { .. })));
    assert!(report.section(STRIKES_TITLE).unwrap().panels.is_empty());
}
