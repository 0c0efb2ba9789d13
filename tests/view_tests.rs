
use option_dash::views::{scatter_panels, strike_panels, time_series_panel, CHART_STEMS};
use option_dash::{
    daily_means, melt, ChartSpec, OptionChoice, OptionTable, OptionType, Series,
    StrikeSelection, ViewPanel,
};
use test_utils::{load_fixture, record, ymd};

/// Two rows on one date with IVs 0.20 and 0.30 average to 0.25.
#[test]
fn test_daily_mean_of_two_rows() {
    let day = ymd(2020, 1, 2);
    let table = OptionTable::new(vec![
        record(day, 100.0, OptionType::Put, 0.20, 0.22),
        record(day, 125.0, OptionType::Call, 0.30, 0.26),
        record(ymd(2020, 1, 3), 100.0, OptionType::Put, 0.40, 0.40),
    ]);

    let means = daily_means(&table);
    assert_eq!(means.len(), 2);
    assert_eq!(means[0].date, day);
    assert!((means[0].impl_volatility.unwrap() - 0.25).abs() < 1e-12);
    assert!((means[0].predicted_iv.unwrap() - 0.24).abs() < 1e-12);
    assert!((means[1].impl_volatility.unwrap() - 0.40).abs() < 1e-12);
}

/// Missing values are skipped by the mean; dates without rows never appear.
#[test]
fn test_daily_means_on_fixture() {
    let table = load_fixture();
    let calls = OptionChoice::Call.select(&table);
    assert_eq!(calls.len(), 30);

    let means = daily_means(&calls);
    assert_eq!(means.len(), 5);
    assert!(means.windows(2).all(|w| w[0].date < w[1].date));
    assert!(!means.iter().any(|m| m.date == ymd(2020, 1, 4)));
    assert!(means.iter().all(|m| m.predicted_iv.is_some()));

    // 2020-01-06 calls: predicted_iv is missing for strike 225, so 5 values are averaged
    let jan6: Vec<f64> = calls
        .iter()
        .filter(|r| r.date == ymd(2020, 1, 6))
        .filter_map(|r| r.predicted_iv)
        .collect();
    assert_eq!(jan6.len(), 5);
    let expected = jan6.iter().sum::<f64>() / 5.0;
    let m = means.iter().find(|m| m.date == ymd(2020, 1, 6)).unwrap();
    assert!((m.predicted_iv.unwrap() - expected).abs() < 1e-12);
}

/// "All" applies no extra filter; Put/Call restrict to the matching tag.
#[test]
fn test_option_choice_selection() {
    let table = load_fixture();
    assert_eq!(OptionChoice::All.select(&table), table);
    assert!(OptionChoice::Put
        .select(&table)
        .iter()
        .all(|r| r.option_type == OptionType::Put));
    assert_eq!("call".parse::<OptionChoice>(), Ok(OptionChoice::Call));
    assert!("straddle".parse::<OptionChoice>().is_err());

    match time_series_panel(&table, OptionChoice::Put) {
        ViewPanel::Chart {
            chart: ChartSpec::Line(chart),
            ..
        } => {
            assert_eq!(chart.stem, "timeseries_put");
            assert_eq!(chart.series.len(), 2);
            assert_eq!(chart.series[0].name, "impl_volatility");
            assert_eq!(chart.series[1].name, "predicted_iv");
            assert_eq!(chart.series[0].points.len(), 5);
        }
        other => panic!("expected a line chart, got {:?}", other),
    }
}

/// A tag with no rows yields a placeholder, not a chart spec.
#[test]
fn test_scatter_placeholder_for_missing_tag() {
    let table = load_fixture().with_option_type(OptionType::Call);
    let panels = scatter_panels(&table);
    assert_eq!(panels.len(), 2);

    match &panels[0] {
        ViewPanel::Placeholder { label, message } => {
            assert_eq!(label, "Put Options");
            assert_eq!(message, "No data for P options.");
        }
        other => panic!("expected placeholder, got {:?}", other),
    }

    match &panels[1] {
        ViewPanel::Chart {
            chart: ChartSpec::Scatter(chart),
            ..
        } => {
            assert_eq!(chart.stem, "scatter_c");
            // Every observation is plotted except the one without a prediction
            assert_eq!(chart.points.len(), 29);
        }
        other => panic!("expected scatter chart, got {:?}", other),
    }
}

/// N rows melt into exactly 2N long rows, keys preserved.
#[test]
fn test_melt_doubles_rows() {
    let table = load_fixture();
    let long = melt(&table);
    assert_eq!(long.len(), 2 * table.len());

    let (actual, predicted) = long.split_at(table.len());
    for ((a, p), r) in actual.iter().zip(predicted).zip(table.iter()) {
        assert_eq!(a.series, Series::ImplVolatility);
        assert_eq!(p.series, Series::PredictedIv);
        for row in [a, p] {
            assert_eq!(row.date, r.date);
            assert_eq!(row.strike_price, r.strike_price);
            assert_eq!(row.option_type, r.option_type);
        }
        assert_eq!(a.value, r.impl_volatility);
        assert_eq!(p.value, r.predicted_iv);
    }
}

/// With no explicit choice the first five available strikes are selected.
#[test]
fn test_default_strike_selection() {
    let table = load_fixture();
    let selection = StrikeSelection::resolve(&table, None, 5);
    assert_eq!(selection.available, vec![100.0, 125.0, 150.0, 175.0, 200.0, 225.0]);
    assert_eq!(selection.selected, vec![100.0, 125.0, 150.0, 175.0, 200.0]);
    assert!(selection.unavailable.is_empty());
}

/// Six strikes trigger the warning, yet every strike is still plotted.
#[test]
fn test_over_selection_warns_without_truncating() {
    let table = load_fixture();
    let all = [100.0, 125.0, 150.0, 175.0, 200.0, 225.0];
    let selection = StrikeSelection::resolve(&table, Some(&all), 5);
    let panels = strike_panels(&table, &selection, 5);

    assert_eq!(
        panels[0],
        ViewPanel::Warning("Please select at most 5 strike prices.".to_string())
    );
    let charts: Vec<_> = panels
        .iter()
        .filter_map(|p| match p {
            ViewPanel::Chart {
                chart: ChartSpec::Faceted(c),
                ..
            } => Some(c),
            _ => None,
        })
        .collect();
    assert_eq!(charts.len(), 2);
    for chart in charts {
        assert_eq!(chart.facets.len(), 2);
        assert_eq!(chart.facets[0].label, "Series=impl_volatility");
        assert_eq!(chart.facets[1].label, "Series=predicted_iv");
        assert_eq!(chart.facets[0].series.len(), 6);
    }
}

/// An empty selection renders nothing extra.
#[test]
fn test_empty_strike_selection() {
    let table = load_fixture();
    let selection = StrikeSelection::resolve(&table, Some(&[]), 5);
    assert!(strike_panels(&table, &selection, 5).is_empty());
}

/// Strikes missing from the filtered data are reported; per-type placeholders when a tag is absent.
#[test]
fn test_strike_placeholders_and_unknown_strikes() {
    let table = load_fixture().with_option_type(OptionType::Put);
    let selection = StrikeSelection::resolve(&table, Some(&[150.0, 160.0]), 5);
    assert_eq!(selection.selected, vec![150.0]);
    assert_eq!(selection.unavailable, vec![160.0]);

    let panels = strike_panels(&table, &selection, 5);
    assert_eq!(panels.len(), 3);
    assert!(matches!(&panels[0], ViewPanel::Warning(msg) if msg.contains("160")));
    match &panels[1] {
        ViewPanel::Chart {
            label,
            chart: ChartSpec::Faceted(c),
        } => {
            assert_eq!(label, "Put Options");
            assert_eq!(c.stem, "strikes_p");
            assert_eq!(c.facets[0].series.len(), 1);
            assert_eq!(c.facets[0].series[0].name, "150");
            assert_eq!(c.facets[0].series[0].points.len(), 5);
        }
        other => panic!("expected faceted chart, got {:?}", other),
    }
    assert_eq!(
        panels[2],
        ViewPanel::Placeholder {
            label: "Call Options".to_string(),
            message: "No C option data for selected strikes.".to_string(),
        }
    );
}

/// Every chart a view can emit is named in the stem list the renderer cleans up.
#[test]
fn test_chart_stems_are_listed() {
    let table = load_fixture();
    let selection = StrikeSelection::resolve(&table, None, 5);

    let mut panels: Vec<ViewPanel> = [OptionChoice::All, OptionChoice::Put, OptionChoice::Call]
        .into_iter()
        .map(|choice| time_series_panel(&table, choice))
        .collect();
    panels.extend(scatter_panels(&table));
    panels.extend(strike_panels(&table, &selection, 5));

    let stems: Vec<&str> = panels
        .iter()
        .filter_map(|p| match p {
            ViewPanel::Chart { chart, .. } => Some(chart.stem()),
            _ => None,
        })
        .collect();
    assert_eq!(stems.len(), CHART_STEMS.len());
    for stem in stems {
        assert!(CHART_STEMS.contains(&stem), "{} missing from CHART_STEMS", stem);
    }
}
