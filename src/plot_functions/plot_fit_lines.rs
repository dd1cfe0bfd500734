// src/plot_functions/plot_fit_lines.rs

use std::path::{Path, PathBuf};

use log::info;
use ndarray_stats::QuantileExt;

use crate::constants::{
    COLOR_FIT_LINE, COLOR_MEASURED, FIT_LINE_SAMPLES, LINE_WIDTH_FIT, LINE_WIDTH_PLOT,
};
use crate::error::KcResult;
use crate::pipeline::ResultSet;
use crate::plot_framework::{calculate_range, draw_side_by_side_plot, fit_label, PlotConfig, PlotSeries};
use crate::side_names::Side;
use crate::test_definition::{SidePair, TableVariant};

/// Evenly spaced samples of `[low, high]`, both ends included.
pub fn linspace(low: f64, high: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![low],
        _ => {
            let step = (high - low) / (count - 1) as f64;
            (0..count).map(|i| low + step * i as f64).collect()
        }
    }
}

fn side_plot_config(result: &ResultSet, pair: &SidePair, side: Side) -> Result<PlotConfig, String> {
    let definition = &result.definition;
    let table = result.table_for(pair);
    let independent = definition.independent_axis.channel(side);
    let dependent = pair.dependent(side);

    let x = table.column(independent).map_err(|e| e.to_string())?;
    let y = table.column(dependent).map_err(|e| e.to_string())?;
    let (x_min, x_max) = match (x.min(), x.max()) {
        (Ok(min), Ok(max)) => (*min, *max),
        _ => return Err("No data points".to_string()),
    };
    let (mut y_min, mut y_max) = match (y.min(), y.max()) {
        (Ok(min), Ok(max)) => (*min, *max),
        _ => return Err("No data points".to_string()),
    };

    let mut series = vec![PlotSeries {
        data: x.iter().cloned().zip(y.iter().cloned()).collect(),
        label: format!("{} {}", pair.parameter.replace('_', " "), side.name()),
        color: *COLOR_MEASURED,
        stroke_width: LINE_WIDTH_PLOT,
        markers: true,
    }];

    let parameter_name = definition.parameter_name(pair, side);
    match result.regression(&parameter_name).map(|r| &r.fit) {
        Some(Ok(fit)) => {
            let window = definition.window;
            let line: Vec<(f64, f64)> = linspace(window.low, window.high, FIT_LINE_SAMPLES)
                .into_iter()
                .map(|xv| (xv, fit.predict(xv)))
                .collect();
            for &(_, yv) in &line {
                y_min = y_min.min(yv);
                y_max = y_max.max(yv);
            }
            series.push(PlotSeries {
                data: line,
                label: fit_label(fit.slope, fit.intercept),
                color: *COLOR_FIT_LINE,
                stroke_width: LINE_WIDTH_FIT,
                markers: false,
            });
        }
        Some(Err(e)) => info!("  {}: no fit line, {}", parameter_name, e),
        None => {}
    }

    let (x_lo, x_hi) = calculate_range(x_min, x_max);
    let (y_lo, y_hi) = calculate_range(y_min, y_max);
    let variant = match pair.table {
        TableVariant::Raw => "",
        TableVariant::Offset => " (offset)",
    };

    Ok(PlotConfig {
        title: format!("{} [{}]. {}", pair.parameter.replace('_', " "), pair.unit, side.name()),
        x_range: x_lo..x_hi,
        y_range: y_lo..y_hi,
        series,
        x_label: format!("{}{}", definition.independent_axis.label, variant),
        y_label: format!("{}{}", pair.label, variant),
        shaded_x_range: Some(definition.window.low..definition.window.high),
    })
}

/// Renders one PNG per side pair: measured curve and fitted line, left and right wheel.
pub fn plot_fit_lines(result: &ResultSet, root_name: &str, output_dir: &Path) -> KcResult<Vec<PathBuf>> {
    let definition = &result.definition;
    let mut written = Vec::new();

    for pair in &definition.side_pairs {
        let output_path = output_dir.join(format!(
            "{}_{}_{}.png",
            root_name,
            definition.protocol.key(),
            pair.parameter
        ));
        let title = format!("{} - {} - {}", root_name, definition.title, pair.parameter.replace('_', " "));
        draw_side_by_side_plot(&output_path, &title, pair.parameter, |side| {
            side_plot_config(result, pair, side)
        })?;
        written.push(output_path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{STEP_BLOCK_CLOSE, STEP_BLOCK_OPEN};
    use crate::data_input::block_extractor::BlockMarkers;
    use crate::pipeline::process_report;
    use crate::test_definition::{
        ChannelSpec, IndependentAxis, Protocol, RegressionWindow, TestDefinition, Transform,
    };

    fn force_pair(parameter: &'static str, table: TableVariant) -> SidePair {
        SidePair {
            parameter,
            left: "force_li",
            right: "force_re",
            table,
            display_scale: 1.0,
            unit: "N/mm",
            label: "Force [N]",
        }
    }

    // Left travel sweeps the window; right travel is stuck at 5 mm, so the right fits are unavailable.
    fn result_set() -> ResultSet {
        let definition = TestDefinition {
            protocol: Protocol::Bump,
            title: "Bump",
            channels: vec![
                ChannelSpec::new("travel_li", 0, Transform::Identity),
                ChannelSpec::new("travel_re", 1, Transform::Identity),
                ChannelSpec::new("force_li", 2, Transform::Identity),
                ChannelSpec::new("force_re", 3, Transform::Identity),
            ],
            reference_channel: "travel_li",
            independent_axis: IndependentAxis {
                left: "travel_li",
                right: "travel_re",
                label: "Wheel Travel [mm]",
            },
            window: RegressionWindow::symmetric(10.0),
            side_pairs: vec![
                force_pair("Rate", TableVariant::Raw),
                force_pair("Rate_Offset", TableVariant::Offset),
            ],
            rounding_decimals: 4,
        };
        let content: String = [-20.0, -10.0, 0.0, 10.0, 20.0]
            .iter()
            .map(|x| {
                format!(
                    "{} {} 5 {} {}{}\n",
                    STEP_BLOCK_OPEN,
                    x,
                    10.0 * x + 50.0,
                    3.0 * x,
                    STEP_BLOCK_CLOSE
                )
            })
            .collect();
        process_report(&content, &definition, &BlockMarkers::default()).unwrap()
    }

    #[test]
    fn test_linspace_includes_bounds() {
        let v = linspace(-10.0, 10.0, 5);
        assert_eq!(v, vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
        assert!(linspace(1.0, 2.0, 0).is_empty());
    }

    #[test]
    fn test_fit_series_spans_the_window() {
        let result = result_set();
        let pair = &result.definition.side_pairs[0];
        let config = side_plot_config(&result, pair, Side::Left).unwrap();

        assert_eq!(config.series.len(), 2);
        assert!(config.series[0].markers);
        assert_eq!(config.series[0].data.len(), 5);

        let fit = &config.series[1];
        assert!(!fit.markers);
        assert_eq!(fit.data.len(), FIT_LINE_SAMPLES);
        assert_eq!(fit.label, "y = 10.0000x + 50.0000");
        let (first, last) = (fit.data[0], fit.data[fit.data.len() - 1]);
        assert_eq!(first.0, -10.0);
        assert!((last.0 - 10.0).abs() < 1e-9);
        assert!((first.1 - -50.0).abs() < 1e-9);
        assert!((last.1 - 150.0).abs() < 1e-9);
        for &(_, y) in &fit.data {
            assert!(config.y_range.start <= y && y <= config.y_range.end);
        }
        assert_eq!(config.shaded_x_range, Some(-10.0..10.0));
    }

    #[test]
    fn test_axis_labels_follow_table_variant() {
        let result = result_set();
        let raw = side_plot_config(&result, &result.definition.side_pairs[0], Side::Left).unwrap();
        assert_eq!(raw.x_label, "Wheel Travel [mm]");
        assert_eq!(raw.y_label, "Force [N]");

        let offset = side_plot_config(&result, &result.definition.side_pairs[1], Side::Left).unwrap();
        assert_eq!(offset.x_label, "Wheel Travel [mm] (offset)");
        assert_eq!(offset.y_label, "Force [N] (offset)");
        // Offset force is zero at the reference row, so the line passes through the origin.
        assert_eq!(offset.series[1].label, "y = 10.0000x + 0.0000");
    }

    #[test]
    fn test_unavailable_fit_keeps_measured_series_only() {
        let result = result_set();
        let pair = &result.definition.side_pairs[0];
        assert!(result.regression("bump_Rate_re").unwrap().fit.is_err());

        let config = side_plot_config(&result, pair, Side::Right).unwrap();
        assert_eq!(config.series.len(), 1);
        assert!(config.series[0].markers);
        assert!(config.series[0].data.iter().all(|&(x, _)| x == 5.0));
        assert!(config.x_range.end > config.x_range.start);
    }
}

// src/plot_functions/plot_fit_lines.rs
