// src/plot_framework.rs

use plotters::backend::BitMapBackend;
use plotters::chart::{ChartBuilder, SeriesLabelPosition};
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, PathElement, Rectangle, Text};
use plotters::series::LineSeries;
use plotters::style::colors::{BLACK, RED, WHITE};
use plotters::style::{Color, IntoFont, RGBColor};

use log::info;
use std::ops::Range;
use std::path::Path;

use crate::constants::{
    COLOR_WINDOW_SHADE, FONT_SIZE_MESSAGE, LINE_WIDTH_LEGEND, MARKER_RADIUS, PLOT_HEIGHT,
    PLOT_WIDTH, WINDOW_SHADE_OPACITY,
};
use crate::error::KcResult;
use crate::font_config::{
    FONT_TUPLE_AXIS_LABEL, FONT_TUPLE_CHART_TITLE, FONT_TUPLE_LEGEND, FONT_TUPLE_MAIN_TITLE,
    FONT_TUPLE_MESSAGE,
};
use crate::side_names::{Side, SIDES};

/// Calculate plot range with padding.
/// Adds 15% padding, or a fixed padding for very small ranges.
pub fn calculate_range(min_val: f64, max_val: f64) -> (f64, f64) {
    let (min, max) = if min_val <= max_val {
        (min_val, max_val)
    } else {
        (max_val, min_val)
    };
    let range = (max - min).abs();
    let padding = if range < 1e-6 { 0.5 } else { range * 0.15 };
    (min - padding, max + padding)
}

/// Tick label text: k/M notation for loads, two decimals for small angles.
pub fn format_axis_value(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value.abs() >= 1000.0 {
        format!("{:.1}k", value / 1000.0)
    } else if value.abs() < 10.0 && value.fract() != 0.0 {
        format!("{:.2}", value)
    } else {
        format!("{:.0}", value)
    }
}

/// Legend text of a fitted line.
///
/// Per-newton gradients are far below 1e-2, so small slopes switch to exponent notation.
pub fn fit_label(slope: f64, intercept: f64) -> String {
    let sign = if intercept < 0.0 { '-' } else { '+' };
    let slope_text = if slope != 0.0 && slope.abs() < 1e-2 {
        format!("{:.4e}", slope)
    } else {
        format!("{:.4}", slope)
    };
    format!("y = {}x {} {:.4}", slope_text, sign, intercept.abs())
}

/// Draw a "Data Unavailable" message on a plot area.
pub fn draw_unavailable_message(
    area: &DrawingArea<BitMapBackend, Shift>,
    side: Side,
    plot_type: &str,
    reason: &str,
) -> KcResult<()> {
    const CHAR_WIDTH_RATIO: f32 = 0.6; // Approximate character width relative to font size
    const LINE_HEIGHT_SPACING: i32 = 4;

    let (x_range, y_range) = area.get_pixel_range();
    let (width, height) = (x_range.end - x_range.start, y_range.end - y_range.start);
    let message = format!("{} {} Data Unavailable:\n{}", side.name(), plot_type, reason);

    let estimated_char_width = (FONT_SIZE_MESSAGE as f32 * CHAR_WIDTH_RATIO) as i32;
    let estimated_line_height = FONT_SIZE_MESSAGE + LINE_HEIGHT_SPACING;
    let lines: Vec<&str> = message.split('\n').collect();
    let max_line_length = lines.iter().map(|line| line.len()).max().unwrap_or(0) as i32;

    let center_x = width / 2 - max_line_length * estimated_char_width / 2;
    let center_y = height / 2 - lines.len() as i32 * estimated_line_height / 2;

    let text_style = FONT_TUPLE_MESSAGE.into_font().color(&RED);
    area.draw(&Text::new(message, (center_x, center_y), text_style))?;
    Ok(())
}

#[derive(Clone)]
pub struct PlotSeries {
    pub data: Vec<(f64, f64)>,
    pub label: String,
    pub color: RGBColor,
    pub stroke_width: u32,
    /// Draw a marker at every data point.
    pub markers: bool,
}

#[derive(Clone)]
pub struct PlotConfig {
    pub title: String,
    pub x_range: Range<f64>,
    pub y_range: Range<f64>,
    pub series: Vec<PlotSeries>,
    pub x_label: String,
    pub y_label: String,
    /// Regression window shaded behind the data.
    pub shaded_x_range: Option<Range<f64>>,
}

fn draw_single_chart(area: &DrawingArea<BitMapBackend, Shift>, plot_config: &PlotConfig) -> KcResult<()> {
    let mut chart = ChartBuilder::on(area)
        .caption(&plot_config.title, FONT_TUPLE_CHART_TITLE)
        .margin(5)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(plot_config.x_range.clone(), plot_config.y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(&plot_config.x_label)
        .y_desc(&plot_config.y_label)
        .x_labels(15)
        .y_labels(10)
        .x_label_formatter(&|x| format_axis_value(*x))
        .y_label_formatter(&|y| format_axis_value(*y))
        .light_line_style(WHITE.mix(0.7))
        .label_style(FONT_TUPLE_AXIS_LABEL)
        .draw()?;

    // Window shading first so data appears on top
    if let Some(window) = &plot_config.shaded_x_range {
        let low = window.start.max(plot_config.x_range.start);
        let high = window.end.min(plot_config.x_range.end);
        if high > low {
            chart.draw_series(std::iter::once(Rectangle::new(
                [(low, plot_config.y_range.start), (high, plot_config.y_range.end)],
                COLOR_WINDOW_SHADE.mix(WINDOW_SHADE_OPACITY).filled(),
            )))?;
        }
    }

    let mut legend_series_count = 0;
    for s in &plot_config.series {
        if s.data.is_empty() {
            continue;
        }
        let color = s.color;
        let series = chart.draw_series(LineSeries::new(
            s.data.iter().cloned(),
            color.stroke_width(s.stroke_width),
        ))?;
        if !s.label.is_empty() {
            series.label(&s.label).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH_LEGEND))
            });
            legend_series_count += 1;
        }
        if s.markers {
            chart.draw_series(
                s.data
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), MARKER_RADIUS, color.filled())),
            )?;
        }
    }

    if legend_series_count > 0 {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(FONT_TUPLE_LEGEND)
            .draw()?;
    }
    Ok(())
}

/// Creates a plot image with the left wheel in the left panel and the right wheel in the right panel.
pub fn draw_side_by_side_plot<F>(
    output_path: &Path,
    root_name: &str,
    plot_type_name: &str,
    mut get_side_plot_data: F,
) -> KcResult<bool>
where
    F: FnMut(Side) -> Result<PlotConfig, String>,
{
    let root_area = BitMapBackend::new(output_path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root_area.fill(&WHITE)?;
    root_area.draw(&Text::new(
        root_name,
        (10, 10),
        FONT_TUPLE_MAIN_TITLE.into_font().color(&BLACK),
    ))?;
    let margined_root_area = root_area.margin(50, 5, 5, 5);
    let sub_plot_areas = margined_root_area.split_evenly((1, SIDES.len()));
    let mut any_side_plotted = false;

    for side in SIDES {
        let area = &sub_plot_areas[side.index()];
        match get_side_plot_data(side) {
            Ok(plot_config) => {
                let has_data = plot_config.series.iter().any(|s| !s.data.is_empty());
                let valid_ranges = plot_config.x_range.end > plot_config.x_range.start
                    && plot_config.y_range.end > plot_config.y_range.start;
                if has_data && valid_ranges {
                    draw_single_chart(area, &plot_config)?;
                    any_side_plotted = true;
                } else {
                    let reason = if !has_data { "No data points" } else { "Invalid ranges" };
                    draw_unavailable_message(area, side, plot_type_name, reason)?;
                }
            }
            Err(reason) => draw_unavailable_message(area, side, plot_type_name, &reason)?,
        }
    }

    root_area.present()?;
    if any_side_plotted {
        info!("  Plot saved as '{}'.", output_path.display());
    } else {
        info!(
            "  '{}' only shows placeholder messages: no side could be plotted.",
            output_path.display()
        );
    }
    Ok(any_side_plotted)
}


// src/plot_framework.rs
