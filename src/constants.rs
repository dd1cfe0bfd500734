// src/constants.rs

use plotters::style::colors::full_palette::{BLUE, GREY, RED};
use plotters::style::RGBColor;

// Step block delimiters of the Adams/Car K&C `.res` export.
pub const STEP_BLOCK_OPEN: &str = "<Step type=\"quasiStatic\">";
pub const STEP_BLOCK_CLOSE: &str = "</Step>";

// Regression windows around the neutral point.
pub const VERTICAL_WINDOW_MM: f64 = 10.0; // In-phase bump: +/-10 mm wheel travel
pub const ROLL_WINDOW_MM: f64 = 25.0; // Anti-phase bump: +/-25 mm wheel travel
pub const FORCE_WINDOW_N: f64 = 500.0; // Lateral / longitudinal compliance: +/-500 N

// Reporting precision (decimal places) for the parameter tables.
pub const TRAVEL_DECIMALS: u32 = 4;
pub const FORCE_DECIMALS: u32 = 5;

// Per-mm and per-N gradients are reported per metre and per kN.
pub const PER_METRE_SCALE: f64 = 1000.0;
pub const PER_KN_SCALE: f64 = 1000.0;

// Plot dimensions.
pub const PLOT_WIDTH: u32 = 1920;
pub const PLOT_HEIGHT: u32 = 960;

// Number of samples used to draw a fit line across the regression window.
pub const FIT_LINE_SAMPLES: usize = 400;

// Font sizes
pub const FONT_SIZE_MAIN_TITLE: i32 = 24;
pub const FONT_SIZE_CHART_TITLE: i32 = 20;
pub const FONT_SIZE_AXIS_LABEL: i32 = 14;
pub const FONT_SIZE_LEGEND: i32 = 14;
pub const FONT_SIZE_MESSAGE: i32 = 18;

// --- Plot Color Assignments ---
pub const COLOR_MEASURED: &RGBColor = &BLUE;
pub const COLOR_FIT_LINE: &RGBColor = &RED;
pub const COLOR_WINDOW_SHADE: &RGBColor = &GREY;
pub const WINDOW_SHADE_OPACITY: f64 = 0.15;

// Stroke widths for lines
pub const LINE_WIDTH_PLOT: u32 = 2;
pub const LINE_WIDTH_FIT: u32 = 3;
pub const LINE_WIDTH_LEGEND: u32 = 2;
pub const MARKER_RADIUS: u32 = 3;

// src/constants.rs
