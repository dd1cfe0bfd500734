// src/data_analysis/windowed_regression.rs

use log::{debug, warn};

use crate::data_input::channel_table::ChannelTable;
use crate::error::{InsufficientData, KcResult};
use crate::side_names::{Side, SIDES};
use crate::test_definition::{RegressionWindow, TableVariant, TestDefinition};

/// Ordinary least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination of the fit; 1.0 for a perfect line.
    pub r_squared: f64,
    /// Number of rows inside the regression window.
    pub points: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Fits a least-squares line through `(x[i], y[i])`.
pub fn fit_line(x: &[f64], y: &[f64]) -> Result<LinearFit, InsufficientData> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Err(InsufficientData::TooFewPoints { found: n });
    }
    let (x, y) = (&x[..n], &y[..n]);
    if x.iter().all(|&v| v == x[0]) {
        return Err(InsufficientData::ZeroVariance { x: x[0], points: n });
    }

    let n_f = n as f64;
    let mean_x = x.iter().sum::<f64>() / n_f;
    let mean_y = y.iter().sum::<f64>() / n_f;

    // Centered sums keep precision for large absolute offsets (e.g. wheel loads).
    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let r_squared = if syy > 0.0 {
        ((sxy * sxy) / (sxx * syy)).min(1.0)
    } else {
        1.0
    };

    Ok(LinearFit {
        slope,
        intercept,
        r_squared,
        points: n,
    })
}

/// `(x, y)` pairs of the rows whose `independent` value lies inside `window`.
pub fn window_points(
    table: &ChannelTable,
    independent: &str,
    dependent: &str,
    window: &RegressionWindow,
) -> KcResult<(Vec<f64>, Vec<f64>)> {
    let x = table.column(independent)?;
    let y = table.column(dependent)?;
    Ok(x.iter()
        .zip(y.iter())
        .filter(|&(&xi, _)| window.contains(xi))
        .map(|(&xi, &yi)| (xi, yi))
        .unzip())
}

/// Fits `dependent` against `independent` over the rows inside `window`.
///
/// Missing channels are fatal; too few window rows come back as
/// [`crate::error::KcError::InsufficientData`].
pub fn windowed_fit(
    table: &ChannelTable,
    independent: &str,
    dependent: &str,
    window: &RegressionWindow,
) -> KcResult<LinearFit> {
    let (x, y) = window_points(table, independent, dependent, window)?;
    Ok(fit_line(&x, &y)?)
}

/// Slope of one output parameter on one side.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionResult {
    pub parameter_name: String,
    pub side: Side,
    pub fit: Result<LinearFit, InsufficientData>,
}

impl RegressionResult {
    pub fn slope(&self) -> Option<f64> {
        self.fit.as_ref().ok().map(|f| f.slope)
    }

    pub fn intercept(&self) -> Option<f64> {
        self.fit.as_ref().ok().map(|f| f.intercept)
    }
}

/// Runs every side pair of `definition`, left then right.
///
/// A window that cannot be fitted is recorded on its own result and does not
/// stop the other parameters.
pub fn run_side_pairs(
    definition: &TestDefinition,
    raw: &ChannelTable,
    offset: &ChannelTable,
) -> KcResult<Vec<RegressionResult>> {
    let mut results = Vec::with_capacity(definition.side_pairs.len() * SIDES.len());

    for pair in &definition.side_pairs {
        let table = match pair.table {
            TableVariant::Raw => raw,
            TableVariant::Offset => offset,
        };
        for side in SIDES {
            let parameter_name = definition.parameter_name(pair, side);
            let independent = definition.independent_axis.channel(side);
            let (x, y) = window_points(table, independent, pair.dependent(side), &definition.window)?;
            let fit = fit_line(&x, &y);
            match &fit {
                Ok(f) => debug!(
                    "{}: slope {:.6} intercept {:.6} over {} points",
                    parameter_name, f.slope, f.intercept, f.points
                ),
                Err(e) => warn!("{}: unavailable, {}", parameter_name, e),
            }
            results.push(RegressionResult {
                parameter_name,
                side,
                fit,
            });
        }
    }
    Ok(results)
}


// src/data_analysis/windowed_regression.rs
