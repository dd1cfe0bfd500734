// src/data_analysis/results_packager.rs

use std::fmt;
use std::path::Path;

use log::info;

use crate::data_analysis::windowed_regression::RegressionResult;
use crate::error::{InsufficientData, KcResult};
use crate::side_names::{Side, SIDES};
use crate::test_definition::TestDefinition;

/// One reported parameter of one wheel.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRow {
    pub name: String,
    pub side: Side,
    pub unit: &'static str,
    /// Fitted slope in table units, unrounded.
    pub slope: Option<f64>,
    /// Slope in reporting units, unrounded.
    pub scaled: Option<f64>,
    /// Slope in reporting units, rounded for display.
    pub display: Option<f64>,
    pub unavailable: Option<InsufficientData>,
}

impl ParameterRow {
    pub fn display_text(&self, decimals: u32) -> String {
        match self.display {
            Some(v) => format!("{:.*}", decimals as usize, v),
            None => "unavailable".to_string(),
        }
    }
}

/// Ordered parameter -> slope table of one processed report.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    pub title: String,
    pub decimals: u32,
    pub rows: Vec<ParameterRow>,
}

/// Which rows of a [`ParameterTable`] to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportView {
    All,
    /// Left-wheel rows only.
    KeyResults,
}

/// Rounds `value` to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0 // no "-0.0000" in tables
    } else {
        rounded
    }
}

/// Packages regression results in declaration order of the side pairs,
/// left before right, whatever the order of `results`.
pub fn package_results(definition: &TestDefinition, results: &[RegressionResult]) -> ParameterTable {
    let mut rows = Vec::with_capacity(definition.side_pairs.len() * SIDES.len());

    for pair in &definition.side_pairs {
        for side in SIDES {
            let name = definition.parameter_name(pair, side);
            let found = results
                .iter()
                .find(|r| r.side == side && r.parameter_name == name);

            let (slope, unavailable) = match found.map(|r| &r.fit) {
                Some(Ok(fit)) => (Some(fit.slope), None),
                Some(Err(e)) => (None, Some(e.clone())),
                None => (None, Some(InsufficientData::TooFewPoints { found: 0 })),
            };
            let scaled = slope.map(|s| s * pair.display_scale);
            rows.push(ParameterRow {
                name,
                side,
                unit: pair.unit,
                slope,
                scaled,
                display: scaled.map(|v| round_to(v, definition.rounding_decimals)),
                unavailable,
            });
        }
    }

    ParameterTable {
        title: definition.title.to_string(),
        decimals: definition.rounding_decimals,
        rows,
    }
}

impl ParameterTable {
    pub fn get(&self, name: &str) -> Option<&ParameterRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    /// Left-wheel rows, the summary reported for a symmetric axle.
    pub fn key_results(&self) -> impl Iterator<Item = &ParameterRow> {
        self.rows.iter().filter(|r| r.side == Side::Left)
    }

    pub fn unavailable_count(&self) -> usize {
        self.rows.iter().filter(|r| r.display.is_none()).count()
    }

    /// Writes `Parameter,Slope,Unit` rows; unavailable slopes are left empty.
    pub fn write_csv(&self, path: &Path, view: ExportView) -> KcResult<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(["Parameter", "Slope", "Unit"])?;
        let rows: Box<dyn Iterator<Item = &ParameterRow> + '_> = match view {
            ExportView::All => Box::new(self.rows.iter()),
            ExportView::KeyResults => Box::new(self.key_results()),
        };
        for row in rows {
            let slope = row
                .display
                .map(|v| format!("{:.*}", self.decimals as usize, v))
                .unwrap_or_default();
            writer.write_record([row.name.as_str(), slope.as_str(), row.unit])?;
        }
        writer.flush()?;
        info!("Results saved as '{}'", path.display());
        Ok(())
    }
}

impl fmt::Display for ParameterTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .rows
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(9)
            .max("Parameter".len());
        writeln!(f, "{}", self.title)?;
        writeln!(f, "  {:<name_width$}  {:>14}  Unit", "Parameter", "Slope")?;
        for row in &self.rows {
            write!(
                f,
                "  {:<name_width$}  {:>14}  {}",
                row.name,
                row.display_text(self.decimals),
                row.unit
            )?;
            if let Some(reason) = &row.unavailable {
                write!(f, "  ({})", reason)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}


// src/data_analysis/results_packager.rs
