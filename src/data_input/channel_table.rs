// src/data_input/channel_table.rs

use std::fmt;

use log::debug;
use ndarray::{Array1, Array2, ArrayView1, Axis};

use crate::data_input::block_extractor::StepBlock;
use crate::error::{KcError, KcResult};
use crate::test_definition::ChannelSpec;

/// Rows = step blocks, columns = named channels.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTable {
    names: Vec<String>,
    values: Array2<f64>,
}

impl ChannelTable {
    /// Builds a table from column names and a row-major value matrix.
    pub fn new(names: Vec<String>, values: Array2<f64>) -> KcResult<Self> {
        if names.len() != values.ncols() {
            return Err(KcError::InvalidDefinition(format!(
                "{} column names for {} columns",
                names.len(),
                values.ncols()
            )));
        }
        Ok(Self { names, values })
    }

    /// Builds a table from `(name, column values)` pairs of equal length.
    pub fn from_columns(columns: Vec<(&str, Vec<f64>)>) -> KcResult<Self> {
        let n_rows = columns.first().map_or(0, |(_, v)| v.len());
        if let Some((name, _)) = columns.iter().find(|(_, v)| v.len() != n_rows) {
            return Err(KcError::InvalidDefinition(format!(
                "column '{}' length differs from {} rows",
                name, n_rows
            )));
        }
        let mut values = Array2::<f64>::zeros((n_rows, columns.len()));
        for (col, (_, data)) in columns.iter().enumerate() {
            values.column_mut(col).assign(&Array1::from(data.clone()));
        }
        let names = columns.into_iter().map(|(n, _)| n.to_string()).collect();
        Self::new(names, values)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn column_index(&self, name: &str) -> KcResult<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| KcError::UnknownChannel(name.to_string()))
    }

    pub fn column(&self, name: &str) -> KcResult<ArrayView1<'_, f64>> {
        let idx = self.column_index(name)?;
        Ok(self.values.column(idx))
    }

    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.values.row(index)
    }

    /// Copy of the table with `reference` subtracted from every row.
    pub fn subtract_row(&self, reference: ArrayView1<'_, f64>) -> ChannelTable {
        let reference = reference.insert_axis(Axis(0));
        ChannelTable {
            names: self.names.clone(),
            values: &self.values - &reference,
        }
    }
}

impl fmt::Display for ChannelTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths: Vec<usize> = self.names.iter().map(|n| n.len().max(12)).collect();
        write!(f, "{:>5}", "row")?;
        for (name, width) in self.names.iter().zip(widths.iter().copied()) {
            write!(f, "  {:>width$}", name)?;
        }
        writeln!(f)?;
        for (i, row) in self.values.rows().into_iter().enumerate() {
            write!(f, "{:>5}", i + 1)?;
            for (value, width) in row.iter().zip(widths.iter().copied()) {
                write!(f, "  {:>width$.6}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Reads every declared channel from every block.
///
/// All channels of one block are extracted together so that the first bad
/// field is reported with the 1-based position of its block.
pub fn build_channel_table(blocks: &[StepBlock<'_>], channels: &[ChannelSpec]) -> KcResult<ChannelTable> {
    for (i, channel) in channels.iter().enumerate() {
        if channels[..i].iter().any(|c| c.name == channel.name) {
            return Err(KcError::InvalidDefinition(format!(
                "duplicate channel '{}'",
                channel.name
            )));
        }
    }

    let mut values = Array2::<f64>::zeros((blocks.len(), channels.len()));
    for (row, block) in blocks.iter().enumerate() {
        let parsed = read_block_channels(block, channels)?;
        values.row_mut(row).assign(&Array1::from(parsed));
    }

    debug!(
        "Built channel table: {} rows x {} channels",
        blocks.len(),
        channels.len()
    );
    let names = channels.iter().map(|c| c.name.to_string()).collect();
    ChannelTable::new(names, values)
}

fn read_block_channels(block: &StepBlock<'_>, channels: &[ChannelSpec]) -> KcResult<Vec<f64>> {
    channels
        .iter()
        .map(|channel| {
            let token = block.token(channel.field_index).ok_or_else(|| KcError::FieldIndex {
                block: block.position(),
                channel: channel.name.to_string(),
                field_index: channel.field_index,
                token_count: block.token_count(),
            })?;
            let value = token
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| KcError::NumericParse {
                    block: block.position(),
                    channel: channel.name.to_string(),
                    field_index: channel.field_index,
                    token: token.to_string(),
                })?;
            Ok(channel.transform.apply(value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_definition::Transform;

    fn specs() -> Vec<ChannelSpec> {
        vec![
            ChannelSpec::new("a", 0, Transform::Identity),
            ChannelSpec::new("b", 2, Transform::Negate),
            ChannelSpec::new("c", 1, Transform::RadToDeg),
        ]
    }

    #[test]
    fn test_build_table_applies_transforms() {
        let blocks = vec![
            StepBlock::new(1, "1.0 0.0 2.5"),
            StepBlock::new(2, "-4e1 3.14159265358979 7"),
        ];
        let table = build_channel_table(&blocks, &specs()).unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.names(), &["a", "b", "c"]);
        assert_eq!(table.column("a").unwrap().to_vec(), vec![1.0, -40.0]);
        assert_eq!(table.column("b").unwrap().to_vec(), vec![-2.5, -7.0]);
        assert!((table.column("c").unwrap()[1] - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_block_reports_position() {
        let blocks = vec![
            StepBlock::new(1, "1 2 3"),
            StepBlock::new(2, "1 2 3"),
            StepBlock::new(3, "1 2"),
        ];
        match build_channel_table(&blocks, &specs()) {
            Err(KcError::FieldIndex { block, field_index, token_count, .. }) => {
                assert_eq!(block, 3);
                assert_eq!(field_index, 2);
                assert_eq!(token_count, 2);
            }
            other => panic!("expected field index error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_numeric_field() {
        let blocks = vec![StepBlock::new(1, "1 x 3")];
        assert!(matches!(
            build_channel_table(&blocks, &specs()),
            Err(KcError::NumericParse { block: 1, field_index: 1, .. })
        ));
        let blocks = vec![StepBlock::new(1, "NaN 0 3")];
        assert!(matches!(
            build_channel_table(&blocks, &specs()),
            Err(KcError::NumericParse { field_index: 0, .. })
        ));
    }

    #[test]
    fn test_subtract_row() {
        let table = ChannelTable::from_columns(vec![("x", vec![1.0, 2.0, 4.0]), ("y", vec![10.0, 20.0, 30.0])]).unwrap();
        let offset = table.subtract_row(table.row(1));
        assert_eq!(offset.row(1).to_vec(), vec![0.0, 0.0]);
        assert_eq!(offset.column("y").unwrap().to_vec(), vec![-10.0, 0.0, 10.0]);
    }

    #[test]
    fn test_unknown_column() {
        let table = ChannelTable::from_columns(vec![("x", vec![1.0])]).unwrap();
        assert!(matches!(table.column("z"), Err(KcError::UnknownChannel(_))));
    }
}

// src/data_input/channel_table.rs
