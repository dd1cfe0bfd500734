// src/data_analysis/reference_normalizer.rs

use log::debug;
use ndarray_stats::errors::MinMaxError;
use ndarray_stats::QuantileExt;

use crate::data_input::channel_table::ChannelTable;
use crate::error::{KcError, KcResult};

/// Row whose `channel` value is closest to zero; ties resolve to the lowest row.
pub fn find_reference_row(table: &ChannelTable, channel: &str) -> KcResult<usize> {
    let column = table.column(channel)?;
    if column.is_empty() {
        return Err(KcError::EmptyDataset);
    }
    // argmin keeps the first of equal minima.
    column.mapv(f64::abs).argmin().map_err(|e| match e {
        MinMaxError::EmptyInput => KcError::EmptyDataset,
        MinMaxError::UndefinedOrder => KcError::InvalidDefinition(format!(
            "reference channel '{}' contains non-comparable values",
            channel
        )),
    })
}

/// Offset table relative to the neutral row of `reference_channel`.
///
/// Returns the offset table and the index of the reference row. Every cell of
/// the reference row is exactly zero in the offset table.
pub fn normalize_to_reference(table: &ChannelTable, reference_channel: &str) -> KcResult<(ChannelTable, usize)> {
    if table.is_empty() {
        return Err(KcError::EmptyDataset);
    }
    let reference_row = find_reference_row(table, reference_channel)?;
    debug!(
        "Reference row {} ('{}' = {})",
        reference_row,
        reference_channel,
        table.column(reference_channel)?[reference_row]
    );
    Ok((offset_by_row(table, reference_row), reference_row))
}

/// Subtracts row `row` from every row of `table`.
pub fn offset_by_row(table: &ChannelTable, row: usize) -> ChannelTable {
    table.subtract_row(table.row(row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn table() -> ChannelTable {
        ChannelTable::from_columns(vec![
            ("travel", vec![-20.0, -10.0, 0.3, 10.0, 20.0]),
            ("force", vec![1000.0, 2000.0, 3003.0, 4000.0, 5000.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_reference_row_closest_to_zero() {
        assert_eq!(find_reference_row(&table(), "travel").unwrap(), 2);
    }

    #[test]
    fn test_reference_tie_takes_first_row() {
        let t = ChannelTable::from_columns(vec![("x", vec![5.0, -1.0, 1.0, -1.0])]).unwrap();
        assert_eq!(find_reference_row(&t, "x").unwrap(), 1);
    }

    #[test]
    fn test_reference_row_is_zero_and_idempotent() {
        let (offset, row) = normalize_to_reference(&table(), "travel").unwrap();
        assert!(offset.row(row).iter().all(|&v| v == 0.0));
        assert!((offset.column("travel").unwrap()[0] - (-20.3)).abs() < 1e-12);

        let again = offset_by_row(&offset, row);
        assert_eq!(again, offset);
    }

    #[test]
    fn test_empty_table() {
        let empty = ChannelTable::new(vec!["x".to_string()], Array2::zeros((0, 1))).unwrap();
        assert!(matches!(normalize_to_reference(&empty, "x"), Err(KcError::EmptyDataset)));
    }

    #[test]
    fn test_unknown_reference_channel() {
        assert!(matches!(
            normalize_to_reference(&table(), "steer"),
            Err(KcError::UnknownChannel(_))
        ));
    }
}

// src/data_analysis/reference_normalizer.rs
