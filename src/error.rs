// src/error.rs

use thiserror::Error;

/// Errors raised while turning a report into a result set.
///
/// Everything here is fatal for the report being processed. Per-parameter
/// fitting problems are carried separately as [`InsufficientData`].
#[derive(Debug, Error)]
pub enum KcError {
    #[error("malformed step block {block} at byte {offset}: {reason}")]
    Parse {
        block: usize,
        offset: usize,
        reason: String,
    },
    #[error(
        "block {block}: channel '{channel}' reads field {field_index} but the block only has {token_count} fields (report/protocol version mismatch?)"
    )]
    FieldIndex {
        block: usize,
        channel: String,
        field_index: usize,
        token_count: usize,
    },
    #[error("block {block}: channel '{channel}' field {field_index} is not a number: '{token}'")]
    NumericParse {
        block: usize,
        channel: String,
        field_index: usize,
        token: String,
    },
    #[error("no valid data blocks found in the report")]
    EmptyDataset,
    #[error("unknown channel '{0}'")]
    UnknownChannel(String),
    #[error("invalid test definition: {0}")]
    InvalidDefinition(String),
    #[error(transparent)]
    InsufficientData(#[from] InsufficientData),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to render plot: {0}")]
    Plot(String),
}

/// Why a line could not be fitted through a regression window.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InsufficientData {
    #[error("only {found} point(s) inside the regression window, need at least 2")]
    TooFewPoints { found: usize },
    #[error("all {points} points inside the regression window share x = {x}, slope is undefined")]
    ZeroVariance { x: f64, points: usize },
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for KcError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        KcError::Plot(format!("{value:?}"))
    }
}

pub type KcResult<T> = Result<T, KcError>;

// src/error.rs
