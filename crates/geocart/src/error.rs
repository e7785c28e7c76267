//! Crate-wide error type.

use std::fmt;

use crate::data::{ColumnId, ColumnType, DataError, RowId};
use crate::model::ConfigError;
use crate::repr::TreeValidationError;

/// Which kind of index was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Row,
    Column,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Row => f.write_str("row"),
            IndexKind::Column => f.write_str("column"),
        }
    }
}

/// Errors raised by tree induction and prediction.
///
/// Induction is deterministic, so none of these are worth retrying; they
/// all describe malformed input.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// An operation needing one column type was given the other.
    #[error("column {column} is {found}, expected {expected}")]
    InvalidColumnType {
        column: ColumnId,
        expected: ColumnType,
        found: ColumnType,
    },

    /// A row or column id outside the data source.
    #[error("{kind} {index} out of range (have {len})")]
    OutOfRange {
        kind: IndexKind,
        index: usize,
        len: usize,
    },

    /// A row being classified has no value for a column on its decision path.
    #[error("row has no value for column {column}")]
    MissingColumnValue { column: ColumnId },

    /// The data source holds no value at this cell.
    #[error("missing value at row {row}, column {column}")]
    MissingValue { row: RowId, column: ColumnId },

    /// A data source returned NaN or an infinity for a continuous cell.
    #[error("non-finite value at row {row}, column {column}")]
    NonFiniteValue { row: RowId, column: ColumnId },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid data: {0}")]
    Data(#[from] DataError),

    #[error("invalid tree: {0}")]
    InvalidTree(#[from] TreeValidationError),

    #[error("tree serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result alias used throughout the crate.
pub type Result<T, E = CartError> = std::result::Result<T, E>;
