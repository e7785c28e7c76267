//! Data source and row access traits.

use crate::error::{CartError, IndexKind, Result};

use super::{ColumnId, ColumnType, RowId, Value};

// =============================================================================
// DataSource
// =============================================================================

/// Read-only tabular data consumed by tree induction.
///
/// Implementations must be pure lookups: the same `(row, column)` always
/// yields the same value for the lifetime of a build.
pub trait DataSource {
    /// Number of rows.
    fn n_rows(&self) -> usize;

    /// Number of columns.
    fn n_columns(&self) -> usize;

    /// Type of a column.
    ///
    /// # Errors
    ///
    /// [`CartError::OutOfRange`] if `column` does not exist.
    fn column_type(&self, column: ColumnId) -> Result<ColumnType>;

    /// Value stored at `(row, column)`.
    ///
    /// # Errors
    ///
    /// [`CartError::OutOfRange`] for an invalid row or column.
    /// Sources that know about missing data report [`CartError::MissingValue`].
    fn value_at(&self, row: RowId, column: ColumnId) -> Result<Value>;

    /// Ids of every row, in ascending order.
    fn all_rows(&self) -> Vec<RowId> {
        (0..self.n_rows()).collect()
    }

    /// Check that `column` exists.
    fn check_column(&self, column: ColumnId) -> Result<()> {
        if column < self.n_columns() {
            Ok(())
        } else {
            Err(CartError::OutOfRange {
                kind: IndexKind::Column,
                index: column,
                len: self.n_columns(),
            })
        }
    }

    /// Check that `row` exists.
    fn check_row(&self, row: RowId) -> Result<()> {
        if row < self.n_rows() {
            Ok(())
        } else {
            Err(CartError::OutOfRange {
                kind: IndexKind::Row,
                index: row,
                len: self.n_rows(),
            })
        }
    }

    /// View one row as [`RowValues`], e.g. to classify it.
    fn row(&self, row: RowId) -> SourceRow<'_, Self>
    where
        Self: Sized,
    {
        SourceRow { source: self, row }
    }
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn n_rows(&self) -> usize {
        (**self).n_rows()
    }

    fn n_columns(&self) -> usize {
        (**self).n_columns()
    }

    fn column_type(&self, column: ColumnId) -> Result<ColumnType> {
        (**self).column_type(column)
    }

    fn value_at(&self, row: RowId, column: ColumnId) -> Result<Value> {
        (**self).value_at(row, column)
    }
}

/// Fail with [`CartError::InvalidColumnType`] unless `column` has type `expected`.
pub(crate) fn ensure_column_type<S: DataSource + ?Sized>(
    source: &S,
    column: ColumnId,
    expected: ColumnType,
) -> Result<()> {
    let found = source.column_type(column)?;
    if found == expected {
        Ok(())
    } else {
        Err(CartError::InvalidColumnType {
            column,
            expected,
            found,
        })
    }
}

// =============================================================================
// RowValues
// =============================================================================

/// Column lookup for a single row being classified.
///
/// `None` means the row has no usable value for that column.
pub trait RowValues {
    fn value(&self, column: ColumnId) -> Option<Value>;
}

impl RowValues for [Value] {
    #[inline]
    fn value(&self, column: ColumnId) -> Option<Value> {
        self.get(column).cloned()
    }
}

impl RowValues for [Option<Value>] {
    #[inline]
    fn value(&self, column: ColumnId) -> Option<Value> {
        self.get(column).cloned().flatten()
    }
}

impl<T> RowValues for Vec<T>
where
    [T]: RowValues,
{
    #[inline]
    fn value(&self, column: ColumnId) -> Option<Value> {
        self.as_slice().value(column)
    }
}

impl<R: RowValues + ?Sized> RowValues for &R {
    #[inline]
    fn value(&self, column: ColumnId) -> Option<Value> {
        (**self).value(column)
    }
}

/// A row of a [`DataSource`].
///
/// Lookup failures (missing cells, bad column ids) read as `None`.
#[derive(Debug, Clone, Copy)]
pub struct SourceRow<'a, S> {
    source: &'a S,
    row: RowId,
}

impl<S> SourceRow<'_, S> {
    #[inline]
    pub fn id(&self) -> RowId {
        self.row
    }
}

impl<S: DataSource> RowValues for SourceRow<'_, S> {
    fn value(&self, column: ColumnId) -> Option<Value> {
        self.source.value_at(self.row, column).ok()
    }
}
