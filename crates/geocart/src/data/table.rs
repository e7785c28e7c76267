//! In-memory column-major table.

use ndarray::{Array1, ArrayView2};

use crate::error::{CartError, IndexKind, Result};
use crate::utils::almost_equal_ulps;

use super::source::DataSource;
use super::{Category, ColumnId, ColumnType, RowId, Value};

/// Maximum ULP distance at which a cell is considered equal to the
/// no-data value.
const NO_DATA_ULPS: u64 = 1;

// =============================================================================
// DataError
// =============================================================================

/// Errors raised while assembling a [`DataTable`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
    /// A column's length differs from the first column.
    #[error("column {column} has {found} rows, expected {expected}")]
    LengthMismatch {
        column: ColumnId,
        expected: usize,
        found: usize,
    },

    /// A continuous cell holds NaN or an infinity.
    #[error("column {column} row {row} is {value}; use a no-data value for missing cells")]
    NonFinite {
        column: ColumnId,
        row: RowId,
        value: f64,
    },

    /// The no-data value itself is not a finite number.
    #[error("no-data value must be finite, got {0}")]
    InvalidNoDataValue(f64),
}

// =============================================================================
// DataTable
// =============================================================================

#[derive(Debug, Clone)]
enum ColumnData {
    Continuous(Array1<f64>),
    Categorical(Vec<Category>),
}

impl ColumnData {
    fn len(&self) -> usize {
        match self {
            ColumnData::Continuous(values) => values.len(),
            ColumnData::Categorical(values) => values.len(),
        }
    }

    fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Continuous(_) => ColumnType::Continuous,
            ColumnData::Categorical(_) => ColumnType::Categorical,
        }
    }
}

/// A typed, column-major table implementing [`DataSource`].
///
/// Continuous cells equal to the table's no-data value are missing:
/// [`DataSource::value_at`] reports them as [`CartError::MissingValue`] and
/// [`DataSource::row`] views read them as `None`.
///
/// # Example
///
/// ```
/// use geocart::data::{DataSource, DataTable, Value};
///
/// let table = DataTable::builder()
///     .named_continuous("porosity", vec![0.12, 0.31, -999.0])
///     .named_categorical("facies", ["sand", "shale", "sand"])
///     .no_data_value(-999.0)
///     .build()
///     .unwrap();
///
/// assert_eq!(table.n_rows(), 3);
/// assert_eq!(table.column_by_name("facies"), Some(1));
/// assert!(table.is_missing(2, 0));
/// assert_eq!(table.value_at(1, 1).unwrap(), Value::from("shale"));
/// ```
#[derive(Debug, Clone)]
pub struct DataTable {
    columns: Vec<ColumnData>,
    names: Vec<Option<String>>,
    n_rows: usize,
    no_data_value: Option<f64>,
}

impl DataTable {
    pub fn builder() -> DataTableBuilder {
        DataTableBuilder::default()
    }

    /// Build an all-continuous table from a `[n_rows, n_columns]` matrix.
    pub fn from_continuous(matrix: ArrayView2<'_, f64>) -> std::result::Result<Self, DataError> {
        Self::builder().continuous_matrix(matrix).build()
    }

    /// Name of a column, if one was given.
    pub fn column_name(&self, column: ColumnId) -> Option<&str> {
        self.names.get(column).and_then(|n| n.as_deref())
    }

    /// Look a column up by name, ignoring surrounding whitespace.
    pub fn column_by_name(&self, name: &str) -> Option<ColumnId> {
        let name = name.trim();
        self.names
            .iter()
            .position(|n| n.as_deref().map(str::trim) == Some(name))
    }

    pub fn no_data_value(&self) -> Option<f64> {
        self.no_data_value
    }

    /// Whether `v` is the no-data sentinel.
    #[inline]
    pub fn is_no_data(&self, v: f64) -> bool {
        self.no_data_value
            .is_some_and(|ndv| almost_equal_ulps(ndv, v, NO_DATA_ULPS))
    }

    /// Whether the cell at `(row, column)` is missing.
    ///
    /// Out-of-range cells count as missing.
    pub fn is_missing(&self, row: RowId, column: ColumnId) -> bool {
        match self.columns.get(column) {
            Some(ColumnData::Continuous(values)) => {
                values.get(row).map_or(true, |&v| self.is_no_data(v))
            }
            Some(ColumnData::Categorical(values)) => row >= values.len(),
            None => true,
        }
    }

    /// Rows with no missing cell in any of `columns`.
    pub fn complete_rows(&self, columns: &[ColumnId]) -> Vec<RowId> {
        (0..self.n_rows)
            .filter(|&row| columns.iter().all(|&c| !self.is_missing(row, c)))
            .collect()
    }
}

impl DataSource for DataTable {
    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn n_columns(&self) -> usize {
        self.columns.len()
    }

    fn column_type(&self, column: ColumnId) -> Result<ColumnType> {
        self.columns
            .get(column)
            .map(ColumnData::column_type)
            .ok_or(CartError::OutOfRange {
                kind: IndexKind::Column,
                index: column,
                len: self.columns.len(),
            })
    }

    fn value_at(&self, row: RowId, column: ColumnId) -> Result<Value> {
        self.check_row(row)?;
        let data = self.columns.get(column).ok_or(CartError::OutOfRange {
            kind: IndexKind::Column,
            index: column,
            len: self.columns.len(),
        })?;
        match data {
            ColumnData::Continuous(values) => {
                let v = values[row];
                if self.is_no_data(v) {
                    Err(CartError::MissingValue { row, column })
                } else {
                    Ok(Value::Continuous(v))
                }
            }
            ColumnData::Categorical(values) => Ok(Value::Categorical(values[row].clone())),
        }
    }
}

// =============================================================================
// DataTableBuilder
// =============================================================================

/// Incremental builder for [`DataTable`]. Columns get ids in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DataTableBuilder {
    columns: Vec<(Option<String>, ColumnData)>,
    no_data_value: Option<f64>,
}

impl DataTableBuilder {
    pub fn continuous(mut self, values: impl Into<Array1<f64>>) -> Self {
        self.columns
            .push((None, ColumnData::Continuous(values.into())));
        self
    }

    pub fn named_continuous(
        mut self,
        name: impl Into<String>,
        values: impl Into<Array1<f64>>,
    ) -> Self {
        self.columns
            .push((Some(name.into()), ColumnData::Continuous(values.into())));
        self
    }

    pub fn categorical<C, I>(mut self, values: I) -> Self
    where
        C: Into<Category>,
        I: IntoIterator<Item = C>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.columns.push((None, ColumnData::Categorical(values)));
        self
    }

    pub fn named_categorical<C, I>(mut self, name: impl Into<String>, values: I) -> Self
    where
        C: Into<Category>,
        I: IntoIterator<Item = C>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.columns
            .push((Some(name.into()), ColumnData::Categorical(values)));
        self
    }

    /// Append every column of a `[n_rows, n_columns]` matrix as continuous.
    pub fn continuous_matrix(mut self, matrix: ArrayView2<'_, f64>) -> Self {
        for column in matrix.columns() {
            self.columns
                .push((None, ColumnData::Continuous(column.to_owned())));
        }
        self
    }

    /// Sentinel marking missing continuous cells.
    pub fn no_data_value(mut self, ndv: f64) -> Self {
        self.no_data_value = Some(ndv);
        self
    }

    /// Validate and assemble the table.
    ///
    /// # Errors
    ///
    /// - [`DataError::LengthMismatch`] if columns differ in length
    /// - [`DataError::NonFinite`] for NaN or infinite cells
    /// - [`DataError::InvalidNoDataValue`] for a non-finite sentinel
    pub fn build(self) -> std::result::Result<DataTable, DataError> {
        if let Some(ndv) = self.no_data_value {
            if !ndv.is_finite() {
                return Err(DataError::InvalidNoDataValue(ndv));
            }
        }

        let n_rows = self.columns.first().map_or(0, |(_, data)| data.len());
        for (column, (_, data)) in self.columns.iter().enumerate() {
            if data.len() != n_rows {
                return Err(DataError::LengthMismatch {
                    column,
                    expected: n_rows,
                    found: data.len(),
                });
            }
            if let ColumnData::Continuous(values) = data {
                if let Some(row) = values.iter().position(|v| !v.is_finite()) {
                    return Err(DataError::NonFinite {
                        column,
                        row,
                        value: values[row],
                    });
                }
            }
        }

        let (names, columns) = self.columns.into_iter().unzip();
        Ok(DataTable {
            columns,
            names,
            n_rows,
            no_data_value: self.no_data_value,
        })
    }
}
