//! Queries over a subset of rows.

use std::collections::HashSet;

use crate::data::{
    ensure_column_type, CategoryCounts, ColumnId, ColumnType, DataSource, RowId, Value, ValueKey,
};
use crate::error::{CartError, Result};

/// Distinct values of `column` over `rows`, in order of first occurrence.
///
/// The order follows `rows`, which is what fixes the split tie-break.
pub fn unique_values<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    column: ColumnId,
) -> Result<Vec<Value>> {
    source.column_type(column)?;
    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for &row in rows {
        let value = finite(source.value_at(row, column)?, row, column)?;
        if seen.insert(ValueKey::of(&value)) {
            values.push(value);
        }
    }
    Ok(values)
}

/// Occurrences of each category of `column` over `rows`.
///
/// # Errors
///
/// [`CartError::InvalidColumnType`] if `column` is continuous.
pub fn category_counts<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    column: ColumnId,
) -> Result<CategoryCounts> {
    ensure_column_type(source, column, ColumnType::Categorical)?;
    let mut categories = Vec::with_capacity(rows.len());
    for &row in rows {
        match source.value_at(row, column)? {
            Value::Categorical(c) => categories.push(c),
            other => {
                return Err(CartError::InvalidColumnType {
                    column,
                    expected: ColumnType::Categorical,
                    found: other.column_type(),
                })
            }
        }
    }
    Ok(CategoryCounts::tally(categories))
}

/// Values of a continuous `column` over `rows`, in row order.
///
/// # Errors
///
/// [`CartError::InvalidColumnType`] if `column` is categorical.
pub fn continuous_values<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    column: ColumnId,
) -> Result<Vec<f64>> {
    ensure_column_type(source, column, ColumnType::Continuous)?;
    rows.iter()
        .map(|&row| match source.value_at(row, column)? {
            Value::Continuous(v) if v.is_finite() => Ok(v),
            Value::Continuous(_) => Err(CartError::NonFiniteValue { row, column }),
            other => Err(CartError::InvalidColumnType {
                column,
                expected: ColumnType::Continuous,
                found: other.column_type(),
            }),
        })
        .collect()
}

/// Pass `value` through unless it is a non-finite continuous value.
fn finite(value: Value, row: RowId, column: ColumnId) -> Result<Value> {
    match value {
        Value::Continuous(v) if !v.is_finite() => Err(CartError::NonFiniteValue { row, column }),
        value => Ok(value),
    }
}

/// Whether every row holds the same value in `column`. True for no rows.
pub fn is_constant<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    column: ColumnId,
) -> Result<bool> {
    let Some((&first, rest)) = rows.split_first() else {
        source.column_type(column)?;
        return Ok(true);
    };
    let first = ValueKey::of(&source.value_at(first, column)?);
    for &row in rest {
        if ValueKey::of(&source.value_at(row, column)?) != first {
            return Ok(false);
        }
    }
    Ok(true)
}
