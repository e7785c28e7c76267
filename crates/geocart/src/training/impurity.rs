//! Impurity and information gain.
//!
//! ```text
//! gini(R)     = 1 − Σ_c p_c²
//! variance(R) = (1/|R|) Σ (y − ȳ)²
//! gain        = I(R) − |T|/N · I(T) − |F|/N · I(F),   N = |T| + |F|
//! ```
//!
//! Gini is used for categorical targets (classification), variance for
//! continuous targets (regression). Empty row-sets have impurity 0, and an
//! empty partition has gain 0.

use crate::data::{ColumnId, ColumnType, DataSource, RowId};
use crate::error::Result;

use super::rowset::{category_counts, continuous_values};

/// Gini impurity of the class column over `rows`, in `[0, 1)`.
///
/// # Errors
///
/// [`CartError::InvalidColumnType`](crate::CartError::InvalidColumnType) if
/// `class_column` is continuous.
pub fn gini_impurity<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    class_column: ColumnId,
) -> Result<f64> {
    Ok(category_counts(source, rows, class_column)?.gini())
}

/// Population variance of a continuous target over `rows`.
///
/// Exactly `0.0` when all values are equal.
pub fn variance_impurity<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    target_column: ColumnId,
) -> Result<f64> {
    let values = continuous_values(source, rows, target_column)?;
    Ok(variance(&values))
}

/// Impurity measure matching the target column type.
pub fn impurity<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    target_column: ColumnId,
) -> Result<f64> {
    match source.column_type(target_column)? {
        ColumnType::Categorical => gini_impurity(source, rows, target_column),
        ColumnType::Continuous => variance_impurity(source, rows, target_column),
    }
}

/// Weighted impurity decrease achieved by splitting into `true_rows` and
/// `false_rows`.
///
/// Positive means the split reduces uncertainty.
pub fn information_gain<S: DataSource + ?Sized>(
    source: &S,
    true_rows: &[RowId],
    false_rows: &[RowId],
    class_column: ColumnId,
    impurity_before: f64,
) -> Result<f64> {
    let n = true_rows.len() + false_rows.len();
    if n == 0 {
        return Ok(0.0);
    }
    let n = n as f64;
    let w_true = true_rows.len() as f64 / n;
    let w_false = false_rows.len() as f64 / n;
    let i_true = impurity(source, true_rows, class_column)?;
    let i_false = impurity(source, false_rows, class_column)?;
    Ok(impurity_before - w_true * i_true - w_false * i_false)
}

/// Mean of `values`, 0 when empty.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance, exactly 0 when all values are equal.
pub(crate) fn variance(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };
    if values.iter().all(|&v| v == first) {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|&v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64
}
