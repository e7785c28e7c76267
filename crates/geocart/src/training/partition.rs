//! Row partitioning by split criterion.
//!
//! Partitioning is pure: it reads the data source and returns two fresh
//! row-sets, leaving the input untouched. Both outputs keep the relative
//! order of the input, so enumeration order (and with it tie-breaking) is
//! stable down the tree.

use crate::data::{DataSource, RowId};
use crate::error::{CartError, Result};
use crate::repr::SplitCriterion;

/// The two sides of a split.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowPartition {
    /// Rows matching the criterion.
    pub true_rows: Vec<RowId>,
    /// Rows not matching the criterion.
    pub false_rows: Vec<RowId>,
}

impl RowPartition {
    /// Total rows on both sides.
    #[inline]
    pub fn len(&self) -> usize {
        self.true_rows.len() + self.false_rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether one side received every row.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.true_rows.is_empty() || self.false_rows.is_empty()
    }
}

/// Split `rows` by `criterion`.
///
/// `|true_rows| + |false_rows| == |rows|`, and the sides are disjoint.
///
/// # Errors
///
/// [`CartError::InvalidColumnType`] if the criterion's rule does not fit the
/// column type, plus any lookup error from the data source.
pub fn partition<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    criterion: &SplitCriterion,
) -> Result<RowPartition> {
    let found = source.column_type(criterion.column)?;
    let expected = criterion.column_type();
    if found != expected {
        return Err(CartError::InvalidColumnType {
            column: criterion.column,
            expected,
            found,
        });
    }

    let mut out = RowPartition::default();
    for &row in rows {
        let value = source.value_at(row, criterion.column)?;
        if criterion.matches(&value)? {
            out.true_rows.push(row);
        } else {
            out.false_rows.push(row);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ColumnType, DataTable};

    fn table() -> DataTable {
        DataTable::builder()
            .continuous(vec![1.0, 4.0, 2.0, 3.0])
            .categorical(["a", "b", "a", "c"])
            .build()
            .unwrap()
    }

    #[test]
    fn threshold_partition_keeps_order() {
        let t = table();
        let p = partition(&t, &[3, 2, 1, 0], &SplitCriterion::threshold(0, 2.0)).unwrap();
        assert_eq!(p.true_rows, vec![3, 2, 1]);
        assert_eq!(p.false_rows, vec![0]);
        assert_eq!(p.len(), 4);
        assert!(!p.is_degenerate());
    }

    #[test]
    fn equality_partition() {
        let t = table();
        let p = partition(&t, &[0, 1, 2, 3], &SplitCriterion::equals(1, "a")).unwrap();
        assert_eq!(p.true_rows, vec![0, 2]);
        assert_eq!(p.false_rows, vec![1, 3]);
    }

    #[test]
    fn empty_rows_give_empty_sides() {
        let t = table();
        let p = partition(&t, &[], &SplitCriterion::equals(1, "a")).unwrap();
        assert!(p.is_empty());
        assert!(p.is_degenerate());
    }

    #[test]
    fn rule_must_fit_column_type() {
        let t = table();
        let err = partition(&t, &[0], &SplitCriterion::threshold(1, 0.5)).unwrap_err();
        assert!(matches!(
            err,
            CartError::InvalidColumnType {
                column: 1,
                expected: ColumnType::Continuous,
                found: ColumnType::Categorical
            }
        ));
    }
}
