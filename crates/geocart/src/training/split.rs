//! Split search.
//!
//! Candidates are enumerated exhaustively: every distinct value a feature
//! takes on the current rows is tried, as a `>=` threshold for continuous
//! features and as an equality test for categorical ones.
//!
//! # Tie-breaking
//!
//! Features are scanned in the order the caller lists them, and candidate
//! values in order of first occurrence over the row-set. A candidate only
//! replaces the incumbent if its gain is strictly greater, so among equal
//! gains the first one enumerated wins.

use crate::data::{ColumnId, DataSource, RowId};
use crate::error::Result;
use crate::repr::SplitCriterion;

use super::impurity::{impurity, information_gain};
use super::partition::{partition, RowPartition};
use super::rowset::unique_values;

/// Winning criterion of a split search and its gain.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSplit {
    pub criterion: SplitCriterion,
    pub gain: f64,
}

/// Every candidate criterion for `rows`, in enumeration order.
pub fn candidate_criteria<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    feature_columns: &[ColumnId],
) -> Result<Vec<SplitCriterion>> {
    let mut candidates = Vec::new();
    for &column in feature_columns {
        for value in unique_values(source, rows, column)? {
            candidates.push(SplitCriterion::from_value(column, value));
        }
    }
    Ok(candidates)
}

/// Gain of one criterion on `rows`, with the partition it produces.
pub fn evaluate_criterion<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    criterion: &SplitCriterion,
    class_column: ColumnId,
    impurity_before: f64,
) -> Result<(f64, RowPartition)> {
    let sides = partition(source, rows, criterion)?;
    let gain = information_gain(
        source,
        &sides.true_rows,
        &sides.false_rows,
        class_column,
        impurity_before,
    )?;
    Ok((gain, sides))
}

/// The candidate with maximum information gain.
///
/// Candidates that send every row to one side are not splits and are
/// skipped. Returns `None` when no real split exists: no rows, or every
/// feature constant over `rows`. The returned gain may still be zero;
/// callers decide whether it is worth splitting.
pub fn best_split<S: DataSource + ?Sized>(
    source: &S,
    rows: &[RowId],
    feature_columns: &[ColumnId],
    class_column: ColumnId,
) -> Result<Option<BestSplit>> {
    if rows.is_empty() {
        return Ok(None);
    }
    let impurity_before = impurity(source, rows, class_column)?;

    let mut best: Option<BestSplit> = None;
    for criterion in candidate_criteria(source, rows, feature_columns)? {
        let (gain, sides) =
            evaluate_criterion(source, rows, &criterion, class_column, impurity_before)?;
        if sides.is_degenerate() {
            continue;
        }
        if best.as_ref().map_or(true, |b| gain > b.gain) {
            best = Some(BestSplit { criterion, gain });
        }
    }
    Ok(best)
}
