//! Small deterministic datasets shared by unit and integration tests.

use crate::data::{ColumnId, DataTable};

/// `{A, A, B, B}` predicting `{yes, yes, no, no}` (feature 0, class 1).
pub fn categorical_pair() -> DataTable {
    build(
        DataTable::builder()
            .named_categorical("zone", ["A", "A", "B", "B"])
            .named_categorical("class", ["yes", "yes", "no", "no"]),
    )
}

/// `{1, 2, 3, 4}` predicting `{no, no, yes, yes}` (feature 0, class 1).
pub fn continuous_ramp() -> DataTable {
    build(
        DataTable::builder()
            .named_continuous("x", vec![1.0, 2.0, 3.0, 4.0])
            .named_categorical("class", ["no", "no", "yes", "yes"]),
    )
}

/// Two varied features (0, 1) and a constant class (2).
pub fn constant_class() -> DataTable {
    build(
        DataTable::builder()
            .named_continuous("x", vec![0.5, 1.5, 2.5, 3.5, 4.5])
            .named_categorical("zone", [1i64, 2, 1, 3, 2])
            .named_categorical("class", ["ore"; 5]),
    )
}

/// Class column of [`facies_table`].
pub const FACIES: ColumnId = 3;

/// Feature columns of [`facies_table`]: depth, porosity, zone.
pub const FACIES_FEATURES: [ColumnId; 3] = [0, 1, 2];

/// Synthetic well log with `n` rows.
///
/// Facies is mostly a function of porosity and zone, with a sprinkling of
/// exceptions so the tree needs several levels and some splits are weak.
pub fn facies_table(n: usize) -> DataTable {
    let mut depth = Vec::with_capacity(n);
    let mut porosity = Vec::with_capacity(n);
    let mut zone = Vec::with_capacity(n);
    let mut facies = Vec::with_capacity(n);

    for i in 0..n {
        let phi = ((i * 37 + 11) % 97) as f64 / 100.0;
        let z = (i * 7 % 5) as i64;
        let f = if phi >= 0.6 {
            "sand"
        } else if z == 2 {
            "shale"
        } else if i % 11 == 0 {
            "sand"
        } else if phi < 0.3 {
            "shale"
        } else {
            "silt"
        };
        depth.push(1000.0 + i as f64 * 2.5);
        porosity.push(phi);
        zone.push(z);
        facies.push(f);
    }

    build(
        DataTable::builder()
            .named_continuous("depth", depth)
            .named_continuous("porosity", porosity)
            .named_categorical("zone", zone)
            .named_categorical("facies", facies),
    )
}

fn build(builder: crate::data::DataTableBuilder) -> DataTable {
    match builder.build() {
        Ok(table) => table,
        Err(e) => panic!("fixture table is invalid: {e}"),
    }
}
