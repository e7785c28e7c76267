//! Data model consumed by tree induction.
//!
//! - [`Value`] / [`Category`]: typed cell values
//! - [`DataSource`]: read-only tabular access by `(row, column)`
//! - [`RowValues`]: column lookup for a single row at prediction time
//! - [`DataTable`]: in-memory [`DataSource`] with optional no-data value
//! - [`CategoryCounts`]: ordered category frequency table
//!
//! Rows and columns are plain indices ([`RowId`], [`ColumnId`]). Row-sets are
//! `Vec<RowId>` without duplicates; their order only fixes enumeration order.

mod counts;
mod source;
mod table;
mod value;

pub use counts::CategoryCounts;
pub use source::{DataSource, RowValues, SourceRow};
pub use table::{DataError, DataTable, DataTableBuilder};
pub use value::{Category, ColumnId, ColumnType, RowId, Value};

pub(crate) use source::ensure_column_type;
pub(crate) use value::ValueKey;
