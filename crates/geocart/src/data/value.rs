//! Typed cell values.
//!
//! Every cell of a [`DataSource`](super::DataSource) is either a continuous
//! number or a categorical label. A column never mixes the two.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a row in a data source.
pub type RowId = usize;

/// Index of a column in a data source.
pub type ColumnId = usize;

/// Fixed type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Numeric values compared by magnitude.
    Continuous,
    /// Discrete labels compared by equality only.
    Categorical,
}

impl ColumnType {
    #[inline]
    pub fn is_continuous(self) -> bool {
        matches!(self, ColumnType::Continuous)
    }

    #[inline]
    pub fn is_categorical(self) -> bool {
        matches!(self, ColumnType::Categorical)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Continuous => f.write_str("continuous"),
            ColumnType::Categorical => f.write_str("categorical"),
        }
    }
}

/// A categorical label.
///
/// Geostatistical category files usually carry integer facies codes, while
/// user-built tables tend to use text. Both are supported; a code and a text
/// label never compare equal, even if the text spells the number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Code(i64),
    Label(String),
}

impl From<i64> for Category {
    fn from(code: i64) -> Self {
        Category::Code(code)
    }
}

impl From<i32> for Category {
    fn from(code: i32) -> Self {
        Category::Code(code as i64)
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        Category::Label(label.to_owned())
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        Category::Label(label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Code(code) => write!(f, "{code}"),
            Category::Label(label) => f.write_str(label),
        }
    }
}

/// A single cell value.
///
/// Equality is numeric for continuous values (`-0.0 == 0.0`, NaN equals
/// nothing) and exact for categories. Values of different variants are
/// never equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    Continuous(f64),
    Categorical(Category),
}

impl Value {
    /// The column type this value belongs to.
    #[inline]
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Continuous(_) => ColumnType::Continuous,
            Value::Categorical(_) => ColumnType::Categorical,
        }
    }

    #[inline]
    pub fn as_continuous(&self) -> Option<f64> {
        match self {
            Value::Continuous(v) => Some(*v),
            Value::Categorical(_) => None,
        }
    }

    #[inline]
    pub fn as_category(&self) -> Option<&Category> {
        match self {
            Value::Continuous(_) => None,
            Value::Categorical(c) => Some(c),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Continuous(a), Value::Continuous(b)) => a == b,
            (Value::Categorical(a), Value::Categorical(b)) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Continuous(v)
    }
}

impl From<Category> for Value {
    fn from(c: Category) -> Self {
        Value::Categorical(c)
    }
}

impl From<i64> for Value {
    fn from(code: i64) -> Self {
        Value::Categorical(Category::Code(code))
    }
}

impl From<&str> for Value {
    fn from(label: &str) -> Self {
        Value::Categorical(Category::from(label))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Continuous(v) => write!(f, "{v}"),
            Value::Categorical(c) => write!(f, "{c}"),
        }
    }
}

/// Hashable identity of a [`Value`], consistent with its `PartialEq`
/// (apart from NaN, which is keyed by its bit pattern).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey {
    Continuous(u64),
    Categorical(Category),
}

impl ValueKey {
    pub(crate) fn of(value: &Value) -> Self {
        match value {
            // Fold -0.0 onto 0.0 so both hash alike.
            Value::Continuous(v) => {
                let v = if *v == 0.0 { 0.0 } else { *v };
                ValueKey::Continuous(v.to_bits())
            }
            Value::Categorical(c) => ValueKey::Categorical(c.clone()),
        }
    }
}
