//! Numeric fields derived from raw record fields.

use std::collections::BTreeMap;

use super::record::Value;

/// Line and column deltas between a comment and the preceding token.
///
/// `deltaLine = line - prevLine` and `deltaCols = cols - prevCols`, where a
/// missing `prevLine`/`prevCols` counts as 0. A delta is undefined when its
/// base field (`line`/`cols`) is missing or not an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivedFeatures {
    pub delta_line: Option<i64>,
    pub delta_cols: Option<i64>,
}

impl DerivedFeatures {
    /// Field name under which [`Self::delta_line`] is exposed.
    pub const DELTA_LINE: &'static str = "deltaLine";
    /// Field name under which [`Self::delta_cols`] is exposed.
    pub const DELTA_COLS: &'static str = "deltaCols";

    /// Compute derived fields from the extractor's raw fields.
    pub fn from_fields(fields: &BTreeMap<String, Value>) -> Self {
        Self {
            delta_line: delta(fields, "line", "prevLine"),
            delta_cols: delta(fields, "cols", "prevCols"),
        }
    }

    /// Look up a derived field by its exposed name.
    pub fn get(&self, name: &str) -> Option<i64> {
        match name {
            Self::DELTA_LINE => self.delta_line,
            Self::DELTA_COLS => self.delta_cols,
            _ => None,
        }
    }
}

fn delta(fields: &BTreeMap<String, Value>, base: &str, prev: &str) -> Option<i64> {
    let base = integer(fields.get(base)?)?;
    let prev = match fields.get(prev) {
        Some(v) => integer(v)?,
        None => 0,
    };
    base.checked_sub(prev)
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v),
        Value::Text(s) => s.trim().parse().ok(),
    }
}
