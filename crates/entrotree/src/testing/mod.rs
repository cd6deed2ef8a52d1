//! Test helpers: record fixtures and float assertions.
//!
//! Used by unit tests, integration tests and benchmarks.

pub mod data;

use crate::data::{LabeledRecord, Record, Value};

/// Build a labeled record from `(field, value)` pairs.
pub fn record(fields: &[(&str, Value)], label: &str) -> Record {
    fields
        .iter()
        .fold(Record::builder(), |b, (name, value)| b.field(*name, value.clone()))
        .label(label)
        .build()
}

/// Build an unlabeled record from `(field, value)` pairs.
pub fn unlabeled(fields: &[(&str, Value)]) -> Record {
    fields
        .iter()
        .fold(Record::builder(), |b, (name, value)| b.field(*name, value.clone()))
        .build()
}

/// Pair records with their labels, skipping unlabeled ones.
pub fn labeled(records: &[Record]) -> Vec<LabeledRecord<'_>> {
    records.iter().filter_map(Record::labeled).collect()
}

/// Assert two floats are equal within an absolute tolerance (default `1e-9`).
///
/// ```
/// use entrotree::assert_approx_eq;
///
/// assert_approx_eq!(0.1 + 0.2, 0.3);
/// assert_approx_eq!(1.0, 1.05, 0.1);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($left, $right, epsilon = 1e-9)
    };
    ($left:expr, $right:expr, $eps:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($left, $right, epsilon = $eps)
    };
}
