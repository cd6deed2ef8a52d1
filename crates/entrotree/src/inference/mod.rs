//! Replaying learned trees against new records.
//!
//! - [`classify`]: single-record classification
//! - [`Classifier`]: batch classification, optionally parallel
//! - [`Accuracy`]: correct / incorrect / unknown tally over labeled records
//!
//! Classification never panics on unseen inputs: a branch without a child for
//! the computed outcome key yields [`ClassifyError::UnknownOutcome`], and the
//! caller decides on a fallback.

mod classify;

pub use classify::{classify, Accuracy, Classifier};

use crate::feature::OutcomeKey;

/// Errors raised while classifying a record.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    /// A branch has no child for the record's outcome key.
    #[error("feature {feature:?} has no outcome {key}")]
    UnknownOutcome { feature: String, key: OutcomeKey },
}
