//! Decision tree learning.
//!
//! - [`entropy`]: label distributions and Shannon entropy
//! - [`TreeParams`]: validated learner configuration
//! - [`TreeBuilder`]: greedy minimum-entropy recursive splitting
//! - [`TrainingLogger`], [`Verbosity`]: verbosity-gated `tracing` trace
//! - [`train`]: one-call entry point from raw records to a tree
//!
//! # Example
//!
//! ```
//! use entrotree::data::Record;
//! use entrotree::feature::FeatureRegistry;
//! use entrotree::training::{train, TreeParams};
//!
//! let records = vec![
//!     Record::builder().field("line", 10).field("prevLine", 10).label("a").build(),
//!     Record::builder().field("line", 10).field("prevLine", 5).label("b").build(),
//! ];
//! let params = TreeParams::builder()
//!     .features(vec!["deltaLine".into()])
//!     .min_records(0)
//!     .build()
//!     .unwrap();
//!
//! let tree = train(&records, &params, &FeatureRegistry::standard()).unwrap();
//! assert_eq!(tree.classify(&records[0]).unwrap(), "a");
//! assert_eq!(tree.classify(&records[1]).unwrap(), "b");
//! ```

mod builder;
pub mod entropy;
mod logger;
mod params;

pub use builder::TreeBuilder;
pub use entropy::{entropy, record_entropy, weighted_child_entropy, LabelCounts};
pub use logger::{StopReason, TrainingLogger, Verbosity};
pub use params::{ConfigError, TreeParams, TreeParamsBuilder, DEFAULT_MIN_ENTROPY, DEFAULT_MIN_RECORDS};

use crate::data::{LabeledRecord, Record};
use crate::feature::{FeatureRegistry, RegistryError};
use crate::repr::TreeNode;
use crate::utils::run_with_threads;

/// Errors raised by training.
#[derive(Debug, thiserror::Error)]
pub enum TrainError {
    #[error("cannot train on an empty record set")]
    EmptyTrainingSet,
    #[error("training record {index} has no label")]
    MissingLabel { index: usize },
    #[error(transparent)]
    UnknownFeature(#[from] RegistryError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Pair every record with its label.
///
/// # Errors
///
/// [`TrainError::MissingLabel`] for the first record without a label.
pub fn labeled_records(records: &[Record]) -> Result<Vec<LabeledRecord<'_>>, TrainError> {
    records
        .iter()
        .enumerate()
        .map(|(index, r)| r.labeled().ok_or(TrainError::MissingLabel { index }))
        .collect()
}

/// Learn a decision tree from labeled records.
///
/// Runs on the thread pool selected by `params.n_threads`. The result does
/// not depend on the thread count.
///
/// # Errors
///
/// - [`TrainError::EmptyTrainingSet`] if `records` is empty
/// - [`TrainError::MissingLabel`] if any record has no label
/// - [`TrainError::UnknownFeature`] if `params` names a feature missing from
///   `registry`
/// - [`TrainError::Config`] if `params` is invalid
pub fn train(
    records: &[Record],
    params: &TreeParams,
    registry: &FeatureRegistry,
) -> Result<TreeNode, TrainError> {
    if records.is_empty() {
        return Err(TrainError::EmptyTrainingSet);
    }
    let labeled = labeled_records(records)?;
    let builder = TreeBuilder::new(params, registry)?;
    run_with_threads(params.n_threads, |parallelism| {
        builder.with_parallelism(parallelism).build(&labeled)
    })?
}
