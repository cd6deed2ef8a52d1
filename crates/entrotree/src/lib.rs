//! entrotree: entropy-driven decision trees for classifying source-code comments.
//!
//! Learns a decision tree over heterogeneous, partially-missing categorical
//! and numeric features, replays it against new records, and persists it in
//! a portable nested form.
//!
//! # Key Types
//!
//! - [`Record`] - Labeled feature bag for one comment
//! - [`Feature`] / [`FeatureRegistry`] - Feature algebra and name lookup
//! - [`TreeParams`] - Configuration builder
//! - [`TreeNode`] - Learned tree with classification and inspection
//! - [`TreeModel`] - High-level train/classify/save/load wrapper
//!
//! # Training
//!
//! Use `TreeParams::builder()` to configure, then [`train`] or
//! `TreeModel::train()`. See the [`training`] module for details.
//!
//! # Persistence
//!
//! See the [`persist`] module for the JSON tree format and model envelope.

// Re-export approx for the assertion helpers in `testing`
pub use approx;

pub mod data;
pub mod feature;
pub mod inference;
pub mod model;
pub mod persist;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use data::{Record, RecordBuilder, Value};
pub use feature::{Feature, FeatureKind, FeatureRegistry, OutcomeKey, SplitArg};
pub use inference::{classify, Accuracy, Classifier, ClassifyError};
pub use model::TreeModel;
pub use repr::TreeNode;
pub use training::{train, TrainError, TreeParams, Verbosity};

// Shared utilities
pub use utils::{run_with_threads, Parallelism};
