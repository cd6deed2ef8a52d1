//! Decision tree model.
//!
//! Access components via [`tree()`](TreeModel::tree) and
//! [`params()`](TreeModel::params).

use std::fmt;

use crate::data::Record;
use crate::feature::FeatureRegistry;
use crate::inference::{Accuracy, Classifier, ClassifyError};
use crate::repr::TreeNode;
use crate::training::{train, TrainError, TreeParams};
use crate::utils::Parallelism;

/// A learned decision tree together with the parameters it was trained with.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeModel {
    params: TreeParams,
    tree: TreeNode,
}

impl TreeModel {
    /// Create a model from its parts.
    ///
    /// Used when loading a model or wrapping a tree built by hand.
    pub fn from_parts(params: TreeParams, tree: TreeNode) -> Self {
        Self { params, tree }
    }

    /// Train a new model.
    ///
    /// See [`train`] for the errors this can return.
    pub fn train(
        records: &[Record],
        params: TreeParams,
        registry: &FeatureRegistry,
    ) -> Result<Self, TrainError> {
        let tree = train(records, &params, registry)?;
        Ok(Self { params, tree })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn tree(&self) -> &TreeNode {
        &self.tree
    }

    pub fn params(&self) -> &TreeParams {
        &self.params
    }

    pub fn into_tree(self) -> TreeNode {
        self.tree
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// Predict the label of one record.
    pub fn classify(&self, record: &Record) -> Result<&str, ClassifyError> {
        self.tree.classify(record)
    }

    /// Classify many records, preserving input order.
    ///
    /// Runs in parallel on the current rayon pool unless the model was trained
    /// with `n_threads = 1`.
    pub fn classify_batch(&self, records: &[Record]) -> Vec<Result<&str, ClassifyError>> {
        self.classifier().classify_batch(records)
    }

    /// Score the model on labeled records.
    pub fn accuracy(&self, records: &[Record]) -> Accuracy {
        self.classifier().accuracy(records)
    }

    fn classifier(&self) -> Classifier<'_> {
        Classifier::new(&self.tree)
            .with_parallelism(Parallelism::from_threads(self.params.n_threads))
    }
}

impl fmt::Display for TreeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tree, f)
    }
}
