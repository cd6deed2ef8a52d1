//! Greedy recursive tree construction.

use std::sync::Arc;

use super::entropy::LabelCounts;
use super::logger::{StopReason, TrainingLogger};
use super::params::TreeParams;
use super::TrainError;
use crate::data::LabeledRecord;
use crate::feature::{Feature, FeatureRegistry, Split};
use crate::repr::TreeNode;
use crate::utils::Parallelism;

/// Builds a decision tree by repeatedly choosing the feature split with the
/// lowest weighted child entropy.
///
/// At every node:
/// 1. Stop with a majority leaf if the label entropy is below `min_entropy`,
///    fewer than `min_records` records remain, or only one label is left.
/// 2. Ask every enabled feature for its best split; features that cannot
///    split are skipped.
/// 3. Keep the split with the lowest entropy. Earlier features win ties.
/// 4. Stop with a majority leaf if no feature could split, otherwise recurse
///    into each partition.
///
/// Every split yields at least two non-empty partitions, so children always
/// see strictly fewer records than their parent and recursion terminates.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    features: Vec<Arc<Feature>>,
    min_records: usize,
    min_entropy: f64,
    parallelism: Parallelism,
    logger: TrainingLogger,
}

impl TreeBuilder {
    /// Resolve `params.features` against `registry`.
    ///
    /// The builder starts out sequential; see [`TreeBuilder::with_parallelism`].
    pub fn new(params: &TreeParams, registry: &FeatureRegistry) -> Result<Self, TrainError> {
        params.validate()?;
        Ok(Self {
            features: registry.resolve_all(&params.features)?,
            min_records: params.min_records,
            min_entropy: params.min_entropy,
            parallelism: Parallelism::Sequential,
            logger: TrainingLogger::new(params.verbosity),
        })
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    /// Enabled features in priority order.
    #[inline]
    pub fn features(&self) -> &[Arc<Feature>] {
        &self.features
    }

    /// Learn a tree from labeled records.
    ///
    /// # Errors
    ///
    /// [`TrainError::EmptyTrainingSet`] if `records` is empty.
    pub fn build(&mut self, records: &[LabeledRecord<'_>]) -> Result<TreeNode, TrainError> {
        if records.is_empty() {
            return Err(TrainError::EmptyTrainingSet);
        }
        self.logger.start_training(records.len(), &self.features);

        let counts = LabelCounts::from_records(records);
        if counts.n_distinct() == 1 {
            if let Some(label) = counts.majority() {
                self.logger.warn_single_label(label, records.len());
            }
        }

        let tree = self.build_node(records, 0);
        self.logger.finish_training(&tree);
        Ok(tree)
    }

    fn build_node(&self, records: &[LabeledRecord<'_>], depth: usize) -> TreeNode {
        let counts = LabelCounts::from_records(records);
        let entropy = counts.entropy();
        self.logger.log_node(depth, &counts, entropy);

        // Non-empty input always has a majority label.
        let majority = counts.majority().unwrap_or_default();
        let leaf = |reason: StopReason| {
            self.logger.log_leaf(depth, reason, majority);
            TreeNode::leaf(majority)
        };

        if entropy < self.min_entropy {
            return leaf(StopReason::LowEntropy);
        }
        if records.len() < self.min_records {
            return leaf(StopReason::TooFewRecords);
        }
        if counts.n_distinct() < 2 {
            return leaf(StopReason::SingleLabel);
        }

        let Some((feature, split)) = self.best_split(records) else {
            return leaf(StopReason::NoDiscerningFeature);
        };
        self.logger
            .log_split(depth, feature, &split.arg, split.entropy, &split.sizes());

        let partitions: Vec<_> = split
            .partitions
            .into_iter()
            .filter(|(_, part)| !part.is_empty())
            .collect();
        let children = self.parallelism.maybe_par_map(partitions, |(key, part)| {
            (key, self.build_node(&part, depth + 1))
        });
        TreeNode::branch(Arc::clone(feature), split.arg, children)
    }

    /// The lowest-entropy split over all enabled features.
    ///
    /// Features are evaluated in parallel when allowed; the winner is chosen
    /// in feature order so the result does not depend on scheduling.
    pub fn best_split<'r>(
        &self,
        records: &[LabeledRecord<'r>],
    ) -> Option<(&Arc<Feature>, Split<'r>)> {
        let candidates = self
            .parallelism
            .maybe_par_map(&self.features, |feature| feature.split(records));

        let mut best: Option<(&Arc<Feature>, Split<'r>)> = None;
        for (feature, split) in self.features.iter().zip(candidates) {
            let Some(split) = split else { continue };
            if best.as_ref().map_or(true, |(_, b)| split.entropy < b.entropy) {
                best = Some((feature, split));
            }
        }
        best
    }
}
