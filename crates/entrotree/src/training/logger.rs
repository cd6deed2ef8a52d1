//! Verbosity-gated training trace.
//!
//! Events are emitted through `tracing`; install a subscriber (for example
//! `tracing_subscriber::fmt`) to see them. Nothing is emitted at
//! [`Verbosity::Silent`], regardless of the subscriber's filter.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::entropy::LabelCounts;
use crate::feature::{Feature, SplitArg};
use crate::repr::TreeNode;

/// How much the trainer reports.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// No output.
    #[default]
    Silent,
    /// Degenerate training inputs only.
    Warning,
    /// Start and end-of-training summaries.
    Info,
    /// Every node: distribution, stop reason, selected split.
    Debug,
}

/// Why a node became a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Label entropy is below `min_entropy`.
    LowEntropy,
    /// Fewer than `min_records` records reached the node.
    TooFewRecords,
    /// Every record carries the same label.
    SingleLabel,
    /// No enabled feature can split the records.
    NoDiscerningFeature,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::LowEntropy => "too little entropy",
            StopReason::TooFewRecords => "too few records",
            StopReason::SingleLabel => "single label",
            StopReason::NoDiscerningFeature => "no discerning feature",
        })
    }
}

/// Training logger.
///
/// Shared by reference across parallel subtree builds, so every method
/// takes `&self`.
#[derive(Debug, Clone)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    started: Instant,
}

impl TrainingLogger {
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            started: Instant::now(),
        }
    }

    #[inline]
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    #[inline]
    fn enabled(&self, level: Verbosity) -> bool {
        level != Verbosity::Silent && self.verbosity >= level
    }

    /// Reset the clock and report the training set size.
    pub fn start_training(&mut self, n_records: usize, features: &[std::sync::Arc<Feature>]) {
        self.started = Instant::now();
        if self.enabled(Verbosity::Info) {
            let names: Vec<&str> = features.iter().map(|f| f.name()).collect();
            tracing::info!(n_records, features = ?names, "training decision tree");
        }
    }

    pub fn warn_single_label(&self, label: &str, n_records: usize) {
        if self.enabled(Verbosity::Warning) {
            tracing::warn!(label, n_records, "training set has a single label");
        }
    }

    pub fn log_node(&self, depth: usize, counts: &LabelCounts<'_>, entropy: f64) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(depth, n_records = counts.total(), entropy, "node {}", counts);
        }
    }

    pub fn log_leaf(&self, depth: usize, reason: StopReason, label: &str) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(depth, %reason, label, "leaf");
        }
    }

    pub fn log_split(
        &self,
        depth: usize,
        feature: &Feature,
        arg: &SplitArg,
        entropy: f64,
        sizes: &[usize],
    ) {
        if self.enabled(Verbosity::Debug) {
            tracing::debug!(depth, feature = %feature, %arg, entropy, ?sizes, "split");
        }
    }

    /// Summarize the learned tree.
    pub fn finish_training(&self, tree: &TreeNode) {
        if self.enabled(Verbosity::Info) {
            tracing::info!(
                depth = tree.depth(),
                n_leaves = tree.n_leaves(),
                n_branches = tree.n_branches(),
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "training finished"
            );
        }
    }
}
