//! Single and batch classification.

use std::fmt;

use super::ClassifyError;
use crate::data::Record;
use crate::repr::TreeNode;
use crate::utils::Parallelism;

/// Predict the label of one record.
///
/// Equivalent to [`TreeNode::classify`].
#[inline]
pub fn classify<'t>(tree: &'t TreeNode, record: &Record) -> Result<&'t str, ClassifyError> {
    tree.classify(record)
}

// =============================================================================
// Accuracy
// =============================================================================

/// Tally of classification outcomes against known labels.
///
/// Records whose traversal fails with [`ClassifyError::UnknownOutcome`] are
/// counted separately from misclassifications; both count towards the total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Accuracy {
    pub correct: usize,
    pub incorrect: usize,
    pub unknown: usize,
}

impl Accuracy {
    /// Count one prediction against the expected label.
    pub fn observe(&mut self, predicted: Result<&str, &ClassifyError>, expected: &str) {
        match predicted {
            Ok(label) if label == expected => self.correct += 1,
            Ok(_) => self.incorrect += 1,
            Err(_) => self.unknown += 1,
        }
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.correct + self.incorrect + self.unknown
    }

    /// Fraction of correct predictions, `0.0` when nothing was scored.
    pub fn ratio(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.correct as f64 / n as f64,
        }
    }
}

impl std::ops::Add for Accuracy {
    type Output = Accuracy;

    fn add(self, rhs: Accuracy) -> Accuracy {
        Accuracy {
            correct: self.correct + rhs.correct,
            incorrect: self.incorrect + rhs.incorrect,
            unknown: self.unknown + rhs.unknown,
        }
    }
}

/// Prints `correct/total`.
impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.total())
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Batch classifier over a learned tree.
///
/// # Example
///
/// ```
/// use entrotree::data::Record;
/// use entrotree::inference::Classifier;
/// use entrotree::repr::TreeNode;
/// use entrotree::utils::Parallelism;
///
/// let tree = TreeNode::leaf("meta");
/// let records = vec![Record::builder().label("meta").build()];
///
/// let classifier = Classifier::new(&tree).with_parallelism(Parallelism::Sequential);
/// assert_eq!(classifier.accuracy(&records).correct, 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'t> {
    tree: &'t TreeNode,
    parallelism: Parallelism,
}

impl<'t> Classifier<'t> {
    /// Sequential classifier over `tree`.
    pub fn new(tree: &'t TreeNode) -> Self {
        Self {
            tree,
            parallelism: Parallelism::Sequential,
        }
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.parallelism = parallelism;
        self
    }

    #[inline]
    pub fn tree(&self) -> &'t TreeNode {
        self.tree
    }

    #[inline]
    pub fn classify(&self, record: &Record) -> Result<&'t str, ClassifyError> {
        self.tree.classify(record)
    }

    /// Classify every record, preserving input order.
    pub fn classify_batch(&self, records: &[Record]) -> Vec<Result<&'t str, ClassifyError>> {
        let tree = self.tree;
        self.parallelism
            .maybe_par_map(records, |record| tree.classify(record))
    }

    /// Score the tree on labeled records. Unlabeled records are skipped.
    pub fn accuracy(&self, records: &[Record]) -> Accuracy {
        let tree = self.tree;
        self.parallelism
            .maybe_par_map(records, |record| {
                let mut acc = Accuracy::default();
                if let Some(expected) = record.label() {
                    acc.observe(tree.classify(record).as_ref().copied(), expected);
                }
                acc
            })
            .into_iter()
            .fold(Accuracy::default(), |a, b| a + b)
    }
}
