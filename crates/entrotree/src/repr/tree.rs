//! Tree nodes, traversal and inspection.

use std::fmt;
use std::sync::Arc;

use crate::data::Record;
use crate::feature::{Feature, OutcomeKey, SplitArg};
use crate::inference::ClassifyError;

// ============================================================================
// TreeNode
// ============================================================================

/// A node of a learned decision tree.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// Internal node: route the record by its outcome key.
    Branch(Branch),
    /// Terminal node: predict `label`.
    Leaf { label: String },
}

/// An internal node splitting on one feature.
///
/// Children are kept in creation order; outcome keys are unique.
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    feature: Arc<Feature>,
    arg: SplitArg,
    children: Vec<(OutcomeKey, TreeNode)>,
}

impl Branch {
    /// Create a branch.
    ///
    /// Callers are responsible for unique outcome keys; the first child with
    /// a given key wins during traversal.
    pub fn new(feature: Arc<Feature>, arg: SplitArg, children: Vec<(OutcomeKey, TreeNode)>) -> Self {
        Self {
            feature,
            arg,
            children,
        }
    }

    #[inline]
    pub fn feature(&self) -> &Arc<Feature> {
        &self.feature
    }

    #[inline]
    pub fn arg(&self) -> &SplitArg {
        &self.arg
    }

    /// Children in creation order.
    #[inline]
    pub fn children(&self) -> &[(OutcomeKey, TreeNode)] {
        &self.children
    }

    /// The child for an outcome key.
    pub fn child(&self, key: &OutcomeKey) -> Option<&TreeNode> {
        self.children
            .iter()
            .find_map(|(k, node)| (k == key).then_some(node))
    }

    /// Select the child a record descends into.
    pub fn route(&self, record: &Record) -> Result<&TreeNode, ClassifyError> {
        let key = self.feature.ident(&self.arg, record);
        self.child(&key).ok_or_else(|| ClassifyError::UnknownOutcome {
            feature: self.feature.name().to_string(),
            key,
        })
    }
}

impl TreeNode {
    /// Create a leaf.
    pub fn leaf(label: impl Into<String>) -> Self {
        TreeNode::Leaf {
            label: label.into(),
        }
    }

    /// Create a branch node.
    pub fn branch(
        feature: Arc<Feature>,
        arg: SplitArg,
        children: Vec<(OutcomeKey, TreeNode)>,
    ) -> Self {
        TreeNode::Branch(Branch::new(feature, arg, children))
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// The label of a leaf, `None` for branches.
    pub fn label(&self) -> Option<&str> {
        match self {
            TreeNode::Leaf { label } => Some(label),
            TreeNode::Branch(_) => None,
        }
    }

    /// Traverse from this node to the leaf the record reaches.
    ///
    /// Fails with [`ClassifyError::UnknownOutcome`] when a branch has no
    /// child for the record's outcome key (a categorical value or token the
    /// tree never saw during training).
    pub fn traverse_to_leaf(&self, record: &Record) -> Result<&TreeNode, ClassifyError> {
        let mut node = self;
        while let TreeNode::Branch(branch) = node {
            node = branch.route(record)?;
        }
        Ok(node)
    }

    /// Predict the label of a record.
    pub fn classify(&self, record: &Record) -> Result<&str, ClassifyError> {
        match self.traverse_to_leaf(record)? {
            TreeNode::Leaf { label } => Ok(label),
            TreeNode::Branch(_) => unreachable!("traversal ends at a leaf"),
        }
    }

    /// Depth of the tree; a single leaf has depth 1.
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Branch(b) => 1 + b.children.iter().map(|(_, c)| c.depth()).max().unwrap_or(0),
        }
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Branch(b) => b.children.iter().map(|(_, c)| c.n_leaves()).sum(),
        }
    }

    /// Number of branches.
    pub fn n_branches(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Branch(b) => 1 + b.children.iter().map(|(_, c)| c.n_branches()).sum::<usize>(),
        }
    }

    /// Total number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.n_leaves() + self.n_branches()
    }

    /// Names of the features used by any branch, in first-use order.
    pub fn used_features(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_features(&mut names);
        names
    }

    fn collect_features<'a>(&'a self, names: &mut Vec<&'a str>) {
        if let TreeNode::Branch(b) = self {
            if !names.contains(&b.feature.name()) {
                names.push(b.feature.name());
            }
            for (_, child) in &b.children {
                child.collect_features(names);
            }
        }
    }

    fn dump(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            TreeNode::Leaf { label } => writeln!(f, "{indent}Leaf {label:?}"),
            TreeNode::Branch(b) => {
                writeln!(f, "{indent}Branch {}: {}", b.feature, b.arg)?;
                for (key, child) in &b.children {
                    writeln!(f, "{indent} Value: {key} ->")?;
                    child.dump(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

/// Indented, human-readable dump of the tree.
impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f, 0)
    }
}
