//! Learned classifier representation.
//!
//! A learned tree is a strict ownership tree of [`TreeNode`]s: each
//! [`Branch`] owns its children, leaves hold a predicted label. Trees are
//! immutable once built; persistence reconstructs equivalent trees through
//! [`crate::persist`].

mod tree;

pub use tree::{Branch, TreeNode};
