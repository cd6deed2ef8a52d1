//! Schema types for tree serialization.
//!
//! These types mirror the portable nested-tuple form of a tree and are kept
//! separate from the runtime [`TreeNode`](crate::repr::TreeNode) so that
//! imports can be validated against a feature registry before any runtime
//! node is built.
//!
//! JSON shape:
//!
//! ```text
//! node   := label | [feature_name, arg, [[key, node], ...]]
//! arg    := number | string | null
//! key    := string | bool | null
//! ```

use serde::{Deserialize, Serialize};

use crate::training::TreeParams;

/// Current envelope format version.
pub const FORMAT_VERSION: u32 = 1;

/// A serialized tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSchema {
    /// A leaf is its bare label.
    Leaf(String),
    /// `[feature_name, arg, children]`.
    Branch(BranchSchema),
}

/// `(feature_name, arg, [(key, child), ...])`, children in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchSchema(
    pub String,
    pub Option<ArgSchema>,
    pub Vec<(Option<KeySchema>, NodeSchema)>,
);

/// Branch argument: a threshold or a membership token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgSchema {
    Number(f64),
    Text(String),
}

/// Outcome key. Discrete categories and `lt`/`ge`/`un` are text, membership
/// outcomes are booleans, and an absent discrete value is `null`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySchema {
    Bool(bool),
    Text(String),
}

/// Versioned model envelope: the tree together with its training parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub version: u32,
    pub params: TreeParams,
    pub tree: NodeSchema,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let node = NodeSchema::Branch(BranchSchema(
            "deltaLine".into(),
            Some(ArgSchema::Number(2.5)),
            vec![
                (Some(KeySchema::Text("lt".into())), NodeSchema::Leaf("a".into())),
                (Some(KeySchema::Text("ge".into())), NodeSchema::Leaf("b".into())),
            ],
        ));
        let json = serde_json::to_string(&node).unwrap();
        assert_eq!(json, r#"["deltaLine",2.5,[["lt","a"],["ge","b"]]]"#);
        assert_eq!(serde_json::from_str::<NodeSchema>(&json).unwrap(), node);
    }

    #[test]
    fn null_and_bool_keys() {
        let json = r#"["parentTypesA","Block",[[true,["type",null,[[null,"x"]]]],[false,"y"]]]"#;
        let node: NodeSchema = serde_json::from_str(json).unwrap();
        let NodeSchema::Branch(BranchSchema(name, arg, children)) = &node else {
            panic!("expected branch");
        };
        assert_eq!(name, "parentTypesA");
        assert_eq!(arg, &Some(ArgSchema::Text("Block".into())));
        assert_eq!(children[0].0, Some(KeySchema::Bool(true)));
        assert!(matches!(
            &children[0].1,
            NodeSchema::Branch(BranchSchema(_, None, inner)) if inner[0].0.is_none()
        ));
        assert_eq!(serde_json::to_string(&node).unwrap(), json);
    }

    #[test]
    fn bare_leaf() {
        let node: NodeSchema = serde_json::from_str(r#""meta""#).unwrap();
        assert_eq!(node, NodeSchema::Leaf("meta".into()));
    }
}
