//! Conversion between runtime trees and schema types.
//!
//! Export is infallible (`From`). Import resolves feature names through a
//! [`FeatureRegistry`] and checks every argument and outcome key against the
//! resolved feature's kind.

use std::collections::HashSet;

use super::error::ReadError;
use super::schema::{ArgSchema, BranchSchema, KeySchema, ModelSchema, NodeSchema, FORMAT_VERSION};
use crate::feature::{Feature, FeatureKind, FeatureRegistry, OutcomeKey, SplitArg};
use crate::model::TreeModel;
use crate::repr::TreeNode;

// =============================================================================
// Export
// =============================================================================

impl From<&SplitArg> for Option<ArgSchema> {
    fn from(arg: &SplitArg) -> Self {
        match arg {
            SplitArg::None => None,
            SplitArg::Token(t) => Some(ArgSchema::Text(t.clone())),
            SplitArg::Threshold(t) => Some(ArgSchema::Number(*t)),
        }
    }
}

impl From<&OutcomeKey> for Option<KeySchema> {
    fn from(key: &OutcomeKey) -> Self {
        match key {
            OutcomeKey::Category(v) => v.clone().map(KeySchema::Text),
            OutcomeKey::Member(b) => Some(KeySchema::Bool(*b)),
            OutcomeKey::Lt => Some(KeySchema::Text(OutcomeKey::LT.into())),
            OutcomeKey::Ge => Some(KeySchema::Text(OutcomeKey::GE.into())),
            OutcomeKey::Undefined => Some(KeySchema::Text(OutcomeKey::UNDEFINED.into())),
        }
    }
}

impl From<&TreeNode> for NodeSchema {
    fn from(node: &TreeNode) -> Self {
        match node {
            TreeNode::Leaf { label } => NodeSchema::Leaf(label.clone()),
            TreeNode::Branch(b) => NodeSchema::Branch(BranchSchema(
                b.feature().name().to_string(),
                b.arg().into(),
                b.children()
                    .iter()
                    .map(|(key, child)| (key.into(), child.into()))
                    .collect(),
            )),
        }
    }
}

impl From<&TreeModel> for ModelSchema {
    fn from(model: &TreeModel) -> Self {
        ModelSchema {
            version: FORMAT_VERSION,
            params: model.params().clone(),
            tree: model.tree().into(),
        }
    }
}

// =============================================================================
// Import
// =============================================================================

fn import_arg(feature: &Feature, arg: Option<ArgSchema>) -> Result<SplitArg, ReadError> {
    let arg = match arg {
        None => SplitArg::None,
        Some(ArgSchema::Text(t)) => SplitArg::Token(t),
        Some(ArgSchema::Number(t)) => SplitArg::Threshold(t),
    };
    let finite = !matches!(arg, SplitArg::Threshold(t) if !t.is_finite());
    if !finite || !feature.kind().accepts(&arg) {
        return Err(ReadError::InvalidArgument {
            feature: feature.name().to_string(),
            arg: arg.to_string(),
        });
    }
    Ok(arg)
}

fn import_key(feature: &Feature, key: Option<KeySchema>) -> Result<OutcomeKey, ReadError> {
    let imported = match (feature.kind(), &key) {
        (FeatureKind::Discrete | FeatureKind::DiscreteFirst, None) => Some(OutcomeKey::Category(None)),
        (FeatureKind::Discrete | FeatureKind::DiscreteFirst, Some(KeySchema::Text(v))) => {
            Some(OutcomeKey::Category(Some(v.clone())))
        }
        (FeatureKind::Membership, Some(KeySchema::Bool(b))) => Some(OutcomeKey::Member(*b)),
        (FeatureKind::Quantitative, Some(KeySchema::Text(v))) => match v.as_str() {
            OutcomeKey::LT => Some(OutcomeKey::Lt),
            OutcomeKey::GE => Some(OutcomeKey::Ge),
            OutcomeKey::UNDEFINED => Some(OutcomeKey::Undefined),
            _ => None,
        },
        _ => None,
    };
    imported.ok_or_else(|| ReadError::InvalidOutcome {
        feature: feature.name().to_string(),
        key: match key {
            None => "null".to_string(),
            Some(KeySchema::Bool(b)) => b.to_string(),
            Some(KeySchema::Text(v)) => format!("{v:?}"),
        },
    })
}

/// Rebuild a runtime tree, resolving feature names through `registry`.
///
/// # Errors
///
/// - [`ReadError::UnknownFeature`] for a feature name missing from `registry`
/// - [`ReadError::InvalidArgument`] / [`ReadError::InvalidOutcome`] when an
///   argument or key does not fit the feature's kind
/// - [`ReadError::DuplicateOutcome`] when a branch repeats an outcome key
/// - [`ReadError::Validation`] for a branch without children
pub fn import_tree(schema: NodeSchema, registry: &FeatureRegistry) -> Result<TreeNode, ReadError> {
    match schema {
        NodeSchema::Leaf(label) => Ok(TreeNode::leaf(label)),
        NodeSchema::Branch(BranchSchema(name, arg, children)) => {
            let feature = registry.resolve(&name)?;
            if children.is_empty() {
                return Err(ReadError::Validation(format!(
                    "branch on {name:?} has no children"
                )));
            }
            let arg = import_arg(&feature, arg)?;

            let mut seen = HashSet::with_capacity(children.len());
            let children = children
                .into_iter()
                .map(|(key, child)| {
                    let key = import_key(&feature, key)?;
                    if !seen.insert(key.clone()) {
                        return Err(ReadError::DuplicateOutcome {
                            feature: name.clone(),
                            key: key.to_string(),
                        });
                    }
                    Ok((key, import_tree(child, registry)?))
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(TreeNode::branch(feature, arg, children))
        }
    }
}

/// Rebuild a model from its envelope.
///
/// # Errors
///
/// [`ReadError::UnsupportedVersion`] for a newer format, [`ReadError::Validation`]
/// for invalid parameters, plus every error of [`import_tree`].
pub fn import_model(schema: ModelSchema, registry: &FeatureRegistry) -> Result<TreeModel, ReadError> {
    if schema.version != FORMAT_VERSION {
        return Err(ReadError::UnsupportedVersion(schema.version));
    }
    schema
        .params
        .validate()
        .map_err(|e| ReadError::Validation(e.to_string()))?;
    let tree = import_tree(schema.tree, registry)?;
    Ok(TreeModel::from_parts(schema.params, tree))
}
