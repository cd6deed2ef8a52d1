//! Tree and model persistence.
//!
//! Trees are stored in a portable nested form: a branch is
//! `[feature_name, arg, [[key, child], ...]]` and a leaf is its bare label.
//! Models wrap the tree in a versioned envelope together with the parameters
//! it was trained with:
//!
//! ```json
//! { "version": 1, "params": { ... }, "tree": ["deltaLine", 2.5, [["lt", "a"], ["ge", "b"]]] }
//! ```
//!
//! Reading always goes through a [`FeatureRegistry`] so re-hydrated branches
//! share the feature instances used at training time.
//!
//! # Example
//!
//! ```
//! use entrotree::feature::FeatureRegistry;
//! use entrotree::persist::{read_tree_json, write_tree_json};
//!
//! let registry = FeatureRegistry::standard();
//! let json = br#"["type", null, [["Line", "instruction"], ["Block", "meta"]]]"#;
//! let tree = read_tree_json(&json[..], &registry).unwrap();
//!
//! let mut out = Vec::new();
//! write_tree_json(&tree, &mut out).unwrap();
//! assert_eq!(read_tree_json(&out[..], &registry).unwrap(), tree);
//! ```

mod convert;
mod error;
mod schema;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::Deserialize;

pub use convert::{import_model, import_tree};
pub use error::{ReadError, WriteError};
pub use schema::{ArgSchema, BranchSchema, KeySchema, ModelSchema, NodeSchema, FORMAT_VERSION};

use crate::feature::FeatureRegistry;
use crate::model::TreeModel;
use crate::repr::TreeNode;

// =============================================================================
// JSON parsing
// =============================================================================

/// Parse a whole JSON document without a nesting limit.
///
/// Every tree level nests three arrays, so a learned tree can be far deeper
/// than serde_json's default limit allows. The stack grows on the heap as
/// needed instead.
fn parse_json<'de, R, T>(read: R) -> Result<T, serde_json::Error>
where
    R: serde_json::de::Read<'de>,
    T: Deserialize<'de>,
{
    let mut de = serde_json::Deserializer::new(read);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

// =============================================================================
// Bare trees
// =============================================================================

/// Convert a tree to its schema form.
pub fn export_tree(tree: &TreeNode) -> NodeSchema {
    NodeSchema::from(tree)
}

/// Write a bare tree as JSON.
pub fn write_tree_json<W: Write>(tree: &TreeNode, writer: W) -> Result<(), WriteError> {
    serde_json::to_writer(writer, &export_tree(tree))?;
    Ok(())
}

/// Read a bare tree from JSON.
pub fn read_tree_json<R: Read>(reader: R, registry: &FeatureRegistry) -> Result<TreeNode, ReadError> {
    let schema: NodeSchema = parse_json(serde_json::de::IoRead::new(reader))?;
    import_tree(schema, registry)
}

/// Serialize a bare tree to a JSON string.
pub fn tree_to_json(tree: &TreeNode) -> Result<String, WriteError> {
    Ok(serde_json::to_string(&export_tree(tree))?)
}

/// Parse a bare tree from a JSON string.
pub fn tree_from_json(json: &str, registry: &FeatureRegistry) -> Result<TreeNode, ReadError> {
    let schema: NodeSchema = parse_json(serde_json::de::StrRead::new(json))?;
    import_tree(schema, registry)
}

// =============================================================================
// Model envelope
// =============================================================================

impl TreeModel {
    /// Write the model envelope as JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), WriteError> {
        serde_json::to_writer(writer, &ModelSchema::from(self))?;
        Ok(())
    }

    /// Write the model envelope as indented JSON.
    pub fn write_json_pretty<W: Write>(&self, writer: W) -> Result<(), WriteError> {
        serde_json::to_writer_pretty(writer, &ModelSchema::from(self))?;
        Ok(())
    }

    /// Read a model envelope from JSON.
    pub fn read_json<R: Read>(reader: R, registry: &FeatureRegistry) -> Result<Self, ReadError> {
        let schema: ModelSchema = parse_json(serde_json::de::IoRead::new(reader))?;
        import_model(schema, registry)
    }

    /// Save the model to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_json(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Load a model from a JSON file.
    pub fn load_json(path: impl AsRef<Path>, registry: &FeatureRegistry) -> Result<Self, ReadError> {
        Self::read_json(BufReader::new(File::open(path)?), registry)
    }
}
