//! High-level model wrapper.
//!
//! [`TreeModel`] combines training, classification and serialization into a
//! single type. Lower-level building blocks live in [`crate::training`],
//! [`crate::inference`] and [`crate::persist`].
//!
//! # Example
//!
//! ```
//! use entrotree::feature::FeatureRegistry;
//! use entrotree::model::TreeModel;
//! use entrotree::testing::data::synthetic_comments;
//! use entrotree::training::TreeParams;
//!
//! let registry = FeatureRegistry::standard();
//! let records = synthetic_comments(200, 42, 0.0);
//! let model = TreeModel::train(&records, TreeParams::default(), &registry).unwrap();
//!
//! // Save and load
//! let mut buf = Vec::new();
//! model.write_json(&mut buf).unwrap();
//! let loaded = TreeModel::read_json(&buf[..], &registry).unwrap();
//! assert_eq!(loaded.accuracy(&records), model.accuracy(&records));
//! ```

mod tree;

pub use tree::TreeModel;
