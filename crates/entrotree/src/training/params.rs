//! Tree learner configuration.
//!
//! # Example
//!
//! ```
//! use entrotree::training::{TreeParams, Verbosity};
//!
//! // All defaults: every standard feature, min_records = 10, min_entropy = 0.05
//! let params = TreeParams::builder().build().unwrap();
//! assert_eq!(params.min_records, 10);
//!
//! let params = TreeParams::builder()
//!     .features(vec!["type".into(), "deltaLine".into()])
//!     .min_entropy(0.1)
//!     .n_threads(0)
//!     .verbosity(Verbosity::Debug)
//!     .build()
//!     .unwrap();
//! assert_eq!(params.features.len(), 2);
//!
//! assert!(TreeParams::builder().min_entropy(-1.0).build().is_err());
//! ```

use std::collections::HashSet;

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::Verbosity;
use crate::feature::FeatureRegistry;

/// Default minimum number of records a node needs to be split.
pub const DEFAULT_MIN_RECORDS: usize = 10;
/// Default label entropy (bits) below which a node becomes a leaf.
pub const DEFAULT_MIN_ENTROPY: f64 = 0.05;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `min_entropy` must be finite and non-negative.
    #[error("min_entropy must be finite and non-negative, got {0}")]
    InvalidMinEntropy(f64),
    /// At least one feature must be enabled.
    #[error("at least one feature must be enabled")]
    NoFeatures,
    /// Each feature may only be listed once.
    #[error("feature {0:?} is listed more than once")]
    DuplicateFeature(String),
}

// =============================================================================
// TreeParams
// =============================================================================

/// Configuration for learning one decision tree.
///
/// Uses the `bon` builder; [`TreeParamsBuilder::build`] validates.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(derive(Clone, Debug), finish_fn(vis = "", name = __build_internal))]
#[serde(default)]
pub struct TreeParams {
    /// Enabled feature names, in priority order. Earlier features win entropy
    /// ties. Default: every feature of [`FeatureRegistry::standard`].
    #[builder(default = standard_feature_names())]
    pub features: Vec<String>,

    /// Nodes with fewer records become leaves. Default: 10.
    #[builder(default = DEFAULT_MIN_RECORDS)]
    pub min_records: usize,

    /// Nodes whose label entropy is below this become leaves. Default: 0.05.
    #[builder(default = DEFAULT_MIN_ENTROPY)]
    pub min_entropy: f64,

    /// Number of threads. 0 = global rayon pool, 1 = sequential (default),
    /// n > 1 = dedicated pool.
    #[builder(default = 1)]
    pub n_threads: usize,

    /// Verbosity level. Default: `Silent`.
    #[builder(default)]
    pub verbosity: Verbosity,
}

fn standard_feature_names() -> Vec<String> {
    FeatureRegistry::standard().names().map(String::from).collect()
}

impl<S: tree_params_builder::IsComplete> TreeParamsBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `min_entropy` is negative or not finite, or
    /// if the feature list is empty or has duplicates.
    pub fn build(self) -> Result<TreeParams, ConfigError> {
        let params = self.__build_internal();
        params.validate()?;
        Ok(params)
    }
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            features: standard_feature_names(),
            min_records: DEFAULT_MIN_RECORDS,
            min_entropy: DEFAULT_MIN_ENTROPY,
            n_threads: 1,
            verbosity: Verbosity::default(),
        }
    }
}

impl TreeParams {
    /// Validate the configuration.
    ///
    /// Also used on parameters that bypassed the builder (deserialized or
    /// constructed literally).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_entropy.is_finite() || self.min_entropy < 0.0 {
            return Err(ConfigError::InvalidMinEntropy(self.min_entropy));
        }
        if self.features.is_empty() {
            return Err(ConfigError::NoFeatures);
        }
        let mut seen = HashSet::new();
        for name in &self.features {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateFeature(name.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = TreeParams::builder().build().unwrap();
        assert_eq!(params, TreeParams::default());
        assert_eq!(params.features.len(), 11);
        assert_eq!(params.features[0], "type");
        assert_eq!(params.min_records, 10);
        assert_eq!(params.min_entropy, 0.05);
        assert_eq!(params.n_threads, 1);
        assert_eq!(params.verbosity, Verbosity::Silent);
    }

    #[test]
    fn rejects_invalid_min_entropy() {
        for bad in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                TreeParams::builder().min_entropy(bad).build(),
                Err(ConfigError::InvalidMinEntropy(_))
            ));
        }
        assert!(TreeParams::builder().min_entropy(0.0).build().is_ok());
    }

    #[test]
    fn rejects_bad_feature_lists() {
        assert_eq!(
            TreeParams::builder().features(vec![]).build(),
            Err(ConfigError::NoFeatures)
        );
        assert_eq!(
            TreeParams::builder()
                .features(vec!["type".into(), "type".into()])
                .build(),
            Err(ConfigError::DuplicateFeature("type".into()))
        );
    }

    #[test]
    fn serde_fills_missing_fields() {
        let params: TreeParams =
            serde_json::from_str(r#"{"min_records": 3, "verbosity": "debug"}"#).unwrap();
        assert_eq!(params.min_records, 3);
        assert_eq!(params.verbosity, Verbosity::Debug);
        assert_eq!(params.min_entropy, DEFAULT_MIN_ENTROPY);
        assert_eq!(params.features.len(), 11);
    }
}
