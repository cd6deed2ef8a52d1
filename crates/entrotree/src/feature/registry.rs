//! Name → feature lookup shared by training and persistence.

use std::collections::HashMap;
use std::sync::Arc;

use super::Feature;

/// Errors raised when registering or resolving features.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("feature {0:?} is already registered")]
    Duplicate(String),
    #[error("unknown feature {0:?}")]
    Unknown(String),
}

/// Registry of known features, resolved by name.
///
/// Built once at process start and passed explicitly to training and to tree
/// import, so every branch that splits on a feature shares the same
/// [`Arc<Feature>`].
///
/// # Example
///
/// ```
/// use entrotree::feature::{Feature, FeatureRegistry};
///
/// let mut registry = FeatureRegistry::new();
/// registry.register(Feature::quantitative("deltaLine", "deltaLine")).unwrap();
/// assert!(registry.get("deltaLine").is_some());
/// assert!(registry.register(Feature::discrete("deltaLine", "x")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeatureRegistry {
    features: Vec<Arc<Feature>>,
    by_name: HashMap<String, usize>,
}

impl FeatureRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The features used for comment classification.
    ///
    /// | Name           | Kind | Field         |
    /// |----------------|------|---------------|
    /// | `type`         | DF   | `type`        |
    /// | `deltaLine`    | QF   | `deltaLine`   |
    /// | `deltaCols`    | QF   | `deltaCols`   |
    /// | `parentStart`  | DF   | `parentStart` |
    /// | `parentEnd`    | DF   | `parentEnd`   |
    /// | `parentTypes1` | DF1  | `parentTypes` |
    /// | `parentTypesA` | MF   | `parentTypes` |
    /// | `leftTypes1`   | DF1  | `leftTypes`   |
    /// | `leftTypesA`   | MF   | `leftTypes`   |
    /// | `rightTypes1`  | DF1  | `rightTypes`  |
    /// | `rightTypesA`  | MF   | `rightTypes`  |
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for feature in [
            Feature::discrete("type", "type"),
            Feature::quantitative("deltaLine", "deltaLine"),
            Feature::quantitative("deltaCols", "deltaCols"),
            Feature::discrete("parentStart", "parentStart"),
            Feature::discrete("parentEnd", "parentEnd"),
            Feature::discrete_first("parentTypes1", "parentTypes"),
            Feature::membership("parentTypesA", "parentTypes"),
            Feature::discrete_first("leftTypes1", "leftTypes"),
            Feature::membership("leftTypesA", "leftTypes"),
            Feature::discrete_first("rightTypes1", "rightTypes"),
            Feature::membership("rightTypesA", "rightTypes"),
        ] {
            registry.push(feature);
        }
        registry
    }

    /// Add a feature. Names must be unique.
    pub fn register(&mut self, feature: Feature) -> Result<Arc<Feature>, RegistryError> {
        if self.by_name.contains_key(feature.name()) {
            return Err(RegistryError::Duplicate(feature.name().to_string()));
        }
        Ok(self.push(feature))
    }

    fn push(&mut self, feature: Feature) -> Arc<Feature> {
        let feature = Arc::new(feature);
        self.by_name
            .insert(feature.name().to_string(), self.features.len());
        self.features.push(Arc::clone(&feature));
        feature
    }

    /// Look up a feature by name.
    pub fn get(&self, name: &str) -> Option<&Arc<Feature>> {
        self.by_name.get(name).map(|&i| &self.features[i])
    }

    /// Look up a feature by name, failing if it is unknown.
    pub fn resolve(&self, name: &str) -> Result<Arc<Feature>, RegistryError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| RegistryError::Unknown(name.to_string()))
    }

    /// Resolve an ordered list of names.
    pub fn resolve_all<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<Vec<Arc<Feature>>, RegistryError> {
        names.iter().map(|n| self.resolve(n.as_ref())).collect()
    }

    /// Feature names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.features.iter().map(|f| f.name())
    }

    /// Features in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Feature>> + '_ {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureKind;

    #[test]
    fn standard_registry_contents() {
        let registry = FeatureRegistry::standard();
        assert_eq!(registry.len(), 11);
        assert_eq!(registry.names().next(), Some("type"));
        assert_eq!(
            registry.get("parentTypesA").map(|f| f.kind()),
            Some(FeatureKind::Membership)
        );
        assert_eq!(registry.get("leftTypes1").map(|f| f.attr()), Some("leftTypes"));
        assert_eq!(
            registry.get("deltaCols").map(|f| f.kind()),
            Some(FeatureKind::Quantitative)
        );
    }

    #[test]
    fn resolve_shares_instances() {
        let registry = FeatureRegistry::standard();
        let a = registry.resolve("type").unwrap();
        let b = registry.resolve("type").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn resolve_unknown_fails() {
        let registry = FeatureRegistry::standard();
        assert_eq!(
            registry.resolve("nope").unwrap_err(),
            RegistryError::Unknown("nope".into())
        );
        assert!(registry.resolve_all(&["type", "nope"]).is_err());
        assert_eq!(registry.resolve_all(&["type", "deltaLine"]).unwrap().len(), 2);
    }

    #[test]
    fn duplicate_names_rejected() {
        let mut registry = FeatureRegistry::new();
        assert!(registry.is_empty());
        registry.register(Feature::discrete("x", "x")).unwrap();
        assert_eq!(
            registry.register(Feature::membership("x", "y")).unwrap_err(),
            RegistryError::Duplicate("x".into())
        );
        assert_eq!(registry.len(), 1);
    }
}
