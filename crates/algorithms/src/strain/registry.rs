//! Name to strain method lookup

use std::collections::BTreeMap;
use std::sync::Arc;

use geostrain_core::{Error, Result, StrainMethod};

use super::delaunay::{DelaunayStrain, DELAUNAY_FLAT};

/// Strain methods available to a run, keyed by name
#[derive(Clone, Default)]
pub struct MethodRegistry {
    methods: BTreeMap<String, Arc<dyn StrainMethod>>,
}

impl MethodRegistry {
    /// Registry with no methods
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in method
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let delaunay: Arc<dyn StrainMethod> = Arc::new(DelaunayStrain);
        registry.register_as(DELAUNAY_FLAT, Arc::clone(&delaunay));
        registry.register_as("delaunay", delaunay);
        registry
    }

    /// Add a method under its own name, replacing any previous entry
    pub fn register(&mut self, method: Arc<dyn StrainMethod>) {
        self.register_as(method.name(), method);
    }

    /// Add a method under an explicit key, e.g. an alias
    pub fn register_as(&mut self, key: impl Into<String>, method: Arc<dyn StrainMethod>) {
        self.methods.insert(key.into(), method);
    }

    /// Look up a method by key
    pub fn get(&self, name: &str) -> Result<Arc<dyn StrainMethod>> {
        self.methods
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownMethod {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Registered keys in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.methods.keys().map(String::as_str).collect()
    }

    /// (key, method) pairs in sorted key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn StrainMethod>)> {
        self.methods.iter().map(|(k, m)| (k.as_str(), m))
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.names())
            .finish()
    }
}
