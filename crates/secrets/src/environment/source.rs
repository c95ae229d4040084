//! Named configuration layers and their ordered list.
//!
//! Invariants:
//! - Layer names are unique within a `PropertySources`; adding a layer whose
//!   name already exists removes the old one first.
//! - Index 0 has the highest precedence.

use std::collections::BTreeMap;

use crate::error::SecretsError;

/// One named key-value layer of an [`Environment`](super::Environment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySource {
    name: String,
    properties: BTreeMap<String, String>,
}

impl PropertySource {
    pub fn new(name: impl Into<String>, properties: BTreeMap<String, String>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, BTreeMap::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn contains_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn into_properties(self) -> BTreeMap<String, String> {
        self.properties
    }

    pub(crate) fn properties_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.properties
    }
}

/// Ordered list of layers, highest precedence first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySources {
    sources: Vec<PropertySource>,
}

impl PropertySources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&PropertySource> {
        self.sources.iter().find(|source| source.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut PropertySource> {
        self.sources.iter_mut().find(|source| source.name == name)
    }

    /// Add a layer with the highest precedence.
    pub fn add_first(&mut self, source: PropertySource) {
        self.remove(&source.name);
        self.sources.insert(0, source);
    }

    /// Add a layer with the lowest precedence.
    pub fn add_last(&mut self, source: PropertySource) {
        self.remove(&source.name);
        self.sources.push(source);
    }

    /// Add a layer with precedence immediately lower than `anchor`.
    pub fn add_after(&mut self, anchor: &str, source: PropertySource) -> Result<(), SecretsError> {
        self.insert_relative(anchor, source, 1)
    }

    /// Add a layer with precedence immediately higher than `anchor`.
    pub fn add_before(&mut self, anchor: &str, source: PropertySource) -> Result<(), SecretsError> {
        self.insert_relative(anchor, source, 0)
    }

    fn insert_relative(
        &mut self,
        anchor: &str,
        source: PropertySource,
        offset: usize,
    ) -> Result<(), SecretsError> {
        if anchor == source.name {
            return Err(SecretsError::invalid_argument(
                "anchor",
                format!("property source '{anchor}' cannot be added relative to itself"),
            ));
        }
        if !self.contains(anchor) {
            return Err(SecretsError::MissingPropertySource(anchor.to_string()));
        }
        self.remove(&source.name);
        let index = self
            .position(anchor)
            .ok_or_else(|| SecretsError::MissingPropertySource(anchor.to_string()))?;
        self.sources.insert(index + offset, source);
        Ok(())
    }

    /// Replace the layer called `name`, keeping its position.
    pub fn replace(&mut self, name: &str, source: PropertySource) -> Result<(), SecretsError> {
        let index = self
            .position(name)
            .ok_or_else(|| SecretsError::MissingPropertySource(name.to_string()))?;
        self.sources[index] = source;
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertySource> {
        self.position(name).map(|index| self.sources.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertySource> {
        self.sources.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(PropertySource::name).collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.sources.iter().position(|source| source.name == name)
    }
}
