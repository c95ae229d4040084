//! Index of `secrets.<infix>.properties.<key>` declarations.
//!
//! The infix lets several instances coexist: `file` declarations point at
//! locations directly, `env` declarations name environment variables.

use super::{PropertyIndex, PropertyIndexSupplier};
use crate::environment::{Environment, PropertyResolver};
use crate::error::SecretsError;

pub struct ConfigDataPropertyIndexSupplier<'e> {
    environment: &'e Environment,
    prefix: String,
}

impl<'e> ConfigDataPropertyIndexSupplier<'e> {
    pub fn new(environment: &'e Environment, infix: &str) -> Result<Self, SecretsError> {
        if infix.trim().is_empty() {
            return Err(SecretsError::invalid_argument("infix", "must not be blank"));
        }
        Ok(Self {
            environment,
            prefix: format!("secrets.{infix}.properties"),
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Strip the namespace from `key`, `None` if the key is not declared under it.
    fn property_name<'k>(&self, key: &'k str) -> Option<&'k str> {
        let rest = key.strip_prefix(self.prefix.as_str())?;
        match rest.strip_prefix('.') {
            Some(property) if !property.is_empty() => Some(property),
            Some(_) => {
                tracing::warn!(property = %key, "Property is too short to assign");
                None
            }
            None if rest.is_empty() => {
                tracing::warn!(property = %key, "Property is too short to assign");
                None
            }
            None => None,
        }
    }
}

impl PropertyIndexSupplier for ConfigDataPropertyIndexSupplier<'_> {
    fn get(&self) -> Result<PropertyIndex, SecretsError> {
        let mut index = PropertyIndex::new();
        let keys = self
            .environment
            .property_sources()
            .iter()
            .flat_map(|source| source.properties().keys());

        for key in keys {
            let Some(property) = self.property_name(key) else {
                continue;
            };
            if index.contains_key(property) {
                continue;
            }
            if let Some(location) = self.environment.get_property(key) {
                index.insert(property.to_string(), location);
            }
        }
        Ok(index)
    }
}
