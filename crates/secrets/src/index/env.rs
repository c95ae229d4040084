//! Index of environment variables naming secret locations.
//!
//! `SPRING_DATASOURCE_PASSWORD_FILE` with suffix `_FILE` becomes the key
//! `spring.datasource.password`. Values are the variable names themselves;
//! wrap the supplier with [`PropertyIndexSupplier::substitute_values`] to
//! turn them into locations.

use std::collections::btree_map::Entry;

use super::{PropertyIndex, PropertyIndexSupplier};
use crate::environment::{Environment, PropertyResolver};
use crate::error::SecretsError;

pub struct EnvironmentPropertyIndexSupplier<'e> {
    environment: &'e Environment,
    suffix: String,
}

impl<'e> EnvironmentPropertyIndexSupplier<'e> {
    /// Index every environment variable.
    ///
    /// Any variable whose value happens to be a readable path will end up as
    /// a property, so this is logged as a warning.
    pub fn new(environment: &'e Environment) -> Self {
        tracing::warn!(
            "Indexing every environment variable as a secret location; configure a suffix to narrow the scan"
        );
        Self {
            environment,
            suffix: String::new(),
        }
    }

    /// Index environment variables ending with `suffix`.
    pub fn with_suffix(
        environment: &'e Environment,
        suffix: impl Into<String>,
    ) -> Result<Self, SecretsError> {
        let suffix = suffix.into();
        if suffix.trim().is_empty() {
            return Err(SecretsError::invalid_argument(
                "suffix",
                "must not be blank; use EnvironmentPropertyIndexSupplier::new to index every variable",
            ));
        }
        Ok(Self {
            environment,
            suffix,
        })
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    fn has_text(&self, name: &str) -> bool {
        self.environment
            .get_property(name)
            .is_some_and(|value| !value.trim().is_empty())
    }

    fn convert_to_property_name(&self, name: &str) -> Option<String> {
        let stem = &name[..name.len() - self.suffix.len()];
        if stem.is_empty() {
            tracing::warn!(variable = %name, "Variable is too short to assign");
            return None;
        }
        Some(stem.replace('_', ".").to_lowercase())
    }
}

impl PropertyIndexSupplier for EnvironmentPropertyIndexSupplier<'_> {
    fn get(&self) -> Result<PropertyIndex, SecretsError> {
        let mut index = PropertyIndex::new();
        let candidates = self
            .environment
            .system_environment()
            .keys()
            .filter(|name| name.ends_with(&self.suffix))
            .filter(|name| self.has_text(name));

        for name in candidates {
            let Some(property) = self.convert_to_property_name(name) else {
                continue;
            };
            match index.entry(property) {
                Entry::Vacant(entry) => {
                    entry.insert(name.clone());
                }
                Entry::Occupied(entry) => {
                    tracing::warn!(
                        property = %entry.key(),
                        variable = %name,
                        "Ignoring duplicate secret environment variable"
                    );
                }
            }
        }
        Ok(index)
    }
}
