//! Turns a property index into resolved secret values.

use std::collections::BTreeMap;

use secrecy::SecretString;

use crate::environment::PropertySources;
use crate::error::SecretsError;
use crate::index::PropertyIndexSupplier;
use crate::resolver::SecretResolver;
use crate::secret_properties;

/// Property key -> loaded secret content.
pub type ResolvedProperties = BTreeMap<String, SecretString>;

/// Pairs a resolver with an index supplier for one resolution pass.
pub struct SecretsEnvironment<'a> {
    resolver: &'a dyn SecretResolver,
    supplier: &'a dyn PropertyIndexSupplier,
}

impl<'a> SecretsEnvironment<'a> {
    pub fn new(resolver: &'a dyn SecretResolver, supplier: &'a dyn PropertyIndexSupplier) -> Self {
        Self { resolver, supplier }
    }

    /// Load every indexed location, keeping the entries that produced content.
    ///
    /// Only property names are logged, never values.
    pub fn resolve_secret_resources(&self) -> Result<ResolvedProperties, SecretsError> {
        let index = self.supplier.get()?;
        let mut resolved = ResolvedProperties::new();
        for (property, location) in index {
            if let Some(secret) = self.resolver.load_content(&location) {
                tracing::info!(property = %property, "Use secret value to set property");
                resolved.insert(property, secret);
            }
        }
        Ok(resolved)
    }

    /// Resolve and merge into the `secretProperties` layer of `sources`.
    pub fn process_and_apply(&self, sources: &mut PropertySources) -> Result<(), SecretsError> {
        let resolved = self.resolve_secret_resources()?;
        secret_properties::merge(resolved, sources)
    }
}
