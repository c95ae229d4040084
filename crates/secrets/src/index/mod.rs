//! Property index suppliers.
//!
//! Responsibilities:
//! - Define `PropertyIndex` (logical property key -> location).
//! - Define the `PropertyIndexSupplier` capability and its substitution wrapper.
//! - Provide the filename, environment, config-data and composite variants.
//!
//! Does NOT handle:
//! - Loading secret content (see `resolver.rs`).
//!
//! Invariants:
//! - Indices are built fresh on every `get()` call and never cached.
//! - Resolved substitutions are trimmed and dropped when blank; values a
//!   supplier keeps unchanged are passed through untouched.

mod composite;
mod config_data;
mod env;
mod filename;

use std::collections::BTreeMap;

pub use composite::{Builder as CompositeBuilder, CompositePropertyIndexSupplier, MergeStrategy};
pub use config_data::ConfigDataPropertyIndexSupplier;
pub use env::EnvironmentPropertyIndexSupplier;
pub use filename::{FilenamePropertyIndexSupplier, Separator};

use crate::environment::PropertyResolver;
use crate::error::SecretsError;

/// Logical property key -> location.
pub type PropertyIndex = BTreeMap<String, String>;

/// Produces a [`PropertyIndex`] from one source convention.
pub trait PropertyIndexSupplier {
    fn get(&self) -> Result<PropertyIndex, SecretsError>;

    /// Substitute a single value through `resolver`.
    ///
    /// The default looks the value up as a key and yields nothing if it is
    /// not defined or blank.
    fn substitute(&self, resolver: &dyn PropertyResolver, value: &str) -> Option<String> {
        resolver.get_property(value).and_then(non_blank)
    }

    /// Wrap this supplier so that every value is replaced by its substitution.
    fn substitute_values<'r>(
        self,
        resolver: &'r dyn PropertyResolver,
    ) -> SubstitutingIndexSupplier<'r, Self>
    where
        Self: Sized,
    {
        SubstitutingIndexSupplier {
            delegate: self,
            resolver,
        }
    }
}

impl<S: PropertyIndexSupplier + ?Sized> PropertyIndexSupplier for Box<S> {
    fn get(&self) -> Result<PropertyIndex, SecretsError> {
        (**self).get()
    }

    fn substitute(&self, resolver: &dyn PropertyResolver, value: &str) -> Option<String> {
        (**self).substitute(resolver, value)
    }
}

impl<S: PropertyIndexSupplier + ?Sized> PropertyIndexSupplier for &S {
    fn get(&self) -> Result<PropertyIndex, SecretsError> {
        (**self).get()
    }

    fn substitute(&self, resolver: &dyn PropertyResolver, value: &str) -> Option<String> {
        (**self).substitute(resolver, value)
    }
}

/// Supplier handing out a copy of a fixed index.
#[derive(Debug, Clone, Default)]
pub struct StaticIndexSupplier {
    index: PropertyIndex,
}

impl PropertyIndexSupplier for StaticIndexSupplier {
    fn get(&self) -> Result<PropertyIndex, SecretsError> {
        Ok(self.index.clone())
    }
}

/// Create a supplier returning a copy of `index` on every call.
pub fn from_map(index: PropertyIndex) -> StaticIndexSupplier {
    StaticIndexSupplier { index }
}

/// Supplier whose values are substituted through a [`PropertyResolver`].
pub struct SubstitutingIndexSupplier<'r, S> {
    delegate: S,
    resolver: &'r dyn PropertyResolver,
}

impl<S: PropertyIndexSupplier> PropertyIndexSupplier for SubstitutingIndexSupplier<'_, S> {
    fn get(&self) -> Result<PropertyIndex, SecretsError> {
        let index = self.delegate.get()?;
        Ok(substitute_index(index, |value| {
            self.delegate.substitute(self.resolver, value)
        }))
    }
}

/// Apply `substitute` to every value, dropping entries it yields nothing for.
pub(crate) fn substitute_index<F>(index: PropertyIndex, substitute: F) -> PropertyIndex
where
    F: Fn(&str) -> Option<String>,
{
    index
        .into_iter()
        .filter_map(|(key, value)| substitute(&value).map(|value| (key, value)))
        .collect()
}

/// Trimmed `value`, or `None` if it is blank.
pub(crate) fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
