//! Composite supplier merging the indices of several delegates.
//!
//! Delegates are consulted in insertion order. Colliding keys are resolved by
//! the [`MergeStrategy`] chosen when the builder was created; the default
//! strategy fails, but only once `get()` actually encounters a duplicate.

use std::collections::btree_map::Entry;
use std::fmt;

use super::{PropertyIndex, PropertyIndexSupplier, from_map, non_blank};
use crate::environment::PropertyResolver;
use crate::error::SecretsError;

/// How to combine two values claiming the same key.
#[derive(Clone, Copy, Default)]
pub enum MergeStrategy {
    /// Abort with [`SecretsError::DuplicateKey`].
    #[default]
    Fail,
    KeepFirst,
    KeepLast,
    /// Combine `(existing, incoming)` into a single value.
    Custom(fn(&str, &str) -> String),
}

impl fmt::Debug for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => f.write_str("Fail"),
            Self::KeepFirst => f.write_str("KeepFirst"),
            Self::KeepLast => f.write_str("KeepLast"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl MergeStrategy {
    pub fn merge(&self, key: &str, existing: String, incoming: String) -> Result<String, SecretsError> {
        match self {
            Self::Fail => Err(SecretsError::DuplicateKey(key.to_string())),
            Self::KeepFirst => Ok(existing),
            Self::KeepLast => Ok(incoming),
            Self::Custom(combine) => Ok(combine(&existing, &incoming)),
        }
    }
}

pub struct CompositePropertyIndexSupplier<'a> {
    delegates: Vec<Box<dyn PropertyIndexSupplier + 'a>>,
    strategy: MergeStrategy,
    resolver: Option<&'a dyn PropertyResolver>,
}

impl<'a> CompositePropertyIndexSupplier<'a> {
    /// Builder failing lazily on duplicate keys.
    pub fn builder() -> Builder<'a> {
        Self::using(MergeStrategy::Fail)
    }

    /// Builder keeping the first value seen for a key.
    pub fn keeping() -> Builder<'a> {
        Self::using(MergeStrategy::KeepFirst)
    }

    /// Builder letting later delegates override earlier ones.
    pub fn overriding() -> Builder<'a> {
        Self::using(MergeStrategy::KeepLast)
    }

    pub fn using(strategy: MergeStrategy) -> Builder<'a> {
        Builder {
            delegates: Vec::new(),
            strategy,
        }
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl fmt::Debug for CompositePropertyIndexSupplier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositePropertyIndexSupplier")
            .field("delegates", &self.delegates.len())
            .field("strategy", &self.strategy)
            .field("substituting", &self.resolver.is_some())
            .finish()
    }
}

impl PropertyIndexSupplier for CompositePropertyIndexSupplier<'_> {
    fn get(&self) -> Result<PropertyIndex, SecretsError> {
        let mut merged = PropertyIndex::new();
        for delegate in &self.delegates {
            for (key, value) in delegate.get()? {
                let value = match self.resolver {
                    Some(resolver) => match self.substitute(resolver, &value) {
                        Some(value) => value,
                        None => continue,
                    },
                    None => value,
                };

                match merged.entry(key) {
                    Entry::Vacant(entry) => {
                        entry.insert(value);
                    }
                    Entry::Occupied(mut entry) => {
                        let existing = std::mem::take(entry.get_mut());
                        let combined = self.strategy.merge(entry.key(), existing, value)?;
                        *entry.get_mut() = combined;
                    }
                }
            }
        }
        Ok(merged)
    }

    /// Values that do not name a defined key are kept as they are.
    fn substitute(&self, resolver: &dyn PropertyResolver, value: &str) -> Option<String> {
        match resolver.get_property(value) {
            Some(substituted) => non_blank(substituted),
            None => Some(value.to_string()),
        }
    }
}

/// Collects delegates for a [`CompositePropertyIndexSupplier`].
pub struct Builder<'a> {
    delegates: Vec<Box<dyn PropertyIndexSupplier + 'a>>,
    strategy: MergeStrategy,
}

impl<'a> Builder<'a> {
    pub fn add(mut self, supplier: impl PropertyIndexSupplier + 'a) -> Self {
        self.delegates.push(Box::new(supplier));
        self
    }

    pub fn add_map(self, properties: PropertyIndex) -> Self {
        self.add(from_map(properties))
    }

    pub fn add_all<I>(mut self, suppliers: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn PropertyIndexSupplier + 'a>>,
    {
        self.delegates.extend(suppliers);
        self
    }

    /// Build a composite leaving values as they are.
    pub fn build(self) -> CompositePropertyIndexSupplier<'a> {
        CompositePropertyIndexSupplier {
            delegates: self.delegates,
            strategy: self.strategy,
            resolver: None,
        }
    }

    /// Build a composite substituting every value through `resolver` at `get()` time.
    pub fn build_and_substitute(
        self,
        resolver: &'a dyn PropertyResolver,
    ) -> CompositePropertyIndexSupplier<'a> {
        CompositePropertyIndexSupplier {
            delegates: self.delegates,
            strategy: self.strategy,
            resolver: Some(resolver),
        }
    }
}
