//! Layered configuration view consumed and extended by the secrets pipeline.
//!
//! Responsibilities:
//! - Hold the ordered list of named layers (`PropertySources`).
//! - Resolve a key against the layers, highest precedence first, expanding
//!   `${key}` and `${key:default}` placeholders.
//! - Expose the process environment snapshot used by the environment supplier.
//!
//! Does NOT handle:
//! - Reading secret content (see `resolver.rs`).
//! - Deciding where secrets are merged (see `secret_properties.rs`).
//!
//! Invariants:
//! - `Environment::standard()` snapshots the process environment once; later
//!   changes to the process are never observed. Variables that are not valid
//!   UTF-8 are skipped.
//! - Unresolvable placeholders are kept verbatim.

mod dotenv;
mod source;

use std::collections::BTreeMap;
use std::ffi::OsString;

pub use source::{PropertySource, PropertySources};

use crate::constants::{
    DEFAULT_PROPERTIES_SOURCE_NAME, MAX_PLACEHOLDER_DEPTH, SYSTEM_ENVIRONMENT_SOURCE_NAME,
    SYSTEM_PROPERTIES_SOURCE_NAME,
};

const PLACEHOLDER_PREFIX: &str = "${";
const PLACEHOLDER_SUFFIX: char = '}';
const VALUE_SEPARATOR: char = ':';

static EMPTY: BTreeMap<String, String> = BTreeMap::new();

/// Lookup of a single configuration value by key.
pub trait PropertyResolver {
    fn get_property(&self, key: &str) -> Option<String>;

    fn get_property_or(&self, key: &str, default: &str) -> String {
        self.get_property(key)
            .unwrap_or_else(|| default.to_string())
    }
}

impl PropertyResolver for BTreeMap<String, String> {
    fn get_property(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl<R: PropertyResolver + ?Sized> PropertyResolver for &R {
    fn get_property(&self, key: &str) -> Option<String> {
        (**self).get_property(key)
    }
}

/// Ordered, named key-value layers with override-by-position semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    sources: PropertySources,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create an environment with empty `systemProperties` and
    /// `systemEnvironment` layers.
    pub fn new() -> Self {
        Self::with_system_environment(std::iter::empty::<(String, String)>())
    }

    /// Create an environment whose `systemEnvironment` layer is a snapshot of
    /// the current process environment.
    pub fn standard() -> Self {
        Self::with_system_environment(utf8_variables(std::env::vars_os()))
    }

    /// Create an environment with an explicit set of environment variables.
    pub fn with_system_environment<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let variables = variables
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        let mut sources = PropertySources::new();
        sources.add_last(PropertySource::empty(SYSTEM_PROPERTIES_SOURCE_NAME));
        sources.add_last(PropertySource::new(
            SYSTEM_ENVIRONMENT_SOURCE_NAME,
            variables,
        ));
        Self { sources }
    }

    /// Wrap an arbitrary list of layers.
    pub fn from_sources(sources: PropertySources) -> Self {
        Self { sources }
    }

    pub fn property_sources(&self) -> &PropertySources {
        &self.sources
    }

    pub fn property_sources_mut(&mut self) -> &mut PropertySources {
        &mut self.sources
    }

    /// Variables of the `systemEnvironment` layer, empty if the layer is gone.
    pub fn system_environment(&self) -> &BTreeMap<String, String> {
        self.sources
            .get(SYSTEM_ENVIRONMENT_SOURCE_NAME)
            .map(PropertySource::properties)
            .unwrap_or(&EMPTY)
    }

    /// Set an explicit override in the `systemProperties` layer.
    pub fn set_system_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.sources.get_mut(SYSTEM_PROPERTIES_SOURCE_NAME) {
            Some(source) => {
                source.properties_mut().insert(key, value);
            }
            None => {
                let properties = BTreeMap::from([(key, value)]);
                self.sources.add_first(PropertySource::new(
                    SYSTEM_PROPERTIES_SOURCE_NAME,
                    properties,
                ));
            }
        }
    }

    /// Add the given properties to the lowest-precedence `defaultProperties`
    /// layer, creating it if necessary. Existing keys are kept.
    pub fn add_default_properties(&mut self, properties: BTreeMap<String, String>) {
        if properties.is_empty() {
            return;
        }
        match self.sources.get_mut(DEFAULT_PROPERTIES_SOURCE_NAME) {
            Some(source) => {
                for (key, value) in properties {
                    source.properties_mut().entry(key).or_insert(value);
                }
            }
            None => self.sources.add_last(PropertySource::new(
                DEFAULT_PROPERTIES_SOURCE_NAME,
                properties,
            )),
        }
    }

    /// Raw value of the highest-precedence layer defining `key`.
    pub fn raw_property(&self, key: &str) -> Option<&str> {
        self.sources.iter().find_map(|source| source.get(key))
    }

    pub fn contains_property(&self, key: &str) -> bool {
        self.raw_property(key).is_some()
    }

    /// Expand `${key}` and `${key:default}` placeholders in `text`.
    pub fn resolve_placeholders(&self, text: &str) -> String {
        self.expand(text, 0)
    }

    fn expand(&self, text: &str, depth: usize) -> String {
        if depth >= MAX_PLACEHOLDER_DEPTH || !text.contains(PLACEHOLDER_PREFIX) {
            return text.to_string();
        }

        let mut result = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(PLACEHOLDER_PREFIX) {
            result.push_str(&rest[..start]);
            let body = &rest[start + PLACEHOLDER_PREFIX.len()..];
            let Some(end) = closing_brace(body) else {
                result.push_str(&rest[start..]);
                return result;
            };

            let expression = &body[..end];
            let (name, default) = match expression.split_once(VALUE_SEPARATOR) {
                Some((name, default)) => (name, Some(default)),
                None => (expression, None),
            };

            match self.raw_property(name).or(default) {
                Some(value) => result.push_str(&self.expand(value, depth + 1)),
                None => {
                    let consumed = start + PLACEHOLDER_PREFIX.len() + end + 1;
                    result.push_str(&rest[start..consumed]);
                }
            }
            rest = &body[end + 1..];
        }
        result.push_str(rest);
        result
    }
}

/// Position of the `}` closing a placeholder body, skipping nested placeholders.
fn closing_brace(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut chars = body.char_indices().peekable();
    while let Some((position, c)) = chars.next() {
        match c {
            '$' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                chars.next();
                depth += 1;
            }
            PLACEHOLDER_SUFFIX if depth == 0 => return Some(position),
            PLACEHOLDER_SUFFIX => depth -= 1,
            _ => {}
        }
    }
    None
}

fn utf8_variables<I>(variables: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    variables
        .into_iter()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                let key = key.unwrap_or_else(|key| key.to_string_lossy().into_owned());
                tracing::warn!(variable = %key, "Skipping environment variable that is not UTF-8");
                None
            }
        })
}

impl PropertyResolver for Environment {
    fn get_property(&self, key: &str) -> Option<String> {
        self.raw_property(key)
            .map(|value| self.resolve_placeholders(value))
    }
}
