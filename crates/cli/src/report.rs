//! Collects the resolved secret properties for display.

use envsecrets::Environment;
use envsecrets::constants::SECRET_PROPERTIES_SOURCE_NAME;
use serde::Serialize;

/// Placeholder printed instead of a secret value.
pub const MASK: &str = "****";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretEntry {
    pub property: String,
    pub value: String,
}

/// Entries of the `secretProperties` layer, sorted by property.
pub fn collect(environment: &Environment, show_values: bool) -> Vec<SecretEntry> {
    let Some(layer) = environment
        .property_sources()
        .get(SECRET_PROPERTIES_SOURCE_NAME)
    else {
        return Vec::new();
    };

    layer
        .properties()
        .iter()
        .map(|(property, value)| SecretEntry {
            property: property.clone(),
            value: if show_values {
                value.clone()
            } else {
                MASK.to_string()
            },
        })
        .collect()
}
