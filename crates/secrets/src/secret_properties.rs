//! The `secretProperties` layer.
//!
//! Responsibilities:
//! - Combine resolved secrets with an existing `secretProperties` layer.
//! - Place a new layer right after `systemEnvironment`.
//!
//! Invariants:
//! - An empty batch never creates or touches the layer.
//! - At most one `secretProperties` layer exists; repeated merges keep its position.
//! - Within the layer the latest batch wins.

use std::collections::BTreeMap;

use secrecy::ExposeSecret;

use crate::constants::{SECRET_PROPERTIES_SOURCE_NAME, SYSTEM_ENVIRONMENT_SOURCE_NAME};
use crate::environment::{PropertySource, PropertySources};
use crate::error::SecretsError;
use crate::secrets_environment::ResolvedProperties;

pub const NAME: &str = SECRET_PROPERTIES_SOURCE_NAME;

/// Merge `properties` into the `secretProperties` layer of `sources`.
///
/// Without a `systemEnvironment` layer to anchor on, a new layer is added
/// with the lowest precedence.
pub fn merge(properties: ResolvedProperties, sources: &mut PropertySources) -> Result<(), SecretsError> {
    if properties.is_empty() {
        return Ok(());
    }

    let incoming = properties
        .into_iter()
        .map(|(key, secret)| (key, secret.expose_secret().to_string()));

    match sources.get(NAME) {
        Some(existing) => {
            let mut combined: BTreeMap<String, String> = existing.properties().clone();
            combined.extend(incoming);
            tracing::debug!(properties = combined.len(), "Replacing secret properties layer");
            sources.replace(NAME, PropertySource::new(NAME, combined))
        }
        None => {
            let layer = PropertySource::new(NAME, incoming.collect());
            if sources.contains(SYSTEM_ENVIRONMENT_SOURCE_NAME) {
                sources.add_after(SYSTEM_ENVIRONMENT_SOURCE_NAME, layer)
            } else {
                tracing::debug!(
                    anchor = SYSTEM_ENVIRONMENT_SOURCE_NAME,
                    "Anchor layer missing, adding secret properties last"
                );
                sources.add_last(layer);
                Ok(())
            }
        }
    }
}
