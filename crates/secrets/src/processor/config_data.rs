//! Application config-data stage.
//!
//! Loads a JSON document and exposes it as a flat, dotted-key layer so that
//! `secrets.<infix>.properties.*` declarations and regular settings can live
//! in an application file. Runs before every secrets stage.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::PathBuf;

use serde_json::Value;

use super::{Application, EnvironmentPostProcessor};
use crate::constants::{
    CONFIG_DATA_ORDER, CONFIG_LOCATION_PROPERTY, DEFAULT_CONFIG_LOCATION,
    DEFAULT_PROPERTIES_SOURCE_NAME,
};
use crate::environment::{Environment, PropertyResolver, PropertySource};
use crate::error::SecretsError;
use crate::resource::ResourceLoader;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigDataEnvironmentPostProcessor;

impl ConfigDataEnvironmentPostProcessor {
    pub const ORDER: i32 = CONFIG_DATA_ORDER;

    /// Load the configured document into `environment`.
    ///
    /// A missing document is not an error.
    pub fn load(
        &self,
        environment: &mut Environment,
        loader: &dyn ResourceLoader,
    ) -> Result<(), SecretsError> {
        let location = environment.get_property_or(CONFIG_LOCATION_PROPERTY, DEFAULT_CONFIG_LOCATION);
        let resource = loader.get_resource(&location);
        if !resource.exists() {
            tracing::debug!(location = %location, "No application config data found");
            return Ok(());
        }

        let read_error = |source| SecretsError::ConfigDataRead {
            path: PathBuf::from(&location),
            source,
        };
        let mut content = String::new();
        resource
            .open()
            .map_err(read_error)?
            .read_to_string(&mut content)
            .map_err(read_error)?;

        let document: Value =
            serde_json::from_str(&content).map_err(|source| SecretsError::ConfigDataParse {
                path: PathBuf::from(&location),
                source,
            })?;

        let properties = flatten(&document);
        tracing::debug!(
            location = %location,
            properties = properties.len(),
            "Loaded application config data"
        );

        let layer = PropertySource::new(format!("applicationConfig: [{location}]"), properties);
        let sources = environment.property_sources_mut();
        if sources.contains(DEFAULT_PROPERTIES_SOURCE_NAME) {
            sources.add_before(DEFAULT_PROPERTIES_SOURCE_NAME, layer)
        } else {
            sources.add_last(layer);
            Ok(())
        }
    }
}

impl EnvironmentPostProcessor for ConfigDataEnvironmentPostProcessor {
    fn name(&self) -> &'static str {
        "config-data"
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn post_process_environment(
        &self,
        environment: &mut Environment,
        application: &Application,
    ) -> Result<(), SecretsError> {
        application.with_loader(|loader| self.load(environment, loader))
    }
}

/// Flatten nested objects into dotted keys and arrays into `key[i]`.
fn flatten(document: &Value) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();
    flatten_into(&mut properties, String::new(), document);
    properties
}

fn flatten_into(
    properties: &mut BTreeMap<String, String>,
    prefix: String,
    value: &Value,
) {
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(properties, key, value);
            }
        }
        Value::Array(items) => {
            for (i, value) in items.iter().enumerate() {
                flatten_into(properties, format!("{prefix}[{i}]"), value);
            }
        }
        _ if prefix.is_empty() => {}
        Value::String(s) => {
            properties.insert(prefix, s.clone());
        }
        Value::Null => {
            properties.insert(prefix, String::new());
        }
        other => {
            properties.insert(prefix, other.to_string());
        }
    }
}
