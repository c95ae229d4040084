//! Environment post-processors and the chain running them.
//!
//! Responsibilities:
//! - Define the `EnvironmentPostProcessor` hook and the `Application` context
//!   handed to every stage.
//! - Provide the config-data stage and the four secrets stages.
//! - Run stages in ascending order via `PostProcessorChain`.
//!
//! Does NOT handle:
//! - Discovering processors dynamically; the chain is assembled explicitly.
//!
//! Invariants:
//! - Orders are strictly increasing: config data, filename, filename config
//!   data, environment config data, environment suffix.
//! - Each stage merges into the same `secretProperties` layer, so a later
//!   stage overrides keys set by an earlier one.

mod chain;
mod config_data;
mod secrets;

use std::fmt;

pub use chain::PostProcessorChain;
pub use config_data::ConfigDataEnvironmentPostProcessor;
pub use secrets::{
    EnvironmentConfigDataSecretsPostProcessor, EnvironmentSuffixSecretsPostProcessor,
    FilenameConfigDataSecretsPostProcessor, FilenameSecretsPostProcessor,
};

use crate::environment::Environment;
use crate::error::SecretsError;
use crate::index::PropertyIndexSupplier;
use crate::resolver::{DefaultSecretResolver, SecretResolver};
use crate::resource::{DefaultResourceLoader, ResourceLoader};
use crate::secret_properties;
use crate::secrets_environment::SecretsEnvironment;

/// Context shared by all post-processors of one startup.
#[derive(Debug, Default)]
pub struct Application {
    resource_loader: Option<Box<dyn ResourceLoader>>,
}

impl Application {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resource_loader(loader: impl ResourceLoader + 'static) -> Self {
        Self {
            resource_loader: Some(Box::new(loader)),
        }
    }

    pub fn resource_loader(&self) -> Option<&dyn ResourceLoader> {
        self.resource_loader.as_deref()
    }

    /// Run `f` with the configured loader, or a [`DefaultResourceLoader`].
    pub(crate) fn with_loader<T>(&self, f: impl FnOnce(&dyn ResourceLoader) -> T) -> T {
        match self.resource_loader() {
            Some(loader) => f(loader),
            None => f(&DefaultResourceLoader::new()),
        }
    }
}

/// A startup hook allowed to modify the [`Environment`].
pub trait EnvironmentPostProcessor {
    fn name(&self) -> &'static str;

    /// Lower orders run first.
    fn order(&self) -> i32;

    fn post_process_environment(
        &self,
        environment: &mut Environment,
        application: &Application,
    ) -> Result<(), SecretsError>;
}

/// A post-processor that resolves one kind of secret index into the
/// `secretProperties` layer.
///
/// Implementors only choose the index; resolution and merging are shared.
pub trait SecretsEnvironmentPostProcessor {
    fn name(&self) -> &'static str;

    fn order(&self) -> i32;

    fn property_index_supplier<'e>(
        &self,
        environment: &'e Environment,
    ) -> Result<Box<dyn PropertyIndexSupplier + 'e>, SecretsError>;

    fn secret_resolver<'l>(&self, loader: &'l dyn ResourceLoader) -> Box<dyn SecretResolver + 'l> {
        Box::new(DefaultSecretResolver::new(loader))
    }

    fn post_process_with_loader(
        &self,
        environment: &mut Environment,
        loader: &dyn ResourceLoader,
    ) -> Result<(), SecretsError> {
        tracing::trace!(
            processor = SecretsEnvironmentPostProcessor::name(self),
            "Post-processing environment to add secrets"
        );
        let resolved = {
            let supplier = self.property_index_supplier(environment)?;
            let resolver = self.secret_resolver(loader);
            SecretsEnvironment::new(&*resolver, &*supplier)
                .resolve_secret_resources()?
        };
        secret_properties::merge(resolved, environment.property_sources_mut())
    }
}

impl<P: SecretsEnvironmentPostProcessor> EnvironmentPostProcessor for P {
    fn name(&self) -> &'static str {
        SecretsEnvironmentPostProcessor::name(self)
    }

    fn order(&self) -> i32 {
        SecretsEnvironmentPostProcessor::order(self)
    }

    fn post_process_environment(
        &self,
        environment: &mut Environment,
        application: &Application,
    ) -> Result<(), SecretsError> {
        application.with_loader(|loader| self.post_process_with_loader(environment, loader))
    }
}

impl fmt::Debug for dyn EnvironmentPostProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvironmentPostProcessor")
            .field("name", &self.name())
            .field("order", &self.order())
            .finish()
    }
}
