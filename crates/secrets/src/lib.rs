//! Secret indexing for layered application configuration.
//!
//! This crate resolves secret references (mounted secret files, `*_FILE`
//! environment variables and `secrets.<infix>.properties.*` declarations)
//! into literal values and splices them into an ordered, layered
//! [`Environment`] during application startup.

pub mod constants;
mod environment;
mod error;
pub mod index;
pub mod processor;
mod resolver;
mod resource;
pub mod secret_properties;
mod secrets_environment;

pub use environment::{Environment, PropertyResolver, PropertySource, PropertySources};
pub use error::SecretsError;
pub use index::{
    CompositePropertyIndexSupplier, ConfigDataPropertyIndexSupplier,
    EnvironmentPropertyIndexSupplier, FilenamePropertyIndexSupplier, MergeStrategy,
    PropertyIndex, PropertyIndexSupplier, Separator,
};
pub use processor::{
    Application, ConfigDataEnvironmentPostProcessor, EnvironmentConfigDataSecretsPostProcessor,
    EnvironmentPostProcessor, EnvironmentSuffixSecretsPostProcessor,
    FilenameConfigDataSecretsPostProcessor, FilenameSecretsPostProcessor, PostProcessorChain,
    SecretsEnvironmentPostProcessor,
};
pub use resolver::{DefaultSecretResolver, SecretResolver};
pub use resource::{DefaultResourceLoader, Resource, ResourceLoader};
pub use secrets_environment::{ResolvedProperties, SecretsEnvironment};

#[cfg(test)]
pub(crate) mod test_util {
    use std::path::PathBuf;

    /// Directory holding the checked-in fixture files.
    pub fn resources_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/resources")
    }
}
