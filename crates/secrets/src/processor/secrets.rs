//! The four secrets stages, one per index convention.

use super::SecretsEnvironmentPostProcessor;
use crate::constants::{
    ENV_CONFIG_DATA_INFIX, ENV_VAR_SUFFIX, ENVIRONMENT_CONFIG_DATA_ORDER, ENVIRONMENT_SUFFIX_ORDER,
    FILE_CONFIG_DATA_INFIX, FILENAME_CONFIG_DATA_ORDER, FILENAME_ORDER,
};
use crate::environment::Environment;
use crate::error::SecretsError;
use crate::index::{
    ConfigDataPropertyIndexSupplier, EnvironmentPropertyIndexSupplier,
    FilenamePropertyIndexSupplier, PropertyIndexSupplier,
};

/// Secrets mounted as files under `secrets.file.base-dir`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameSecretsPostProcessor;

impl FilenameSecretsPostProcessor {
    pub const ORDER: i32 = FILENAME_ORDER;
}

impl SecretsEnvironmentPostProcessor for FilenameSecretsPostProcessor {
    fn name(&self) -> &'static str {
        "filename"
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn property_index_supplier<'e>(
        &self,
        environment: &'e Environment,
    ) -> Result<Box<dyn PropertyIndexSupplier + 'e>, SecretsError> {
        Ok(Box::new(FilenamePropertyIndexSupplier::new(environment)))
    }
}

/// Locations declared as `secrets.file.properties.<key>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameConfigDataSecretsPostProcessor;

impl FilenameConfigDataSecretsPostProcessor {
    pub const ORDER: i32 = FILENAME_CONFIG_DATA_ORDER;
}

impl SecretsEnvironmentPostProcessor for FilenameConfigDataSecretsPostProcessor {
    fn name(&self) -> &'static str {
        "filename-config-data"
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn property_index_supplier<'e>(
        &self,
        environment: &'e Environment,
    ) -> Result<Box<dyn PropertyIndexSupplier + 'e>, SecretsError> {
        Ok(Box::new(ConfigDataPropertyIndexSupplier::new(
            environment,
            FILE_CONFIG_DATA_INFIX,
        )?))
    }
}

/// Environment variable names declared as `secrets.env.properties.<key>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentConfigDataSecretsPostProcessor;

impl EnvironmentConfigDataSecretsPostProcessor {
    pub const ORDER: i32 = ENVIRONMENT_CONFIG_DATA_ORDER;
}

impl SecretsEnvironmentPostProcessor for EnvironmentConfigDataSecretsPostProcessor {
    fn name(&self) -> &'static str {
        "environment-config-data"
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn property_index_supplier<'e>(
        &self,
        environment: &'e Environment,
    ) -> Result<Box<dyn PropertyIndexSupplier + 'e>, SecretsError> {
        let supplier = ConfigDataPropertyIndexSupplier::new(environment, ENV_CONFIG_DATA_INFIX)?;
        Ok(Box::new(supplier.substitute_values(environment)))
    }
}

/// Environment variables ending with `_FILE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentSuffixSecretsPostProcessor;

impl EnvironmentSuffixSecretsPostProcessor {
    pub const ORDER: i32 = ENVIRONMENT_SUFFIX_ORDER;
}

impl SecretsEnvironmentPostProcessor for EnvironmentSuffixSecretsPostProcessor {
    fn name(&self) -> &'static str {
        "environment-suffix"
    }

    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn property_index_supplier<'e>(
        &self,
        environment: &'e Environment,
    ) -> Result<Box<dyn PropertyIndexSupplier + 'e>, SecretsError> {
        let supplier = EnvironmentPropertyIndexSupplier::with_suffix(environment, ENV_VAR_SUFFIX)?;
        Ok(Box::new(supplier.substitute_values(environment)))
    }
}
