//! `.env` file support for [`Environment`].
//!
//! Responsibilities:
//! - Read `.env` entries into the `systemEnvironment` layer.
//! - Enforce the `DOTENV_DISABLED` gate.
//!
//! Does NOT handle:
//! - Mutating the process environment; entries only live in the layer.
//!
//! Invariants:
//! - Variables already present in the layer win over `.env` entries.
//! - Missing `.env` files are silently ignored.
//! - Errors NEVER include raw .env line contents to prevent secret leakage.

use std::fs::File;
use std::path::Path;

use super::{Environment, PropertySource};
use crate::constants::SYSTEM_ENVIRONMENT_SOURCE_NAME;
use crate::error::SecretsError;

const DOTENV_DISABLED: &str = "DOTENV_DISABLED";

impl Environment {
    /// Check if dotenv loading is disabled via environment variable.
    fn dotenv_disabled() -> bool {
        std::env::var(DOTENV_DISABLED)
            .is_ok_and(|value| matches!(value.trim(), "1" | "true"))
    }

    /// Merge the `.env` file found in the current directory (or its parents)
    /// into the `systemEnvironment` layer.
    ///
    /// If `DOTENV_DISABLED` is set to "true" or "1", nothing is loaded.
    ///
    /// # Errors
    ///
    /// Returns an error if the `.env` file exists but has invalid syntax or
    /// cannot be read. Missing `.env` files are ignored.
    pub fn load_dotenv(self) -> Result<Self, SecretsError> {
        if Self::dotenv_disabled() {
            return Ok(self);
        }
        match dotenvy::dotenv_iter() {
            Ok(iter) => self.merge_dotenv(iter),
            Err(e) => Self::map_dotenv_error(e).map(|()| self),
        }
    }

    /// Merge the given `.env` file into the `systemEnvironment` layer.
    ///
    /// Unlike [`Environment::load_dotenv`], this ignores `DOTENV_DISABLED`
    /// because the caller asked for a specific file.
    pub fn load_dotenv_from(self, path: impl AsRef<Path>) -> Result<Self, SecretsError> {
        match dotenvy::from_path_iter(path.as_ref()) {
            Ok(iter) => self.merge_dotenv(iter),
            Err(e) => Self::map_dotenv_error(e).map(|()| self),
        }
    }

    fn merge_dotenv(mut self, iter: dotenvy::Iter<File>) -> Result<Self, SecretsError> {
        let mut loaded = 0usize;
        for item in iter {
            let (key, value) = match item {
                Ok(pair) => pair,
                Err(e) => return Self::map_dotenv_error(e).map(|()| self),
            };
            if self.insert_environment_variable(key, value) {
                loaded += 1;
            }
        }
        tracing::debug!(loaded, "Loaded variables from .env file");
        Ok(self)
    }

    fn insert_environment_variable(&mut self, key: String, value: String) -> bool {
        let sources = self.property_sources_mut();
        match sources.get_mut(SYSTEM_ENVIRONMENT_SOURCE_NAME) {
            Some(source) => {
                if source.contains_property(&key) {
                    return false;
                }
                source.properties_mut().insert(key, value);
            }
            None => {
                let mut source = PropertySource::empty(SYSTEM_ENVIRONMENT_SOURCE_NAME);
                source.properties_mut().insert(key, value);
                sources.add_last(source);
            }
        }
        true
    }

    fn map_dotenv_error(err: dotenvy::Error) -> Result<(), SecretsError> {
        match err {
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            dotenvy::Error::LineParse(_, idx) => Err(SecretsError::DotenvParse { error_index: idx }),
            dotenvy::Error::Io(io_err) => Err(SecretsError::DotenvIo {
                kind: io_err.kind(),
            }),
            _ => Err(SecretsError::DotenvUnknown),
        }
    }
}
