//! Shared test utilities for envsecrets integration tests.
//!
//! Invariants / Assumptions:
//! - Every command is hermetic: the host environment is cleared, so no `.env`
//!   loading and no inherited `*_FILE` variables or secrets settings.

use assert_cmd::Command;
use std::path::PathBuf;

/// Returns a hermetic `envsecrets` command for integration testing.
///
/// It ensures:
/// - No variable of the host environment is inherited.
/// - `DOTENV_DISABLED=1` is set to prevent local `.env` contamination.
/// - The base directory points at a path that does not exist.
/// - The config data location points at a file that does not exist.
pub fn envsecrets_cmd() -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("envsecrets");

    cmd.env_clear()
        .env("DOTENV_DISABLED", "1")
        .env("SECRETS_FILE_BASE_DIR", "/nonexistent/envsecrets/secrets")
        .env("ENVSECRETS_CONFIG", "/nonexistent/envsecrets/application.json");

    cmd
}

/// Fixture directory shared with the library crate.
pub fn resources_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../secrets/tests/resources")
}
