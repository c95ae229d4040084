//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map `SecretsError` variants to appropriate exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit code 2 is left to clap for usage errors.

use envsecrets::SecretsError;

/// Structured exit codes for envsecrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Secrets resolved and printed.
    Success = 0,

    /// Unhandled or generic failure.
    GeneralError = 1,

    /// The application config data could not be read or parsed.
    ConfigDataError = 3,

    /// An invalid setting such as an unknown separator or duplicate key.
    ValidationError = 4,

    /// The secrets directory or `.env` file could not be read.
    IoError = 5,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&SecretsError> for ExitCode {
    fn from(err: &SecretsError) -> Self {
        match err {
            SecretsError::ConfigDataRead { .. } | SecretsError::ConfigDataParse { .. } => {
                ExitCode::ConfigDataError
            }

            SecretsError::InvalidArgument { .. }
            | SecretsError::DuplicateKey(_)
            | SecretsError::IllegalSeparator(_)
            | SecretsError::MissingPropertySource(_)
            | SecretsError::DotenvParse { .. } => ExitCode::ValidationError,

            SecretsError::DirectoryListing { .. } | SecretsError::DotenvIo { .. } => {
                ExitCode::IoError
            }

            SecretsError::DotenvUnknown => ExitCode::GeneralError,
        }
    }
}

/// Extension trait to extract exit codes from anyhow errors.
pub trait ExitCodeExt {
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        self.chain()
            .find_map(|cause| cause.downcast_ref::<SecretsError>())
            .map_or(ExitCode::GeneralError, ExitCode::from)
    }
}
