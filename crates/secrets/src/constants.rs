//! Centralized constants for secret resolution.
//!
//! Property keys, layer names and post-processor orders live here so the
//! suppliers, the merge step and the chain agree on them.

// =============================================================================
// Layer Names
// =============================================================================

/// Layer holding explicitly set overrides (highest precedence by default).
pub const SYSTEM_PROPERTIES_SOURCE_NAME: &str = "systemProperties";

/// Layer holding the process environment snapshot.
pub const SYSTEM_ENVIRONMENT_SOURCE_NAME: &str = "systemEnvironment";

/// Lowest-precedence layer for programmatic defaults.
pub const DEFAULT_PROPERTIES_SOURCE_NAME: &str = "defaultProperties";

/// The single layer every secrets post-processor merges into.
pub const SECRET_PROPERTIES_SOURCE_NAME: &str = "secretProperties";

// =============================================================================
// Filename-based Secrets
// =============================================================================

/// Property naming the directory scanned for secret files.
pub const BASE_DIR_PROPERTY: &str = "secrets.file.base-dir";

/// Property selecting the filename word separator (`.` or `_`).
pub const SEPARATOR_PROPERTY: &str = "secrets.file.separator";

/// Conventional mount point of container orchestrator secrets.
pub const DEFAULT_BASE_DIR: &str = "/run/secrets";

// =============================================================================
// Config-data and Environment Secrets
// =============================================================================

/// Infix of `secrets.file.properties.*` declarations (values are locations).
pub const FILE_CONFIG_DATA_INFIX: &str = "file";

/// Infix of `secrets.env.properties.*` declarations (values are variable names).
pub const ENV_CONFIG_DATA_INFIX: &str = "env";

/// Suffix marking environment variables that point at secret files.
pub const ENV_VAR_SUFFIX: &str = "_FILE";

/// Property naming the JSON config-data file loaded before any secrets.
pub const CONFIG_LOCATION_PROPERTY: &str = "config.location";

/// Config-data file used when `config.location` is not set.
pub const DEFAULT_CONFIG_LOCATION: &str = "application.json";

/// Prefix of resource locations resolved against the resource roots.
pub const CLASSPATH_URL_PREFIX: &str = "classpath:";

// =============================================================================
// Post-processor Orders
// =============================================================================

/// Config-data loading runs first.
pub const CONFIG_DATA_ORDER: i32 = i32::MIN + 10;

/// Directory scan of secret files.
pub const FILENAME_ORDER: i32 = CONFIG_DATA_ORDER + 100;

/// `secrets.file.properties.*` declarations.
pub const FILENAME_CONFIG_DATA_ORDER: i32 = FILENAME_ORDER + 1;

/// `secrets.env.properties.*` declarations.
pub const ENVIRONMENT_CONFIG_DATA_ORDER: i32 = FILENAME_CONFIG_DATA_ORDER + 1;

/// `*_FILE` environment variables; runs last and therefore wins.
pub const ENVIRONMENT_SUFFIX_ORDER: i32 = ENVIRONMENT_CONFIG_DATA_ORDER + 1;

// =============================================================================
// Placeholders
// =============================================================================

/// Upper bound on nested placeholder expansion.
pub const MAX_PLACEHOLDER_DEPTH: usize = 16;
