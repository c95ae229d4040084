//! Index of secret files mounted into a directory.
//!
//! Responsibilities:
//! - List the regular files of `secrets.file.base-dir` (non-recursive).
//! - Derive a property key from each filename using the configured separator.
//!
//! Invariants:
//! - Base directory and separator are read on every `get()`, so an illegal
//!   separator fails at resolution time rather than at construction.
//! - A missing base directory yields an empty index; a directory that cannot
//!   be listed is fatal.
//! - Files are visited in filename order; the first file claiming a key wins.

use std::collections::btree_map::Entry;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use url::Url;

use super::{PropertyIndex, PropertyIndexSupplier};
use crate::constants::{BASE_DIR_PROPERTY, DEFAULT_BASE_DIR, SEPARATOR_PROPERTY};
use crate::environment::PropertyResolver;
use crate::error::SecretsError;

/// Word separator used in secret filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Separator {
    #[default]
    Dot,
    Underscore,
}

impl Separator {
    pub const fn character(self) -> char {
        match self {
            Self::Dot => '.',
            Self::Underscore => '_',
        }
    }

    pub fn from_char(c: char) -> Result<Self, SecretsError> {
        match c {
            '.' => Ok(Self::Dot),
            '_' => Ok(Self::Underscore),
            other => Err(SecretsError::IllegalSeparator(other.to_string())),
        }
    }

    pub fn is_default(self) -> bool {
        self == Self::default()
    }
}

impl FromStr for Separator {
    type Err = SecretsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => Err(SecretsError::IllegalSeparator(s.to_string())),
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.character())
    }
}

/// Indexes every regular file of a directory by its filename.
pub struct FilenamePropertyIndexSupplier<'e> {
    environment: &'e dyn PropertyResolver,
}

impl<'e> FilenamePropertyIndexSupplier<'e> {
    pub fn new(environment: &'e dyn PropertyResolver) -> Self {
        Self { environment }
    }

    pub fn base_dir(&self) -> PathBuf {
        PathBuf::from(
            self.environment
                .get_property_or(BASE_DIR_PROPERTY, DEFAULT_BASE_DIR),
        )
    }

    pub fn separator(&self) -> Result<Separator, SecretsError> {
        match self.environment.get_property(SEPARATOR_PROPERTY) {
            Some(value) => value.parse(),
            None => Ok(Separator::default()),
        }
    }
}

impl PropertyIndexSupplier for FilenamePropertyIndexSupplier<'_> {
    fn get(&self) -> Result<PropertyIndex, SecretsError> {
        let separator = self.separator()?;
        let base_dir = self.base_dir();
        if !base_dir.is_dir() {
            tracing::debug!(base_dir = %base_dir.display(), "Secrets directory does not exist");
            return Ok(PropertyIndex::new());
        }

        let mut index = PropertyIndex::new();
        for path in list_files(&base_dir)? {
            let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                tracing::warn!(file = %path.display(), "Skipping file with non UTF-8 name");
                continue;
            };

            if !is_allowed(name, separator) {
                tracing::warn!(
                    file = %path.display(),
                    separator = %separator,
                    "Skipping ambiguous file, because of separator"
                );
                continue;
            }

            let Some(location) = to_uri(&path) else {
                tracing::warn!(file = %path.display(), "Skipping file without a file URI");
                continue;
            };

            match index.entry(convert_to_property_name(name, separator)) {
                Entry::Vacant(entry) => {
                    entry.insert(location);
                }
                Entry::Occupied(entry) => {
                    tracing::warn!(
                        property = %entry.key(),
                        file = %path.display(),
                        "Ignoring duplicate secret file"
                    );
                }
            }
        }
        Ok(index)
    }
}

/// Regular files of `dir` (symlinks followed), sorted by filename.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, SecretsError> {
    let listing_error = |source| SecretsError::DirectoryListing {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(listing_error)? {
        let path = entry.map_err(listing_error)?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// With a non-default separator, names containing a `.` past the first
/// character are ambiguous.
fn is_allowed(name: &str, separator: Separator) -> bool {
    let default = Separator::default().character();
    separator.is_default() || !matches!(name.rfind(default), Some(position) if position > 0)
}

fn convert_to_property_name(name: &str, separator: Separator) -> String {
    name.replace(separator.character(), ".").to_lowercase()
}

fn to_uri(path: &Path) -> Option<String> {
    let absolute = std::path::absolute(path).ok()?;
    Url::from_file_path(absolute).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn secrets_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), "secret\n").unwrap();
        }
        dir
    }

    fn config(base_dir: &Path, separator: Option<&str>) -> BTreeMap<String, String> {
        let mut config = BTreeMap::from([(
            BASE_DIR_PROPERTY.to_string(),
            base_dir.to_str().unwrap().to_string(),
        )]);
        if let Some(separator) = separator {
            config.insert(SEPARATOR_PROPERTY.to_string(), separator.to_string());
        }
        config
    }

    fn uri(dir: &TempDir, name: &str) -> String {
        to_uri(&dir.path().join(name)).unwrap()
    }

    #[test]
    fn test_dot_separator_indexes_all_files() {
        let dir = secrets_dir(&[
            "secret.empty",
            "spring.datasource.password",
            "spring.datasource.username",
            "spring_mail_host",
        ]);
        let config = config(dir.path(), Some("."));

        let index = FilenamePropertyIndexSupplier::new(&config).get().unwrap();

        assert_eq!(index.len(), 4);
        assert_eq!(index["secret.empty"], uri(&dir, "secret.empty"));
        assert_eq!(
            index["spring.datasource.password"],
            uri(&dir, "spring.datasource.password")
        );
        assert_eq!(index["spring_mail_host"], uri(&dir, "spring_mail_host"));
    }

    #[test]
    fn test_dot_separator_keeps_literal_names_apart() {
        let dir = secrets_dir(&["a.b", "a_b"]);
        let config = config(dir.path(), None);

        let index = FilenamePropertyIndexSupplier::new(&config).get().unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index["a.b"], uri(&dir, "a.b"));
        assert_eq!(index["a_b"], uri(&dir, "a_b"));
    }

    #[test]
    fn test_underscore_separator_skips_ambiguous_files() {
        let dir = secrets_dir(&[
            "secret.empty",
            "spring.datasource.username",
            "spring_datasource_password",
            "SPRING_MAIL_HOST",
            ".hidden",
        ]);
        let config = config(dir.path(), Some("_"));

        let index = FilenamePropertyIndexSupplier::new(&config).get().unwrap();

        assert_eq!(index.len(), 3);
        assert_eq!(
            index["spring.datasource.password"],
            uri(&dir, "spring_datasource_password")
        );
        assert_eq!(index["spring.mail.host"], uri(&dir, "SPRING_MAIL_HOST"));
        // A leading dot is not a word separator.
        assert_eq!(index[".hidden"], uri(&dir, ".hidden"));
    }

    #[test]
    fn test_duplicate_keys_keep_first_file() {
        let dir = secrets_dir(&["SPRING.MAIL.HOST", "spring.mail.host"]);
        let config = config(dir.path(), None);

        let index = FilenamePropertyIndexSupplier::new(&config).get().unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index["spring.mail.host"], uri(&dir, "SPRING.MAIL.HOST"));
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let dir = secrets_dir(&["spring.mail.host"]);
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/spring.mail.port"), "25").unwrap();
        let config = config(dir.path(), None);

        let index = FilenamePropertyIndexSupplier::new(&config).get().unwrap();

        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["spring.mail.host"]);
    }

    #[test]
    fn test_missing_directory_yields_empty_index() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir.path().join("missing"), None);

        let index = FilenamePropertyIndexSupplier::new(&config).get().unwrap();
        assert!(index.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_fatal() {
        use std::os::unix::fs::PermissionsExt;

        let dir = secrets_dir(&["spring.mail.host"]);
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users can list the directory regardless of its mode.
        let listable = fs::read_dir(dir.path()).is_ok();
        let config = config(dir.path(), None);

        let result = FilenamePropertyIndexSupplier::new(&config).get();
        fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();

        if listable {
            return;
        }
        assert!(matches!(
            result,
            Err(SecretsError::DirectoryListing { path, .. }) if path == dir.path()
        ));
    }

    #[test]
    fn test_file_as_base_dir_yields_empty_index() {
        let dir = secrets_dir(&["spring.mail.host"]);
        let config = config(&dir.path().join("spring.mail.host"), None);

        let index = FilenamePropertyIndexSupplier::new(&config).get().unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn test_illegal_separator_fails_on_get() {
        let dir = secrets_dir(&["spring.mail.host"]);
        let config = config(dir.path(), Some("/"));

        let supplier = FilenamePropertyIndexSupplier::new(&config);
        let result = supplier.get();
        assert!(matches!(result, Err(SecretsError::IllegalSeparator(s)) if s == "/"));
    }

    #[test]
    fn test_default_base_dir() {
        let config = BTreeMap::new();
        let supplier = FilenamePropertyIndexSupplier::new(&config);
        assert_eq!(supplier.base_dir(), PathBuf::from(DEFAULT_BASE_DIR));
        assert_eq!(supplier.separator().unwrap(), Separator::Dot);
    }

    #[test]
    fn test_separator_parsing() {
        assert_eq!(".".parse::<Separator>().unwrap(), Separator::Dot);
        assert_eq!("_".parse::<Separator>().unwrap(), Separator::Underscore);
        assert!("".parse::<Separator>().is_err());
        assert!("._".parse::<Separator>().is_err());
        assert!(Separator::from_char('-').is_err());
        assert_eq!(Separator::Underscore.to_string(), "_");
    }
}
