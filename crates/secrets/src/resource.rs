//! Resource loading primitives used to read secret content.
//!
//! Responsibilities:
//! - Map a location string to a `Resource` handle.
//! - Support `classpath:` locations (resolved against resource roots),
//!   `file:` URIs and plain filesystem paths.
//!
//! Does NOT handle:
//! - Trimming or validating content (see `resolver.rs`).
//!
//! Invariants:
//! - Getting a resource never fails; unsupported or missing locations yield a
//!   handle whose `exists()` is false.
//! - Handles are opened per read and never cached.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use url::Url;

use crate::constants::CLASSPATH_URL_PREFIX;

/// Handle to content at a location.
pub trait Resource: fmt::Debug {
    fn exists(&self) -> bool;

    /// Open a fresh stream over the content.
    fn open(&self) -> io::Result<Box<dyn Read + '_>>;

    /// Human readable description used in log lines.
    fn description(&self) -> String;
}

/// Factory of [`Resource`] handles.
pub trait ResourceLoader: fmt::Debug {
    fn get_resource(&self, location: &str) -> Box<dyn Resource>;
}

/// A file on the local filesystem.
#[derive(Debug, Clone)]
struct FileResource {
    path: PathBuf,
}

impl Resource for FileResource {
    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn description(&self) -> String {
        format!("file [{}]", self.path.display())
    }
}

/// A file looked up relative to the loader's resource roots.
#[derive(Debug, Clone)]
struct ClasspathResource {
    location: String,
    resolved: Option<PathBuf>,
}

impl Resource for ClasspathResource {
    fn exists(&self) -> bool {
        self.resolved.is_some()
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        match &self.resolved {
            Some(path) => Ok(Box::new(File::open(path)?)),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("class path resource [{}] does not exist", self.location),
            )),
        }
    }

    fn description(&self) -> String {
        format!("class path resource [{}]", self.location)
    }
}

/// A location whose scheme this loader cannot read.
#[derive(Debug, Clone)]
struct UnsupportedResource {
    location: String,
}

impl Resource for UnsupportedResource {
    fn exists(&self) -> bool {
        false
    }

    fn open(&self) -> io::Result<Box<dyn Read + '_>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("unsupported resource location [{}]", self.location),
        ))
    }

    fn description(&self) -> String {
        format!("URL [{}]", self.location)
    }
}

/// Loader used when the application does not provide one.
#[derive(Debug, Clone)]
pub struct DefaultResourceLoader {
    roots: Vec<PathBuf>,
}

impl Default for DefaultResourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultResourceLoader {
    /// Resolve `classpath:` locations against the current directory.
    pub fn new() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
        }
    }

    /// Resolve `classpath:` locations against the given roots, in order.
    pub fn with_roots<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn classpath_resource(&self, location: &str) -> ClasspathResource {
        let relative = location.trim_start_matches('/');
        let resolved = self
            .roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.is_file());
        ClasspathResource {
            location: relative.to_string(),
            resolved,
        }
    }
}

/// Whether `location` looks like a URL rather than a (Windows) path.
fn parse_url(location: &str) -> Option<Url> {
    Url::parse(location)
        .ok()
        .filter(|url| url.scheme().len() > 1)
}

impl ResourceLoader for DefaultResourceLoader {
    fn get_resource(&self, location: &str) -> Box<dyn Resource> {
        if let Some(path) = location.strip_prefix(CLASSPATH_URL_PREFIX) {
            return Box::new(self.classpath_resource(path));
        }

        match parse_url(location) {
            Some(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Box::new(FileResource { path }),
                Err(()) => Box::new(UnsupportedResource {
                    location: location.to_string(),
                }),
            },
            Some(_) => Box::new(UnsupportedResource {
                location: location.to_string(),
            }),
            None => Box::new(FileResource {
                path: Path::new(location).to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::resources_dir;

    fn read(resource: &dyn Resource) -> String {
        let mut content = String::new();
        resource
            .open()
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    #[test]
    fn test_classpath_resource() {
        let loader = DefaultResourceLoader::with_roots([resources_dir().join("classpath")]);
        let resource = loader.get_resource("classpath:spring_mail_host");
        assert!(resource.exists());
        assert_eq!(read(resource.as_ref()), "localhost\n");

        let leading_slash = loader.get_resource("classpath:/spring_mail_host");
        assert!(leading_slash.exists());
    }

    #[test]
    fn test_classpath_roots_are_searched_in_order() {
        let loader = DefaultResourceLoader::with_roots([
            resources_dir().join("secrets"),
            resources_dir().join("classpath"),
        ]);
        let resource = loader.get_resource("classpath:spring.datasource.username");
        assert_eq!(read(resource.as_ref()), "alice\n");

        let fallback = loader.get_resource("classpath:application.json");
        assert!(fallback.exists());
    }

    #[test]
    fn test_missing_classpath_resource() {
        let loader = DefaultResourceLoader::with_roots([resources_dir().join("classpath")]);
        let resource = loader.get_resource("classpath:does-not-exist");
        assert!(!resource.exists());
        assert!(resource.open().is_err());
        assert!(resource.description().contains("does-not-exist"));
    }

    #[test]
    fn test_file_uri_resource() {
        let path = resources_dir().join("secrets/spring_mail_host");
        let uri = Url::from_file_path(&path).unwrap();
        let resource = DefaultResourceLoader::new().get_resource(uri.as_str());
        assert!(resource.exists());
        assert_eq!(read(resource.as_ref()), "localhost\n");
    }

    #[test]
    fn test_plain_path_resource() {
        let path = resources_dir().join("secrets/spring.datasource.username");
        let resource = DefaultResourceLoader::new().get_resource(path.to_str().unwrap());
        assert!(resource.exists());
        assert_eq!(read(resource.as_ref()), "alice\n");
    }

    #[test]
    fn test_directory_is_not_a_resource() {
        let resource = DefaultResourceLoader::new().get_resource(resources_dir().to_str().unwrap());
        assert!(!resource.exists());
    }

    #[test]
    fn test_unsupported_scheme() {
        let resource = DefaultResourceLoader::new().get_resource("https://example.com/secret");
        assert!(!resource.exists());
        let Err(err) = resource.open() else {
            panic!("expected unsupported scheme to fail");
        };
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }
}
