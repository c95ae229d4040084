//! Loading secret content from a location.
//!
//! Invariants:
//! - A secret is either fully loaded, non-blank and trimmed, or absent.
//! - No failure of a single location is ever propagated.

use std::io::Read;

use secrecy::SecretString;
use url::Url;

use crate::resource::{Resource, ResourceLoader};

/// Loads the content of a secret from its location.
pub trait SecretResolver {
    fn load_content(&self, location: &str) -> Option<SecretString>;

    fn load_uri(&self, location: &Url) -> Option<SecretString> {
        self.load_content(location.as_str())
    }

    /// Absent locations resolve to an absent secret.
    fn load_optional(&self, location: Option<&str>) -> Option<SecretString> {
        location.and_then(|location| self.load_content(location))
    }
}

impl<F> SecretResolver for F
where
    F: Fn(&str) -> Option<SecretString>,
{
    fn load_content(&self, location: &str) -> Option<SecretString> {
        self(location)
    }
}

/// Resolver reading locations through a [`ResourceLoader`].
#[derive(Debug, Clone, Copy)]
pub struct DefaultSecretResolver<'l> {
    resource_loader: &'l dyn ResourceLoader,
}

impl<'l> DefaultSecretResolver<'l> {
    pub fn new(resource_loader: &'l dyn ResourceLoader) -> Self {
        Self { resource_loader }
    }
}

impl SecretResolver for DefaultSecretResolver<'_> {
    fn load_content(&self, location: &str) -> Option<SecretString> {
        if location.trim().is_empty() {
            return None;
        }

        let resource = self.resource_loader.get_resource(location);
        if !resource.exists() {
            tracing::debug!(location, "Secret resource does not exist");
            return None;
        }

        let content = match read_content(resource.as_ref()) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(
                    resource = %resource.description(),
                    error = %e,
                    "Unable to read secret resource"
                );
                return None;
            }
        };

        let trimmed = content.trim();
        if trimmed.is_empty() {
            tracing::debug!(location, "Secret resource is blank");
            return None;
        }
        Some(SecretString::new(trimmed.into()))
    }
}

fn read_content(resource: &dyn Resource) -> std::io::Result<String> {
    let mut content = String::new();
    resource.open()?.read_to_string(&mut content)?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::DefaultResourceLoader;
    use crate::test_util::resources_dir;
    use secrecy::ExposeSecret;

    fn loader() -> DefaultResourceLoader {
        DefaultResourceLoader::with_roots([resources_dir().join("classpath")])
    }

    fn load(location: &str) -> Option<String> {
        let loader = loader();
        DefaultSecretResolver::new(&loader)
            .load_content(location)
            .map(|secret| secret.expose_secret().to_string())
    }

    #[test]
    fn test_content_is_trimmed() {
        assert_eq!(load("classpath:spring_mail_host").as_deref(), Some("localhost"));
        assert_eq!(
            load("classpath:spring.datasource.password").as_deref(),
            Some("s3cr3t")
        );
    }

    #[test]
    fn test_empty_file_is_absent() {
        assert!(load("classpath:secret.empty").is_none());
    }

    #[test]
    fn test_missing_location_is_absent() {
        assert!(load("classpath:nope").is_none());
        assert!(load("/definitely/not/here").is_none());
        assert!(load("https://example.com/secret").is_none());
    }

    #[test]
    fn test_blank_location_is_absent() {
        assert!(load("").is_none());
        assert!(load("   ").is_none());
    }

    #[test]
    fn test_absent_location_is_absent() {
        let loader = loader();
        let resolver = DefaultSecretResolver::new(&loader);
        assert!(resolver.load_optional(None).is_none());
        assert!(resolver.load_optional(Some("classpath:spring_mail_host")).is_some());
    }

    #[test]
    fn test_load_uri() {
        let loader = loader();
        let uri = Url::from_file_path(resources_dir().join("secrets/spring_mail_host")).unwrap();
        let secret = DefaultSecretResolver::new(&loader).load_uri(&uri).unwrap();
        assert_eq!(secret.expose_secret(), "localhost");
    }

    #[test]
    fn test_closure_resolver() {
        let resolver = |location: &str| Some(SecretString::new(location.into()));
        let secret = resolver.load_content("bob").unwrap();
        assert_eq!(secret.expose_secret(), "bob");
    }
}
