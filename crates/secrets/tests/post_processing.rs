//! End-to-end runs of the default post-processor chain.

use std::fs;
use std::path::PathBuf;

use envsecrets::constants::{
    BASE_DIR_PROPERTY, CONFIG_LOCATION_PROPERTY, SECRET_PROPERTIES_SOURCE_NAME,
    SEPARATOR_PROPERTY, SYSTEM_ENVIRONMENT_SOURCE_NAME,
};
use envsecrets::{
    Application, DefaultResourceLoader, Environment, PostProcessorChain, PropertyResolver,
    SecretsError,
};
use serial_test::serial;
use tempfile::TempDir;

fn resources() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/resources")
}

fn application() -> Application {
    Application::with_resource_loader(DefaultResourceLoader::with_roots([
        resources().join("classpath"),
    ]))
}

fn secret(environment: &Environment, key: &str) -> Option<String> {
    environment
        .property_sources()
        .get(SECRET_PROPERTIES_SOURCE_NAME)
        .and_then(|layer| layer.get(key))
        .map(str::to_string)
}

#[test]
fn test_full_chain_resolves_every_convention() {
    let secrets_dir = TempDir::new().unwrap();
    fs::write(secrets_dir.path().join("spring.datasource.username"), "alice\n").unwrap();
    fs::write(secrets_dir.path().join("spring.datasource.url"), "jdbc:postgresql://db/app\n").unwrap();
    let smtp_password = secrets_dir.path().join("smtp");
    fs::write(&smtp_password, "  mailpass  ").unwrap();

    let mut environment = Environment::with_system_environment([
        (
            "SPRING_DATASOURCE_USERNAME_FILE".to_string(),
            "classpath:spring.datasource.username".to_string(),
        ),
        (
            "SMTP_PASSWORD_FILE".to_string(),
            smtp_password.to_string_lossy().into_owned(),
        ),
    ]);
    environment.set_system_property(BASE_DIR_PROPERTY, secrets_dir.path().to_string_lossy());
    environment.set_system_property(CONFIG_LOCATION_PROPERTY, "classpath:application.json");

    PostProcessorChain::with_defaults()
        .run(&mut environment, &application())
        .unwrap();

    // filename stage, overridden by the suffix stage
    assert_eq!(secret(&environment, "spring.datasource.username").as_deref(), Some("bob"));
    assert_eq!(
        secret(&environment, "spring.datasource.url").as_deref(),
        Some("jdbc:postgresql://db/app")
    );
    // filename config data declared in application.json
    assert_eq!(secret(&environment, "spring.datasource.password").as_deref(), Some("s3cr3t"));
    // environment config data declared in application.json
    assert_eq!(secret(&environment, "spring.mail.password").as_deref(), Some("mailpass"));

    // regular config data still visible, secrets layer outranks it
    assert_eq!(environment.get_property("port").as_deref(), Some("8080"));
    assert_eq!(
        environment.get_property("spring.datasource.username").as_deref(),
        Some("bob")
    );
}

#[test]
fn test_secret_layer_is_placed_after_system_environment() {
    let mut environment = Environment::with_system_environment([(
        "SPRING_MAIL_HOST_FILE",
        "classpath:spring_mail_host",
    )]);
    environment.set_system_property(CONFIG_LOCATION_PROPERTY, "classpath:none.json");
    environment.set_system_property(BASE_DIR_PROPERTY, "/definitely/not/here");

    PostProcessorChain::with_defaults()
        .run(&mut environment, &application())
        .unwrap();

    let sources = environment.property_sources();
    let system = sources.position(SYSTEM_ENVIRONMENT_SOURCE_NAME).unwrap();
    assert_eq!(sources.position(SECRET_PROPERTIES_SOURCE_NAME), Some(system + 1));
    assert_eq!(environment.get_property("spring.mail.host").as_deref(), Some("localhost"));
}

#[test]
fn test_underscore_separator_converts_filenames() {
    let mut environment = Environment::new();
    environment.set_system_property(
        BASE_DIR_PROPERTY,
        resources().join("secrets").to_string_lossy(),
    );
    environment.set_system_property(SEPARATOR_PROPERTY, "_");
    environment.set_system_property(CONFIG_LOCATION_PROPERTY, "classpath:none.json");

    PostProcessorChain::with_defaults()
        .run(&mut environment, &application())
        .unwrap();

    assert_eq!(secret(&environment, "spring.mail.host").as_deref(), Some("localhost"));
    assert_eq!(secret(&environment, "spring.datasource.password").as_deref(), Some("hunter3"));
    // dotted filenames are ambiguous under '_' and skipped
    assert!(secret(&environment, "spring.datasource.username").is_none());
}

#[test]
fn test_invalid_config_data_aborts_chain() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("application.json");
    fs::write(&config, "[1, 2").unwrap();

    let mut environment = Environment::new();
    environment.set_system_property(CONFIG_LOCATION_PROPERTY, config.to_string_lossy());

    let result = PostProcessorChain::with_defaults().run(&mut environment, &application());

    assert!(matches!(result, Err(SecretsError::ConfigDataParse { .. })));
}

#[test]
#[serial]
fn test_standard_environment_snapshots_process_variables() {
    temp_env::with_vars(
        [(
            "ENVSECRETS_IT_MAIL_HOST_FILE",
            Some(resources().join("secrets/spring_mail_host").to_string_lossy().into_owned()),
        )],
        || {
            let mut environment = Environment::standard();
            environment.set_system_property(CONFIG_LOCATION_PROPERTY, "classpath:none.json");
            environment.set_system_property(BASE_DIR_PROPERTY, "/definitely/not/here");

            PostProcessorChain::with_defaults()
                .run(&mut environment, &application())
                .unwrap();

            assert_eq!(
                secret(&environment, "envsecrets.it.mail.host").as_deref(),
                Some("localhost")
            );
        },
    );
}
