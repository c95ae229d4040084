//! envsecrets - resolve secret references for an application environment.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Build an `Environment` from the process environment, `.env` and CLI overrides.
//! - Run the default post-processor chain and print the resolved secret properties.
//!
//! Does NOT handle:
//! - Secret indexing or loading (see `crates/secrets`).
//!
//! Invariants:
//! - Secret values are masked unless `--show-values` is given.
//! - Logs go to stderr so stdout stays machine-readable.

mod args;
mod error;
mod formatters;
mod report;

use anyhow::{Context, Result};
use args::Cli;
use clap::Parser;
use envsecrets::constants::{BASE_DIR_PROPERTY, CONFIG_LOCATION_PROPERTY, SEPARATOR_PROPERTY};
use envsecrets::{Application, DefaultResourceLoader, Environment, PostProcessorChain};
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run(&cli) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}

fn run(cli: &Cli) -> Result<()> {
    let environment = build_environment(cli)?;
    let secrets = report::collect(&environment, cli.show_values);
    let output = formatters::format(cli.format, &secrets)?;
    println!("{}", output);
    Ok(())
}

fn build_environment(cli: &Cli) -> Result<Environment> {
    let mut environment = Environment::standard()
        .load_dotenv()
        .context("Failed to load environment")?;

    for (key, value) in &cli.define {
        environment.set_system_property(key.clone(), value.clone());
    }
    if let Some(ref base_dir) = cli.base_dir {
        environment.set_system_property(BASE_DIR_PROPERTY, base_dir.to_string_lossy());
    }
    if let Some(separator) = cli.separator {
        environment.set_system_property(SEPARATOR_PROPERTY, separator.to_string());
    }
    if let Some(ref config) = cli.config {
        environment.set_system_property(CONFIG_LOCATION_PROPERTY, config.clone());
    }

    let loader = if cli.classpath.is_empty() {
        DefaultResourceLoader::new()
    } else {
        DefaultResourceLoader::with_roots(cli.classpath.iter().cloned())
    };
    let application = Application::with_resource_loader(loader);

    let chain = PostProcessorChain::with_defaults();
    tracing::debug!(processors = ?chain.names(), "Running post-processor chain");
    chain
        .run(&mut environment, &application)
        .context("Failed to resolve secrets")?;

    Ok(environment)
}
