//! CLI argument definitions and parsing.

use clap::{Parser, ValueEnum};
use envsecrets::Separator;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "envsecrets")]
#[command(about = "Resolve secret files and *_FILE variables into configuration properties", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  envsecrets --base-dir /run/secrets\n  envsecrets --classpath ./config --config classpath:application.json --format json\n  SPRING_DATASOURCE_PASSWORD_FILE=/run/secrets/db envsecrets --show-values\n"
)]
pub struct Cli {
    /// Directory holding mounted secret files
    #[arg(long, env = "SECRETS_FILE_BASE_DIR", value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Word separator used in secret filenames ('.' or '_')
    #[arg(long, env = "SECRETS_FILE_SEPARATOR")]
    pub separator: Option<Separator>,

    /// Location of the application config data (JSON)
    #[arg(long, env = "ENVSECRETS_CONFIG", value_name = "LOCATION")]
    pub config: Option<String>,

    /// Root directory searched for `classpath:` locations (repeatable)
    #[arg(long, value_name = "DIR")]
    pub classpath: Vec<PathBuf>,

    /// Set a property with the highest precedence (repeatable)
    #[arg(short = 'D', long = "define", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub define: Vec<(String, String)>,

    /// Print secret values instead of masking them
    #[arg(long)]
    pub show_values: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.trim().is_empty() {
        return Err("property key must not be blank".to_string());
    }
    Ok((key.trim().to_string(), value.to_string()))
}
