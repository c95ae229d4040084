//! Output formatters for resolved secrets.
//!
//! Invariants:
//! - JSON output is always a valid array, even when empty.
//! - Table output prints a human message when nothing was resolved.

use anyhow::Result;

use crate::args::OutputFormat;
use crate::report::SecretEntry;

pub fn format(format: OutputFormat, entries: &[SecretEntry]) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(format_table(entries)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(entries)?),
    }
}

fn format_table(entries: &[SecretEntry]) -> String {
    if entries.is_empty() {
        return "No secrets resolved.".to_string();
    }

    let width = entries
        .iter()
        .map(|entry| entry.property.len())
        .max()
        .unwrap_or(0)
        .max("Property".len());

    let mut output = format!("{:<width$}  {}\n", "Property", "Value");
    output.push_str(&format!("{}\n", "-".repeat(width + 2 + "Value".len())));
    for entry in entries {
        output.push_str(&format!("{:<width$}  {}\n", entry.property, entry.value));
    }
    output.truncate(output.trim_end().len());
    output
}
