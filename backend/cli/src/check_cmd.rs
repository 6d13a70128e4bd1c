//! CLI Check Command
//!
//! Reports which settings are present and whether the configuration would start.

use anyhow::Result;

use crate::config::Config;

const REQUIRED: &[&str] = &["TELEGRAM_BOT_TOKEN", "GEMINI_API_KEY"];
const OPTIONAL: &[&str] = &[
    "ETEON_MODEL",
    "ETEON_GEMINI_BASE_URL",
    "ETEON_REQUEST_TIMEOUT_SECS",
    "ETEON_LOG_LEVEL",
    "ETEON_LOG_FORMAT",
    "ETEON_LOG_DIR",
];

/// Print variable status and the redacted configuration. Fails when invalid.
pub fn run(config: &Config) -> Result<()> {
    println!("Checking environment variables:");
    for name in REQUIRED {
        println!("  {name}: {}", status(name, "missing (required)"));
    }
    for name in OPTIONAL {
        println!("  {name}: {}", status(name, "default"));
    }

    println!("\nResolved configuration:\n{config:#?}\n");

    config.validate()?;
    println!("Configuration is valid.");
    Ok(())
}

fn status(name: &str, unset: &'static str) -> &'static str {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => "set",
        _ => unset,
    }
}
