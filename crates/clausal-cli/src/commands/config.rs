//! Config command implementation.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use clausal_llm::ProviderKind;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(config: &Config, database: &Path, formatter: &Formatter) -> Result<()> {
    println!("{}", describe(config, database, formatter, |kind| {
        std::env::var(kind.api_key_env()).map_or(false, |v| !v.trim().is_empty())
    })?);
    Ok(())
}

/// Effective configuration plus API key presence, never the keys themselves.
fn describe(
    config: &Config,
    database: &Path,
    formatter: &Formatter,
    key_set: impl Fn(ProviderKind) -> bool,
) -> Result<String> {
    let mut lines = vec![config.to_toml()?];
    lines.push(formatter.info(&format!("Database: {}", database.display())));

    for kind in [ProviderKind::Anthropic, ProviderKind::OpenAi] {
        let line = if key_set(kind) {
            formatter.success(&format!("{} is set", kind.api_key_env()))
        } else {
            formatter.warning(&format!("{} is not set", kind.api_key_env()))
        };
        lines.push(line);
    }

    Ok(lines.join("\n"))
}
