//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use clausal_extractor::ExtractorConfig;
use clausal_llm::{ProviderConfig, ProviderKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Global settings
    #[serde(default)]
    pub settings: Settings,

    /// Provider selection and per-provider settings
    #[serde(default)]
    pub providers: Providers,

    /// Retry and input limits
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Database file (defaults to ~/.clausal/analyses.db)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

/// Provider settings. API keys come from the environment, never this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Providers {
    /// Provider used when `--provider` is not given
    #[serde(default = "default_provider")]
    pub default: ProviderKind,

    /// Anthropic settings
    #[serde(default = "default_anthropic")]
    pub anthropic: ProviderConfig,

    /// OpenAI settings
    #[serde(default = "default_openai")]
    pub openai: ProviderConfig,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Directory holding the config file and default database.
    pub fn home() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".clausal"))
    }

    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home()?.join("config.toml"))
    }

    /// Load configuration from the default location, or defaults if absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Check the configuration for unusable values.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)
    }

    /// Database path, honouring the override from the command line.
    pub fn database_path(&self, cli_override: Option<&Path>) -> Result<PathBuf> {
        match cli_override.or(self.settings.database.as_deref()) {
            Some(path) => Ok(path.to_path_buf()),
            None => Ok(Self::home()?.join("analyses.db")),
        }
    }

    /// Settings for one provider (without an API key).
    pub fn provider(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Anthropic => &self.providers.anthropic,
            ProviderKind::OpenAi => &self.providers.openai,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            providers: Providers::default(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            database: None,
        }
    }
}

impl Default for Providers {
    fn default() -> Self {
        Self {
            default: default_provider(),
            anthropic: default_anthropic(),
            openai: default_openai(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_provider() -> ProviderKind {
    ProviderKind::Anthropic
}

fn default_anthropic() -> ProviderConfig {
    ProviderConfig::for_kind(ProviderKind::Anthropic)
}

fn default_openai() -> ProviderConfig {
    ProviderConfig::for_kind(ProviderKind::OpenAi)
}
