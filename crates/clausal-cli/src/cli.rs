//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use clausal_domain::AnalysisId;
use clausal_llm::ProviderKind;
use std::path::PathBuf;

/// Clausal - Extract clauses and definitions from contracts.
#[derive(Debug, Parser)]
#[command(name = "clausal")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file path
    #[arg(long, global = true, env = "CLAUSAL_DATABASE")]
    pub database: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze a contract
    Analyze(AnalyzeArgs),

    /// List stored analyses, most recent first
    List,

    /// Show one stored analysis
    Show(ShowArgs),

    /// Print the effective configuration
    Config,
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Contract file (PDF, or .txt for plain text)
    pub file: PathBuf,

    /// LLM provider
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model override for the chosen provider
    #[arg(short, long)]
    pub model: Option<String>,

    /// Do not store the result
    #[arg(long)]
    pub no_save: bool,

    /// Use a canned empty response instead of calling a provider (implies --no-save)
    #[arg(long)]
    pub dry_run: bool,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,
}

impl AnalyzeArgs {
    /// API key given for `kind`, if any
    pub fn api_key(&self, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::Anthropic => self.anthropic_api_key.as_deref(),
            ProviderKind::OpenAi => self.openai_api_key.as_deref(),
        }
    }
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Analysis ID
    pub id: AnalysisId,
}

/// Provider argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderArg {
    /// Anthropic (native PDF input)
    Anthropic,
    /// OpenAI (extracted text input)
    Openai,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<ProviderArg> for ProviderKind {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Anthropic => ProviderKind::Anthropic,
            ProviderArg::Openai => ProviderKind::OpenAi,
        }
    }
}
