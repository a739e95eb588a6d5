//! Error types for the CLI application.

use clausal_extractor::ExtractorError;
use clausal_llm::LlmError;
use clausal_store::StoreError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction or retrieval error
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// Provider setup error
    #[error("Provider error: {0}")]
    Provider(#[from] LlmError),

    /// Database could not be opened
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Short category label, following the transport status classes
    pub fn category(&self) -> &'static str {
        match self {
            CliError::Extractor(e) => match e.status_code() {
                400 => "input",
                404 => "not found",
                499 => "cancelled",
                _ => match e {
                    ExtractorError::StorageUnavailable(_) => "storage",
                    ExtractorError::Config(_) => "config",
                    _ => "extraction",
                },
            },
            CliError::Store(_) => "storage",
            CliError::Config(_) | CliError::Provider(_) | CliError::Toml(_) => "config",
            CliError::InvalidInput(_) | CliError::Io(_) => "input",
            CliError::Serialization(_) => "output",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clausal_domain::AnalysisId;

    #[test]
    fn test_categories_follow_status_classes() {
        let input: CliError = ExtractorError::InputInvalid("empty".into()).into();
        assert_eq!(input.category(), "input");

        let missing: CliError = ExtractorError::NotFound(AnalysisId::from_value(3)).into();
        assert_eq!(missing.category(), "not found");

        let failed: CliError = ExtractorError::ExtractionFailed {
            attempts: 3,
            cause: Box::new(ExtractorError::ResponseMalformed("x".into())),
        }
        .into();
        assert_eq!(failed.category(), "extraction");

        let storage: CliError = ExtractorError::StorageUnavailable("locked".into()).into();
        assert_eq!(storage.category(), "storage");
    }

    #[test]
    fn test_extractor_message_passes_through() {
        let err: CliError = ExtractorError::Cancelled.into();
        assert_eq!(err.to_string(), "Extraction cancelled");
        assert_eq!(err.category(), "cancelled");
    }
}
