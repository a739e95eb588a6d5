//! Error types for the Extractor

use crate::ingest::IngestError;
use clausal_domain::AnalysisId;
use clausal_llm::LlmError;
use thiserror::Error;

/// Errors that can occur during extraction and retrieval
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The document cannot be analysed (never retried)
    #[error("Invalid input: {0}")]
    InputInvalid(String),

    /// The provider could not be reached or did not answer in time
    #[error("Provider call failed: {0}")]
    ProviderCallFailed(String),

    /// The provider answered with something that is not a valid analysis
    #[error("Malformed response: {0}")]
    ResponseMalformed(String),

    /// Every attempt failed; carries the last cause
    #[error("Extraction failed after {attempts} attempt(s): {cause}")]
    ExtractionFailed {
        /// Number of attempts made
        attempts: u32,
        /// Cause of the final attempt's failure
        cause: Box<ExtractorError>,
    },

    /// The analysis store could not be used
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// No stored analysis with this id
    #[error("Analysis not found: {0}")]
    NotFound(AnalysisId),

    /// The caller cancelled the extraction
    #[error("Extraction cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExtractorError {
    /// HTTP-style status class for wrappers that expose this over a transport
    pub fn status_code(&self) -> u16 {
        match self {
            ExtractorError::InputInvalid(_) => 400,
            ExtractorError::NotFound(_) => 404,
            ExtractorError::Cancelled => 499,
            ExtractorError::ProviderCallFailed(_)
            | ExtractorError::ResponseMalformed(_)
            | ExtractorError::ExtractionFailed { .. }
            | ExtractorError::StorageUnavailable(_)
            | ExtractorError::Config(_) => 500,
        }
    }

    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractorError::ProviderCallFailed(_) | ExtractorError::ResponseMalformed(_)
        )
    }

    /// Cause of the final attempt, for `ExtractionFailed`
    pub fn last_cause(&self) -> Option<&ExtractorError> {
        match self {
            ExtractorError::ExtractionFailed { cause, .. } => Some(cause),
            _ => None,
        }
    }
}

impl From<LlmError> for ExtractorError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::InvalidInput(msg) => ExtractorError::InputInvalid(msg),
            LlmError::Config(msg) => ExtractorError::Config(msg),
            e if e.is_malformed() => ExtractorError::ResponseMalformed(e.to_string()),
            e => ExtractorError::ProviderCallFailed(e.to_string()),
        }
    }
}

impl From<IngestError> for ExtractorError {
    fn from(e: IngestError) -> Self {
        ExtractorError::InputInvalid(e.to_string())
    }
}
