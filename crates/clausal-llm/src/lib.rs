//! Clausal LLM Provider Layer
//!
//! Vendor adapters that turn a contract document into a candidate analysis.
//!
//! # Architecture
//!
//! Every adapter implements [`DocumentProvider`]: encode the document into a
//! vendor request, send it, and decode the reply into a `serde_json::Value`.
//! Adapters never retry and never validate; the orchestrator in
//! `clausal-extractor` owns both.
//!
//! # Providers
//!
//! - `AnthropicProvider`: native PDF ingestion (document bytes, base64)
//! - `OpenAiProvider`: pre-extracted text with a declared JSON schema
//! - `MockProvider`: scripted responses for testing and dry runs
//!
//! The caller picks a vendor at run time through [`Provider`] and
//! [`ProviderKind`]; each adapter receives its own [`ProviderConfig`].
//!
//! # Examples
//!
//! ```
//! use clausal_llm::{Document, DocumentProvider, MockProvider};
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new(r#"{"clauses": [], "definitions": []}"#);
//! let document = Document::from_text("nda.txt", "The parties agree...");
//! let value = provider.analyze(&document).await.unwrap();
//! assert!(value["clauses"].as_array().unwrap().is_empty());
//! # });
//! ```

#![warn(missing_docs)]

pub mod anthropic;
pub mod decode;
pub mod document;
pub mod mock;
pub mod openai;
pub mod prompt;
pub mod provider;

use thiserror::Error;

pub use anthropic::AnthropicProvider;
pub use decode::decode_json;
pub use document::Document;
pub use mock::MockProvider;
pub use openai::OpenAiProvider;
pub use provider::{DocumentProvider, Provider, ProviderConfig, ProviderKind};

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Provider returned content that is not JSON
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider returned nothing to decode
    #[error("Empty response from provider")]
    EmptyResponse,

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The document cannot be sent to this provider
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Adapter misconfigured (missing key, bad endpoint)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Whether calling the provider again could succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::InvalidInput(_) | LlmError::Config(_))
    }

    /// Whether the provider answered but the payload was unusable
    pub fn is_malformed(&self) -> bool {
        matches!(self, LlmError::InvalidResponse(_) | LlmError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(LlmError::Communication("reset".into()).is_retryable());
        assert!(LlmError::InvalidResponse("not json".into()).is_retryable());
        assert!(LlmError::EmptyResponse.is_retryable());
        assert!(LlmError::RateLimitExceeded.is_retryable());
        assert!(!LlmError::InvalidInput("empty".into()).is_retryable());
        assert!(!LlmError::Config("no key".into()).is_retryable());
    }

    #[test]
    fn test_malformed_classification() {
        assert!(LlmError::InvalidResponse("x".into()).is_malformed());
        assert!(LlmError::EmptyResponse.is_malformed());
        assert!(!LlmError::Communication("x".into()).is_malformed());
    }
}
