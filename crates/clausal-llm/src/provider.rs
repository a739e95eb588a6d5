//! Provider trait, configuration and run-time selection

use crate::{AnthropicProvider, Document, LlmError, OpenAiProvider};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default timeout for LLM requests (120 seconds; whole contracts are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Capability shared by every vendor: produce a candidate analysis
///
/// Implementations encode the request, make one network call and decode the
/// reply. They must not retry and must not schema-validate.
#[async_trait]
pub trait DocumentProvider: Send + Sync {
    /// Short provider name for logs
    fn name(&self) -> &str;

    /// Whether the provider needs `Document::text` rather than raw bytes
    fn needs_text(&self) -> bool;

    /// Send the document and decode the reply into JSON
    async fn analyze(&self, document: &Document) -> Result<Value, LlmError>;
}

/// Vendor selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Messages API
    Anthropic,
    /// OpenAI Chat Completions API
    OpenAi,
}

impl ProviderKind {
    /// Canonical selector string
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Environment variable conventionally holding the API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openai" | "open-ai" | "gpt" => Ok(ProviderKind::OpenAi),
            other => Err(LlmError::Config(format!("Unknown provider: {}", other))),
        }
    }
}

/// Per-adapter configuration, passed explicitly at construction
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key (never serialized)
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Model identifier
    pub model: String,

    /// API base URL, without trailing path
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum tokens the model may generate
    pub max_tokens: u32,
}

impl ProviderConfig {
    /// Defaults for the given vendor
    pub fn for_kind(kind: ProviderKind) -> Self {
        match kind {
            ProviderKind::Anthropic => Self {
                api_key: None,
                model: crate::anthropic::DEFAULT_MODEL.to_string(),
                endpoint: crate::anthropic::DEFAULT_ENDPOINT.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                max_tokens: crate::anthropic::DEFAULT_MAX_TOKENS,
            },
            ProviderKind::OpenAi => Self {
                api_key: None,
                model: crate::openai::DEFAULT_MODEL.to_string(),
                endpoint: crate::openai::DEFAULT_ENDPOINT.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                max_tokens: crate::openai::DEFAULT_MAX_TOKENS,
            },
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            return Err(LlmError::Config("API key is not configured".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::Config("model must not be empty".to_string()));
        }
        if self.endpoint.trim().is_empty() {
            return Err(LlmError::Config("endpoint must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(LlmError::Config("timeout_secs must be greater than 0".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(LlmError::Config("max_tokens must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Endpoint joined with an API path
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint.trim_end_matches('/'), path)
    }

    /// HTTP client honouring the configured timeout
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, LlmError> {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Map a non-success HTTP status to an error
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(LlmError::RateLimitExceeded);
    }
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(LlmError::ModelNotAvailable(model.to_string()));
    }

    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(LlmError::Communication(format!("HTTP {}: {}", status, error_text)))
}

/// A vendor adapter chosen at run time
pub enum Provider {
    /// Anthropic adapter
    Anthropic(AnthropicProvider),
    /// OpenAI adapter
    OpenAi(OpenAiProvider),
}

impl Provider {
    /// Build the adapter for `kind` from its configuration
    pub fn new(kind: ProviderKind, config: ProviderConfig) -> Result<Self, LlmError> {
        match kind {
            ProviderKind::Anthropic => AnthropicProvider::new(config).map(Provider::Anthropic),
            ProviderKind::OpenAi => OpenAiProvider::new(config).map(Provider::OpenAi),
        }
    }

    /// Which vendor this is
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Anthropic(_) => ProviderKind::Anthropic,
            Provider::OpenAi(_) => ProviderKind::OpenAi,
        }
    }
}

#[async_trait]
impl DocumentProvider for Provider {
    fn name(&self) -> &str {
        match self {
            Provider::Anthropic(p) => p.name(),
            Provider::OpenAi(p) => p.name(),
        }
    }

    fn needs_text(&self) -> bool {
        match self {
            Provider::Anthropic(p) => p.needs_text(),
            Provider::OpenAi(p) => p.needs_text(),
        }
    }

    async fn analyze(&self, document: &Document) -> Result<Value, LlmError> {
        match self {
            Provider::Anthropic(p) => p.analyze(document).await,
            Provider::OpenAi(p) => p.analyze(document).await,
        }
    }
}
