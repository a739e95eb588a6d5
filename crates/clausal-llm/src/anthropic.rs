//! Anthropic Provider Implementation
//!
//! Sends the contract PDF itself as a base64 `document` content block to the
//! Messages API, so no local text extraction is needed.
//!
//! # Examples
//!
//! ```no_run
//! use clausal_llm::{AnthropicProvider, ProviderConfig, ProviderKind};
//!
//! let config = ProviderConfig::for_kind(ProviderKind::Anthropic).with_api_key("sk-ant-...");
//! let provider = AnthropicProvider::new(config).unwrap();
//! ```

use crate::decode::decode_json;
use crate::prompt::DOCUMENT_INSTRUCTIONS;
use crate::provider::check_status;
use crate::{Document, DocumentProvider, LlmError, ProviderConfig};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Default Anthropic API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// Default model (PDF-capable)
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default generation budget
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Messages API version header value
pub const API_VERSION: &str = "2023-06-01";

/// Beta flag enabling PDF document blocks
pub const PDF_BETA: &str = "pdfs-2024-09-25";

/// Adapter for the Anthropic Messages API
pub struct AnthropicProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

/// Request body for the Messages API
#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Document { source: DocumentSource },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct DocumentSource {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'static str,
    data: String,
}

/// Response from the Messages API
#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the configuration is incomplete.
    pub fn new(config: ProviderConfig) -> Result<Self, LlmError> {
        config.validate()?;
        let client = config.http_client()?;
        Ok(Self { config, client })
    }

    /// The adapter's configuration
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn build_request<'a>(&'a self, document: &Document) -> Result<MessagesRequest<'a>, LlmError> {
        if document.bytes.is_empty() {
            return Err(LlmError::InvalidInput(format!(
                "Document '{}' has no content",
                document.filename
            )));
        }

        Ok(MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Document {
                        source: DocumentSource {
                            kind: "base64",
                            media_type: "application/pdf",
                            data: STANDARD.encode(&document.bytes),
                        },
                    },
                    ContentBlock::Text {
                        text: DOCUMENT_INSTRUCTIONS,
                    },
                ],
            }],
        })
    }

    async fn call(&self, document: &Document) -> Result<Value, LlmError> {
        let request = self.build_request(document)?;
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let response = self
            .client
            .post(self.config.url("/v1/messages"))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .header("anthropic-beta", PDF_BETA)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let response = check_status(response, &self.config.model).await?;
        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let text = collect_text(body);
        debug!("Anthropic response text length: {} chars", text.len());
        decode_json(&text)
    }
}

/// Join every text block of a response
fn collect_text(response: MessagesResponse) -> String {
    response
        .content
        .into_iter()
        .filter(|block| block.kind == "text")
        .filter_map(|block| block.text)
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl DocumentProvider for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn needs_text(&self) -> bool {
        false
    }

    async fn analyze(&self, document: &Document) -> Result<Value, LlmError> {
        info!(
            "Preparing Anthropic request for '{}' ({} bytes, model {})",
            document.filename,
            document.bytes.len(),
            self.config.model
        );
        let start = Instant::now();

        let outcome = self.call(document).await;

        match &outcome {
            Ok(_) => info!("Received response from Anthropic in {:?}", start.elapsed()),
            Err(e) => warn!("Anthropic call failed after {:?}: {}", start.elapsed(), e),
        }
        outcome
    }
}
