//! OpenAI Provider Implementation
//!
//! Sends pre-extracted contract text to the Chat Completions API and declares
//! the analysis shape as a strict JSON schema response format.

use crate::decode::decode_json;
use crate::prompt::{SCHEMA_NAME, TEXT_INSTRUCTIONS};
use crate::provider::check_status;
use crate::{Document, DocumentProvider, LlmError, ProviderConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Default OpenAI API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default generation budget
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Adapter for the OpenAI Chat Completions API
pub struct OpenAiProvider {
    config: ProviderConfig,
    client: reqwest::Client,
}

/// Request body for chat completions
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: Value,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Response from chat completions
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
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

    fn build_request<'a>(&'a self, document: &'a Document) -> Result<ChatRequest<'a>, LlmError> {
        let text = document.usable_text().ok_or_else(|| {
            LlmError::InvalidInput(format!(
                "Document '{}' has no extracted text",
                document.filename
            ))
        })?;

        Ok(ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: TEXT_INSTRUCTIONS,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            response_format: json!({
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "schema": clausal_validator::json_schema(),
                    "strict": true
                }
            }),
            max_tokens: self.config.max_tokens,
        })
    }

    async fn call(&self, document: &Document) -> Result<Value, LlmError> {
        let request = self.build_request(document)?;
        let api_key = self.config.api_key.as_deref().unwrap_or_default();

        let response = self
            .client
            .post(self.config.url("/v1/chat/completions"))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let response = check_status(response, &self.config.model).await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        let content = first_content(body)?;
        debug!("OpenAI response content length: {} chars", content.len());
        decode_json(&content)
    }
}

/// Content of the first choice; a refusal counts as malformed
fn first_content(response: ChatResponse) -> Result<String, LlmError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or(LlmError::EmptyResponse)?;

    if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
        return Err(LlmError::InvalidResponse(format!("Model refused: {}", refusal)));
    }

    message.content.ok_or(LlmError::EmptyResponse)
}

#[async_trait]
impl DocumentProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn needs_text(&self) -> bool {
        true
    }

    async fn analyze(&self, document: &Document) -> Result<Value, LlmError> {
        info!(
            "Preparing OpenAI request for '{}' ({} text chars, model {})",
            document.filename,
            document.text.as_ref().map_or(0, |t| t.len()),
            self.config.model
        );
        let start = Instant::now();

        let outcome = self.call(document).await;

        match &outcome {
            Ok(_) => info!("Received response from OpenAI in {:?}", start.elapsed()),
            Err(e) => warn!("OpenAI call failed after {:?}: {}", start.elapsed(), e),
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderKind;

    fn provider(endpoint: &str) -> OpenAiProvider {
        let config = ProviderConfig::for_kind(ProviderKind::OpenAi)
            .with_api_key("sk-test")
            .with_endpoint(endpoint);
        OpenAiProvider::new(config).unwrap()
    }

    fn parse(body: &str) -> ChatResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_request_declares_schema() {
        let provider = provider(DEFAULT_ENDPOINT);
        let document = Document::from_text("msa.txt", "1. Definitions. \"Services\" means...");

        let request = provider.build_request(&document).unwrap();
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "gpt-4o");
        assert_eq!(json["max_tokens"], 4000);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "1. Definitions. \"Services\" means...");
        assert_eq!(json["response_format"]["type"], "json_schema");
        assert_eq!(json["response_format"]["json_schema"]["name"], SCHEMA_NAME);
        assert_eq!(json["response_format"]["json_schema"]["strict"], true);
        assert!(json["response_format"]["json_schema"]["schema"]["properties"]["definitions"].is_object());
    }

    #[test]
    fn test_request_requires_text() {
        let provider = provider(DEFAULT_ENDPOINT);
        let document = Document::from_bytes("scan.pdf", b"%PDF-1.7".to_vec());
        assert!(matches!(
            provider.build_request(&document),
            Err(LlmError::InvalidInput(_))
        ));

        let blank = Document::from_bytes("scan.pdf", b"%PDF-1.7".to_vec()).with_text("  \n");
        assert!(provider.build_request(&blank).is_err());
    }

    #[test]
    fn test_first_content() {
        let body = parse(r#"{"choices": [{"message": {"content": "{\"clauses\": []}"}}]}"#);
        assert_eq!(first_content(body).unwrap(), "{\"clauses\": []}");
    }

    #[test]
    fn test_no_choices_is_empty() {
        assert_eq!(first_content(parse(r#"{"choices": []}"#)).unwrap_err(), LlmError::EmptyResponse);
        assert_eq!(
            first_content(parse(r#"{"choices": [{"message": {"content": null}}]}"#)).unwrap_err(),
            LlmError::EmptyResponse
        );
    }

    #[test]
    fn test_refusal_is_malformed() {
        let body = parse(
            r#"{"choices": [{"message": {"content": null, "refusal": "I can't help with that."}}]}"#,
        );
        let err = first_content(body).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("refused"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_communication_error() {
        let provider = provider("http://localhost:99999");
        let document = Document::from_text("msa.txt", "The parties agree...");

        match provider.analyze(&document).await {
            Err(LlmError::Communication(_)) => {} // Expected
            other => panic!("Expected Communication error, got {:?}", other),
        }
    }
}
