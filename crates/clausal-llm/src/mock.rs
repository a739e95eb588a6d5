//! Scripted provider for tests and dry runs

use crate::decode::decode_json;
use crate::{Document, DocumentProvider, LlmError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock provider that replays scripted responses without network calls
///
/// Each call consumes the next scripted entry; once the script runs out the
/// last entry repeats. Raw text goes through the same decoding as the real
/// adapters, so a scripted `"not json"` yields `LlmError::InvalidResponse`.
///
/// # Examples
///
/// ```
/// use clausal_llm::{Document, DocumentProvider, LlmError, MockProvider};
///
/// # tokio_test::block_on(async {
/// let provider = MockProvider::sequence(vec![
///     Err(LlmError::RateLimitExceeded),
///     Ok(r#"{"clauses": [], "definitions": []}"#.to_string()),
/// ]);
/// let document = Document::from_text("nda.txt", "...");
///
/// assert!(provider.analyze(&document).await.is_err());
/// assert!(provider.analyze(&document).await.is_ok());
/// assert_eq!(provider.call_count(), 2);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    script: Arc<Vec<Result<String, LlmError>>>,
    call_count: Arc<Mutex<usize>>,
    needs_text: bool,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Always answer with the same raw text
    pub fn new(response: impl Into<String>) -> Self {
        Self::sequence(vec![Ok(response.into())])
    }

    /// Answer with the given outcomes in order, repeating the last
    pub fn sequence(script: Vec<Result<String, LlmError>>) -> Self {
        Self {
            script: Arc::new(script),
            call_count: Arc::new(Mutex::new(0)),
            needs_text: false,
            delay: None,
        }
    }

    /// Report that pre-extracted text is required
    pub fn with_needs_text(mut self, needs_text: bool) -> Self {
        self.needs_text = needs_text;
        self
    }

    /// Sleep before answering (honours paused tokio time)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times `analyze` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Reset the call count
    pub fn reset_call_count(&self) {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner()) = 0;
    }

    fn next_entry(&self) -> Result<String, LlmError> {
        let index = {
            let mut count = self.call_count.lock().unwrap_or_else(|e| e.into_inner());
            let index = *count;
            *count += 1;
            index
        };

        match self.script.get(index).or_else(|| self.script.last()) {
            Some(entry) => entry.clone(),
            None => Err(LlmError::EmptyResponse),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(r#"{"clauses": [], "definitions": []}"#)
    }
}

#[async_trait]
impl DocumentProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn needs_text(&self) -> bool {
        self.needs_text
    }

    async fn analyze(&self, document: &Document) -> Result<Value, LlmError> {
        let entry = self.next_entry();

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.needs_text && document.usable_text().is_none() {
            return Err(LlmError::InvalidInput(format!(
                "Document '{}' has no extracted text",
                document.filename
            )));
        }

        decode_json(&entry?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        Document::from_text("nda.txt", "Confidential Information means...")
    }

    #[tokio::test]
    async fn test_fixed_response() {
        let provider = MockProvider::new(r#"{"clauses": [], "definitions": []}"#);
        let value = provider.analyze(&document()).await.unwrap();
        assert!(value["definitions"].is_array());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_sequence_repeats_last() {
        let provider = MockProvider::sequence(vec![
            Ok("not json".to_string()),
            Ok(r#"{"clauses": []}"#.to_string()),
        ]);

        assert!(matches!(
            provider.analyze(&document()).await,
            Err(LlmError::InvalidResponse(_))
        ));
        assert!(provider.analyze(&document()).await.is_ok());
        assert!(provider.analyze(&document()).await.is_ok());
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_call_count() {
        let provider = MockProvider::default();
        let clone = provider.clone();
        clone.analyze(&document()).await.unwrap();
        assert_eq!(provider.call_count(), 1);

        provider.reset_call_count();
        assert_eq!(clone.call_count(), 0);
    }

    #[tokio::test]
    async fn test_needs_text_rejects_bytes_only() {
        let provider = MockProvider::default().with_needs_text(true);
        let bytes_only = Document::from_bytes("scan.pdf", b"%PDF-1.7".to_vec());
        assert!(matches!(
            provider.analyze(&bytes_only).await,
            Err(LlmError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_script() {
        let provider = MockProvider::sequence(Vec::new());
        assert_eq!(provider.analyze(&document()).await.unwrap_err(), LlmError::EmptyResponse);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_uses_tokio_time() {
        let provider = MockProvider::default().with_delay(Duration::from_secs(30));
        let start = tokio::time::Instant::now();
        provider.analyze(&document()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(30));
    }
}
