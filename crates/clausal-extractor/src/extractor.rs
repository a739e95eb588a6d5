//! Core Extractor implementation: bounded retry around one provider

use crate::cancel::CancelSignal;
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::events::{EventSink, ExtractionEvent};
use clausal_domain::{AnalysisResult, DocumentMetadata};
use clausal_llm::{Document, DocumentProvider};
use clausal_validator::{fill_missing_collections, validate, Validation};
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// The Extractor turns a document into a validated analysis
///
/// It calls the provider, validates the answer and retries retryable
/// failures with linear backoff. Attempts are strictly sequential.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
    events: EventSink,
}

impl Extractor {
    /// Create a new Extractor
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            events: EventSink::none(),
        }
    }

    /// Report progress to `events`
    pub fn with_events(mut self, events: EventSink) -> Self {
        self.events = events;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub(crate) fn events(&self) -> &EventSink {
        &self.events
    }

    /// Extract an analysis with empty document metadata
    pub async fn extract<P>(
        &self,
        document: &Document,
        provider: &P,
        cancel: &CancelSignal,
    ) -> Result<AnalysisResult, ExtractorError>
    where
        P: DocumentProvider + ?Sized,
    {
        self.extract_with_metadata(document, DocumentMetadata::default(), provider, cancel)
            .await
    }

    /// Extract an analysis and attach metadata read from the document
    ///
    /// # Errors
    ///
    /// - `InputInvalid` for unusable input (no provider call is made)
    /// - `ExtractionFailed` once `max_attempts` retryable failures occurred
    /// - `Cancelled` if `cancel` fires before success
    pub async fn extract_with_metadata<P>(
        &self,
        document: &Document,
        metadata: DocumentMetadata,
        provider: &P,
        cancel: &CancelSignal,
    ) -> Result<AnalysisResult, ExtractorError>
    where
        P: DocumentProvider + ?Sized,
    {
        self.check_input(document, provider)?;
        if cancel.is_cancelled() {
            return Err(ExtractorError::Cancelled);
        }

        let max_attempts = self.config.max_attempts.max(1);
        info!(
            "Starting extraction of '{}' with provider '{}' (max {} attempts)",
            document.filename,
            provider.name(),
            max_attempts
        );
        self.events.emit(ExtractionEvent::Started);

        let mut attempt = 1;
        loop {
            self.events.emit(ExtractionEvent::AttemptStarted { attempt });

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Extraction of '{}' cancelled during attempt {}", document.filename, attempt);
                    return Err(ExtractorError::Cancelled);
                }
                outcome = self.attempt(document, provider) => outcome,
            };

            let cause = match outcome {
                Ok(result) => {
                    info!(
                        "Extraction of '{}' succeeded on attempt {}: {} clauses, {} definitions",
                        document.filename,
                        attempt,
                        result.clauses.len(),
                        result.definitions.len()
                    );
                    self.events.emit(ExtractionEvent::Validated {
                        clauses: result.clauses.len(),
                        definitions: result.definitions.len(),
                    });
                    return Ok(result.with_metadata(metadata));
                }
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => e,
            };

            warn!("Attempt {}/{} failed: {}", attempt, max_attempts, cause);
            self.events.emit(ExtractionEvent::AttemptFailed {
                attempt,
                reason: cause.to_string(),
            });

            if attempt >= max_attempts {
                return Err(ExtractorError::ExtractionFailed {
                    attempts: attempt,
                    cause: Box::new(cause),
                });
            }

            let delay = self.config.backoff_delay(attempt);
            debug!("Backing off {:?} before attempt {}", delay, attempt + 1);
            self.events.emit(ExtractionEvent::Backoff {
                delay_ms: delay.as_millis() as u64,
            });

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!("Extraction of '{}' cancelled during backoff", document.filename);
                    return Err(ExtractorError::Cancelled);
                }
                _ = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    }

    /// Reject input that no number of retries could fix
    fn check_input<P>(&self, document: &Document, provider: &P) -> Result<(), ExtractorError>
    where
        P: DocumentProvider + ?Sized,
    {
        if document.is_empty() {
            return Err(ExtractorError::InputInvalid(format!(
                "Document '{}' is empty",
                document.filename
            )));
        }
        if document.bytes.len() > self.config.max_document_bytes {
            return Err(ExtractorError::InputInvalid(format!(
                "Document '{}' is {} bytes (max: {})",
                document.filename,
                document.bytes.len(),
                self.config.max_document_bytes
            )));
        }
        if provider.needs_text() && document.usable_text().is_none() {
            return Err(ExtractorError::InputInvalid(format!(
                "Provider '{}' needs document text, but none was extracted from '{}'",
                provider.name(),
                document.filename
            )));
        }
        Ok(())
    }

    /// One provider call followed by validation
    async fn attempt<P>(&self, document: &Document, provider: &P) -> Result<AnalysisResult, ExtractorError>
    where
        P: DocumentProvider + ?Sized,
    {
        let mut value = timeout(self.config.attempt_timeout(), provider.analyze(document))
            .await
            .map_err(|_| {
                ExtractorError::ProviderCallFailed(format!(
                    "No response within {:?}",
                    self.config.attempt_timeout()
                ))
            })??;

        let filled = fill_missing_collections(&mut value);
        if !filled.is_empty() {
            debug!("Provider omitted {:?}; defaulted to empty", filled);
        }

        match validate(&value) {
            Validation::Valid(result) => Ok(result),
            Validation::Invalid(defects) => {
                let listed: Vec<String> = defects.iter().map(ToString::to_string).collect();
                Err(ExtractorError::ResponseMalformed(format!(
                    "Schema violations: {}",
                    listed.join("; ")
                )))
            }
        }
    }
}
