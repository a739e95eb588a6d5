//! Caller-facing pipeline: ingest, extract, persist

use crate::cancel::CancelSignal;
use crate::error::ExtractorError;
use crate::events::ExtractionEvent;
use crate::extractor::Extractor;
use crate::ingest::{reader_for, DocumentReader, IngestError};
use clausal_domain::traits::{AnalysisStore, StoreErrorKind};
use clausal_domain::{AnalysisId, AnalysisRecord, AnalysisResult, AnalysisSummary, DocumentMetadata};
use clausal_llm::{Document, DocumentProvider};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

/// What happened to the result after a successful extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Persistence {
    /// Stored under this id
    Saved(AnalysisId),
    /// The caller asked not to store it
    Skipped,
    /// Storing failed; the result is still valid
    Failed(String),
}

/// A validated analysis plus its persistence outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisOutcome {
    /// The validated analysis
    pub result: AnalysisResult,
    /// Persistence outcome
    pub persistence: Persistence,
}

/// Ingestion, extraction and storage behind one call
///
/// The store is shared behind `Arc<Mutex<_>>`; each save holds the lock for
/// a single insert.
pub struct AnalysisPipeline<S>
where
    S: AnalysisStore,
{
    extractor: Extractor,
    store: Arc<Mutex<S>>,
    reader: Option<Arc<dyn DocumentReader>>,
}

impl<S> AnalysisPipeline<S>
where
    S: AnalysisStore,
{
    /// Create a pipeline owning `store`
    pub fn new(extractor: Extractor, store: S) -> Self {
        Self::with_shared_store(extractor, Arc::new(Mutex::new(store)))
    }

    /// Create a pipeline over a store shared with other pipelines
    pub fn with_shared_store(extractor: Extractor, store: Arc<Mutex<S>>) -> Self {
        Self {
            extractor,
            store,
            reader: None,
        }
    }

    /// Use `reader` for every document instead of choosing by extension
    pub fn with_reader(mut self, reader: Arc<dyn DocumentReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// The shared store
    pub fn store(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.store)
    }

    /// The underlying extractor
    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Analyse one document and optionally persist the result
    ///
    /// A storage failure is reported in `persistence` and never discards a
    /// validated result. Cancelled extractions are never persisted.
    pub async fn analyze<P>(
        &self,
        filename: &str,
        bytes: Vec<u8>,
        provider: &P,
        persist: bool,
        cancel: &CancelSignal,
    ) -> Result<AnalysisOutcome, ExtractorError>
    where
        P: DocumentProvider + ?Sized,
    {
        let reader = match &self.reader {
            Some(reader) => Arc::clone(reader),
            None => reader_for(filename),
        };
        reader.check(&bytes)?;

        let (bytes, text, metadata) = read_document(reader, filename, bytes, provider.needs_text()).await?;
        let mut document = Document::from_bytes(filename, bytes);
        if let Some(text) = text {
            document = document.with_text(text);
        }

        let result = self
            .extractor
            .extract_with_metadata(&document, metadata, provider, cancel)
            .await?;

        let persistence = if !persist {
            Persistence::Skipped
        } else if cancel.is_cancelled() {
            info!("Extraction of '{}' cancelled after success; not saving", filename);
            Persistence::Skipped
        } else {
            self.save(filename, &result)
        };

        Ok(AnalysisOutcome { result, persistence })
    }

    fn save(&self, filename: &str, result: &AnalysisResult) -> Persistence {
        let saved = match self.lock() {
            Ok(mut store) => store.save(filename, result).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match saved {
            Ok(id) => {
                info!("Saved analysis of '{}' as {}", filename, id);
                self.extractor.events().emit(ExtractionEvent::Persisted { id });
                Persistence::Saved(id)
            }
            Err(reason) => {
                warn!("Failed to save analysis of '{}': {}", filename, reason);
                Persistence::Failed(reason)
            }
        }
    }

    /// Fetch one stored analysis
    pub fn get(&self, id: AnalysisId) -> Result<AnalysisRecord, ExtractorError> {
        self.lock()?.get_by_id(id).map_err(|e| {
            if e.is_not_found() {
                ExtractorError::NotFound(id)
            } else {
                ExtractorError::StorageUnavailable(e.to_string())
            }
        })
    }

    /// List stored analyses, most recent first
    pub fn list(&self) -> Result<Vec<AnalysisSummary>, ExtractorError> {
        self.lock()?
            .list_all()
            .map_err(|e| ExtractorError::StorageUnavailable(e.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, S>, ExtractorError> {
        self.store
            .lock()
            .map_err(|_| ExtractorError::StorageUnavailable("Store lock poisoned".to_string()))
    }
}

/// Parse the document off the async workers; PDF parsing is CPU-bound
async fn read_document(
    reader: Arc<dyn DocumentReader>,
    filename: &str,
    bytes: Vec<u8>,
    needs_text: bool,
) -> Result<(Vec<u8>, Option<String>, DocumentMetadata), ExtractorError> {
    let name = filename.to_string();
    let parsed = tokio::task::spawn_blocking(move || -> Result<_, IngestError> {
        let text = if needs_text {
            Some(reader.extract_text(&bytes)?)
        } else {
            None
        };
        let metadata = reader.extract_metadata(&bytes).unwrap_or_else(|e| {
            warn!("Could not read metadata of '{}': {}", name, e);
            DocumentMetadata::default()
        });
        Ok((bytes, text, metadata))
    })
    .await
    .map_err(|e| ExtractorError::InputInvalid(format!("Document reader task failed: {}", e)))??;

    Ok(parsed)
}
