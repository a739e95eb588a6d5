//! Integration tests for AnalysisPipeline
//!
//! These run the full ingest → extract → persist cycle against an in-memory
//! SQLite store, plus a store that always fails.

use clausal_domain::traits::{AnalysisStore, StoreErrorKind};
use clausal_domain::{AnalysisId, AnalysisRecord, AnalysisResult, AnalysisSummary, DocumentMetadata};
use clausal_extractor::{
    AnalysisPipeline, CancelSignal, DocumentReader, Extractor, ExtractorConfig, ExtractorError,
    IngestError, Persistence, PlainTextReader,
};
use clausal_llm::MockProvider;
use clausal_store::SqliteStore;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

const TERMINATION: &str = r#"{
    "clauses": [
        {
            "type": "Termination",
            "summary": "Either party may terminate on 30 days written notice.",
            "text": "Either party may terminate this Agreement upon thirty (30) days written notice.",
            "citation": "Page 4, Section 9.1"
        }
    ],
    "definitions": [
        {
            "term": "Agreement",
            "definition": "This Master Services Agreement and its exhibits.",
            "citation": "Page 1, Section 1.1"
        }
    ]
}"#;

fn extractor() -> Extractor {
    Extractor::new(ExtractorConfig {
        base_delay_ms: 0,
        ..Default::default()
    })
}

fn pipeline() -> AnalysisPipeline<SqliteStore> {
    AnalysisPipeline::new(extractor(), SqliteStore::new(":memory:").unwrap())
}

fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.7\n% not a complete document".to_vec()
}

/// A store whose every operation fails
struct BrokenStore;

#[derive(Debug)]
struct BrokenStoreError;

impl fmt::Display for BrokenStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "disk I/O error")
    }
}

impl StoreErrorKind for BrokenStoreError {
    fn is_not_found(&self) -> bool {
        false
    }
}

impl AnalysisStore for BrokenStore {
    type Error = BrokenStoreError;

    fn save(&mut self, _filename: &str, _result: &AnalysisResult) -> Result<AnalysisId, Self::Error> {
        Err(BrokenStoreError)
    }

    fn get_by_id(&self, _id: AnalysisId) -> Result<AnalysisRecord, Self::Error> {
        Err(BrokenStoreError)
    }

    fn list_all(&self) -> Result<Vec<AnalysisSummary>, Self::Error> {
        Err(BrokenStoreError)
    }
}

/// Plain-text reader that records which thread parsed the document
#[derive(Default)]
struct ThreadRecordingReader {
    threads: Mutex<Vec<ThreadId>>,
}

impl ThreadRecordingReader {
    fn record(&self) {
        self.threads.lock().unwrap().push(thread::current().id());
    }
}

impl DocumentReader for ThreadRecordingReader {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, IngestError> {
        self.record();
        PlainTextReader.extract_text(bytes)
    }

    fn extract_metadata(&self, _bytes: &[u8]) -> Result<DocumentMetadata, IngestError> {
        self.record();
        Ok(DocumentMetadata::default())
    }
}

#[tokio::test]
async fn test_analyze_and_persist() {
    let pipeline = pipeline();
    let provider = MockProvider::new(TERMINATION);

    let outcome = pipeline
        .analyze("msa.pdf", pdf_bytes(), &provider, true, &CancelSignal::new())
        .await
        .unwrap();

    let id = match outcome.persistence {
        Persistence::Saved(id) => id,
        other => panic!("Expected Saved, got {:?}", other),
    };

    let record = pipeline.get(id).unwrap();
    assert_eq!(record.filename, "msa.pdf");
    assert_eq!(record.content, outcome.result);
    assert_eq!(record.content.definitions[0].term, "Agreement");
}

#[tokio::test]
async fn test_unreadable_metadata_degrades_to_empty() {
    let pipeline = pipeline();
    let provider = MockProvider::new(TERMINATION);

    // Header is valid but the body is not a parseable PDF
    let outcome = pipeline
        .analyze("msa.pdf", pdf_bytes(), &provider, false, &CancelSignal::new())
        .await
        .unwrap();

    assert!(outcome.result.metadata.is_empty());
    assert_eq!(outcome.persistence, Persistence::Skipped);
}

#[tokio::test]
async fn test_no_save_skips_store() {
    let pipeline = pipeline();
    let provider = MockProvider::new(TERMINATION);

    let outcome = pipeline
        .analyze("msa.pdf", pdf_bytes(), &provider, false, &CancelSignal::new())
        .await
        .unwrap();

    assert_eq!(outcome.persistence, Persistence::Skipped);
    assert!(pipeline.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_persistence_failure_keeps_result() {
    let pipeline = AnalysisPipeline::new(extractor(), BrokenStore);
    let provider = MockProvider::new(TERMINATION);

    let outcome = pipeline
        .analyze("msa.pdf", pdf_bytes(), &provider, true, &CancelSignal::new())
        .await
        .unwrap();

    assert_eq!(outcome.result.clauses[0].clause_type, "Termination");
    assert_eq!(outcome.persistence, Persistence::Failed("disk I/O error".to_string()));
}

#[tokio::test]
async fn test_non_pdf_rejected_without_calls() {
    let pipeline = pipeline();
    let provider = MockProvider::new(TERMINATION);

    let err = pipeline
        .analyze("msa.pdf", b"PK\x03\x04 zip archive".to_vec(), &provider, true, &CancelSignal::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractorError::InputInvalid(_)));
    assert_eq!(provider.call_count(), 0);
    assert!(pipeline.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_text_provider_gets_extracted_text() {
    let pipeline = pipeline();
    let provider = MockProvider::new(TERMINATION).with_needs_text(true);

    let outcome = pipeline
        .analyze(
            "msa.txt",
            b"Either party may terminate this Agreement upon thirty (30) days written notice.".to_vec(),
            &provider,
            true,
            &CancelSignal::new(),
        )
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 1);
    assert!(matches!(outcome.persistence, Persistence::Saved(_)));
}

#[tokio::test]
async fn test_blank_text_is_invalid_input() {
    let pipeline = AnalysisPipeline::new(extractor(), SqliteStore::new(":memory:").unwrap())
        .with_reader(Arc::new(PlainTextReader));
    let provider = MockProvider::new(TERMINATION).with_needs_text(true);

    let err = pipeline
        .analyze("scan.pdf", b"   \n".to_vec(), &provider, true, &CancelSignal::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractorError::InputInvalid(_)));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_exhausted_retries_persist_nothing() {
    let pipeline = pipeline();
    let provider = MockProvider::new("not json");

    let err = pipeline
        .analyze("msa.pdf", pdf_bytes(), &provider, true, &CancelSignal::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractorError::ExtractionFailed { attempts: 3, .. }));
    assert!(pipeline.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_cancelled_extraction_not_persisted() {
    let pipeline = pipeline();
    let provider = MockProvider::new(TERMINATION);
    let cancel = CancelSignal::new();
    cancel.cancel();

    let err = pipeline
        .analyze("msa.pdf", pdf_bytes(), &provider, true, &cancel)
        .await
        .unwrap_err();

    assert!(matches!(err, ExtractorError::Cancelled));
    assert!(pipeline.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_and_get_after_several_saves() {
    let pipeline = pipeline();
    let provider = MockProvider::new(TERMINATION);

    let mut ids = Vec::new();
    for name in ["a.pdf", "b.pdf", "c.pdf"] {
        let outcome = pipeline
            .analyze(name, pdf_bytes(), &provider, true, &CancelSignal::new())
            .await
            .unwrap();
        if let Persistence::Saved(id) = outcome.persistence {
            ids.push(id);
        }
    }

    let listed: Vec<AnalysisId> = pipeline.list().unwrap().into_iter().map(|s| s.id).collect();
    ids.reverse();
    assert_eq!(listed, ids);
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let pipeline = pipeline();
    let err = pipeline.get(AnalysisId::from_value(42)).unwrap_err();
    assert!(matches!(err, ExtractorError::NotFound(_)));
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_broken_store_lookups_are_unavailable() {
    let pipeline = AnalysisPipeline::new(extractor(), BrokenStore);

    let err = pipeline.get(AnalysisId::from_value(1)).unwrap_err();
    assert!(matches!(err, ExtractorError::StorageUnavailable(_)));
    assert!(matches!(pipeline.list(), Err(ExtractorError::StorageUnavailable(_))));
}

#[tokio::test]
async fn test_shared_store_across_concurrent_pipelines() {
    let store = Arc::new(Mutex::new(SqliteStore::new(":memory:").unwrap()));
    let first = AnalysisPipeline::with_shared_store(extractor(), Arc::clone(&store));
    let second = AnalysisPipeline::with_shared_store(extractor(), Arc::clone(&store));
    let provider = MockProvider::new(TERMINATION);
    let cancel = CancelSignal::new();

    let (a, b) = tokio::join!(
        first.analyze("a.pdf", pdf_bytes(), &provider, true, &cancel),
        second.analyze("b.pdf", pdf_bytes(), &provider, true, &cancel),
    );

    let (a, b) = (a.unwrap().persistence, b.unwrap().persistence);
    assert_ne!(a, b);
    assert_eq!(store.lock().unwrap().count().unwrap(), 2);
}

#[tokio::test]
async fn test_document_parsed_off_runtime_thread() {
    let reader = Arc::new(ThreadRecordingReader::default());
    let pipeline = AnalysisPipeline::new(extractor(), SqliteStore::new(":memory:").unwrap())
        .with_reader(reader.clone());
    let provider = MockProvider::new(TERMINATION).with_needs_text(true);

    pipeline
        .analyze(
            "msa.txt",
            b"Either party may terminate this Agreement.".to_vec(),
            &provider,
            false,
            &CancelSignal::new(),
        )
        .await
        .unwrap();

    // The current-thread runtime drives this test; parsing must not run on it
    let threads = reader.threads.lock().unwrap().clone();
    assert_eq!(threads.len(), 2);
    assert!(threads.iter().all(|id| *id != thread::current().id()));
}
