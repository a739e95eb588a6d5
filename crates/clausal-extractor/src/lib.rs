//! Clausal Extractor
//!
//! Turns a contract into a validated, optionally persisted analysis.
//!
//! # Architecture
//!
//! ```text
//! bytes → DocumentReader → Document → Extractor ⇄ DocumentProvider
//!                                         ↓
//!                                    validator → AnalysisStore
//! ```
//!
//! - [`Extractor`]: bounded retry with linear backoff around one provider;
//!   every response is default-filled and schema-validated
//! - [`AnalysisPipeline`]: ingestion, extraction and persistence in one call
//! - [`DocumentReader`]: text and embedded metadata (`PdfReader`,
//!   `PlainTextReader`)
//! - [`CancelSignal`] and [`ExtractionEvent`]: cancellation and best-effort
//!   progress reporting
//!
//! # Example Usage
//!
//! ```no_run
//! use clausal_extractor::{AnalysisPipeline, CancelSignal, Extractor, ExtractorConfig};
//! use clausal_llm::MockProvider;
//! use clausal_store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(r#"{"clauses": [], "definitions": []}"#);
//! let store = SqliteStore::new(":memory:")?;
//! let pipeline = AnalysisPipeline::new(Extractor::new(ExtractorConfig::default()), store);
//!
//! let bytes = std::fs::read("msa.pdf")?;
//! let outcome = pipeline
//!     .analyze("msa.pdf", bytes, &provider, true, &CancelSignal::new())
//!     .await?;
//!
//! println!("{} clauses, {:?}", outcome.result.clauses.len(), outcome.persistence);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod cancel;
mod config;
mod error;
mod events;
mod extractor;
pub mod ingest;
mod pipeline;

pub use cancel::CancelSignal;
pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use events::{EventSink, ExtractionEvent};
pub use extractor::Extractor;
pub use ingest::{DocumentReader, IngestError, PdfReader, PlainTextReader};
pub use pipeline::{AnalysisOutcome, AnalysisPipeline, Persistence};
