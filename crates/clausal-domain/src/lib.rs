//! Clausal Domain Layer
//!
//! Core value types and trait boundaries for contract analysis. Everything
//! else in the workspace depends on this crate; it depends on nothing but
//! `serde`, because the JSON shape of an analysis is part of the model.
//!
//! ## Key Concepts
//!
//! - **Clause**: a categorized, verbatim excerpt of contract text with a citation
//! - **Definition**: a defined term and its contractual meaning
//! - **AnalysisResult**: the unit of validation and persistence
//! - **AnalysisRecord**: a persisted result with its id and creation time
//!
//! ## Architecture
//!
//! - Pure data and trait definitions only
//! - Infrastructure (LLM providers, SQLite) lives in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod metadata;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use analysis::{AnalysisResult, Clause, Definition};
pub use metadata::DocumentMetadata;
pub use record::{AnalysisId, AnalysisRecord, AnalysisSummary};
