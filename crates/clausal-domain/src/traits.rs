//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{AnalysisId, AnalysisRecord, AnalysisResult, AnalysisSummary};

/// Store errors that can tell a lookup miss apart from a storage failure
pub trait StoreErrorKind {
    /// True when the requested record does not exist
    fn is_not_found(&self) -> bool;
}

/// Trait for persisting and retrieving analyses
///
/// Implemented by the infrastructure layer (clausal-store)
pub trait AnalysisStore {
    /// Error type for store operations
    type Error: StoreErrorKind + std::fmt::Display;

    /// Persist a validated analysis, returning its newly assigned id
    ///
    /// Never overwrites an existing record.
    fn save(&mut self, filename: &str, result: &AnalysisResult) -> Result<AnalysisId, Self::Error>;

    /// Get a stored analysis by id
    ///
    /// A missing id is an error distinct from storage being unavailable.
    fn get_by_id(&self, id: AnalysisId) -> Result<AnalysisRecord, Self::Error>;

    /// List all stored analyses, most recent first, without their content
    fn list_all(&self) -> Result<Vec<AnalysisSummary>, Self::Error>;
}
