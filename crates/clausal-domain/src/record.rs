//! Persisted analysis records

use crate::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a stored analysis, assigned by the store at insert
///
/// Ids are strictly increasing and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(i64);

impl AnalysisId {
    /// Wrap a raw row id
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnalysisId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|e| format!("Invalid analysis id '{}': {}", s, e))
    }
}

/// A stored analysis
///
/// Created exactly once per persisted extraction and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Store-assigned identifier
    pub id: AnalysisId,

    /// Name of the analysed file
    pub filename: String,

    /// The validated analysis
    pub content: AnalysisResult,

    /// Insert time (seconds since Unix epoch)
    pub created_at: u64,
}

impl AnalysisRecord {
    /// Listing projection of this record
    pub fn summary(&self) -> AnalysisSummary {
        AnalysisSummary {
            id: self.id,
            filename: self.filename.clone(),
            created_at: self.created_at,
        }
    }
}

/// Listing projection of a stored analysis (content excluded)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Store-assigned identifier
    pub id: AnalysisId,

    /// Name of the analysed file
    pub filename: String,

    /// Insert time (seconds since Unix epoch)
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_parse_and_display() {
        let id: AnalysisId = "42".parse().unwrap();
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
        assert!("forty-two".parse::<AnalysisId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_integer() {
        let json = serde_json::to_value(AnalysisId::from_value(7)).unwrap();
        assert_eq!(json, serde_json::json!(7));
    }

    #[test]
    fn test_summary_projection() {
        let record = AnalysisRecord {
            id: AnalysisId::from_value(3),
            filename: "nda.pdf".to_string(),
            content: AnalysisResult::default(),
            created_at: 1_700_000_000,
        };
        let summary = record.summary();
        assert_eq!(summary.id, record.id);
        assert_eq!(summary.filename, "nda.pdf");
        assert_eq!(summary.created_at, 1_700_000_000);
    }
}
