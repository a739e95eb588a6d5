//! Analysis module - clauses, definitions and the result they form

use crate::DocumentMetadata;
use serde::{Deserialize, Serialize};

/// A categorized excerpt of contract text
///
/// Clauses are immutable once produced by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Free-text category label (e.g. "Indemnification")
    #[serde(rename = "type")]
    pub clause_type: String,

    /// Short summary of what the clause does
    pub summary: String,

    /// Verbatim excerpt from the document
    pub text: String,

    /// Location of the excerpt (page, section)
    pub citation: String,
}

/// A defined term and its contractual meaning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// The term being defined
    pub term: String,

    /// The complete definition text
    pub definition: String,

    /// Location of the definition (page, section)
    pub citation: String,
}

/// Structured result of analysing one contract
///
/// `clauses` and `definitions` are always present, possibly empty. An empty
/// result is a legitimate finding, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Extracted clauses, in provider order
    pub clauses: Vec<Clause>,

    /// Extracted definitions, in provider order
    pub definitions: Vec<Definition>,

    /// Embedded document metadata (never produced by the LLM)
    #[serde(default)]
    pub metadata: DocumentMetadata,

    /// Clause categories the provider looked for and did not find
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_types: Option<Vec<String>>,
}

impl AnalysisResult {
    /// Create a result from clauses and definitions with empty metadata
    pub fn new(clauses: Vec<Clause>, definitions: Vec<Definition>) -> Self {
        Self {
            clauses,
            definitions,
            metadata: DocumentMetadata::default(),
            missing_types: None,
        }
    }

    /// Attach document metadata
    pub fn with_metadata(mut self, metadata: DocumentMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// True when neither clauses nor definitions were found
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty() && self.definitions.is_empty()
    }

    /// Distinct clause categories, in first-seen order
    pub fn clause_types(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for clause in &self.clauses {
            if !seen.contains(&clause.clause_type.as_str()) {
                seen.push(&clause.clause_type);
            }
        }
        seen
    }
}
