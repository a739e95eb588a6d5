//! Embedded document metadata

use serde::{Deserialize, Serialize};

/// Descriptive fields read from the document itself
///
/// Every field is independently optional; absent fields are omitted on the
/// wire so a stored result reproduces the same field presence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Document title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Document author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Document subject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Keywords, as stored in the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,

    /// Application that created the original document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,

    /// Application that produced the PDF
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,

    /// Creation date, verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,

    /// Last modification date, verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modification_date: Option<String>,
}

impl DocumentMetadata {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
