//! Documents handed to providers

use std::fmt;

/// A contract to analyse
///
/// Providers with native document ingestion read `bytes`; text-only
/// providers read `text`, which ingestion fills in beforehand.
#[derive(Clone, Default)]
pub struct Document {
    /// Original file name
    pub filename: String,

    /// Raw file content
    pub bytes: Vec<u8>,

    /// Pre-extracted text, when available
    pub text: Option<String>,
}

impl Document {
    /// Create a document from raw bytes
    pub fn from_bytes(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            text: None,
        }
    }

    /// Create a text-only document
    pub fn from_text(filename: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            filename: filename.into(),
            bytes: text.clone().into_bytes(),
            text: Some(text),
        }
    }

    /// Attach pre-extracted text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// True when there is neither content nor usable text
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty() && self.text.as_deref().map_or(true, |t| t.trim().is_empty())
    }

    /// Pre-extracted text, if present and not blank
    pub fn usable_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("filename", &self.filename)
            .field("bytes", &self.bytes.len())
            .field("text", &self.text.as_ref().map(|t| t.len()))
            .finish()
    }
}
