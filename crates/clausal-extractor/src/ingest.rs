//! Document ingestion: text and embedded metadata
//!
//! The orchestrator never parses documents itself. It asks a
//! [`DocumentReader`] for text (when the provider needs it) and for the
//! document's own metadata.

use clausal_domain::DocumentMetadata;
use lopdf::{Dictionary, Object};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Errors raised while reading a document
#[derive(Error, Debug)]
pub enum IngestError {
    /// Input does not start with a PDF header
    #[error("Not a PDF document")]
    NotPdf,

    /// Text could not be extracted
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// Text input is not UTF-8
    #[error("Document is not valid UTF-8: {0}")]
    Encoding(String),

    /// Embedded metadata could not be read
    #[error("Metadata unavailable: {0}")]
    Metadata(String),
}

/// Source of document text and metadata
pub trait DocumentReader: Send + Sync {
    /// Reject input this reader cannot handle at all
    fn check(&self, _bytes: &[u8]) -> Result<(), IngestError> {
        Ok(())
    }

    /// Extract the plain text of the document
    fn extract_text(&self, bytes: &[u8]) -> Result<String, IngestError>;

    /// Read metadata embedded in the document
    fn extract_metadata(&self, bytes: &[u8]) -> Result<DocumentMetadata, IngestError>;
}

/// PDF reader backed by `pdf-extract` (text) and `lopdf` (Info dictionary)
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

impl DocumentReader for PdfReader {
    fn check(&self, bytes: &[u8]) -> Result<(), IngestError> {
        if bytes.starts_with(PDF_MAGIC) {
            Ok(())
        } else {
            Err(IngestError::NotPdf)
        }
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String, IngestError> {
        self.check(bytes)?;
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| IngestError::Extraction(e.to_string()))
    }

    fn extract_metadata(&self, bytes: &[u8]) -> Result<DocumentMetadata, IngestError> {
        self.check(bytes)?;
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| IngestError::Metadata(e.to_string()))?;

        let info = match doc.trailer.get(b"Info") {
            Ok(Object::Reference(id)) => doc
                .get_object(*id)
                .and_then(Object::as_dict)
                .map_err(|e| IngestError::Metadata(e.to_string()))?,
            Ok(Object::Dictionary(dict)) => dict,
            // No Info dictionary is normal for generated PDFs
            _ => return Ok(DocumentMetadata::default()),
        };

        Ok(DocumentMetadata {
            title: info_string(info, b"Title"),
            author: info_string(info, b"Author"),
            subject: info_string(info, b"Subject"),
            keywords: info_string(info, b"Keywords"),
            creator: info_string(info, b"Creator"),
            producer: info_string(info, b"Producer"),
            creation_date: info_string(info, b"CreationDate"),
            modification_date: info_string(info, b"ModDate"),
        })
    }
}

/// Read one text entry of the Info dictionary
fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    match info.get(key) {
        Ok(Object::String(bytes, _)) => Some(decode_pdf_string(bytes)).filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, or PDFDocEncoding)
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    // PDFDocEncoding agrees with Latin-1 for printable text
    bytes.iter().map(|&b| b as char).collect()
}

/// Reader for plain UTF-8 text files
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextReader;

impl DocumentReader for PlainTextReader {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, IngestError> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| IngestError::Encoding(e.to_string()))
    }

    fn extract_metadata(&self, _bytes: &[u8]) -> Result<DocumentMetadata, IngestError> {
        Ok(DocumentMetadata::default())
    }
}

/// Pick a reader from the file extension (`.txt`/`.md` are text, the rest PDF)
pub fn reader_for(filename: &str) -> Arc<dyn DocumentReader> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("txt") | Some("text") | Some("md") => Arc::new(PlainTextReader),
        _ => Arc::new(PdfReader),
    }
}
