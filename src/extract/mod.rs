//! Text extraction for the supported document formats
//!
//! [`TextExtractor::extract`] never fails: any I/O or parsing error is logged
//! and turned into an empty string, so a broken file still gets a report row.

pub mod docx;
pub mod image;
pub mod pdf;
pub mod text;
pub mod xlsx;

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tracing::warn;

use crate::core::extension_of;

pub use self::image::OcrEngine;

/// Errors raised while reading a single document
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),
    #[error("image error: {0}")]
    Image(#[from] ::image::ImageError),
    #[error("OCR failed: {0}")]
    Ocr(String),
    #[error("unsupported extension: {0:?}")]
    Unsupported(String),
}

/// The closed set of formats the extractor understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Pdf,
    Image,
    WordDocument,
    Spreadsheet,
}

impl DocumentFormat {
    /// Maps a lower-case extension (without dot) to its format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "txt" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            "png" | "jpg" | "jpeg" => Some(Self::Image),
            "docx" => Some(Self::WordDocument),
            "xlsx" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(&extension_of(path))
    }
}

/// Reads documents into plain text and counts the files it failed to read
#[derive(Debug)]
pub struct TextExtractor {
    ocr: OcrEngine,
    failures: AtomicUsize,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new("tesseract".to_string(), None)
    }
}

impl TextExtractor {
    pub fn new(ocr_command: String, ocr_language: Option<String>) -> Self {
        Self {
            ocr: OcrEngine::new(ocr_command, ocr_language),
            failures: AtomicUsize::new(0),
        }
    }

    /// Extracts text, reporting failures to the caller.
    pub fn try_extract(&self, path: &Path) -> Result<String, ExtractError> {
        let Some(format) = DocumentFormat::from_path(path) else {
            return Err(ExtractError::Unsupported(extension_of(path)));
        };

        match format {
            DocumentFormat::PlainText => text::extract_text(path),
            DocumentFormat::Pdf => pdf::extract_text(path),
            DocumentFormat::Image => image::recognize_text(path, &self.ocr),
            DocumentFormat::WordDocument => docx::extract_text(path),
            DocumentFormat::Spreadsheet => xlsx::extract_text(path),
        }
    }

    /// Extracts text; on failure logs the error and returns an empty string.
    pub fn extract(&self, path: &Path) -> String {
        self.try_extract(path).unwrap_or_else(|e| {
            self.failures.fetch_add(1, Ordering::Relaxed);
            warn!(path = %path.display(), error = %e, "Failed to read file");
            String::new()
        })
    }

    /// Number of `extract` calls that fell back to empty text so far.
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }
}
