use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use super::ExtractError;

/// Extracts the text of every page of a PDF file, concatenated in page order.
///
/// Pages without a text layer contribute nothing. The parser panics on some
/// malformed files; that is reported as an ordinary [`ExtractError::Pdf`].
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;

    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(&bytes))) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(_) => Err(ExtractError::Pdf("parser aborted on malformed document".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_garbage_pdf_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("b.pdf");
        std::fs::write(&path, b"%PDF-1.4\nnot really a pdf").unwrap();
        assert!(matches!(extract_text(&path), Err(ExtractError::Pdf(_))));
    }

    #[test]
    fn test_missing_pdf_is_io_error() {
        assert!(matches!(
            extract_text(Path::new("missing.pdf")),
            Err(ExtractError::Io(_))
        ));
    }
}
