use std::path::Path;

use super::ExtractError;

/// Reads a text file as UTF-8, dropping byte sequences that do not decode.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    Ok(decode_utf8_ignoring_invalid(&bytes))
}

fn decode_utf8_ignoring_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_decode_drops_invalid_bytes() {
        assert_eq!(decode_utf8_ignoring_invalid(b"ab\xffcd"), "abcd");
        assert_eq!(decode_utf8_ignoring_invalid("città".as_bytes()), "città");
        assert_eq!(decode_utf8_ignoring_invalid(b"\xc3"), "");
    }

    #[test]
    fn test_extract_text_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.txt");
        std::fs::write(&path, b"contact: joe@example.com\xfe").unwrap();
        assert_eq!(extract_text(&path).unwrap(), "contact: joe@example.com");
    }
}
