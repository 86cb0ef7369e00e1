use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Extracts paragraph text from a `.docx` file, one paragraph per line.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(File::open(path)?)?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;
    Ok(paragraphs(&xml)?.join("\n"))
}

/// Paragraph texts of a WordprocessingML body, in document order.
///
/// Paragraphs nested inside another one (text boxes, shapes) are inlined
/// into their outer paragraph on lines of their own.
pub fn paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut found = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    if depth > 0 {
                        push_break(&mut current);
                    }
                    depth += 1;
                }
                b"w:t" => in_text = depth > 0,
                _ => {}
            },
            Event::End(e) => match e.name().as_ref() {
                b"w:p" => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        found.push(std::mem::take(&mut current));
                    } else {
                        push_break(&mut current);
                    }
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if depth == 0 => found.push(String::new()),
                b"w:tab" if depth > 0 => current.push('\t'),
                b"w:br" | b"w:cr" if depth > 0 => current.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text => current.push_str(&e.unescape()?),
            Event::CData(e) if in_text => current.push_str(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(found)
}

fn push_break(current: &mut String) {
    if !current.is_empty() && !current.ends_with('\n') {
        current.push('\n');
    }
}
