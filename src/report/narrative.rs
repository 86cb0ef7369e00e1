use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::ReportWriter;
use crate::core::ReportRow;

pub const TITLE: &str = "Cercatore - Report Sintetico";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 7.0;
const FONT_SIZE: f32 = 12.0;
/// Characters per line that fit between the margins at 12pt Helvetica
const WRAP_COLUMNS: usize = 90;
const POINT_TO_MM: f32 = 0.3528;

/// PDF summary listing the first `max_rows` results
pub struct NarrativeExport {
    pub max_rows: usize,
}

impl NarrativeExport {
    pub fn new(max_rows: usize) -> Self {
        Self { max_rows }
    }
}

/// Text lines of the narrative body, wrapped, with a blank line after each entry.
pub fn narrative_lines(rows: &[ReportRow], max_rows: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for row in rows.iter().take(max_rows) {
        let entry = [
            format!("File: {}", row.file.display()),
            format!("Dati: {}", row.tags),
            format!("Rischio: {}", row.risk),
        ];
        for line in entry {
            lines.extend(wrap(&line, WRAP_COLUMNS));
        }
        lines.push(String::new());
    }
    lines
}

/// Hard-wraps `line` every `width` characters (paths rarely have spaces to break on).
fn wrap(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

impl ReportWriter for NarrativeExport {
    fn file_name(&self) -> &'static str {
        "report.pdf"
    }

    fn write(&self, rows: &[ReportRow], path: &Path) -> Result<()> {
        let (doc, page, layer) =
            PdfDocument::new(TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow!("Failed to load PDF font: {:?}", e))?;

        let mut current = doc.get_page(page).get_layer(layer);

        // Approximate centring: Helvetica averages half an em per character
        let title_width = TITLE.len() as f32 * FONT_SIZE * 0.5 * POINT_TO_MM;
        let mut y = PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM;
        current.use_text(
            TITLE,
            FONT_SIZE,
            Mm((PAGE_WIDTH_MM - title_width) / 2.0),
            Mm(y),
            &font,
        );
        y -= LINE_HEIGHT_MM * 2.0;

        for line in narrative_lines(rows, self.max_rows) {
            if y < MARGIN_MM {
                let (next_page, next_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                current = doc.get_page(next_page).get_layer(next_layer);
                y = PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM;
            }
            if !line.is_empty() {
                current.use_text(line, FONT_SIZE, Mm(MARGIN_MM), Mm(y), &font);
            }
            y -= LINE_HEIGHT_MM;
        }

        let file =
            File::create(path).with_context(|| format!("Failed to create narrative: {:?}", path))?;
        doc.save(&mut BufWriter::new(file))
            .map_err(|e| anyhow!("Failed to write narrative {:?}: {:?}", path, e))?;
        Ok(())
    }
}
