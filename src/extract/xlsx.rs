use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};

use super::ExtractError;

/// Extracts every sheet of an `.xlsx` workbook, one line per row.
///
/// Non-empty cells of a row are joined with a single space. Formula cells
/// contribute their cached value, not the formula text.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let mut text = String::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        for row in range.rows() {
            let cells: Vec<String> = row
                .iter()
                .filter(|cell| !is_blank(cell))
                .map(ToString::to_string)
                .collect();
            text.push_str(&cells.join(" "));
            text.push('\n');
        }
    }

    Ok(text)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}
