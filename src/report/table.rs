use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use super::ReportWriter;
use crate::core::ReportRow;

pub const COLUMNS: [&str; 4] = ["File", "Tags", "Dimensione", "Rischio"];

/// Spreadsheet export, one row per file in result order
pub struct TableExport;

impl ReportWriter for TableExport {
    fn file_name(&self) -> &'static str {
        "report.xlsx"
    }

    fn write(&self, rows: &[ReportRow], path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Sheet1")?;

        for (col, title) in (0u16..).zip(COLUMNS) {
            sheet.write_string_with_format(0, col, title, &header)?;
        }

        for (index, row) in rows.iter().enumerate() {
            let line = u32::try_from(index + 1).context("Too many rows for a worksheet")?;
            sheet.write_string(line, 0, row.file.display().to_string())?;
            sheet.write_string(line, 1, row.tags.as_str())?;
            sheet.write_number(line, 2, row.size as f64)?;
            sheet.write_string(line, 3, row.risk.as_str())?;
        }
        sheet.autofit();

        workbook
            .save(path)
            .with_context(|| format!("Failed to write table: {:?}", path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::RiskLevel;
    use calamine::{Data, Reader, Xlsx, open_workbook};
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_table_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.xlsx");
        let rows = vec![
            ReportRow {
                file: PathBuf::from("/data/a.txt"),
                tags: "Email".to_string(),
                size: 24,
                risk: RiskLevel::Medio,
            },
            ReportRow {
                file: PathBuf::from("/data/b.pdf"),
                tags: String::new(),
                size: 1000,
                risk: RiskLevel::NonClassificato,
            },
        ];

        TableExport.write(&rows, &path).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Sheet1".to_string()]);
        let range = workbook.worksheet_range("Sheet1").unwrap();
        let cells: Vec<Vec<String>> = range
            .rows()
            .map(|r| {
                r.iter()
                    .map(|c| match c {
                        Data::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect();

        assert_eq!(cells[0], vec!["File", "Tags", "Dimensione", "Rischio"]);
        assert_eq!(cells[1], vec!["/data/a.txt", "Email", "24", "Medio"]);
        assert_eq!(cells[2], vec!["/data/b.pdf", "", "1000", "NonClassificato"]);
    }
}
