//! Report artifacts written at the end of a run.
//!
//! Every run with at least one row gets its own `report_<timestamp>`
//! directory holding the spreadsheet, the PDF summary and the charts.

pub mod charts;
pub mod narrative;
pub mod table;
pub mod tally;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use tracing::info;

use crate::core::ReportRow;
use narrative::NarrativeExport;
use table::TableExport;
use tally::Tally;

/// A single report artifact built from the final rows
pub trait ReportWriter {
    /// File name inside the report directory
    fn file_name(&self) -> &'static str;
    fn write(&self, rows: &[ReportRow], path: &Path) -> Result<()>;
}

/// Paths of everything written for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifacts {
    pub dir: PathBuf,
    pub table: PathBuf,
    pub narrative: PathBuf,
    /// Only the charts that were actually written
    pub charts: Vec<PathBuf>,
}

impl ReportArtifacts {
    /// All artifact paths in the order they were written.
    pub fn paths(&self) -> Vec<&Path> {
        let mut paths = vec![self.table.as_path(), self.narrative.as_path()];
        paths.extend(self.charts.iter().map(PathBuf::as_path));
        paths
    }
}

pub struct ReportGenerator {
    narrative_rows: usize,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(30)
    }
}

impl ReportGenerator {
    pub fn new(narrative_rows: usize) -> Self {
        Self { narrative_rows }
    }

    /// Writes every artifact for `rows` into a fresh directory under `base`.
    ///
    /// The table and the PDF summary are required; chart failures are only logged.
    pub fn generate(&self, rows: &[ReportRow], base: &Path) -> Result<ReportArtifacts> {
        let dir = base.join(report_dir_name(Local::now()));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create report directory: {:?}", dir))?;

        let table = write_artifact(&TableExport, rows, &dir)?;
        let narrative = write_artifact(&NarrativeExport::new(self.narrative_rows), rows, &dir)?;
        let charts = charts::write_charts(&Tally::from_rows(rows), &dir);

        info!(dir = %dir.display(), rows = rows.len(), "Report written");

        Ok(ReportArtifacts {
            dir,
            table,
            narrative,
            charts,
        })
    }
}

fn write_artifact(writer: &dyn ReportWriter, rows: &[ReportRow], dir: &Path) -> Result<PathBuf> {
    let path = dir.join(writer.file_name());
    writer.write(rows, &path)?;
    Ok(path)
}

/// Directory name for a run started at `now`, e.g. `report_20240131_235959`.
pub fn report_dir_name(now: DateTime<Local>) -> String {
    format!("report_{}", now.format("%Y%m%d_%H%M%S"))
}
