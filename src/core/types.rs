//! Core types shared across cercatore modules

use std::path::{Path, PathBuf};

use crate::detect::{ContentFilter, RiskLevel};
use crate::report::ReportArtifacts;

/// Immutable parameters of a single run
#[derive(Debug, Clone)]
pub struct ScanTarget {
    pub root: PathBuf,
    /// Files strictly larger than this are not candidates
    pub max_bytes: u64,
    pub content_filter: Option<ContentFilter>,
}

/// Events emitted during the scanning process
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// Scanning has started
    StartScanning,
    /// Number of candidate files discovered
    FilesFound(usize),
    /// A file has been extracted and classified
    FileProcessed(PathBuf),
    /// Report generation has started
    Reporting,
    /// Scanning complete with message
    Complete(String),
    /// Error occurred
    Error(String),
}

/// A discovered candidate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Lower-cased extension without the dot
    pub extension: String,
    pub size: u64,
}

impl FileRecord {
    pub fn new(path: PathBuf, size: u64) -> Self {
        let extension = extension_of(&path);
        Self {
            path,
            extension,
            size,
        }
    }
}

/// Lower-cased extension of `path`, empty when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// One line of the final report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub file: PathBuf,
    /// Matched labels joined by ", " (empty when nothing matched)
    pub tags: String,
    pub size: u64,
    pub risk: RiskLevel,
}

impl ReportRow {
    /// Individual labels parsed back from the serialized `tags` field.
    pub fn tag_list(&self) -> Vec<&str> {
        split_tags(&self.tags)
    }
}

/// Splits a serialized tag field on `,` and `;`, dropping blanks.
pub fn split_tags(tags: &str) -> Vec<&str> {
    tags.split([',', ';'])
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Statistics from a scanning operation
#[derive(Debug, Default, Clone)]
pub struct ScanStats {
    pub files_discovered: usize,
    pub files_reported: usize,
    /// Candidates dropped by the content filter
    pub files_filtered: usize,
    pub extraction_failures: usize,
    pub scan_duration_ms: u64,
}

/// How a run ended
#[derive(Debug)]
pub enum ScanOutcome {
    /// Reports were written
    Report {
        artifacts: ReportArtifacts,
        stats: ScanStats,
    },
    /// Nothing survived discovery and filtering; no directory was created
    NoData { stats: ScanStats },
}

impl ScanOutcome {
    pub fn stats(&self) -> &ScanStats {
        match self {
            ScanOutcome::Report { stats, .. } | ScanOutcome::NoData { stats } => stats,
        }
    }

    pub fn artifacts(&self) -> Option<&ReportArtifacts> {
        match self {
            ScanOutcome::Report { artifacts, .. } => Some(artifacts),
            ScanOutcome::NoData { .. } => None,
        }
    }
}
