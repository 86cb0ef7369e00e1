pub mod config;
pub mod core;
pub mod detect;
pub mod extract;
pub mod fs;
pub mod progress;
pub mod report;
pub mod runner;

// Re-export key items for convenience
pub use config::{CercatoreConfig, ExcludeMode};
pub use core::{FileRecord, ReportRow, ScanEvent, ScanOutcome, ScanStats, ScanTarget};
pub use detect::{ContentFilter, DetectorRegistry, RiskLevel, Tier};
pub use extract::{DocumentFormat, ExtractError, TextExtractor};
pub use report::{ReportArtifacts, ReportGenerator};
pub use runner::{collect_rows, run, run_scan};
