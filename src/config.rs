use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::ScanTarget;
use crate::detect::ContentFilter;
use crate::extract::TextExtractor;
use crate::fs::FolderExclusion;

/// Default configuration file looked up in the current directory.
pub const CONFIG_FILE_NAME: &str = "cercatore.toml";

const BYTES_PER_MB: u64 = 1024 * 1024;

/// How excluded folder names are matched against directory paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcludeMode {
    /// The name may appear anywhere in the full directory path ("Windows" also skips "OldWindowsBackup")
    #[default]
    Substring,
    /// The name must equal one of the path components
    Segment,
}

/// Main configuration for cercatore
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CercatoreConfig {
    /// Directory to scan
    pub path: PathBuf,
    /// Base directory in which the `report_<timestamp>` folder is created
    pub output: PathBuf,
    /// Maximum file size in megabytes (larger files are skipped)
    pub max_size_mb: u64,
    /// Optional word or regex; only files whose text matches it (case-insensitive) are reported
    pub search: Option<String>,
    /// Folder names whose subtrees are never scanned
    pub exclude_folders: Vec<String>,
    pub exclude_mode: ExcludeMode,
    /// Worker threads for extraction (0 = one per CPU, 1 = sequential)
    pub jobs: usize,
    /// Number of rows listed in the PDF summary
    pub narrative_rows: usize,
    /// OCR executable used for images
    pub ocr_command: String,
    /// OCR language passed as `-l` (e.g. "ita")
    pub ocr_language: Option<String>,
    /// Log at `info` even without `-v`
    pub verbose: bool,
    /// Suppress logging and the progress bar
    pub quiet: bool,
}

impl CercatoreConfig {
    /// Validates the configuration before any file is touched.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.path.exists() {
            anyhow::bail!("Path does not exist: {:?}", self.path);
        }
        if !self.path.is_dir() {
            anyhow::bail!("Path is not a directory: {:?}", self.path);
        }
        if let Some(pattern) = &self.search {
            ContentFilter::new(pattern)
                .with_context(|| format!("Invalid search pattern: {pattern:?}"))?;
        }
        Ok(())
    }

    /// Attempts to load configuration from `cercatore.toml` in the current directory.
    pub fn load_from_file() -> anyhow::Result<Option<Self>> {
        Self::load_from_path(Path::new(CONFIG_FILE_NAME))
    }

    /// Loads configuration from `path`. A missing file is not an error.
    pub fn load_from_path(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(Some(config))
    }

    /// Size ceiling in bytes.
    pub fn max_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Freezes the run parameters into a [`ScanTarget`].
    pub fn scan_target(&self) -> anyhow::Result<ScanTarget> {
        let content_filter = self
            .search
            .as_deref()
            .map(ContentFilter::new)
            .transpose()
            .context("Invalid search pattern")?;

        Ok(ScanTarget {
            root: self.path.clone(),
            max_bytes: self.max_bytes(),
            content_filter,
        })
    }

    /// Tracing filter directives for this run, `None` when logging is off.
    ///
    /// `cli_verbose` is the `-v` count; `verbose = true` alone counts as one.
    pub fn log_filter(&self, cli_verbose: u8) -> Option<&'static str> {
        if self.quiet {
            return None;
        }
        let level = if cli_verbose == 0 && self.verbose {
            1
        } else {
            cli_verbose
        };
        Some(match level {
            0 => "warn",
            1 => "info,ignore=warn,globset=warn",
            2 => "debug,ignore=warn,globset=warn",
            _ => "trace",
        })
    }

    pub fn folder_exclusion(&self) -> FolderExclusion {
        FolderExclusion::new(self.exclude_folders.clone(), self.exclude_mode)
    }

    pub fn extractor(&self) -> TextExtractor {
        TextExtractor::new(self.ocr_command.clone(), self.ocr_language.clone())
    }
}

impl Default for CercatoreConfig {
    fn default() -> Self {
        let excluded = vec![
            "$Recycle.Bin",
            "Program Files",
            "Windows",
            "System Volume Information",
        ];

        Self {
            path: PathBuf::from("."),
            output: PathBuf::from("."),
            max_size_mb: 10,
            search: None,
            exclude_folders: excluded.into_iter().map(String::from).collect(),
            exclude_mode: ExcludeMode::Substring,
            jobs: 0,
            narrative_rows: 30,
            ocr_command: "tesseract".to_string(),
            ocr_language: None,
            verbose: false,
            quiet: false,
        }
    }
}
