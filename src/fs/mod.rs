use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::Result;
use ignore::WalkBuilder;
use tracing::debug;

use crate::config::ExcludeMode;

/// Extensions the extractor understands (compared case-insensitively)
pub const SUPPORTED_EXTENSIONS: &[&str] = &["txt", "pdf", "png", "jpg", "jpeg", "docx", "xlsx"];

/// Check if a file has one of the supported extensions
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Folder names whose subtrees are skipped during the walk
#[derive(Debug, Clone, Default)]
pub struct FolderExclusion {
    names: Vec<String>,
    mode: ExcludeMode,
}

impl FolderExclusion {
    pub fn new(names: Vec<String>, mode: ExcludeMode) -> Self {
        // An empty name would be a substring of every path
        let names = names.into_iter().filter(|n| !n.is_empty()).collect();
        Self { names, mode }
    }

    pub fn none() -> Self {
        Self::default()
    }

    /// Whether the directory at `dir` (full path as walked) is excluded.
    pub fn is_excluded(&self, dir: &Path) -> bool {
        match self.mode {
            ExcludeMode::Substring => {
                let full = dir.to_string_lossy();
                self.names.iter().any(|name| full.contains(name.as_str()))
            }
            ExcludeMode::Segment => dir.components().any(|component| {
                self.names
                    .iter()
                    .any(|name| component.as_os_str() == OsStr::new(name))
            }),
        }
    }
}

/// Walks `root` and returns every non-directory entry in walk order.
///
/// Hidden files and ignore files are not honoured: everything under the root
/// is visited except the subtrees of excluded directories.
pub fn walk_directory(root: &Path, exclusion: &FolderExclusion) -> Result<Vec<PathBuf>> {
    if exclusion.is_excluded(root) {
        debug!(path = %root.display(), "Scan root is inside an excluded folder");
        return Ok(Vec::new());
    }

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let filter = exclusion.clone();
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        if is_dir && entry.depth() > 0 && filter.is_excluded(entry.path()) {
            debug!(path = %entry.path().display(), "Skipping excluded folder");
            return false;
        }
        true
    });

    let mut files = Vec::new();
    for result in builder.build() {
        match result {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| !ft.is_dir()) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => debug!("Error walking directory: {}", err),
        }
    }

    Ok(files)
}
