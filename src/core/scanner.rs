//! File discovery
//!
//! Walks the scan root and keeps the files the extractor can read and that
//! fit under the size ceiling.

use crate::core::{FileRecord, ScanEvent, ScanTarget};
use crate::fs::{FolderExclusion, is_supported, walk_directory};
use anyhow::Result;
use crossbeam_channel::Sender;
use tracing::debug;

/// Notify helper for optional sender
pub(crate) fn notify(tx: &Option<Sender<ScanEvent>>, event: ScanEvent) {
    if let Some(tx) = tx {
        let _ = tx.send(event);
    }
}

/// Discover candidate files for `target`, in walk order.
///
/// A file whose size cannot be read is dropped without a diagnostic.
pub fn discover_files(
    target: &ScanTarget,
    exclusion: &FolderExclusion,
    tx: &Option<Sender<ScanEvent>>,
) -> Result<Vec<FileRecord>> {
    notify(tx, ScanEvent::StartScanning);

    if !target.root.is_dir() {
        anyhow::bail!("Failed to find directory: {:?}", target.root);
    }

    let mut candidates = Vec::new();
    for path in walk_directory(&target.root, exclusion)? {
        if !is_supported(&path) {
            continue;
        }

        let Ok(metadata) = std::fs::metadata(&path) else {
            continue;
        };
        if !metadata.is_file() {
            continue;
        }

        let size = metadata.len();
        if size > target.max_bytes {
            debug!(path = %path.display(), size, "Skipping file above size limit");
            continue;
        }

        candidates.push(FileRecord::new(path, size));
    }

    notify(tx, ScanEvent::FilesFound(candidates.len()));
    Ok(candidates)
}
