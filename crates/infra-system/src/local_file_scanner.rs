// Local file scanner (walkdir)
// Symlinks are recorded, not followed: evidence is taken as found.
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};
use walkdir::WalkDir;

use casebook_core::domain::{EntryKind, LocalFileEntry, ScanOutcome};
use casebook_core::error::{AppError, Result};
use casebook_core::port::LocalFileScanner;

/// Walks local files and directories in pre-order, sorted by file name
#[derive(Debug, Default, Clone)]
pub struct WalkDirScanner;

impl WalkDirScanner {
    pub fn new() -> Self {
        Self
    }
}

impl LocalFileScanner for WalkDirScanner {
    fn scan(&self, root: &Path) -> Result<ScanOutcome> {
        match std::fs::symlink_metadata(root) {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!(
                    "Local path does not exist: {}",
                    root.display()
                )));
            }
            Err(e) => return Err(AppError::Io(e)),
        }

        let mut outcome = ScanOutcome::default();
        let mut index_by_path: HashMap<PathBuf, usize> = HashMap::new();

        for item in WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = match item {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| root.display().to_string());
                    warn!(path = %path, error = %e, "Skipping unreadable entry");
                    outcome.errors.push(format!("{}: {}", path, e));
                    continue;
                }
            };

            let parent = if entry.depth() == 0 {
                None
            } else {
                match entry.path().parent().and_then(|p| index_by_path.get(p)) {
                    Some(index) => Some(*index),
                    None => {
                        outcome.errors.push(format!(
                            "{}: parent directory was skipped",
                            entry.path().display()
                        ));
                        continue;
                    }
                }
            };

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %entry.path().display(), error = %e, "Skipping entry without metadata");
                    outcome
                        .errors
                        .push(format!("{}: {}", entry.path().display(), e));
                    continue;
                }
            };

            let kind = if metadata.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let modified = metadata
                .modified()
                .ok()
                .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                .and_then(|d| i64::try_from(d.as_secs()).ok());

            let index = outcome.entries.len();
            if kind == EntryKind::Directory {
                index_by_path.insert(entry.path().to_path_buf(), index);
            }
            outcome.entries.push(LocalFileEntry {
                path: entry.path().to_path_buf(),
                name: entry_name(entry.path()),
                kind,
                size: if kind == EntryKind::File { metadata.len() } else { 0 },
                modified,
                parent,
            });
        }

        debug!(
            root = %root.display(),
            entries = outcome.entries.len(),
            errors = outcome.errors.len(),
            "Scanned local path"
        );
        Ok(outcome)
    }
}

/// File name, or the whole path for roots like `/`
fn entry_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
