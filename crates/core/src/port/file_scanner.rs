// Local File Scanner Port
// Blocking by contract: callers run it on a blocking thread.

use crate::domain::ScanOutcome;
use crate::error::Result;
use std::path::Path;

/// Enumerates a local file or directory tree for ingestion
pub trait LocalFileScanner: Send + Sync {
    /// Scan `root` (a file or a directory) in pre-order
    ///
    /// # Errors
    /// - AppError::NotFound if `root` does not exist
    /// - AppError::Io if `root` itself cannot be read
    ///
    /// Unreadable entries below `root` are reported in `ScanOutcome::errors`.
    fn scan(&self, root: &Path) -> Result<ScanOutcome>;
}

pub mod mocks {
    use super::*;
    use crate::domain::{EntryKind, LocalFileEntry};
    use crate::error::AppError;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Scanner over a fixed set of trees keyed by root path
    #[derive(Default)]
    pub struct MockScanner {
        trees: Mutex<HashMap<PathBuf, ScanOutcome>>,
    }

    impl MockScanner {
        /// Register a directory `root` containing the given file names
        pub fn with_dir(self, root: &str, files: &[&str]) -> Self {
            let root_path = PathBuf::from(root);
            let mut entries = vec![LocalFileEntry {
                path: root_path.clone(),
                name: root_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| root.to_string()),
                kind: EntryKind::Directory,
                size: 0,
                modified: None,
                parent: None,
            }];
            for file in files {
                entries.push(LocalFileEntry {
                    path: root_path.join(file),
                    name: file.to_string(),
                    kind: EntryKind::File,
                    size: 1,
                    modified: None,
                    parent: Some(0),
                });
            }
            self.trees.lock().unwrap().insert(
                root_path,
                ScanOutcome {
                    entries,
                    errors: Vec::new(),
                },
            );
            self
        }

        /// Add a non-critical error to the tree at `root`
        pub fn with_error(self, root: &str, error: &str) -> Self {
            if let Some(outcome) = self.trees.lock().unwrap().get_mut(Path::new(root)) {
                outcome.errors.push(error.to_string());
            }
            self
        }
    }

    impl LocalFileScanner for MockScanner {
        fn scan(&self, root: &Path) -> Result<ScanOutcome> {
            self.trees
                .lock()
                .unwrap()
                .get(root)
                .cloned()
                .ok_or_else(|| AppError::NotFound(root.display().to_string()))
        }
    }
}
