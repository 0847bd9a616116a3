// Case lifecycle - the single open case and its database handle

use crate::error::{AppError, Result};
use crate::port::{CaseDatabase, CaseProvider};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::info;

/// An open forensic case
pub struct Case {
    name: String,
    directory: PathBuf,
    database: Arc<dyn CaseDatabase>,
}

impl Case {
    pub fn new(
        name: impl Into<String>,
        directory: impl Into<PathBuf>,
        database: Arc<dyn CaseDatabase>,
    ) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            database,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Case database handle
    pub fn database(&self) -> &Arc<dyn CaseDatabase> {
        &self.database
    }
}

impl std::fmt::Debug for Case {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Case")
            .field("name", &self.name)
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

/// Holds the currently open case (at most one)
#[derive(Default)]
pub struct CaseManager {
    current: RwLock<Option<Arc<Case>>>,
}

impl CaseManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `case`, replacing any case already open
    pub fn open(&self, case: Case) -> Arc<Case> {
        let case = Arc::new(case);
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = current.replace(Arc::clone(&case)) {
            info!(case = %previous.name(), "Closing case");
        }
        info!(case = %case.name(), directory = %case.directory().display(), "Case opened");
        case
    }

    /// Close the current case, if any
    pub fn close(&self) -> Option<Arc<Case>> {
        let closed = self
            .current
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(case) = &closed {
            info!(case = %case.name(), "Case closed");
        }
        closed
    }

    pub fn is_open(&self) -> bool {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

impl CaseProvider for CaseManager {
    fn current_case(&self) -> Result<Arc<Case>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
            .ok_or(AppError::NoCurrentCase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::case_database::mocks::MockCaseDatabase;

    fn mock_case(name: &str) -> Case {
        Case::new(name, "/cases/test", Arc::new(MockCaseDatabase::new()))
    }

    #[test]
    fn test_no_case_open() {
        let manager = CaseManager::new();
        assert!(!manager.is_open());
        assert!(matches!(
            manager.current_case(),
            Err(AppError::NoCurrentCase)
        ));
    }

    #[test]
    fn test_open_replaces_and_close_clears() {
        let manager = CaseManager::new();
        manager.open(mock_case("first"));
        manager.open(mock_case("second"));
        assert_eq!(manager.current_case().unwrap().name(), "second");

        let closed = manager.close();
        assert_eq!(closed.unwrap().name(), "second");
        assert!(!manager.is_open());
        assert!(manager.close().is_none());
    }
}
