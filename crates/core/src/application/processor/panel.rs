// Local files configuration panel

use super::DataSourcePanel;
use crate::application::ingest::constants::FILES_SEP;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug, Default, Clone)]
struct Settings {
    content_paths: String,
    file_set_name: String,
}

/// Settings the host fills in: `FILES_SEP`-separated paths and a file set name
#[derive(Debug, Default)]
pub struct LocalFilesPanel {
    settings: Mutex<Settings>,
}

impl LocalFilesPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_content_paths(&self, paths: impl Into<String>) {
        self.lock().content_paths = paths.into();
    }

    /// Join `paths` with `FILES_SEP`
    pub fn set_paths<I, P>(&self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let joined = paths
            .into_iter()
            .map(|p| p.into().display().to_string())
            .collect::<Vec<_>>()
            .join(FILES_SEP);
        self.set_content_paths(joined);
    }

    pub fn set_file_set_name(&self, name: impl Into<String>) {
        self.lock().file_set_name = name.into();
    }

    pub fn content_paths(&self) -> String {
        self.lock().content_paths.clone()
    }

    /// Content paths split on `FILES_SEP`, blanks dropped
    pub fn paths(&self) -> Vec<PathBuf> {
        split_paths(&self.lock().content_paths)
    }

    pub fn file_set_name(&self) -> String {
        self.lock().file_set_name.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Settings> {
        self.settings.lock().unwrap_or_else(|e| e.into_inner())
    }
}

pub(crate) fn split_paths(content_paths: &str) -> Vec<PathBuf> {
    content_paths
        .split(FILES_SEP)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

impl DataSourcePanel for LocalFilesPanel {
    fn select(&self) {
        debug!("Local files panel selected");
    }

    fn validate(&self) -> bool {
        !self.paths().is_empty()
    }

    fn reset(&self) {
        *self.lock() = Settings::default();
    }

    fn summary(&self) -> String {
        let settings = self.lock().clone();
        let name = if settings.file_set_name.is_empty() {
            "<default>"
        } else {
            settings.file_set_name.as_str()
        };
        format!("{} path(s), file set {}", split_paths(&settings.content_paths).len(), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_panel_is_invalid() {
        let panel = LocalFilesPanel::new();
        assert!(!panel.validate());
        panel.set_content_paths(" , ");
        assert!(!panel.validate());
    }

    #[test]
    fn test_paths_split_on_separator() {
        let panel = LocalFilesPanel::new();
        panel.set_content_paths("/a/b, /c/d.txt,,");
        assert!(panel.validate());
        assert_eq!(
            panel.paths(),
            vec![PathBuf::from("/a/b"), PathBuf::from("/c/d.txt")]
        );
    }

    #[test]
    fn test_reset_clears_settings() {
        let panel = LocalFilesPanel::new();
        panel.set_paths(["/a", "/b"]);
        panel.set_file_set_name("Laptop");
        assert_eq!(panel.summary(), "2 path(s), file set Laptop");

        panel.reset();
        assert!(panel.content_paths().is_empty());
        assert!(panel.file_set_name().is_empty());
    }
}
