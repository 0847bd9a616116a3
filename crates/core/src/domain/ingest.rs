// Ingestion Domain Model

use crate::domain::data_source::{DeviceId, ObjectId};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Overall outcome reported to the host callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSourceProcessorResult {
    NoErrors,
    NonCriticalErrors,
    CriticalErrors,
}

impl std::fmt::Display for DataSourceProcessorResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSourceProcessorResult::NoErrors => write!(f, "NO_ERRORS"),
            DataSourceProcessorResult::NonCriticalErrors => write!(f, "NONCRITICAL_ERRORS"),
            DataSourceProcessorResult::CriticalErrors => write!(f, "CRITICAL_ERRORS"),
        }
    }
}

/// Data source object produced by an ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub object_id: ObjectId,
    pub name: String,
    pub device_id: DeviceId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryKind {
    File,
    Directory,
}

/// One file or directory found while scanning a local path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileEntry {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub modified: Option<i64>, // epoch seconds
    /// Index of the parent entry in the same scan, `None` for the scanned root
    pub parent: Option<usize>,
}

/// Result of scanning one local path
///
/// Entries are in pre-order: a parent always precedes its children.
#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub entries: Vec<LocalFileEntry>,
    /// Entries that could not be read (non-critical)
    pub errors: Vec<String>,
}
