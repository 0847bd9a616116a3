// Data Source Domain Model

use crate::domain::error::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Object identifier assigned by the case database
pub type ObjectId = i64;

/// Data source id -> display name (short name or full path)
pub type DataSourceNameMap = BTreeMap<ObjectId, String>;

/// Device identifier of a data source
///
/// ASCII-printable and intended to be unique across cases (usually a UUID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        if s.is_empty() || !s.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
            return Err(DomainError::InvalidDeviceId(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `(obj_id, name)` row returned by a data source query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceRow {
    pub object_id: ObjectId,
    pub name: String,
}

impl DataSourceRow {
    pub fn new(object_id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            object_id,
            name: name.into(),
        }
    }
}

/// Last path segment of a stored image path.
///
/// Both `/` and `\` count as separators since images are often recorded with
/// Windows paths. Trailing separators are ignored, so a bare root such as
/// `/` has an empty name.
pub fn short_name(full_path: &str) -> &str {
    let trimmed = full_path.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or("")
}

/// Immutable configuration of a local-files data source
///
/// Built once by the caller; the processor never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalFilesConfig {
    device_id: DeviceId,
    root_virtual_directory_name: String,
    local_file_paths: Vec<PathBuf>,
}

impl LocalFilesConfig {
    /// Create a configuration
    ///
    /// # Arguments
    ///
    /// * `device_id` - Device identifier of the new data source
    /// * `root_virtual_directory_name` - Name of the virtual root directory.
    ///   Empty selects the default `LogicalFileSet<N>` name.
    /// * `local_file_paths` - Files and/or directories to add (at least one)
    pub fn new(
        device_id: DeviceId,
        root_virtual_directory_name: impl Into<String>,
        local_file_paths: Vec<PathBuf>,
    ) -> Result<Self> {
        if local_file_paths.is_empty() {
            return Err(DomainError::EmptyPaths);
        }
        Ok(Self {
            device_id,
            root_virtual_directory_name: root_virtual_directory_name.into(),
            local_file_paths,
        })
    }

    pub fn device_id(&self) -> &DeviceId {
        &self.device_id
    }

    pub fn root_virtual_directory_name(&self) -> &str {
        &self.root_virtual_directory_name
    }

    /// `None` when the default name should be assigned
    pub fn explicit_root_name(&self) -> Option<&str> {
        let name = self.root_virtual_directory_name.trim();
        (!name.is_empty()).then_some(name)
    }

    pub fn local_file_paths(&self) -> &[PathBuf] {
        &self.local_file_paths
    }
}
