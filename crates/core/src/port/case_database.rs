// Case Database Port (Interface)
// The case database is the single source of truth; nothing here caches across calls.

use crate::domain::{Content, DataSourceRow, DeviceId, LocalFileEntry, ObjectId};
use crate::error::Result;
use async_trait::async_trait;

/// Read access to the case database plus transaction entry point
#[async_trait]
pub trait CaseDatabase: Send + Sync {
    /// All logical (local files) data sources: `(obj_id, root name)`
    async fn logical_data_sources(&self) -> Result<Vec<DataSourceRow>>;

    /// All image data sources: `(obj_id, image path)`, first segment first
    async fn image_data_sources(&self) -> Result<Vec<DataSourceRow>>;

    /// Begin a new write transaction
    async fn begin_transaction(&self) -> Result<Box<dyn CaseDbTransaction>>;
}

/// Write operations within a case database transaction
///
/// Dropping the transaction without `commit` rolls it back.
#[async_trait]
pub trait CaseDbTransaction: Send {
    /// Create a local-files data source with its root virtual directory
    ///
    /// `root_name` of `None` assigns `LogicalFileSet<N>`.
    async fn add_local_files_data_source(
        &mut self,
        device_id: &DeviceId,
        root_name: Option<&str>,
        time_zone: &str,
        added_at: i64,
    ) -> Result<Content>;

    /// Add a local file or directory below `parent_id`
    async fn add_local_file(
        &mut self,
        data_source_id: ObjectId,
        parent_id: ObjectId,
        entry: &LocalFileEntry,
    ) -> Result<ObjectId>;

    /// Record an image data source (segment file names only, no parsing)
    async fn add_image_data_source(
        &mut self,
        device_id: &DeviceId,
        image_paths: &[String],
        time_zone: &str,
        added_at: i64,
    ) -> Result<Content>;

    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct State {
        logical: Vec<DataSourceRow>,
        images: Vec<DataSourceRow>,
        files: Vec<(ObjectId, ObjectId, String)>, // (obj_id, parent_id, name)
        next_id: ObjectId,
        commits: usize,
        rollbacks: usize,
        fail_queries: bool,
    }

    /// In-memory case database
    ///
    /// Writes are staged per transaction and applied on commit.
    #[derive(Clone, Default)]
    pub struct MockCaseDatabase {
        state: Arc<Mutex<State>>,
    }

    impl MockCaseDatabase {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_logical(self, object_id: ObjectId, name: &str) -> Self {
            self.state
                .lock()
                .unwrap()
                .logical
                .push(DataSourceRow::new(object_id, name));
            self
        }

        pub fn with_image(self, object_id: ObjectId, path: &str) -> Self {
            self.state
                .lock()
                .unwrap()
                .images
                .push(DataSourceRow::new(object_id, path));
            self
        }

        /// Make every query fail with a database error
        pub fn failing(self) -> Self {
            self.state.lock().unwrap().fail_queries = true;
            self
        }

        pub fn file_names(&self) -> Vec<String> {
            let state = self.state.lock().unwrap();
            state.files.iter().map(|(_, _, name)| name.clone()).collect()
        }

        pub fn logical_count(&self) -> usize {
            self.state.lock().unwrap().logical.len()
        }

        pub fn commits(&self) -> usize {
            self.state.lock().unwrap().commits
        }

        pub fn rollbacks(&self) -> usize {
            self.state.lock().unwrap().rollbacks
        }
    }

    #[async_trait]
    impl CaseDatabase for MockCaseDatabase {
        async fn logical_data_sources(&self) -> Result<Vec<DataSourceRow>> {
            let state = self.state.lock().unwrap();
            if state.fail_queries {
                return Err(AppError::Database("mock query failure".to_string()));
            }
            Ok(state.logical.clone())
        }

        async fn image_data_sources(&self) -> Result<Vec<DataSourceRow>> {
            let state = self.state.lock().unwrap();
            if state.fail_queries {
                return Err(AppError::Database("mock query failure".to_string()));
            }
            Ok(state.images.clone())
        }

        async fn begin_transaction(&self) -> Result<Box<dyn CaseDbTransaction>> {
            Ok(Box::new(MockTransaction {
                state: Arc::clone(&self.state),
                staged_logical: Vec::new(),
                staged_images: Vec::new(),
                staged_files: Vec::new(),
            }))
        }
    }

    pub struct MockTransaction {
        state: Arc<Mutex<State>>,
        staged_logical: Vec<DataSourceRow>,
        staged_images: Vec<DataSourceRow>,
        staged_files: Vec<(ObjectId, ObjectId, String)>,
    }

    impl MockTransaction {
        fn allocate_id(&self) -> ObjectId {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            state.next_id
        }
    }

    #[async_trait]
    impl CaseDbTransaction for MockTransaction {
        async fn add_local_files_data_source(
            &mut self,
            device_id: &DeviceId,
            root_name: Option<&str>,
            _time_zone: &str,
            _added_at: i64,
        ) -> Result<Content> {
            let object_id = self.allocate_id();
            let name = match root_name {
                Some(name) => name.to_string(),
                None => {
                    let existing = self.state.lock().unwrap().logical.len();
                    format!("LogicalFileSet{}", existing + self.staged_logical.len() + 1)
                }
            };
            self.staged_logical
                .push(DataSourceRow::new(object_id, name.clone()));
            Ok(Content {
                object_id,
                name,
                device_id: device_id.clone(),
            })
        }

        async fn add_local_file(
            &mut self,
            _data_source_id: ObjectId,
            parent_id: ObjectId,
            entry: &LocalFileEntry,
        ) -> Result<ObjectId> {
            let object_id = self.allocate_id();
            self.staged_files
                .push((object_id, parent_id, entry.name.clone()));
            Ok(object_id)
        }

        async fn add_image_data_source(
            &mut self,
            device_id: &DeviceId,
            image_paths: &[String],
            _time_zone: &str,
            _added_at: i64,
        ) -> Result<Content> {
            let object_id = self.allocate_id();
            for path in image_paths {
                self.staged_images
                    .push(DataSourceRow::new(object_id, path.clone()));
            }
            Ok(Content {
                object_id,
                name: image_paths.first().cloned().unwrap_or_default(),
                device_id: device_id.clone(),
            })
        }

        async fn commit(self: Box<Self>) -> Result<()> {
            let this = *self;
            let mut state = this.state.lock().unwrap();
            state.logical.extend(this.staged_logical);
            state.images.extend(this.staged_images);
            state.files.extend(this.staged_files);
            state.commits += 1;
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> Result<()> {
            self.state.lock().unwrap().rollbacks += 1;
            Ok(())
        }
    }
}
