// SQLite Case Transaction Implementation

use crate::error::map_sqlx_error;
use crate::schema::*;
use async_trait::async_trait;
use casebook_core::domain::{Content, DeviceId, EntryKind, LocalFileEntry, ObjectId};
use casebook_core::error::{AppError, Result};
use casebook_core::port::CaseDbTransaction;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use std::collections::HashMap;
use tracing::debug;

/// Write transaction on the case database
///
/// Dropping it without `commit` rolls back (sqlx semantics).
pub struct SqliteCaseTransaction {
    tx: SqlxTransaction<'static, Sqlite>,
    // obj_id -> path inside its data source ("/LogicalFileSet1/docs/")
    child_paths: HashMap<ObjectId, String>,
}

impl SqliteCaseTransaction {
    pub fn new(tx: SqlxTransaction<'static, Sqlite>) -> Self {
        Self {
            tx,
            child_paths: HashMap::new(),
        }
    }

    async fn insert_object(&mut self, parent: Option<ObjectId>, object_type: i32) -> Result<ObjectId> {
        let result = sqlx::query("INSERT INTO tsk_objects (par_obj_id, type) VALUES (?, ?)")
            .bind(parent)
            .bind(object_type)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.last_insert_rowid())
    }

    async fn insert_data_source_info(
        &mut self,
        object_id: ObjectId,
        device_id: &DeviceId,
        time_zone: &str,
        added_at: i64,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO data_source_info (obj_id, device_id, time_zone, added_date_time) VALUES (?, ?, ?, ?)",
        )
        .bind(object_id)
        .bind(device_id.as_str())
        .bind(time_zone)
        .bind(added_at)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// `LogicalFileSet<N>` with N one more than the logical sources present
    async fn default_root_name(&mut self) -> Result<String> {
        let existing: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM tsk_files f JOIN data_source_info d ON f.obj_id = d.obj_id",
        )
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;
        Ok(format!("{}{}", LOGICAL_FILE_SET_PREFIX, existing + 1))
    }
}

#[async_trait]
impl CaseDbTransaction for SqliteCaseTransaction {
    async fn add_local_files_data_source(
        &mut self,
        device_id: &DeviceId,
        root_name: Option<&str>,
        time_zone: &str,
        added_at: i64,
    ) -> Result<Content> {
        let name = match root_name {
            Some(name) => name.to_string(),
            None => self.default_root_name().await?,
        };

        let object_id = self.insert_object(None, OBJECT_TYPE_ABSTRACT_FILE).await?;
        self.insert_data_source_info(object_id, device_id, time_zone, added_at)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO tsk_files (
                obj_id, data_source_obj_id, type, name,
                meta_type, dir_type, size, mtime, parent_path
            ) VALUES (?, ?, ?, ?, ?, ?, 0, NULL, '/')
            "#,
        )
        .bind(object_id)
        .bind(object_id)
        .bind(FILE_TYPE_VIRTUAL_DIR)
        .bind(&name)
        .bind(META_TYPE_VIRT_DIR)
        .bind(DIR_TYPE_VIRT_DIR)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        self.child_paths.insert(object_id, format!("/{}/", name));
        debug!(object_id, name = %name, device_id = %device_id, "Local files data source created");

        Ok(Content {
            object_id,
            name,
            device_id: device_id.clone(),
        })
    }

    async fn add_local_file(
        &mut self,
        data_source_id: ObjectId,
        parent_id: ObjectId,
        entry: &LocalFileEntry,
    ) -> Result<ObjectId> {
        let parent_path = self.child_paths.get(&parent_id).cloned().ok_or_else(|| {
            AppError::NotFound(format!("Parent object {} not added in this transaction", parent_id))
        })?;

        let (file_type, meta_type, dir_type) = match entry.kind {
            EntryKind::File => (FILE_TYPE_LOCAL, META_TYPE_REG, DIR_TYPE_REG),
            EntryKind::Directory => (FILE_TYPE_LOCAL_DIR, META_TYPE_DIR, DIR_TYPE_DIR),
        };
        let size = i64::try_from(entry.size)
            .map_err(|_| AppError::Internal(format!("File too large: {}", entry.path.display())))?;

        let object_id = self
            .insert_object(Some(parent_id), OBJECT_TYPE_ABSTRACT_FILE)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO tsk_files (
                obj_id, data_source_obj_id, type, name,
                meta_type, dir_type, size, mtime, parent_path
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(object_id)
        .bind(data_source_id)
        .bind(file_type)
        .bind(&entry.name)
        .bind(meta_type)
        .bind(dir_type)
        .bind(size)
        .bind(entry.modified)
        .bind(&parent_path)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        sqlx::query("INSERT INTO tsk_files_path (obj_id, path) VALUES (?, ?)")
            .bind(object_id)
            .bind(entry.path.to_string_lossy().as_ref())
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        if entry.kind == EntryKind::Directory {
            self.child_paths
                .insert(object_id, format!("{}{}/", parent_path, entry.name));
        }
        Ok(object_id)
    }

    async fn add_image_data_source(
        &mut self,
        device_id: &DeviceId,
        image_paths: &[String],
        time_zone: &str,
        added_at: i64,
    ) -> Result<Content> {
        let first = image_paths
            .first()
            .cloned()
            .ok_or_else(|| AppError::Validation("Image has no paths".to_string()))?;

        let object_id = self.insert_object(None, OBJECT_TYPE_IMAGE).await?;
        self.insert_data_source_info(object_id, device_id, time_zone, added_at)
            .await?;

        for (sequence, path) in image_paths.iter().enumerate() {
            sqlx::query("INSERT INTO tsk_image_names (obj_id, name, sequence) VALUES (?, ?, ?)")
                .bind(object_id)
                .bind(path)
                .bind(sequence as i64)
                .execute(&mut *self.tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        debug!(object_id, segments = image_paths.len(), device_id = %device_id, "Image data source recorded");
        Ok(Content {
            object_id,
            name: first,
            device_id: device_id.clone(),
        })
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}
