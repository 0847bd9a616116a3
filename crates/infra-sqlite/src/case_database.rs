// SQLite CaseDatabase Implementation

use crate::connection::{create_pool_at, CASE_DB_FILE};
use crate::error::map_sqlx_error;
use crate::migration::run_migrations;
use crate::schema::{SELECT_DATA_SOURCES_IMAGE, SELECT_DATA_SOURCES_LOGICAL};
use crate::transaction::SqliteCaseTransaction;
use async_trait::async_trait;
use casebook_core::domain::DataSourceRow;
use casebook_core::error::Result;
use casebook_core::port::{CaseDatabase, CaseDbTransaction};
use futures::TryStreamExt;
use sqlx::{Row, SqlitePool};
use std::path::Path;
use tracing::{debug, info};

pub struct SqliteCaseDatabase {
    pool: SqlitePool,
}

impl SqliteCaseDatabase {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run a fixed `(obj_id, name)` query
    ///
    /// The connection and the row cursor are scoped to this call and are
    /// released on every exit path, including a row that fails to decode.
    async fn load_rows(&self, sql: &'static str) -> Result<Vec<DataSourceRow>> {
        let mut conn = self.pool.acquire().await.map_err(map_sqlx_error)?;
        let mut rows = sqlx::query(sql).fetch(&mut *conn);

        let mut data_sources = Vec::new();
        while let Some(row) = rows.try_next().await.map_err(map_sqlx_error)? {
            let object_id: i64 = row.try_get(0).map_err(map_sqlx_error)?;
            let name: String = row.try_get(1).map_err(map_sqlx_error)?;
            data_sources.push(DataSourceRow::new(object_id, name));
        }
        Ok(data_sources)
    }
}

#[async_trait]
impl CaseDatabase for SqliteCaseDatabase {
    async fn logical_data_sources(&self) -> Result<Vec<DataSourceRow>> {
        self.load_rows(SELECT_DATA_SOURCES_LOGICAL).await
    }

    async fn image_data_sources(&self) -> Result<Vec<DataSourceRow>> {
        self.load_rows(SELECT_DATA_SOURCES_IMAGE).await
    }

    async fn begin_transaction(&self) -> Result<Box<dyn CaseDbTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        debug!("Case database transaction started");
        Ok(Box::new(SqliteCaseTransaction::new(tx)))
    }
}

/// Open (or create) the case database of the case in `directory`
pub async fn open_case_database(directory: &Path) -> Result<SqliteCaseDatabase> {
    std::fs::create_dir_all(directory)?;
    let path = directory.join(CASE_DB_FILE);
    info!(path = %path.display(), "Opening case database");

    let pool = create_pool_at(&path).await?;
    run_migrations(&pool).await?;
    Ok(SqliteCaseDatabase::new(pool))
}
