// SQLite Connection Pool Setup

use casebook_core::error::{AppError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

/// Case database file inside a case directory
pub const CASE_DB_FILE: &str = "case.db";

/// Create SQLite connection pool for the database file at `path`
pub async fn create_pool_at(path: &Path) -> Result<SqlitePool> {
    connect(SqliteConnectOptions::new().filename(path)).await
}

/// WAL mode, busy timeout, foreign keys on every connection
async fn connect(options: SqliteConnectOptions) -> Result<SqlitePool> {
    let options = options
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true)
        .create_if_missing(true);

    SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_at_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CASE_DB_FILE);
        let pool = create_pool_at(&path).await.unwrap();
        assert!(pool.acquire().await.is_ok());
        assert!(path.exists());
    }
}
