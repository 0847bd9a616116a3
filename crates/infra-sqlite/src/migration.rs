// Case database schema migrations
// Each migration script records its own version in schema_version.

use casebook_core::error::Result;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::map_sqlx_error;

/// (version, description, script) in ascending version order
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "case schema",
    include_str!("../migrations/001_case_schema.sql"),
)];

/// Bring the case database up to the latest schema version
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current = schema_version(pool).await?;
    debug!(current, "Case database schema version");

    for (version, description, script) in MIGRATIONS.iter().filter(|(v, _, _)| *v > current) {
        info!(version, description, "Applying case database migration");
        let mut tx = pool.begin().await.map_err(map_sqlx_error)?;
        for statement in statements(script) {
            sqlx::query(&statement)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }
        tx.commit().await.map_err(map_sqlx_error)?;
    }
    Ok(())
}

/// 0 for a fresh database
async fn schema_version(pool: &SqlitePool) -> Result<i64> {
    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
    )
    .fetch_one(pool)
    .await
    .map_err(map_sqlx_error)?;
    if tables == 0 {
        return Ok(0);
    }

    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(pool)
        .await
        .map_err(map_sqlx_error)?;
    Ok(version.unwrap_or(0))
}

/// Statements of a script, `--` comment lines dropped
fn statements(script: &str) -> Vec<String> {
    let without_comments: String = script
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .map(|line| format!("{}\n", line))
        .collect();

    without_comments
        .split(';')
        .map(str::trim)
        .filter(|statement| !statement.is_empty())
        .map(str::to_string)
        .collect()
}
