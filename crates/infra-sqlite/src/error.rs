// sqlx::Error -> AppError
// (orphan rules prevent a From impl here)

use casebook_core::error::AppError;

/// Convert sqlx::Error to AppError with structured information
///
/// Column and decode failures become `MalformedRow`; everything else is an
/// engine failure (`Database`).
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // SQLite error codes: https://www.sqlite.org/rescode.html
            match db_err.code().as_deref() {
                Some(code @ ("2067" | "1555")) => AppError::Database(format!(
                    "Unique constraint violation: {} ({})",
                    db_err.message(),
                    code
                )),
                Some(code @ ("787" | "3850")) => AppError::Database(format!(
                    "Foreign key constraint violation: {} ({})",
                    db_err.message(),
                    code
                )),
                Some("5") => AppError::Database(format!(
                    "Database locked (SQLITE_BUSY): {}",
                    db_err.message()
                )),
                Some("13") => AppError::Database(format!("Database full: {}", db_err.message())),
                Some(code) => AppError::Database(format!(
                    "Database error [{}]: {}",
                    code,
                    db_err.message()
                )),
                None => AppError::Database(format!("Database error: {}", db_err.message())),
            }
        }
        sqlx::Error::ColumnNotFound(col) => {
            AppError::MalformedRow(format!("Column not found: {}", col))
        }
        sqlx::Error::ColumnIndexOutOfBounds { index, len } => AppError::MalformedRow(format!(
            "Column index {} out of bounds ({} columns)",
            index, len
        )),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            AppError::MalformedRow(err.to_string())
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        // Connection, pool, protocol errors
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_errors_are_malformed_rows() {
        let err = map_sqlx_error(sqlx::Error::ColumnNotFound("name".to_string()));
        assert!(matches!(err, AppError::MalformedRow(_)));

        let err = map_sqlx_error(sqlx::Error::ColumnIndexOutOfBounds { index: 2, len: 2 });
        assert!(matches!(err, AppError::MalformedRow(_)));
    }

    #[test]
    fn test_pool_errors_are_database_errors() {
        let err = map_sqlx_error(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Database(_)));
    }
}
