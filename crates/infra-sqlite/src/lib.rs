// Casebook Infrastructure - SQLite Case Database
// Implements: CaseDatabase, CaseDbTransaction

mod case_database;
mod connection;
mod error;
mod migration;
mod schema;
mod transaction;

pub use case_database::{open_case_database, SqliteCaseDatabase};
pub use connection::{create_pool_at, CASE_DB_FILE};
pub use migration::run_migrations;
pub use transaction::SqliteCaseTransaction;
