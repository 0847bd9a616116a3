// Port Layer - Interfaces for external dependencies

pub mod case_database;
pub mod case_provider;
pub mod file_scanner;
pub mod host;
pub mod id_provider; // For deterministic testing
pub mod time_provider;

// Re-exports
pub use case_database::{CaseDatabase, CaseDbTransaction};
pub use case_provider::CaseProvider;
pub use file_scanner::LocalFileScanner;
pub use host::{DataSourceProcessorCallback, NoopProgressMonitor, ProgressMonitor};
pub use id_provider::IdProvider;
pub use time_provider::TimeProvider;
