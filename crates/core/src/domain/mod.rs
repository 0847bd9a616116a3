// Domain Layer - Data sources and ingestion results

pub mod data_source;
pub mod error;
pub mod ingest;

// Re-exports
pub use data_source::{
    short_name, DataSourceNameMap, DataSourceRow, DeviceId, LocalFilesConfig,
    ObjectId,
};
pub use error::DomainError;
pub use ingest::{Content, DataSourceProcessorResult, EntryKind, LocalFileEntry, ScanOutcome};
