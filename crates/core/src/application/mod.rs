// Application Layer - Use Cases and Services

pub mod case;
pub mod data_source_loader;
pub mod ingest;
pub mod processor;

// Re-exports
pub use case::{Case, CaseManager};
pub use data_source_loader::DataSourceLoader;
pub use ingest::IngestTaskHandle;
pub use processor::{
    DataSourcePanel, DataSourceProcessor, DataSourceProcessorRegistry, LocalFilesPanel,
    LocalFilesProcessor,
};
