// Ingestion constants
/// Display type of the local files processor
pub const LOCAL_FILES_DATA_SOURCE_TYPE: &str = "Logical Files";

/// Separator between paths in the panel's content paths string
pub const FILES_SEP: &str = ",";

/// Error reported when an ingestion is cancelled through its task handle
pub const CANCELLED_MESSAGE: &str = "Adding local files was cancelled";
