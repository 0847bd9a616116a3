// Ingestion - background add of local files with cooperative cancellation

pub mod add_local_files;
pub mod cancellation;
pub mod constants;
mod task;

pub use add_local_files::AddLocalFilesTask;
pub use cancellation::{cancel_channel, CancelSender, CancelToken};
pub use task::IngestTaskHandle;
