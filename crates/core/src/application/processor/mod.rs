// Data Source Processors - the capability contract a host wizard drives

pub mod local_files;
pub mod panel;
pub mod registry;

pub use local_files::LocalFilesProcessor;
pub use panel::LocalFilesPanel;
pub use registry::DataSourceProcessorRegistry;

use crate::application::ingest::IngestTaskHandle;
use crate::error::Result;
use crate::port::{DataSourceProcessorCallback, ProgressMonitor};
use std::sync::Arc;

/// Configuration surface a processor exposes to the host
pub trait DataSourcePanel: Send + Sync {
    /// Called when the host shows the panel
    fn select(&self);

    /// True if the settings are complete and `run` may be called
    fn validate(&self) -> bool;

    fn reset(&self);

    /// Short human-readable summary of the current settings
    fn summary(&self) -> String;
}

/// A processor that adds one kind of data source to the current case
pub trait DataSourceProcessor: Send + Sync {
    /// Display string the host uses to select this processor
    fn data_source_type(&self) -> &str;

    /// Select and return the configuration panel
    fn panel(&self) -> Arc<dyn DataSourcePanel>;

    fn is_panel_valid(&self) -> bool;

    /// Add a data source using the panel settings
    ///
    /// Returns as soon as the background task is started. Completion and
    /// results are reported only through `callback`.
    ///
    /// # Errors
    /// - AppError::Validation if the panel is not valid
    fn run(
        &self,
        progress: Arc<dyn ProgressMonitor>,
        callback: Arc<dyn DataSourceProcessorCallback>,
    ) -> Result<IngestTaskHandle>;

    /// Request cancellation of a task started by `run`
    ///
    /// Cancellation is not guaranteed; processors may ignore it.
    fn cancel(&self);

    /// Reset the panel and any settings cached from it
    fn reset(&self);
}
