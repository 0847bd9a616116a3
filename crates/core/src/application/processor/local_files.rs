// Local Files Processor - adds local files and directories as a logical data source

use super::panel::{split_paths, LocalFilesPanel};
use super::{DataSourcePanel, DataSourceProcessor};
use crate::application::ingest::constants::LOCAL_FILES_DATA_SOURCE_TYPE;
use crate::application::ingest::{AddLocalFilesTask, IngestTaskHandle};
use crate::domain::{DeviceId, LocalFilesConfig};
use crate::error::{AppError, Result};
use crate::port::{
    CaseProvider, DataSourceProcessorCallback, IdProvider, LocalFileScanner, ProgressMonitor,
    TimeProvider,
};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::runtime::Handle;
use tracing::{debug, info};

/// Local/logical files processor
///
/// Works with a host wizard through [`DataSourceProcessor`], or standalone
/// through [`LocalFilesProcessor::run_with_config`].
///
/// The panel-driven `run` derives a configuration (fresh device id, panel
/// paths and name) the first time it is called and reuses it until `reset`.
/// The processor assumes sequential use: configure, run, reset.
pub struct LocalFilesProcessor {
    panel: Arc<LocalFilesPanel>,
    cases: Arc<dyn CaseProvider>,
    scanner: Arc<dyn LocalFileScanner>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    runtime: Handle,
    // Some = configured; cleared only by reset
    configured: Mutex<Option<LocalFilesConfig>>,
}

impl LocalFilesProcessor {
    pub fn new(
        panel: Arc<LocalFilesPanel>,
        cases: Arc<dyn CaseProvider>,
        scanner: Arc<dyn LocalFileScanner>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
        runtime: Handle,
    ) -> Self {
        Self {
            panel,
            cases,
            scanner,
            id_provider,
            time_provider,
            runtime,
            configured: Mutex::new(None),
        }
    }

    /// The concrete panel, for hosts that fill in its settings
    pub fn config_panel(&self) -> Arc<LocalFilesPanel> {
        Arc::clone(&self.panel)
    }

    /// Configuration the panel-driven `run` will use, if already derived
    pub fn configured(&self) -> Option<LocalFilesConfig> {
        self.lock().clone()
    }

    /// Add a data source with explicit settings instead of the panel's
    ///
    /// Does not read or change any processor state. Returns as soon as the
    /// background task is started; results arrive through `callback`.
    pub fn run_with_config(
        &self,
        config: LocalFilesConfig,
        progress: Arc<dyn ProgressMonitor>,
        callback: Arc<dyn DataSourceProcessorCallback>,
    ) -> IngestTaskHandle {
        info!(
            device_id = %config.device_id(),
            paths = config.local_file_paths().len(),
            "Starting local files data source task"
        );
        AddLocalFilesTask::new(
            config,
            Arc::clone(&self.cases),
            Arc::clone(&self.scanner),
            Arc::clone(&self.time_provider),
            progress,
            callback,
        )
        .spawn(&self.runtime)
    }

    /// Configure the next panel-driven `run` without the panel
    ///
    /// A fresh device id is assigned and the default file set name is used.
    #[deprecated(note = "use run_with_config instead")]
    pub fn set_data_source_options(&self, paths: &str) -> Result<()> {
        let config = LocalFilesConfig::new(self.new_device_id()?, "", split_paths(paths))?;
        *self.lock() = Some(config);
        Ok(())
    }

    fn config_from_panel(&self) -> Result<LocalFilesConfig> {
        if !self.panel.validate() {
            return Err(AppError::Validation(
                "Local files panel has no paths".to_string(),
            ));
        }
        let config = LocalFilesConfig::new(
            self.new_device_id()?,
            self.panel.file_set_name(),
            self.panel.paths(),
        )?;
        info!(
            device_id = %config.device_id(),
            settings = %self.panel.summary(),
            "Configured from panel"
        );
        Ok(config)
    }

    fn new_device_id(&self) -> Result<DeviceId> {
        Ok(DeviceId::new(self.id_provider.generate_id())?)
    }

    fn lock(&self) -> MutexGuard<'_, Option<LocalFilesConfig>> {
        self.configured.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DataSourceProcessor for LocalFilesProcessor {
    fn data_source_type(&self) -> &str {
        LOCAL_FILES_DATA_SOURCE_TYPE
    }

    fn panel(&self) -> Arc<dyn DataSourcePanel> {
        self.panel.select();
        self.panel.clone()
    }

    fn is_panel_valid(&self) -> bool {
        self.panel.validate()
    }

    fn run(
        &self,
        progress: Arc<dyn ProgressMonitor>,
        callback: Arc<dyn DataSourceProcessorCallback>,
    ) -> Result<IngestTaskHandle> {
        let config = {
            let mut configured = self.lock();
            match configured.as_ref() {
                Some(config) => config.clone(),
                None => {
                    let config = self.config_from_panel()?;
                    *configured = Some(config.clone());
                    config
                }
            }
        };
        Ok(self.run_with_config(config, progress, callback))
    }

    /// Cancellation is not supported here: the request is accepted and
    /// ignored. Use [`IngestTaskHandle::cancel`] to stop a running task.
    fn cancel(&self) {
        debug!("Cancel requested on local files processor; not supported");
    }

    fn reset(&self) {
        self.panel.reset();
        *self.lock() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::case::{Case, CaseManager};
    use crate::domain::DataSourceProcessorResult;
    use crate::port::case_database::mocks::MockCaseDatabase;
    use crate::port::file_scanner::mocks::MockScanner;
    use crate::port::host::mocks::RecordingCallback;
    use crate::port::id_provider::mocks::SequentialIdProvider;
    use crate::port::time_provider::mocks::FixedTimeProvider;
    use crate::port::NoopProgressMonitor;
    use std::path::PathBuf;

    fn processor() -> LocalFilesProcessor {
        let cases = Arc::new(CaseManager::new());
        cases.open(Case::new(
            "case",
            "/cases/case",
            Arc::new(MockCaseDatabase::new()),
        ));
        let scanner = MockScanner::default()
            .with_dir("/evidence/a", &["1.txt"])
            .with_dir("/evidence/b", &["2.txt"]);
        LocalFilesProcessor::new(
            Arc::new(LocalFilesPanel::new()),
            cases,
            Arc::new(scanner),
            Arc::new(SequentialIdProvider::default()),
            Arc::new(FixedTimeProvider(0)),
            Handle::current(),
        )
    }

    fn explicit(device_id: &str) -> LocalFilesConfig {
        LocalFilesConfig::new(
            DeviceId::new(device_id).unwrap(),
            "Explicit",
            vec![PathBuf::from("/evidence/a")],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_explicit_runs_leave_panel_state_alone() {
        let processor = processor();
        processor.config_panel().set_content_paths("/evidence/b");
        let first = processor
            .run(Arc::new(NoopProgressMonitor), Arc::new(RecordingCallback::default()))
            .unwrap();
        first.wait().await.unwrap();
        let before = processor.configured();

        for device_id in ["explicit-1", "explicit-2"] {
            let callback = Arc::new(RecordingCallback::default());
            processor
                .run_with_config(explicit(device_id), Arc::new(NoopProgressMonitor), callback.clone())
                .wait()
                .await
                .unwrap();
            assert_eq!(
                callback.single().new_data_sources[0].device_id.as_str(),
                device_id
            );
        }

        assert_eq!(processor.configured(), before);
    }

    #[tokio::test]
    async fn test_panel_run_reuses_device_id() {
        let processor = processor();
        processor.config_panel().set_content_paths("/evidence/a");

        let first = processor
            .run(Arc::new(NoopProgressMonitor), Arc::new(RecordingCallback::default()))
            .unwrap();
        let first_id = first.device_id().to_string();
        first.wait().await.unwrap();

        // Panel edits after the first run do not reconfigure
        processor.config_panel().set_content_paths("/evidence/b");
        let second = processor
            .run(Arc::new(NoopProgressMonitor), Arc::new(RecordingCallback::default()))
            .unwrap();
        assert_eq!(second.device_id(), first_id);
        second.wait().await.unwrap();

        let configured = processor.configured().unwrap();
        assert_eq!(configured.local_file_paths(), &[PathBuf::from("/evidence/a")]);
    }

    #[tokio::test]
    async fn test_reset_clears_latch_and_new_id_follows() {
        let processor = processor();
        processor.config_panel().set_content_paths("/evidence/a");
        let first = processor
            .run(Arc::new(NoopProgressMonitor), Arc::new(RecordingCallback::default()))
            .unwrap();
        let first_id = first.device_id().to_string();
        first.wait().await.unwrap();

        processor.reset();
        assert!(processor.configured().is_none());
        assert!(!processor.is_panel_valid());

        processor.config_panel().set_content_paths("/evidence/b");
        let second = processor
            .run(Arc::new(NoopProgressMonitor), Arc::new(RecordingCallback::default()))
            .unwrap();
        assert_ne!(second.device_id(), first_id);
        second.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_panel_is_rejected_without_latching() {
        let processor = processor();
        let err = processor
            .run(Arc::new(NoopProgressMonitor), Arc::new(RecordingCallback::default()))
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(processor.configured().is_none());
    }

    #[tokio::test]
    #[allow(deprecated)]
    async fn test_deprecated_options_skip_panel() {
        let processor = processor();
        processor.set_data_source_options("/evidence/b").unwrap();
        let configured = processor.configured().unwrap();

        // Panel is empty but the latched options are used
        let callback = Arc::new(RecordingCallback::default());
        let handle = processor
            .run(Arc::new(NoopProgressMonitor), callback.clone())
            .unwrap();
        assert_eq!(handle.device_id(), configured.device_id().as_str());
        handle.wait().await.unwrap();
        assert_eq!(callback.single().result, DataSourceProcessorResult::NoErrors);
    }

    #[tokio::test]
    async fn test_processor_cancel_is_a_no_op() {
        let processor = processor();
        processor.config_panel().set_content_paths("/evidence/a");
        let callback = Arc::new(RecordingCallback::default());
        let handle = processor
            .run(Arc::new(NoopProgressMonitor), callback.clone())
            .unwrap();
        processor.cancel();
        handle.wait().await.unwrap();

        assert_eq!(callback.single().result, DataSourceProcessorResult::NoErrors);
    }

    #[tokio::test]
    async fn test_type_and_panel() {
        let processor = processor();
        assert_eq!(processor.data_source_type(), "Logical Files");
        processor.config_panel().set_content_paths("/evidence/a");
        assert!(processor.panel().validate());
        assert!(processor.is_panel_valid());
    }
}
