// Add Local Files Task - background work behind a local files run
//
// Scans every path first (nothing is written if one is missing), then adds
// the data source and its files in one case database transaction.

use super::cancellation::{cancel_channel, CancelToken};
use super::constants::CANCELLED_MESSAGE;
use super::task::IngestTaskHandle;
use crate::domain::{Content, DataSourceProcessorResult, LocalFilesConfig, ObjectId, ScanOutcome};
use crate::error::{AppError, Result};
use crate::port::{
    CaseDbTransaction, CaseProvider, DataSourceProcessorCallback, LocalFileScanner,
    ProgressMonitor, TimeProvider,
};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

/// What gets handed to the callback
#[derive(Debug)]
struct Report {
    result: DataSourceProcessorResult,
    errors: Vec<String>,
    contents: Vec<Content>,
}

impl Report {
    fn critical(message: impl Into<String>) -> Self {
        Self {
            result: DataSourceProcessorResult::CriticalErrors,
            errors: vec![message.into()],
            contents: Vec::new(),
        }
    }

    fn added(content: Content, errors: Vec<String>) -> Self {
        let result = if errors.is_empty() {
            DataSourceProcessorResult::NoErrors
        } else {
            DataSourceProcessorResult::NonCriticalErrors
        };
        Self {
            result,
            errors,
            contents: vec![content],
        }
    }
}

pub struct AddLocalFilesTask {
    config: LocalFilesConfig,
    cases: Arc<dyn CaseProvider>,
    scanner: Arc<dyn LocalFileScanner>,
    time_provider: Arc<dyn TimeProvider>,
    progress: Arc<dyn ProgressMonitor>,
    callback: Arc<dyn DataSourceProcessorCallback>,
}

impl AddLocalFilesTask {
    pub fn new(
        config: LocalFilesConfig,
        cases: Arc<dyn CaseProvider>,
        scanner: Arc<dyn LocalFileScanner>,
        time_provider: Arc<dyn TimeProvider>,
        progress: Arc<dyn ProgressMonitor>,
        callback: Arc<dyn DataSourceProcessorCallback>,
    ) -> Self {
        Self {
            config,
            cases,
            scanner,
            time_provider,
            progress,
            callback,
        }
    }

    /// Start the task on `runtime` and return immediately
    ///
    /// The work runs in its own tokio task so a panic there is caught by the
    /// JoinHandle and still reported through the callback.
    pub fn spawn(self, runtime: &Handle) -> IngestTaskHandle {
        let (cancel_tx, cancel_rx) = cancel_channel();
        let device_id = self.config.device_id().to_string();
        let callback = Arc::clone(&self.callback);
        let work_runtime = runtime.clone();
        let task_device_id = device_id.clone();

        let join = runtime.spawn(async move {
            let work = work_runtime.spawn(self.run(cancel_rx));
            let report = match work.await {
                Ok(report) => report,
                Err(join_err) => {
                    if join_err.is_panic() {
                        error!(device_id = %task_device_id, "Adding local files panicked: {:?}", join_err);
                    } else {
                        error!(device_id = %task_device_id, "Adding local files aborted: {:?}", join_err);
                    }
                    Report::critical(format!("Adding local files failed unexpectedly: {}", join_err))
                }
            };
            info!(
                device_id = %task_device_id,
                result = %report.result,
                errors = report.errors.len(),
                "Local files data source processing finished"
            );
            callback.done(report.result, report.errors, report.contents);
        });

        IngestTaskHandle::new(device_id, cancel_tx, join)
    }

    async fn run(self, cancel: CancelToken) -> Report {
        self.progress.set_indeterminate(true);

        let case = match self.cases.current_case() {
            Ok(case) => case,
            Err(e) => return Report::critical(e.to_string()),
        };

        info!(
            case = %case.name(),
            device_id = %self.config.device_id(),
            paths = self.config.local_file_paths().len(),
            "Adding local files data source"
        );

        let mut scans = Vec::with_capacity(self.config.local_file_paths().len());
        let mut errors = Vec::new();
        for path in self.config.local_file_paths() {
            if cancel.is_cancelled() {
                return Report::critical(CANCELLED_MESSAGE);
            }
            self.progress
                .set_progress_text(&format!("Scanning: {}", path.display()));

            let scanner = Arc::clone(&self.scanner);
            let root = path.clone();
            match tokio::task::spawn_blocking(move || scanner.scan(&root)).await {
                Ok(Ok(scan)) => {
                    errors.extend(scan.errors.iter().cloned());
                    scans.push(scan);
                }
                Ok(Err(e)) => {
                    warn!(path = %path.display(), error = %e, "Local path rejected");
                    return Report::critical(format!("Cannot add {}: {}", path.display(), e));
                }
                Err(join_err) => {
                    return Report::critical(format!(
                        "Scanning {} failed: {}",
                        path.display(),
                        join_err
                    ));
                }
            }
        }

        let mut tx = match case.database().begin_transaction().await {
            Ok(tx) => tx,
            Err(e) => return Report::critical(e.to_string()),
        };

        let written = self.write(tx.as_mut(), &scans, &cancel).await;
        match written {
            Ok(Some(content)) => match tx.commit().await {
                Ok(()) => {
                    info!(object_id = content.object_id, name = %content.name, "Local files data source added");
                    Report::added(content, errors)
                }
                Err(e) => Report::critical(e.to_string()),
            },
            Ok(None) => {
                rollback(tx).await;
                info!(device_id = %self.config.device_id(), "Adding local files cancelled, rolled back");
                Report::critical(CANCELLED_MESSAGE)
            }
            Err(e) => {
                rollback(tx).await;
                error!(device_id = %self.config.device_id(), error = %e, "Adding local files failed");
                Report::critical(e.to_string())
            }
        }
    }

    /// Returns `None` if cancelled
    async fn write(
        &self,
        tx: &mut dyn CaseDbTransaction,
        scans: &[ScanOutcome],
        cancel: &CancelToken,
    ) -> Result<Option<Content>> {
        let content = tx
            .add_local_files_data_source(
                self.config.device_id(),
                self.config.explicit_root_name(),
                &self.time_provider.time_zone(),
                self.time_provider.now_secs(),
            )
            .await?;

        for scan in scans {
            let mut ids: Vec<ObjectId> = Vec::with_capacity(scan.entries.len());
            for entry in &scan.entries {
                if cancel.is_cancelled() {
                    return Ok(None);
                }
                self.progress
                    .set_progress_text(&format!("Adding: {}", entry.path.display()));

                let parent_id = match entry.parent {
                    None => content.object_id,
                    Some(index) => ids.get(index).copied().ok_or_else(|| {
                        AppError::Internal(format!(
                            "Scan entry {} refers to unknown parent {}",
                            entry.path.display(),
                            index
                        ))
                    })?,
                };
                let object_id = tx.add_local_file(content.object_id, parent_id, entry).await?;
                ids.push(object_id);
            }
        }

        Ok(Some(content))
    }
}

async fn rollback(tx: Box<dyn CaseDbTransaction>) {
    if let Err(e) = tx.rollback().await {
        error!(error = %e, "Rollback failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::case::{Case, CaseManager};
    use crate::application::ingest::cancellation::CancelSender;
    use crate::domain::DeviceId;
    use crate::port::case_database::mocks::MockCaseDatabase;
    use crate::port::file_scanner::mocks::MockScanner;
    use crate::port::host::mocks::{RecordingCallback, RecordingProgress};
    use crate::port::time_provider::mocks::FixedTimeProvider;
    use std::path::PathBuf;

    struct Fixture {
        db: MockCaseDatabase,
        cases: Arc<CaseManager>,
        callback: Arc<RecordingCallback>,
        progress: Arc<RecordingProgress>,
    }

    fn fixture() -> Fixture {
        let db = MockCaseDatabase::new();
        let cases = Arc::new(CaseManager::new());
        cases.open(Case::new("case", "/cases/case", Arc::new(db.clone())));
        Fixture {
            db,
            cases,
            callback: Arc::new(RecordingCallback::default()),
            progress: Arc::new(RecordingProgress::default()),
        }
    }

    fn config(name: &str, paths: &[&str]) -> LocalFilesConfig {
        LocalFilesConfig::new(
            DeviceId::new("device-under-test").unwrap(),
            name,
            paths.iter().map(PathBuf::from).collect(),
        )
        .unwrap()
    }

    fn task(f: &Fixture, config: LocalFilesConfig, scanner: MockScanner) -> AddLocalFilesTask {
        AddLocalFilesTask::new(
            config,
            f.cases.clone(),
            Arc::new(scanner),
            Arc::new(FixedTimeProvider(1_700_000_000)),
            f.progress.clone(),
            f.callback.clone(),
        )
    }

    #[tokio::test]
    async fn test_adds_files_under_new_data_source() {
        let f = fixture();
        let scanner = MockScanner::default().with_dir("/evidence/docs", &["a.txt", "b.txt"]);
        let handle = task(&f, config("", &["/evidence/docs"]), scanner).spawn(&Handle::current());
        handle.wait().await.unwrap();

        let done = f.callback.single();
        assert_eq!(done.result, DataSourceProcessorResult::NoErrors);
        assert_eq!(done.new_data_sources.len(), 1);
        assert_eq!(done.new_data_sources[0].name, "LogicalFileSet1");
        assert_eq!(done.new_data_sources[0].device_id.as_str(), "device-under-test");
        assert_eq!(f.db.file_names(), vec!["docs", "a.txt", "b.txt"]);
        assert_eq!(f.db.commits(), 1);
        assert!(f
            .progress
            .texts()
            .iter()
            .any(|t| t.starts_with("Adding: /evidence/docs")));
    }

    #[tokio::test]
    async fn test_scan_errors_are_non_critical() {
        let f = fixture();
        let scanner = MockScanner::default()
            .with_dir("/evidence/docs", &["a.txt"])
            .with_error("/evidence/docs", "permission denied: secret");
        let handle = task(&f, config("Set", &["/evidence/docs"]), scanner).spawn(&Handle::current());
        handle.wait().await.unwrap();

        let done = f.callback.single();
        assert_eq!(done.result, DataSourceProcessorResult::NonCriticalErrors);
        assert_eq!(done.errors, vec!["permission denied: secret".to_string()]);
        assert_eq!(done.new_data_sources[0].name, "Set");
    }

    #[tokio::test]
    async fn test_missing_path_writes_nothing() {
        let f = fixture();
        let scanner = MockScanner::default().with_dir("/evidence/docs", &["a.txt"]);
        let handle = task(&f, config("", &["/evidence/docs", "/missing"]), scanner)
            .spawn(&Handle::current());
        handle.wait().await.unwrap();

        let done = f.callback.single();
        assert_eq!(done.result, DataSourceProcessorResult::CriticalErrors);
        assert!(done.new_data_sources.is_empty());
        assert_eq!(f.db.commits(), 0);
        assert_eq!(f.db.logical_count(), 0);
    }

    #[tokio::test]
    async fn test_no_current_case_is_critical() {
        let f = fixture();
        f.cases.close();
        let scanner = MockScanner::default().with_dir("/evidence/docs", &[]);
        let handle = task(&f, config("", &["/evidence/docs"]), scanner).spawn(&Handle::current());
        handle.wait().await.unwrap();

        let done = f.callback.single();
        assert_eq!(done.result, DataSourceProcessorResult::CriticalErrors);
        assert_eq!(done.errors, vec![AppError::NoCurrentCase.to_string()]);
    }

    struct PanickingProgress;

    impl ProgressMonitor for PanickingProgress {
        fn set_indeterminate(&self, _indeterminate: bool) {
            panic!("progress monitor exploded");
        }

        fn set_progress(&self, _progress: i32) {}

        fn set_progress_text(&self, _text: &str) {}
    }

    #[tokio::test]
    async fn test_panic_is_reported_through_callback() {
        let f = fixture();
        let task = AddLocalFilesTask::new(
            config("", &["/evidence/docs"]),
            f.cases.clone(),
            Arc::new(MockScanner::default()),
            Arc::new(FixedTimeProvider(0)),
            Arc::new(PanickingProgress),
            f.callback.clone(),
        );
        task.spawn(&Handle::current()).wait().await.unwrap();

        let done = f.callback.single();
        assert_eq!(done.result, DataSourceProcessorResult::CriticalErrors);
        assert!(done.errors[0].contains("unexpectedly"));
    }

    /// Requests cancellation once the first file is being added
    struct CancelOnFirstFile {
        sender: CancelSender,
    }

    impl ProgressMonitor for CancelOnFirstFile {
        fn set_indeterminate(&self, _indeterminate: bool) {}

        fn set_progress(&self, _progress: i32) {}

        fn set_progress_text(&self, text: &str) {
            if text.starts_with("Adding:") {
                self.sender.cancel();
            }
        }
    }

    #[tokio::test]
    async fn test_cancel_while_adding_rolls_back() {
        let f = fixture();
        let (sender, token) = cancel_channel();
        let scanner = MockScanner::default().with_dir("/evidence/docs", &["a.txt", "b.txt"]);
        let task = AddLocalFilesTask::new(
            config("Interrupted", &["/evidence/docs"]),
            f.cases.clone(),
            Arc::new(scanner),
            Arc::new(FixedTimeProvider(0)),
            Arc::new(CancelOnFirstFile { sender }),
            f.callback.clone(),
        );

        let report = task.run(token).await;

        assert_eq!(report.result, DataSourceProcessorResult::CriticalErrors);
        assert_eq!(report.errors, vec![CANCELLED_MESSAGE.to_string()]);
        assert!(report.contents.is_empty());
        assert_eq!(f.db.rollbacks(), 1);
        assert_eq!(f.db.commits(), 0);
        assert_eq!(f.db.logical_count(), 0);
        assert!(f.db.file_names().is_empty());
    }
}
