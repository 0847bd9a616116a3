//! CLI side of the processor callbacks

use casebook_core::domain::{Content, DataSourceProcessorResult};
use casebook_core::port::{DataSourceProcessorCallback, ProgressMonitor};
use serde::Serialize;
use std::sync::Mutex;
use tokio::sync::oneshot;
use tracing::info;

/// Logs progress text as it arrives
pub struct TracingProgressMonitor;

impl ProgressMonitor for TracingProgressMonitor {
    fn set_indeterminate(&self, _indeterminate: bool) {}

    fn set_progress(&self, progress: i32) {
        info!(progress, "Progress");
    }

    fn set_progress_text(&self, text: &str) {
        info!("{}", text);
    }
}

#[derive(Debug, Serialize)]
pub struct Completion {
    pub result: DataSourceProcessorResult,
    pub errors: Vec<String>,
    pub new_data_sources: Vec<Content>,
}

/// Hands the single completion over to the waiting command
pub struct ChannelCallback {
    tx: Mutex<Option<oneshot::Sender<Completion>>>,
}

impl ChannelCallback {
    pub fn new() -> (Self, oneshot::Receiver<Completion>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                tx: Mutex::new(Some(tx)),
            },
            rx,
        )
    }
}

impl DataSourceProcessorCallback for ChannelCallback {
    fn done(
        &self,
        result: DataSourceProcessorResult,
        errors: Vec<String>,
        new_data_sources: Vec<Content>,
    ) {
        let sender = self
            .tx
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(tx) = sender {
            let _ = tx.send(Completion {
                result,
                errors,
                new_data_sources,
            });
        }
    }
}
