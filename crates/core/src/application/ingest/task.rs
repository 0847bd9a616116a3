// Handle to a running ingestion task

use super::cancellation::CancelSender;
use crate::error::{AppError, Result};
use tokio::task::JoinHandle;
use tracing::info;

/// Returned by `run`; the callback remains the only result channel
#[derive(Debug)]
pub struct IngestTaskHandle {
    device_id: String,
    cancel: CancelSender,
    join: JoinHandle<()>,
}

impl IngestTaskHandle {
    pub(crate) fn new(device_id: String, cancel: CancelSender, join: JoinHandle<()>) -> Self {
        Self {
            device_id,
            cancel,
            join,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Request cooperative cancellation
    ///
    /// Takes effect at the next processing unit; work already committed stays.
    pub fn cancel(&self) {
        info!(device_id = %self.device_id, "Cancellation requested");
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait until the task has called the callback
    pub async fn wait(self) -> Result<()> {
        self.join
            .await
            .map_err(|e| AppError::Internal(format!("Ingestion task failed to join: {}", e)))
    }
}
