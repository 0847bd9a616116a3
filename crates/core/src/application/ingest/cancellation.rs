// Cooperative cancellation for ingestion tasks

use tokio::sync::watch;

/// Observed by the running task between processing units
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }
}

/// Requests cancellation
#[derive(Debug)]
pub struct CancelSender {
    tx: watch::Sender<bool>,
}

impl CancelSender {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Create a cancellation channel
pub fn cancel_channel() -> (CancelSender, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelSender { tx }, CancelToken { rx })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_observed_by_every_token() {
        let (sender, token) = cancel_channel();
        let copy = token.clone();
        assert!(!token.is_cancelled());

        sender.cancel();
        assert!(token.is_cancelled());
        assert!(copy.is_cancelled());
    }

    #[test]
    fn test_token_outlives_sender_uncancelled() {
        let (sender, token) = cancel_channel();
        drop(sender);
        assert!(!token.is_cancelled());
    }
}
