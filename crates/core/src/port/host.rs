// Host Callback Ports
// Implemented by the host (wizard, CLI); the processor only calls into them.

use crate::domain::{Content, DataSourceProcessorResult};

/// Progress reporting while a data source is processed
pub trait ProgressMonitor: Send + Sync {
    fn set_indeterminate(&self, indeterminate: bool);

    fn set_progress(&self, progress: i32);

    fn set_progress_text(&self, text: &str);
}

/// Completion callback, called exactly once per run
pub trait DataSourceProcessorCallback: Send + Sync {
    fn done(
        &self,
        result: DataSourceProcessorResult,
        errors: Vec<String>,
        new_data_sources: Vec<Content>,
    );
}

/// Progress monitor that discards everything
pub struct NoopProgressMonitor;

impl ProgressMonitor for NoopProgressMonitor {
    fn set_indeterminate(&self, _indeterminate: bool) {}

    fn set_progress(&self, _progress: i32) {}

    fn set_progress_text(&self, _text: &str) {}
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Captured `done` invocation
    #[derive(Debug, Clone)]
    pub struct Completion {
        pub result: DataSourceProcessorResult,
        pub errors: Vec<String>,
        pub new_data_sources: Vec<Content>,
    }

    /// Records every callback and progress call
    #[derive(Default)]
    pub struct RecordingCallback {
        completions: Mutex<Vec<Completion>>,
    }

    impl RecordingCallback {
        pub fn completions(&self) -> Vec<Completion> {
            self.completions.lock().unwrap().clone()
        }

        pub fn single(&self) -> Completion {
            let completions = self.completions();
            assert_eq!(completions.len(), 1, "expected exactly one completion");
            completions[0].clone()
        }
    }

    impl DataSourceProcessorCallback for RecordingCallback {
        fn done(
            &self,
            result: DataSourceProcessorResult,
            errors: Vec<String>,
            new_data_sources: Vec<Content>,
        ) {
            self.completions.lock().unwrap().push(Completion {
                result,
                errors,
                new_data_sources,
            });
        }
    }

    #[derive(Default)]
    pub struct RecordingProgress {
        texts: Mutex<Vec<String>>,
    }

    impl RecordingProgress {
        pub fn texts(&self) -> Vec<String> {
            self.texts.lock().unwrap().clone()
        }
    }

    impl ProgressMonitor for RecordingProgress {
        fn set_indeterminate(&self, _indeterminate: bool) {}

        fn set_progress(&self, _progress: i32) {}

        fn set_progress_text(&self, text: &str) {
            self.texts.lock().unwrap().push(text.to_string());
        }
    }
}
