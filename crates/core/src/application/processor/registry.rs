// Processor Registry - explicit registration instead of service discovery

use super::DataSourceProcessor;
use crate::error::{AppError, Result};
use std::sync::Arc;
use tracing::info;

/// Processors the host can offer, in registration order
#[derive(Default)]
pub struct DataSourceProcessorRegistry {
    processors: Vec<Arc<dyn DataSourceProcessor>>,
}

impl DataSourceProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor
    ///
    /// # Errors
    /// - AppError::Conflict if a processor with the same type is registered
    pub fn register(&mut self, processor: Arc<dyn DataSourceProcessor>) -> Result<()> {
        let data_source_type = processor.data_source_type().to_string();
        if self.find_by_type(&data_source_type).is_some() {
            return Err(AppError::Conflict(format!(
                "Data source processor already registered: {}",
                data_source_type
            )));
        }
        info!(data_source_type = %data_source_type, "Registered data source processor");
        self.processors.push(processor);
        Ok(())
    }

    pub fn processors(&self) -> &[Arc<dyn DataSourceProcessor>] {
        &self.processors
    }

    /// Display types, for a selection list
    pub fn types(&self) -> Vec<&str> {
        self.processors
            .iter()
            .map(|p| p.data_source_type())
            .collect()
    }

    pub fn find_by_type(&self, data_source_type: &str) -> Option<Arc<dyn DataSourceProcessor>> {
        self.processors
            .iter()
            .find(|p| p.data_source_type() == data_source_type)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ingest::IngestTaskHandle;
    use crate::application::processor::{DataSourcePanel, LocalFilesPanel};
    use crate::port::{DataSourceProcessorCallback, ProgressMonitor};

    struct StubProcessor(&'static str);

    impl DataSourceProcessor for StubProcessor {
        fn data_source_type(&self) -> &str {
            self.0
        }

        fn panel(&self) -> Arc<dyn DataSourcePanel> {
            Arc::new(LocalFilesPanel::new())
        }

        fn is_panel_valid(&self) -> bool {
            false
        }

        fn run(
            &self,
            _progress: Arc<dyn ProgressMonitor>,
            _callback: Arc<dyn DataSourceProcessorCallback>,
        ) -> Result<IngestTaskHandle> {
            Err(AppError::Validation("stub".to_string()))
        }

        fn cancel(&self) {}

        fn reset(&self) {}
    }

    #[test]
    fn test_find_by_type() {
        let mut registry = DataSourceProcessorRegistry::new();
        registry.register(Arc::new(StubProcessor("Disk Image"))).unwrap();
        registry.register(Arc::new(StubProcessor("Logical Files"))).unwrap();

        assert_eq!(registry.types(), vec!["Disk Image", "Logical Files"]);
        let found = registry.find_by_type("Logical Files").unwrap();
        assert_eq!(found.data_source_type(), "Logical Files");
        assert!(registry.find_by_type("Unknown").is_none());
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let mut registry = DataSourceProcessorRegistry::new();
        registry.register(Arc::new(StubProcessor("Logical Files"))).unwrap();
        let err = registry
            .register(Arc::new(StubProcessor("Logical Files")))
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(registry.processors().len(), 1);
    }
}
