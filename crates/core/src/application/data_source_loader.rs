// Data Source Loader - maps data sources of the current case to display names
//
// Blocking from the caller's point of view: run it from a background task,
// never from a UI path.

use crate::domain::{short_name, DataSourceNameMap};
use crate::error::Result;
use crate::port::{CaseDatabase, CaseProvider};
use std::sync::Arc;
use tracing::debug;

pub struct DataSourceLoader {
    cases: Arc<dyn CaseProvider>,
}

impl DataSourceLoader {
    pub fn new(cases: Arc<dyn CaseProvider>) -> Self {
        Self { cases }
    }

    /// Data source id -> file name only (image paths reduced to their last segment)
    ///
    /// # Errors
    /// - AppError::NoCurrentCase if no case is open
    /// - AppError::Database / AppError::MalformedRow from the case database, unchanged
    pub async fn data_source_map(&self) -> Result<DataSourceNameMap> {
        self.load(false).await
    }

    /// Data source id -> full path as stored in the case database
    ///
    /// # Errors
    /// Same as [`DataSourceLoader::data_source_map`].
    pub async fn full_path_data_source_map(&self) -> Result<DataSourceNameMap> {
        self.load(true).await
    }

    async fn load(&self, full_path: bool) -> Result<DataSourceNameMap> {
        let case = self.cases.current_case()?;
        let db = case.database();

        let mut map = DataSourceNameMap::new();
        load_logical_sources(db.as_ref(), &mut map).await?;
        load_image_sources(db.as_ref(), &mut map, full_path).await?;

        debug!(case = %case.name(), data_sources = map.len(), full_path, "Loaded data source names");
        Ok(map)
    }
}

async fn load_logical_sources(db: &dyn CaseDatabase, map: &mut DataSourceNameMap) -> Result<()> {
    for row in db.logical_data_sources().await? {
        map.insert(row.object_id, row.name);
    }
    Ok(())
}

// Image rows only fill ids not already named by a logical source.
async fn load_image_sources(
    db: &dyn CaseDatabase,
    map: &mut DataSourceNameMap,
    full_path: bool,
) -> Result<()> {
    for row in db.image_data_sources().await? {
        map.entry(row.object_id).or_insert_with(|| {
            if full_path {
                row.name
            } else {
                short_name(&row.name).to_string()
            }
        });
    }
    Ok(())
}
