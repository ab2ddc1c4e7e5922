use crate::models::{ActivityPreview, CatalogEntry, ImportedActivity};

use super::{filter_catalog, CatalogClient, CatalogError};

/// The lesson graph being edited, as seen by the library.
pub trait LessonGraph {
    /// Add an activity built from an imported catalog entry.
    fn add_activity(&mut self, activity: ImportedActivity);
    /// Record an undo checkpoint.
    fn add_history(&mut self);
}

/// Outcome of the last catalog load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    NotLoaded,
    Loaded,
    Failed(String),
}

/// The activity library panel: the import list plus search and import.
#[derive(Debug)]
pub struct Library {
    client: CatalogClient,
    import_list: Vec<CatalogEntry>,
    status: LoadStatus,
}

impl Library {
    pub fn new(client: CatalogClient) -> Self {
        Self {
            client,
            import_list: Vec::new(),
            status: LoadStatus::NotLoaded,
        }
    }

    /// Clear the import list and replace it with a fresh catalog fetch.
    ///
    /// On failure the list stays empty and the error is kept in [`LoadStatus`].
    pub async fn mount(&mut self) -> Result<usize, CatalogError> {
        self.import_list.clear();
        match self.client.fetch_all().await {
            Ok(entries) => {
                tracing::info!("Loaded {} catalog entries", entries.len());
                self.import_list = entries;
                self.status = LoadStatus::Loaded;
                Ok(self.import_list.len())
            }
            Err(e) => {
                tracing::warn!("Failed to load activity catalog: {}", e);
                self.status = LoadStatus::Failed(e.to_string());
                Err(e)
            }
        }
    }

    pub fn import_list(&self) -> &[CatalogEntry] {
        &self.import_list
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn results(&self, search: &str) -> Vec<&CatalogEntry> {
        filter_catalog(&self.import_list, search)
    }

    /// Import `entry` into `activity_id`'s slot and checkpoint the graph.
    pub fn select(
        &self,
        entry: &CatalogEntry,
        activity_id: Option<&str>,
        graph: &mut dyn LessonGraph,
    ) {
        tracing::debug!("Importing catalog entry {} ({})", entry.uuid, entry.title);
        graph.add_activity(ImportedActivity {
            activity_type: entry.activity_type.clone(),
            config: entry.config.clone(),
            activity_id: activity_id.map(str::to_string),
            parent_id: entry.parent_id.clone(),
            uuid: entry.uuid,
        });
        graph.add_history();
    }

    pub fn preview(entry: &CatalogEntry) -> ActivityPreview {
        ActivityPreview {
            activity_type_id: entry.activity_type.clone(),
            config: entry.config.clone(),
        }
    }
}
