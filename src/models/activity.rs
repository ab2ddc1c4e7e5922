use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// An importable activity definition from the activity catalog.
///
/// Catalog entries are owned by the external catalog service and are never
/// mutated locally. Importing an entry copies its type and config into the
/// current lesson graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub uuid: Uuid,
    #[serde(default)]
    pub activity_type: Option<String>,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Activity configuration, opaque to the library.
    #[serde(default)]
    pub config: Value,
    /// Activity this entry was exported from, if any.
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl CatalogEntry {
    /// Case-insensitive substring match on type, title, description or any tag.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.activity_type
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains(needle))
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

/// Unset catalog columns arrive as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// What the lesson graph receives when a catalog entry is imported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedActivity {
    pub activity_type: Option<String>,
    pub config: Value,
    /// The graph slot the entry is imported into.
    pub activity_id: Option<String>,
    pub parent_id: Option<String>,
    pub uuid: Uuid,
}

/// Descriptor for previewing an entry without importing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPreview {
    pub activity_type_id: Option<String>,
    pub config: Value,
}
