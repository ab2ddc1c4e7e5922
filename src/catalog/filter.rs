use crate::models::CatalogEntry;

/// Entries matching `search`, sorted by title ascending.
///
/// Matching is a case-insensitive substring test on type, title, description
/// and tags. An empty search matches everything.
pub fn filter_catalog<'a>(list: &'a [CatalogEntry], search: &str) -> Vec<&'a CatalogEntry> {
    let needle = search.to_lowercase();
    let mut matched: Vec<&CatalogEntry> = list.iter().filter(|e| e.matches(&needle)).collect();
    matched.sort_by(|a, b| a.title.cmp(&b.title));
    matched
}
