//! In-memory filtering, sorting and free-text search over entries.

use crate::models::Entry;

/// Optional equality filters. Absent fields are no-ops.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub language: Option<String>,
    pub category: Option<String>,
}

impl EntryFilter {
    fn matches(&self, entry: &Entry) -> bool {
        if let Some(language) = &self.language {
            if &entry.language != language {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &entry.category != category {
                return false;
            }
        }
        true
    }
}

/// Search filters applied conjunctively with the text query.
#[derive(Debug, Clone, Default)]
pub struct SearchFilters {
    pub language: Option<String>,
    pub category: Option<String>,
    pub has_media: bool,
    pub has_location: bool,
}

/// Sort orders for browsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortKey {
    /// Creation time descending
    NewestFirst,
    /// Creation time ascending
    OldestFirst,
    /// Case-insensitive title
    TitleAz,
}

/// Keep entries matching every provided filter, order preserved.
pub fn filter(entries: &[Entry], filter: &EntryFilter) -> Vec<Entry> {
    entries
        .iter()
        .filter(|e| filter.matches(e))
        .cloned()
        .collect()
}

/// Stable sort by the given key. Missing keys sort as the empty string.
pub fn sort(entries: &[Entry], key: SortKey) -> Vec<Entry> {
    let mut sorted = entries.to_vec();
    match key {
        SortKey::NewestFirst => {
            sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        }
        SortKey::OldestFirst => {
            sorted.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        }
        SortKey::TitleAz => {
            sorted.sort_by_key(|e| e.title.to_lowercase());
        }
    }
    sorted
}

/// Free-text search: the lowercase query must be a substring of the
/// lowercase title or description, and all provided filters must pass.
pub fn search(entries: &[Entry], query: &str, filters: &SearchFilters) -> Vec<Entry> {
    let query_lower = query.to_lowercase();
    // Equality checks share one predicate with `filter`
    let equality = EntryFilter {
        language: filters.language.clone(),
        category: filters.category.clone(),
    };

    entries
        .iter()
        .filter(|entry| {
            let title_match = entry.title.to_lowercase().contains(&query_lower);
            let desc_match = entry.description.to_lowercase().contains(&query_lower);
            if !(title_match || desc_match) {
                return false;
            }
            if !equality.matches(entry) {
                return false;
            }
            if filters.has_media && !entry.has_media() {
                return false;
            }
            if filters.has_location && !entry.has_location() {
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, title: &str, language: &str, timestamp: &str) -> Entry {
        Entry {
            id,
            title: title.to_string(),
            description: format!("{title} description"),
            language: language.to_string(),
            category: "Pest Control".to_string(),
            location_name: String::new(),
            latitude: None,
            longitude: None,
            image_path: None,
            audio_path: None,
            timestamp: timestamp.to_string(),
            contributor: "alice".to_string(),
            contributor_full_name: "Alice".to_string(),
        }
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry(1, "Wheat storage", "Hindi", "2024-06-01T10:00:00+05:30"),
            entry(2, "Rice planting", "English", "2024-06-02T10:00:00+05:30"),
            entry(3, "wheat rotation", "Hindi", "2024-06-03T10:00:00+05:30"),
        ]
    }

    #[test]
    fn test_filter_by_language_preserves_order() {
        let entries = sample();
        let hindi = filter(
            &entries,
            &EntryFilter {
                language: Some("Hindi".to_string()),
                category: None,
            },
        );
        assert_eq!(
            hindi.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let entries = sample();
        assert_eq!(filter(&entries, &EntryFilter::default()), entries);
    }

    #[test]
    fn test_sort_orders() {
        let entries = sample();
        let newest = sort(&entries, SortKey::NewestFirst);
        assert_eq!(newest[0].id, 3);
        let oldest = sort(&entries, SortKey::OldestFirst);
        assert_eq!(oldest[0].id, 1);
        let by_title = sort(&entries, SortKey::TitleAz);
        // "Rice" < "Wheat" = "wheat" case-insensitively; ids 1 and 3 keep
        // their input order under the stable sort
        assert_eq!(
            by_title.iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![2, 1, 3]
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let entries = sample();
        let upper = search(&entries, "WHEAT", &SearchFilters::default());
        let lower = search(&entries, "wheat", &SearchFilters::default());
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 2);
    }

    #[test]
    fn test_search_matches_description_too() {
        let entries = sample();
        let hits = search(&entries, "planting description", &SearchFilters::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn test_search_filters_are_conjunctive() {
        let mut entries = sample();
        entries[0].image_path = Some("media/x.jpg".to_string());

        // Text matches, but the language filter fails: excluded
        let hits = search(
            &entries,
            "wheat",
            &SearchFilters {
                language: Some("English".to_string()),
                ..SearchFilters::default()
            },
        );
        assert!(hits.is_empty());

        // has_media keeps only the entry with an attachment
        let hits = search(
            &entries,
            "wheat",
            &SearchFilters {
                has_media: true,
                ..SearchFilters::default()
            },
        );
        assert_eq!(hits.iter().map(|e| e.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_search_equality_filters_agree_with_filter() {
        let entries = sample();
        let by_language = EntryFilter {
            language: Some("Hindi".to_string()),
            category: None,
        };
        // An empty query matches every entry, so the equality filters are
        // the only constraint and must select exactly what `filter` does
        let searched = search(
            &entries,
            "",
            &SearchFilters {
                language: Some("Hindi".to_string()),
                ..SearchFilters::default()
            },
        );
        assert_eq!(searched, filter(&entries, &by_language));
    }

    #[test]
    fn test_has_location_requires_both_coordinates() {
        let mut entries = sample();
        entries[0].latitude = Some(19.0);
        entries[2].latitude = Some(0.0);
        entries[2].longitude = Some(0.0);

        let hits = search(
            &entries,
            "wheat",
            &SearchFilters {
                has_location: true,
                ..SearchFilters::default()
            },
        );
        // Entry 1 has only latitude; entry 3 has the genuine (0, 0)
        assert_eq!(hits.iter().map(|e| e.id).collect::<Vec<_>>(), vec![3]);
    }
}
