use std::{
    collections::{
        BTreeSet,
        HashSet,
    },
    sync::Arc,
};

use super::VocabRecord;

/// The set of category tags the user has switched on. Empty means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    tags: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `tag` and returns whether it is now selected.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.tags.remove(tag) {
            false
        } else {
            self.tags.insert(tag.to_string());
            true
        }
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for FilterSelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { tags: iter.into_iter().map(Into::into).collect() }
    }
}

/// Stable filter: keeps the relative order of `records`.
pub fn apply(records: &[Arc<VocabRecord>], selection: &FilterSelection) -> Vec<Arc<VocabRecord>> {
    if selection.is_empty() {
        return records.to_vec();
    }

    records.iter().filter(|record| selection.contains(&record.category)).cloned().collect()
}

/// Distinct non-empty categories in order of first appearance.
pub fn categories(records: &[Arc<VocabRecord>]) -> Vec<String> {
    let mut seen = HashSet::new();

    records
        .iter()
        .filter(|record| !record.category.is_empty())
        .filter(|record| seen.insert(record.category.as_str()))
        .map(|record| record.category.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(term: &str, category: &str, ordinal: usize) -> Arc<VocabRecord> {
        Arc::new(VocabRecord {
            term: term.to_string(),
            phonetic: String::new(),
            definition: format!("{} definition", term),
            category: category.to_string(),
            ordinal,
        })
    }

    fn sample() -> Vec<Arc<VocabRecord>> {
        vec![
            record("大", "HSK 1", 0),
            record("爱好", "HSK 2", 1),
            record("多", "HSK 1", 2),
            record("安静", "HSK 3", 3),
            record("好", "HSK 1", 4),
            record("帮忙", "", 5),
        ]
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let records = sample();
        let filtered = apply(&records, &FilterSelection::new());
        assert_eq!(filtered, records);
    }

    #[test]
    fn test_filter_is_stable() {
        let records = sample();
        let selection: FilterSelection = ["HSK 3", "HSK 1"].into_iter().collect();
        let ordinals: Vec<usize> =
            apply(&records, &selection).iter().map(|record| record.ordinal).collect();
        assert_eq!(ordinals, vec![0, 2, 3, 4]);
    }

    #[test]
    fn test_unknown_tag_matches_nothing() {
        let records = sample();
        let selection: FilterSelection = ["HSK 6"].into_iter().collect();
        assert!(apply(&records, &selection).is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut selection = FilterSelection::new();
        assert!(selection.toggle("HSK 1"));
        assert!(selection.contains("HSK 1"));
        assert!(!selection.toggle("HSK 1"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_categories_in_first_appearance_order() {
        assert_eq!(categories(&sample()), vec!["HSK 1", "HSK 2", "HSK 3"]);
    }
}
