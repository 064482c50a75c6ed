//! Search history ordering policy
//!
//! Keeps one entry per search term (compared case-insensitively), most
//! recently used first. The two write paths differ:
//!
//! - [`SearchHistory::record_selection`] moves an existing entry to the front
//!   and never adds one.
//! - [`SearchHistory::record_resolved`] adds new terms at the front but
//!   refreshes existing ones where they are.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A past search and the location it resolved to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryItem {
    /// The term as last written by the caller
    pub search_term: String,
    /// Display name of the resolved location
    pub location_name: String,
    /// When this entry was last used
    pub timestamp: DateTime<Utc>,
}

/// Most-recently-used-first log of searches
#[derive(Debug, Clone, Default)]
pub struct SearchHistory {
    items: Vec<SearchHistoryItem>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the entry matching `term` to the front and refreshes its timestamp.
    ///
    /// Unknown terms are ignored: entries are only created once a search
    /// resolves, see [`SearchHistory::record_resolved`].
    pub fn record_selection(&mut self, term: &str) {
        let Some(index) = self.position(term) else {
            return;
        };

        let mut item = self.items.remove(index);
        item.search_term = term.to_string();
        item.timestamp = Utc::now();
        self.items.insert(0, item);
    }

    /// Records that `term` resolved to `location_name`.
    ///
    /// An existing entry is updated where it stands; a new one goes to the front.
    pub fn record_resolved(&mut self, term: &str, location_name: &str) {
        let item = SearchHistoryItem {
            search_term: term.to_string(),
            location_name: location_name.to_string(),
            timestamp: Utc::now(),
        };

        match self.position(term) {
            Some(index) => self.items[index] = item,
            None => self.items.insert(0, item),
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Entries, most recent first
    pub fn items(&self) -> &[SearchHistoryItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&SearchHistoryItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, term: &str) -> Option<usize> {
        let wanted = term.to_lowercase();
        self.items
            .iter()
            .position(|item| item.search_term.to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn terms(history: &SearchHistory) -> Vec<&str> {
        history
            .items()
            .iter()
            .map(|item| item.search_term.as_str())
            .collect()
    }

    /// Builds `[A, B, C]` front to back
    fn abc() -> SearchHistory {
        let mut history = SearchHistory::new();
        history.record_resolved("C", "Location C");
        history.record_resolved("B", "Location B");
        history.record_resolved("A", "Location A");
        history
    }

    #[test]
    fn test_resolved_new_term_goes_to_front() {
        let history = abc();
        assert_eq!(terms(&history), vec!["A", "B", "C"]);
        assert_eq!(history.items()[0].location_name, "Location A");
    }

    #[test]
    fn test_resolved_existing_term_updates_in_place() {
        let mut history = abc();
        let before = history.items()[1].timestamp;
        thread::sleep(Duration::from_millis(5));

        history.record_resolved("B", "Location B'");

        assert_eq!(terms(&history), vec!["A", "B", "C"]);
        assert_eq!(history.items()[1].location_name, "Location B'");
        assert!(history.items()[1].timestamp > before);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_resolved_matches_ignoring_case_and_takes_new_casing() {
        let mut history = abc();
        history.record_resolved("b", "Location B2");

        assert_eq!(terms(&history), vec!["A", "b", "C"]);
        assert_eq!(history.items()[1].location_name, "Location B2");
    }

    #[test]
    fn test_selection_moves_to_front_and_refreshes_timestamp() {
        let mut history = abc();
        let before = history.items()[2].timestamp;
        thread::sleep(Duration::from_millis(5));

        history.record_selection("C");

        assert_eq!(terms(&history), vec!["C", "A", "B"]);
        assert!(history.items()[0].timestamp > before);
        assert_eq!(history.items()[0].location_name, "Location C");
    }

    #[test]
    fn test_selection_of_unknown_term_is_ignored() {
        let mut history = abc();
        history.record_selection("Z");
        assert_eq!(terms(&history), vec!["A", "B", "C"]);

        let mut empty = SearchHistory::new();
        empty.record_selection("Earth");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_selection_ignores_case_without_duplicating() {
        let mut history = SearchHistory::new();
        history.record_resolved("Earth", "Earth (C-137)");
        history.record_resolved("Citadel", "Citadel of Ricks");

        history.record_selection("earth");

        assert_eq!(history.len(), 2);
        assert_eq!(terms(&history), vec!["earth", "Citadel"]);
    }

    #[test]
    fn test_selection_of_front_entry_keeps_order() {
        let mut history = abc();
        history.record_selection("A");
        assert_eq!(terms(&history), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_clear_empties_history() {
        let mut history = abc();
        history.clear();
        assert!(history.is_empty());
        assert!(history.get(0).is_none());
    }
}
