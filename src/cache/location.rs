//! Location cache keyed by search term

use std::collections::HashMap;

use super::dedupe_by_id;
use crate::data::Location;

/// Maps the exact search term a user typed to the location it resolved to
///
/// Keys are case-sensitive: "Earth" and "earth" are distinct entries. Several
/// terms may resolve to the same location, so values are not unique.
#[derive(Debug, Clone, Default)]
pub struct LocationCache {
    /// Entries in first-insertion order
    entries: Vec<(String, Location)>,
    /// Search term to position in `entries`
    index: HashMap<String, usize>,
}

impl LocationCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `term` has a cached location
    pub fn has(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    /// Returns the cached location for exactly `term`
    pub fn get(&self, term: &str) -> Option<&Location> {
        self.index.get(term).map(|&i| &self.entries[i].1)
    }

    /// Returns the first cached entry whose term equals `term` ignoring case
    ///
    /// An exact match wins over other casings.
    pub fn find_ignore_case(&self, term: &str) -> Option<(&str, &Location)> {
        if let Some(&i) = self.index.get(term) {
            let (key, location) = &self.entries[i];
            return Some((key.as_str(), location));
        }
        let wanted = term.to_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| key.to_lowercase() == wanted)
            .map(|(key, location)| (key.as_str(), location))
    }

    /// Stores `location` under `term`, replacing any previous entry
    ///
    /// Replacing keeps the term's original position.
    pub fn set(&mut self, term: impl Into<String>, location: Location) {
        let term = term.into();
        match self.index.get(&term) {
            Some(&i) => self.entries[i].1 = location,
            None => {
                self.index.insert(term.clone(), self.entries.len());
                self.entries.push((term, location));
            }
        }
    }

    /// Every cached location, one per search term
    pub fn list_all(&self) -> Vec<&Location> {
        self.entries.iter().map(|(_, location)| location).collect()
    }

    /// Cached locations with one entry per location id, first seen first
    pub fn list_all_unique(&self) -> Vec<&Location> {
        dedupe_by_id(self.entries.iter().map(|(_, location)| location), |l| l.id)
    }

    /// Every cached search term in insertion order
    pub fn search_terms(&self) -> Vec<&str> {
        self.entries.iter().map(|(term, _)| term.as_str()).collect()
    }

    /// Iterates `(search term, location)` pairs in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Location)> {
        self.entries
            .iter()
            .map(|(term, location)| (term.as_str(), location))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry. Only used for debugging.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}
