//! Character cache keyed by location name

use std::collections::HashMap;

use super::dedupe_by_id;
use crate::data::Character;

/// Maps a location name to the residents fetched for it
///
/// Each list is stored exactly as fetched and replaced wholesale on update.
/// A character living in several cached locations appears in each list;
/// [`CharacterCache::list_all_unique`] collapses those to one record.
#[derive(Debug, Clone, Default)]
pub struct CharacterCache {
    entries: Vec<(String, Vec<Character>)>,
    index: HashMap<String, usize>,
}

impl CharacterCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, location_name: &str) -> bool {
        self.index.contains_key(location_name)
    }

    pub fn get(&self, location_name: &str) -> Option<&[Character]> {
        self.index
            .get(location_name)
            .map(|&i| self.entries[i].1.as_slice())
    }

    /// Stores the residents of `location_name`, replacing any previous list
    pub fn set(&mut self, location_name: impl Into<String>, characters: Vec<Character>) {
        let location_name = location_name.into();
        match self.index.get(&location_name) {
            Some(&i) => self.entries[i].1 = characters,
            None => {
                self.index.insert(location_name.clone(), self.entries.len());
                self.entries.push((location_name, characters));
            }
        }
    }

    /// All cached characters, location by location in insertion order
    pub fn list_all(&self) -> Vec<&Character> {
        self.entries
            .iter()
            .flat_map(|(_, characters)| characters.iter())
            .collect()
    }

    /// All cached characters with one record per character id
    pub fn list_all_unique(&self) -> Vec<&Character> {
        dedupe_by_id(
            self.entries.iter().flat_map(|(_, characters)| characters.iter()),
            |c| c.id,
        )
    }

    /// Iterates `(location name, residents)` pairs in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &[Character])> {
        self.entries
            .iter()
            .map(|(name, characters)| (name.as_str(), characters.as_slice()))
    }

    /// Number of cached locations
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
