//! In-memory result caches for a search session
//!
//! Two caches sit in front of the remote API: locations keyed by the search
//! term that resolved them, and characters keyed by location name. Both keep
//! keys in first-insertion order and live for the whole session; nothing is
//! evicted or persisted.

mod character;
mod location;

pub use character::CharacterCache;
pub use location::LocationCache;

use std::collections::HashSet;

/// Collapses records to one per `id`, keeping the first occurrence
pub(crate) fn dedupe_by_id<'a, T, I>(records: I, id: impl Fn(&T) -> u32) -> Vec<&'a T>
where
    I: IntoIterator<Item = &'a T>,
    T: 'a,
{
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(id(record)))
        .collect()
}
