//! Core data models for portalscope
//!
//! This module contains the record types exchanged with the Rick and Morty API
//! and the resident reference parsing used to turn a location into a batch of
//! character IDs.

pub mod api;
pub mod fun_fact;

pub use api::{ApiError, CharacterLookup, LocationLookup, RickAndMortyClient};
pub use fun_fact::{fallback_fun_fact, FunFactError, FunFactGenerator, GeminiClient};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A location (planet, dimension, space station...) as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Source-assigned identifier, stable across requests
    pub id: u32,
    /// Display name, also used as the character cache key
    pub name: String,
    /// Kind of location, e.g. "Planet"
    #[serde(rename = "type", default)]
    pub location_type: String,
    /// Dimension the location belongs to
    #[serde(default)]
    pub dimension: String,
    /// Ordered resident references, each ending in a character ID
    #[serde(default)]
    pub residents: Vec<String>,
    /// Canonical API URL of this location
    #[serde(default)]
    pub url: String,
}

/// Paged response of the location search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LocationResponse {
    #[serde(default)]
    pub results: Vec<Location>,
}

/// A reference to a location by name, as embedded in character records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Life status of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterStatus {
    Alive,
    Dead,
    #[serde(rename = "unknown")]
    Unknown,
}

impl CharacterStatus {
    /// Returns the status as the API spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterStatus::Alive => "Alive",
            CharacterStatus::Dead => "Dead",
            CharacterStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A character record as returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Source-assigned identifier
    pub id: u32,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    #[serde(default)]
    pub gender: String,
    /// Where the character comes from
    #[serde(default)]
    pub origin: LocationRef,
    /// Last known location
    pub location: LocationRef,
    /// Portrait image URI
    #[serde(default)]
    pub image: String,
}

/// A resident reference that could not be turned into a character ID
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed resident reference '{reference}': {reason}")]
pub struct ResidentRefError {
    /// The offending reference as received
    pub reference: String,
    /// Why it was rejected
    pub reason: String,
}

/// Character IDs extracted from a location's resident references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidentIds {
    /// Parsed IDs in resident order
    pub ids: Vec<u32>,
    /// References that were skipped
    pub rejected: Vec<ResidentRefError>,
}

/// Extracts character IDs from resident references.
///
/// Takes the final path segment of each reference (a single trailing `/` is
/// ignored) and parses it as an integer. Malformed references are skipped,
/// logged and reported in [`ResidentIds::rejected`].
///
/// # Example
/// ```
/// use portalscope::data::extract_resident_ids;
///
/// let residents = vec![
///     "https://rickandmortyapi.com/api/character/38".to_string(),
///     "https://rickandmortyapi.com/api/character/45/".to_string(),
/// ];
/// assert_eq!(extract_resident_ids(&residents).ids, vec![38, 45]);
/// ```
pub fn extract_resident_ids(residents: &[String]) -> ResidentIds {
    let mut extracted = ResidentIds::default();

    for reference in residents {
        match parse_resident_ref(reference) {
            Ok(id) => extracted.ids.push(id),
            Err(err) => {
                tracing::warn!(reference = %reference, reason = %err.reason, "skipping resident reference");
                extracted.rejected.push(err);
            }
        }
    }

    extracted
}

/// Parses a single resident reference into a character ID
fn parse_resident_ref(reference: &str) -> Result<u32, ResidentRefError> {
    let trimmed = reference.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    let segment = trimmed.rsplit('/').next().unwrap_or_default();

    if segment.is_empty() {
        return Err(ResidentRefError {
            reference: reference.to_string(),
            reason: "empty final path segment".to_string(),
        });
    }

    segment.parse::<u32>().map_err(|e| ResidentRefError {
        reference: reference.to_string(),
        reason: format!("'{}' is not a character id ({})", segment, e),
    })
}
