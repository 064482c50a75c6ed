//! Rick and Morty API client
//!
//! Resolves locations by name and characters by ID batch. The orchestrator
//! only sees the [`LocationLookup`] and [`CharacterLookup`] traits, so tests
//! can substitute in-memory fakes for the HTTP client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use super::{Character, Location, LocationResponse};

/// Base URL for the Rick and Morty API
pub const DEFAULT_API_BASE_URL: &str = "https://rickandmortyapi.com/api";

/// Errors that can occur when talking to the Rick and Morty API
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The API answered with a status we do not handle
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),
}

/// Remote lookup of locations by name
#[async_trait]
pub trait LocationLookup: Send + Sync {
    /// Returns every location whose name matches `name`.
    ///
    /// No match is a normal outcome and yields an empty vector.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Location>, ApiError>;
}

/// Remote batch lookup of characters by ID
#[async_trait]
pub trait CharacterLookup: Send + Sync {
    /// Returns the characters for `ids`. An empty slice performs no I/O.
    async fn find_by_ids(&self, ids: &[u32]) -> Result<Vec<Character>, ApiError>;
}

/// The character endpoint returns a bare object for a single ID and an array
/// for several.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Character>),
    One(Box<Character>),
}

impl From<OneOrMany> for Vec<Character> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(characters) => characters,
            OneOrMany::One(character) => vec![*character],
        }
    }
}

/// HTTP client for the Rick and Morty API
#[derive(Debug, Clone)]
pub struct RickAndMortyClient {
    client: Client,
    base_url: String,
}

impl Default for RickAndMortyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RickAndMortyClient {
    /// Create a new client against the public API
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_BASE_URL)
    }

    /// Create a new client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn location_url(&self, name: &str) -> String {
        format!("{}/location/?name={}", self.base_url, urlencoding::encode(name))
    }

    fn characters_url(&self, ids: &[u32]) -> String {
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!("{}/character/{}", self.base_url, joined)
    }
}

#[async_trait]
impl LocationLookup for RickAndMortyClient {
    async fn find_by_name(&self, name: &str) -> Result<Vec<Location>, ApiError> {
        let url = self.location_url(name);
        tracing::debug!(%url, "fetching location");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        parse_location_response(status, &text)
    }
}

#[async_trait]
impl CharacterLookup for RickAndMortyClient {
    async fn find_by_ids(&self, ids: &[u32]) -> Result<Vec<Character>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.characters_url(ids);
        tracing::debug!(%url, count = ids.len(), "fetching characters");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let text = response.text().await?;

        parse_character_response(status, &text)
    }
}

/// Parses the body of a location search.
///
/// The API answers a search without matches with 404, which is mapped to an
/// empty result rather than an error.
fn parse_location_response(status: StatusCode, body: &str) -> Result<Vec<Location>, ApiError> {
    if status == StatusCode::NOT_FOUND {
        return Ok(Vec::new());
    }
    if !status.is_success() {
        return Err(ApiError::UnexpectedStatus(status.as_u16()));
    }

    let response: LocationResponse = serde_json::from_str(body)?;
    Ok(response.results)
}

/// Parses the body of a character batch request
fn parse_character_response(status: StatusCode, body: &str) -> Result<Vec<Character>, ApiError> {
    if status == StatusCode::NOT_FOUND {
        return Ok(Vec::new());
    }
    if !status.is_success() {
        return Err(ApiError::UnexpectedStatus(status.as_u16()));
    }

    let parsed: OneOrMany = serde_json::from_str(body)?;
    Ok(parsed.into())
}
