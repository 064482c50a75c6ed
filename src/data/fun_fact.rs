//! Fun fact generation through the Gemini API
//!
//! Asks a language model for a one-sentence fun fact about a character. Callers
//! are expected to fall back to [`fallback_fun_fact`] when generation fails;
//! failures are never shown to the user as errors.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Character;

/// Base URL for the Gemini REST API
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";

/// Errors that can occur when generating a fun fact
#[derive(Debug, Error)]
pub enum FunFactError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// No API key was configured
    #[error("No Gemini API key configured")]
    MissingApiKey,

    /// The model answered without any text
    #[error("Model returned no text")]
    EmptyResponse,
}

/// Generates a short natural-language fact about a character
#[async_trait]
pub trait FunFactGenerator: Send + Sync {
    async fn fun_fact(&self, character: &Character) -> Result<String, FunFactError>;
}

/// The text shown when generation fails
pub fn fallback_fun_fact(character: &Character) -> String {
    format!(
        "Fun fact: {} is too cool for AI-generated facts right now.",
        character.name
    )
}

/// Builds the prompt sent to the model
pub fn build_prompt(character: &Character) -> String {
    format!(
        "Write a short, interesting one-sentence fun fact about Rick and Morty character {}, who is a {} and has a status of {}.",
        character.name, character.species, character.status
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Client for the Gemini `generateContent` endpoint
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client. Without an API key every call fails with
    /// [`FunFactError::MissingApiKey`].
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The model requests are issued against
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl FunFactGenerator for GeminiClient {
    async fn fun_fact(&self, character: &Character) -> Result<String, FunFactError> {
        let api_key = self.api_key.as_deref().ok_or(FunFactError::MissingApiKey)?;
        let prompt = build_prompt(character);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let text = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_generate_response(&text)
    }
}

/// Extracts the first candidate's text from a `generateContent` response
fn parse_generate_response(body: &str) -> Result<String, FunFactError> {
    let response: GenerateResponse = serde_json::from_str(body)?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .into_iter()
        .flat_map(|content| content.parts)
        .map(|part| part.text)
        .collect::<String>();

    let text = text.trim();
    if text.is_empty() {
        return Err(FunFactError::EmptyResponse);
    }
    Ok(text.to_string())
}
