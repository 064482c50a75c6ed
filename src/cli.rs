//! Command-line interface parsing for portalscope
//!
//! Arguments are parsed with clap; the API endpoint, model and key can also
//! come from environment variables. [`StartupConfig::from_cli`] validates the
//! raw arguments into the configuration the application starts with.

use std::path::PathBuf;

use clap::Parser;
use reqwest::Url;
use thiserror::Error;

use crate::data::api::DEFAULT_API_BASE_URL;
use crate::data::fun_fact::DEFAULT_GEMINI_MODEL;
use crate::logging::default_log_path;

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// `--search` was given an empty or blank term
    #[error("Search term must not be empty")]
    EmptySearchTerm,

    /// The API URL is not an absolute http(s) URL
    #[error("Invalid API URL: '{0}'. Expected an absolute http(s) URL")]
    InvalidApiUrl(String),
}

/// portalscope - Explore Rick and Morty locations and their residents
#[derive(Parser, Debug)]
#[command(name = "portalscope")]
#[command(about = "Explore Rick and Morty locations and their residents")]
#[command(version)]
pub struct Cli {
    /// Search for this location right after startup
    ///
    /// Examples:
    ///   portalscope --search Earth
    ///   portalscope --search "Citadel of Ricks"
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Base URL of the Rick and Morty API
    #[arg(long, value_name = "URL", env = "PORTALSCOPE_API_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_url: String,

    /// Gemini model used for fun facts
    #[arg(long, value_name = "MODEL", env = "PORTALSCOPE_GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub gemini_model: String,

    /// Gemini API key; without one a fallback fun fact is shown
    #[arg(long, value_name = "KEY", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Where to write logs (defaults to the user cache directory)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Search to run once the UI is up
    pub initial_search: Option<String>,
    pub api_url: String,
    pub gemini_model: String,
    pub gemini_api_key: Option<String>,
    /// `None` disables logging
    pub log_file: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            initial_search: None,
            api_url: DEFAULT_API_BASE_URL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_key: None,
            log_file: default_log_path(),
        }
    }
}

/// Checks that `s` is an absolute http(s) URL
pub fn parse_api_url(s: &str) -> Result<String, CliError> {
    match Url::parse(s) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(s.trim_end_matches('/').to_string()),
        _ => Err(CliError::InvalidApiUrl(s.to_string())),
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the search term or API URL is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let initial_search = match &cli.search {
            None => None,
            Some(term) if term.trim().is_empty() => return Err(CliError::EmptySearchTerm),
            Some(term) => Some(term.trim().to_string()),
        };

        Ok(StartupConfig {
            initial_search,
            api_url: parse_api_url(&cli.api_url)?,
            gemini_model: cli.gemini_model.clone(),
            gemini_api_key: cli.gemini_api_key.clone(),
            log_file: cli.log_file.clone().or_else(default_log_path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_url_accepts_https() {
        assert_eq!(
            parse_api_url("https://rickandmortyapi.com/api/").unwrap(),
            "https://rickandmortyapi.com/api"
        );
        assert!(parse_api_url("http://localhost:8080").is_ok());
    }

    #[test]
    fn test_parse_api_url_rejects_garbage() {
        let err = parse_api_url("not a url").unwrap_err();
        assert!(err.to_string().contains("Invalid API URL"));
        assert!(err.to_string().contains("not a url"));
        assert!(parse_api_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert!(config.initial_search.is_none());
        assert_eq!(config.api_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_cli_parse_search() {
        let cli = Cli::parse_from(["portalscope", "--search", "Earth"]);
        assert_eq!(cli.search.as_deref(), Some("Earth"));
    }

    #[test]
    fn test_cli_parse_custom_api_url() {
        let cli = Cli::parse_from(["portalscope", "--api-url", "http://localhost:3000/api"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.api_url, "http://localhost:3000/api");
    }

    #[test]
    fn test_startup_config_trims_search() {
        let cli = Cli::parse_from(["portalscope", "--search", "  Citadel of Ricks "]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.initial_search.as_deref(), Some("Citadel of Ricks"));
    }

    #[test]
    fn test_startup_config_rejects_blank_search() {
        let cli = Cli::parse_from(["portalscope", "--search", "   "]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::EmptySearchTerm)
        ));
    }

    #[test]
    fn test_startup_config_explicit_log_file() {
        let cli = Cli::parse_from(["portalscope", "--log-file", "/tmp/ps.log"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/ps.log")));
    }
}
