//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAZAAR_API_URL` - Backend API base URL (e.g., `https://api.example.com/v1/`)
//!
//! ## Optional
//! - `BAZAAR_DATA_DIR` - Directory for the persisted cart (default: `.bazaar`)
//! - `BAZAAR_ACCESS_TOKEN` - Session token used for wishlist calls

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use crate::token::AccessToken;

/// Default directory for persisted client state.
pub const DEFAULT_DATA_DIR: &str = ".bazaar";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client session configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API base URL
    pub api_url: Url,
    /// Directory holding the persisted cart
    pub data_dir: PathBuf,
    /// Session token, if the user is signed in
    pub access_token: Option<AccessToken>,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = parse_api_url(&get_required_env("BAZAAR_API_URL")?)?;
        let data_dir = Self::data_dir_from_env();
        let access_token = get_optional_env("BAZAAR_ACCESS_TOKEN").map(AccessToken::from);

        Ok(Self {
            api_url,
            data_dir,
            access_token,
        })
    }

    /// Data directory alone, for callers that never reach the backend.
    ///
    /// Reads `BAZAAR_DATA_DIR` (after `.env`), falling back to
    /// [`DEFAULT_DATA_DIR`].
    #[must_use]
    pub fn data_dir_from_env() -> PathBuf {
        let _ = dotenvy::dotenv();
        get_optional_env("BAZAAR_DATA_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from)
    }
}

/// Parse the API base URL, making sure relative joins stay under it.
fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar("BAZAAR_API_URL".to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "BAZAAR_API_URL".to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
