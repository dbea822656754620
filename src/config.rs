//! Configuration management for Binj
//!
//! Handles config file loading and TMDB credential lookup.
//! Config is stored at ~/.config/binj/config.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::cache::DEFAULT_TTL;

/// Environment variable holding the TMDB v3 API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Environment variable holding the TMDB read-access (bearer) token
pub const BEARER_TOKEN_ENV: &str = "TMDB_BEARER_TOKEN";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    /// TMDB v3 API key
    pub tmdb_api_key: Option<String>,
    /// TMDB bearer token (falls back to the API key)
    pub tmdb_bearer_token: Option<String>,
    /// API root, e.g. https://api.themoviedb.org/3
    pub base_url: Option<String>,
    /// Response language (default fr-FR)
    pub language: Option<String>,
    /// Freshness window for cached responses, in seconds
    pub cache_ttl_secs: Option<u64>,
    /// Outbound request timeout; unset means the transport default
    pub request_timeout_secs: Option<u64>,
    /// Where the local session record lives
    pub session_path: Option<PathBuf>,
}

/// Resolved TMDB credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub bearer_token: String,
}

impl Config {
    /// Get config file path (~/.config/binj/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("binj").join("config.toml"))
    }

    /// Load config from the default file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit file. Unlike [`Config::load`], a missing
    /// or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Get TMDB credentials with fallback chain:
    /// 1. Environment variables TMDB_API_KEY / TMDB_BEARER_TOKEN
    /// 2. Values from the config file
    /// 3. The bearer token defaults to the API key
    pub fn credentials(&self) -> Result<Credentials> {
        self.resolve_credentials(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(BEARER_TOKEN_ENV).ok(),
        )
    }

    fn resolve_credentials(
        &self,
        env_key: Option<String>,
        env_token: Option<String>,
    ) -> Result<Credentials> {
        let api_key = env_key
            .filter(|k| !k.is_empty())
            .or_else(|| self.tmdb_api_key.clone().filter(|k| !k.is_empty()))
            .with_context(|| {
                format!(
                    "TMDB API key not configured: set {} or tmdb_api_key in {}",
                    API_KEY_ENV,
                    Self::path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "config.toml".to_string())
                )
            })?;

        let bearer_token = env_token
            .filter(|t| !t.is_empty())
            .or_else(|| self.tmdb_bearer_token.clone().filter(|t| !t.is_empty()))
            .unwrap_or_else(|| api_key.clone());

        Ok(Credentials {
            api_key,
            bearer_token,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Session record location (~/.local/share/binj/binj_user.json)
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session_path.clone().or_else(|| {
            dirs::data_dir().map(|p| p.join("binj").join(crate::session::SESSION_FILE))
        })
    }

    /// Log file used in TUI mode (~/.cache/binj/binj.log)
    pub fn log_path() -> Option<PathBuf> {
        dirs::cache_dir().map(|p| p.join("binj").join("binj.log"))
    }
}
