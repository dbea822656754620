//! TMDB (The Movie Database) API client
//!
//! Catalog queries for movies and TV shows, memoized through a short-lived
//! [`ResponseCache`]. API docs: https://developer.themoviedb.org/docs

use anyhow::{Context, Result};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use super::cache::ResponseCache;
use crate::config::Config;
use crate::models::{MediaDetail, MediaItem, MediaType, Page, Video};

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Response language sent with every request
pub const DEFAULT_LANGUAGE: &str = "fr-FR";

/// Sub-resources appended to detail requests
const DETAIL_APPENDS: &str = "videos,credits,similar";

/// Errors surfaced by catalog requests. Never retried.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Erreur API: {0}")]
    Status(u16),

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RequestError {
    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status(code) => Some(*code),
            RequestError::Transport(e) => e.status().map(|s| s.as_u16()),
            RequestError::InvalidResponse(_) => None,
        }
    }
}

/// Window for trending lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TMDB API client
#[derive(Debug)]
pub struct TmdbClient {
    api_key: String,
    bearer_token: String,
    base_url: String,
    language: String,
    client: reqwest::Client,
    cache: ResponseCache,
}

impl TmdbClient {
    /// Create a new TMDB client with the given credentials
    pub fn new(api_key: impl Into<String>, bearer_token: impl Into<String>) -> Self {
        Self::with_base_url(api_key, bearer_token, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(
        api_key: impl Into<String>,
        bearer_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            bearer_token: bearer_token.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            client: reqwest::Client::new(),
            cache: ResponseCache::default(),
        }
    }

    /// Build a client from the application config
    pub fn from_config(config: &Config) -> Result<Self> {
        let creds = config.credentials()?;
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut client = Self::with_base_url(creds.api_key, creds.bearer_token, base_url)
            .with_cache_ttl(config.cache_ttl());
        if let Some(language) = &config.language {
            client.language = language.clone();
        }
        if let Some(timeout) = config.request_timeout() {
            client = client.with_timeout(timeout)?;
        }
        Ok(client)
    }

    /// Replace the freshness window (drops anything cached so far)
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = ResponseCache::new(ttl);
        self
    }

    /// Apply an outbound request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Could not build HTTP client")?;
        Ok(self)
    }

    /// Number of cached responses (stale ones included)
    pub fn cached_responses(&self) -> usize {
        self.cache.len()
    }

    /// Issue a GET for `path`, memoized for the freshness window.
    ///
    /// `api_key` and `language` are always attached; caller parameters only
    /// when their value is truthy. Only successful responses are cached.
    #[instrument(skip_all, fields(path = %path))]
    pub async fn request(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Arc<Value>, RequestError> {
        let key = ResponseCache::key(path, params);

        if let Some(hit) = self.cache.lookup(&key, Instant::now()) {
            debug!("cache hit");
            return Ok(hit);
        }

        let mut query: Vec<(&str, &str)> = vec![
            ("api_key", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ];
        query.extend(
            params
                .iter()
                .filter(|(_, value)| is_truthy(value))
                .map(|(name, value)| (*name, value.as_str())),
        );

        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "TMDB API request");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .bearer_auth(&self.bearer_token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "TMDB API error");
            return Err(RequestError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let data: Value = serde_json::from_str(&body)
            .map_err(|e| RequestError::InvalidResponse(format!("JSON parse error: {}", e)))?;

        let data = Arc::new(data);
        self.cache.store(key, Arc::clone(&data), Instant::now());
        Ok(data)
    }

    /// [`TmdbClient::request`] decoded into a typed response
    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, RequestError> {
        let value = self.request(path, params).await?;
        T::deserialize(value.as_ref())
            .map_err(|e| RequestError::InvalidResponse(format!("{}: {}", path, e)))
    }

    // -------------------------------------------------------------------------
    // Lists
    // -------------------------------------------------------------------------

    /// Popular movies
    pub async fn popular_movies(&self, page: u32) -> Result<Page<MediaItem>, RequestError> {
        self.fetch("/movie/popular", &[("page", page.to_string())])
            .await
    }

    /// Trending movies for the given window
    pub async fn trending_movies(
        &self,
        window: TimeWindow,
    ) -> Result<Page<MediaItem>, RequestError> {
        self.fetch(&format!("/trending/movie/{}", window), &[]).await
    }

    /// Popular TV shows
    pub async fn popular_tv(&self, page: u32) -> Result<Page<MediaItem>, RequestError> {
        self.fetch("/tv/popular", &[("page", page.to_string())]).await
    }

    /// Search movies, shows and people at once.
    ///
    /// A blank query returns an empty page without touching the network.
    pub async fn search_multi(
        &self,
        query: &str,
        page: u32,
    ) -> Result<Page<MediaItem>, RequestError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Page::empty());
        }

        self.fetch(
            "/search/multi",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    // -------------------------------------------------------------------------
    // Details
    // -------------------------------------------------------------------------

    /// Movie details with videos, credits and similar titles
    pub async fn movie_details(&self, id: u64) -> Result<MediaDetail, RequestError> {
        self.fetch(
            &format!("/movie/{}", id),
            &[("append_to_response", DETAIL_APPENDS.to_string())],
        )
        .await
    }

    /// TV show details with videos, credits and similar titles
    pub async fn tv_details(&self, id: u64) -> Result<MediaDetail, RequestError> {
        self.fetch(
            &format!("/tv/{}", id),
            &[("append_to_response", DETAIL_APPENDS.to_string())],
        )
        .await
    }

    /// Details for either kind; anything but `tv` is looked up as a movie
    pub async fn details(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> Result<MediaDetail, RequestError> {
        match media_type {
            MediaType::Tv => self.tv_details(id).await,
            _ => self.movie_details(id).await,
        }
    }

    pub async fn similar_movies(&self, id: u64) -> Result<Page<MediaItem>, RequestError> {
        self.fetch(&format!("/movie/{}/similar", id), &[]).await
    }

    pub async fn similar_tv(&self, id: u64) -> Result<Page<MediaItem>, RequestError> {
        self.fetch(&format!("/tv/{}/similar", id), &[]).await
    }

    pub async fn similar(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> Result<Page<MediaItem>, RequestError> {
        match media_type {
            MediaType::Tv => self.similar_tv(id).await,
            _ => self.similar_movies(id).await,
        }
    }

    /// Videos attached to a movie or show
    pub async fn videos(
        &self,
        media_type: MediaType,
        id: u64,
    ) -> Result<Vec<Video>, RequestError> {
        let segment = match media_type {
            MediaType::Tv => "tv",
            _ => "movie",
        };
        let response: VideosResponse = self
            .fetch(&format!("/{}/{}/videos", segment, id), &[])
            .await?;
        Ok(response.results)
    }

    /// Best trailer for a title, if any.
    ///
    /// A failed lookup is logged and reported as "no trailer".
    pub async fn trailer(&self, media_type: MediaType, id: u64) -> Option<Video> {
        match self.videos(media_type, id).await {
            Ok(videos) => pick_trailer(&videos).cloned(),
            Err(e) => {
                warn!(error = %e, id, "video lookup failed");
                None
            }
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    results: Vec<Video>,
}

/// Caller parameters are attached only when non-empty and non-zero
fn is_truthy(value: &str) -> bool {
    !value.is_empty() && value != "0"
}

/// First YouTube trailer or teaser, else the first YouTube video
pub fn pick_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.is_youtube() && v.is_trailer_or_teaser())
        .or_else(|| videos.iter().find(|v| v.is_youtube()))
}
