//! Data structures and types for Binj
//!
//! Contains the shared models used across the application:
//! - **Catalog**: raw TMDB media items, pages and details (read-only, external shape)
//! - **Cards**: the flat record the presentation layer renders
//! - **Navigation**: the `id` + `type` pair that addresses a detail page

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::format;

// =============================================================================
// Media Type
// =============================================================================

/// Media type tag carried by TMDB items (`media_type` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    Person,
    /// Any tag TMDB may add later
    #[serde(other)]
    Other,
}

impl MediaType {
    /// Path segment used by TMDB endpoints and by the navigation contract
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Person => "person",
            MediaType::Other => "other",
        }
    }

    /// Only movies and series have detail pages
    pub fn is_browsable(&self) -> bool {
        matches!(self, MediaType::Movie | MediaType::Tv)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Film"),
            MediaType::Tv => write!(f, "Série"),
            MediaType::Person => write!(f, "Personne"),
            MediaType::Other => write!(f, "Autre"),
        }
    }
}

// =============================================================================
// Raw Catalog Models (TMDB)
// =============================================================================

/// A movie or TV item as TMDB returns it in lists.
///
/// Movies use `title`/`release_date`, series use `name`/`first_air_date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<MediaType>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

impl MediaItem {
    /// Movie title or series name
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Explicit tag if present, else inferred from which title field is set
    pub fn resolved_media_type(&self) -> MediaType {
        match self.media_type {
            Some(tag) => tag,
            None if self.title.is_some() => MediaType::Movie,
            None => MediaType::Tv,
        }
    }

    /// Whether the item carries a non-empty poster path
    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Paginated TMDB list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    /// Result set returned without touching the network
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Genre entry in a detail response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub id: u64,
    pub name: String,
}

/// Video attached to a movie or series (trailers, teasers, clips)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Video {
    pub fn is_youtube(&self) -> bool {
        self.site == "YouTube"
    }

    pub fn is_trailer_or_teaser(&self) -> bool {
        self.kind == "Trailer" || self.kind == "Teaser"
    }

    /// Embeddable player URL
    pub fn youtube_url(&self) -> String {
        format!(
            "https://www.youtube.com/embed/{}?autoplay=1&rel=0&modestbranding=1",
            urlencoding::encode(&self.key)
        )
    }
}

impl fmt::Display for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} • {})", self.name, self.kind, self.site)
    }
}

/// Cast member from `credits.cast`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Crew member from `credits.crew`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

/// `credits` sub-resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// Movie or series detail, including the appended `videos`, `credits` and
/// `similar` sub-resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDetail {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub budget: Option<u64>,
    #[serde(default)]
    pub revenue: Option<u64>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub videos: Option<Page<Video>>,
    #[serde(default)]
    pub credits: Option<Credits>,
    #[serde(default)]
    pub similar: Option<Page<MediaItem>>,
}

impl MediaDetail {
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Movie release date or series first air date
    pub fn display_date(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
    }
}

// =============================================================================
// Cards (normalized for rendering)
// =============================================================================

/// Flat record the rendering layer consumes for carousels and result grids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaCard {
    pub id: u64,
    pub title: String,
    pub poster: String,
    pub release_date: Option<String>,
    pub rating: Option<f64>,
    pub overview: Option<String>,
    pub media_type: MediaType,
}

impl MediaCard {
    /// Normalize a raw item. Total: never fails, whatever fields are missing.
    pub fn from_item(item: &MediaItem) -> Self {
        Self {
            id: item.id,
            title: item.display_title().to_string(),
            poster: format::image_url(item.poster_path.as_deref(), format::POSTER_SIZE),
            release_date: item
                .release_date
                .clone()
                .or_else(|| item.first_air_date.clone()),
            rating: item.vote_average,
            overview: item.overview.clone(),
            media_type: item.resolved_media_type(),
        }
    }

    /// Where activating this card navigates to
    pub fn target(&self) -> NavTarget {
        NavTarget::new(self.id, self.media_type)
    }

    /// Release year, if the date carries one
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }

    /// Accessible label, e.g. "Dune - Note: 7.8/10"
    pub fn label(&self) -> String {
        let rating = self
            .rating
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        format!("{} - Note: {}/10", self.title, rating)
    }
}

impl From<&MediaItem> for MediaCard {
    fn from(item: &MediaItem) -> Self {
        MediaCard::from_item(item)
    }
}

impl fmt::Display for MediaCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_type)
    }
}

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}

// =============================================================================
// Navigation
// =============================================================================

/// Detail page address: an item id and a media-type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTarget {
    pub id: u64,
    pub media_type: MediaType,
}

impl NavTarget {
    pub fn new(id: u64, media_type: MediaType) -> Self {
        Self { id, media_type }
    }

    /// Render as the `id=..&type=..` query string
    pub fn to_query(&self) -> String {
        format!("id={}&type={}", self.id, self.media_type.as_str())
    }

    /// Parse `id=..&type=..`.
    ///
    /// `type` defaults to `movie`; anything other than `tv` is a movie.
    /// Returns `None` when `id` is absent or not numeric.
    pub fn from_query(query: &str) -> Option<Self> {
        let query = query.trim_start_matches('?');
        let mut id = None;
        let mut media_type = MediaType::Movie;

        for pair in query.split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            match key {
                "id" => id = value.parse::<u64>().ok(),
                "type" if value == "tv" => media_type = MediaType::Tv,
                _ => {}
            }
        }

        id.map(|id| Self::new(id, media_type))
    }
}

impl fmt::Display for NavTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query())
    }
}
