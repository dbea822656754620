//! Details page for a single movie or series

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use super::{PageLoad, Redirect, LOAD_ERROR};
use crate::api::TmdbClient;
use crate::format;
use crate::models::{MediaCard, MediaDetail, MediaType, NavTarget, Video};
use crate::session::{GatedPage, SessionContext};

/// Similar titles shown under the details
pub const SIMILAR_LIMIT: usize = 10;

/// Cast names shown in the info block
const CAST_LIMIT: usize = 5;

pub const NOT_FOUND: &str = "Élément non trouvé";
pub const DETAILS_ERROR: &str = "Erreur lors du chargement des détails";
pub const NO_SIMILAR: &str = "Aucun contenu similaire trouvé";
pub const NO_TRAILER: &str = "Aucune bande-annonce disponible pour ce contenu.";
const NO_RUNTIME: &str = "Durée non disponible";
const NO_OVERVIEW: &str = "Aucune description disponible.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "cards", rename_all = "snake_case")]
pub enum SimilarSection {
    Cards(Vec<MediaCard>),
    Empty,
    /// Only this section failed; the rest of the page stays
    Error,
}

impl SimilarSection {
    pub fn cards(&self) -> &[MediaCard] {
        match self {
            SimilarSection::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            SimilarSection::Cards(_) => None,
            SimilarSection::Empty => Some(NO_SIMILAR),
            SimilarSection::Error => Some(LOAD_ERROR),
        }
    }
}

/// Flat, pre-formatted labels for the details page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub target: NavTarget,
    pub title: String,
    pub backdrop: String,
    pub poster: String,
    pub date: String,
    pub rating: String,
    pub runtime: String,
    pub genres: String,
    pub language: String,
    /// Budget and revenue for movies, seasons and episodes for series
    pub facts: [(&'static str, String); 2],
    pub overview: String,
    pub cast: Vec<String>,
    pub similar: SimilarSection,
}

impl DetailView {
    /// Format a detail response. The similar section starts empty.
    pub fn from_detail(detail: &MediaDetail, media_type: MediaType) -> Self {
        let is_tv = media_type == MediaType::Tv;

        let runtime = match (is_tv, detail.runtime) {
            (false, Some(m)) if m > 0 => format::format_runtime(Some(m)),
            (true, _) => format::format_episode_runtime(&detail.episode_run_time)
                .unwrap_or_else(|| NO_RUNTIME.to_string()),
            _ => NO_RUNTIME.to_string(),
        };

        let genres = if detail.genres.is_empty() {
            format::NOT_SPECIFIED.to_string()
        } else {
            detail
                .genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };

        let facts = if is_tv {
            [
                ("Saisons", format::format_seasons(detail.number_of_seasons)),
                ("Épisodes", format::format_episodes(detail.number_of_episodes)),
            ]
        } else {
            [
                ("Budget", format::format_currency(detail.budget)),
                ("Recettes", format::format_currency(detail.revenue)),
            ]
        };

        let overview = detail
            .overview
            .as_deref()
            .filter(|o| !o.is_empty())
            .unwrap_or(NO_OVERVIEW)
            .to_string();

        let cast = detail
            .credits
            .as_ref()
            .map(|c| {
                c.cast
                    .iter()
                    .take(CAST_LIMIT)
                    .map(|m| m.name.clone())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            target: NavTarget::new(detail.id, media_type),
            title: detail.display_title().to_string(),
            backdrop: format::backdrop_url(detail.backdrop_path.as_deref(), format::BACKDROP_SIZE),
            poster: format::image_url(detail.poster_path.as_deref(), format::POSTER_SIZE),
            date: format::format_date(detail.display_date()),
            rating: format::format_rating(detail.vote_average),
            runtime,
            genres,
            language: format::language_name(detail.original_language.as_deref()),
            facts,
            overview,
            cast,
            similar: SimilarSection::Empty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "details", rename_all = "snake_case")]
pub enum DetailsState {
    /// No usable id in the navigation target
    NotFound,
    Failed,
    Loaded(Box<DetailView>),
}

impl DetailsState {
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            DetailsState::NotFound => Some(NOT_FOUND),
            DetailsState::Failed => Some(DETAILS_ERROR),
            DetailsState::Loaded(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrailerState {
    Available { name: String, url: String },
    Unavailable,
}

impl TrailerState {
    fn from_video(video: Option<Video>) -> Self {
        match video {
            Some(v) => TrailerState::Available {
                url: v.youtube_url(),
                name: v.name,
            },
            None => TrailerState::Unavailable,
        }
    }

    pub fn message(&self) -> Option<&'static str> {
        match self {
            TrailerState::Available { .. } => None,
            TrailerState::Unavailable => Some(NO_TRAILER),
        }
    }
}

impl fmt::Display for SimilarSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => writeln!(f, "{}", message),
            None => {
                for card in self.cards() {
                    writeln!(f, "  {}  {}", card, format::format_rating(card.rating))?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for DetailView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}  •  {}  •  {}", self.date, self.rating, self.runtime)?;
        writeln!(f)?;
        writeln!(f, "Genres: {}", self.genres)?;
        writeln!(f, "Langue originale: {}", self.language)?;
        for (label, value) in &self.facts {
            writeln!(f, "{}: {}", label, value)?;
        }
        if !self.cast.is_empty() {
            writeln!(f, "Distribution: {}", self.cast.join(", "))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", self.overview)?;
        writeln!(f)?;
        writeln!(f, "── Titres similaires ──")?;
        write!(f, "{}", self.similar)
    }
}

impl fmt::Display for TrailerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrailerState::Available { name, url } => write!(f, "{}\n{}", name, url),
            TrailerState::Unavailable => write!(f, "{}", NO_TRAILER),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DetailsController {
    client: Arc<TmdbClient>,
    session: SessionContext,
}

impl DetailsController {
    pub fn new(client: Arc<TmdbClient>, session: SessionContext) -> Self {
        Self { client, session }
    }

    /// Enter the page from its `id=..&type=..` query string
    pub async fn load(&self, query: &str) -> PageLoad<DetailsState> {
        if let Some(redirect) = Redirect::from_access(&self.session.guard(GatedPage::Details)) {
            return PageLoad::Redirect(redirect);
        }

        match NavTarget::from_query(query) {
            Some(target) => PageLoad::Ready(self.load_target(target).await),
            None => {
                warn!(query, "details page without a valid id");
                PageLoad::Ready(DetailsState::NotFound)
            }
        }
    }

    /// Load details then similar titles for a known target
    pub async fn load_target(&self, target: NavTarget) -> DetailsState {
        let detail = match self.client.details(target.media_type, target.id).await {
            Ok(detail) => detail,
            Err(e) => {
                warn!(error = %e, %target, "details failed to load");
                return DetailsState::Failed;
            }
        };

        let mut view = DetailView::from_detail(&detail, target.media_type);
        view.similar = self.similar(target).await;
        info!(%target, title = %view.title, "details loaded");
        DetailsState::Loaded(Box::new(view))
    }

    /// Up to ten similar titles; a failure only affects this section
    pub async fn similar(&self, target: NavTarget) -> SimilarSection {
        match self.client.similar(target.media_type, target.id).await {
            Ok(page) if page.results.is_empty() => SimilarSection::Empty,
            Ok(page) => SimilarSection::Cards(
                page.results
                    .iter()
                    .take(SIMILAR_LIMIT)
                    .map(MediaCard::from_item)
                    .collect(),
            ),
            Err(e) => {
                warn!(error = %e, %target, "similar titles failed to load");
                SimilarSection::Error
            }
        }
    }

    /// Trailer lookup, on demand
    pub async fn trailer(&self, target: NavTarget) -> TrailerState {
        TrailerState::from_video(self.client.trailer(target.media_type, target.id).await)
    }
}
