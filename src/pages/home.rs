//! Home page: hero banner plus trending, popular movie and popular series
//! carousels.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

use super::{PageLoad, Redirect, LOAD_ERROR};
use crate::api::{RequestError, TimeWindow, TmdbClient};
use crate::format;
use crate::models::{MediaCard, MediaItem, MediaType, NavTarget, Page};
use crate::session::{Access, GatedPage, SessionContext, SessionRecord};

/// Cards per carousel
pub const CAROUSEL_LIMIT: usize = 20;

/// The hero is drawn from this many leading trending items
const HERO_POOL: usize = 5;

/// Hero overview length before the ellipsis
const HERO_OVERVIEW_LEN: usize = 150;

pub const EMPTY_CAROUSEL: &str = "Aucun contenu disponible";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "cards", rename_all = "snake_case")]
pub enum CarouselState {
    Cards(Vec<MediaCard>),
    Empty,
    Error,
}

impl CarouselState {
    fn from_page(page: &Page<MediaItem>) -> Self {
        if page.results.is_empty() {
            return CarouselState::Empty;
        }
        CarouselState::Cards(
            page.results
                .iter()
                .take(CAROUSEL_LIMIT)
                .map(MediaCard::from_item)
                .collect(),
        )
    }

    pub fn cards(&self) -> &[MediaCard] {
        match self {
            CarouselState::Cards(cards) => cards,
            _ => &[],
        }
    }

    /// Placeholder text for a carousel without cards
    pub fn message(&self) -> Option<&'static str> {
        match self {
            CarouselState::Cards(_) => None,
            CarouselState::Empty => Some(EMPTY_CAROUSEL),
            CarouselState::Error => Some(LOAD_ERROR),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Carousel {
    pub title: &'static str,
    pub state: CarouselState,
}

/// Featured title at the top of the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hero {
    pub title: String,
    pub overview: String,
    /// `None` when the item has no backdrop; the banner keeps its default
    pub backdrop: Option<String>,
    pub target: NavTarget,
}

impl Hero {
    pub fn from_item(item: &MediaItem) -> Self {
        Self {
            title: item.display_title().to_string(),
            overview: format::truncate(
                item.overview.as_deref().unwrap_or_default(),
                HERO_OVERVIEW_LEN,
            ),
            backdrop: item
                .backdrop_path
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(|p| format::backdrop_url(Some(p), format::BACKDROP_SIZE)),
            target: NavTarget::new(item.id, item.media_type.unwrap_or(MediaType::Movie)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeView {
    pub user: SessionRecord,
    pub hero: Option<Hero>,
    pub trending: Carousel,
    pub popular_movies: Carousel,
    pub popular_tv: Carousel,
}

impl HomeView {
    pub fn carousels(&self) -> [&Carousel; 3] {
        [&self.trending, &self.popular_movies, &self.popular_tv]
    }
}

impl fmt::Display for Carousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "── {} ──", self.title)?;
        match self.state.message() {
            Some(message) => writeln!(f, "  {}", message),
            None => {
                for card in self.state.cards() {
                    writeln!(f, "  {}  {}", card, format::format_rating(card.rating))?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for HomeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(hero) = &self.hero {
            writeln!(f, "★ {}", hero.title)?;
            if !hero.overview.is_empty() {
                writeln!(f, "  {}", hero.overview)?;
            }
            writeln!(f)?;
        }
        for carousel in self.carousels() {
            writeln!(f, "{}", carousel)?;
        }
        Ok(())
    }
}

/// Loads the home page
#[derive(Debug, Clone)]
pub struct HomeController {
    client: Arc<TmdbClient>,
    session: SessionContext,
}

impl HomeController {
    pub fn new(client: Arc<TmdbClient>, session: SessionContext) -> Self {
        Self { client, session }
    }

    /// Guard the session, then load every section
    pub async fn load(&self) -> PageLoad<HomeView> {
        let user = match self.session.guard(GatedPage::Home) {
            Access::Granted(user) => user,
            Access::RedirectToLogin => return PageLoad::Redirect(Redirect::Login),
            Access::RedirectToSubscription => {
                return PageLoad::Redirect(Redirect::Subscription)
            }
        };

        PageLoad::Ready(self.load_for(user).await)
    }

    /// Load every section for an already-checked user.
    ///
    /// The three lists are fetched concurrently and succeed or fail together:
    /// one failure puts all three carousels in the error state.
    pub async fn load_for(&self, user: SessionRecord) -> HomeView {
        match self.fetch_lists().await {
            Ok((trending, movies, tv)) => {
                let hero = pick_hero(&trending.results, seed()).map(Hero::from_item);
                HomeView {
                    user,
                    hero,
                    trending: carousel(TRENDING_TITLE, CarouselState::from_page(&trending)),
                    popular_movies: carousel(MOVIES_TITLE, CarouselState::from_page(&movies)),
                    popular_tv: carousel(TV_TITLE, CarouselState::from_page(&tv)),
                }
            }
            Err(e) => {
                warn!(error = %e, "home content failed to load");
                HomeView {
                    user,
                    hero: None,
                    trending: carousel(TRENDING_TITLE, CarouselState::Error),
                    popular_movies: carousel(MOVIES_TITLE, CarouselState::Error),
                    popular_tv: carousel(TV_TITLE, CarouselState::Error),
                }
            }
        }
    }

    async fn fetch_lists(
        &self,
    ) -> Result<(Page<MediaItem>, Page<MediaItem>, Page<MediaItem>), RequestError> {
        let lists = futures::try_join!(
            self.client.trending_movies(TimeWindow::Day),
            self.client.popular_movies(1),
            self.client.popular_tv(1),
        )?;
        info!(
            trending = lists.0.results.len(),
            movies = lists.1.results.len(),
            tv = lists.2.results.len(),
            "home content loaded"
        );
        Ok(lists)
    }
}

const TRENDING_TITLE: &str = "Tendances";
const MOVIES_TITLE: &str = "Films populaires";
const TV_TITLE: &str = "Séries populaires";

fn carousel(title: &'static str, state: CarouselState) -> Carousel {
    Carousel { title, state }
}

/// Pick the hero among the first few trending items
pub fn pick_hero(items: &[MediaItem], seed: u64) -> Option<&MediaItem> {
    let pool = items.len().min(HERO_POOL);
    if pool == 0 {
        return None;
    }
    items.get((seed % pool as u64) as usize)
}

fn seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0)
}
