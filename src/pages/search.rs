//! Live search
//!
//! Every keystroke issues a [`SearchTicket`] stamped with the next generation.
//! A ticket waits out the debounce delay, then runs only if no newer ticket
//! was issued meanwhile; its result is likewise dropped if a newer ticket
//! appeared while the request was in flight. In-flight requests are never
//! aborted, only ignored.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{PageLoad, Redirect};
use crate::api::TmdbClient;
use crate::format;
use crate::models::{MediaCard, MediaItem, Page};
use crate::session::{GatedPage, SessionContext};

/// Delay between the last keystroke and the request
pub const DEBOUNCE: Duration = Duration::from_millis(300);

pub const PROMPT: &str = "Tapez quelque chose pour commencer votre recherche";
pub const SEARCH_ERROR: &str = "Erreur de recherche";

/// One search invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SearchState {
    /// Empty query: nothing searched
    Cleared,
    Results {
        query: String,
        cards: Vec<MediaCard>,
    },
    Error,
}

impl SearchState {
    /// Title line above the results
    pub fn headline(&self) -> String {
        match self {
            SearchState::Cleared => PROMPT.to_string(),
            SearchState::Results { cards, .. } => format::results_headline(cards.len()),
            SearchState::Error => SEARCH_ERROR.to_string(),
        }
    }

    pub fn cards(&self) -> &[MediaCard] {
        match self {
            SearchState::Results { cards, .. } => cards,
            _ => &[],
        }
    }
}

impl fmt::Display for SearchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.headline())?;
        for card in self.cards() {
            writeln!(f, "  {}  {}", card, format::format_rating(card.rating))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SearchController {
    client: Arc<TmdbClient>,
    session: SessionContext,
    generation: Arc<AtomicU64>,
}

impl SearchController {
    pub fn new(client: Arc<TmdbClient>, session: SessionContext) -> Self {
        Self {
            client,
            session,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Enter the page: redirect if the session does not allow it
    pub fn open(&self) -> PageLoad<SearchState> {
        match Redirect::from_access(&self.session.guard(GatedPage::Search)) {
            Some(redirect) => PageLoad::Redirect(redirect),
            None => PageLoad::Ready(SearchState::Cleared),
        }
    }

    /// Stamp a new invocation. Supersedes every earlier ticket.
    pub fn issue(&self, query: &str) -> SearchTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        SearchTicket {
            generation,
            query: query.trim().to_string(),
        }
    }

    /// Whether `ticket` is still the latest invocation
    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    /// Debounced search: wait, then run if still current.
    ///
    /// `None` means the ticket was superseded and its outcome must not be shown.
    pub async fn run(&self, ticket: SearchTicket) -> Option<SearchState> {
        tokio::time::sleep(DEBOUNCE).await;
        if !self.is_current(&ticket) {
            debug!(generation = ticket.generation, "search superseded before request");
            return None;
        }
        self.run_now(ticket).await
    }

    /// Search without the debounce delay (explicit submit)
    pub async fn run_now(&self, ticket: SearchTicket) -> Option<SearchState> {
        if ticket.query.is_empty() {
            return Some(SearchState::Cleared);
        }

        let outcome = self.client.search_multi(&ticket.query, 1).await;

        if !self.is_current(&ticket) {
            debug!(generation = ticket.generation, "dropping stale search result");
            return None;
        }

        Some(match outcome {
            Ok(page) => SearchState::Results {
                cards: browsable_cards(&page),
                query: ticket.query,
            },
            Err(e) => {
                warn!(error = %e, query = %ticket.query, "search failed");
                SearchState::Error
            }
        })
    }
}

/// Keep movies and series that have a poster
pub fn browsable_cards(page: &Page<MediaItem>) -> Vec<MediaCard> {
    page.results
        .iter()
        .filter(|item| item.media_type.is_some_and(|t| t.is_browsable()) && item.has_poster())
        .map(MediaCard::from_item)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;

    fn controller() -> SearchController {
        SearchController::new(
            Arc::new(TmdbClient::with_base_url("k", "t", "http://127.0.0.1:9")),
            SessionContext::memory(),
        )
    }

    fn item(id: u64, media_type: MediaType, poster: Option<&str>) -> MediaItem {
        MediaItem {
            id,
            media_type: Some(media_type),
            title: Some(format!("Item {}", id)),
            poster_path: poster.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_browsable_cards_filter() {
        let page = Page {
            results: vec![
                item(1, MediaType::Movie, Some("/a.jpg")),
                item(2, MediaType::Tv, Some("/b.jpg")),
                item(3, MediaType::Person, Some("/c.jpg")),
                item(4, MediaType::Movie, None),
                item(5, MediaType::Other, Some("/e.jpg")),
            ],
            ..Page::empty()
        };
        let cards = browsable_cards(&page);
        let ids: Vec<u64> = cards.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_untagged_items_are_dropped() {
        let mut untagged = item(1, MediaType::Movie, Some("/a.jpg"));
        untagged.media_type = None;
        let page = Page {
            results: vec![untagged],
            ..Page::empty()
        };
        assert!(browsable_cards(&page).is_empty());
    }

    #[test]
    fn test_generations_supersede() {
        let search = controller();
        let first = search.issue("bat");
        assert!(search.is_current(&first));

        let second = search.issue("  batman ");
        assert_eq!(second.query, "batman");
        assert!(second.generation > first.generation);
        assert!(!search.is_current(&first));
        assert!(search.is_current(&second));
    }

    #[test]
    fn test_clones_share_generation() {
        let search = controller();
        let clone = search.clone();
        let ticket = search.issue("a");
        clone.issue("ab");
        assert!(!search.is_current(&ticket));
    }

    #[tokio::test]
    async fn test_superseded_ticket_is_dropped_without_request() {
        let search = controller();
        let stale = search.issue("bat");
        search.issue("batman");
        assert_eq!(search.run(stale).await, None);
    }

    #[tokio::test]
    async fn test_empty_query_clears() {
        let search = controller();
        let ticket = search.issue("   ");
        assert_eq!(search.run_now(ticket).await, Some(SearchState::Cleared));
    }

    #[test]
    fn test_headlines() {
        assert_eq!(SearchState::Cleared.headline(), PROMPT);
        assert_eq!(SearchState::Error.headline(), "Erreur de recherche");
        let results = SearchState::Results {
            query: "x".to_string(),
            cards: Vec::new(),
        };
        assert_eq!(results.headline(), "Aucun résultat trouvé");
    }

    #[test]
    fn test_open_requires_session() {
        assert_eq!(
            controller().open(),
            PageLoad::Redirect(Redirect::Login)
        );
    }
}
