//! Page controllers
//!
//! Data-level controllers for the home, search and details pages. Each one is
//! built from an explicit client handle and session context and returns plain
//! view records; the TUI and CLI only render what comes out of here.
//!
//! - `home`: hero pick and the three carousels
//! - `search`: debounced multi-search with stale-result suppression
//! - `details`: detail labels, similar titles, trailer lookup

pub mod details;
pub mod home;
pub mod search;

pub use details::{DetailView, DetailsController, DetailsState, SimilarSection, TrailerState};
pub use home::{Carousel, CarouselState, Hero, HomeController, HomeView};
pub use search::{SearchController, SearchState, SearchTicket};

use crate::session::Access;

/// Message shown in a section whose data failed to load
pub const LOAD_ERROR: &str = "Erreur de chargement";

/// Where a gated page sends the user instead of rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Login,
    Subscription,
}

/// Result of entering a gated page
#[derive(Debug, Clone, PartialEq)]
pub enum PageLoad<T> {
    Ready(T),
    Redirect(Redirect),
}

impl<T> PageLoad<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            PageLoad::Ready(view) => Some(view),
            PageLoad::Redirect(_) => None,
        }
    }
}

impl Redirect {
    /// `None` when access is granted
    pub fn from_access(access: &Access) -> Option<Self> {
        match access {
            Access::Granted(_) => None,
            Access::RedirectToLogin => Some(Redirect::Login),
            Access::RedirectToSubscription => Some(Redirect::Subscription),
        }
    }
}
