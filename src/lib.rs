//! Binj - movie & series catalog in the terminal
//!
//! Browse trending and popular titles from TMDB, search the catalog and read
//! details, behind a simulated local session.
//!
//! # Modules
//!
//! - `models` - TMDB payloads, normalized cards, navigation targets
//! - `format` - Display labels (dates, runtimes, currency, image URLs)
//! - `api` - TMDB client with response cache
//! - `session` - Local session record and page guard
//! - `pages` - Home, search and details controllers
//! - `app` - TUI state and navigation
//! - `ui` - TUI components
//! - `cli` / `commands` - Scriptable command line
//! - `config` / `logging` - Ambient setup

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod format;
pub mod logging;
pub mod models;
pub mod pages;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use models::{
    Credits, Genre, MediaCard, MediaDetail, MediaItem, MediaType, NavTarget, Page, Video,
};

pub use api::{RequestError, TimeWindow, TmdbClient};
pub use app::{App, AppState};
pub use config::Config;
pub use pages::{DetailsController, HomeController, PageLoad, Redirect, SearchController};
pub use session::{SessionContext, SessionRecord};
