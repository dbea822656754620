//! API client for the TMDB catalog
//!
//! - `tmdb`: request builder, convenience queries, trailer lookup
//! - `cache`: time-boxed response memoization

pub mod cache;
pub mod tmdb;

pub use cache::ResponseCache;
pub use tmdb::{RequestError, TimeWindow, TmdbClient};
