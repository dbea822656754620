//! Integration tests for Binj
//!
//! Tests are organized by component:
//! - tmdb_test: TMDB API client tests (request shape, cache, errors)
//! - session_test: Session file persistence and guard outcomes
//! - pages_test: Home, search and details controllers
//! - cli_test: CLI parsing and command handler exit codes
//! - ui_test: Rendered screens and key flows

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
