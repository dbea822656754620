//! Tracing subscriber setup
//!
//! Filter comes from `BINJ_LOG` (e.g. `BINJ_LOG=binj=debug`), default `warn`.
//! The CLI logs to stderr. The TUI owns the terminal, so it logs to a file.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "BINJ_LOG";

const DEFAULT_FILTER: &str = "warn";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log to stderr. A second call is a no-op.
pub fn init_stderr() {
    let _ = fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to `path`, appending. Parent directories are created as needed.
pub fn init_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create log directory {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Could not open log file {}", path.display()))?;

    let _ = fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("binj.log");
        init_file(&path).unwrap();
        assert!(path.exists());
    }
}
