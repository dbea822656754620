//! CLI - Command Line Interface for Binj
//!
//! Every page the TUI shows is also reachable as a subcommand, with JSON
//! output for scripting.
//!
//! # Examples
//!
//! ```bash
//! # Start a (simulated) session
//! binj login --email jane@example.com --password secret1
//! binj subscribe premium
//!
//! # Browse
//! binj home
//! binj search "the batman" --json
//! binj info 414906 -t movie
//! binj trailer 94605 -t tv
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::api::TimeWindow;
use crate::models::MediaType;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network or API error
    NetworkError = 3,
    /// No session, or no plan selected
    NotLoggedIn = 4,
    /// Item not found / no results
    NotFound = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Binj - browse movies and series from your terminal
///
/// Run without arguments to launch the interactive TUI.
/// Use subcommands for scriptable access.
#[derive(Parser, Debug)]
#[command(
    name = "binj",
    version,
    about = "Terminal movie & series catalog backed by TMDB",
    long_about = "Browse trending and popular movies and series, search the \
                  catalog and read details, all from the terminal.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  binj                                Launch interactive TUI\n\
                  binj login -e me@example.com -p ******\n\
                  binj search \"dune\"                  Search the catalog\n\
                  binj info 438631 -t movie --json    Details as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open a local session (simulated, no credentials are checked)
    Login(LoginCmd),

    /// Choose a plan for the current session
    #[command(visible_alias = "sub")]
    Subscribe(SubscribeCmd),

    /// Delete the local session
    Logout,

    /// Show the current session
    Whoami,

    /// Home page: featured title and the three carousels
    Home,

    /// Popular movies or series
    #[command(visible_alias = "pop")]
    Popular(PopularCmd),

    /// Trending movies
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Search movies and series
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Details for a movie or series
    #[command(visible_alias = "i")]
    Info(TargetCmd),

    /// Titles similar to a movie or series
    Similar(TargetCmd),

    /// Trailer link for a movie or series
    Trailer(TargetCmd),
}

/// Open a simulated session
#[derive(Args, Debug)]
pub struct LoginCmd {
    /// Email address
    #[arg(long, short = 'e', required = true)]
    pub email: String,

    /// Password (6 characters minimum)
    #[arg(long, short = 'p', required = true)]
    pub password: String,
}

/// Select a plan
#[derive(Args, Debug)]
pub struct SubscribeCmd {
    /// Plan to select
    #[arg(value_enum)]
    pub plan: PlanChoice,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanChoice {
    Basic,
    Standard,
    Premium,
}

impl PlanChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanChoice::Basic => "basic",
            PlanChoice::Standard => "standard",
            PlanChoice::Premium => "premium",
        }
    }
}

/// Popular titles
#[derive(Args, Debug)]
pub struct PopularCmd {
    /// Series instead of movies
    #[arg(long)]
    pub tv: bool,

    /// Result page
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Trending movies
#[derive(Args, Debug)]
pub struct TrendingCmd {
    /// Time window for trending
    #[arg(long, short = 'w', value_enum, default_value = "day")]
    pub window: TrendingWindow,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// Time window for trending content
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    /// Today's trending
    #[default]
    Day,
    /// This week's trending
    Week,
}

impl From<TrendingWindow> for TimeWindow {
    fn from(window: TrendingWindow) -> Self {
        match window {
            TrendingWindow::Day => TimeWindow::Day,
            TrendingWindow::Week => TimeWindow::Week,
        }
    }
}

/// Search the catalog
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,
}

/// A movie or series addressed by TMDB id
#[derive(Args, Debug)]
pub struct TargetCmd {
    /// TMDB id
    #[arg(required = true)]
    pub id: u64,

    /// Media type
    #[arg(long = "type", short = 't', value_enum, default_value = "movie")]
    pub media_type: MediaTypeArg,
}

/// Media type argument
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaTypeArg {
    /// Movies
    #[default]
    Movie,
    /// Series
    Tv,
}

impl From<MediaTypeArg> for MediaType {
    fn from(arg: MediaTypeArg) -> Self {
        match arg {
            MediaTypeArg::Movie => MediaType::Movie,
            MediaTypeArg::Tv => MediaType::Tv,
        }
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero", default)]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Status OK response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusOk {
    pub status: &'static str,
}

impl Default for StatusOk {
    fn default() -> Self {
        Self { status: "ok" }
    }
}

impl fmt::Display for StatusOk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status)
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data: wrapped JSON, or its text rendering
    pub fn print<T: Serialize + fmt::Display>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", data);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Erreur: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
