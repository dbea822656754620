//! Binj - movie & series catalog in the terminal
//!
//! Browse trending and popular titles, search TMDB and read details,
//! behind a simulated local session.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! binj
//!
//! # CLI mode (for automation)
//! binj login -e me@example.com -p secret1
//! binj subscribe premium
//! binj search "blade runner" --json
//! binj info 1399 --type tv
//! ```

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{info, warn};

use binj::app::{login_error_message, Action, App, AppEvent};
use binj::cli::{Cli, Command, ExitCode, Output};
use binj::commands::{self, Services};
use binj::config::Config;
use binj::pages::{Redirect, SearchController};
use binj::session::{GatedPage, SessionContext, SESSION_FILE};
use binj::{logging, ui, TmdbClient};

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    let session = SessionContext::file(
        config
            .session_path()
            .unwrap_or_else(|| SESSION_FILE.into()),
    );

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        logging::init_stderr();
        let exit_code = run_cli(cli, &config, session).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        if let Some(path) = Config::log_path() {
            logging::init_file(&path)?;
        }
        let client = TmdbClient::from_config(&config)?;
        run_tui(Services::new(Arc::new(client), session)).await
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli, config: &Config, session: SessionContext) -> ExitCode {
    let output = Output::new(&cli);

    let Some(command) = cli.command else {
        // Handled by the is_cli_mode check
        return ExitCode::Success;
    };

    // Session commands work without TMDB credentials
    let command = match command {
        Command::Login(cmd) => return commands::login_cmd(&session, cmd, &output),
        Command::Subscribe(cmd) => return commands::subscribe_cmd(&session, cmd, &output),
        Command::Logout => return commands::logout_cmd(&session, &output),
        Command::Whoami => return commands::whoami_cmd(&session, &output),
        catalog => catalog,
    };

    let client = match TmdbClient::from_config(config) {
        Ok(client) => Arc::new(client),
        Err(e) => return output.error(format!("{:#}", e), ExitCode::Error),
    };
    let services = Services::new(client, session);

    match command {
        Command::Home => commands::home_cmd(&services.home(), &output).await,
        Command::Popular(cmd) => {
            commands::popular_cmd(&services.client, &services.session, cmd, &output).await
        }
        Command::Trending(cmd) => {
            commands::trending_cmd(&services.client, &services.session, cmd, &output).await
        }
        Command::Search(cmd) => commands::search_cmd(&services.search(), cmd, &output).await,
        Command::Info(cmd) => commands::info_cmd(&services.details(), cmd, &output).await,
        Command::Similar(cmd) => {
            commands::similar_cmd(&services.details(), &services.session, cmd, &output).await
        }
        Command::Trailer(cmd) => {
            commands::trailer_cmd(&services.details(), &services.session, cmd, &output).await
        }
        Command::Login(_) | Command::Subscribe(_) | Command::Logout | Command::Whoami => {
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run interactive TUI
async fn run_tui(services: Services) -> Result<()> {
    let mut terminal = init_terminal().context("Could not initialize terminal")?;

    let (tx, rx) = mpsc::unbounded_channel();
    let runner = Runner {
        search: services.search(),
        services,
        tx,
    };

    let mut app = App::new();
    let access = runner.services.session.guard(GatedPage::Home);
    let actions = app.start(
        runner.services.session.current(),
        Redirect::from_access(&access),
    );
    for action in actions {
        runner.dispatch(action);
    }
    info!(state = ?app.state, "tui started");

    let result = run_event_loop(&mut terminal, &mut app, &runner, rx).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, applies finished work, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    runner: &Runner,
    mut rx: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key) {
                        runner.dispatch(action);
                    }
                }
            }
        }

        while let Ok(event) = rx.try_recv() {
            for action in app.apply(event) {
                runner.dispatch(action);
            }
        }

        // Let spawned tasks make progress between frames
        tokio::task::yield_now().await;
    }

    Ok(())
}

/// Runs [`Action`]s off the UI loop and reports back over the channel
struct Runner {
    services: Services,
    /// Shared so every keystroke supersedes the previous search
    search: SearchController,
    tx: UnboundedSender<AppEvent>,
}

impl Runner {
    fn dispatch(&self, action: Action) {
        let session = &self.services.session;
        let tx = self.tx.clone();

        match action {
            Action::Login { email, password } => {
                let result = session
                    .login(&email, &password)
                    .map_err(|e| login_error_message(&e));
                send(&tx, AppEvent::LoggedIn(result));
            }
            Action::Subscribe(plan) => {
                let result = session.subscribe(plan).map_err(|e| e.to_string());
                send(&tx, AppEvent::Subscribed(result));
            }
            Action::Logout => {
                if let Err(e) = session.logout() {
                    warn!(error = %e, "logout failed");
                }
                send(&tx, AppEvent::LoggedOut);
            }
            Action::LoadHome => {
                let home = self.services.home();
                tokio::spawn(async move {
                    send(&tx, AppEvent::Home(home.load().await));
                });
            }
            Action::Search(query) => {
                let search = self.search.clone();
                let ticket = search.issue(&query);
                tokio::spawn(async move {
                    send(&tx, AppEvent::Search(search.run(ticket).await));
                });
            }
            Action::SubmitSearch(query) => {
                let search = self.search.clone();
                let ticket = search.issue(&query);
                tokio::spawn(async move {
                    send(&tx, AppEvent::Search(search.run_now(ticket).await));
                });
            }
            Action::OpenDetail(target) => {
                let details = self.services.details();
                tokio::spawn(async move {
                    send(&tx, AppEvent::Detail(details.load(&target.to_query()).await));
                });
            }
            Action::Trailer(target) => {
                let details = self.services.details();
                tokio::spawn(async move {
                    send(&tx, AppEvent::Trailer(details.trailer(target).await));
                });
            }
        }
    }
}

fn send(tx: &UnboundedSender<AppEvent>, event: AppEvent) {
    if tx.send(event).is_err() {
        warn!("event loop closed, dropping result");
    }
}
