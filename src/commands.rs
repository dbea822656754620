//! CLI Command Handlers
//!
//! Each handler takes the parsed command, the services it needs and the
//! Output, and returns an ExitCode. Catalog commands go through the same page
//! controllers (and session guard) as the TUI.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::api::{RequestError, TimeWindow, TmdbClient};
use crate::cli::{
    ExitCode, LoginCmd, Output, PopularCmd, SearchCmd, StatusOk, SubscribeCmd, TargetCmd,
    TrendingCmd,
};
use crate::format;
use crate::models::{MediaCard, MediaItem, NavTarget, Page};
use crate::pages::details::{DETAILS_ERROR, NOT_FOUND, NO_SIMILAR, NO_TRAILER};
use crate::pages::search::{PROMPT, SEARCH_ERROR};
use crate::pages::{
    CarouselState, DetailsController, DetailsState, HomeController, PageLoad, Redirect,
    SearchController, SearchState, SimilarSection, TrailerState, LOAD_ERROR,
};
use crate::session::{GatedPage, LoginFailure, SessionContext, SessionRecord};

// =============================================================================
// Text Output Types
// =============================================================================

/// A titled list of cards (popular, trending)
#[derive(Debug, Serialize)]
pub struct CardList {
    pub title: String,
    pub cards: Vec<MediaCard>,
}

impl CardList {
    fn from_page(title: impl Into<String>, page: &Page<MediaItem>, limit: usize) -> Self {
        Self {
            title: title.into(),
            cards: page
                .results
                .iter()
                .take(limit)
                .map(MediaCard::from_item)
                .collect(),
        }
    }
}

impl fmt::Display for CardList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "── {} ──", self.title)?;
        for card in &self.cards {
            writeln!(
                f,
                "  {:>8}  {}  {}",
                card.id,
                card,
                format::format_rating(card.rating)
            )?;
        }
        Ok(())
    }
}

/// The current session as printed by `whoami` and `login`
#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub email: String,
    pub logged_in: bool,
    pub plan: Option<String>,
    pub login_time: String,
}

impl From<&SessionRecord> for SessionSummary {
    fn from(record: &SessionRecord) -> Self {
        Self {
            email: record.display_email().to_string(),
            logged_in: record.logged_in,
            plan: record.subscription.clone(),
            login_time: record.login_time.to_rfc3339(),
        }
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.email,
            self.plan
                .as_deref()
                .map(|p| format!("Plan {}", p))
                .unwrap_or_else(|| "aucun abonnement".to_string())
        )
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn redirect_error(redirect: Redirect, output: &Output) -> ExitCode {
    match redirect {
        Redirect::Login => output.error(
            "Connexion requise. Lancez `binj login --email <email> --password <mot de passe>`.",
            ExitCode::NotLoggedIn,
        ),
        Redirect::Subscription => output.error(
            "Aucun abonnement. Lancez `binj subscribe <basic|standard|premium>`.",
            ExitCode::NotLoggedIn,
        ),
    }
}

fn guard(session: &SessionContext, page: GatedPage, output: &Output) -> Result<(), ExitCode> {
    match Redirect::from_access(&session.guard(page)) {
        Some(redirect) => Err(redirect_error(redirect, output)),
        None => Ok(()),
    }
}

fn request_error(e: RequestError, output: &Output) -> ExitCode {
    output.error(e.to_string(), ExitCode::NetworkError)
}

fn print<T: Serialize + fmt::Display>(data: T, output: &Output) -> ExitCode {
    match output.print(data) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Session Commands
// =============================================================================

pub fn login_cmd(session: &SessionContext, cmd: LoginCmd, output: &Output) -> ExitCode {
    match session.login(&cmd.email, &cmd.password) {
        Ok(record) => {
            output.info("Connexion réussie.");
            if record.subscription.is_none() {
                output.info("Choisissez un abonnement avec `binj subscribe <plan>`.");
            }
            print(SessionSummary::from(&record), output)
        }
        Err(LoginFailure::Invalid(validation)) => {
            output.error(validation.summary(), ExitCode::InvalidArgs)
        }
        Err(e) => output.error(e.to_string(), ExitCode::Error),
    }
}

pub fn subscribe_cmd(session: &SessionContext, cmd: SubscribeCmd, output: &Output) -> ExitCode {
    match session.subscribe(cmd.plan.as_str()) {
        Ok(record) => {
            if !record.logged_in {
                output.info("Plan enregistré. Connectez-vous avec `binj login`.");
            }
            print(SessionSummary::from(&record), output)
        }
        Err(e) => output.error(e.to_string(), ExitCode::Error),
    }
}

pub fn logout_cmd(session: &SessionContext, output: &Output) -> ExitCode {
    match session.logout() {
        Ok(()) => print(StatusOk::default(), output),
        Err(e) => output.error(e.to_string(), ExitCode::Error),
    }
}

pub fn whoami_cmd(session: &SessionContext, output: &Output) -> ExitCode {
    match session.current().filter(|r| r.logged_in) {
        Some(record) => print(SessionSummary::from(&record), output),
        None => redirect_error(Redirect::Login, output),
    }
}

// =============================================================================
// Catalog Commands
// =============================================================================

pub async fn home_cmd(home: &HomeController, output: &Output) -> ExitCode {
    match home.load().await {
        PageLoad::Ready(view) => {
            // The three lists load together, so one error state means all failed
            if view.trending.state == CarouselState::Error {
                return output.error(LOAD_ERROR, ExitCode::NetworkError);
            }
            print(view, output)
        }
        PageLoad::Redirect(redirect) => redirect_error(redirect, output),
    }
}

pub async fn popular_cmd(
    client: &TmdbClient,
    session: &SessionContext,
    cmd: PopularCmd,
    output: &Output,
) -> ExitCode {
    if let Err(code) = guard(session, GatedPage::Home, output) {
        return code;
    }

    let (title, result) = if cmd.tv {
        ("Séries populaires", client.popular_tv(cmd.page).await)
    } else {
        ("Films populaires", client.popular_movies(cmd.page).await)
    };

    match result {
        Ok(page) => print(CardList::from_page(title, &page, cmd.limit), output),
        Err(e) => request_error(e, output),
    }
}

pub async fn trending_cmd(
    client: &TmdbClient,
    session: &SessionContext,
    cmd: TrendingCmd,
    output: &Output,
) -> ExitCode {
    if let Err(code) = guard(session, GatedPage::Home, output) {
        return code;
    }

    let window = TimeWindow::from(cmd.window);
    output.info(format!("Tendances ({})...", window));

    match client.trending_movies(window).await {
        Ok(page) => print(CardList::from_page("Tendances", &page, cmd.limit), output),
        Err(e) => request_error(e, output),
    }
}

pub async fn search_cmd(search: &SearchController, cmd: SearchCmd, output: &Output) -> ExitCode {
    if let PageLoad::Redirect(redirect) = search.open() {
        return redirect_error(redirect, output);
    }

    let ticket = search.issue(&cmd.query);
    if ticket.query.is_empty() {
        return output.error(PROMPT, ExitCode::InvalidArgs);
    }

    output.info(format!("Recherche en cours pour \"{}\"", ticket.query));

    match search.run_now(ticket).await {
        Some(SearchState::Results { query, mut cards }) => {
            if cards.is_empty() {
                return output.error(format::results_headline(0), ExitCode::NotFound);
            }
            cards.truncate(cmd.limit);
            print(SearchState::Results { query, cards }, output)
        }
        Some(SearchState::Error) => {
            output.error(SEARCH_ERROR, ExitCode::NetworkError)
        }
        Some(SearchState::Cleared) | None => ExitCode::Success,
    }
}

pub async fn info_cmd(details: &DetailsController, cmd: TargetCmd, output: &Output) -> ExitCode {
    let target = NavTarget::new(cmd.id, cmd.media_type.into());

    match details.load(&target.to_query()).await {
        PageLoad::Ready(DetailsState::Loaded(view)) => print(*view, output),
        PageLoad::Ready(DetailsState::NotFound) => {
            output.error(NOT_FOUND, ExitCode::NotFound)
        }
        PageLoad::Ready(DetailsState::Failed) => {
            output.error(DETAILS_ERROR, ExitCode::NetworkError)
        }
        PageLoad::Redirect(redirect) => redirect_error(redirect, output),
    }
}

pub async fn similar_cmd(
    details: &DetailsController,
    session: &SessionContext,
    cmd: TargetCmd,
    output: &Output,
) -> ExitCode {
    if let Err(code) = guard(session, GatedPage::Details, output) {
        return code;
    }

    let target = NavTarget::new(cmd.id, cmd.media_type.into());
    match details.similar(target).await {
        section @ SimilarSection::Cards(_) => print(section, output),
        SimilarSection::Empty => {
            output.error(NO_SIMILAR, ExitCode::NotFound)
        }
        SimilarSection::Error => output.error(LOAD_ERROR, ExitCode::NetworkError),
    }
}

pub async fn trailer_cmd(
    details: &DetailsController,
    session: &SessionContext,
    cmd: TargetCmd,
    output: &Output,
) -> ExitCode {
    if let Err(code) = guard(session, GatedPage::Details, output) {
        return code;
    }

    let target = NavTarget::new(cmd.id, cmd.media_type.into());
    match details.trailer(target).await {
        trailer @ TrailerState::Available { .. } => print(trailer, output),
        TrailerState::Unavailable => {
            output.error(NO_TRAILER, ExitCode::NotFound)
        }
    }
}

/// Shared handles for the catalog commands
pub struct Services {
    pub client: Arc<TmdbClient>,
    pub session: SessionContext,
}

impl Services {
    pub fn new(client: Arc<TmdbClient>, session: SessionContext) -> Self {
        Self { client, session }
    }

    pub fn home(&self) -> HomeController {
        HomeController::new(Arc::clone(&self.client), self.session.clone())
    }

    pub fn search(&self) -> SearchController {
        SearchController::new(Arc::clone(&self.client), self.session.clone())
    }

    pub fn details(&self) -> DetailsController {
        DetailsController::new(Arc::clone(&self.client), self.session.clone())
    }
}
