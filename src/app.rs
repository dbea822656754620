//! App state and core application logic
//!
//! Manages the screen state machine and navigation stack. Key handling never
//! blocks: anything that needs the network or the session store comes back
//! as an [`Action`] for the event loop to run, and its outcome returns as an
//! [`AppEvent`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::{MediaCard, NavTarget};
use crate::pages::{
    DetailsState, HomeView, PageLoad, Redirect, SearchState, SimilarSection, TrailerState,
};
use crate::session::{LoginFailure, LoginValidation, SessionRecord, PLANS};

// =============================================================================
// App State Enum
// =============================================================================

/// Application state enum representing current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// Entry page: email + password form
    #[default]
    Login,
    /// Plan selection
    Subscription,
    /// Hero and carousels
    Home,
    /// Live search
    Search,
    /// Detail view for a movie or series
    Detail,
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box or login form focused)
    Editing,
}

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Loading with optional message
    Loading(Option<String>),
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LoadingState::Loading(Some(msg)) => Some(msg),
            LoadingState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Actions & Events
// =============================================================================

/// Work requested by a keypress, run by the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Login { email: String, password: String },
    Subscribe(&'static str),
    Logout,
    LoadHome,
    /// Debounced search for the current query
    Search(String),
    /// Immediate search (Enter)
    SubmitSearch(String),
    OpenDetail(NavTarget),
    Trailer(NavTarget),
}

/// Outcome of an [`Action`], delivered back to the app
#[derive(Debug, Clone)]
pub enum AppEvent {
    LoggedIn(Result<SessionRecord, String>),
    Subscribed(Result<SessionRecord, String>),
    LoggedOut,
    Home(PageLoad<HomeView>),
    /// `None` when the search was superseded
    Search(Option<SearchState>),
    Detail(PageLoad<DetailsState>),
    Trailer(TrailerState),
}

// =============================================================================
// Selection State (per-view)
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection up (or left in a carousel)
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down (or right in a carousel)
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if visible > 0 && self.selected >= self.offset + visible {
            self.offset = self.selected + 1 - visible;
        }
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected = 0;
            self.offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// View-Specific State
// =============================================================================

/// Which login field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

/// Login form state
#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub validation: LoginValidation,
    /// Rejection or storage error from the last attempt
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginState {
    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    /// Validate the form; `Some` action only when both fields pass
    pub fn submit(&mut self) -> Option<Action> {
        self.error = None;
        self.validation = LoginValidation::check(&self.email, &self.password);
        if !self.validation.is_valid() || self.submitting {
            return None;
        }
        self.submitting = true;
        Some(Action::Login {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

/// Home view state
#[derive(Debug, Clone, Default)]
pub struct HomeState {
    pub view: Option<HomeView>,
    pub loading: LoadingState,
    /// Focused carousel (0 trending, 1 movies, 2 series)
    pub row: usize,
    /// Selection inside each carousel
    pub columns: [ListState; 3],
}

impl HomeState {
    pub const ROWS: usize = 3;

    fn set_view(&mut self, view: HomeView) {
        for (list, carousel) in self.columns.iter_mut().zip(view.carousels()) {
            list.set_len(carousel.state.cards().len());
        }
        self.view = Some(view);
        self.loading = LoadingState::Idle;
    }

    /// Card under the cursor
    pub fn selected_card(&self) -> Option<&MediaCard> {
        let view = self.view.as_ref()?;
        let carousel = view.carousels()[self.row];
        carousel.state.cards().get(self.columns[self.row].selected)
    }
}

/// Search view state
#[derive(Debug, Clone, Default)]
pub struct SearchScreen {
    /// Search query
    pub query: String,
    /// Cursor position in query, in characters
    pub cursor: usize,
    pub results: Option<SearchState>,
    pub list: ListState,
    pub loading: LoadingState,
}

impl SearchScreen {
    fn byte_index(&self, cursor: usize) -> usize {
        self.query
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.query.len())
    }

    fn char_len(&self) -> usize {
        self.query.chars().count()
    }

    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.query.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.query.remove(idx);
        }
    }

    pub fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    /// Clear query and results
    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
        self.results = None;
        self.list.set_len(0);
        self.loading = LoadingState::Idle;
    }

    fn set_results(&mut self, results: SearchState) {
        self.list.set_len(results.cards().len());
        self.list.first();
        self.results = Some(results);
        self.loading = LoadingState::Idle;
    }

    pub fn selected_card(&self) -> Option<&MediaCard> {
        self.results
            .as_ref()
            .and_then(|r| r.cards().get(self.list.selected))
    }
}

/// Detail view state
#[derive(Debug, Clone, Default)]
pub struct DetailScreen {
    pub target: Option<NavTarget>,
    pub state: Option<DetailsState>,
    pub loading: LoadingState,
    /// Selection in the similar titles list
    pub similar: ListState,
    /// Trailer popup, once looked up
    pub trailer: Option<TrailerState>,
    pub trailer_loading: bool,
}

impl DetailScreen {
    fn similar_section(&self) -> Option<&SimilarSection> {
        match &self.state {
            Some(DetailsState::Loaded(view)) => Some(&view.similar),
            _ => None,
        }
    }

    pub fn selected_similar(&self) -> Option<&MediaCard> {
        self.similar_section()
            .and_then(|s| s.cards().get(self.similar.selected))
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Current state/screen
    pub state: AppState,
    /// Navigation history stack
    pub nav_stack: Vec<AppState>,
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Global error message
    pub error: Option<String>,
    /// Logged-in user, for the header
    pub user: Option<SessionRecord>,

    // View-specific states
    pub login: LoginState,
    pub plans: ListState,
    pub home: HomeState,
    pub search: SearchScreen,
    pub detail: DetailScreen,
}

impl Default for App {
    fn default() -> Self {
        Self {
            state: AppState::Login,
            nav_stack: Vec::new(),
            running: true,
            input_mode: InputMode::Editing,
            error: None,
            user: None,

            login: LoginState::default(),
            plans: ListState::new(PLANS.len()),
            home: HomeState::default(),
            search: SearchScreen::default(),
            detail: DetailScreen::default(),
        }
    }
}

impl App {
    /// Create a new App instance on the login screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Start on the screen the session allows
    pub fn start(&mut self, user: Option<SessionRecord>, redirect: Option<Redirect>) -> Vec<Action> {
        self.user = user;
        match redirect {
            Some(redirect) => {
                self.redirect(redirect);
                Vec::new()
            }
            None => {
                self.reset_to(AppState::Home);
                vec![self.load_home()]
            }
        }
    }

    /// Navigate to a new state, pushing current to stack
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state);
            self.state = state;
        }
        self.input_mode = InputMode::Normal;
    }

    /// Replace the whole history with a single screen
    fn reset_to(&mut self, state: AppState) {
        self.nav_stack.clear();
        self.state = state;
        self.input_mode = if state == AppState::Login {
            InputMode::Editing
        } else {
            InputMode::Normal
        };
    }

    /// Go back to previous state
    pub fn back(&mut self) -> bool {
        if self.input_mode == InputMode::Editing && self.state != AppState::Login {
            self.input_mode = InputMode::Normal;
            return true;
        }

        if self.detail.trailer.is_some() {
            self.detail.trailer = None;
            return true;
        }

        if let Some(prev) = self.nav_stack.pop() {
            self.state = prev;
            true
        } else {
            false
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Set error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    fn redirect(&mut self, redirect: Redirect) {
        match redirect {
            Redirect::Login => {
                self.user = None;
                self.login = LoginState::default();
                self.reset_to(AppState::Login);
            }
            Redirect::Subscription => {
                self.plans = ListState::new(PLANS.len());
                self.reset_to(AppState::Subscription);
            }
        }
    }

    fn load_home(&mut self) -> Action {
        self.home.loading = LoadingState::Loading(Some("Chargement...".into()));
        Action::LoadHome
    }

    fn open_detail(&mut self, target: NavTarget) -> Action {
        self.detail = DetailScreen {
            target: Some(target),
            loading: LoadingState::Loading(Some("Chargement...".into())),
            ..Default::default()
        };
        self.navigate(AppState::Detail);
        Action::OpenDetail(target)
    }

    /// Focus search input
    pub fn focus_search(&mut self) {
        if self.state != AppState::Search {
            self.navigate(AppState::Search);
        }
        self.input_mode = InputMode::Editing;
    }

    // -------------------------------------------------------------------------
    // Async Results
    // -------------------------------------------------------------------------

    /// Apply the outcome of a finished action
    pub fn apply(&mut self, event: AppEvent) -> Vec<Action> {
        match event {
            AppEvent::LoggedIn(result) => {
                self.login.submitting = false;
                match result {
                    Ok(record) => {
                        let subscribed = record.subscription.is_some();
                        self.user = Some(record);
                        if subscribed {
                            self.reset_to(AppState::Home);
                            return vec![self.load_home()];
                        }
                        self.redirect(Redirect::Subscription);
                    }
                    Err(msg) => self.login.error = Some(msg),
                }
            }
            AppEvent::Subscribed(result) => match result {
                Ok(record) if record.logged_in => {
                    self.user = Some(record);
                    self.reset_to(AppState::Home);
                    return vec![self.load_home()];
                }
                Ok(_) => self.redirect(Redirect::Login),
                Err(msg) => self.set_error(msg),
            },
            AppEvent::LoggedOut => self.redirect(Redirect::Login),
            AppEvent::Home(PageLoad::Ready(view)) => {
                self.user = Some(view.user.clone());
                self.home.set_view(view);
            }
            AppEvent::Search(Some(results)) => self.search.set_results(results),
            // Superseded by a newer query
            AppEvent::Search(None) => {}
            AppEvent::Detail(PageLoad::Ready(state)) => {
                let similar = match &state {
                    DetailsState::Loaded(view) => view.similar.cards().len(),
                    _ => 0,
                };
                self.detail.similar = ListState::new(similar);
                self.detail.state = Some(state);
                self.detail.loading = LoadingState::Idle;
            }
            AppEvent::Trailer(trailer) => {
                self.detail.trailer_loading = false;
                if self.state == AppState::Detail {
                    self.detail.trailer = Some(trailer);
                }
            }
            AppEvent::Home(PageLoad::Redirect(redirect))
            | AppEvent::Detail(PageLoad::Redirect(redirect)) => self.redirect(redirect),
        }
        Vec::new()
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event, returning the work it requests
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        // Clear error on any keypress
        self.error = None;

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        match self.state {
            AppState::Login => return self.handle_login_key(key),
            AppState::Search if self.input_mode == InputMode::Editing => {
                return self.handle_search_input(key)
            }
            _ => {}
        }

        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return None;
            }
            KeyCode::Esc => {
                self.back();
                return None;
            }
            KeyCode::Char('L') => return Some(Action::Logout),
            KeyCode::Char('/') if self.state != AppState::Subscription => {
                self.focus_search();
                return None;
            }
            _ => {}
        }

        match self.state {
            AppState::Subscription => self.handle_plan_key(key),
            AppState::Home => self.handle_home_key(key),
            AppState::Search => self.handle_search_key(key),
            AppState::Detail => self.handle_detail_key(key),
            AppState::Login => None,
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.quit();
                None
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.login.toggle_focus();
                None
            }
            KeyCode::Enter => match self.login.focus {
                LoginField::Email => {
                    self.login.focus = LoginField::Password;
                    None
                }
                LoginField::Password => self.login.submit(),
            },
            KeyCode::Backspace => {
                self.login.field_mut().pop();
                None
            }
            KeyCode::Char(c) => {
                self.login.field_mut().push(c);
                None
            }
            _ => None,
        }
    }

    fn handle_plan_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                self.plans.up();
                None
            }
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
                self.plans.down();
                None
            }
            KeyCode::Enter => PLANS.get(self.plans.selected).copied().map(Action::Subscribe),
            _ => None,
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.home.row = self.home.row.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.home.row = (self.home.row + 1).min(HomeState::ROWS - 1);
                None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.home.columns[self.home.row].up();
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.home.columns[self.home.row].down();
                None
            }
            KeyCode::Enter => {
                let target = self.home.selected_card()?.target();
                Some(self.open_detail(target))
            }
            KeyCode::Char('f') => {
                let target = self.home.view.as_ref()?.hero.as_ref()?.target;
                Some(self.open_detail(target))
            }
            KeyCode::Char('r') if !self.home.loading.is_loading() => Some(self.load_home()),
            _ => None,
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                if self.search.query.is_empty() {
                    self.input_mode = InputMode::Normal;
                } else {
                    self.search.clear();
                    return Some(Action::Search(String::new()));
                }
                None
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.search.loading = LoadingState::Loading(Some("Recherche en cours...".into()));
                Some(Action::SubmitSearch(self.search.query.clone()))
            }
            KeyCode::Down => {
                self.input_mode = InputMode::Normal;
                None
            }
            KeyCode::Char(c) => {
                self.search.insert(c);
                Some(self.search_changed())
            }
            KeyCode::Backspace => {
                self.search.backspace();
                Some(self.search_changed())
            }
            KeyCode::Left => {
                self.search.cursor_left();
                None
            }
            KeyCode::Right => {
                self.search.cursor_right();
                None
            }
            _ => None,
        }
    }

    fn search_changed(&mut self) -> Action {
        if !self.search.query.trim().is_empty() {
            self.search.loading = LoadingState::Loading(Some("Recherche en cours...".into()));
        }
        Action::Search(self.search.query.clone())
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if self.search.list.selected == 0 {
                    self.input_mode = InputMode::Editing;
                } else {
                    self.search.list.up();
                }
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.search.list.down();
                None
            }
            KeyCode::Home => {
                self.search.list.first();
                None
            }
            KeyCode::End => {
                self.search.list.last();
                None
            }
            KeyCode::Enter => {
                let target = self.search.selected_card()?.target();
                Some(self.open_detail(target))
            }
            _ => None,
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail.similar.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.detail.similar.down();
                None
            }
            KeyCode::Enter => {
                let target = self.detail.selected_similar()?.target();
                Some(self.open_detail(target))
            }
            KeyCode::Char('t') if !self.detail.trailer_loading => {
                let target = self.detail.target?;
                self.detail.trailer_loading = true;
                Some(Action::Trailer(target))
            }
            _ => None,
        }
    }
}

/// Message shown under the login form for a failed attempt
pub fn login_error_message(failure: &LoginFailure) -> String {
    match failure {
        LoginFailure::Invalid(validation) => validation.summary(),
        other => other.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;
    use crate::pages::{Carousel, CarouselState};
    use crate::session::SessionError;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn card(id: u64) -> MediaCard {
        MediaCard {
            id,
            title: format!("Movie {}", id),
            poster: "/placeholder-image.jpg".to_string(),
            release_date: None,
            rating: None,
            overview: None,
            media_type: MediaType::Movie,
        }
    }

    fn home_view() -> HomeView {
        let carousel = |title, n| Carousel {
            title,
            state: CarouselState::Cards((1..=n).map(card).collect()),
        };
        HomeView {
            user: SessionRecord::logged_in("jane@example.com"),
            hero: None,
            trending: carousel("Tendances", 3),
            popular_movies: carousel("Films populaires", 2),
            popular_tv: Carousel {
                title: "Séries populaires",
                state: CarouselState::Empty,
            },
        }
    }

    fn logged_in_app() -> App {
        let mut app = App::new();
        let actions = app.start(Some(SessionRecord::logged_in("jane@example.com")), None);
        assert_eq!(actions, vec![Action::LoadHome]);
        app
    }

    // -------------------------------------------------------------------------
    // ListState Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::new(5);
        list.down();
        list.down();
        list.down();
        list.down();
        list.down();
        assert_eq!(list.selected, 4);
        list.up();
        assert_eq!(list.selected, 3);
        list.first();
        assert_eq!(list.selected, 0);
        list.last();
        assert_eq!(list.selected, 4);
    }

    #[test]
    fn test_list_state_set_len() {
        let mut list = ListState::new(10);
        list.selected = 8;
        list.set_len(5);
        assert_eq!(list.selected, 4);
        list.set_len(0);
        assert_eq!(list.selected, 0);
    }

    #[test]
    fn test_list_state_scroll_into_view() {
        let mut list = ListState::new(20);
        list.selected = 12;
        list.scroll_into_view(5);
        assert_eq!(list.offset, 8);
        list.selected = 3;
        list.scroll_into_view(5);
        assert_eq!(list.offset, 3);
    }

    // -------------------------------------------------------------------------
    // Login & Subscription
    // -------------------------------------------------------------------------

    #[test]
    fn test_starts_on_login() {
        let mut app = App::new();
        assert!(app.start(None, Some(Redirect::Login)).is_empty());
        assert_eq!(app.state, AppState::Login);
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_login_form_validation() {
        let mut app = App::new();
        type_text(&mut app, "nope");
        app.handle_key(key(KeyCode::Tab));
        type_text(&mut app, "123");
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(
            app.login.validation.email,
            Some("Veuillez entrer une adresse e-mail valide")
        );
        assert!(app.login.validation.password.is_some());
    }

    #[test]
    fn test_login_form_submits() {
        let mut app = App::new();
        type_text(&mut app, "jane@example.com");
        app.handle_key(key(KeyCode::Enter));
        type_text(&mut app, "secret1");
        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            action,
            Some(Action::Login {
                email: "jane@example.com".to_string(),
                password: "secret1".to_string(),
            })
        );
        // No double submit while in flight
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_login_without_plan_goes_to_subscription() {
        let mut app = App::new();
        let actions = app.apply(AppEvent::LoggedIn(Ok(SessionRecord::logged_in("a@b.fr"))));
        assert!(actions.is_empty());
        assert_eq!(app.state, AppState::Subscription);

        app.handle_key(key(KeyCode::Down));
        assert_eq!(
            app.handle_key(key(KeyCode::Enter)),
            Some(Action::Subscribe("standard"))
        );

        let mut record = SessionRecord::logged_in("a@b.fr");
        record.subscription = Some("standard".to_string());
        let actions = app.apply(AppEvent::Subscribed(Ok(record)));
        assert_eq!(actions, vec![Action::LoadHome]);
        assert_eq!(app.state, AppState::Home);
    }

    #[test]
    fn test_login_failure_shows_message() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let failure = LoginFailure::Storage(SessionError::Io(io));
        let mut app = App::new();
        app.login.submitting = true;
        app.apply(AppEvent::LoggedIn(Err(login_error_message(&failure))));
        assert!(!app.login.submitting);
        assert_eq!(
            app.login.error.as_deref(),
            Some("Erreur de connexion. Vérifiez vos identifiants.")
        );
    }

    // -------------------------------------------------------------------------
    // Home & Navigation
    // -------------------------------------------------------------------------

    #[test]
    fn test_home_carousel_navigation() {
        let mut app = logged_in_app();
        app.apply(AppEvent::Home(PageLoad::Ready(home_view())));
        assert_eq!(app.home.columns[0].len, 3);

        app.handle_key(key(KeyCode::Right));
        app.handle_key(key(KeyCode::Right));
        assert_eq!(app.home.selected_card().unwrap().id, 3);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        assert_eq!(app.home.row, 2);
        assert!(app.home.selected_card().is_none());
        assert_eq!(app.handle_key(key(KeyCode::Enter)), None);
    }

    #[test]
    fn test_open_detail_and_back() {
        let mut app = logged_in_app();
        app.apply(AppEvent::Home(PageLoad::Ready(home_view())));

        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(
            action,
            Some(Action::OpenDetail(NavTarget::new(1, MediaType::Movie)))
        );
        assert_eq!(app.state, AppState::Detail);
        assert!(app.detail.loading.is_loading());

        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.state, AppState::Home);
    }

    #[test]
    fn test_redirect_from_page_load() {
        let mut app = logged_in_app();
        app.apply(AppEvent::Home(PageLoad::Redirect(Redirect::Login)));
        assert_eq!(app.state, AppState::Login);
        assert!(app.nav_stack.is_empty());
        assert!(app.user.is_none());
    }

    #[test]
    fn test_logout_key() {
        let mut app = logged_in_app();
        assert_eq!(app.handle_key(key(KeyCode::Char('L'))), Some(Action::Logout));
        app.apply(AppEvent::LoggedOut);
        assert_eq!(app.state, AppState::Login);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = logged_in_app();
        app.handle_key(key(KeyCode::Char('q')));
        assert!(!app.running);

        let mut app = App::new();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    #[test]
    fn test_typing_issues_debounced_search() {
        let mut app = logged_in_app();
        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.state, AppState::Search);
        assert_eq!(app.input_mode, InputMode::Editing);

        app.handle_key(key(KeyCode::Char('d')));
        let action = app.handle_key(key(KeyCode::Char('é')));
        assert_eq!(action, Some(Action::Search("dé".to_string())));
        assert_eq!(app.search.cursor, 2);

        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.search.query, "d");

        let action = app.handle_key(key(KeyCode::Enter));
        assert_eq!(action, Some(Action::SubmitSearch("d".to_string())));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_superseded_search_is_ignored() {
        let mut app = logged_in_app();
        app.focus_search();
        app.search.loading = LoadingState::Loading(None);
        app.apply(AppEvent::Search(None));
        assert!(app.search.results.is_none());
        assert!(app.search.loading.is_loading());

        app.apply(AppEvent::Search(Some(SearchState::Results {
            query: "batman".to_string(),
            cards: vec![card(1), card(2)],
        })));
        assert_eq!(app.search.list.len, 2);
        assert!(!app.search.loading.is_loading());
    }

    #[test]
    fn test_escape_clears_query() {
        let mut app = logged_in_app();
        app.focus_search();
        type_text(&mut app, "dune");
        assert_eq!(
            app.handle_key(key(KeyCode::Esc)),
            Some(Action::Search(String::new()))
        );
        assert!(app.search.query.is_empty());
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    // -------------------------------------------------------------------------
    // Detail
    // -------------------------------------------------------------------------

    #[test]
    fn test_trailer_popup_closes_first() {
        let mut app = logged_in_app();
        let target = NavTarget::new(5, MediaType::Tv);
        app.open_detail(target);
        assert_eq!(
            app.handle_key(key(KeyCode::Char('t'))),
            Some(Action::Trailer(target))
        );
        assert_eq!(app.handle_key(key(KeyCode::Char('t'))), None);

        app.apply(AppEvent::Trailer(TrailerState::Unavailable));
        assert!(app.detail.trailer.is_some());

        app.handle_key(key(KeyCode::Esc));
        assert!(app.detail.trailer.is_none());
        assert_eq!(app.state, AppState::Detail);
    }
}
