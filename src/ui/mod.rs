//! Terminal UI components
//!
//! Built with ratatui. Each screen renders from the matching slice of
//! [`App`]; this module draws the shared frame around them (header, status
//! bar, popups).

pub mod detail;
pub mod home;
pub mod login;
pub mod search;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{App, AppState, InputMode};

/// Draw the whole frame for the current state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Theme::text()), area);

    if matches!(app.state, AppState::Login | AppState::Subscription) {
        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
        match app.state {
            AppState::Login => login::render_login(frame, chunks[0], &app.login),
            _ => login::render_plans(frame, chunks[0], &app.plans),
        }
        render_status_bar(frame, chunks[1], app);
    } else {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        render_header(frame, chunks[0], app);
        match app.state {
            AppState::Home => home::render(frame, chunks[1], &app.home),
            AppState::Search => search::render(frame, chunks[1], &app.search),
            AppState::Detail => detail::render(frame, chunks[1], &app.detail),
            AppState::Login | AppState::Subscription => {}
        }
        render_status_bar(frame, chunks[2], app);
    }

    if let Some(error) = &app.error {
        render_error_popup(frame, area, error);
    }
}

/// Logo, search box and user badge
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([
        Constraint::Length(10), // Logo
        Constraint::Min(1),     // Search box
        Constraint::Length(32), // User
    ])
    .split(area);

    let logo = Paragraph::new(Span::styled("BINJ", Theme::logo()))
        .alignment(Alignment::Center)
        .block(rounded_block(Theme::border()));
    frame.render_widget(logo, chunks[0]);

    let editing = app.state == AppState::Search && app.input_mode == InputMode::Editing;
    let search_text = if editing {
        let (before, after) = split_at_char(&app.search.query, app.search.cursor);
        format!("⌕ {}│{}", before, after)
    } else if app.search.query.is_empty() {
        "⌕ Tapez / pour rechercher...".to_string()
    } else {
        format!("⌕ {}", app.search.query)
    };
    let search_box = Paragraph::new(search_text)
        .style(Theme::input())
        .block(rounded_block(if editing {
            Theme::border_focused()
        } else {
            Theme::border()
        }));
    frame.render_widget(search_box, chunks[1]);

    if let Some(user) = &app.user {
        let initial = user.initial().unwrap_or('U');
        let badge = Paragraph::new(vec![Line::from(vec![
            Span::styled(format!(" {} ", initial), Theme::avatar()),
            Span::raw(" "),
            Span::styled(user.display_email().to_string(), Theme::list_item()),
            Span::styled(format!(" · {}", user.plan_label()), Theme::dimmed()),
        ])])
        .block(rounded_block(Theme::border()));
        frame.render_widget(badge, chunks[2]);
    }
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode = match app.input_mode {
        InputMode::Normal => Span::styled(" NORMAL ", Theme::highlighted()),
        InputMode::Editing => Span::styled(
            " SAISIE ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::ACCENT),
        ),
    };

    let help = match app.state {
        AppState::Login => "Tab:champ  Entrée:valider  Esc:quitter",
        AppState::Subscription => "↑↓:plan  Entrée:choisir  L:déconnexion  q:quitter",
        AppState::Home => "←→↑↓:naviguer  Entrée:détails  f:à la une  r:recharger  /:recherche  L:déconnexion",
        AppState::Search => "Entrée:rechercher  ↓:résultats  Esc:retour",
        AppState::Detail => "↑↓:similaires  Entrée:ouvrir  t:bande-annonce  Esc:retour",
    };

    let status = Paragraph::new(Line::from(vec![
        mode,
        Span::styled(format!(" {:?} ", app.state).to_uppercase(), Theme::dimmed()),
        Span::raw("│ "),
        Span::styled(help, Theme::keybind_desc()),
    ]))
    .style(Theme::status_bar());
    frame.render_widget(status, area);
}

fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup_area = centered(area, 60, 5);
    frame.render_widget(Clear, popup_area);

    let popup = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ERREUR ", Theme::error())),
    );
    frame.render_widget(popup, popup_area);
}

// =============================================================================
// Shared helpers
// =============================================================================

pub(crate) fn rounded_block<'a>(border: Style) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
}

/// Rect of at most `width` x `height`, centered in `area`
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Placeholder paragraph for loading and empty states
pub(crate) fn message<'a>(text: &'a str, style: Style, block: Block<'a>) -> Paragraph<'a> {
    Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block)
}

fn split_at_char(s: &str, chars: usize) -> (&str, &str) {
    let idx = s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len());
    s.split_at(idx)
}
