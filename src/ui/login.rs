//! Login form and plan selection screens

use ratatui::{
    prelude::*,
    widgets::{List, ListItem, Paragraph},
};

use super::{centered, rounded_block, Theme};
use crate::app::{ListState, LoginField, LoginState};
use crate::session::PLANS;

/// Email + password form, centered
pub fn render_login(frame: &mut Frame, area: Rect, form: &LoginState) {
    let panel = centered(area, 56, 16);
    let block = rounded_block(Theme::border_focused())
        .title(Span::styled(" BINJ · Connexion ", Theme::logo()));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let rows = Layout::vertical([
        Constraint::Length(1), // spacer
        Constraint::Length(3), // email
        Constraint::Length(1), // email message
        Constraint::Length(3), // password
        Constraint::Length(1), // password message
        Constraint::Length(1), // spacer
        Constraint::Length(1), // button
        Constraint::Min(0),    // form error
    ])
    .split(inner);

    let email_focused = form.focus == LoginField::Email;
    render_field(frame, rows[1], "E-mail", &form.email, email_focused);
    render_field_message(frame, rows[2], form.validation.email);

    let masked = "•".repeat(form.password.chars().count());
    render_field(frame, rows[3], "Mot de passe", &masked, !email_focused);
    render_field_message(frame, rows[4], form.validation.password);

    let button = if form.submitting {
        Span::styled(" Connexion en cours... ", Theme::loading())
    } else {
        Span::styled(" Se connecter ", Theme::highlighted())
    };
    frame.render_widget(
        Paragraph::new(button).alignment(Alignment::Center),
        rows[6],
    );

    if let Some(error) = &form.error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Theme::error()))
                .alignment(Alignment::Center),
            rows[7],
        );
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, focused: bool) {
    let border = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };
    let text = if focused {
        format!("{}│", value)
    } else {
        value.to_string()
    };
    let field = Paragraph::new(text)
        .style(Theme::input())
        .block(rounded_block(border).title(Span::styled(format!(" {} ", label), Theme::secondary())));
    frame.render_widget(field, area);
}

fn render_field_message(frame: &mut Frame, area: Rect, message: Option<&str>) {
    if let Some(message) = message {
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {}", message), Theme::error())),
            area,
        );
    }
}

/// Plan list
pub fn render_plans(frame: &mut Frame, area: Rect, plans: &ListState) {
    let panel = centered(area, 48, (PLANS.len() as u16) + 6);
    let block = rounded_block(Theme::border_focused())
        .title(Span::styled(" Choisissez votre abonnement ", Theme::logo()));

    let items: Vec<ListItem> = PLANS
        .iter()
        .enumerate()
        .map(|(i, plan)| {
            let selected = i == plans.selected;
            let marker = if selected { "▸ " } else { "  " };
            let style = if selected {
                Theme::list_item_selected()
            } else {
                Theme::list_item()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Theme::selected()),
                Span::styled(capitalize(plan), style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), panel);
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
