//! Home screen: hero banner and three horizontal carousels

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use super::{message, rounded_block, Theme};
use crate::app::{HomeState, ListState};
use crate::format;
use crate::models::MediaCard;
use crate::pages::{Carousel, Hero};

/// Width of one card column in a carousel
const CARD_WIDTH: u16 = 24;

pub fn render(frame: &mut Frame, area: Rect, home: &HomeState) {
    let Some(view) = &home.view else {
        let text = home.loading.message().unwrap_or("Chargement...");
        frame.render_widget(message(text, Theme::loading(), rounded_block(Theme::border())), area);
        return;
    };

    let rows = Layout::vertical([
        Constraint::Length(6),
        Constraint::Min(5),
        Constraint::Min(5),
        Constraint::Min(5),
    ])
    .split(area);

    render_hero(frame, rows[0], view.hero.as_ref());

    for (i, carousel) in view.carousels().into_iter().enumerate() {
        render_carousel(frame, rows[i + 1], carousel, &home.columns[i], home.row == i);
    }
}

fn render_hero(frame: &mut Frame, area: Rect, hero: Option<&Hero>) {
    let block = rounded_block(Theme::border()).title(Span::styled(" À la une ", Theme::logo()));

    let Some(hero) = hero else {
        frame.render_widget(message("", Theme::dimmed(), block), area);
        return;
    };

    let mut lines = vec![Line::from(Span::styled(hero.title.as_str(), Theme::title()))];
    if !hero.overview.is_empty() {
        lines.push(Line::from(Span::styled(hero.overview.as_str(), Theme::secondary())));
    }
    lines.push(Line::from(vec![
        Span::styled(" ▶ Plus d'infos ", Theme::highlighted()),
        Span::styled("  (f)", Theme::keybind()),
    ]));

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn render_carousel(
    frame: &mut Frame,
    area: Rect,
    carousel: &Carousel,
    list: &ListState,
    focused: bool,
) {
    let border = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };
    let block = rounded_block(border).title(Span::styled(format!(" {} ", carousel.title), Theme::title()));

    if let Some(text) = carousel.state.message() {
        frame.render_widget(message(text, Theme::dimmed(), block), area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cards = carousel.state.cards();
    let visible = (inner.width / CARD_WIDTH).max(1) as usize;
    let mut view = list.clone();
    view.scroll_into_view(visible);

    let columns = Layout::horizontal(vec![Constraint::Length(CARD_WIDTH); visible]).split(inner);
    for (slot, (i, card)) in cards.iter().enumerate().skip(view.offset).take(visible).enumerate() {
        render_card(frame, columns[slot], card, focused && i == list.selected);
    }
}

fn render_card(frame: &mut Frame, area: Rect, card: &MediaCard, selected: bool) {
    let title_style = if selected {
        Theme::list_item_selected()
    } else {
        Theme::list_item()
    };
    let width = area.width.saturating_sub(1) as usize;

    let lines = vec![
        Line::from(Span::styled(format::truncate(&card.title, width.saturating_sub(3)), title_style)),
        Line::from(vec![
            Span::styled(
                card.year().map(|y| y.to_string()).unwrap_or_default(),
                Theme::year(),
            ),
            Span::raw(" "),
            Span::styled(format::format_rating(card.rating), Theme::rating(card.rating)),
        ]),
        Line::from(Span::styled(card.media_type.to_string(), Theme::dimmed())),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
