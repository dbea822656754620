//! Search screen: result headline and result list
//!
//! The query itself is edited in the header search box.

use ratatui::{
    prelude::*,
    widgets::{List, ListItem},
};

use super::{message, rounded_block, Theme};
use crate::app::SearchScreen;
use crate::format;
use crate::pages::search::PROMPT;

pub fn render(frame: &mut Frame, area: Rect, search: &SearchScreen) {
    let headline = match &search.results {
        Some(results) => results.headline(),
        None => PROMPT.to_string(),
    };
    let block = rounded_block(Theme::border()).title(Span::styled(format!(" {} ", headline), Theme::title()));

    if let Some(text) = search.loading.message() {
        frame.render_widget(message(text, Theme::loading(), block), area);
        return;
    }

    let cards = search.results.as_ref().map(|r| r.cards()).unwrap_or_default();
    if cards.is_empty() {
        frame.render_widget(message("", Theme::dimmed(), block), area);
        return;
    }

    let inner = block.inner(area);
    let mut view = search.list.clone();
    view.scroll_into_view(inner.height as usize);

    let items: Vec<ListItem> = cards
        .iter()
        .enumerate()
        .skip(view.offset)
        .take(inner.height as usize)
        .map(|(i, card)| {
            let selected = i == search.list.selected;
            let marker = if selected { "▸ " } else { "  " };
            let style = if selected {
                Theme::list_item_selected()
            } else {
                Theme::list_item()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Theme::selected()),
                Span::styled(card.title.clone(), style),
                Span::styled(
                    card.year().map(|y| format!(" ({})", y)).unwrap_or_default(),
                    Theme::year(),
                ),
                Span::styled(format!("  [{}]", card.media_type), Theme::dimmed()),
                Span::raw("  "),
                Span::styled(format::format_rating(card.rating), Theme::rating(card.rating)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
