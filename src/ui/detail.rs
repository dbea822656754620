//! Detail view for movies and TV shows
//!
//! Info panel on the left, similar titles on the right, trailer popup on top.

use ratatui::{
    prelude::*,
    widgets::{Clear, List, ListItem, Paragraph, Wrap},
};

use super::{centered, message, rounded_block, Theme};
use crate::app::DetailScreen;
use crate::format;
use crate::pages::{DetailView, DetailsState, TrailerState};

pub fn render(frame: &mut Frame, area: Rect, detail: &DetailScreen) {
    let view = match &detail.state {
        Some(DetailsState::Loaded(view)) => view,
        Some(state) => {
            let text = state.error_message().unwrap_or_default();
            frame.render_widget(message(text, Theme::error(), rounded_block(Theme::border())), area);
            return;
        }
        None => {
            let text = detail.loading.message().unwrap_or("Chargement...");
            frame.render_widget(message(text, Theme::loading(), rounded_block(Theme::border())), area);
            return;
        }
    };

    let columns = Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).split(area);
    render_info(frame, columns[0], view);
    render_similar(frame, columns[1], view, detail);

    if detail.trailer_loading {
        render_popup(frame, area, vec![Line::from(Span::styled("Recherche de la bande-annonce...", Theme::loading()))]);
    } else if let Some(trailer) = &detail.trailer {
        render_trailer(frame, area, trailer);
    }
}

fn render_info(frame: &mut Frame, area: Rect, view: &DetailView) {
    let block = rounded_block(Theme::border_focused())
        .title(Span::styled(format!(" {} ", view.title), Theme::title()));
    let inner_width = block.inner(area).width as usize;

    let separator = Span::styled(" │ ", Theme::dimmed());
    let mut lines = vec![
        Line::from(vec![
            Span::styled(view.date.as_str(), Theme::year()),
            separator.clone(),
            Span::styled(view.rating.as_str(), Theme::accent()),
            separator,
            Span::styled(view.runtime.as_str(), Theme::secondary()),
        ]),
        Line::from(""),
        labelled("Genres", view.genres.clone()),
        labelled("Langue originale", view.language.clone()),
    ];
    for (label, value) in &view.facts {
        lines.push(labelled(label, value.clone()));
    }
    if !view.cast.is_empty() {
        lines.push(labelled("Distribution", view.cast.join(", ")));
    }

    lines.push(Line::from(Span::styled("─".repeat(inner_width), Theme::dimmed())));
    lines.push(Line::from(Span::styled("SYNOPSIS", Theme::accent())));
    lines.push(Line::from(Span::styled(view.overview.as_str(), Theme::text())));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Affiche: {}", view.poster),
        Theme::dimmed(),
    )));

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}

fn labelled(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Theme::dimmed()),
        Span::styled(value, Theme::text()),
    ])
}

fn render_similar(frame: &mut Frame, area: Rect, view: &DetailView, detail: &DetailScreen) {
    let block = rounded_block(Theme::border())
        .title(Span::styled(" Titres similaires ", Theme::title()));

    if let Some(text) = view.similar.message() {
        frame.render_widget(message(text, Theme::dimmed(), block), area);
        return;
    }

    let items: Vec<ListItem> = view
        .similar
        .cards()
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let selected = i == detail.similar.selected;
            let style = if selected {
                Theme::list_item_selected()
            } else {
                Theme::list_item()
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(if selected { "▸ " } else { "  " }, Theme::selected()),
                    Span::styled(card.title.clone(), style),
                ]),
                Line::from(Span::styled(
                    format!("    {}", format::format_rating(card.rating)),
                    Theme::rating(card.rating),
                )),
            ])
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_trailer(frame: &mut Frame, area: Rect, trailer: &TrailerState) {
    let lines = match trailer {
        TrailerState::Available { name, url } => vec![
            Line::from(Span::styled(name.as_str(), Theme::title())),
            Line::from(""),
            Line::from(Span::styled(url.as_str(), Theme::accent())),
        ],
        TrailerState::Unavailable => vec![Line::from(Span::styled(
            trailer.message().unwrap_or_default(),
            Theme::warning(),
        ))],
    };
    render_popup(frame, area, lines);
}

fn render_popup(frame: &mut Frame, area: Rect, lines: Vec<Line>) {
    let popup_area = centered(area, 70, 7);
    frame.render_widget(Clear, popup_area);
    let block = rounded_block(Theme::border_focused())
        .title(Span::styled(" Bande-annonce ", Theme::logo()))
        .title_bottom(Span::styled(" Esc pour fermer ", Theme::dimmed()));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        popup_area,
    );
}
