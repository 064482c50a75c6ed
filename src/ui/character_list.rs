//! Character list and fun fact rendering
//!
//! Shows the residents of the current location one page at a time, with the
//! fun fact above them. Without a current result the list falls back to every
//! character cached during the session.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, View, PAGE_SIZE};
use portalscope::data::{Character, CharacterStatus};

/// Color for a character's status badge
pub fn status_color(status: CharacterStatus) -> Color {
    match status {
        CharacterStatus::Alive => Color::Green,
        CharacterStatus::Dead => Color::Red,
        CharacterStatus::Unknown => Color::Gray,
    }
}

/// Renders the fun fact panel and the paginated character list into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    render_message_panel(frame, app, chunks[0]);
    render_characters(frame, app, chunks[1]);
}

/// Top panel: fun fact, progress, or what went wrong
fn render_message_panel(frame: &mut Frame, app: &App, area: Rect) {
    let (title, line) = match &app.view {
        View::Welcome => (
            " Welcome ",
            Line::from("Type a location name and press Enter."),
        ),
        View::Searching { term } => (
            " Fun Fact ",
            Line::from(Span::styled(
                format!("Searching for '{}'... Fetching fun fact...", term),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
        ),
        View::Results(result) => match &result.fun_fact {
            Some(fact) => (" Fun Fact ", Line::from(fact.clone())),
            None => (
                " Fun Fact ",
                Line::from(Span::styled(
                    "Nobody lives here, so nothing fun to report.",
                    Style::default().fg(Color::DarkGray),
                )),
            ),
        },
        View::NotFound { .. } => (
            " Not Found ",
            Line::from(Span::styled(
                "Error: Location not found. Try another search term.",
                Style::default().fg(Color::Red),
            )),
        ),
        View::Failed { term, message } => (
            " Error ",
            Line::from(Span::styled(
                format!("Search for '{}' failed: {}", term, message),
                Style::default().fg(Color::Red),
            )),
        ),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(
        Paragraph::new(line).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

/// Builds the two display lines for one character
fn character_lines(character: &Character) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![
            Span::styled(
                character.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("● {}", character.status),
                Style::default().fg(status_color(character.status)),
            ),
            Span::styled(
                format!("  {}", character.species),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        Line::from(Span::styled(
            format!("  Last known location: {}", character.location.name),
            Style::default().fg(Color::DarkGray),
        )),
    ]
}

fn render_characters(frame: &mut Frame, app: &App, area: Rect) {
    let (title, characters) = app.displayed_characters();
    let pages = App::page_count(characters.len());
    let page = app.page.min(pages - 1);

    let mut lines: Vec<Line> = Vec::new();
    if characters.is_empty() {
        let message = match app.view {
            View::Results(_) => "No characters found for this location.",
            _ => "No characters yet.",
        };
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        for character in characters.iter().skip(page * PAGE_SIZE).take(PAGE_SIZE) {
            lines.extend(character_lines(character));
        }
    }

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_bottom(format!(
            " Page {}/{} · {} characters ",
            page + 1,
            pages,
            characters.len()
        ))
        .borders(Borders::ALL);

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
