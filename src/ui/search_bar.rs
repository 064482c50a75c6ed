//! Search bar and history dropdown rendering

use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Focus};
use portalscope::history::SearchHistoryItem;

/// Most history rows shown in the dropdown
const MAX_DROPDOWN_ROWS: usize = 8;

/// Renders the query input box
pub fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let border_color = if app.focus == Focus::Input {
        Color::Green
    } else {
        Color::DarkGray
    };

    let content = if app.query.is_empty() {
        Line::from(Span::styled(
            "Search for a dimension or planet (e.g., Earth C-137)",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::raw(app.query.clone()),
            Span::styled("█", Style::default().fg(Color::Green)),
        ])
    };

    let title = if app.is_searching() {
        " Searching... "
    } else {
        " Search "
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    frame.render_widget(Paragraph::new(content).block(block), area);
}

/// Formats a history timestamp as local `HH:MM`
pub fn format_time(item: &SearchHistoryItem) -> String {
    item.timestamp.with_timezone(&Local).format("%H:%M").to_string()
}

/// Renders the "Recent Searches" dropdown just below the search bar
pub fn render_history_dropdown(frame: &mut Frame, app: &App, search_area: Rect) {
    let session = app.session();
    let items = session.history().items();
    if items.is_empty() {
        return;
    }

    let rows = items.len().min(MAX_DROPDOWN_ROWS);
    // Keep the highlighted row visible when the list is longer than the dropdown
    let offset = app.history_index.saturating_sub(rows - 1);

    let frame_area = frame.area();
    let top = search_area.y + search_area.height;
    let height = (rows as u16 + 2).min(frame_area.height.saturating_sub(top));
    if height < 3 {
        return;
    }
    let area = Rect::new(search_area.x, top, search_area.width, height);

    let time_width = 5;
    let term_width = (area.width as usize).saturating_sub(time_width + 6);

    let lines: Vec<Line> = items
        .iter()
        .enumerate()
        .skip(offset)
        .take(rows)
        .map(|(i, item)| {
            let selected = i == app.history_index;
            let style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(
                    format!(" {:<width$} ", truncate(&item.search_term, term_width), width = term_width),
                    style,
                ),
                Span::styled(format_time(item), Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();

    let block = Block::default()
        .title(" Recent Searches (Ctrl+D clear) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Shortens `text` to at most `max` characters
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut shortened: String = text.chars().take(max.saturating_sub(1)).collect();
        shortened.push('…');
        shortened
    }
}
