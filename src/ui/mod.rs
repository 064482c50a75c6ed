//! UI rendering module for portalscope
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod cache_status;
pub mod character_list;
pub mod help_overlay;
pub mod search_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Focus};

/// Renders the whole screen for the current application state
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Search bar
            Constraint::Min(6),    // Results
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_title(frame, chunks[0]);
    search_bar::render_search_bar(frame, app, chunks[1]);

    if app.show_cache_status {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[2]);
        character_list::render(frame, app, body[0]);
        cache_status::render(frame, app, body[1]);
    } else {
        character_list::render(frame, app, chunks[2]);
    }

    render_footer(frame, chunks[3]);

    // Overlays last so they draw on top
    if app.focus == Focus::History {
        search_bar::render_history_dropdown(frame, app, chunks[1]);
    }
    if app.show_help {
        help_overlay::render(frame);
    }
}

fn render_title(frame: &mut Frame, area: ratatui::layout::Rect) {
    let title = Line::from(vec![
        Span::styled(
            "portalscope",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  locations and residents across the multiverse",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_footer(frame: &mut Frame, area: ratatui::layout::Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        "Enter search  ↓ history  ←/→ page  F2 cache  F1 help  Ctrl+C quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, area);
}
