//! Cache status panel
//!
//! Lists which search terms map to which locations and how many residents
//! each cached location holds, using only the caches' public enumeration.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Renders the cache status panel into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session();
    let locations = session.locations();
    let characters = session.characters();

    let heading = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(Span::styled("Search terms", heading))];

    if locations.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (empty)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (term, location) in locations.entries() {
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", term), Style::default().fg(Color::Yellow)),
            Span::raw(" → "),
            Span::raw(location.name.clone()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Residents", heading)));
    for (name, residents) in characters.entries() {
        lines.push(Line::from(format!("  {}: {}", name, residents.len())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "Total locations: {} ({} unique)",
            locations.list_all().len(),
            locations.list_all_unique().len()
        ),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        format!(
            "Total characters: {} ({} unique)",
            characters.list_all().len(),
            characters.list_all_unique().len()
        ),
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" Cache Status ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use portalscope::cli::StartupConfig;
    use portalscope::data::Location;
    use ratatui::{backend::TestBackend, Terminal};

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, app, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_empty_cache_status() {
        let app = App::new(&StartupConfig::default());
        let content = render_to_string(&app);
        assert!(content.contains("Cache Status"));
        assert!(content.contains("(empty)"));
        assert!(content.contains("Total locations: 0"));
    }

    #[test]
    fn test_cache_status_lists_terms_and_totals() {
        let app = App::new(&StartupConfig::default());
        let earth = Location {
            id: 1,
            name: "Earth (C-137)".to_string(),
            location_type: "Planet".to_string(),
            dimension: String::new(),
            residents: vec![],
            url: String::new(),
        };
        {
            let mut session = app.session();
            session.locations_mut().set("Earth", earth.clone());
            session.locations_mut().set("earth", earth);
        }

        let content = render_to_string(&app);

        assert!(content.contains("Earth → Earth (C-137)"));
        assert!(content.contains("Total locations: 2 (1 unique)"));
    }
}
