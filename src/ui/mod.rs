//! Terminal user interface components.
//!
//! This module draws the tab bar, the active generation panel, the
//! notification stack and the help overlay. Rendering only reads controller
//! state; the one thing it writes back is the layout used for mouse hit
//! testing.

mod help;
mod notifications;
mod panel;
mod tabs;

use crate::app::{App, LayoutRegions};
use crate::engine::Readiness;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::time::Instant;

pub use help::render_help;
pub use notifications::render_notifications;
pub use panel::render_panel;
pub use tabs::render_tabs;

/// Main render function that draws the entire UI.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `app` - Application state; its layout regions are refreshed
/// * `now` - Current time, used for reveal transitions
pub fn render(frame: &mut Frame, app: &mut App, now: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(8),    // Active panel
            Constraint::Length(1), // Key hints
        ])
        .split(frame.area());

    let tabs = render_tabs(frame, chunks[0], app);
    let (generate_button, fields) = render_panel(frame, chunks[1], app, now);
    render_key_hints(frame, chunks[2], app);
    render_notifications(frame, chunks[1], app);

    if app.show_help {
        render_help(frame);
    }

    app.update_layout(LayoutRegions {
        tabs,
        generate_button,
        fields,
    });
}

/// Renders the one-line key hint bar at the bottom of the screen.
fn render_key_hints(frame: &mut Frame, area: Rect, app: &App) {
    let key_style = Style::default().fg(Color::Yellow);
    let bracket_style = Style::default().fg(Color::DarkGray);
    let desc_style = Style::default().fg(Color::DarkGray);

    let hints = [
        ("^1", "Scales "),
        ("^2", "Chords "),
        ("^Enter", "Generate "),
        ("↑↓", "Field "),
        ("←→", "Value "),
        ("?", "Help "),
        ("q", "Quit"),
    ];

    let mut spans: Vec<Span> = Vec::with_capacity(hints.len() * 3 + 1);
    for (key, desc) in hints {
        spans.push(Span::styled("[", bracket_style));
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(format!("]{}", desc), desc_style));
    }

    if app.readiness() == Readiness::NotReady {
        spans.push(Span::styled(
            "  Loading engine...",
            Style::default().fg(Color::Yellow),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Helper function to center a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::builtin;
    use crate::error::EngineInitError;
    use crate::view::View;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::time::Duration;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_while_loading() {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = App::new(Config::default());

        terminal
            .draw(|frame| render(frame, &mut app, Instant::now()))
            .unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Scales"));
        assert!(text.contains("Chords"));
        assert!(text.contains("Loading..."));
        assert_eq!(app.layout.tabs.len(), 2);
        assert_eq!(app.layout.fields.len(), 5);
    }

    #[test]
    fn test_render_generated_panel() {
        let now = Instant::now();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = App::new(Config::default());
        app.start_engine(builtin::load);
        app.wait_for_engine(Duration::from_secs(5), now);
        let later = now + Duration::from_secs(2);
        app.tick(later);
        app.notify("Could not generate scale", later);

        terminal
            .draw(|frame| render(frame, &mut app, later))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("C4"));
        assert!(text.contains("Generate Scale"));
        assert!(text.contains("Could not generate scale"));

        app.switch_view(View::Chords);
        terminal
            .draw(|frame| render(frame, &mut app, later))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Generate Chord"));
        assert_eq!(app.layout.fields.len(), 3);
    }

    #[test]
    fn test_render_after_failed_load() {
        let now = Instant::now();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = App::new(Config::default());
        app.start_engine(|| Err(EngineInitError::Load("network error".to_string())));
        app.wait_for_engine(Duration::from_secs(5), now);
        // Let the failure notification expire so it does not cover the panel
        let later = now + Duration::from_secs(10);
        app.tick(later);

        terminal
            .draw(|frame| render(frame, &mut app, later))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Unavailable"));
        assert!(text.contains("Generation unavailable"));
        assert!(!text.contains("Press Enter"));
    }
}
