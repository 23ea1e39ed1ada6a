//! Tab bar.
//!
//! One title per view, with the active one highlighted, plus the engine
//! status on the right.

use crate::app::App;
use crate::engine::Readiness;
use crate::view::View;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Renders the tab bar.
///
/// Returns the screen region of each tab title for mouse hit testing.
pub fn render_tabs(frame: &mut Frame, area: Rect, app: &App) -> Vec<(View, Rect)> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut regions = Vec::with_capacity(View::ALL.len());
    let mut spans: Vec<Span> = Vec::new();
    let mut x = inner.x;

    for (i, view) in View::ALL.iter().enumerate() {
        let title = format!(" {} {} ", i + 1, view.title());
        let width = title.chars().count() as u16;

        let style = if app.view_state().is_active(*view) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        regions.push((
            *view,
            Rect::new(x, inner.y, width.min(inner.right().saturating_sub(x)), 1),
        ));
        spans.push(Span::styled(title, style));
        spans.push(Span::raw(" "));
        x = x.saturating_add(width + 1);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);

    let (status, color) = match app.readiness() {
        Readiness::NotReady => ("engine loading", Color::Yellow),
        Readiness::Ready => ("engine ready", Color::Green),
        Readiness::Failed => ("engine unavailable", Color::Red),
    };
    let status_width = status.len() as u16 + 1;
    if inner.width > x.saturating_sub(inner.x) + status_width {
        frame.render_widget(
            Paragraph::new(Span::styled(status, Style::default().fg(color))),
            Rect::new(inner.right() - status_width, inner.y, status_width, 1),
        );
    }

    regions
}
