//! Notification stack.
//!
//! Drawn in the top-right corner of the panel area, oldest on top.

use crate::app::App;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

/// Maximum width of one notification box.
const MAX_WIDTH: u16 = 50;

/// Height of one notification box, borders included.
const BOX_HEIGHT: u16 = 3;

/// Renders every visible notification that fits in `area`.
pub fn render_notifications(frame: &mut Frame, area: Rect, app: &App) {
    let width = MAX_WIDTH.min(area.width);
    if width < 4 {
        return;
    }
    let x = area.right() - width;
    let mut y = area.y;

    for notification in app.notifications().iter() {
        if y + BOX_HEIGHT > area.bottom() {
            break;
        }
        let rect = Rect::new(x, y, width, BOX_HEIGHT);
        frame.render_widget(Clear, rect);

        let block = Block::default()
            .title(" Error ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let text = Paragraph::new(Span::styled(
            notification.message.as_str(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        frame.render_widget(text, rect);

        y += BOX_HEIGHT;
    }
}
