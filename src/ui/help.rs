//! Help overlay rendering.
//!
//! Displays keyboard shortcuts and mouse controls in a modal overlay.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;

/// Key binding entry for the help display.
struct KeyBinding {
    key: &'static str,
    description: &'static str,
}

const GENERAL_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "?",
        description: "Toggle this help",
    },
    KeyBinding {
        key: "q / Esc",
        description: "Quit",
    },
    KeyBinding {
        key: "Ctrl+C",
        description: "Force quit",
    },
];

const VIEW_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Ctrl+1",
        description: "Show the Scales panel",
    },
    KeyBinding {
        key: "Ctrl+2",
        description: "Show the Chords panel",
    },
    KeyBinding {
        key: "Tab",
        description: "Switch to the other panel",
    },
];

const FORM_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "k / Up",
        description: "Previous field",
    },
    KeyBinding {
        key: "j / Down",
        description: "Next field",
    },
    KeyBinding {
        key: "h / Left",
        description: "Previous value",
    },
    KeyBinding {
        key: "l / Right",
        description: "Next value",
    },
    KeyBinding {
        key: "Enter / g",
        description: "Generate",
    },
    KeyBinding {
        key: "Ctrl+Enter",
        description: "Regenerate the active panel",
    },
    KeyBinding {
        key: "Ctrl+G",
        description: "Same as Ctrl+Enter",
    },
];

const MOUSE_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Click tab",
        description: "Switch panel",
    },
    KeyBinding {
        key: "Click field",
        description: "Focus field",
    },
    KeyBinding {
        key: "Click button",
        description: "Generate",
    },
];

/// Renders the help overlay.
pub fn render_help(frame: &mut Frame) {
    let area = centered_rect(60, 70, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help - Keyboard Shortcuts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Fixed footer
        ])
        .split(inner);

    let mut lines: Vec<Line<'static>> = Vec::new();

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::White);

    let sections: [(&'static str, &[KeyBinding]); 4] = [
        ("General", GENERAL_BINDINGS),
        ("Panels", VIEW_BINDINGS),
        ("Form", FORM_BINDINGS),
        ("Mouse Controls", MOUSE_BINDINGS),
    ];

    for (title, bindings) in sections {
        lines.push(Line::from(Span::styled(title, section_style)));
        for binding in bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("{:15}", binding.key), key_style),
                Span::styled(binding.description, desc_style),
            ]));
        }
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let footer = Paragraph::new(Line::from(Span::styled(
        "Close: ?/Esc",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));
    frame.render_widget(footer, chunks[1]);
}
