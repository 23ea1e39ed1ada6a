//! Generation panel.
//!
//! The form and its Generate button on the left; the note list and the
//! piano strip on the right.

use crate::app::App;
use crate::engine::Readiness;
use crate::music::{is_black_slot, PIANO_KEYS};
use crate::panel::{NoteKind, NoteList, PanelView, RenderedNote, Visibility};
use crate::view::View;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use std::time::{Duration, Instant};

/// Width of the form column.
const FORM_WIDTH: u16 = 34;

/// Width of one piano key cell.
const KEY_WIDTH: usize = 4;

/// Renders the active panel.
///
/// Returns the Generate button region and one region per form field.
///
/// # Arguments
///
/// * `frame` - The frame to render to
/// * `area` - The area to render in
/// * `app` - Application state
/// * `now` - Current time, used for reveal transitions
pub fn render_panel(frame: &mut Frame, area: Rect, app: &App, now: Instant) -> (Rect, Vec<Rect>) {
    let view = app.active_view();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(FORM_WIDTH), Constraint::Min(20)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(4)])
        .split(columns[1]);

    let regions = render_form(frame, columns[0], app, view);

    let panel = app.panel(view);
    let transition = app.config().timing.reveal_transition();
    render_note_list(frame, right[0], panel, view, app.readiness(), now, transition);
    render_piano(frame, right[1], panel);

    regions
}

fn render_form(frame: &mut Frame, area: Rect, app: &App, view: View) -> (Rect, Vec<Rect>) {
    let block = Block::default()
        .title(format!(" {} ", view.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let form = app.active_form();
    let focus = form.focus();
    let mut lines: Vec<Line> = Vec::new();
    let mut fields = Vec::new();

    for (i, field) in form.fields().into_iter().enumerate() {
        let focused = i == focus;
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value_style = if focused {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<11}", field.label), label_style),
            Span::styled(format!("< {} >", field.display()), value_style),
        ]));
        if (i as u16) < inner.height {
            fields.push(Rect::new(inner.x, inner.y + i as u16, inner.width, 1));
        }
    }

    lines.push(Line::from(""));

    let noun = match view {
        View::Scales => "Scale",
        View::Chords => "Chord",
    };
    let (label, style) = match app.readiness() {
        Readiness::Ready => (
            format!("[ Generate {} ]", noun),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Readiness::NotReady => (
            "[ Loading... ]".to_string(),
            Style::default().fg(Color::DarkGray),
        ),
        Readiness::Failed => (
            "[ Unavailable ]".to_string(),
            Style::default().fg(Color::Red),
        ),
    };
    let button_row = lines.len() as u16;
    let button = if button_row < inner.height {
        Rect::new(inner.x, inner.y + button_row, label.chars().count() as u16, 1)
    } else {
        Rect::default()
    };
    lines.push(Line::from(Span::styled(label, style)));

    frame.render_widget(Paragraph::new(lines), inner);
    (button, fields)
}

fn note_style(note: &RenderedNote) -> Style {
    match note.kind {
        NoteKind::Natural => Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD),
        NoteKind::Accidental => Style::default()
            .fg(Color::White)
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    }
}

fn render_note_list(
    frame: &mut Frame,
    area: Rect,
    panel: &PanelView,
    view: View,
    readiness: Readiness,
    now: Instant,
    transition: Duration,
) {
    let block = Block::default()
        .title(format!(
            " Notes ({}) #{} ",
            panel.note_count(),
            panel.render_seq()
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let hint_style = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);

    let line = match panel.notes() {
        NoteList::Unrendered if readiness == Readiness::Failed => Line::from(Span::styled(
            "Generation unavailable: the engine failed to load",
            Style::default().fg(Color::Red),
        )),
        NoteList::Unrendered => {
            let noun = match view {
                View::Scales => "a scale",
                View::Chords => "a chord",
            };
            Line::from(Span::styled(
                format!("Press Enter to generate {}", noun),
                hint_style,
            ))
        }
        NoteList::Empty => Line::from(Span::styled("No notes to display", hint_style)),
        NoteList::Notes(notes) => {
            let mut spans = Vec::with_capacity(notes.len() * 2);
            for note in notes {
                let cell = format!(" {} ", note.label);
                let span = match note.visibility(now, transition) {
                    Visibility::Hidden => Span::raw(" ".repeat(cell.chars().count())),
                    Visibility::Fading(_) => {
                        Span::styled(cell, note_style(note).add_modifier(Modifier::DIM))
                    }
                    Visibility::Visible => Span::styled(cell, note_style(note)),
                };
                spans.push(span);
                spans.push(Span::raw(" "));
            }
            Line::from(spans)
        }
    };

    frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: false }), inner);
}

fn render_piano(frame: &mut Frame, area: Rect, panel: &PanelView) {
    let block = Block::default()
        .title(" Piano ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 {
        return;
    }

    let piano = panel.piano();
    let keys: Vec<Span> = PIANO_KEYS
        .iter()
        .enumerate()
        .map(|(slot, key)| {
            let style = if piano.is_active(slot) {
                Style::default()
                    .fg(Color::White)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD)
            } else if is_black_slot(slot) {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Black).bg(Color::White)
            };
            Span::styled(format!("{:^width$}", key, width = KEY_WIDTH), style)
        })
        .collect();

    let markers: Vec<Span> = (0..PIANO_KEYS.len())
        .map(|slot| {
            let mark = if piano.is_active(slot) { "▲" } else { " " };
            Span::styled(
                format!("{:^width$}", mark, width = KEY_WIDTH),
                Style::default().fg(Color::Cyan),
            )
        })
        .collect();

    frame.render_widget(
        Paragraph::new(Line::from(keys)),
        Rect::new(inner.x, inner.y, inner.width, 1),
    );
    if inner.height >= 2 {
        frame.render_widget(
            Paragraph::new(Line::from(markers)),
            Rect::new(inner.x, inner.y + 1, inner.width, 1),
        );
    }
}
