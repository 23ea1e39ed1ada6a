//! Render pipeline for one generation panel.
//!
//! A panel turns a [`GenerationResult`] into two views that always describe
//! the same result: the note list and the 12-key piano strip. Every render
//! replaces both views wholesale, so an overlapping render can never leave
//! a mix of old and new notes behind.
//!
//! Notes start hidden and are revealed one by one by scheduled tasks. A
//! reveal aimed at an element that has since been replaced does nothing.

use crate::music::{piano_slot, GenerationResult, PIANO_KEYS};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Global counter for rendered element IDs.
static ELEMENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a rendered note element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(u64);

impl ElementId {
    fn next() -> Self {
        Self(ELEMENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Whether a note sits on a white or a black key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Natural,
    Accidental,
}

/// How far along its reveal transition a note is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visibility {
    Hidden,
    /// Transition progress in `0.0..1.0`.
    Fading(f32),
    Visible,
}

/// One rendered entry in the note list.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNote {
    pub id: ElementId,
    pub label: String,
    pub pitch: String,
    pub kind: NoteKind,
    revealed_at: Option<Instant>,
}

impl RenderedNote {
    /// Visibility at `now` for a transition lasting `transition`.
    pub fn visibility(&self, now: Instant, transition: Duration) -> Visibility {
        let Some(start) = self.revealed_at else {
            return Visibility::Hidden;
        };
        let elapsed = now.saturating_duration_since(start);
        if transition.is_zero() || elapsed >= transition {
            Visibility::Visible
        } else {
            Visibility::Fading(elapsed.as_secs_f32() / transition.as_secs_f32())
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed_at.is_some()
    }
}

/// Contents of the note list.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum NoteList {
    /// Nothing generated yet.
    #[default]
    Unrendered,
    /// The engine returned an empty sequence.
    Empty,
    Notes(Vec<RenderedNote>),
}

/// Highlight state of the 12 piano keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PianoStrip {
    active: [bool; 12],
}

impl PianoStrip {
    pub fn clear(&mut self) {
        self.active = [false; 12];
    }

    /// Lights the key matching `pitch`. Unmapped names are skipped and
    /// return false.
    pub fn activate(&mut self, pitch: &str) -> bool {
        match piano_slot(pitch) {
            Some(slot) => {
                self.active[slot] = true;
                true
            }
            None => {
                tracing::debug!("No piano key for pitch {:?}", pitch);
                false
            }
        }
    }

    pub fn is_active(&self, slot: usize) -> bool {
        self.active.get(slot).copied().unwrap_or(false)
    }

    /// Names of the lit keys in keyboard order.
    pub fn active_keys(&self) -> Vec<&'static str> {
        PIANO_KEYS
            .iter()
            .zip(self.active.iter())
            .filter(|(_, on)| **on)
            .map(|(&key, _)| key)
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&on| on).count()
    }
}

/// The rendered state of one panel.
#[derive(Debug, Clone, Default)]
pub struct PanelView {
    notes: NoteList,
    piano: PianoStrip,
    render_seq: u64,
}

impl PanelView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the panel's contents with `result`.
    ///
    /// Returns the new element ids in list order; the caller schedules
    /// their reveals. An empty result yields the empty-state marker, a
    /// cleared piano, and no elements.
    pub fn render(&mut self, result: &GenerationResult) -> Vec<ElementId> {
        self.render_seq += 1;
        self.piano.clear();

        if result.is_empty() {
            self.notes = NoteList::Empty;
            return Vec::new();
        }

        let rendered: Vec<RenderedNote> = result
            .notes
            .iter()
            .map(|note| RenderedNote {
                id: ElementId::next(),
                label: note.display.clone(),
                pitch: note.pitch.clone(),
                kind: if note.is_accidental() {
                    NoteKind::Accidental
                } else {
                    NoteKind::Natural
                },
                revealed_at: None,
            })
            .collect();

        for note in &result.notes {
            self.piano.activate(&note.pitch);
        }

        let ids = rendered.iter().map(|note| note.id).collect();
        self.notes = NoteList::Notes(rendered);
        ids
    }

    /// Starts the reveal transition of one element.
    ///
    /// Returns false, without touching anything, if the element is no
    /// longer part of this panel.
    pub fn reveal(&mut self, id: ElementId, now: Instant) -> bool {
        let NoteList::Notes(notes) = &mut self.notes else {
            return false;
        };
        match notes.iter_mut().find(|note| note.id == id) {
            Some(note) => {
                note.revealed_at.get_or_insert(now);
                true
            }
            None => false,
        }
    }

    pub fn notes(&self) -> &NoteList {
        &self.notes
    }

    pub fn piano(&self) -> &PianoStrip {
        &self.piano
    }

    /// Number of successful renders so far.
    pub fn render_seq(&self) -> u64 {
        self.render_seq
    }

    /// Number of rendered note elements.
    pub fn note_count(&self) -> usize {
        match &self.notes {
            NoteList::Notes(notes) => notes.len(),
            _ => 0,
        }
    }

    pub fn shows_empty_state(&self) -> bool {
        self.notes == NoteList::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::Note;

    fn result(pitches: &[&str]) -> GenerationResult {
        GenerationResult::new(pitches.iter().map(|p| Note::new(*p, *p)).collect())
    }

    #[test]
    fn test_render_classifies_and_highlights() {
        let mut panel = PanelView::new();
        let ids = panel.render(&result(&["C4", "E4", "G4", "A#4"]));

        assert_eq!(ids.len(), 4);
        assert_eq!(panel.note_count(), 4);
        assert_eq!(panel.piano().active_keys(), vec!["C", "E", "G", "A#"]);

        let NoteList::Notes(notes) = panel.notes() else {
            panic!("expected notes");
        };
        let kinds: Vec<NoteKind> = notes.iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NoteKind::Natural,
                NoteKind::Natural,
                NoteKind::Natural,
                NoteKind::Accidental
            ]
        );
    }

    #[test]
    fn test_octave_duplicates_share_one_key() {
        let mut panel = PanelView::new();
        panel.render(&result(&["C4", "D4", "C5"]));
        assert_eq!(panel.note_count(), 3);
        assert_eq!(panel.piano().active_count(), 2);
    }

    #[test]
    fn test_empty_result_shows_empty_state() {
        let mut panel = PanelView::new();
        panel.render(&result(&["C4", "E4"]));
        let ids = panel.render(&GenerationResult::default());

        assert!(ids.is_empty());
        assert!(panel.shows_empty_state());
        assert_eq!(panel.note_count(), 0);
        assert_eq!(panel.piano().active_count(), 0);
    }

    #[test]
    fn test_unmapped_pitch_is_skipped() {
        let mut panel = PanelView::new();
        panel.render(&result(&["C4", "X9", "Eb4"]));
        assert_eq!(panel.note_count(), 3);
        assert_eq!(panel.piano().active_keys(), vec!["C", "D#"]);
    }

    #[test]
    fn test_rerender_replaces_everything() {
        let mut panel = PanelView::new();
        let first = panel.render(&result(&["C4", "E4", "G4"]));
        let second = panel.render(&result(&["A4", "C5"]));

        assert_eq!(panel.render_seq(), 2);
        assert_eq!(panel.piano().active_keys(), vec!["C", "A"]);
        let current: Vec<ElementId> = match panel.notes() {
            NoteList::Notes(notes) => notes.iter().map(|note| note.id).collect(),
            other => panic!("expected notes, got {:?}", other),
        };
        assert_eq!(current, second);
        assert!(first.iter().all(|id| !current.contains(id)));
    }

    #[test]
    fn test_stale_reveal_is_noop() {
        let now = Instant::now();
        let mut panel = PanelView::new();
        let first = panel.render(&result(&["C4"]));
        panel.render(&result(&["D4"]));

        assert!(!panel.reveal(first[0], now));
        let NoteList::Notes(notes) = panel.notes() else {
            panic!("expected notes");
        };
        assert!(!notes[0].is_revealed());
    }

    #[test]
    fn test_reveal_visibility() {
        let start = Instant::now();
        let transition = Duration::from_millis(300);
        let mut panel = PanelView::new();
        let ids = panel.render(&result(&["C4"]));

        let NoteList::Notes(notes) = panel.notes() else {
            panic!("expected notes");
        };
        assert_eq!(notes[0].visibility(start, transition), Visibility::Hidden);

        assert!(panel.reveal(ids[0], start));
        let NoteList::Notes(notes) = panel.notes() else {
            panic!("expected notes");
        };
        match notes[0].visibility(start + Duration::from_millis(150), transition) {
            Visibility::Fading(progress) => assert!((progress - 0.5).abs() < 1e-3),
            other => panic!("expected fading, got {:?}", other),
        }
        assert_eq!(
            notes[0].visibility(start + Duration::from_millis(300), transition),
            Visibility::Visible
        );
    }
}
