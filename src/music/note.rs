//! Engine-produced notes and the fixed piano key slots.
//!
//! Notes come only from the engine. The controller never edits them; it
//! only inspects their pitch strings to decide how to draw them.

use serde::{Deserialize, Serialize};

/// The 12 piano key slots in display order.
pub const PIANO_KEYS: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Slots drawn as black keys.
const BLACK_KEYS: [&str; 5] = ["C#", "D#", "F#", "G#", "A#"];

/// Flat and edge spellings that land on a sharp-named slot.
const ENHARMONICS: [(&str, &str); 9] = [
    ("Db", "C#"),
    ("Eb", "D#"),
    ("Gb", "F#"),
    ("Ab", "G#"),
    ("Bb", "A#"),
    ("Cb", "B"),
    ("Fb", "E"),
    ("E#", "F"),
    ("B#", "C"),
];

/// A single pitched note as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Pitch class, accidental and octave, e.g. `"F#4"`.
    pub pitch: String,
    /// Text shown in the note list.
    pub display: String,
}

impl Note {
    pub fn new(pitch: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            pitch: pitch.into(),
            display: display.into(),
        }
    }

    /// Whether the note is spelled with a sharp or flat.
    pub fn is_accidental(&self) -> bool {
        is_accidental(&self.pitch)
    }
}

/// An ordered, possibly empty, sequence of notes.
///
/// An empty result is a valid answer and is drawn as an explicit empty
/// state. A failed call never produces a `GenerationResult` at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub notes: Vec<Note>,
}

impl GenerationResult {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }
}

/// Returns true if the pitch carries a sharp or flat marker.
///
/// The first character is the letter name, so an uppercase `B` never
/// counts as a flat.
fn is_accidental(pitch: &str) -> bool {
    pitch.chars().skip(1).any(|c| c == '#' || c == 'b')
}

/// Removes every octave digit from a pitch string.
fn strip_octave(pitch: &str) -> String {
    pitch.chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Maps a pitch string (with or without octave) to its piano slot index.
///
/// Returns `None` for names that match no slot; callers skip those.
pub fn piano_slot(pitch: &str) -> Option<usize> {
    let name = strip_octave(pitch);
    let name = match ENHARMONICS.iter().find(|(spelling, _)| *spelling == name) {
        Some((_, slot)) => (*slot).to_string(),
        None => name,
    };
    PIANO_KEYS.iter().position(|&key| key == name)
}

/// Whether the slot at `index` is a black key.
pub fn is_black_slot(index: usize) -> bool {
    PIANO_KEYS
        .get(index)
        .is_some_and(|key| BLACK_KEYS.contains(key))
}
