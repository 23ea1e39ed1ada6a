//! Built-in interval-table engine.
//!
//! A small engine that builds scales and chords from fixed semitone
//! patterns. The controller reaches it only through [`TheoryEngine`], the
//! same way it would reach any other engine.

use super::TheoryEngine;
use crate::error::EngineError;
use crate::music::{ChordRequest, GenerationResult, Note, ScaleRequest};

/// Sharp spellings for each semitone above C.
const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Flat spellings for each semitone above C.
const FLAT_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

const CHROMATIC_PITCHES: [&str; 17] = [
    "C", "C#", "Db", "D", "D#", "Eb", "E", "F", "F#", "Gb", "G", "G#", "Ab", "A", "A#", "Bb",
    "B",
];

const SCALE_TYPES: [&str; 8] = [
    "diatonic",
    "pentatonic_major",
    "pentatonic_minor",
    "blues",
    "chromatic",
    "whole_tone",
    "harmonic_minor",
    "melodic_minor",
];

const MODES: [&str; 7] = [
    "ionian",
    "dorian",
    "phrygian",
    "lydian",
    "mixolydian",
    "aeolian",
    "locrian",
];

const CHORD_QUALITIES: [&str; 8] = [
    "major",
    "minor",
    "diminished",
    "augmented",
    "dominant",
    "half_diminished",
    "sus2",
    "sus4",
];

const CHORD_NUMBERS: [&str; 5] = ["triad", "seventh", "ninth", "eleventh", "thirteenth"];

/// Step pattern of the major scale; modes rotate it.
const DIATONIC_STEPS: [u8; 7] = [2, 2, 1, 2, 2, 2, 1];

/// Highest octave a scale may start in.
const MAX_OCTAVE: i32 = 8;

/// Octave chords are built in.
const CHORD_OCTAVE: i32 = 4;

/// Extension intervals above the root, in semitones, for 9th/11th/13th.
const EXTENSIONS: [u8; 3] = [14, 17, 21];

/// Loads the built-in engine. Infallible, but shaped like any other loader.
pub fn load() -> super::LoadResult {
    Ok(Box::new(BuiltinEngine))
}

/// The built-in engine. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEngine;

impl BuiltinEngine {
    /// Parses a pitch name into (semitone offset from C, prefers flats).
    ///
    /// The offset is signed: `Cb` is -1 and `B#` is 12, so it lands in the
    /// neighbouring octave when added to `octave * 12`.
    fn parse_pitch(name: &str) -> Result<(i32, bool), EngineError> {
        let unknown = || EngineError::UnknownPitch(name.to_string());
        let mut chars = name.trim().chars();
        let letter = chars.next().ok_or_else(unknown)?.to_ascii_uppercase();
        let base: i32 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(unknown()),
        };
        let accidental: String = chars.collect::<String>().to_lowercase();
        let (offset, flat) = match accidental.as_str() {
            "" => (0, false),
            "#" | "s" => (1, false),
            "b" => (-1, true),
            _ => return Err(unknown()),
        };
        Ok((base + offset, flat))
    }

    /// Returns the step pattern for a scale type and optional mode.
    fn scale_steps(scale_type: &str, mode: Option<&str>) -> Result<Vec<u8>, EngineError> {
        let mode_index = match mode {
            Some(name) => Some(
                MODES
                    .iter()
                    .position(|&m| m.eq_ignore_ascii_case(name))
                    .ok_or_else(|| EngineError::UnknownMode(name.to_string()))?,
            ),
            None => None,
        };

        let rotated = |index: usize| {
            let mut steps = DIATONIC_STEPS.to_vec();
            steps.rotate_left(index);
            steps
        };

        let steps = match scale_type.to_lowercase().as_str() {
            "diatonic" | "major" => rotated(mode_index.unwrap_or(0)),
            // Aeolian unless a mode says otherwise
            "minor" => rotated(mode_index.unwrap_or(5)),
            "pentatonic_major" => vec![2, 2, 3, 2, 3],
            "pentatonic_minor" => vec![3, 2, 2, 3, 2],
            "blues" => vec![3, 2, 1, 1, 3, 2],
            "chromatic" => vec![1; 12],
            "whole_tone" => vec![2; 6],
            "harmonic_minor" => vec![2, 1, 2, 2, 1, 3, 1],
            "melodic_minor" => vec![2, 1, 2, 2, 2, 2, 1],
            _ => return Err(EngineError::UnknownScaleType(scale_type.to_string())),
        };
        Ok(steps)
    }

    /// Returns the chord tones above the root for a quality and size.
    fn chord_intervals(quality: &str, number: &str) -> Result<Vec<u8>, EngineError> {
        let (triad, seventh): ([u8; 3], u8) = match quality.to_lowercase().as_str() {
            "major" => ([0, 4, 7], 11),
            "minor" => ([0, 3, 7], 10),
            "diminished" => ([0, 3, 6], 9),
            "augmented" => ([0, 4, 8], 10),
            "dominant" => ([0, 4, 7], 10),
            "half_diminished" => ([0, 3, 6], 10),
            "sus2" | "suspended2" => ([0, 2, 7], 10),
            "sus4" | "suspended4" => ([0, 5, 7], 10),
            _ => return Err(EngineError::UnknownChordQuality(quality.to_string())),
        };

        let extensions = match number.to_lowercase().as_str() {
            "triad" | "3" => 0,
            "seventh" | "7" => 1,
            "ninth" | "9" => 2,
            "eleventh" | "11" => 3,
            "thirteenth" | "13" => 4,
            _ => return Err(EngineError::UnknownChordNumber(number.to_string())),
        };

        let mut intervals = triad.to_vec();
        if extensions > 0 {
            intervals.push(seventh);
            intervals.extend_from_slice(&EXTENSIONS[..extensions - 1]);
        }
        Ok(intervals)
    }

    /// Spells an absolute semitone (C0 = 0) as a note.
    fn spell(absolute: i32, flats: bool) -> Note {
        let names = if flats { &FLAT_NAMES } else { &SHARP_NAMES };
        let name = names[absolute.rem_euclid(12) as usize];
        let pitch = format!("{}{}", name, absolute.div_euclid(12));
        Note::new(pitch.clone(), pitch)
    }
}

impl TheoryEngine for BuiltinEngine {
    fn generate_scale(&self, request: &ScaleRequest) -> Result<GenerationResult, EngineError> {
        let (tonic, flats) = Self::parse_pitch(&request.tonic)?;
        let steps = Self::scale_steps(&request.scale_type, request.mode.as_deref())?;
        if !(0..=MAX_OCTAVE).contains(&request.octave) {
            return Err(EngineError::OctaveOutOfRange(request.octave));
        }

        let mut absolute = request.octave * 12 + tonic;
        let mut notes = Vec::with_capacity(steps.len() + 1);
        notes.push(Self::spell(absolute, flats));
        for step in steps {
            absolute += step as i32;
            notes.push(Self::spell(absolute, flats));
        }
        if !request.ascending {
            notes.reverse();
        }
        Ok(GenerationResult::new(notes))
    }

    fn generate_chord(&self, request: &ChordRequest) -> Result<GenerationResult, EngineError> {
        let (root, flats) = Self::parse_pitch(&request.root)?;
        let intervals = Self::chord_intervals(&request.quality, &request.number)?;
        let base = CHORD_OCTAVE * 12 + root;
        let notes = intervals
            .into_iter()
            .map(|interval| Self::spell(base + interval as i32, flats))
            .collect();
        Ok(GenerationResult::new(notes))
    }

    fn available_scales(&self) -> Vec<String> {
        SCALE_TYPES.iter().map(|s| s.to_string()).collect()
    }

    fn available_modes(&self) -> Vec<String> {
        MODES.iter().map(|s| s.to_string()).collect()
    }

    fn available_chord_qualities(&self) -> Vec<String> {
        CHORD_QUALITIES.iter().map(|s| s.to_string()).collect()
    }

    fn available_chord_numbers(&self) -> Vec<String> {
        CHORD_NUMBERS.iter().map(|s| s.to_string()).collect()
    }

    fn chromatic_pitches(&self) -> Vec<String> {
        CHROMATIC_PITCHES.iter().map(|s| s.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale(tonic: &str, scale_type: &str, mode: Option<&str>, ascending: bool) -> ScaleRequest {
        ScaleRequest {
            tonic: tonic.to_string(),
            scale_type: scale_type.to_string(),
            mode: mode.map(String::from),
            octave: 4,
            ascending,
        }
    }

    fn pitches(result: &GenerationResult) -> Vec<&str> {
        result.notes.iter().map(|n| n.pitch.as_str()).collect()
    }

    #[test]
    fn test_c_major_scale() {
        let result = BuiltinEngine
            .generate_scale(&scale("C", "major", None, true))
            .unwrap();
        assert_eq!(
            pitches(&result),
            vec!["C4", "D4", "E4", "F4", "G4", "A4", "B4", "C5"]
        );
    }

    #[test]
    fn test_dorian_mode_and_descending() {
        let result = BuiltinEngine
            .generate_scale(&scale("D", "diatonic", Some("dorian"), false))
            .unwrap();
        assert_eq!(
            pitches(&result),
            vec!["D5", "C5", "B4", "A4", "G4", "F4", "E4", "D4"]
        );
    }

    #[test]
    fn test_flat_tonic_spells_with_flats() {
        let result = BuiltinEngine
            .generate_scale(&scale("Bb", "pentatonic_major", None, true))
            .unwrap();
        assert_eq!(pitches(&result), vec!["Bb4", "C5", "D5", "F5", "G5", "Bb5"]);
    }

    #[test]
    fn test_tonic_crossing_octave_boundary() {
        let result = BuiltinEngine
            .generate_scale(&scale("Cb", "diatonic", None, true))
            .unwrap();
        let notes = pitches(&result);
        assert_eq!(notes.first(), Some(&"B3"));
        assert_eq!(notes.last(), Some(&"B4"));

        let result = BuiltinEngine
            .generate_scale(&scale("B#", "diatonic", None, true))
            .unwrap();
        assert_eq!(pitches(&result).first(), Some(&"C5"));
    }

    #[test]
    fn test_a_minor_seventh_chord() {
        let request = ChordRequest {
            root: "A".to_string(),
            quality: "minor".to_string(),
            number: "7".to_string(),
        };
        let result = BuiltinEngine.generate_chord(&request).unwrap();
        assert_eq!(pitches(&result), vec!["A4", "C5", "E5", "G5"]);
    }

    #[test]
    fn test_chord_sizes() {
        for (number, len) in [("triad", 3), ("seventh", 4), ("ninth", 5), ("thirteenth", 7)] {
            let request = ChordRequest {
                root: "G".to_string(),
                quality: "dominant".to_string(),
                number: number.to_string(),
            };
            assert_eq!(BuiltinEngine.generate_chord(&request).unwrap().len(), len);
        }
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert_eq!(
            BuiltinEngine.generate_scale(&scale("H", "diatonic", None, true)),
            Err(EngineError::UnknownPitch("H".to_string()))
        );
        assert_eq!(
            BuiltinEngine.generate_scale(&scale("C", "bebop", None, true)),
            Err(EngineError::UnknownScaleType("bebop".to_string()))
        );
        assert_eq!(
            BuiltinEngine.generate_scale(&scale("C", "diatonic", Some("ionic"), true)),
            Err(EngineError::UnknownMode("ionic".to_string()))
        );

        let mut high = scale("C", "diatonic", None, true);
        high.octave = 12;
        assert_eq!(
            BuiltinEngine.generate_scale(&high),
            Err(EngineError::OctaveOutOfRange(12))
        );
    }

    #[test]
    fn test_capability_listings() {
        assert_eq!(BuiltinEngine.available_scales().len(), 8);
        assert_eq!(BuiltinEngine.available_modes().len(), 7);
        assert_eq!(BuiltinEngine.available_chord_qualities().len(), 8);
        assert_eq!(BuiltinEngine.available_chord_numbers().len(), 5);
        assert_eq!(BuiltinEngine.chromatic_pitches().len(), 17);
    }
}
