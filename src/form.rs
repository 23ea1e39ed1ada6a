//! Form state for the two panels and the input reader.
//!
//! Form fields hold raw string values, the way a select box would. The
//! reader coerces them into typed requests without checking them against
//! the engine's capabilities; the engine rejects anything it does not know.

use crate::config::{ChordDefaults, ScaleDefaults};
use crate::engine::Capabilities;
use crate::error::InputError;
use crate::music::{ChordRequest, GenerationRequest, ScaleRequest};
use crate::view::View;

/// Octaves offered by the scale form.
const OCTAVES: std::ops::RangeInclusive<i32> = 0..=8;

/// Value of the mode field meaning "no mode".
pub const NO_MODE: &str = "";

/// One selectable option of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// An option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// A select-style form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectField {
    pub label: &'static str,
    options: Vec<FieldOption>,
    selected: usize,
}

impl SelectField {
    pub fn new(label: &'static str, options: Vec<FieldOption>) -> Self {
        Self {
            label,
            options,
            selected: 0,
        }
    }

    /// The selected value, or an empty string if there are no options.
    pub fn value(&self) -> &str {
        self.options
            .get(self.selected)
            .map(|o| o.value.as_str())
            .unwrap_or("")
    }

    /// The selected option's label.
    pub fn display(&self) -> &str {
        self.options
            .get(self.selected)
            .map(|o| o.label.as_str())
            .unwrap_or("")
    }

    pub fn options(&self) -> &[FieldOption] {
        &self.options
    }

    /// Moves the selection by `delta`, wrapping around.
    pub fn cycle(&mut self, delta: i32) {
        let len = self.options.len() as i32;
        if len == 0 {
            return;
        }
        self.selected = (self.selected as i32 + delta).rem_euclid(len) as usize;
    }

    /// Selects the option with `value`. Returns false if there is none.
    pub fn select(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(index) => {
                self.selected = index;
                true
            }
            None => false,
        }
    }

    /// Selects `value`, appending it as an option if it is not offered.
    ///
    /// Values outside the offered set still reach the engine, which rejects
    /// them, rather than being swapped for the first option.
    pub fn select_or_insert(&mut self, value: &str) {
        if !self.select(value) {
            self.options.push(FieldOption::plain(value));
            self.selected = self.options.len() - 1;
        }
    }

    /// Replaces the options, keeping the current value when it survives
    /// and otherwise trying `fallback`, then the first option.
    pub fn set_options(&mut self, options: Vec<FieldOption>, fallback: &str) {
        let current = self.value().to_string();
        self.options = options;
        self.selected = 0;
        if !self.select(&current) {
            self.select(fallback);
        }
    }
}

/// Focus and field access shared by both forms.
pub trait Form {
    fn fields(&self) -> Vec<&SelectField>;
    fn fields_mut(&mut self) -> Vec<&mut SelectField>;
    fn focus(&self) -> usize;
    fn set_focus(&mut self, index: usize);

    fn focus_next(&mut self) {
        let len = self.fields().len();
        self.set_focus((self.focus() + 1) % len);
    }

    fn focus_prev(&mut self) {
        let len = self.fields().len();
        self.set_focus((self.focus() + len - 1) % len);
    }

    /// Cycles the value of the focused field.
    fn cycle_focused(&mut self, delta: i32) {
        let focus = self.focus();
        if let Some(field) = self.fields_mut().into_iter().nth(focus) {
            field.cycle(delta);
        }
    }
}

/// The scale panel's form.
#[derive(Debug, Clone)]
pub struct ScaleForm {
    pub tonic: SelectField,
    pub scale_type: SelectField,
    pub mode: SelectField,
    pub octave: SelectField,
    pub direction: SelectField,
    focus: usize,
    defaults: ScaleDefaults,
}

impl ScaleForm {
    /// Creates a form holding only the default values.
    ///
    /// The full option lists arrive with the engine capabilities.
    pub fn new(defaults: &ScaleDefaults) -> Self {
        Self {
            tonic: SelectField::new("Tonic", vec![FieldOption::plain(&defaults.tonic)]),
            scale_type: SelectField::new("Scale", vec![FieldOption::plain(&defaults.scale_type)]),
            mode: SelectField::new("Mode", vec![mode_option(&defaults.mode)]),
            octave: SelectField::new("Octave", octave_options()),
            direction: SelectField::new("Direction", direction_options()),
            focus: 0,
            defaults: defaults.clone(),
        }
        .with_defaults_selected()
    }

    fn with_defaults_selected(mut self) -> Self {
        self.octave
            .select_or_insert(&self.defaults.octave.to_string());
        self.direction
            .select_or_insert(&self.defaults.ascending.to_string());
        self
    }

    /// Fills the option lists from the engine capabilities.
    pub fn populate(&mut self, capabilities: &Capabilities) {
        let plain = |values: &[String]| -> Vec<FieldOption> {
            values.iter().map(FieldOption::plain).collect()
        };
        self.tonic
            .set_options(plain(&capabilities.pitches), &self.defaults.tonic);
        self.scale_type
            .set_options(plain(&capabilities.scales), &self.defaults.scale_type);

        let mut modes = vec![mode_option(NO_MODE)];
        modes.extend(capabilities.modes.iter().map(FieldOption::plain));
        self.mode.set_options(modes, &self.defaults.mode);
    }
}

impl Form for ScaleForm {
    fn fields(&self) -> Vec<&SelectField> {
        vec![
            &self.tonic,
            &self.scale_type,
            &self.mode,
            &self.octave,
            &self.direction,
        ]
    }

    fn fields_mut(&mut self) -> Vec<&mut SelectField> {
        vec![
            &mut self.tonic,
            &mut self.scale_type,
            &mut self.mode,
            &mut self.octave,
            &mut self.direction,
        ]
    }

    fn focus(&self) -> usize {
        self.focus
    }

    fn set_focus(&mut self, index: usize) {
        self.focus = index.min(4);
    }
}

/// The chord panel's form.
#[derive(Debug, Clone)]
pub struct ChordForm {
    pub root: SelectField,
    pub quality: SelectField,
    pub number: SelectField,
    focus: usize,
    defaults: ChordDefaults,
}

impl ChordForm {
    pub fn new(defaults: &ChordDefaults) -> Self {
        Self {
            root: SelectField::new("Root", vec![FieldOption::plain(&defaults.root)]),
            quality: SelectField::new("Quality", vec![FieldOption::plain(&defaults.quality)]),
            number: SelectField::new("Extension", vec![FieldOption::plain(&defaults.number)]),
            focus: 0,
            defaults: defaults.clone(),
        }
    }

    pub fn populate(&mut self, capabilities: &Capabilities) {
        let plain = |values: &[String]| -> Vec<FieldOption> {
            values.iter().map(FieldOption::plain).collect()
        };
        self.root
            .set_options(plain(&capabilities.pitches), &self.defaults.root);
        self.quality
            .set_options(plain(&capabilities.chord_qualities), &self.defaults.quality);
        self.number
            .set_options(plain(&capabilities.chord_numbers), &self.defaults.number);
    }
}

impl Form for ChordForm {
    fn fields(&self) -> Vec<&SelectField> {
        vec![&self.root, &self.quality, &self.number]
    }

    fn fields_mut(&mut self) -> Vec<&mut SelectField> {
        vec![&mut self.root, &mut self.quality, &mut self.number]
    }

    fn focus(&self) -> usize {
        self.focus
    }

    fn set_focus(&mut self, index: usize) {
        self.focus = index.min(2);
    }
}

fn mode_option(value: &str) -> FieldOption {
    if value == NO_MODE {
        FieldOption::new(NO_MODE, "none")
    } else {
        FieldOption::plain(value)
    }
}

fn octave_options() -> Vec<FieldOption> {
    OCTAVES.map(|o| FieldOption::plain(o.to_string())).collect()
}

fn direction_options() -> Vec<FieldOption> {
    vec![
        FieldOption::new("true", "Ascending"),
        FieldOption::new("false", "Descending"),
    ]
}

/// Reads a scale request from the scale form.
///
/// # Errors
///
/// Returns [`InputError::InvalidOctave`] if the octave is not an integer.
pub fn read_scale_request(form: &ScaleForm) -> Result<ScaleRequest, InputError> {
    let raw_octave = form.octave.value();
    let octave = raw_octave
        .trim()
        .parse::<i32>()
        .map_err(|_| InputError::InvalidOctave(raw_octave.to_string()))?;
    let mode = match form.mode.value() {
        NO_MODE => None,
        mode => Some(mode.to_string()),
    };

    Ok(ScaleRequest {
        tonic: form.tonic.value().to_string(),
        scale_type: form.scale_type.value().to_string(),
        mode,
        octave,
        ascending: form.direction.value() == "true",
    })
}

/// Reads a chord request from the chord form.
pub fn read_chord_request(form: &ChordForm) -> ChordRequest {
    ChordRequest {
        root: form.root.value().to_string(),
        quality: form.quality.value().to_string(),
        number: form.number.value().to_string(),
    }
}

/// Reads the request for `view` from its form.
pub fn read_request(
    view: View,
    scale: &ScaleForm,
    chord: &ChordForm,
) -> Result<GenerationRequest, InputError> {
    match view {
        View::Scales => read_scale_request(scale).map(GenerationRequest::from),
        View::Chords => Ok(read_chord_request(chord).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capabilities() -> Capabilities {
        let strings = |values: &[&str]| -> Vec<String> {
            values.iter().map(|s| s.to_string()).collect()
        };
        Capabilities {
            scales: strings(&["diatonic", "blues"]),
            modes: strings(&["ionian", "dorian"]),
            chord_qualities: strings(&["major", "minor"]),
            chord_numbers: strings(&["triad", "seventh"]),
            pitches: strings(&["C", "C#", "D"]),
        }
    }

    #[test]
    fn test_default_scale_request() {
        let form = ScaleForm::new(&ScaleDefaults::default());
        let request = read_scale_request(&form).unwrap();
        assert_eq!(
            request,
            ScaleRequest {
                tonic: "C".to_string(),
                scale_type: "diatonic".to_string(),
                mode: None,
                octave: 4,
                ascending: true,
            }
        );
    }

    #[test]
    fn test_mode_and_direction_coercion() {
        let mut form = ScaleForm::new(&ScaleDefaults::default());
        form.populate(&capabilities());
        assert!(form.mode.select("dorian"));
        assert!(form.direction.select("false"));
        assert!(form.octave.select("2"));

        let request = read_scale_request(&form).unwrap();
        assert_eq!(request.mode.as_deref(), Some("dorian"));
        assert!(!request.ascending);
        assert_eq!(request.octave, 2);

        assert!(form.mode.select(NO_MODE));
        assert_eq!(read_scale_request(&form).unwrap().mode, None);
    }

    #[test]
    fn test_invalid_octave_is_an_input_error() {
        let mut form = ScaleForm::new(&ScaleDefaults::default());
        form.octave = SelectField::new("Octave", vec![FieldOption::plain("high")]);
        assert_eq!(
            read_scale_request(&form),
            Err(InputError::InvalidOctave("high".to_string()))
        );
    }

    #[test]
    fn test_configured_octave_out_of_range_passes_through() {
        let defaults = ScaleDefaults {
            octave: 9,
            ..ScaleDefaults::default()
        };
        let mut form = ScaleForm::new(&defaults);
        form.populate(&capabilities());

        assert_eq!(form.octave.value(), "9");
        assert_eq!(form.octave.options().len(), 10);
        assert_eq!(read_scale_request(&form).unwrap().octave, 9);
    }

    #[test]
    fn test_unknown_values_pass_through() {
        let defaults = ChordDefaults {
            root: "H".to_string(),
            quality: "weird".to_string(),
            number: "7".to_string(),
        };
        let form = ChordForm::new(&defaults);
        let request = read_chord_request(&form);
        assert_eq!(request.root, "H");
        assert_eq!(request.quality, "weird");
        assert_eq!(request.number, "7");
    }

    #[test]
    fn test_populate_keeps_defaults_when_available() {
        let mut form = ChordForm::new(&ChordDefaults {
            root: "D".to_string(),
            quality: "minor".to_string(),
            number: "ninth".to_string(),
        });
        form.populate(&capabilities());

        assert_eq!(form.root.value(), "D");
        assert_eq!(form.quality.value(), "minor");
        // Not offered by the engine; falls back to the first option
        assert_eq!(form.number.value(), "triad");
        assert_eq!(form.root.options().len(), 3);
    }

    #[test]
    fn test_focus_and_cycle() {
        let mut form = ChordForm::new(&ChordDefaults::default());
        form.populate(&capabilities());

        form.focus_prev();
        assert_eq!(form.focus(), 2);
        form.focus_next();
        assert_eq!(form.focus(), 0);

        form.cycle_focused(1);
        assert_eq!(form.root.value(), "C#");
        form.cycle_focused(-2);
        assert_eq!(form.root.value(), "D");
    }

    #[test]
    fn test_read_request_by_view() {
        let scale = ScaleForm::new(&ScaleDefaults::default());
        let chord = ChordForm::new(&ChordDefaults::default());
        assert!(matches!(
            read_request(View::Chords, &scale, &chord),
            Ok(GenerationRequest::Chord(_))
        ));
        assert!(matches!(
            read_request(View::Scales, &scale, &chord),
            Ok(GenerationRequest::Scale(_))
        ));
    }
}
