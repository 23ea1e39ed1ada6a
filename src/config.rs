//! Application configuration.
//!
//! Everything has a built-in default; a JSON file may override any subset.

use crate::view::View;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Timing of notifications and the note reveal animation, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long a notification stays visible.
    pub notification_ms: u64,
    /// Delay between consecutive note reveals.
    pub reveal_step_ms: u64,
    /// Length of one note's reveal transition.
    pub reveal_transition_ms: u64,
    /// Maximum number of notifications shown at once.
    pub max_notifications: usize,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            notification_ms: 5000,
            reveal_step_ms: 100,
            reveal_transition_ms: 300,
            max_notifications: 5,
        }
    }
}

impl TimingConfig {
    pub fn notification(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn reveal_step(&self) -> Duration {
        Duration::from_millis(self.reveal_step_ms)
    }

    pub fn reveal_transition(&self) -> Duration {
        Duration::from_millis(self.reveal_transition_ms)
    }
}

/// Initial values of the scale form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleDefaults {
    pub tonic: String,
    pub scale_type: String,
    /// Empty string means no mode.
    pub mode: String,
    pub octave: i32,
    pub ascending: bool,
}

impl Default for ScaleDefaults {
    fn default() -> Self {
        Self {
            tonic: "C".to_string(),
            scale_type: "diatonic".to_string(),
            mode: String::new(),
            octave: 4,
            ascending: true,
        }
    }
}

/// Initial values of the chord form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordDefaults {
    pub root: String,
    pub quality: String,
    pub number: String,
}

impl Default for ChordDefaults {
    fn default() -> Self {
        Self {
            root: "C".to_string(),
            quality: "major".to_string(),
            number: "triad".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub initial_view: View,
    pub timing: TimingConfig,
    pub scale_defaults: ScaleDefaults,
    pub chord_defaults: ChordDefaults,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a config from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.initial_view, View::Scales);
        assert_eq!(config.timing.notification(), Duration::from_secs(5));
        assert_eq!(config.timing.reveal_step(), Duration::from_millis(100));
        assert_eq!(config.timing.reveal_transition(), Duration::from_millis(300));
        assert_eq!(config.scale_defaults.octave, 4);
        assert!(config.scale_defaults.mode.is_empty());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json(
            r#"{ "initial_view": "chords", "timing": { "notification_ms": 2000 },
                 "chord_defaults": { "root": "A", "quality": "minor" } }"#,
        )
        .unwrap();
        assert_eq!(config.initial_view, View::Chords);
        assert_eq!(config.timing.notification_ms, 2000);
        assert_eq!(config.timing.reveal_step_ms, 100);
        assert_eq!(config.chord_defaults.root, "A");
        assert_eq!(config.chord_defaults.number, "triad");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Config::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
