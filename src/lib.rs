//! scaletui - A terminal front end for generating musical scales and chords.
//!
//! This library provides the controller, the engine binding and the
//! terminal UI used by the `scaletui` binary.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod music;
pub mod notify;
pub mod panel;
pub mod scheduler;
pub mod ui;
pub mod view;

// Re-export commonly used types
pub use app::{App, KeyOutcome};
pub use config::Config;
pub use engine::{BuiltinEngine, EngineBinding, Readiness, TheoryEngine};
pub use error::{CommandError, EngineError, EngineInitError};
pub use music::{ChordRequest, GenerationResult, Note, ScaleRequest};
pub use view::View;
