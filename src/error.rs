//! Error types for the engine binding and the command dispatcher.
//!
//! Every failure a generation command can hit maps to exactly one
//! [`CommandError`] variant, and every variant produces exactly one
//! user-facing notification.

use thiserror::Error;

/// Errors raised while loading the music theory engine.
///
/// Initialization is attempted once per process; any of these is terminal
/// for the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineInitError {
    /// The engine loader reported a failure.
    #[error("engine failed to load: {0}")]
    Load(String),
    /// The loader thread went away without reporting a result.
    #[error("engine loader exited without reporting a result")]
    Disconnected,
    /// `initialize` was called after initialization had already started.
    #[error("engine initialization was already started")]
    AlreadyStarted,
}

/// Errors raised by a single generation call into a ready engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown pitch: {0:?}")]
    UnknownPitch(String),
    #[error("unknown scale type: {0:?}")]
    UnknownScaleType(String),
    #[error("unknown mode: {0:?}")]
    UnknownMode(String),
    #[error("unknown chord quality: {0:?}")]
    UnknownChordQuality(String),
    #[error("unknown chord number: {0:?}")]
    UnknownChordNumber(String),
    #[error("octave {0} is out of range")]
    OctaveOutOfRange(i32),
    /// The engine returned a result that is not well formed.
    #[error("malformed engine result: {0}")]
    Malformed(String),
    #[error("engine fault: {0}")]
    Fault(String),
}

/// Errors raised while reading a request out of the form state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("octave {0:?} is not an integer")]
    InvalidOctave(String),
}

/// Outcome of a rejected or failed generation command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The engine is still loading.
    #[error("music theory engine is not ready")]
    NotReady,
    /// The engine failed to load; generation stays unavailable.
    #[error("music theory engine is unavailable")]
    EngineUnavailable,
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}
