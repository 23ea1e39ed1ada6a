//! Binding to the music theory engine.
//!
//! The engine is an external collaborator reached only through the
//! [`TheoryEngine`] trait. [`EngineBinding`] owns its lifecycle: a single
//! background load, a monotonic [`Readiness`], and a capability listing
//! queried once when the engine becomes ready.

pub mod builtin;

use crate::error::{CommandError, EngineError, EngineInitError};
use crate::music::{ChordRequest, GenerationRequest, GenerationResult, ScaleRequest};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::thread;
use std::time::Duration;

pub use builtin::BuiltinEngine;

/// The functional surface of a music theory engine.
///
/// Generation calls are synchronous and must not mutate engine state.
pub trait TheoryEngine: Send {
    fn generate_scale(&self, request: &ScaleRequest) -> Result<GenerationResult, EngineError>;
    fn generate_chord(&self, request: &ChordRequest) -> Result<GenerationResult, EngineError>;
    fn available_scales(&self) -> Vec<String>;
    fn available_modes(&self) -> Vec<String>;
    fn available_chord_qualities(&self) -> Vec<String>;
    fn available_chord_numbers(&self) -> Vec<String>;
    fn chromatic_pitches(&self) -> Vec<String>;
}

/// Result produced by an engine loader.
pub type LoadResult = Result<Box<dyn TheoryEngine>, EngineInitError>;

/// Lifecycle state of the engine as seen by the controller.
///
/// Moves from `NotReady` to either `Ready` or `Failed` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Readiness {
    #[default]
    NotReady,
    Ready,
    Failed,
}

/// Capability sets reported by the engine.
///
/// Queried once after the engine becomes ready and never refreshed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub scales: Vec<String>,
    pub modes: Vec<String>,
    pub chord_qualities: Vec<String>,
    pub chord_numbers: Vec<String>,
    pub pitches: Vec<String>,
}

impl Capabilities {
    /// Collects every capability listing from the engine.
    pub fn query(engine: &dyn TheoryEngine) -> Self {
        Self {
            scales: engine.available_scales(),
            modes: engine.available_modes(),
            chord_qualities: engine.available_chord_qualities(),
            chord_numbers: engine.available_chord_numbers(),
            pitches: engine.chromatic_pitches(),
        }
    }
}

enum BindingState {
    Unstarted,
    Loading(Receiver<LoadResult>),
    Ready {
        engine: Box<dyn TheoryEngine>,
        capabilities: Capabilities,
    },
    Failed(EngineInitError),
}

/// Lazily initialized handle to the engine.
pub struct EngineBinding {
    state: BindingState,
}

impl Default for EngineBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBinding {
    /// Creates a binding that has not started loading.
    pub fn new() -> Self {
        Self {
            state: BindingState::Unstarted,
        }
    }

    /// Starts loading the engine on a background thread.
    ///
    /// Returns immediately. The outcome is picked up by [`poll`](Self::poll)
    /// or [`wait`](Self::wait). Only the first call has any effect; later
    /// calls return [`EngineInitError::AlreadyStarted`] and leave the
    /// binding untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if initialization was already started or the
    /// loader thread cannot be spawned. A spawn failure is terminal.
    pub fn initialize<F>(&mut self, loader: F) -> Result<(), EngineInitError>
    where
        F: FnOnce() -> LoadResult + Send + 'static,
    {
        if !matches!(self.state, BindingState::Unstarted) {
            tracing::warn!("Ignoring repeated engine initialization");
            return Err(EngineInitError::AlreadyStarted);
        }

        tracing::info!("Loading music theory engine");
        let (tx, rx) = mpsc::channel();
        let spawned = thread::Builder::new()
            .name("engine-init".to_string())
            .spawn(move || {
                // The binding may have been dropped; nobody is left to tell.
                let _ = tx.send(loader());
            });

        match spawned {
            Ok(_) => {
                self.state = BindingState::Loading(rx);
                Ok(())
            }
            Err(e) => {
                let err = EngineInitError::Load(e.to_string());
                self.finish(Err(err.clone()));
                Err(err)
            }
        }
    }

    /// Checks whether loading has finished without blocking.
    ///
    /// Returns the new readiness on the call that observes the transition,
    /// and `None` otherwise.
    pub fn poll(&mut self) -> Option<Readiness> {
        let outcome = match &self.state {
            BindingState::Loading(rx) => match rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => Err(EngineInitError::Disconnected),
            },
            _ => return None,
        };
        Some(self.finish(outcome))
    }

    /// Blocks for up to `timeout` waiting for loading to finish.
    pub fn wait(&mut self, timeout: Duration) -> Readiness {
        let outcome = match &self.state {
            BindingState::Loading(rx) => match rx.recv_timeout(timeout) {
                Ok(result) => result,
                Err(RecvTimeoutError::Timeout) => return Readiness::NotReady,
                Err(RecvTimeoutError::Disconnected) => Err(EngineInitError::Disconnected),
            },
            _ => return self.readiness(),
        };
        self.finish(outcome)
    }

    fn finish(&mut self, outcome: LoadResult) -> Readiness {
        match outcome {
            Ok(engine) => {
                let capabilities = Capabilities::query(engine.as_ref());
                tracing::info!(
                    scales = capabilities.scales.len(),
                    modes = capabilities.modes.len(),
                    qualities = capabilities.chord_qualities.len(),
                    "Music theory engine ready"
                );
                self.state = BindingState::Ready {
                    engine,
                    capabilities,
                };
                Readiness::Ready
            }
            Err(e) => {
                tracing::error!("Failed to initialize music theory engine: {}", e);
                self.state = BindingState::Failed(e);
                Readiness::Failed
            }
        }
    }

    pub fn readiness(&self) -> Readiness {
        match self.state {
            BindingState::Unstarted | BindingState::Loading(_) => Readiness::NotReady,
            BindingState::Ready { .. } => Readiness::Ready,
            BindingState::Failed(_) => Readiness::Failed,
        }
    }

    /// Capability sets, available once the engine is ready.
    pub fn capabilities(&self) -> Option<&Capabilities> {
        match &self.state {
            BindingState::Ready { capabilities, .. } => Some(capabilities),
            _ => None,
        }
    }

    /// The initialization error, if loading failed.
    pub fn init_error(&self) -> Option<&EngineInitError> {
        match &self.state {
            BindingState::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Runs a generation request against the ready engine.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::NotReady`] or
    /// [`CommandError::EngineUnavailable`] when the engine cannot be
    /// called, and [`CommandError::Engine`] when the call fails or its
    /// result is malformed.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, CommandError> {
        let engine = match &self.state {
            BindingState::Ready { engine, .. } => engine,
            BindingState::Failed(_) => return Err(CommandError::EngineUnavailable),
            _ => return Err(CommandError::NotReady),
        };

        let result = match request {
            GenerationRequest::Scale(scale) => engine.generate_scale(scale),
            GenerationRequest::Chord(chord) => engine.generate_chord(chord),
        }?;
        validate(result).map_err(CommandError::from)
    }
}

/// Rejects results containing notes without a usable pitch.
fn validate(result: GenerationResult) -> Result<GenerationResult, EngineError> {
    for (i, note) in result.notes.iter().enumerate() {
        let well_formed = note
            .pitch
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic());
        if !well_formed {
            return Err(EngineError::Malformed(format!(
                "note {} has pitch {:?}",
                i, note.pitch
            )));
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::music::Note;

    struct EmptyEngine;

    impl TheoryEngine for EmptyEngine {
        fn generate_scale(&self, _: &ScaleRequest) -> Result<GenerationResult, EngineError> {
            Ok(GenerationResult::default())
        }
        fn generate_chord(&self, _: &ChordRequest) -> Result<GenerationResult, EngineError> {
            Ok(GenerationResult::new(vec![Note::new("", "?")]))
        }
        fn available_scales(&self) -> Vec<String> {
            vec!["diatonic".to_string()]
        }
        fn available_modes(&self) -> Vec<String> {
            Vec::new()
        }
        fn available_chord_qualities(&self) -> Vec<String> {
            vec!["major".to_string()]
        }
        fn available_chord_numbers(&self) -> Vec<String> {
            vec!["triad".to_string()]
        }
        fn chromatic_pitches(&self) -> Vec<String> {
            vec!["C".to_string()]
        }
    }

    fn chord() -> GenerationRequest {
        GenerationRequest::Chord(ChordRequest {
            root: "C".to_string(),
            quality: "major".to_string(),
            number: "triad".to_string(),
        })
    }

    #[test]
    fn test_unstarted_binding_rejects_generation() {
        let binding = EngineBinding::new();
        assert_eq!(binding.readiness(), Readiness::NotReady);
        assert!(binding.capabilities().is_none());
        assert_eq!(binding.generate(&chord()), Err(CommandError::NotReady));
    }

    #[test]
    fn test_initialize_reaches_ready() {
        let mut binding = EngineBinding::new();
        binding
            .initialize(|| Ok(Box::new(EmptyEngine) as Box<dyn TheoryEngine>))
            .unwrap();
        assert_eq!(binding.wait(Duration::from_secs(5)), Readiness::Ready);
        assert_eq!(binding.capabilities().unwrap().scales, vec!["diatonic"]);
        // Already settled; nothing new to report
        assert_eq!(binding.poll(), None);
    }

    #[test]
    fn test_initialize_failure_is_terminal() {
        let mut binding = EngineBinding::new();
        binding
            .initialize(|| Err(EngineInitError::Load("compile error".to_string())))
            .unwrap();
        assert_eq!(binding.wait(Duration::from_secs(5)), Readiness::Failed);
        assert_eq!(
            binding.init_error(),
            Some(&EngineInitError::Load("compile error".to_string()))
        );
        assert_eq!(binding.generate(&chord()), Err(CommandError::EngineUnavailable));

        // A second attempt is refused and the state does not revert
        let retry = binding.initialize(|| Ok(Box::new(EmptyEngine) as Box<dyn TheoryEngine>));
        assert_eq!(retry, Err(EngineInitError::AlreadyStarted));
        assert_eq!(binding.readiness(), Readiness::Failed);
    }

    #[test]
    fn test_loader_panic_reports_disconnected() {
        let mut binding = EngineBinding::new();
        binding
            .initialize(|| -> LoadResult { panic!("loader crashed") })
            .unwrap();
        assert_eq!(binding.wait(Duration::from_secs(5)), Readiness::Failed);
        assert_eq!(binding.init_error(), Some(&EngineInitError::Disconnected));
    }

    #[test]
    fn test_generate_validates_results() {
        let mut binding = EngineBinding::new();
        binding
            .initialize(|| Ok(Box::new(EmptyEngine) as Box<dyn TheoryEngine>))
            .unwrap();
        assert_eq!(binding.wait(Duration::from_secs(5)), Readiness::Ready);
        let scale: GenerationRequest = ScaleRequest {
            tonic: "C".to_string(),
            scale_type: "diatonic".to_string(),
            mode: None,
            octave: 4,
            ascending: true,
        }
        .into();
        assert_eq!(binding.generate(&scale), Ok(GenerationResult::default()));
        assert!(matches!(
            binding.generate(&chord()),
            Err(CommandError::Engine(EngineError::Malformed(_)))
        ));
    }
}
