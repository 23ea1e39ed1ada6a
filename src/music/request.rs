//! Typed generation requests read from the form state.

use serde::{Deserialize, Serialize};

/// Parameters for a scale generation call.
///
/// Names are carried as the engine spells them; membership in the engine's
/// capability sets is checked by the engine, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleRequest {
    pub tonic: String,
    pub scale_type: String,
    /// `None` when no mode is selected.
    pub mode: Option<String>,
    pub octave: i32,
    pub ascending: bool,
}

/// Parameters for a chord generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordRequest {
    pub root: String,
    pub quality: String,
    pub number: String,
}

/// A request for either panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationRequest {
    Scale(ScaleRequest),
    Chord(ChordRequest),
}

impl From<ScaleRequest> for GenerationRequest {
    fn from(request: ScaleRequest) -> Self {
        GenerationRequest::Scale(request)
    }
}

impl From<ChordRequest> for GenerationRequest {
    fn from(request: ChordRequest) -> Self {
        GenerationRequest::Chord(request)
    }
}
