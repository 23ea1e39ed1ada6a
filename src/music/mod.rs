//! Data model shared between the engine binding and the controller.
//!
//! Notes and results are produced by the engine; requests are produced by
//! the input reader.

mod note;
mod request;

pub use note::{is_black_slot, piano_slot, GenerationResult, Note, PIANO_KEYS};
pub use request::{ChordRequest, GenerationRequest, ScaleRequest};
