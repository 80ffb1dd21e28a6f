//! `captions_editor` — the caption timeline model behind a WebVTT subtitle editor.
//!
//! This crate provides:
//! - Timestamp parsing, formatting and arithmetic
//! - Pluggable style rules (line length, line count, reading speed)
//! - A WebVTT decoder and streaming encoders (VTT, JSON)
//! - The `Captions` engine: insert/delete, single and cascading time shifts, overlap tracking
//!
//! The engine is a pure value-in, value-out model. It does no I/O of its own, holds no
//! background state and leaves undo, rendering and playback to the host.

mod error;

// Timeline primitives.
pub mod cue;
pub mod timestamp;
pub mod validation;

// The ordered cue collection and its editing operations.
pub mod captions;

// Configuration.
pub mod opts;

// Text codec: decoding, output selection and encoder interfaces.
pub mod cue_encoder;
pub mod export;
pub mod output_type;
pub mod vtt_decoder;

// Output encoders that serialize cues into various formats.
pub mod json_array_encoder;
pub mod vtt_encoder;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub use captions::Captions;
pub use cue::{Cue, CueId, Endpoint, ShiftScope};
pub use error::{Error, Result};
pub use export::write_captions;
pub use opts::{Opts, TimestampParsing};
pub use output_type::OutputType;
pub use timestamp::Timestamp;
pub use validation::{RuleLimits, RuleSet, ValidationRule};
pub use vtt_decoder::decode;
pub use vtt_encoder::encode;
