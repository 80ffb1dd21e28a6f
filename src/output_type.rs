use serde::{Deserialize, Serialize};

/// The supported output formats for an encoded caption track.
///
/// Integration notes:
/// - With the `cli` feature, `ValueEnum` allows this enum to be used directly as a CLI flag.
/// - Each variant maps to a concrete `CueEncoder` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    /// WebVTT subtitle text, suitable for saving back to disk.
    #[default]
    Vtt,

    /// A JSON array of cues including overlap and validation state.
    Json,
}
