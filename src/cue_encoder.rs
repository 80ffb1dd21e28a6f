use crate::Result;
use crate::cue::Cue;

/// A sink that serializes cues one at a time.
///
/// Encoders stream: `write_cue` may emit output immediately. `close` finishes the document and
/// must be idempotent.
pub trait CueEncoder {
    fn write_cue(&mut self, cue: &Cue) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
