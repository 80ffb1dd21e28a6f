use std::io::Write;

use serde::Serialize;

use crate::Result;
use crate::cue::{Cue, CueId};
use crate::cue_encoder::CueEncoder;

/// A `CueEncoder` that writes cues as a single JSON array.
///
/// Design:
/// - We stream output directly to a `Write` implementation to avoid buffering
///   all cues in memory.
/// - The encoder is stateful so we can emit a well-formed JSON array incrementally.
/// - Each element carries the derived state (overlap, rule violations) alongside the cue data,
///   so tooling can report problems without re-running validation.
///
/// Example output:
/// ```json
/// [
///   { "cue_number": 1, "start": 0.0, "end": 1.2, "start_text": "00:00:00.000", ... }
/// ]
/// ```
pub struct JsonArrayEncoder<W: Write> {
    /// The underlying writer we stream JSON into.
    w: W,

    /// Whether we have written the opening `[` of the JSON array.
    started: bool,

    /// Whether the next element will be the first element in the array.
    /// This lets us correctly place commas between elements.
    first: bool,

    /// Whether the encoder has been closed.
    /// Once closed, no further writes are allowed.
    closed: bool,
}

/// The JSON shape of one cue.
#[derive(Debug, Serialize)]
struct CueRecord<'a> {
    cue_number: usize,
    id: CueId,
    start: f64,
    end: f64,
    start_text: String,
    end_text: String,
    text: &'a str,
    duration: f64,
    is_overlap_prev: bool,
    validation_errors: &'a [String],
}

impl<'a> From<&'a Cue> for CueRecord<'a> {
    fn from(cue: &'a Cue) -> Self {
        Self {
            cue_number: cue.cue_number(),
            id: cue.id(),
            start: cue.start().value(),
            end: cue.end().value(),
            start_text: cue.start().format(),
            end_text: cue.end().format(),
            text: cue.text(),
            duration: cue.duration(),
            is_overlap_prev: cue.is_overlap_prev(),
            validation_errors: cue.validation_errors(),
        }
    }
}

impl<W: Write> JsonArrayEncoder<W> {
    /// Create a new JSON array encoder that writes to the given writer.
    ///
    /// The JSON array is opened lazily on the first write or on close.
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            first: true,
            closed: false,
        }
    }

    /// Write the opening `[` of the JSON array if we have not already done so.
    ///
    /// Deferring this means empty output still results in valid JSON (`[]`).
    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(b"[")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> CueEncoder for JsonArrayEncoder<W> {
    /// Serialize a single cue and append it to the JSON array.
    fn write_cue(&mut self, cue: &Cue) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write cue: encoder is already closed",
            ));
        }

        self.start_if_needed()?;

        // Write a comma before every element except the first.
        if !self.first {
            self.w.write_all(b",")?;
        }
        self.first = false;

        serde_json::to_writer(&mut self.w, &CueRecord::from(cue))?;

        Ok(())
    }

    /// Finalize the JSON array and flush the underlying writer.
    ///
    /// This method is idempotent:
    /// - Calling `close()` multiple times is safe.
    /// - After closing, no further cues may be written.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.start_if_needed()?;

        self.w.write_all(b"]")?;
        self.w.flush()?;

        self.closed = true;
        Ok(())
    }
}
