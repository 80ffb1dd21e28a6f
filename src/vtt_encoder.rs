use std::io::Write;

use crate::Result;
use crate::captions::Captions;
use crate::cue::Cue;
use crate::cue_encoder::CueEncoder;

const HEADER: &[u8] = b"WEBVTT\n\n";
const CUE_SEPARATOR: &[u8] = b"\n\n";

/// A `CueEncoder` that writes cues in WebVTT format.
///
/// Layout:
/// - `WEBVTT` and a blank line, written exactly once
/// - each cue as its number, the timing line and the text
/// - one blank line *between* cues, none after the last one
///
/// The header is written lazily on the first cue, or on close for an empty track, so
/// constructing an encoder never writes anything by itself.
pub struct VttEncoder<W: Write> {
    /// The underlying writer we stream VTT into.
    w: W,

    /// Whether we've written the `WEBVTT` header.
    started: bool,

    /// Whether the next cue is the first one, so no separator precedes it.
    first: bool,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> VttEncoder<W> {
    /// Create a new VTT encoder that writes to the provided writer.
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            first: true,
            closed: false,
        }
    }

    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(HEADER)?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> CueEncoder for VttEncoder<W> {
    fn write_cue(&mut self, cue: &Cue) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write cue: encoder is already closed",
            ));
        }

        self.start_if_needed()?;

        if !self.first {
            self.w.write_all(CUE_SEPARATOR)?;
        }
        self.first = false;

        write!(
            &mut self.w,
            "{}\n{} --> {}\n{}",
            cue.cue_number(),
            cue.start(),
            cue.end(),
            cue.text()
        )?;

        Ok(())
    }

    /// Write the header if nothing was written yet, then flush. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.start_if_needed()?;
        self.w.flush()?;
        self.closed = true;

        Ok(())
    }
}

/// Render a whole track as WebVTT text.
pub fn encode(captions: &Captions) -> Result<String> {
    let mut out = Vec::new();
    let mut enc = VttEncoder::new(&mut out);
    captions.write_to(&mut enc)?;
    enc.close()?;
    Ok(String::from_utf8(out).map_err(|e| e.utf8_error())?)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::timestamp::Timestamp;
    use crate::validation::RuleSet;

    fn captions(cues: &[(f64, f64, &str)]) -> Captions {
        let cues = cues
            .iter()
            .map(|&(start, end, text)| {
                Cue::new(
                    Timestamp::from_seconds(start),
                    Timestamp::from_seconds(end),
                    text,
                )
            })
            .collect();
        Captions::from_cues(cues, Arc::new(RuleSet::standard()))
    }

    #[test]
    fn empty_track_is_just_the_header() -> anyhow::Result<()> {
        assert_eq!(encode(&Captions::default())?, "WEBVTT\n\n");
        Ok(())
    }

    #[test]
    fn cues_are_numbered_and_separated_by_one_blank_line() -> anyhow::Result<()> {
        let c = captions(&[(0.0, 1.2345, "hello"), (61.2, 62.0, "two\nlines")]);
        assert_eq!(
            encode(&c)?,
            "WEBVTT\n\n\
             1\n00:00:00.000 --> 00:00:01.234\nhello\n\n\
             2\n00:01:01.200 --> 00:01:02.000\ntwo\nlines"
        );
        Ok(())
    }

    #[test]
    fn close_is_idempotent_and_writes_header_once() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.close()?;
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "WEBVTT\n\n");
        Ok(())
    }

    #[test]
    fn write_after_close_errors() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.close()?;
        let cue = Cue::new(Timestamp::ZERO, Timestamp::from_seconds(1.0), "nope");
        let err = enc.write_cue(&cue).unwrap_err();
        assert!(err.to_string().contains("already closed"));
        Ok(())
    }
}
