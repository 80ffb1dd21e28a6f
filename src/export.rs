//! High-level entry point for writing a caption track.
//!
//! The host supplies a writer (a file, stdout, an in-memory buffer) and an [`OutputType`]; we
//! pick the encoder, stream every cue into it and always close it, even when writing failed
//! part way.

use std::io::{BufWriter, Write};

use crate::Result;
use crate::captions::Captions;
use crate::cue_encoder::CueEncoder;
use crate::json_array_encoder::JsonArrayEncoder;
use crate::output_type::OutputType;
use crate::vtt_encoder::VttEncoder;

/// Encode `captions` into `w` in the requested format.
pub fn write_captions<W: Write>(captions: &Captions, w: W, output_type: OutputType) -> Result<()> {
    // Buffer output for efficiency (especially important for stdout).
    let writer = BufWriter::new(w);

    // We keep the encoder selection explicit (no trait objects) to avoid lifetime surprises.
    match output_type {
        OutputType::Vtt => {
            let mut encoder = VttEncoder::new(writer);
            let run_res = captions.write_to(&mut encoder);
            merge_run_and_close(run_res, encoder.close())
        }
        OutputType::Json => {
            let mut encoder = JsonArrayEncoder::new(writer);
            let run_res = captions.write_to(&mut encoder);
            merge_run_and_close(run_res, encoder.close())
        }
    }
}

/// Prefer the write error, but never drop a close error silently.
fn merge_run_and_close(run_res: Result<()>, close_res: Result<()>) -> Result<()> {
    match (run_res, close_res) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => Err(crate::Error::msg(format!(
            "{err} (and closing the encoder failed: {close_err})"
        ))),
    }
}
