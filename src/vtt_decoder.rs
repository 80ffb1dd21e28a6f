//! WebVTT text into a validated [`Captions`] track.
//!
//! The dialect handled here is deliberately small:
//! - an optional `WEBVTT` header line (any case, surrounding whitespace ignored)
//! - cue blocks separated by blank lines
//! - each block: an optional cue-number line, a timing line containing `-->`, then text lines
//!
//! Anything after the first token on either side of `-->` (cue settings such as
//! `align:center`) is ignored. Blocks without a timing line (`NOTE`, `STYLE`, header metadata)
//! are skipped.

use std::sync::Arc;

use tracing::debug;

use crate::Result;
use crate::captions::Captions;
use crate::cue::Cue;
use crate::opts::{Opts, TimestampParsing};
use crate::timestamp::Timestamp;
use crate::validation::RuleSet;

const HEADER: &str = "webvtt";
const TIMING_ARROW: &str = "-->";

/// Decode WebVTT text using the rules and parsing mode from `opts`.
pub fn decode(text: &str, opts: &Opts) -> Result<Captions> {
    decode_with_rules(text, opts.timestamp_parsing, Arc::new(opts.rule_set()))
}

/// Decode WebVTT text, validating cues against a caller-supplied rule set.
pub fn decode_with_rules(
    text: &str,
    parsing: TimestampParsing,
    rules: Arc<RuleSet>,
) -> Result<Captions> {
    let cues = parse_cues(text, parsing)?;
    debug!(count = cues.len(), "decoded cues");
    Ok(Captions::from_cues(cues, rules))
}

/// Parse the raw cue sequence without the overlap, numbering and validation pass.
pub fn parse_cues(text: &str, parsing: TimestampParsing) -> Result<Vec<Cue>> {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut cues = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    let lines = text
        .lines()
        .filter(|line| !line.trim().eq_ignore_ascii_case(HEADER));
    for line in lines {
        if line.trim().is_empty() {
            if let Some(cue) = parse_block(&block, parsing)? {
                cues.push(cue);
            }
            block.clear();
        } else {
            block.push(line);
        }
    }
    if let Some(cue) = parse_block(&block, parsing)? {
        cues.push(cue);
    }

    Ok(cues)
}

fn parse_block(block: &[&str], parsing: TimestampParsing) -> Result<Option<Cue>> {
    let Some(first) = block.first() else {
        return Ok(None);
    };

    let Some(timing_idx) = block.iter().position(|line| line.contains(TIMING_ARROW)) else {
        debug!(first_line = *first, "skipping block without a timing line");
        return Ok(None);
    };

    let cue_number = if first.contains(TIMING_ARROW) {
        1
    } else {
        first.trim().parse().unwrap_or(1)
    };

    let (start, end) = block[timing_idx]
        .split_once(TIMING_ARROW)
        .unwrap_or_default();
    let start = parse_side(start, parsing)?;
    let end = parse_side(end, parsing)?;

    let text = block[timing_idx + 1..].join("\n");
    let text = text.trim_end_matches('\n');

    Ok(Some(
        Cue::new(start, end, text).with_cue_number(cue_number),
    ))
}

/// Parse one side of a timing line. An empty side is the zero timestamp.
fn parse_side(side: &str, parsing: TimestampParsing) -> Result<Timestamp> {
    let Some(token) = side.split_whitespace().next() else {
        return Ok(Timestamp::ZERO);
    };
    match parsing {
        TimestampParsing::Lenient => Ok(Timestamp::parse_lenient(token)),
        TimestampParsing::Strict => Timestamp::parse(token),
    }
}
