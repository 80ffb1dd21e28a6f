//! A single time-ranged subtitle unit.
//!
//! A `Cue` carries two kinds of state:
//! - its own data (timestamps and text)
//! - derived state (`is_overlap_prev`, `validation_errors`) that only the timeline engine in
//!   [`crate::captions`] may update, so it always agrees with the data and the cue's neighbour.
//!
//! That is why the setters here are crate-private.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timestamp::Timestamp;

const VTT_HEADER: &str = "webvtt";

/// Stable, never-reused cue identity.
///
/// Unlike the 1-based `cue_number`, this does not change when cues are inserted or removed,
/// so hosts use it for selection and undo targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CueId(Uuid);

impl CueId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CueId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Which boundary of a cue an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

/// Which boundaries a single-cue shift moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftScope {
    Start,
    End,
    Both,
}

impl From<Endpoint> for ShiftScope {
    fn from(endpoint: Endpoint) -> Self {
        match endpoint {
            Endpoint::Start => ShiftScope::Start,
            Endpoint::End => ShiftScope::End,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    id: CueId,
    cue_number: usize,
    start: Timestamp,
    end: Timestamp,
    text: String,
    is_overlap_prev: bool,
    validation_errors: Vec<String>,
}

impl Cue {
    /// Create a detached cue with a fresh id.
    ///
    /// Derived state starts empty; it is filled in once the cue is adopted by a
    /// [`crate::captions::Captions`].
    pub fn new(start: Timestamp, end: Timestamp, text: impl Into<String>) -> Self {
        Self {
            id: CueId::new(),
            cue_number: 1,
            start,
            end,
            text: text.into(),
            is_overlap_prev: false,
            validation_errors: Vec::new(),
        }
    }

    pub(crate) fn with_cue_number(mut self, cue_number: usize) -> Self {
        self.cue_number = cue_number;
        self
    }

    pub fn id(&self) -> CueId {
        self.id
    }

    pub fn cue_number(&self) -> usize {
        self.cue_number
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// `end - start`; negative when the cue is inverted.
    pub fn duration(&self) -> f64 {
        self.end.value() - self.start.value()
    }

    pub fn is_overlap_prev(&self) -> bool {
        self.is_overlap_prev
    }

    pub fn validation_errors(&self) -> &[String] {
        &self.validation_errors
    }

    pub fn is_valid(&self) -> bool {
        self.validation_errors.is_empty()
    }

    pub(crate) fn set_cue_number(&mut self, cue_number: usize) {
        self.cue_number = cue_number;
    }

    pub(crate) fn set_endpoint(&mut self, endpoint: Endpoint, ts: Timestamp) {
        match endpoint {
            Endpoint::Start => self.start = ts,
            Endpoint::End => self.end = ts,
        }
    }

    pub(crate) fn shift(&mut self, scope: ShiftScope, delta: f64) {
        if matches!(scope, ShiftScope::Start | ShiftScope::Both) {
            self.start = self.start + delta;
        }
        if matches!(scope, ShiftScope::End | ShiftScope::Both) {
            self.end = self.end + delta;
        }
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub(crate) fn set_overlap_prev(&mut self, is_overlap_prev: bool) {
        self.is_overlap_prev = is_overlap_prev;
    }

    pub(crate) fn set_validation_errors(&mut self, errors: Vec<String>) {
        self.validation_errors = errors;
    }
}

/// Normalize committed cue text.
///
/// `...` becomes `…`, line breaks become `\n`, and lines a WebVTT reader would not keep as cue
/// text are dropped: blank or whitespace-only lines (they end a cue block) and lines reading
/// `WEBVTT` (taken as the header). Surrounding whitespace is then trimmed. Applying this twice
/// gives the same result as applying it once.
pub fn normalize_text(text: &str) -> String {
    let text = text
        .replace("...", "…")
        .replace("\r\n", "\n")
        .replace('\r', "\n");
    let lines: Vec<&str> = text
        .split('\n')
        .filter(|line| {
            let line = line.trim();
            !line.is_empty() && !line.eq_ignore_ascii_case(VTT_HEADER)
        })
        .collect();
    lines.join("\n").trim().to_string()
}
