//! The caption timeline engine.
//!
//! `Captions` is the ordered cue sequence of one subtitle track. It is treated as a value:
//! every mutating operation takes `&self`, works on a copy and returns the edited copy. The
//! host keeps the previous value around if it wants undo, and restores it with
//! [`Captions::replace_all`].
//!
//! After any operation returns, these hold:
//! - every cue's `cue_number` equals its 1-based position
//! - every cue touched by the operation (and its successor) has `is_overlap_prev` and
//!   `validation_errors` recomputed against its current text, timestamps and predecessor
//!
//! Overlap is detected, not prevented: cues may collide or even invert.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::cue::{Cue, CueId, Endpoint, ShiftScope, normalize_text};
use crate::cue_encoder::CueEncoder;
use crate::timestamp::Timestamp;
use crate::validation::RuleSet;
use crate::{Error, Result};

/// Gap between the previous cue's end and an inserted cue's start.
const INSERT_GAP_SECONDS: f64 = 0.1;

/// Duration of a freshly inserted cue.
const INSERT_DURATION_SECONDS: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct Captions {
    id: Uuid,
    cues: Vec<Cue>,
    rules: Arc<RuleSet>,
}

impl Default for Captions {
    fn default() -> Self {
        Self::new(Arc::new(RuleSet::standard()))
    }
}

impl Captions {
    /// An empty track validated by `rules`.
    pub fn new(rules: Arc<RuleSet>) -> Self {
        Self {
            id: Uuid::new_v4(),
            cues: Vec::new(),
            rules,
        }
    }

    /// Adopt a raw cue sequence.
    ///
    /// This is the one place where overlap is checked across the whole sequence: every index is
    /// checked once, in order. Cues are then renumbered and validated.
    pub fn from_cues(cues: Vec<Cue>, rules: Arc<RuleSet>) -> Self {
        let mut captions = Self {
            id: Uuid::new_v4(),
            cues,
            rules,
        };
        for i in 0..captions.cues.len() {
            captions.recheck_overlap(i);
        }
        captions.renumber();
        for i in 0..captions.cues.len() {
            captions.revalidate(i);
        }
        captions
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cue> {
        self.cues.iter()
    }

    pub fn get(&self, id: CueId) -> Option<&Cue> {
        self.cues.iter().find(|c| c.id() == id)
    }

    /// Position of the cue with this id.
    pub fn index_of(&self, id: CueId) -> Result<usize> {
        self.cues
            .iter()
            .position(|c| c.id() == id)
            .ok_or(Error::UnknownCueId(id))
    }

    /// The cue to show for playback position `time` (seconds).
    ///
    /// Picks the first cue whose end is at or after `time` while `time` is past the previous
    /// cue's end, so a position inside a gap resolves to the upcoming cue. Falls back to the
    /// first cue when nothing matches; `None` only for an empty track.
    pub fn cue_at_time(&self, time: f64) -> Option<&Cue> {
        let mut prev_end = f64::NEG_INFINITY;
        for cue in &self.cues {
            let end = cue.end().value();
            if time > prev_end && end >= time {
                return Some(cue);
            }
            prev_end = end;
        }
        self.cues.first()
    }

    /// Case-insensitive substring search over cue text. An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&Cue> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.cues
            .iter()
            .filter(|c| c.text().to_lowercase().contains(&needle))
            .collect()
    }

    pub fn overlapping(&self) -> impl Iterator<Item = &Cue> {
        self.cues.iter().filter(|c| c.is_overlap_prev())
    }

    pub fn invalid(&self) -> impl Iterator<Item = &Cue> {
        self.cues.iter().filter(|c| !c.is_valid())
    }

    /// Feed every cue, in order, to `encoder`.
    ///
    /// The caller owns the encoder lifecycle and must call `close()` itself.
    pub fn write_to(&self, encoder: &mut dyn CueEncoder) -> Result<()> {
        for cue in &self.cues {
            encoder.write_cue(cue)?;
        }
        Ok(())
    }

    /// Insert a new empty cue at `index`.
    ///
    /// At index 0 the cue spans `[0, 1]`. Anywhere else it starts 0.1s after the previous cue
    /// ends and lasts one second.
    pub fn insert(&self, index: usize) -> Result<Captions> {
        if index > self.cues.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.cues.len(),
            });
        }

        let (start, end) = match index.checked_sub(1).map(|prev| self.cues[prev].end()) {
            Some(prev_end) => (
                prev_end + INSERT_GAP_SECONDS,
                prev_end + INSERT_GAP_SECONDS + INSERT_DURATION_SECONDS,
            ),
            None => (Timestamp::ZERO, Timestamp::from_seconds(INSERT_DURATION_SECONDS)),
        };

        let mut next = self.clone();
        let cue = Cue::new(start, end, "");
        debug!(cue_id = %cue.id(), index, "insert cue");
        next.cues.insert(index, cue);
        next.renumber();
        next.revalidate(index);
        next.recheck_overlap(index);
        next.recheck_overlap(index + 1);
        Ok(next)
    }

    /// Insert a new cue directly after the cue with this id.
    pub fn insert_after(&self, id: CueId) -> Result<Captions> {
        let index = self.index_of(id)?;
        self.insert(index + 1)
    }

    pub fn delete(&self, id: CueId) -> Result<Captions> {
        self.delete_many(&[id])
    }

    pub fn delete_many(&self, ids: &[CueId]) -> Result<Captions> {
        let indices = ids
            .iter()
            .map(|id| self.index_of(*id))
            .collect::<Result<Vec<_>>>()?;
        self.delete_indices(&indices)
    }

    /// Remove the cues at `indices` (duplicates are ignored) and renumber the rest.
    pub fn delete_indices(&self, indices: &[usize]) -> Result<Captions> {
        let len = self.cues.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(Error::IndexOutOfRange { index, len });
        }

        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut next = self.clone();
        for &index in sorted.iter().rev() {
            next.cues.remove(index);
        }
        debug!(removed = sorted.len(), remaining = next.cues.len(), "delete cues");
        next.renumber();

        // The cue that slid into each removed slot has a new predecessor.
        for (removed_before, &index) in sorted.iter().enumerate() {
            next.recheck_overlap(index - removed_before);
        }
        Ok(next)
    }

    /// Swap in a previously captured cue sequence verbatim.
    ///
    /// This is state restoration for undo, not an edit: nothing is renumbered or recomputed.
    pub fn replace_all(&self, cues: Vec<Cue>) -> Captions {
        debug!(count = cues.len(), "replace all cues");
        Captions {
            id: self.id,
            cues,
            rules: Arc::clone(&self.rules),
        }
    }

    /// Move the selected endpoint(s) of exactly one cue by `delta` seconds.
    pub fn shift_timestamp(&self, id: CueId, delta: f64, scope: ShiftScope) -> Result<Captions> {
        let index = self.index_of(id)?;
        debug!(cue_id = %id, delta, ?scope, "shift timestamp");

        let mut next = self.clone();
        next.cues[index].shift(scope, delta);
        next.refresh_timing(index);
        Ok(next)
    }

    /// Ripple a timing edit through the rest of the track.
    ///
    /// With `anchor == Start` the target cue moves as a whole and keeps its duration. With
    /// `anchor == End` only the target's start moves, stretching or shrinking it. Either way
    /// every later cue moves by `delta` on both ends, so their durations and spacing are kept.
    pub fn shift_cascade(&self, id: CueId, delta: f64, anchor: Endpoint) -> Result<Captions> {
        let index = self.index_of(id)?;
        debug!(cue_id = %id, delta, ?anchor, "cascade shift");

        let target_scope = match anchor {
            Endpoint::Start => ShiftScope::Both,
            Endpoint::End => ShiftScope::Start,
        };

        let mut next = self.clone();
        next.cues[index].shift(target_scope, delta);
        for cue in &mut next.cues[index + 1..] {
            cue.shift(ShiftScope::Both, delta);
        }

        next.recheck_overlap(index);
        next.revalidate(index);
        for i in index + 1..next.cues.len() {
            next.recheck_overlap(i);
        }
        Ok(next)
    }

    /// Move the end of one cue and the start of the next by the same `delta`.
    ///
    /// When the target is the last cue only its end moves.
    pub fn shift_end_and_next_start(&self, id: CueId, delta: f64) -> Result<Captions> {
        let index = self.index_of(id)?;
        debug!(cue_id = %id, delta, "shift end and next start");

        let mut next = self.clone();
        next.cues[index].shift(ShiftScope::End, delta);
        next.refresh_timing(index);
        if let Some(successor) = next.cues.get_mut(index + 1) {
            successor.shift(ShiftScope::Start, delta);
            next.refresh_timing(index + 1);
        }
        Ok(next)
    }

    /// Set one endpoint to an absolute time, e.g. the current playback position.
    pub fn set_time(&self, id: CueId, seconds: f64, endpoint: Endpoint) -> Result<Captions> {
        let index = self.index_of(id)?;
        debug!(cue_id = %id, seconds, ?endpoint, "set time");

        let mut next = self.clone();
        next.cues[index].set_endpoint(endpoint, Timestamp::from_seconds(seconds));
        next.refresh_timing(index);
        Ok(next)
    }

    /// Commit edited text: normalize it, store it and re-validate the cue.
    pub fn set_text(&self, id: CueId, text: &str) -> Result<Captions> {
        let index = self.index_of(id)?;
        debug!(cue_id = %id, "set text");

        let mut next = self.clone();
        next.cues[index].set_text(normalize_text(text));
        next.revalidate(index);
        Ok(next)
    }

    /// Re-derive state after cue `index` changed timing: its own overlap and validation, and
    /// its successor's overlap.
    fn refresh_timing(&mut self, index: usize) {
        self.recheck_overlap(index);
        self.revalidate(index);
        self.recheck_overlap(index + 1);
    }

    fn recheck_overlap(&mut self, index: usize) {
        if index < self.cues.len() {
            let overlaps = check_overlap(&self.cues, index);
            self.cues[index].set_overlap_prev(overlaps);
        }
    }

    fn revalidate(&mut self, index: usize) {
        if let Some(cue) = self.cues.get(index) {
            let errors = self.rules.evaluate(cue);
            self.cues[index].set_validation_errors(errors);
        }
    }

    fn renumber(&mut self) {
        for (i, cue) in self.cues.iter_mut().enumerate() {
            cue.set_cue_number(i + 1);
        }
    }
}

impl<'a> IntoIterator for &'a Captions {
    type Item = &'a Cue;
    type IntoIter = std::slice::Iter<'a, Cue>;

    fn into_iter(self) -> Self::IntoIter {
        self.cues.iter()
    }
}

/// Whether the cue at `index` overlaps.
///
/// A cue overlaps when it is inverted (start after end) or starts before its immediate
/// predecessor ends. Only the immediate predecessor is considered. An index past the end of
/// `cues` never overlaps.
pub fn check_overlap(cues: &[Cue], index: usize) -> bool {
    let Some(cue) = cues.get(index) else {
        return false;
    };
    if cue.start() > cue.end() {
        return true;
    }
    index
        .checked_sub(1)
        .is_some_and(|prev| cue.start() < cues[prev].end())
}
