//! Subtitle style rules evaluated against each cue.
//!
//! Rules are advisory: a violation never blocks an edit, it is only recorded on the cue so the
//! host can surface it. The active rules live in a [`RuleSet`] that is handed to
//! [`crate::captions::Captions`] at construction, so thresholds can be swapped in tests or per
//! house style.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cue::Cue;

pub const CHARACTER_LIMIT_ID: &str = "I.1";
pub const LINE_COUNT_ID: &str = "I.10";
pub const READING_SPEED_ID: &str = "I.14";

const ITALIC_OPEN: &str = "<i>";
const ITALIC_CLOSE: &str = "</i>";

/// Thresholds for the standard rule set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleLimits {
    /// Maximum characters on any single line, markup excluded.
    pub max_line_chars: usize,

    /// Maximum number of lines in a cue.
    pub max_lines: usize,

    /// Maximum reading speed in characters per second.
    pub max_chars_per_second: f64,
}

impl Default for RuleLimits {
    fn default() -> Self {
        Self {
            max_line_chars: 42,
            max_lines: 2,
            max_chars_per_second: 20.0,
        }
    }
}

type Predicate = dyn Fn(&Cue) -> bool + Send + Sync;

/// A single validation rule template.
///
/// `is_violated` returns `true` when the cue breaks the rule.
#[derive(Clone)]
pub struct ValidationRule {
    id: String,
    name: String,
    description: String,
    is_violated: Arc<Predicate>,
}

impl ValidationRule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        is_violated: impl Fn(&Cue) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            is_violated: Arc::new(is_violated),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_violated(&self, cue: &Cue) -> bool {
        (self.is_violated)(cue)
    }
}

impl fmt::Debug for ValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationRule")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// An ordered list of rules, evaluated top to bottom without short-circuiting.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<ValidationRule>,
}

impl RuleSet {
    /// A rule set with no rules; every cue validates clean.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard character-limit, line-count and reading-speed rules with default limits.
    pub fn standard() -> Self {
        Self::from_limits(&RuleLimits::default())
    }

    pub fn from_limits(limits: &RuleLimits) -> Self {
        Self::empty()
            .with_rule(character_limit(limits.max_line_chars))
            .with_rule(line_count(limits.max_lines))
            .with_rule(reading_speed(limits.max_chars_per_second))
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    pub fn get(&self, id: &str) -> Option<&ValidationRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Ids of every rule the cue violates, in rule order.
    pub fn evaluate(&self, cue: &Cue) -> Vec<String> {
        self.rules
            .iter()
            .filter(|rule| rule.is_violated(cue))
            .map(|rule| rule.id.clone())
            .collect()
    }
}

/// Remove the inline italics markup before counting characters.
pub fn strip_markup(text: &str) -> String {
    text.replace(ITALIC_OPEN, "").replace(ITALIC_CLOSE, "")
}

/// `\n`-separated lines of cue text. Empty lines are not counted.
fn lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !line.is_empty())
}

pub fn character_limit(max_line_chars: usize) -> ValidationRule {
    ValidationRule::new(
        CHARACTER_LIMIT_ID,
        "Character Limitation",
        format!("{max_line_chars} characters per line"),
        move |cue| {
            lines(cue.text()).any(|line| strip_markup(line).chars().count() > max_line_chars)
        },
    )
}

pub fn line_count(max_lines: usize) -> ValidationRule {
    ValidationRule::new(
        LINE_COUNT_ID,
        "Line Treatment",
        format!("Maximum {max_lines} lines."),
        move |cue| lines(cue.text()).count() > max_lines,
    )
}

/// Reading speed over the cue's duration.
///
/// A zero or negative duration always counts as too fast.
pub fn reading_speed(max_chars_per_second: f64) -> ValidationRule {
    ValidationRule::new(
        READING_SPEED_ID,
        "Reading Speed Limits",
        format!("Up to {max_chars_per_second} characters per second"),
        move |cue| {
            let duration = cue.duration();
            if duration <= 0.0 {
                return true;
            }
            let chars = strip_markup(cue.text()).chars().count() as f64;
            chars / duration > max_chars_per_second
        },
    )
}
