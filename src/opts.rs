use serde::{Deserialize, Serialize};

use crate::output_type::OutputType;
use crate::validation::{RuleLimits, RuleSet};

/// How the decoder treats timestamps it cannot parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampParsing {
    /// Fall back to zero and log a warning, matching how existing files in the wild load.
    #[default]
    Lenient,

    /// Abort decoding with [`crate::Error::MalformedTimestamp`].
    Strict,
}

/// Options that control how a caption track is decoded, validated and encoded.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for mapping user input into this type so that
/// other frontends (editors, tests, batch jobs) can construct options programmatically.
/// Every field has a default, so a partial JSON config file is enough.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Opts {
    /// Whether malformed timestamps are tolerated while decoding.
    pub timestamp_parsing: TimestampParsing,

    /// Thresholds for the standard validation rules.
    pub limits: RuleLimits,

    /// The desired output format when writing a track.
    pub output_type: OutputType,
}

impl Opts {
    /// The standard rule set built from `limits`.
    pub fn rule_set(&self) -> RuleSet {
        RuleSet::from_limits(&self.limits)
    }
}
