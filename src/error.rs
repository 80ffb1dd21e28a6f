use std::error::Error as StdError;

use thiserror::Error;

use crate::cue::CueId;

/// The crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream hosts aren't forced to
/// adopt `anyhow` in their own public APIs.
#[derive(Debug, Error)]
pub enum Error {
    /// A timestamp string did not match `[HH:]MM:SS(.|,)mmm`.
    #[error("malformed timestamp: '{input}'")]
    MalformedTimestamp { input: String },

    /// An operation targeted a cue id that is not part of the sequence.
    #[error("cue not found: {0}")]
    UnknownCueId(CueId),

    /// An index-based operation was given a position past the end of the sequence.
    #[error("index {index} is out of range for {len} cues")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Other(#[from] Box<dyn StdError + Send + Sync>),
}

impl Error {
    pub(crate) fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }

    pub(crate) fn malformed_timestamp(input: impl Into<String>) -> Self {
        Self::MalformedTimestamp {
            input: input.into(),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Message(format!("{err:#}"))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(Box::new(err))
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Self::Other(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anyhow_errors_keep_their_context_chain() {
        let err: Error = anyhow::anyhow!("inner").context("outer").into();
        assert_eq!(err.to_string(), "outer: inner");
    }

    #[test]
    fn index_out_of_range_reports_both_numbers() {
        let err = Error::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 is out of range for 3 cues");
    }
}
