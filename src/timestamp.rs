//! Fixed-point cue timestamps.
//!
//! A `Timestamp` is a plain number of seconds. It may go negative through shifts; we never clamp.
//! The text form is the WebVTT `HH:MM:SS.mmm` layout, with the hour field growing past two
//! digits when needed.

use std::fmt;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{Error, Result};

/// Float noise tolerated when converting seconds to whole milliseconds.
///
/// `1.001 * 1000.0` is `1000.9999999999999`, which would truncate to the wrong millisecond.
const MILLIS_EPSILON: f64 = 1e-6;

/// A point on the caption timeline, in seconds.
///
/// Ordering and equality compare `value` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp {
    value: f64,
}

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp { value: 0.0 };

    pub fn from_seconds(value: f64) -> Self {
        Self { value }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Return a new timestamp moved by `delta` seconds.
    pub fn add(self, delta: f64) -> Self {
        Self {
            value: self.value + delta,
        }
    }

    /// Parse `[HH:]MM:SS(.|,)mmm`, failing on anything else.
    pub fn parse(text: &str) -> Result<Self> {
        parse_seconds(text)
            .map(Self::from_seconds)
            .ok_or_else(|| Error::malformed_timestamp(text))
    }

    /// Parse like [`Timestamp::parse`], but fall back to zero on malformed input.
    ///
    /// This mirrors how existing editors treat corrupt cue timings, so files in the wild still
    /// load. The fallback is reported through `tracing` rather than swallowed.
    pub fn parse_lenient(text: &str) -> Self {
        match Self::parse(text) {
            Ok(ts) => ts,
            Err(_) => {
                warn!(input = text, "malformed timestamp, falling back to zero");
                Self::ZERO
            }
        }
    }

    /// The `HH:MM:SS.mmm` rendering of this timestamp.
    pub fn format(&self) -> String {
        format_seconds(self.value)
    }
}

impl Add<f64> for Timestamp {
    type Output = Timestamp;

    fn add(self, delta: f64) -> Timestamp {
        Timestamp::add(self, delta)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

fn parse_seconds(text: &str) -> Option<f64> {
    let text = text.trim().replace(',', ".");
    let (sign, text) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.as_str()),
    };
    if !text.contains(':') {
        return None;
    }

    // Decimal separator first, then the `:` groups of the integer part.
    let (hms, millis) = text.split_once('.')?;
    let millis: f64 = millis.parse().ok()?;

    let mut groups: Vec<&str> = hms.split(':').collect();
    if groups.len() > 3 {
        return None;
    }
    let seconds: f64 = groups.pop()?.parse().ok()?;
    let minutes: f64 = groups.pop()?.parse().ok()?;
    let hours: f64 = match groups.pop() {
        Some(h) => h.parse().ok()?,
        None => 0.0,
    };

    let value = sign * (hours * 3600.0 + minutes * 60.0 + seconds + millis / 1000.0);
    value.is_finite().then_some(value)
}

/// Format seconds as `HH:MM:SS.mmm`.
///
/// Milliseconds are truncated, not rounded. Negative values render as the formatted magnitude
/// with a leading `-`.
fn format_seconds(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let total_ms = (seconds.abs() * 1000.0 + MILLIS_EPSILON).trunc() as u64;

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    let s = total_s % 60;
    let total_m = total_s / 60;

    let m = total_m % 60;
    let h = total_m / 60;

    format!("{sign}{h:02}:{m:02}:{s:02}.{ms:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn parses_full_and_short_forms() -> anyhow::Result<()> {
        assert!(approx(Timestamp::parse("01:02:03.456")?.value(), 3723.456));
        assert!(approx(Timestamp::parse("02:03.456")?.value(), 123.456));
        assert!(approx(Timestamp::parse(" 00:00:01,500 ")?.value(), 1.5));
        Ok(())
    }

    #[test]
    fn strict_parse_rejects_garbage() {
        for bad in ["garbage", "00:01", "12.5", "", "aa:bb.ccc", "1:2:3:4.000"] {
            let err = Timestamp::parse(bad).unwrap_err();
            assert!(matches!(err, Error::MalformedTimestamp { .. }), "{bad}");
        }
    }

    #[test]
    fn lenient_parse_falls_back_to_zero() {
        assert_eq!(Timestamp::parse_lenient("garbage").value(), 0.0);
        assert_eq!(Timestamp::parse_lenient("").value(), 0.0);
    }

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(Timestamp::from_seconds(0.0).format(), "00:00:00.000");
        assert_eq!(Timestamp::from_seconds(61.2).format(), "00:01:01.200");
        assert_eq!(Timestamp::from_seconds(3723.456).format(), "01:02:03.456");
    }

    #[test]
    fn format_truncates_milliseconds() {
        assert_eq!(Timestamp::from_seconds(1.0019).format(), "00:00:01.001");
        assert_eq!(Timestamp::from_seconds(1.001).format(), "00:00:01.001");
    }

    #[test]
    fn format_grows_hour_field_past_two_digits() {
        assert_eq!(
            Timestamp::from_seconds(360_000.5).format(),
            "100:00:00.500"
        );
    }

    #[test]
    fn negative_values_render_with_a_sign() -> anyhow::Result<()> {
        assert_eq!(Timestamp::from_seconds(-1.5).format(), "-00:00:01.500");
        assert!(approx(Timestamp::parse("-00:00:01.500")?.value(), -1.5));
        Ok(())
    }

    #[test]
    fn format_then_parse_is_stable_at_millisecond_precision() -> anyhow::Result<()> {
        for v in [0.0, 0.001, 1.001, 59.999, 3599.999, 86_400.123, 359_999.999] {
            let back = Timestamp::parse(&Timestamp::from_seconds(v).format())?;
            assert!((back.value() - v).abs() < 1e-6, "{v} -> {}", back.value());
        }
        Ok(())
    }

    #[test]
    fn ordering_and_arithmetic_use_value() {
        let a = Timestamp::from_seconds(1.0);
        let b = a + 0.5;
        assert!(a < b);
        assert!(b > a);
        assert_eq!(b.value(), 1.5);
        assert_eq!(a.add(-2.0).value(), -1.0);
    }
}
