//! Elapsed time with nanosecond precision and a human-readable rendering.
//!
//! A [`Duration`] is measured once per traced call, between the moment the wrapped
//! function is invoked and the moment it returns or fails.
//!
//! # Examples
//!
//! ```
//! use functrace::Duration;
//!
//! let elapsed = Duration::from_nanoseconds(1_200).unwrap();
//! assert_eq!(elapsed.format(), "1 microsecond, 200 nanoseconds");
//! ```

use crate::error::{FunctraceError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const NANOS_PER_MICROSECOND: i64 = 1_000;
const NANOS_PER_MILLISECOND: i64 = 1_000 * NANOS_PER_MICROSECOND;
const NANOS_PER_SECOND: i64 = 1_000 * NANOS_PER_MILLISECOND;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i64 = 24 * NANOS_PER_HOUR;

/// Supported units, largest first
const UNITS: [(&str, i64); 7] = [
    ("day", NANOS_PER_DAY),
    ("hour", NANOS_PER_HOUR),
    ("minute", NANOS_PER_MINUTE),
    ("second", NANOS_PER_SECOND),
    ("millisecond", NANOS_PER_MILLISECOND),
    ("microsecond", NANOS_PER_MICROSECOND),
    ("nanosecond", 1),
];

/// Options for [`Duration::format_with`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationFormat {
    /// Maximum number of units to print, largest first. `None` prints all of them.
    pub max_units: Option<usize>,
    /// String placed between units
    pub separator: String,
    /// Skip units whose count is zero
    pub ignore_zeros: bool,
}

impl Default for DurationFormat {
    fn default() -> Self {
        Self {
            max_units: Some(2),
            separator: ", ".to_string(),
            ignore_zeros: true,
        }
    }
}

/// An elapsed time span, never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Duration {
    nanoseconds: i64,
}

impl Duration {
    pub const ZERO: Duration = Duration { nanoseconds: 0 };

    /// Create a duration from a nanosecond count
    ///
    /// # Errors
    ///
    /// Returns [`FunctraceError::NegativeDuration`] when `nanoseconds` is negative.
    pub fn from_nanoseconds(nanoseconds: i64) -> Result<Self> {
        if nanoseconds < 0 {
            return Err(FunctraceError::NegativeDuration(nanoseconds));
        }
        Ok(Self { nanoseconds })
    }

    /// Number of whole nanoseconds in this span
    pub fn nanoseconds(&self) -> i64 {
        self.nanoseconds
    }

    pub fn as_nanoseconds(&self) -> f64 {
        self.nanoseconds as f64
    }

    pub fn as_microseconds(&self) -> f64 {
        self.nanoseconds as f64 / NANOS_PER_MICROSECOND as f64
    }

    pub fn as_milliseconds(&self) -> f64 {
        self.nanoseconds as f64 / NANOS_PER_MILLISECOND as f64
    }

    pub fn as_seconds(&self) -> f64 {
        self.nanoseconds as f64 / NANOS_PER_SECOND as f64
    }

    pub fn as_minutes(&self) -> f64 {
        self.nanoseconds as f64 / NANOS_PER_MINUTE as f64
    }

    pub fn as_hours(&self) -> f64 {
        self.nanoseconds as f64 / NANOS_PER_HOUR as f64
    }

    pub fn as_days(&self) -> f64 {
        self.nanoseconds as f64 / NANOS_PER_DAY as f64
    }

    /// Convert into a standard library duration
    pub fn as_std(&self) -> std::time::Duration {
        std::time::Duration::from_nanos(self.nanoseconds.unsigned_abs())
    }

    /// Render the two largest non-zero units, e.g. `"1 microsecond, 200 nanoseconds"`
    ///
    /// A zero span renders as `"0 nanoseconds"`.
    pub fn format(&self) -> String {
        self.format_with(&DurationFormat::default())
    }

    /// Render with custom options
    ///
    /// # Arguments
    ///
    /// * `options` - Unit limit, separator and zero handling
    pub fn format_with(&self, options: &DurationFormat) -> String {
        let counts = self.unit_counts();

        let parts: Vec<(i64, &str)> = if options.ignore_zeros {
            counts.into_iter().filter(|(count, _)| *count != 0).collect()
        } else {
            counts.into_iter().skip_while(|(count, _)| *count == 0).collect()
        };

        let limit = options.max_units.map_or(parts.len(), |max| max.max(1));
        let rendered: Vec<String> = parts
            .into_iter()
            .take(limit)
            .map(|(count, unit)| format_unit(count, unit))
            .collect();

        if rendered.is_empty() {
            return format_unit(0, "nanosecond");
        }
        rendered.join(&options.separator)
    }

    /// Greedy decomposition into per-unit counts, largest unit first
    fn unit_counts(&self) -> Vec<(i64, &'static str)> {
        let mut remainder = self.nanoseconds;
        UNITS
            .iter()
            .map(|(unit, size)| {
                let count = remainder / size;
                remainder %= size;
                (count, *unit)
            })
            .collect()
    }
}

fn format_unit(count: i64, unit: &str) -> String {
    let plural = if count != 1 { "s" } else { "" };
    format!("{} {}{}", count, unit, plural)
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl From<std::time::Duration> for Duration {
    /// Saturates at `i64::MAX` nanoseconds (roughly 292 years)
    fn from(value: std::time::Duration) -> Self {
        Self {
            nanoseconds: i64::try_from(value.as_nanos()).unwrap_or(i64::MAX),
        }
    }
}

impl TryFrom<i64> for Duration {
    type Error = FunctraceError;

    fn try_from(nanoseconds: i64) -> Result<Self> {
        Self::from_nanoseconds(nanoseconds)
    }
}

impl From<Duration> for i64 {
    fn from(value: Duration) -> Self {
        value.nanoseconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn duration(nanoseconds: i64) -> Duration {
        Duration::from_nanoseconds(nanoseconds).unwrap()
    }

    #[test]
    fn test_zero_formats_as_nanoseconds() {
        assert_eq!(duration(0).format(), "0 nanoseconds");
        assert_eq!(Duration::ZERO.format(), "0 nanoseconds");
    }

    #[test]
    fn test_two_units() {
        assert_eq!(duration(1_200).format(), "1 microsecond, 200 nanoseconds");
    }

    #[test]
    fn test_exact_minute_has_single_unit() {
        assert_eq!(duration(60_000_000_000).format(), "1 minute");
    }

    #[test]
    fn test_singular_and_plural() {
        assert_eq!(duration(1).format(), "1 nanosecond");
        assert_eq!(duration(2).format(), "2 nanoseconds");
        assert_eq!(duration(2 * NANOS_PER_DAY + NANOS_PER_HOUR).format(), "2 days, 1 hour");
    }

    #[test]
    fn test_only_largest_two_units_are_kept() {
        let elapsed = duration(NANOS_PER_HOUR + 2 * NANOS_PER_MINUTE + 3 * NANOS_PER_SECOND);
        assert_eq!(elapsed.format(), "1 hour, 2 minutes");
    }

    #[test]
    fn test_zero_units_between_are_skipped() {
        let elapsed = duration(NANOS_PER_HOUR + 5);
        assert_eq!(elapsed.format(), "1 hour, 5 nanoseconds");
    }

    #[test]
    fn test_negative_is_rejected() {
        let err = Duration::from_nanoseconds(-1).unwrap_err();
        assert_eq!(err, FunctraceError::NegativeDuration(-1));
    }

    #[test]
    fn test_format_with_all_units() {
        let elapsed = duration(NANOS_PER_HOUR + 2 * NANOS_PER_MINUTE + 3 * NANOS_PER_SECOND);
        let options = DurationFormat {
            max_units: None,
            ..Default::default()
        };
        assert_eq!(elapsed.format_with(&options), "1 hour, 2 minutes, 3 seconds");
    }

    #[test]
    fn test_format_with_zeros_and_separator() {
        let elapsed = duration(2 * NANOS_PER_MINUTE + 3 * NANOS_PER_SECOND);
        let options = DurationFormat {
            max_units: None,
            separator: " | ".to_string(),
            ignore_zeros: false,
        };
        assert_eq!(
            elapsed.format_with(&options),
            "2 minutes | 3 seconds | 0 milliseconds | 0 microseconds | 0 nanoseconds"
        );
    }

    #[test]
    fn test_unit_accessors() {
        let elapsed = duration(NANOS_PER_SECOND);
        assert_eq!(elapsed.as_nanoseconds(), 1e9);
        assert_eq!(elapsed.as_microseconds(), 1e6);
        assert_eq!(elapsed.as_milliseconds(), 1e3);
        assert_eq!(elapsed.as_seconds(), 1.0);
        assert_eq!(elapsed.as_minutes(), 1.0 / 60.0);
        assert_eq!(elapsed.as_hours(), 1.0 / 3600.0);
        assert_eq!(elapsed.as_days(), 1.0 / 86400.0);
    }

    #[test]
    fn test_std_conversions() {
        let elapsed = Duration::from(std::time::Duration::from_micros(3));
        assert_eq!(elapsed.nanoseconds(), 3_000);
        assert_eq!(elapsed.as_std(), std::time::Duration::from_micros(3));

        let saturated = Duration::from(std::time::Duration::MAX);
        assert_eq!(saturated.nanoseconds(), i64::MAX);
    }

    #[test]
    fn test_display_matches_format() {
        assert_eq!(duration(1_500_000).to_string(), "1 millisecond, 500 microseconds");
    }

    #[test]
    fn test_serde_as_nanoseconds() {
        let json = serde_json::to_string(&duration(42)).unwrap();
        assert_eq!(json, "42");

        let parsed: Duration = serde_json::from_str("1200").unwrap();
        assert_eq!(parsed, duration(1_200));

        assert!(serde_json::from_str::<Duration>("-3").is_err());
    }
}
