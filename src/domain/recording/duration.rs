//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default safety limit for a single recording (30 minutes)
pub const DEFAULT_MAX_DURATION_SECS: u64 = 30 * 60;

/// Default cadence of capture/playback status callbacks
pub const DEFAULT_STATUS_INTERVAL_MS: u64 = 250;

/// Value object representing a time duration.
/// Immutable and validated on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Zero-length duration
    pub const ZERO: Self = Self::from_millis(0);

    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds, saturating at u64::MAX milliseconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs.saturating_mul(1000),
        }
    }

    /// Like [`from_secs`](Self::from_secs), but `None` on overflow
    const fn checked_from_secs(secs: u64) -> Option<Self> {
        match secs.checked_mul(1000) {
            Some(milliseconds) => Some(Self { milliseconds }),
            None => None,
        }
    }

    /// Default max recording duration
    pub const fn default_max_duration() -> Self {
        Self::from_secs(DEFAULT_MAX_DURATION_SECS)
    }

    /// Default status callback interval
    pub const fn default_status_interval() -> Self {
        Self::from_millis(DEFAULT_STATUS_INTERVAL_MS)
    }

    /// Get duration in whole seconds (truncated)
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in seconds rounded to the nearest second
    pub const fn as_rounded_secs(&self) -> u64 {
        self.milliseconds.saturating_add(500) / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }

    /// Create from a std::time::Duration, saturating at u64::MAX milliseconds
    pub fn from_std(duration: StdDuration) -> Self {
        Self::from_millis(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
    }

    pub const fn is_zero(&self) -> bool {
        self.milliseconds == 0
    }

    /// Clamp into `[0, max]`
    pub fn clamp_to(self, max: Self) -> Self {
        if self.milliseconds > max.milliseconds {
            max
        } else {
            self
        }
    }

    /// Format as a `m:ss` clock, seconds rounded to the nearest second.
    pub fn format_clock(&self) -> String {
        let total = self.as_rounded_secs();
        format!("{}:{:02}", total / 60, total % 60)
    }

    /// Parse a playback position.
    ///
    /// Accepts clock text (`"1:05"`), a bare number of seconds (`"65"`) or a
    /// unit string (`"1m5s"`, `"500ms"`). Zero is allowed.
    pub fn parse_position(s: &str) -> Result<Self, DurationParseError> {
        let input = s.trim();
        let err = || DurationParseError {
            input: s.to_string(),
        };

        if let Some((minutes, seconds)) = input.split_once(':') {
            let minutes: u64 = minutes.parse().map_err(|_| err())?;
            let seconds: u64 = seconds.parse().map_err(|_| err())?;
            if seconds >= 60 || seconds_len(input) != 2 {
                return Err(err());
            }
            return minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .and_then(Self::checked_from_secs)
                .ok_or_else(err);
        }

        if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit()) {
            let secs: u64 = input.parse().map_err(|_| err())?;
            return Self::checked_from_secs(secs).ok_or_else(err);
        }

        parse_units(s)
    }
}

/// Number of characters after the clock separator
fn seconds_len(input: &str) -> usize {
    input
        .split_once(':')
        .map(|(_, secs)| secs.len())
        .unwrap_or(0)
}

/// Parse `<n>m`, `<n>s`, `<n>ms` tokens, in any combination.
fn parse_units(s: &str) -> Result<Duration, DurationParseError> {
    let input = s.trim().to_lowercase();
    let err = || DurationParseError {
        input: s.to_string(),
    };

    let mut total_ms: u64 = 0;
    let mut current_num = String::new();
    let mut found_any = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch.is_ascii_digit() {
            current_num.push(ch);
            continue;
        }
        if current_num.is_empty() {
            return Err(err());
        }
        let value: u64 = current_num.parse().map_err(|_| err())?;
        let factor = match ch {
            'm' if chars.peek() == Some(&'s') => {
                chars.next();
                1
            }
            'm' => 60_000,
            's' => 1000,
            _ => return Err(err()),
        };
        total_ms = value
            .checked_mul(factor)
            .and_then(|v| total_ms.checked_add(v))
            .ok_or_else(err)?;
        current_num.clear();
        found_any = true;
    }

    // Leftover digits without a unit
    if !current_num.is_empty() || !found_any {
        return Err(err());
    }

    Ok(Duration::from_millis(total_ms))
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a non-zero duration string.
    /// Supported formats: "30s", "1m", "2m30s", "90s", "250ms"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let duration = parse_units(s)?;
        if duration.is_zero() {
            return Err(DurationParseError { input: s.to_string() });
        }
        Ok(duration)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.milliseconds % 1000 != 0 {
            return write!(f, "{}ms", self.milliseconds);
        }

        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}
