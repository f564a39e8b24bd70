//! Duration value object used for provider timeouts and retry delays

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default per-call provider timeout (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Value object representing a strictly positive time span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Default ceiling for a single provider call
    pub const fn default_timeout() -> Self {
        Self::from_secs(DEFAULT_TIMEOUT_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl From<Duration> for StdDuration {
    fn from(d: Duration) -> Self {
        d.as_std()
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse strings such as "30s", "1m", "2m30s" or "500ms".
    /// Units must appear in descending order and at most once each.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || DurationParseError {
            input: s.to_string(),
        };
        let input = s.trim().to_lowercase();

        // (suffix, multiplier in ms, rank); "ms" must be tested before "m"
        const UNITS: [(&str, u64, u8); 3] = [("ms", 1, 0), ("m", 60_000, 2), ("s", 1000, 1)];

        let mut rest = input.as_str();
        let mut total: u64 = 0;
        let mut last_rank = u8::MAX;

        while !rest.is_empty() {
            let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 {
                return Err(err());
            }
            let value: u64 = rest[..digits].parse().map_err(|_| err())?;
            rest = &rest[digits..];

            let (suffix, factor, rank) = UNITS
                .iter()
                .copied()
                .find(|(suffix, _, _)| rest.starts_with(suffix))
                .ok_or_else(err)?;
            if rank >= last_rank {
                return Err(err());
            }
            last_rank = rank;
            rest = &rest[suffix.len()..];

            total = value
                .checked_mul(factor)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(err)?;
        }

        if total == 0 {
            return Err(err());
        }

        Ok(Self {
            milliseconds: total,
        })
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

impl Default for Duration {
    fn default() -> Self {
        Self::default_timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds_only() {
        let d: Duration = "30s".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
        assert_eq!(d.as_millis(), 30000);
    }

    #[test]
    fn parse_minutes_and_seconds() {
        let d: Duration = "2m30s".parse().unwrap();
        assert_eq!(d.as_secs(), 150);
    }

    #[test]
    fn parse_millis() {
        let d: Duration = "500ms".parse().unwrap();
        assert_eq!(d.as_millis(), 500);

        let d: Duration = "1s250ms".parse().unwrap();
        assert_eq!(d.as_millis(), 1250);
    }

    #[test]
    fn parse_case_and_whitespace() {
        let d: Duration = "  1M30S ".parse().unwrap();
        assert_eq!(d.as_secs(), 90);
    }

    #[test]
    fn parse_rejects_zero_and_garbage() {
        assert!("".parse::<Duration>().is_err());
        assert!("0s".parse::<Duration>().is_err());
        assert!("30".parse::<Duration>().is_err());
        assert!("30x".parse::<Duration>().is_err());
        assert!("s".parse::<Duration>().is_err());
    }

    #[test]
    fn parse_error_names_every_unit() {
        let message = "soon".parse::<Duration>().unwrap_err().to_string();
        assert!(message.contains("\"soon\""));
        for unit in ["ms", "s", "m"] {
            assert!(message.contains(unit), "missing {unit} in: {message}");
        }
        assert!(message.contains("500ms"));
    }

    #[test]
    fn parse_rejects_out_of_order_units() {
        assert!("30s1m".parse::<Duration>().is_err());
        assert!("1s1s".parse::<Duration>().is_err());
    }

    #[test]
    fn display_round_trips_common_values() {
        assert_eq!(Duration::from_secs(30).to_string(), "30s");
        assert_eq!(Duration::from_secs(120).to_string(), "2m");
        assert_eq!(Duration::from_secs(150).to_string(), "2m30s");
        assert_eq!(Duration::from_millis(750).to_string(), "750ms");
    }

    #[test]
    fn converts_to_std() {
        let std: StdDuration = Duration::from_secs(3).into();
        assert_eq!(std, StdDuration::from_secs(3));
    }

    #[test]
    fn default_timeout_is_one_minute() {
        assert_eq!(Duration::default().as_secs(), 60);
    }
}
