//! GNU Time `--verbose` log parsing
//!
//! GNU Time writes one `Key: Value` pair per line, indented with a tab:
//!
//! ```text
//!     Command being timed: "make -j4"
//!     User time (seconds): 12.01
//!     Elapsed (wall clock) time (h:mm:ss or m:ss): 1:02.50
//!     Exit status: 0
//! ```
//!
//! Only the first `": "` on a line separates key from value; values may
//! contain further colons. A repeated key keeps its last value.

use crate::error::{GnuTimeError, Result};
use chrono::Duration;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

pub const EXIT_STATUS_KEY: &str = "Exit status";
pub const ELAPSED_KEY: &str = "Elapsed (wall clock) time (h:mm:ss or m:ss)";

/// Microseconds per hundredth of a second
const MICROS_PER_CENTISECOND: i64 = 10_000;

fn seconds_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d+)(?:\.(\d*))?$").expect("static pattern"))
}

/// Key/value contents of one GNU Time log
#[derive(Debug, Clone, Default)]
pub struct TimeLog {
    entries: HashMap<String, String>,
}

impl TimeLog {
    /// Read and parse a log file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| GnuTimeError::io(path, e))?;
        Ok(Self::parse(&contents))
    }

    /// Parse log text
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| match line.split_once(": ") {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (line.to_string(), String::new()),
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| GnuTimeError::MissingKey(key.to_string()))
    }

    /// The `Exit status` value
    pub fn exit_status(&self) -> Result<i64> {
        let raw = self.require(EXIT_STATUS_KEY)?;
        raw.trim()
            .parse()
            .map_err(|_| GnuTimeError::InvalidExitStatus(raw.to_string()))
    }

    /// The elapsed wall clock time
    pub fn elapsed(&self) -> Result<ElapsedTime> {
        self.require(ELAPSED_KEY)?.parse()
    }
}

/// Elapsed wall clock time, with hours folded into minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedTime {
    pub minutes: i64,
    pub seconds: i64,
    pub microseconds: i64,
}

impl ElapsedTime {
    /// Parse `m:ss.cc` or `h:mm:ss[.cc]`.
    ///
    /// The fraction is hundredths of a second and must be exactly two digits.
    /// GNU Time omits it once a run passes an hour; absent means zero.
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = |reason: String| GnuTimeError::MalformedElapsed {
            value: text.to_string(),
            reason,
        };

        let fields: Vec<&str> = text.trim().split(':').collect();
        let (hours, minutes, seconds) = match fields.as_slice() {
            [m, s] => (None, *m, *s),
            [h, m, s] => (Some(*h), *m, *s),
            _ => {
                return Err(malformed(format!(
                    "expected 2 or 3 colon-separated fields, found {}",
                    fields.len()
                )))
            }
        };

        let whole = |name: &str, field: &str| -> Result<i64> {
            if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed(format!("{} field {:?} is not a number", name, field)));
            }
            field
                .parse()
                .map_err(|_| malformed(format!("{} field {:?} is out of range", name, field)))
        };

        let mut total_minutes = whole("minutes", minutes)?;
        if let Some(hours) = hours {
            total_minutes = whole("hours", hours)?
                .checked_mul(60)
                .and_then(|m| m.checked_add(total_minutes))
                .ok_or_else(|| malformed(format!("hours field {:?} is out of range", hours)))?;
        }

        let caps = seconds_pattern()
            .captures(seconds)
            .ok_or_else(|| malformed(format!("seconds field {:?} is not a number", seconds)))?;
        let whole_seconds = whole("seconds", &caps[1])?;
        let microseconds = match caps.get(2).map(|m| m.as_str()) {
            None => 0,
            Some(frac) if frac.len() == 2 => whole("fraction", frac)? * MICROS_PER_CENTISECOND,
            Some(frac) => {
                return Err(malformed(format!(
                    "fraction {:?} must be exactly two digits (hundredths)",
                    frac
                )))
            }
        };

        Ok(Self {
            minutes: total_minutes,
            seconds: whole_seconds,
            microseconds,
        })
    }

    /// Total span, failing if it exceeds what a duration can hold
    pub fn to_duration(&self) -> Result<Duration> {
        Duration::try_minutes(self.minutes)
            .zip(Duration::try_seconds(self.seconds))
            .and_then(|(m, s)| m.checked_add(&s))
            .and_then(|d| d.checked_add(&Duration::microseconds(self.microseconds)))
            .ok_or_else(|| GnuTimeError::MalformedElapsed {
                value: format!("{}:{:02}", self.minutes, self.seconds),
                reason: "duration out of range".to_string(),
            })
    }
}

impl std::str::FromStr for ElapsedTime {
    type Err = GnuTimeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
