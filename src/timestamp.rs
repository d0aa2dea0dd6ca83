//! ISO-8601 timestamps
//!
//! Accepts the shapes GNU Time wrappers and done-logs commonly carry
//! (`2024-01-01`, `2024-01-01T00:10:00`, `2024-01-01 00:10:00.25Z`,
//! `2024-01-01T00:10:00+0530`, ...) and renders them back in the canonical
//! `YYYY-MM-DDTHH:MM:SS[.ffffff][+HH:MM]` form used for `xsd:dateTime`
//! literals. The fractional part is printed only when non-zero and always as
//! six digits; the offset is printed only for offset-aware values.
//!
//! Arithmetic is done on wall-clock fields and keeps the original offset.

use crate::error::{GnuTimeError, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S%.f",
];

/// A point in time, optionally anchored to a UTC offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    local: NaiveDateTime,
    offset: Option<FixedOffset>,
}

impl Timestamp {
    /// Parse an ISO-8601 string. Surrounding whitespace is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = |reason: &str| GnuTimeError::InvalidTimestamp {
            value: text.to_string(),
            reason: reason.to_string(),
        };

        if text.is_empty() {
            return Err(invalid("empty string"));
        }
        if text.trim() != text {
            return Err(invalid("leading or trailing whitespace"));
        }

        let (body, offset) = split_offset(text).ok_or_else(|| invalid("bad UTC offset"))?;

        let local = if body.len() == 10 {
            NaiveDate::parse_from_str(body, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        } else {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(body, fmt).ok())
        }
        .ok_or_else(|| invalid("unrecognised date/time layout"))?;

        // chrono stores second 60 as an overflowing nanosecond field
        if local.nanosecond() >= 1_000_000_000 {
            return Err(invalid("second must be in 0..=59"));
        }

        Ok(Self {
            local: truncate_to_micros(local),
            offset,
        })
    }

    /// UTC-aware timestamp for a filesystem time
    pub fn from_system_time(time: SystemTime) -> Self {
        let utc: DateTime<Utc> = time.into();
        Self {
            local: truncate_to_micros(utc.naive_utc()),
            offset: FixedOffset::east_opt(0),
        }
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        self.offset
    }

    pub fn is_aware(&self) -> bool {
        self.offset.is_some()
    }

    /// Wall-clock subtraction, preserving the offset
    pub fn checked_sub(&self, delta: Duration) -> Result<Self> {
        let local = self
            .local
            .checked_sub_signed(delta)
            .ok_or_else(|| GnuTimeError::InvalidTimestamp {
                value: self.to_string(),
                reason: format!("subtracting {} leaves the representable range", delta),
            })?;
        Ok(Self {
            local,
            offset: self.offset,
        })
    }

    /// Canonical ISO-8601 rendering
    pub fn isoformat(&self) -> String {
        let mut out = self.local.format("%Y-%m-%dT%H:%M:%S").to_string();
        let micros = self.local.nanosecond() / 1_000;
        if micros != 0 {
            out.push_str(&format!(".{:06}", micros));
        }
        if let Some(offset) = self.offset {
            out.push_str(&format_offset(offset));
        }
        out
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.isoformat())
    }
}

impl FromStr for Timestamp {
    type Err = GnuTimeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn truncate_to_micros(dt: NaiveDateTime) -> NaiveDateTime {
    let nanos = dt.nanosecond();
    dt.with_nanosecond(nanos - nanos % 1_000).unwrap_or(dt)
}

fn format_offset(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if seconds == 0 {
        format!("{}{:02}:{:02}", sign, hours, minutes)
    } else {
        format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
    }
}

/// Split a trailing `Z` / `±HH[:MM]` / `±HHMM` designator off the date-time text.
///
/// Returns `None` when a designator is present but malformed.
fn split_offset(text: &str) -> Option<(&str, Option<FixedOffset>)> {
    if let Some(body) = text.strip_suffix(['Z', 'z']) {
        return Some((body, FixedOffset::east_opt(0)));
    }

    // Offsets can only follow the time part, which starts after the 10-char date.
    let Some(pos) = text
        .char_indices()
        .skip(10)
        .filter(|(_, c)| *c == '+' || *c == '-')
        .map(|(i, _)| i)
        .last()
    else {
        return Some((text, None));
    };

    let (body, designator) = text.split_at(pos);
    let sign = if designator.starts_with('-') { -1 } else { 1 };
    let digits: String = designator[1..].chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))?;
    Some((body, Some(offset)))
}
