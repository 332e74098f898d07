//! CF-style time units: `<unit> since <epoch>`
//!
//! A time coordinate variable stores plain numbers; its `units` attribute
//! says what they count and from when. [`TimeUnits`] is the parsed form and
//! turns offsets back into calendar dates.

use crate::errors::{NcBrowseError, Result};
use crate::metadata::Variable;
use chrono::{Months, NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const UNITS_PATTERN: &str = r"^(.*) since (.*)$";

const ATTR_UNITS: &str = "units";
const ATTR_CALENDAR: &str = "calendar";

/// Calendars whose date arithmetic matches the proleptic Gregorian rules used here
const GREGORIAN_CALENDARS: [&str; 4] = ["standard", "gregorian", "proleptic_gregorian", "none"];

/// Trailing zone markers meaning UTC, matched ignoring case. Longer offsets
/// come before their prefixes.
const UTC_SUFFIXES: [&str; 8] = ["utc", "gmt", "+00:00", "-00:00", "+0:00", "+0000", "+00", "z"];

/// Epoch layouts, tried in order after an optional UTC suffix is stripped
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Unit in which time offsets are expressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delta {
    Seconds,
    Minutes,
    Hours,
    Days,
    Months,
    Years,
}

impl Delta {
    /// Length in seconds for the fixed-length units
    fn seconds(self) -> Option<f64> {
        match self {
            Delta::Seconds => Some(1.0),
            Delta::Minutes => Some(60.0),
            Delta::Hours => Some(3_600.0),
            Delta::Days => Some(86_400.0),
            Delta::Months | Delta::Years => None,
        }
    }
}

impl FromStr for Delta {
    type Err = NcBrowseError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "seconds" => Ok(Delta::Seconds),
            "minutes" => Ok(Delta::Minutes),
            "hours" => Ok(Delta::Hours),
            "days" => Ok(Delta::Days),
            "months" => Ok(Delta::Months),
            "years" => Ok(Delta::Years),
            _ => Err(NcBrowseError::parse(
                s,
                "unknown time unit, expected seconds, minutes, hours, days, months or years",
            )),
        }
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Delta::Seconds => "seconds",
            Delta::Minutes => "minutes",
            Delta::Hours => "hours",
            Delta::Days => "days",
            Delta::Months => "months",
            Delta::Years => "years",
        };
        f.write_str(name)
    }
}

/// Decoding rule for one time dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeUnits {
    pub epoch: NaiveDateTime,
    pub delta: Delta,
    /// Name of the temporal dimension these units belong to
    pub dimension: String,
}

impl TimeUnits {
    /// Parses a `units` string such as `"hours since 1970-01-01 00:00:00"`.
    pub fn parse(units: &str, dimension: &str) -> Result<Self> {
        let captures = units_regex()?
            .captures(units)
            .ok_or_else(|| NcBrowseError::parse(units, "expected '<unit> since <epoch>'"))?;

        let delta: Delta = captures[1].parse()?;
        let epoch = parse_epoch(&captures[2])?;

        Ok(Self {
            epoch,
            delta,
            dimension: dimension.to_string(),
        })
    }

    /// Reads the `units` and `calendar` attributes of a time coordinate variable.
    ///
    /// `calendar` must be present. Its value is not interpreted; non-Gregorian
    /// calendars are decoded as Gregorian with a warning.
    pub fn from_coordinate(coordinate: &Variable) -> Result<Self> {
        let units = coordinate.attribute(ATTR_UNITS).ok_or_else(|| {
            NcBrowseError::parse(
                &coordinate.name,
                format!("time variable has no '{}' attribute", ATTR_UNITS),
            )
        })?;
        let calendar = coordinate.attribute(ATTR_CALENDAR).ok_or_else(|| {
            NcBrowseError::parse(
                &coordinate.name,
                format!("time variable has no '{}' attribute", ATTR_CALENDAR),
            )
        })?;
        if !GREGORIAN_CALENDARS
            .iter()
            .any(|c| c.eq_ignore_ascii_case(calendar.trim()))
        {
            log::warn!(
                "Calendar '{}' of '{}' is not supported, decoding as Gregorian",
                calendar,
                coordinate.name
            );
        }

        Self::parse(units, &coordinate.name)
    }

    /// Date at `offset` units past the epoch.
    ///
    /// Seconds to days keep the fractional part. Months and years are
    /// truncated to whole units first.
    pub fn date_at(&self, offset: f64) -> Result<NaiveDateTime> {
        if !offset.is_finite() {
            return Err(self.out_of_range(offset));
        }

        let date = match self.delta.seconds() {
            Some(unit_seconds) => {
                let micros = (offset * unit_seconds * 1e6).round();
                if micros.abs() >= i64::MAX as f64 {
                    return Err(self.out_of_range(offset));
                }
                self.epoch
                    .checked_add_signed(TimeDelta::microseconds(micros as i64))
            }
            None => {
                let whole = offset.trunc();
                let months = if self.delta == Delta::Years {
                    whole * 12.0
                } else {
                    whole
                };
                if months.abs() > u32::MAX as f64 {
                    return Err(self.out_of_range(offset));
                }
                let step = Months::new(months.abs() as u32);
                if months < 0.0 {
                    self.epoch.checked_sub_months(step)
                } else {
                    self.epoch.checked_add_months(step)
                }
            }
        };

        date.ok_or_else(|| self.out_of_range(offset))
    }

    /// Decodes every offset, keeping order.
    pub fn decode(&self, offsets: &[f64]) -> Result<Vec<NaiveDateTime>> {
        offsets.iter().map(|&v| self.date_at(v)).collect()
    }

    fn out_of_range(&self, offset: f64) -> NcBrowseError {
        NcBrowseError::parse(
            offset.to_string(),
            format!(
                "offset of '{}' cannot be represented as a date ({} since {})",
                self.dimension, self.delta, self.epoch
            ),
        )
    }
}

/// Compiled `<unit> since <epoch>` pattern, shared by every parse
fn units_regex() -> Result<&'static Regex> {
    static UNITS_REGEX: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    UNITS_REGEX
        .get_or_init(|| Regex::new(UNITS_PATTERN))
        .as_ref()
        .map_err(|e| NcBrowseError::Internal(format!("invalid units pattern: {}", e)))
}

fn strip_suffix_ignore_case<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let split = text.len().checked_sub(suffix.len())?;
    if !text.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = text.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Parses an epoch timestamp, independent of locale.
///
/// A trailing UTC marker or zero offset is dropped. Any other offset is
/// rejected since epochs are decoded without a zone.
fn parse_epoch(text: &str) -> Result<NaiveDateTime> {
    let trimmed = text.trim();
    let stripped = UTC_SUFFIXES
        .iter()
        .find_map(|suffix| strip_suffix_ignore_case(trimmed, suffix))
        .unwrap_or(trimmed)
        .trim_end();

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(stripped, format) {
            return Ok(dt);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(stripped, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN));
    }

    Err(NcBrowseError::parse(text, "epoch is not a valid date-time"))
}
