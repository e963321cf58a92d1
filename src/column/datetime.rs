// src/column/datetime.rs

use chrono::format::{ParseErrorKind, Parsed, StrftimeItems};
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use std::fmt::{self, Write};
use std::str::FromStr;
use tracing::trace;

use super::value::{Input, Value};
use crate::error::ConversionError;

pub const DEFAULT_FORMAT: &str = "%Y-%m-%d";

/// Where parsed naive values are localized: a fixed offset such as `+10:00`
/// or a named IANA zone such as `Australia/Sydney`, which follows DST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl Zone {
    /// Pin a wall-clock time to this zone. Times skipped or repeated by a
    /// DST change are errors.
    pub fn localize(
        &self,
        naive: &NaiveDateTime,
    ) -> Result<DateTime<FixedOffset>, ConversionError> {
        let local = match self {
            Zone::Fixed(offset) => offset.from_local_datetime(naive),
            Zone::Named(tz) => tz.from_local_datetime(naive).map(|dt| dt.fixed_offset()),
        };
        match local {
            LocalResult::Single(dt) => Ok(dt),
            LocalResult::None => Err(ConversionError::NonexistentLocalTime {
                raw: naive.to_string(),
                zone: self.to_string(),
            }),
            LocalResult::Ambiguous(..) => Err(ConversionError::AmbiguousLocalTime {
                raw: naive.to_string(),
                zone: self.to_string(),
            }),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Fixed(offset) => write!(f, "{offset}"),
            Zone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

impl FromStr for Zone {
    type Err = String;

    /// Offsets (`+10:00`) first, then IANA names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(offset) = s.parse::<FixedOffset>() {
            return Ok(Zone::Fixed(offset));
        }
        s.parse::<Tz>().map(Zone::Named).map_err(|e| e.to_string())
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Zone::Fixed(offset)
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Zone::Named(tz)
    }
}

/// Input/output formats and optional localization for date and date-time
/// columns. Formats use strftime syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormat {
    primary: String,
    alternates: BTreeSet<String>,
    timezone: Option<Zone>,
}

impl Default for DateTimeFormat {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT)
    }
}

impl DateTimeFormat {
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            alternates: BTreeSet::new(),
            timezone: None,
        }
    }

    /// Add accepted input formats. Output always uses the primary format.
    pub fn with_alternates<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.alternates.extend(formats.into_iter().map(Into::into));
        self
    }

    /// Localize parsed naive values into `zone`.
    pub fn with_timezone(mut self, zone: impl Into<Zone>) -> Self {
        self.timezone = Some(zone.into());
        self
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn timezone(&self) -> Option<Zone> {
        self.timezone
    }

    /// Primary first, then the alternates in sorted order, without repeats.
    pub fn input_formats(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(
            self.alternates
                .iter()
                .map(String::as_str)
                .filter(move |f| *f != self.primary),
        )
    }

    /// Parse into a date-time. Typed date-times pass through untouched and
    /// typed dates become midnight; neither is localized.
    pub(crate) fn parse_datetime(&self, input: Input<'_>) -> Result<Value, ConversionError> {
        let raw = match input {
            Input::Value(v @ (Value::DateTime(_) | Value::Zoned(_))) => return Ok(v),
            Input::Value(Value::Date(d)) => return Ok(Value::DateTime(midnight(d))),
            Input::Value(other) => return Err(mismatch("datetime", &other)),
            Input::Text(s) => s.to_string(),
            Input::Bytes(b) => String::from_utf8_lossy(b).into_owned(),
        };

        for (attempt, format) in self.input_formats().enumerate() {
            if let Some(naive) = parse_with(&raw, format) {
                if attempt > 0 {
                    trace!(raw = %raw, format, "matched alternate format");
                }
                return self.localize(naive);
            }
        }

        Err(ConversionError::NoMatchingFormat {
            raw,
            formats: self.input_formats().map(str::to_string).collect(),
        })
    }

    /// Parse as a date-time, then drop the time of day.
    pub(crate) fn parse_date(&self, input: Input<'_>) -> Result<Value, ConversionError> {
        if let Input::Value(v @ Value::Date(_)) = input {
            return Ok(v);
        }
        match self.parse_datetime(input)? {
            Value::DateTime(dt) => Ok(Value::Date(dt.date())),
            Value::Zoned(dt) => Ok(Value::Date(dt.date_naive())),
            other => Err(mismatch("date", &other)),
        }
    }

    /// Render with the primary format. Dates render as their midnight, so
    /// time fields in the format come out as zeros.
    pub(crate) fn serialize(&self, value: &Value) -> Result<String, ConversionError> {
        let mut out = String::new();
        let written = match value {
            Value::Date(d) => write!(out, "{}", midnight(*d).format(&self.primary)),
            Value::DateTime(dt) => write!(out, "{}", dt.format(&self.primary)),
            Value::Zoned(dt) => write!(out, "{}", dt.format(&self.primary)),
            other => return Err(mismatch("datetime", other)),
        };
        written.map_err(|_| ConversionError::Unformattable {
            format: self.primary.clone(),
        })?;
        Ok(out)
    }

    fn localize(&self, naive: NaiveDateTime) -> Result<Value, ConversionError> {
        match &self.timezone {
            Some(zone) => zone.localize(&naive).map(Value::Zoned),
            None => Ok(Value::DateTime(naive)),
        }
    }
}

/// strptime-like: fields the format leaves out default to 1900-01-01 00:00:00.
fn parse_with(raw: &str, format: &str) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(raw, format) {
        Ok(dt) => Some(dt),
        Err(e) if e.kind() == ParseErrorKind::NotEnough => with_defaults(raw, format),
        Err(_) => None,
    }
}

fn with_defaults(raw: &str, format: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    chrono::format::parse(&mut parsed, raw, StrftimeItems::new(format)).ok()?;

    if parsed.year().is_none() && parsed.year_mod_100().is_none() && parsed.isoyear().is_none() {
        parsed.set_year(1900).ok()?;
    }
    let by_week_or_ordinal = parsed.ordinal().is_some()
        || parsed.week_from_sun().is_some()
        || parsed.week_from_mon().is_some()
        || parsed.isoweek().is_some();
    if !by_week_or_ordinal {
        if parsed.month().is_none() {
            parsed.set_month(1).ok()?;
        }
        if parsed.day().is_none() {
            parsed.set_day(1).ok()?;
        }
    }
    match (parsed.hour_div_12(), parsed.hour_mod_12()) {
        (None, None) => parsed.set_hour(0).ok()?,
        (None, Some(_)) => parsed.set_ampm(false).ok()?,
        _ => {}
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0).ok()?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0).ok()?;
    }

    let date = parsed.to_naive_date().ok()?;
    let time = parsed.to_naive_time().ok()?;
    Some(date.and_time(time))
}

fn midnight(d: NaiveDate) -> NaiveDateTime {
    d.and_time(chrono::NaiveTime::MIN)
}

fn mismatch(expected: &'static str, found: &Value) -> ConversionError {
    ConversionError::TypeMismatch {
        expected,
        found: found.type_name(),
    }
}
