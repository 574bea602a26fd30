//! Shared Google Voice Takeout grammar.
//!
//! Two small positional grammars live here:
//!
//! - [`FileMeta`] - `<number> - <variant> - <timestamp>.html` file names
//! - [`DatePhrase`] - `[<weekday>, ]<month> <day>, <year>, <time> <zone>`
//!   abbreviated-time phrases

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{CommpackError, Result};
use crate::normalize::timestamp::{normalize_phrase, parse_reference_date};
use crate::record::Variant;

/// Separator between the three parts of a takeout file name.
pub const FILE_NAME_SEPARATOR: &str = " - ";

/// Metadata encoded in a takeout file name.
///
/// `+15551234567 - Text - 2021-01-05T20_04_05Z.html` gives number
/// `+15551234567`, variant [`Variant::Text`] and nominal timestamp
/// `2021-01-05T20:04:05Z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    /// Participant number or identity
    pub number: String,
    /// Message variant
    pub variant: Variant,
    /// Timestamp token with `_` restored to `:`
    pub nominal_timestamp: String,
}

impl FileMeta {
    /// Parses the stem of a takeout file name (without `.html`).
    pub fn parse(stem: &str) -> Result<Self> {
        let parts: Vec<&str> = stem.split(FILE_NAME_SEPARATOR).collect();
        let [number, label, timestamp] = parts.as_slice() else {
            return Err(CommpackError::invalid_file_name(
                stem,
                format!(
                    "expected 3 '{}'-separated parts, found {}",
                    FILE_NAME_SEPARATOR.trim(),
                    parts.len()
                ),
            ));
        };

        let variant = Variant::from_file_label(label).ok_or_else(|| {
            CommpackError::invalid_file_name(stem, format!("unknown message type '{label}'"))
        })?;

        Ok(Self {
            number: (*number).to_string(),
            variant,
            nominal_timestamp: timestamp.replace('_', ":"),
        })
    }

    /// Parses the file name of `path`.
    pub fn from_path(path: &Path) -> Result<Self> {
        let stem = path.file_stem().and_then(|s| s.to_str()).ok_or_else(|| {
            CommpackError::invalid_file_name(path.display().to_string(), "no file name")
        })?;
        Self::parse(stem)
    }

    /// Returns the nominal timestamp as an instant, if it is RFC 3339.
    pub fn nominal_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.nominal_timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// An abbreviated-time phrase split into its positional segments.
///
/// `Jan 5, 2021, 3:04:05 PM Eastern Time` has date `Jan 5 2021` and time
/// `3:04:05 PM Eastern Time`. A leading weekday segment is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePhrase {
    raw: String,
    date: String,
    time: String,
}

impl DatePhrase {
    /// Splits `raw` on commas.
    ///
    /// Fails unless there are exactly three segments, or four with a weekday.
    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<&str> = raw.split(',').collect();
        let (month_day, year, time) = match segments.as_slice() {
            [month_day, year, time] | [_, month_day, year, time] => (*month_day, *year, *time),
            _ => {
                return Err(CommpackError::invalid_timestamp(
                    raw,
                    format!(
                        "expected 3 comma-separated segments, found {}",
                        segments.len()
                    ),
                ));
            }
        };

        let time_line = time.split('\n').next().unwrap_or_default();
        Ok(Self {
            raw: raw.to_string(),
            date: format!("{month_day}{year}"),
            time: time_line.chars().skip(1).collect(),
        })
    }

    /// The unmodified phrase.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Month, day and year, e.g. `Jan 5 2021`.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Time segment without its leading separator character.
    pub fn time(&self) -> &str {
        &self.time
    }

    /// Calendar date used for daylight-saving selection.
    pub fn reference_date(&self) -> Result<NaiveDate> {
        parse_reference_date(&self.date)
    }

    /// Resolves the whole phrase to UTC.
    pub fn to_utc(&self) -> Result<DateTime<Utc>> {
        normalize_phrase(&self.raw, self.reference_date()?)
    }
}
