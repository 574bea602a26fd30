//! Local date/time phrases to UTC instants.
//!
//! Takeout archives print times like `Jan 5, 2021, 3:04:05 PM Eastern Time`.
//! The long zone name says nothing about daylight saving, so the phrase is
//! resolved in three steps:
//!
//! 1. Decide whether the phrase's calendar date falls inside the US Eastern
//!    daylight-saving interval ([`is_eastern_dst`]). Eastern is consulted for
//!    every zone name; Central and Pacific phrases follow Eastern's calendar.
//! 2. Substitute zone names with abbreviations from the matching
//!    [`ZoneTable`], longest key first ([`MultiReplacer`]).
//! 3. Parse the substituted phrase ([`parse_zoned`]) and convert to UTC.
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use commpack::normalize::timestamp::{ISO8601, normalize_phrase};
//!
//! let date = NaiveDate::from_ymd_opt(2021, 1, 5).unwrap();
//! let utc = normalize_phrase("Jan 5, 2021, 3:04:05 PM Eastern Time", date)?;
//! assert_eq!(utc.format(ISO8601).to_string(), "2021-01-05T20:04:05Z");
//! # Ok::<(), commpack::CommpackError>(())
//! ```

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::America::New_York;
use chrono_tz::OffsetComponents;
use regex::{Captures, Regex};

use crate::error::{CommpackError, Result};

/// Output format for every UTC timestamp the crate renders.
pub const ISO8601: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Zone-name replacements used outside daylight saving.
const STANDARD_REPLACEMENTS: &[(&str, &str)] = &[
    ("\n", " "),
    ("Eastern Time", "EST"),
    ("Central Time", "CST"),
    ("Pacific Time", "PST"),
];

/// Zone-name replacements used inside daylight saving.
const DAYLIGHT_REPLACEMENTS: &[(&str, &str)] = &[
    ("\n", " "),
    ("Eastern Time", "EDT"),
    ("Central Time", "CDT"),
    ("Pacific Time", "PDT"),
];

/// Formats tried, in order, on the phrase once the zone token is removed.
///
/// `%b`/`%a` accept both short and long names when parsing.
const PHRASE_FORMATS: &[&str] = &[
    "%b %d, %Y, %I:%M:%S %p",
    "%b %d, %Y, %I:%M %p",
    "%a, %b %d, %Y, %I:%M:%S %p",
    "%a, %b %d, %Y, %I:%M %p",
    "%b %d, %Y, %H:%M:%S",
    "%b %d, %Y, %H:%M",
];

/// Formats accepted for the bare date part of a phrase (`Jan 5 2021`).
const DATE_FORMATS: &[&str] = &["%b %d %Y", "%b %d, %Y", "%Y-%m-%d"];

/// Single-pass substitution where longer keys shadow shorter ones.
///
/// All keys are joined into one alternation ordered by descending length;
/// the regex engine prefers earlier alternatives, so for the replacements
/// `{"ab": "AB", "abc": "ABC"}` the input `hey abc` becomes `hey ABC`.
#[derive(Debug, Clone)]
pub struct MultiReplacer {
    regex: Option<Regex>,
    replacements: HashMap<String, String>,
}

impl MultiReplacer {
    /// Builds a replacer from `(find, replace)` pairs.
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let replacements: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        let mut keys: Vec<&String> = replacements.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let regex = if keys.is_empty() {
            None
        } else {
            let pattern = keys
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            // Escaped literals always form a valid pattern.
            Some(Regex::new(&pattern).expect("escaped alternation is a valid regex"))
        };

        Self {
            regex,
            replacements,
        }
    }

    /// Applies every replacement in one left-to-right pass.
    pub fn apply(&self, input: &str) -> String {
        let Some(regex) = &self.regex else {
            return input.to_string();
        };
        regex
            .replace_all(input, |caps: &Captures<'_>| {
                self.replacements
                    .get(&caps[0])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Convenience wrapper around [`MultiReplacer`] for one-off substitutions.
pub fn multi_replace(input: &str, replacements: &[(&str, &str)]) -> String {
    MultiReplacer::new(replacements.iter().copied()).apply(input)
}

static STANDARD: LazyLock<MultiReplacer> =
    LazyLock::new(|| MultiReplacer::new(STANDARD_REPLACEMENTS.iter().copied()));
static DAYLIGHT: LazyLock<MultiReplacer> =
    LazyLock::new(|| MultiReplacer::new(DAYLIGHT_REPLACEMENTS.iter().copied()));

/// Which zone-name table applies to a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTable {
    /// `Eastern Time` → `EST`, ...
    Standard,
    /// `Eastern Time` → `EDT`, ...
    Daylight,
}

impl ZoneTable {
    /// Selects the table from the Eastern daylight-saving state of `date`.
    pub fn for_date(date: NaiveDate) -> Result<Self> {
        Ok(if is_eastern_dst(date)? {
            ZoneTable::Daylight
        } else {
            ZoneTable::Standard
        })
    }

    /// Returns the raw `(find, replace)` pairs of this table.
    pub fn replacements(self) -> &'static [(&'static str, &'static str)] {
        match self {
            ZoneTable::Standard => STANDARD_REPLACEMENTS,
            ZoneTable::Daylight => DAYLIGHT_REPLACEMENTS,
        }
    }

    /// Substitutes zone names (and newlines) in `phrase`.
    pub fn apply(self, phrase: &str) -> String {
        match self {
            ZoneTable::Standard => STANDARD.apply(phrase),
            ZoneTable::Daylight => DAYLIGHT.apply(phrase),
        }
    }
}

/// Returns `true` if local midnight of `date` in US Eastern observes daylight saving.
///
/// Uses the full tz history, so pre-2007 rules (April to October) apply to
/// older archives.
pub fn is_eastern_dst(date: NaiveDate) -> Result<bool> {
    let midnight = date.and_time(NaiveTime::MIN);
    match New_York.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => Ok(dt.offset().dst_offset() != chrono::Duration::zero()),
        LocalResult::Ambiguous(..) | LocalResult::None => Err(CommpackError::invalid_timestamp(
            date.to_string(),
            "local midnight is ambiguous or skipped in US/Eastern",
        )),
    }
}

/// Parses the date part of a phrase, e.g. `Jan 5 2021`.
pub fn parse_reference_date(input: &str) -> Result<NaiveDate> {
    let cleaned = collapse_whitespace(input);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
        .ok_or_else(|| CommpackError::invalid_timestamp(input, "unrecognized date"))
}

/// Maps a zone abbreviation to its fixed UTC offset.
pub fn zone_offset(abbreviation: &str) -> Option<FixedOffset> {
    let hours = match abbreviation.to_ascii_uppercase().as_str() {
        "UTC" | "GMT" | "Z" => 0,
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        _ => return None,
    };
    FixedOffset::east_opt(hours * 3600)
}

/// Parses a phrase ending in a zone abbreviation into a UTC instant.
///
/// `Jan 5, 2021, 3:04:05 PM EST` → `2021-01-05T20:04:05Z`.
pub fn parse_zoned(phrase: &str) -> Result<DateTime<Utc>> {
    let cleaned = collapse_whitespace(phrase);
    let (local_part, zone) = cleaned
        .rsplit_once(' ')
        .ok_or_else(|| CommpackError::invalid_timestamp(phrase, "missing time zone"))?;

    let offset = zone_offset(zone).ok_or_else(|| {
        CommpackError::invalid_timestamp(phrase, format!("unknown time zone '{zone}'"))
    })?;

    let naive = PHRASE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(local_part, fmt).ok())
        .ok_or_else(|| CommpackError::invalid_timestamp(phrase, "unrecognized date/time"))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| CommpackError::invalid_timestamp(phrase, "out of range"))
}

/// Resolves a raw takeout phrase to UTC, choosing the zone table from `reference_date`.
pub fn normalize_phrase(raw: &str, reference_date: NaiveDate) -> Result<DateTime<Utc>> {
    let table = ZoneTable::for_date(reference_date)?;
    parse_zoned(&table.apply(raw))
}

fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
