//! Normalized output rows for both pipelines.
//!
//! - [`VoiceRecord`] - one call, text or voicemail entry from a Google Voice
//!   Takeout archive, tagged with its [`Variant`]
//! - [`MailRecord`] - one mbox message, holding only the [`MailField`]s the
//!   configuration enabled
//!
//! Records are immutable once built: parsers construct them in one step after
//! every required field was extracted.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use commpack::record::{Variant, VoiceRecord};
//!
//! let ts = Utc.with_ymd_and_hms(2021, 1, 5, 20, 4, 5).unwrap();
//! let record = VoiceRecord::new(Variant::Text, ts, "+15551234567", "hello");
//!
//! assert_eq!(record.title(), "📟 SMS");
//! assert_eq!(record.timestamp_utc(), "2021-01-05T20:04:05Z");
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize::timestamp::ISO8601;

/// Message variant of a Voice-Log entry.
///
/// The file-name label (`Text`, `Received`, ...) selects the variant; the
/// display label is what lands in the `Title` and `Type` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// SMS/MMS text message
    Text,
    /// Incoming answered call
    Received,
    /// Outgoing call
    Placed,
    /// Incoming unanswered call
    Missed,
    /// Voicemail, with or without transcription
    Voicemail,
}

impl Variant {
    /// Returns the emoji-prefixed label used for both title and type.
    pub fn label(self) -> &'static str {
        match self {
            Variant::Received => "\u{1F4F2} Call-Received",
            Variant::Placed => "\u{1F4DE} Call-Placed",
            Variant::Missed => "\u{1F4F4} Call-Missed",
            Variant::Text => "\u{1F4DF} SMS",
            Variant::Voicemail => "\u{1F4FC} Voicemail",
        }
    }

    /// Parses the variant segment of a takeout file name.
    pub fn from_file_label(label: &str) -> Option<Self> {
        match label {
            "Text" => Some(Variant::Text),
            "Received" => Some(Variant::Received),
            "Placed" => Some(Variant::Placed),
            "Missed" => Some(Variant::Missed),
            "Voicemail" => Some(Variant::Voicemail),
            _ => None,
        }
    }

    /// Returns the label this variant carries in takeout file names.
    pub fn file_label(self) -> &'static str {
        match self {
            Variant::Text => "Text",
            Variant::Received => "Received",
            Variant::Placed => "Placed",
            Variant::Missed => "Missed",
            Variant::Voicemail => "Voicemail",
        }
    }

    /// Returns `true` for the variants stored in `div.message` nodes.
    pub fn is_text(self) -> bool {
        self == Variant::Text
    }

    /// Returns all variants.
    pub fn all() -> &'static [Variant] {
        &[
            Variant::Text,
            Variant::Received,
            Variant::Placed,
            Variant::Missed,
            Variant::Voicemail,
        ]
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_label())
    }
}

/// One normalized Voice-Log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceRecord {
    /// Message variant
    pub variant: Variant,
    /// Event time in UTC
    pub timestamp: DateTime<Utc>,
    /// Participant number or identity from the file name
    pub origin: String,
    /// Cleaned content, transcription fallback or call duration
    pub content: String,
}

impl VoiceRecord {
    /// Creates a new record.
    pub fn new(
        variant: Variant,
        timestamp: DateTime<Utc>,
        origin: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            variant,
            timestamp,
            origin: origin.into(),
            content: content.into(),
        }
    }

    /// Display label for the message kind.
    pub fn title(&self) -> &'static str {
        self.variant.label()
    }

    /// Variant label (same table as the title).
    pub fn kind(&self) -> &'static str {
        self.variant.label()
    }

    /// Timestamp rendered as `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn timestamp_utc(&self) -> String {
        self.timestamp.format(ISO8601).to_string()
    }
}

/// Selectable columns of the Mailbox pipeline, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MailField {
    Date,
    SentFrom,
    SentTo,
    Cc,
    Subject,
    Body,
}

impl MailField {
    /// Returns the configuration key that enables this field and names its column.
    pub fn config_key(self) -> &'static str {
        match self {
            MailField::Date => "DATE",
            MailField::SentFrom => "SENT_FROM",
            MailField::SentTo => "SENT_TO",
            MailField::Cc => "CC",
            MailField::Subject => "SUBJECT",
            MailField::Body => "BODY",
        }
    }

    /// Returns all fields in column order.
    pub fn all() -> &'static [MailField] {
        &[
            MailField::Date,
            MailField::SentFrom,
            MailField::SentTo,
            MailField::Cc,
            MailField::Subject,
            MailField::Body,
        ]
    }
}

/// One mbox message reduced to its enabled columns.
///
/// `None` means the column is disabled; an enabled column whose source is
/// missing holds an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailRecord {
    pub date: Option<String>,
    pub sent_from: Option<String>,
    pub sent_to: Option<String>,
    pub cc: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
}

impl MailRecord {
    /// Returns the value of a single field, if enabled.
    pub fn get(&self, field: MailField) -> Option<&str> {
        let value = match field {
            MailField::Date => &self.date,
            MailField::SentFrom => &self.sent_from,
            MailField::SentTo => &self.sent_to,
            MailField::Cc => &self.cc,
            MailField::Subject => &self.subject,
            MailField::Body => &self.body,
        };
        value.as_deref()
    }

    /// Returns the enabled columns in output order.
    pub fn to_row(&self) -> Vec<&str> {
        MailField::all()
            .iter()
            .filter_map(|&field| self.get(field))
            .collect()
    }
}
