//! Configuration types for both pipelines.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! - [`VoiceConfig`] - Voice-Log (takeout HTML) export settings
//! - [`MailboxConfig`] - Mailbox (mbox) column selection and rendering
//!
//! # Example
//!
//! ```rust
//! use commpack::config::{MailboxConfig, VoiceConfig};
//! use commpack::record::MailField;
//!
//! let voice = VoiceConfig::new().with_skip_invalid(false);
//!
//! let mailbox = MailboxConfig::new()
//!     .without_column(MailField::Body)
//!     .with_subject_prepend("[archive] ");
//! assert_eq!(mailbox.headers(), ["Date", "From", "To", "Cc", "Subject"]);
//! ```

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CommpackError, Result};
use crate::normalize::timestamp::ISO8601;
use crate::record::MailField;

/// Values that switch a setting off, compared case-insensitively.
const NEGATIVE_VALUES: &[&str] = &["0", "false", "no", "none"];

/// Returns `true` if a configuration value is unset, empty or negative.
///
/// ```rust
/// use commpack::config::is_negative_or_empty;
///
/// assert!(is_negative_or_empty(None));
/// assert!(is_negative_or_empty(Some("  ")));
/// assert!(is_negative_or_empty(Some("False")));
/// assert!(!is_negative_or_empty(Some("Subject")));
/// ```
pub fn is_negative_or_empty(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => true,
        Some(v) => NEGATIVE_VALUES.iter().any(|n| v.eq_ignore_ascii_case(n)),
    }
}

/// Configuration for Voice-Log export.
///
/// # Example
///
/// ```rust
/// use commpack::config::VoiceConfig;
///
/// let config = VoiceConfig::new().with_output_file_name("calls.csv");
/// assert_eq!(config.output_file_name, "calls.csv");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Name of the CSV written into the output directory (default: `Message_Export.csv`)
    pub output_file_name: String,

    /// Skip invalid entries instead of returning errors (default: true)
    pub skip_invalid: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            output_file_name: "Message_Export.csv".to_string(),
            skip_invalid: true,
        }
    }
}

impl VoiceConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the output file name.
    #[must_use]
    pub fn with_output_file_name(mut self, name: impl Into<String>) -> Self {
        self.output_file_name = name.into();
        self
    }

    /// Sets whether to skip invalid entries.
    #[must_use]
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }
}

/// One enabled Mailbox column and its header label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailColumn {
    pub field: MailField,
    pub label: String,
}

/// Configuration for Mailbox export.
///
/// Columns are always kept in [`MailField::all`] order, whatever order they
/// were enabled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailboxConfig {
    /// Enabled columns with their header labels
    pub columns: Vec<MailColumn>,

    /// strftime format for the Date column (default: ISO-8601 UTC layout)
    pub date_format: Option<String>,

    /// Render dates in UTC instead of the local zone (default: true)
    pub utc: bool,

    /// Prefix added to every subject
    pub subject_prepend: Option<String>,

    /// Externally counted messages that could not be converted
    pub cant_convert_count: u64,

    /// Externally counted blacklisted messages
    pub blacklist_count: u64,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        let columns = [
            (MailField::Date, "Date"),
            (MailField::SentFrom, "From"),
            (MailField::SentTo, "To"),
            (MailField::Cc, "Cc"),
            (MailField::Subject, "Subject"),
            (MailField::Body, "Body"),
        ]
        .into_iter()
        .map(|(field, label)| MailColumn {
            field,
            label: label.to_string(),
        })
        .collect();

        Self {
            columns,
            date_format: None,
            utc: true,
            subject_prepend: None,
            cant_convert_count: 0,
            blacklist_count: 0,
        }
    }
}

impl MailboxConfig {
    /// Creates a configuration with every column enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the configuration from the process environment.
    ///
    /// See [`MailboxConfig::from_lookup`] for the keys.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from named values.
    ///
    /// Keys `DATE`, `SENT_FROM`, `SENT_TO`, `CC`, `SUBJECT` and `BODY` carry
    /// the column header label; a negative or empty value disables the
    /// column. `DATE_FORMAT`, `UTC`, `SUBJECT_PREPEND`, `CANT_CONVERT_COUNT`
    /// and `BLACKLIST_COUNT` follow the same negative-or-empty rule.
    ///
    /// ```rust
    /// use commpack::config::MailboxConfig;
    /// use commpack::record::MailField;
    ///
    /// let config = MailboxConfig::from_lookup(|key| match key {
    ///     "DATE" => Some("Sent".into()),
    ///     "BODY" => Some("Text".into()),
    ///     "UTC" => Some("yes".into()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(config.headers(), ["Sent", "Text"]);
    /// assert!(!config.is_enabled(MailField::Subject));
    /// # Ok::<(), commpack::CommpackError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let setting = |key: &str| {
            let value = lookup(key);
            if is_negative_or_empty(value.as_deref()) {
                None
            } else {
                value
            }
        };

        let columns = MailField::all()
            .iter()
            .filter_map(|&field| {
                setting(field.config_key()).map(|label| MailColumn { field, label })
            })
            .collect();

        let config = Self {
            columns,
            date_format: setting("DATE_FORMAT"),
            utc: setting("UTC").is_some(),
            subject_prepend: setting("SUBJECT_PREPEND"),
            cant_convert_count: parse_count("CANT_CONVERT_COUNT", setting("CANT_CONVERT_COUNT"))?,
            blacklist_count: parse_count("BLACKLIST_COUNT", setting("BLACKLIST_COUNT"))?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks settings that can only fail at render time.
    pub fn validate(&self) -> Result<()> {
        if let Some(format) = &self.date_format {
            if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
                return Err(CommpackError::invalid_config(
                    "DATE_FORMAT",
                    format!("'{format}' is not a valid strftime format"),
                ));
            }
        }
        Ok(())
    }

    /// Enables `field` with the given header label.
    #[must_use]
    pub fn with_column(mut self, field: MailField, label: impl Into<String>) -> Self {
        let label = label.into();
        match self.columns.iter_mut().find(|c| c.field == field) {
            Some(column) => column.label = label,
            None => {
                self.columns.push(MailColumn { field, label });
                self.columns.sort_by_key(|c| c.field as usize);
            }
        }
        self
    }

    /// Disables `field`.
    #[must_use]
    pub fn without_column(mut self, field: MailField) -> Self {
        self.columns.retain(|c| c.field != field);
        self
    }

    /// Sets the strftime format for the Date column.
    #[must_use]
    pub fn with_date_format(mut self, format: impl Into<String>) -> Self {
        self.date_format = Some(format.into());
        self
    }

    /// Selects UTC (`true`) or local (`false`) date rendering.
    #[must_use]
    pub fn with_utc(mut self, utc: bool) -> Self {
        self.utc = utc;
        self
    }

    /// Sets the subject prefix.
    #[must_use]
    pub fn with_subject_prepend(mut self, prefix: impl Into<String>) -> Self {
        self.subject_prepend = Some(prefix.into());
        self
    }

    /// Sets the externally counted totals reported in the summary.
    #[must_use]
    pub fn with_external_counts(mut self, cant_convert: u64, blacklisted: u64) -> Self {
        self.cant_convert_count = cant_convert;
        self.blacklist_count = blacklisted;
        self
    }

    /// Returns `true` if `field` has a column.
    pub fn is_enabled(&self, field: MailField) -> bool {
        self.columns.iter().any(|c| c.field == field)
    }

    /// Returns the header labels of the enabled columns, in order.
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    /// Renders seconds since the epoch with the configured format and zone.
    ///
    /// Returns `None` for out-of-range instants.
    pub fn render_date(&self, epoch_seconds: i64) -> Option<String> {
        let format = self.date_format.as_deref().unwrap_or(ISO8601);
        let instant = DateTime::<Utc>::from_timestamp(epoch_seconds, 0)?;
        let rendered = if self.utc {
            instant.format(format).to_string()
        } else {
            instant.with_timezone(&Local).format(format).to_string()
        };
        Some(rendered)
    }
}

fn parse_count(key: &'static str, value: Option<String>) -> Result<u64> {
    value.map_or(Ok(0), |v| {
        v.trim()
            .parse()
            .map_err(|_| CommpackError::invalid_config(key, format!("'{v}' is not a count")))
    })
}
