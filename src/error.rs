//! Unified error types for commpack.
//!
//! This module provides a single [`CommpackError`] enum that covers every
//! failure the library can report, from unreadable archives to a single
//! malformed call-log entry.
//!
//! # Error Handling Philosophy
//!
//! - **Pipelines** skip at the smallest granularity: one entry, one message,
//!   one file. Those skips still carry a typed error so the caller can log it.
//! - **Application users** get clear, actionable messages
//! - **Developers** get source error chains for debugging

use std::io;
#[cfg(feature = "mbox")]
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for commpack operations.
///
/// # Example
///
/// ```rust
/// use commpack::error::Result;
/// use commpack::record::VoiceRecord;
///
/// fn my_function() -> Result<Vec<VoiceRecord>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, CommpackError>;

/// The error type for all commpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CommpackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The takeout directory or mbox archive doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing the CSV)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse part of an archive.
    ///
    /// Contains the format being parsed, the underlying parse error,
    /// and optionally the file path.
    #[cfg(feature = "mbox")]
    #[error("Failed to parse {format}{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "mbox message")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// A takeout file name doesn't follow `<number> - <variant> - <timestamp>`.
    ///
    /// The whole file is skipped when this happens.
    #[error("Invalid takeout file name '{name}': {reason}")]
    InvalidFileName {
        /// The offending file name
        name: String,
        /// What was wrong with it
        reason: String,
    },

    /// A local date/time phrase could not be turned into a UTC instant.
    #[error("Invalid timestamp '{input}': {reason}")]
    InvalidTimestamp {
        /// The phrase that failed (after zone substitution, if any)
        input: String,
        /// Why it failed
        reason: String,
    },

    /// An entry is missing an element it cannot be built without.
    #[error("Missing {element} element in {context} entry")]
    MissingElement {
        /// Selector or description of the missing element
        element: &'static str,
        /// Entry kind that was being read
        context: &'static str,
    },

    /// A configuration value is unusable.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig {
        /// The configuration key
        key: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// CSV writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error while reading a sidecar file.
    #[cfg(feature = "mbox")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Kinds of parse errors that can occur.
#[cfg(feature = "mbox")]
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// RFC 5322 / MIME error from the mail parser
    #[error("{0}")]
    Mail(#[from] mailparse::MailParseError),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl CommpackError {
    /// Creates a parse error for a single mbox message.
    #[cfg(feature = "mbox")]
    pub fn mbox_parse(source: mailparse::MailParseError, path: Option<PathBuf>) -> Self {
        CommpackError::Parse {
            format: "mbox message",
            source: ParseErrorKind::Mail(source),
            path,
        }
    }

    /// Creates an invalid file name error.
    pub fn invalid_file_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        CommpackError::InvalidFileName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid timestamp error.
    pub fn invalid_timestamp(input: impl Into<String>, reason: impl Into<String>) -> Self {
        CommpackError::InvalidTimestamp {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing element error.
    pub fn missing_element(element: &'static str, context: &'static str) -> Self {
        CommpackError::MissingElement { element, context }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(key: &'static str, message: impl Into<String>) -> Self {
        CommpackError::InvalidConfig {
            key,
            message: message.into(),
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, CommpackError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    #[cfg(feature = "mbox")]
    pub fn is_parse(&self) -> bool {
        matches!(self, CommpackError::Parse { .. })
    }

    /// Returns `true` if this error should skip a whole file rather than one entry.
    pub fn is_invalid_file_name(&self) -> bool {
        matches!(self, CommpackError::InvalidFileName { .. })
    }

    /// Returns `true` if this is a timestamp error.
    pub fn is_invalid_timestamp(&self) -> bool {
        matches!(self, CommpackError::InvalidTimestamp { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = CommpackError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[cfg(feature = "mbox")]
    #[test]
    fn test_mbox_parse_with_path() {
        let err = CommpackError::mbox_parse(
            mailparse::MailParseError::Generic("bad header"),
            Some(PathBuf::from("/mail/Inbox.mbox")),
        );
        let display = err.to_string();
        assert!(display.contains("mbox message"));
        assert!(display.contains("/mail/Inbox.mbox"));
        assert!(display.ends_with("bad header"));
        assert!(err.is_parse());
    }

    #[cfg(feature = "mbox")]
    #[test]
    fn test_parse_error_without_path() {
        let err = CommpackError::mbox_parse(mailparse::MailParseError::Generic("bad"), None);
        assert!(!err.to_string().contains("file:"));
    }

    #[test]
    fn test_invalid_file_name_display() {
        let err = CommpackError::invalid_file_name("garbled.html", "expected 3 parts, found 1");
        let display = err.to_string();
        assert!(display.contains("garbled.html"));
        assert!(display.contains("expected 3 parts"));
        assert!(err.is_invalid_file_name());
        assert!(!err.is_io());
    }

    #[test]
    fn test_invalid_timestamp_display() {
        let err = CommpackError::invalid_timestamp("Jan 5 2021", "missing time zone");
        assert!(err.is_invalid_timestamp());
        assert!(err.to_string().contains("Jan 5 2021"));
    }

    #[test]
    fn test_missing_element_display() {
        let err = CommpackError::missing_element("q", "Text");
        assert_eq!(err.to_string(), "Missing q element in Text entry");
    }

    #[test]
    fn test_invalid_config_display() {
        let err = CommpackError::invalid_config("DATE_FORMAT", "bad specifier");
        assert!(err.to_string().contains("DATE_FORMAT"));
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let err = CommpackError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(err.source().is_some());

        let err = CommpackError::invalid_timestamp("x", "y");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_from_csv_error() {
        let csv_err = csv::Error::from(io::Error::other("test"));
        let err: CommpackError = csv_err.into();
        assert!(err.to_string().contains("CSV error"));
    }

    #[cfg(feature = "mbox")]
    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: CommpackError = json_err.into();
        assert!(err.to_string().contains("JSON error"));
    }

    #[test]
    fn test_error_debug() {
        let err = CommpackError::invalid_timestamp("x", "y");
        assert!(format!("{:?}", err).contains("InvalidTimestamp"));
    }
}
