//! Common entry point for archive parsers.
//!
//! Each pipeline reads a different kind of archive and produces a different
//! result, so the trait only fixes the calling convention: a name for
//! diagnostics and a path-based `parse`.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "voice")]
//! # fn main() -> commpack::Result<()> {
//! use commpack::parser::ArchiveParser;
//! use commpack::parsers::VoiceLogParser;
//! use std::path::Path;
//!
//! let parser = VoiceLogParser::new();
//! let export = parser.parse(Path::new("Takeout"))?;
//! println!("{}: {} records", parser.name(), export.records.len());
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "voice"))]
//! # fn main() {}
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Supported archive kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum ArchiveKind {
    /// Google Voice Takeout directory (`Voice/Calls/*.html`)
    Voice,
    /// Unix mbox file
    Mbox,
}

impl ArchiveKind {
    /// Returns all archive kinds.
    pub fn all() -> &'static [ArchiveKind] {
        &[ArchiveKind::Voice, ArchiveKind::Mbox]
    }
}

impl std::fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveKind::Voice => write!(f, "Google Voice"),
            ArchiveKind::Mbox => write!(f, "mbox"),
        }
    }
}

impl std::str::FromStr for ArchiveKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "voice" | "gvoice" | "takeout" => Ok(ArchiveKind::Voice),
            "mbox" | "mail" => Ok(ArchiveKind::Mbox),
            _ => Err(format!("Unknown archive kind: '{s}'. Expected one of: voice, mbox")),
        }
    }
}

/// A parser that turns one archive into normalized records.
pub trait ArchiveParser {
    /// What a full parse returns.
    type Output;

    /// Human-readable parser name for log lines.
    fn name(&self) -> &'static str;

    /// Archive kind handled by this parser.
    fn kind(&self) -> ArchiveKind;

    /// Parses the archive at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be read at all. Individual bad
    /// entries are skipped according to the parser's configuration.
    fn parse(&self, path: &Path) -> Result<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_archive_kind_from_str() {
        assert_eq!(ArchiveKind::from_str("voice").unwrap(), ArchiveKind::Voice);
        assert_eq!(ArchiveKind::from_str("MBOX").unwrap(), ArchiveKind::Mbox);
        assert!(ArchiveKind::from_str("pst").is_err());
    }

    #[test]
    fn test_archive_kind_display() {
        let names: Vec<String> = ArchiveKind::all().iter().map(ToString::to_string).collect();
        assert_eq!(names, ["Google Voice", "mbox"]);
    }
}
