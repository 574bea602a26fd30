//! Export summaries.
//!
//! Both pipelines end with one summary value that the binary prints and
//! library callers can inspect or serialize.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Result of a Mailbox export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailboxSummary {
    /// CSV that was written
    pub export_path: PathBuf,
    /// Data rows written
    pub rows_written: u64,
    /// Configured count plus messages that failed to parse
    pub cant_convert: u64,
    /// Configured count plus messages addressed to a blacklisted domain
    pub blacklisted: u64,
    /// Owners of the archive, from `.owners`
    pub owners: Vec<String>,
    /// Blacklisted domains that recipients were found in
    pub blacklisted_domains: Vec<String>,
}

impl fmt::Display for MailboxSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generated {} for {} messages ({} could not convert; {} blacklisted)",
            self.export_path.display(),
            self.rows_written,
            self.cant_convert,
            self.blacklisted
        )?;
        if !self.owners.is_empty() {
            write!(f, "\nowners: {}", self.owners.join(", "))?;
        }
        if !self.blacklisted_domains.is_empty() {
            write!(f, "\nblacklisted domains: {}", self.blacklisted_domains.join(", "))?;
        }
        Ok(())
    }
}

/// Result of a Voice-Log export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoiceSummary {
    /// CSV that was written
    pub export_path: PathBuf,
    /// Data rows written
    pub records: usize,
    /// Files skipped because of their name or unreadable content
    pub skipped_files: usize,
    /// Entries dropped inside otherwise valid files
    pub skipped_entries: usize,
}

impl fmt::Display for VoiceSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "saved {} records to {} ({} files skipped; {} entries skipped)",
            self.records,
            self.export_path.display(),
            self.skipped_files,
            self.skipped_entries
        )
    }
}
