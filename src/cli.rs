//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Command`] - one subcommand per archive kind

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::parser::ArchiveKind;

/// Convert Google Voice Takeout logs and mbox archives into CSV.
#[derive(Parser, Debug, Clone)]
#[command(name = "commpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    commpack voice -i ~/Takeout
    commpack voice -i ~/Takeout -o ~/exports
    commpack mbox ~/mail/Inbox.mbox

MBOX CONFIGURATION (environment or .env):
    DATE, SENT_FROM, SENT_TO, CC, SUBJECT, BODY   column header labels
    DATE_FORMAT, UTC, SUBJECT_PREPEND             rendering options
    CANT_CONVERT_COUNT, BLACKLIST_COUNT           counts added to the summary
    Set a value to 0, false, no or none to disable it.")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

/// What to convert.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Convert a Google Voice Takeout directory into Message_Export.csv
    #[command(alias = "gvoice")]
    Voice {
        /// Takeout directory (contains a Voice folder)
        #[arg(short, long, value_name = "DIR")]
        input: PathBuf,

        /// Directory for the CSV; defaults to the takeout directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Convert an mbox archive into <PATH>.csv
    Mbox {
        /// Path to the mbox archive
        path: PathBuf,
    },
}

impl Command {
    /// Archive kind handled by this subcommand.
    pub fn kind(&self) -> ArchiveKind {
        match self {
            Command::Voice { .. } => ArchiveKind::Voice,
            Command::Mbox { .. } => ArchiveKind::Mbox,
        }
    }
}
