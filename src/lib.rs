//! # commpack
//!
//! A Rust library for turning personal communication archives into
//! normalized CSV rows.
//!
//! ## Overview
//!
//! commpack reads two kinds of archives:
//! - **Google Voice Takeout** - one HTML document per conversation, call or
//!   voicemail under `Voice/Calls`
//! - **mbox** - a single file holding a sequence of email messages
//!
//! Both pipelines share the same shape: locate entries, extract fields per
//! variant, normalize time and content, emit one row per entry. Times are
//! normalized to UTC (with historical daylight-saving rules), markup and
//! quoted-printable artifacts are stripped, and email bodies keep only the
//! newest message of a reply chain.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "voice", feature = "mbox"))]
//! # fn main() -> commpack::Result<()> {
//! use commpack::prelude::*;
//! use std::path::Path;
//!
//! // Takeout directory -> Takeout/Message_Export.csv
//! let voice = export_voice(Path::new("Takeout"), None, &VoiceConfig::default())?;
//! println!("{voice}");
//!
//! // mbox -> inbox.mbox.csv, columns chosen by configuration
//! let config = MailboxConfig::new().without_column(MailField::Body);
//! let mail = export_mbox(Path::new("inbox.mbox"), &config, &Sidecars::default())?;
//! println!("{mail}");
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "voice", feature = "mbox")))]
//! # fn main() {}
//! ```
//!
//! ## Module Structure
//!
//! - [`normalize`] - timestamp, text, quoted-printable, reply and address helpers
//! - [`parsing`] - takeout file-name and date-phrase grammars, mbox splitting
//! - [`parsers`] - [`VoiceLogParser`](parsers::VoiceLogParser) and
//!   [`MailboxParser`](parsers::MailboxParser)
//! - [`parser`] - the [`ArchiveParser`](parser::ArchiveParser) trait
//! - [`record`] - output rows ([`VoiceRecord`], [`MailRecord`])
//! - [`config`] - [`VoiceConfig`](config::VoiceConfig), [`MailboxConfig`](config::MailboxConfig)
//! - [`core`] - CSV writers, end-to-end pipelines, summaries
//! - [`error`] - unified error types ([`CommpackError`], [`Result`])
//! - [`prelude`] - convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;
pub mod normalize;
pub mod parser;
pub mod parsers;
pub mod parsing;
pub mod record;

// Re-export the main types at the crate root for convenience
pub use error::{CommpackError, Result};
pub use record::{MailRecord, VoiceRecord};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use commpack::prelude::*;
/// ```
pub mod prelude {
    // Records
    pub use crate::record::{MailField, MailRecord, Variant, VoiceRecord};

    // Error types
    pub use crate::error::{CommpackError, Result};

    // Parser API
    pub use crate::parser::{ArchiveKind, ArchiveParser};

    // Configuration
    pub use crate::config::{MailboxConfig, VoiceConfig};

    // Summaries
    pub use crate::core::report::{MailboxSummary, VoiceSummary};

    #[cfg(feature = "voice")]
    pub use crate::core::pipeline::export_voice;
    #[cfg(feature = "voice")]
    pub use crate::parsers::{VoiceExport, VoiceLogParser};

    #[cfg(feature = "mbox")]
    pub use crate::core::pipeline::export_mbox;
    #[cfg(feature = "mbox")]
    pub use crate::core::sidecar::Sidecars;
    #[cfg(feature = "mbox")]
    pub use crate::parsers::{MailboxExport, MailboxParser};
}
