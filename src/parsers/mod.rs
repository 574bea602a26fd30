//! Archive parsers.
//!
//! Each parser implements [`ArchiveParser`](crate::parser::ArchiveParser).
//!
//! # Available Parsers
//!
//! - [`VoiceLogParser`] - Google Voice Takeout `Voice/Calls/*.html` documents
//! - [`MailboxParser`] - mbox archives
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "mbox")]
//! # fn main() -> commpack::Result<()> {
//! use commpack::parsers::MailboxParser;
//! use std::path::Path;
//!
//! let parser = MailboxParser::new();
//! for message in parser.stream(Path::new("inbox.mbox"))? {
//!     match message {
//!         Ok(message) => println!("{:?}", message.record.subject),
//!         Err(e) => eprintln!("Skipped invalid message: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "mbox"))]
//! # fn main() {}
//! ```

#[cfg(feature = "voice")]
mod voice;

#[cfg(feature = "mbox")]
mod mbox;

#[cfg(feature = "voice")]
pub use voice::{CALLS_DIR, VoiceExport, VoiceLogParser};

#[cfg(feature = "mbox")]
pub use mbox::{MailMessage, MailboxExport, MailboxParser, MailboxStream, SUBJECT_BREAK};
