//! Output writers.
//!
//! - [`write_voice_csv`] / [`to_voice_csv`] - Voice-Log rows, written in one go
//! - [`MailCsvWriter`] - Mailbox rows, streamed one at a time
//!
//! Both writers use `,` as delimiter, `\n` as line terminator and quote
//! cells only when needed.
//!
//! # Example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use commpack::core::output::to_voice_csv;
//! use commpack::record::{Variant, VoiceRecord};
//!
//! let ts = Utc.with_ymd_and_hms(2021, 1, 5, 20, 4, 5).unwrap();
//! let csv = to_voice_csv(&[VoiceRecord::new(Variant::Text, ts, "+15551234567", "hello")])?;
//! assert!(csv.starts_with("Title,Date (GMT),Type,From,Content\n"));
//! # Ok::<(), commpack::CommpackError>(())
//! ```

mod csv_writer;

pub use csv_writer::{MailCsvWriter, VOICE_HEADER, to_voice_csv, write_voice_csv};
