//! Normalization helpers shared by both pipelines.
//!
//! - [`timestamp`] - zone-phrase substitution and UTC conversion
//! - [`text`] - markup stripping, charset decoding, email body cleanup
//! - [`quoted_printable`] - lenient quoted-printable decoder
//! - [`reply`] - newest-message extraction from reply chains
//! - [`address`] - email address extraction

pub mod address;
pub mod quoted_printable;
pub mod reply;
pub mod text;
pub mod timestamp;

pub use address::{extract_addresses, join_addresses};
pub use text::{NO_TRANSCRIPTION, clean_email_body, strip_markup};
pub use timestamp::{ISO8601, ZoneTable, multi_replace, normalize_phrase};
