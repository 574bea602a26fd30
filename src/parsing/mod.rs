//! Low-level grammars shared by the pipelines.
//!
//! These pieces know how archives are laid out (file names, date phrases,
//! message separators) but nothing about output rows.

#[cfg(feature = "voice")]
pub mod voice;

#[cfg(feature = "mbox")]
pub mod mbox;

#[cfg(feature = "voice")]
pub use voice::{DatePhrase, FileMeta};

#[cfg(feature = "mbox")]
pub use mbox::{MboxReader, split_messages};
