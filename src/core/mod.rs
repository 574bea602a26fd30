//! Core processing logic for commpack.
//!
//! This module contains:
//! - [`output`] - CSV writers
//! - [`pipeline`] - end-to-end exports for both archive kinds
//! - [`report`] - export summaries
//! - `sidecar` - `.owners` / `.blacklist` annotations (mbox only)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "mbox")]
//! # fn main() -> commpack::Result<()> {
//! use commpack::config::MailboxConfig;
//! use commpack::core::{Sidecars, export_mbox};
//! use std::path::Path;
//!
//! let config = MailboxConfig::from_env()?;
//! let sidecars = Sidecars::load(Path::new("."));
//! let summary = export_mbox(Path::new("inbox.mbox"), &config, &sidecars)?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "mbox"))]
//! # fn main() {}
//! ```

pub mod output;
pub mod pipeline;
pub mod report;
#[cfg(feature = "mbox")]
pub mod sidecar;

pub use output::{MailCsvWriter, to_voice_csv, write_voice_csv};
pub use pipeline::mbox_export_path;
#[cfg(feature = "mbox")]
pub use pipeline::export_mbox;
#[cfg(feature = "voice")]
pub use pipeline::export_voice;
pub use report::{MailboxSummary, VoiceSummary};
#[cfg(feature = "mbox")]
pub use sidecar::{Blacklist, Owners, Sidecars};
