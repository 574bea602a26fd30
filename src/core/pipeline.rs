//! End-to-end exports: archive in, CSV out.
//!
//! - [`export_voice`] - takeout directory to `Message_Export.csv`
//! - [`export_mbox`] - mbox archive to `<archive>.csv`, streamed row by row

use std::path::{Path, PathBuf};

#[cfg(feature = "mbox")]
use std::collections::BTreeSet;

use crate::error::Result;

#[cfg(feature = "voice")]
use super::output::write_voice_csv;
#[cfg(feature = "voice")]
use super::report::VoiceSummary;
#[cfg(feature = "voice")]
use crate::config::VoiceConfig;
#[cfg(feature = "voice")]
use crate::parsers::VoiceLogParser;

#[cfg(feature = "mbox")]
use super::output::MailCsvWriter;
#[cfg(feature = "mbox")]
use super::report::MailboxSummary;
#[cfg(feature = "mbox")]
use super::sidecar::Sidecars;
#[cfg(feature = "mbox")]
use crate::config::MailboxConfig;
#[cfg(feature = "mbox")]
use crate::parsers::MailboxParser;

/// Converts a takeout directory into one CSV.
///
/// The CSV is written to `output_dir` (default: `input`) under
/// [`VoiceConfig::output_file_name`].
///
/// # Errors
///
/// Fails if `input/Voice/Calls` cannot be listed or the CSV cannot be
/// written. Bad files and entries are skipped unless
/// [`VoiceConfig::skip_invalid`] is off.
///
/// # Example
///
/// ```rust,no_run
/// use commpack::config::VoiceConfig;
/// use commpack::core::pipeline::export_voice;
/// use std::path::Path;
///
/// let summary = export_voice(Path::new("Takeout"), None, &VoiceConfig::default())?;
/// println!("{summary}");
/// # Ok::<(), commpack::CommpackError>(())
/// ```
#[cfg(feature = "voice")]
pub fn export_voice(
    input: &Path,
    output_dir: Option<&Path>,
    config: &VoiceConfig,
) -> Result<VoiceSummary> {
    let parser = VoiceLogParser::with_config(config.clone());
    let export = parser.parse_dir(input)?;

    let export_path = output_dir
        .unwrap_or(input)
        .join(&config.output_file_name);
    write_voice_csv(&export.records, &export_path)?;

    let summary = VoiceSummary {
        export_path,
        records: export.records.len(),
        skipped_files: export.skipped_files.len(),
        skipped_entries: export.skipped_entries,
    };
    tracing::info!(
        path = %summary.export_path.display(),
        records = summary.records,
        skipped = export.skipped(),
        "voice export written"
    );
    Ok(summary)
}

/// Path of the CSV written for `archive`: the archive path plus `.csv`.
pub fn mbox_export_path(archive: &Path) -> PathBuf {
    let mut name = archive.as_os_str().to_owned();
    name.push(".csv");
    PathBuf::from(name)
}

/// Converts an mbox archive into `<archive>.csv`.
///
/// Rows are written as messages are read. Messages that cannot be parsed
/// are skipped and added to the could-not-convert count; messages with a
/// recipient in a blacklisted domain are still written and only counted.
///
/// # Errors
///
/// Fails if the configuration is invalid, the archive cannot be read, or
/// the CSV cannot be written.
#[cfg(feature = "mbox")]
pub fn export_mbox(
    archive: &Path,
    config: &MailboxConfig,
    sidecars: &Sidecars,
) -> Result<MailboxSummary> {
    config.validate()?;

    let parser = MailboxParser::with_config(config.clone());
    let messages = parser.stream(archive)?;

    let export_path = mbox_export_path(archive);
    let mut writer = MailCsvWriter::create(&export_path, &config.headers())?;

    let mut cant_convert = 0u64;
    let mut blacklisted = 0u64;
    let mut blacklisted_domains = BTreeSet::new();

    for message in messages {
        let message = match message {
            Ok(message) => message,
            Err(e) if e.is_io() => return Err(e),
            Err(e) => {
                tracing::warn!(archive = %archive.display(), error = %e, "skipping message");
                cant_convert += 1;
                continue;
            }
        };

        let hits: Vec<&str> = message
            .recipients
            .iter()
            .filter_map(|address| sidecars.blacklist.matching_domain(address))
            .collect();
        if !hits.is_empty() {
            blacklisted += 1;
            blacklisted_domains.extend(hits.into_iter().map(str::to_string));
        }

        writer.write_record(&message.record)?;
    }

    let rows_written = writer.finish()?;

    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let summary = MailboxSummary {
        export_path,
        rows_written,
        cant_convert: config.cant_convert_count + cant_convert,
        blacklisted: config.blacklist_count + blacklisted,
        owners: sidecars.owners.for_archive(&file_name),
        blacklisted_domains: blacklisted_domains.into_iter().collect(),
    };
    tracing::info!(
        path = %summary.export_path.display(),
        rows = summary.rows_written,
        skipped = cant_convert,
        "mbox export written"
    );
    Ok(summary)
}
