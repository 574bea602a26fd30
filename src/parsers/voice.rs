//! Google Voice Takeout parser.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::config::VoiceConfig;
use crate::error::{CommpackError, Result};
use crate::normalize::NO_TRANSCRIPTION;
use crate::parser::{ArchiveKind, ArchiveParser};
use crate::parsing::voice::{DatePhrase, FileMeta};
use crate::record::{Variant, VoiceRecord};

static MESSAGE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.message").unwrap());
static HAUDIO: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.haudio").unwrap());
static ABBR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("abbr").unwrap());
static QUOTE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("q").unwrap());
static FULL_TEXT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.full-text").unwrap());

/// Location of the call/text documents inside a takeout directory.
pub const CALLS_DIR: [&str; 2] = ["Voice", "Calls"];

/// Parser for Google Voice Takeout archives.
///
/// Every `.html` document under `Voice/Calls` holds the entries of one
/// conversation or call. The file name carries the participant and the
/// [`Variant`]; each entry carries its own date phrase and content:
///
/// ```html
/// <div class="message">
///   <abbr class="dt" title="2021-01-05T15:04:05.000-05:00">Jan 5, 2021, 3:04:05 PM
/// Eastern Time</abbr>
///   <q>hello</q>
/// </div>
/// ```
///
/// Calls and voicemails use `div.haudio` entries instead; a second `abbr`
/// holds the call duration.
pub struct VoiceLogParser {
    config: VoiceConfig,
}

impl VoiceLogParser {
    pub fn new() -> Self {
        Self {
            config: VoiceConfig::default(),
        }
    }

    pub fn with_config(config: VoiceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    /// Parses the entries of one document.
    ///
    /// One result per entry, in document order. The caller decides what to
    /// do with failed entries.
    pub fn parse_document(&self, meta: &FileMeta, html: &str) -> Vec<Result<VoiceRecord>> {
        let document = Html::parse_document(html);
        let selector: &Selector = if meta.variant.is_text() {
            &*MESSAGE
        } else {
            &*HAUDIO
        };

        document
            .select(selector)
            .map(|entry| parse_entry(meta, entry))
            .collect()
    }

    /// Reads and parses one takeout document.
    ///
    /// Fails as a whole when the file name is malformed or the file cannot
    /// be read.
    pub fn parse_file(&self, path: &Path) -> Result<Vec<Result<VoiceRecord>>> {
        let meta = FileMeta::from_path(path)?;
        let bytes = fs::read(path)?;
        let html = String::from_utf8_lossy(&bytes);
        Ok(self.parse_document(&meta, &html))
    }

    /// Parses every document under `<takeout_dir>/Voice/Calls`.
    ///
    /// Files are visited in file-name order. With `skip_invalid` set, bad
    /// files and bad entries are logged and counted; otherwise the first
    /// failure is returned.
    pub fn parse_dir(&self, takeout_dir: &Path) -> Result<VoiceExport> {
        let calls_dir = CALLS_DIR.iter().fold(takeout_dir.to_path_buf(), |p, c| p.join(c));
        if !calls_dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a directory", calls_dir.display()),
            )
            .into());
        }

        let files = list_html_files(&calls_dir)?;
        tracing::info!(files = files.len(), dir = %calls_dir.display(), "parsing takeout documents");

        let mut export = VoiceExport::default();
        for path in files {
            let entries = match self.parse_file(&path) {
                Ok(entries) => entries,
                Err(e) if self.config.skip_invalid => {
                    tracing::warn!(file = %path.display(), error = %e, "skipping file");
                    export.skipped_files.push(path);
                    continue;
                }
                Err(e) => return Err(e),
            };

            for entry in entries {
                match entry {
                    Ok(record) => export.records.push(record),
                    Err(e) if self.config.skip_invalid => {
                        tracing::warn!(file = %path.display(), error = %e, "skipping entry");
                        export.skipped_entries += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(export)
    }
}

impl Default for VoiceLogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveParser for VoiceLogParser {
    type Output = VoiceExport;

    fn name(&self) -> &'static str {
        "Google Voice"
    }

    fn kind(&self) -> ArchiveKind {
        ArchiveKind::Voice
    }

    fn parse(&self, path: &Path) -> Result<VoiceExport> {
        self.parse_dir(path)
    }
}

/// Everything a takeout directory produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceExport {
    /// Records in file order, then entry order
    pub records: Vec<VoiceRecord>,
    /// Files that were skipped as a whole
    pub skipped_files: Vec<PathBuf>,
    /// Number of individual entries that were dropped
    pub skipped_entries: usize,
}

impl VoiceExport {
    /// Number of problems encountered.
    pub fn skipped(&self) -> usize {
        self.skipped_files.len() + self.skipped_entries
    }
}

fn list_html_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "html") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn parse_entry(meta: &FileMeta, entry: ElementRef<'_>) -> Result<VoiceRecord> {
    let context = meta.variant.file_label();
    let mut abbrs = entry.select(&ABBR);

    let raw = abbrs
        .next()
        .map(element_text)
        .ok_or_else(|| CommpackError::missing_element("abbr", context))?;
    let timestamp = DatePhrase::parse(&raw)?.to_utc()?;

    let content = match meta.variant {
        Variant::Text => entry
            .select(&QUOTE)
            .next()
            .map(element_text)
            .ok_or_else(|| CommpackError::missing_element("q", context))?,
        Variant::Voicemail => match entry.select(&FULL_TEXT).next() {
            Some(span) => format!("Transcription: {}", element_text(span)),
            None => {
                tracing::debug!(number = %meta.number, "voicemail has no transcription");
                NO_TRANSCRIPTION.to_string()
            }
        },
        Variant::Received | Variant::Placed | Variant::Missed => abbrs
            .next()
            .map(|duration| {
                let text: String = element_text(duration).chars().skip(1).take(8).collect();
                format!("Call Duration: {text}")
            })
            .unwrap_or_default(),
    };

    Ok(VoiceRecord::new(
        meta.variant,
        timestamp,
        meta.number.clone(),
        content,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(stem: &str) -> FileMeta {
        FileMeta::parse(stem).unwrap()
    }

    #[test]
    fn test_parse_text_entry() {
        let html = r#"<html><body>
            <div class="message"><abbr class="dt">Jan 5, 2021, 3:04:05 PM
Eastern Time</abbr>: <cite>Me</cite> <q>hello</q></div>
        </body></html>"#;

        let parser = VoiceLogParser::new();
        let results = parser.parse_document(&meta("+15551234567 - Text - 2021-01-05T20_04_05Z"), html);
        assert_eq!(results.len(), 1);

        let record = results[0].as_ref().unwrap();
        assert_eq!(record.timestamp_utc(), "2021-01-05T20:04:05Z");
        assert_eq!(record.title(), "📟 SMS");
        assert_eq!(record.kind(), "📟 SMS");
        assert_eq!(record.origin, "+15551234567");
        assert_eq!(record.content, "hello");
    }

    #[test]
    fn test_text_entry_without_quote_fails() {
        let html = r#"<div class="message"><abbr>Jan 5, 2021, 3:04:05 PM Eastern Time</abbr></div>
            <div class="message"><abbr>Jan 6, 2021, 3:04:05 PM Eastern Time</abbr><q>ok</q></div>"#;
        let results = VoiceLogParser::new().parse_document(&meta("x - Text - t"), html);
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert_eq!(results[1].as_ref().unwrap().content, "ok");
    }

    #[test]
    fn test_voicemail_transcription() {
        let html = r#"<div class="haudio"><abbr>Jul 4, 2020, 10:00:00 AM Eastern Time</abbr>
            <span class="full-text">call me back</span></div>"#;
        let results = VoiceLogParser::new().parse_document(&meta("x - Voicemail - t"), html);
        let record = results[0].as_ref().unwrap();
        assert_eq!(record.content, "Transcription: call me back");
        assert_eq!(record.timestamp_utc(), "2020-07-04T14:00:00Z");
    }

    #[test]
    fn test_voicemail_without_transcription() {
        let html = r#"<div class="haudio"><abbr>Jul 4, 2020, 10:00:00 AM Eastern Time</abbr></div>
            <div class="haudio"><abbr>Jul 5, 2020, 10:00:00 AM Eastern Time</abbr>
            <span class="full-text">second</span></div>"#;
        let results = VoiceLogParser::new().parse_document(&meta("x - Voicemail - t"), html);
        assert_eq!(results[0].as_ref().unwrap().content, NO_TRANSCRIPTION);
        assert_eq!(results[1].as_ref().unwrap().content, "Transcription: second");
    }

    #[test]
    fn test_call_duration() {
        let html = r#"<div class="haudio"><abbr class="published">Jan 5, 2021, 3:04:05 PM Eastern Time</abbr>
            <abbr class="duration">(00:01:02)</abbr></div>"#;
        let results = VoiceLogParser::new().parse_document(&meta("x - Received - t"), html);
        let record = results[0].as_ref().unwrap();
        assert_eq!(record.content, "Call Duration: 00:01:02");
        assert_eq!(record.title(), "📲 Call-Received");
    }

    #[test]
    fn test_call_without_duration() {
        let html = r#"<div class="haudio"><abbr>Jan 5, 2021, 3:04:05 PM Eastern Time</abbr></div>"#;
        let results = VoiceLogParser::new().parse_document(&meta("x - Missed - t"), html);
        assert_eq!(results[0].as_ref().unwrap().content, "");
    }

    #[test]
    fn test_bad_date_phrase_is_entry_error() {
        let html = r#"<div class="message"><abbr>yesterday</abbr><q>hi</q></div>"#;
        let results = VoiceLogParser::new().parse_document(&meta("x - Text - t"), html);
        assert!(results[0].as_ref().unwrap_err().is_invalid_timestamp());
    }

    #[test]
    fn test_selector_follows_variant() {
        // Text documents ignore haudio entries and vice versa
        let html = r#"<div class="haudio"><abbr>Jan 5, 2021, 3:04:05 PM Eastern Time</abbr></div>"#;
        assert!(VoiceLogParser::new().parse_document(&meta("x - Text - t"), html).is_empty());
    }

    #[test]
    fn test_parser_name() {
        let parser = VoiceLogParser::default();
        assert_eq!(parser.name(), "Google Voice");
        assert_eq!(parser.kind(), ArchiveKind::Voice);
        assert!(parser.config().skip_invalid);
    }
}
