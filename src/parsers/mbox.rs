//! mbox archive parser.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use mailparse::{MailHeaderMap, ParsedMail};

use crate::config::MailboxConfig;
use crate::error::{CommpackError, Result};
use crate::normalize::{clean_email_body, extract_addresses, join_addresses};
use crate::parser::{ArchiveKind, ArchiveParser};
use crate::parsing::mbox::MboxReader;
use crate::record::{MailField, MailRecord};

/// Characters in a subject that are replaced by [`SUBJECT_BREAK`].
const SUBJECT_CONTROL: &[char] = &['\n', '\t', '\r'];

/// Replacement for line breaks and tabs inside a subject.
pub const SUBJECT_BREAK: &str = " -- ";

/// Read buffer for archive files.
const BUFFER_SIZE: usize = 64 * 1024;

/// Parser for mbox archives.
///
/// Only the columns enabled in [`MailboxConfig`] are computed. Missing or
/// unreadable headers become empty cells, so every row has the same width.
///
/// # Example
///
/// ```rust
/// use commpack::config::MailboxConfig;
/// use commpack::parsers::MailboxParser;
/// use commpack::record::MailField;
///
/// let parser = MailboxParser::with_config(MailboxConfig::new().without_column(MailField::Body));
/// let message = parser.convert(b"From: Ann <ANN@example.com>\r\nSubject: hi\r\n\r\nbody")?;
///
/// assert_eq!(message.record.sent_from.as_deref(), Some("ann@example.com"));
/// assert_eq!(message.record.body, None);
/// # Ok::<(), commpack::CommpackError>(())
/// ```
pub struct MailboxParser {
    config: MailboxConfig,
}

/// One converted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// The enabled columns
    pub record: MailRecord,
    /// `To` and `Cc` addresses, computed whether or not those columns are enabled
    pub recipients: Vec<String>,
}

impl MailboxParser {
    pub fn new() -> Self {
        Self {
            config: MailboxConfig::default(),
        }
    }

    pub fn with_config(config: MailboxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MailboxConfig {
        &self.config
    }

    /// Converts the raw bytes of one message.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the bytes are not an RFC 5322 message.
    pub fn convert(&self, raw: &[u8]) -> Result<MailMessage> {
        let mail = mailparse::parse_mail(raw).map_err(|e| CommpackError::mbox_parse(e, None))?;
        Ok(self.convert_parsed(&mail))
    }

    /// Converts the raw bytes of one message into a row.
    pub fn parse_message(&self, raw: &[u8]) -> Result<MailRecord> {
        self.convert(raw).map(|message| message.record)
    }

    /// Converts an already parsed message.
    pub fn convert_parsed(&self, mail: &ParsedMail<'_>) -> MailMessage {
        let mut recipients = extract_addresses(&header(mail, "To"));
        recipients.extend(extract_addresses(&header(mail, "Cc")));
        recipients.sort();
        recipients.dedup();

        MailMessage {
            record: self.build_record(mail),
            recipients,
        }
    }

    /// Builds the row for an already parsed message.
    pub fn build_record(&self, mail: &ParsedMail<'_>) -> MailRecord {
        let enabled = |field| self.config.is_enabled(field);

        MailRecord {
            date: enabled(MailField::Date).then(|| self.date(mail)),
            sent_from: enabled(MailField::SentFrom).then(|| addresses(mail, "From")),
            sent_to: enabled(MailField::SentTo).then(|| addresses(mail, "To")),
            cc: enabled(MailField::Cc).then(|| addresses(mail, "Cc")),
            subject: enabled(MailField::Subject).then(|| self.subject(mail)),
            body: enabled(MailField::Body).then(|| body(mail)),
        }
    }

    /// Streams converted messages from an archive file.
    ///
    /// Each item is one message; a message that cannot be parsed yields an
    /// `Err` and the stream continues with the next one.
    pub fn stream(&self, path: &Path) -> Result<MailboxStream<'_, BufReader<File>>> {
        let file = File::open(path)?;
        let reader = BufReader::with_capacity(BUFFER_SIZE, file);
        Ok(self.stream_reader(reader, Some(path.to_path_buf())))
    }

    /// Streams converted messages from any buffered reader.
    pub fn stream_reader<R: BufRead>(&self, reader: R, path: Option<PathBuf>) -> MailboxStream<'_, R> {
        MailboxStream {
            parser: self,
            messages: MboxReader::new(reader),
            path,
        }
    }

    fn date(&self, mail: &ParsedMail<'_>) -> String {
        let value = header(mail, "Date");
        if value.trim().is_empty() {
            return String::new();
        }
        match mailparse::dateparse(&value) {
            Ok(epoch) => self.config.render_date(epoch).unwrap_or_default(),
            Err(e) => {
                tracing::debug!(date = %value, error = %e, "unparsable Date header");
                String::new()
            }
        }
    }

    fn subject(&self, mail: &ParsedMail<'_>) -> String {
        let subject = header(mail, "Subject").replace(SUBJECT_CONTROL, SUBJECT_BREAK);
        match &self.config.subject_prepend {
            Some(prefix) => format!("{prefix}{subject}"),
            None => subject,
        }
    }
}

impl Default for MailboxParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveParser for MailboxParser {
    type Output = MailboxExport;

    fn name(&self) -> &'static str {
        "mbox"
    }

    fn kind(&self) -> ArchiveKind {
        ArchiveKind::Mbox
    }

    fn parse(&self, path: &Path) -> Result<MailboxExport> {
        let mut export = MailboxExport::default();
        for message in self.stream(path)? {
            match message {
                Ok(message) => export.records.push(message.record),
                Err(e) if e.is_io() => return Err(e),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping message");
                    export.cant_convert += 1;
                }
            }
        }
        Ok(export)
    }
}

/// Every row an archive produced, collected in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxExport {
    /// Rows in storage order
    pub records: Vec<MailRecord>,
    /// Messages that could not be parsed
    pub cant_convert: u64,
}

/// Iterator returned by [`MailboxParser::stream`].
pub struct MailboxStream<'a, R: BufRead> {
    parser: &'a MailboxParser,
    messages: MboxReader<R>,
    path: Option<PathBuf>,
}

impl<R: BufRead> MailboxStream<'_, R> {
    /// Bytes of the archive consumed so far.
    pub fn bytes_read(&self) -> u64 {
        self.messages.bytes_read()
    }
}

impl<R: BufRead> Iterator for MailboxStream<'_, R> {
    type Item = Result<MailMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        let raw = match self.messages.next()? {
            Ok(raw) => raw,
            Err(e) => return Some(Err(e.into())),
        };
        Some(
            mailparse::parse_mail(&raw)
                .map(|mail| self.parser.convert_parsed(&mail))
                .map_err(|e| CommpackError::mbox_parse(e, self.path.clone())),
        )
    }
}

/// First value of a header, decoded, or `""`.
fn header(mail: &ParsedMail<'_>, name: &str) -> String {
    mail.headers.get_first_value(name).unwrap_or_default()
}

fn addresses(mail: &ParsedMail<'_>, name: &str) -> String {
    join_addresses(&header(mail, name))
}

/// Cleaned content of the first non-multipart part, in pre-order.
fn body(mail: &ParsedMail<'_>) -> String {
    let Some(part) = first_leaf(mail) else {
        return String::new();
    };
    match part.get_body_raw() {
        Ok(raw) => clean_email_body(&raw, &part.ctype.charset),
        Err(e) => {
            tracing::debug!(error = %e, "undecodable body part");
            String::new()
        }
    }
}

fn first_leaf<'a, 'b>(mail: &'a ParsedMail<'b>) -> Option<&'a ParsedMail<'b>> {
    if mail.ctype.mimetype.to_ascii_lowercase().starts_with("multipart/") {
        mail.subparts.iter().find_map(first_leaf)
    } else {
        Some(mail)
    }
}
