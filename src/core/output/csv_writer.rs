//! CSV output writers.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use csv::{Terminator, WriterBuilder};

use crate::error::Result;
use crate::record::{MailRecord, VoiceRecord};

/// Header cells of the Voice-Log export.
pub const VOICE_HEADER: [&str; 5] = ["Title", "Date (GMT)", "Type", "From", "Content"];

fn builder() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder.delimiter(b',').terminator(Terminator::Any(b'\n'));
    builder
}

/// Writes Voice-Log records to `output_path`.
///
/// # Format
/// - Delimiter: `,`
/// - Columns: `Title`, `Date (GMT)`, `Type`, `From`, `Content`
/// - Encoding: UTF-8
pub fn write_voice_csv(records: &[VoiceRecord], output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    write_voice_rows(records, BufWriter::new(file))
}

/// Renders Voice-Log records as a CSV string.
pub fn to_voice_csv(records: &[VoiceRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_voice_rows(records, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_voice_rows<W: Write>(records: &[VoiceRecord], out: W) -> Result<()> {
    let mut writer = builder().from_writer(out);
    writer.write_record(VOICE_HEADER)?;

    for record in records {
        let timestamp = record.timestamp_utc();
        writer.write_record([
            record.title(),
            timestamp.as_str(),
            record.kind(),
            record.origin.as_str(),
            record.content.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Row-at-a-time writer for Mailbox exports.
///
/// The header is written on creation; rows follow as messages are
/// converted, so memory use does not grow with the archive.
pub struct MailCsvWriter<W: Write> {
    writer: csv::Writer<W>,
    rows: u64,
}

impl MailCsvWriter<BufWriter<File>> {
    /// Creates `path` and writes the header row.
    pub fn create<S: AsRef<str>>(path: &Path, headers: &[S]) -> Result<Self> {
        let file = File::create(path)?;
        Self::new(BufWriter::new(file), headers)
    }
}

impl<W: Write> MailCsvWriter<W> {
    /// Wraps `out` and writes the header row.
    pub fn new<S: AsRef<str>>(out: W, headers: &[S]) -> Result<Self> {
        let mut writer = builder().from_writer(out);
        writer.write_record(headers.iter().map(AsRef::<str>::as_ref))?;
        Ok(Self { writer, rows: 0 })
    }

    /// Writes the enabled columns of one record.
    pub fn write_record(&mut self, record: &MailRecord) -> Result<()> {
        self.writer.write_record(record.to_row())?;
        self.rows += 1;
        Ok(())
    }

    /// Number of data rows written so far.
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Flushes and returns the row count.
    pub fn finish(mut self) -> Result<u64> {
        self.writer.flush()?;
        Ok(self.rows)
    }

    /// Flushes and returns the inner writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::CommpackError::Io(e.into_error()))
    }
}
