//! mbox archive splitting.
//!
//! An mbox file is a concatenation of RFC 5322 messages, each introduced by a
//! `From ` separator line. [`MboxReader`] yields the raw bytes of one message
//! at a time, without the separator line, so archives of any size are read
//! in constant memory.

use std::io::{self, BufRead};

/// Prefix of the separator line that starts every message.
pub const SEPARATOR: &[u8] = b"From ";

/// Streaming iterator over the messages of an mbox archive.
///
/// Any line starting with `From ` begins a new message. Bytes before the
/// first separator are ignored. The line ending that precedes a separator
/// belongs to the archive format and is not part of the message.
///
/// # Example
///
/// ```rust
/// use commpack::parsing::mbox::MboxReader;
///
/// let archive = b"From a@x Mon Jan  4 10:00:00 2021\nSubject: one\n\nhi\n\nFrom b@x Tue Jan  5 10:00:00 2021\nSubject: two\n\nyo\n";
/// let messages: Vec<Vec<u8>> = MboxReader::new(&archive[..])
///     .collect::<std::io::Result<_>>()?;
///
/// assert_eq!(messages.len(), 2);
/// assert!(messages[1].starts_with(b"Subject: two"));
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct MboxReader<R: BufRead> {
    reader: R,
    line: Vec<u8>,
    current: Option<Vec<u8>>,
    bytes_read: u64,
    finished: bool,
}

impl<R: BufRead> MboxReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::with_capacity(1024),
            current: None,
            bytes_read: 0,
            finished: false,
        }
    }

    /// Total bytes consumed from the underlying reader so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn read_line(&mut self) -> io::Result<bool> {
        self.line.clear();
        let n = self.reader.read_until(b'\n', &mut self.line)?;
        self.bytes_read += n as u64;
        Ok(n > 0)
    }
}

impl<R: BufRead> Iterator for MboxReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            match self.read_line() {
                Ok(true) => {}
                Ok(false) => {
                    self.finished = true;
                    return self.current.take().map(|msg| Ok(finish_message(msg)));
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }

            if self.line.starts_with(SEPARATOR) {
                let completed = self.current.replace(Vec::new());
                if let Some(msg) = completed {
                    return Some(Ok(finish_message(msg)));
                }
                continue;
            }

            if let Some(current) = self.current.as_mut() {
                current.extend_from_slice(&self.line);
            }
        }
    }
}

/// Splits an in-memory archive into messages.
pub fn split_messages(archive: &[u8]) -> Vec<Vec<u8>> {
    // Reading from a slice cannot fail.
    MboxReader::new(archive).filter_map(io::Result::ok).collect()
}

/// Drops the single line ending that separates a message from the next `From ` line.
fn finish_message(mut msg: Vec<u8>) -> Vec<u8> {
    if msg.ends_with(b"\r\n") {
        msg.truncate(msg.len() - 2);
    } else if msg.ends_with(b"\n") {
        msg.truncate(msg.len() - 1);
    }
    msg
}
