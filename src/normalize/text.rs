//! Markup and encoding cleanup for message content.
//!
//! - [`strip_markup`] - keep only the text nodes of an HTML snippet
//! - [`decode_charset`] - bytes to text for the charsets mail archives use
//! - [`clean_email_body`] - the full email body pipeline: quoted-printable,
//!   charset, markup, reply trimming

use charset::Charset;
use scraper::Html;

use super::{quoted_printable, reply};

/// Content used for voicemails that have no machine transcription.
pub const NO_TRANSCRIPTION: &str = "NO TRANSCRIPTION. SEE AUDIO FILE";

/// Removes all tags, concatenating text nodes in document order.
///
/// Character references are decoded (`&amp;` → `&`).
pub fn strip_markup(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    fragment.root_element().text().collect()
}

/// Decodes `bytes` using a MIME charset label.
///
/// Labels are resolved through the WHATWG encoding registry (plus UTF-7), so
/// `latin1`, `cp1252` and `koi8-r` all work. An empty or `us-ascii` label
/// is read as UTF-8. Returns `None` for labels the registry does not know, which callers
/// treat as "cannot be decoded".
pub fn decode_charset(bytes: &[u8], charset: &str) -> Option<String> {
    let label = charset.trim();
    // mailparse reports us-ascii for parts without a declared charset
    if label.is_empty() || label.eq_ignore_ascii_case("us-ascii") {
        return Some(String::from_utf8_lossy(bytes).into_owned());
    }
    let encoding = Charset::for_label(label.as_bytes())?;
    let (text, _malformed) = encoding.decode_without_bom_handling(bytes);
    Some(text.into_owned())
}

/// Cleans one email body part.
///
/// Reverses quoted-printable, decodes the charset, strips markup and keeps
/// only the newest message of a reply chain. An undecodable charset yields
/// an empty string.
pub fn clean_email_body(raw: &[u8], charset: &str) -> String {
    let decoded = quoted_printable::decode(raw);
    let Some(text) = decode_charset(&decoded, charset) else {
        tracing::debug!(charset, "unsupported charset, dropping body");
        return String::new();
    };
    reply::visible_text(&strip_markup(&text))
}
