//! Lenient quoted-printable decoding (RFC 2045 §6.7).
//!
//! Mail bodies in old archives are frequently mis-encoded, so nothing here
//! fails: a malformed `=` escape is copied through unchanged.

/// Decodes quoted-printable bytes.
///
/// - `=XX` (hex, either case) becomes the byte `0xXX`
/// - `=` at the end of a line is a soft line break and is removed along
///   with the line ending (`\n` or `\r\n`), including trailing whitespace
///   between `=` and the line ending
/// - anything else is copied as is
pub fn decode(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    let mut i = 0;

    while i < input.len() {
        let byte = input[i];
        if byte != b'=' {
            out.push(byte);
            i += 1;
            continue;
        }

        if let (Some(&hi), Some(&lo)) = (input.get(i + 1), input.get(i + 2)) {
            if let (Some(hi), Some(lo)) = (hex_value(hi), hex_value(lo)) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }

        if let Some(next) = soft_break_end(input, i + 1) {
            i = next;
            continue;
        }

        out.push(byte);
        i += 1;
    }

    out
}

/// Returns the index after a soft line break starting at `start`, if any.
fn soft_break_end(input: &[u8], start: usize) -> Option<usize> {
    let mut j = start;
    while j < input.len() && (input[j] == b' ' || input[j] == b'\t') {
        j += 1;
    }
    match input.get(j) {
        None => Some(j),
        Some(b'\n') => Some(j + 1),
        Some(b'\r') if input.get(j + 1) == Some(&b'\n') => Some(j + 2),
        _ => None,
    }
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
