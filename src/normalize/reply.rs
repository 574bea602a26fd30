//! Reply-chain trimming for email bodies.
//!
//! Keeps the newest message of a reply chain and hides what mail clients
//! append below it: quote headers (`On ... wrote:`), `>`-quoted history and
//! signatures. Quotes that are followed by more reply text (interleaved
//! answers) stay visible.

use std::sync::LazyLock;

use regex::Regex;

/// `On <date>, <someone> wrote:` on one line.
static QUOTE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*On\s.+wrote:\s*$").expect("valid quote header regex"));

/// First half of a quote header wrapped by the client.
static QUOTE_HEADER_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*On\s.+").expect("valid quote header start regex"));

static QUOTE_HEADER_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.*wrote:\s*$").expect("valid quote header end regex"));

/// `--`, `__`, `-Name` or `Sent from my ...` lines.
///
/// Only a signature when a blank line sits directly above it.
static SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(--|__)\s*$|^-\w|^Sent from my (\w+\s*){1,3}$").expect("valid signature regex")
});

const ORIGINAL_MESSAGE: &str = "-----Original Message-----";

/// Returns only the newest message of `body`.
pub fn visible_text(body: &str) -> String {
    let normalized = body.replace("\r\n", "\n");
    let mut lines: Vec<&str> = normalized.lines().collect();

    if let Some(cut) = quote_header_index(&lines) {
        lines.truncate(cut);
    }

    loop {
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }

        if lines.last().is_some_and(|l| is_quoted(l)) {
            while lines
                .last()
                .is_some_and(|l| is_quoted(l) || l.trim().is_empty())
            {
                lines.pop();
            }
            continue;
        }

        // Signatures only hide the trailing unquoted block
        let block_start = lines
            .iter()
            .rposition(|l| is_quoted(l))
            .map_or(0, |i| i + 1);
        match (block_start.max(1)..lines.len())
            .rev()
            .find(|&i| lines[i - 1].trim().is_empty() && SIGNATURE.is_match(lines[i].trim_end()))
        {
            Some(cut) => lines.truncate(cut),
            None => break,
        }
    }

    lines.join("\n").trim().to_string()
}

/// Finds the first line starting quoted history, if any.
fn quote_header_index(lines: &[&str]) -> Option<usize> {
    lines.iter().enumerate().find_map(|(i, line)| {
        let trimmed = line.trim();
        if trimmed == ORIGINAL_MESSAGE || QUOTE_HEADER.is_match(line) {
            return Some(i);
        }
        let wrapped = QUOTE_HEADER_START.is_match(line)
            && lines.get(i + 1).is_some_and(|next| QUOTE_HEADER_END.is_match(next));
        wrapped.then_some(i)
    })
}

fn is_quoted(line: &str) -> bool {
    line.trim_start().starts_with('>')
}
