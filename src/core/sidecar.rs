//! Sidecar files that annotate a Mailbox export.
//!
//! Two optional files in the working directory add context to the summary:
//!
//! - `.owners` - mapping of lower-case archive file-name fragment to the
//!   list of people who own matching archives, written as JSON or as a
//!   Python dict literal (`{'sales': ['Ann']}`)
//! - `.blacklist` - one domain per line; messages addressed to these
//!   domains are counted in the summary
//!
//! Neither file changes which rows are written, so [`Sidecars::load`] logs
//! an unreadable file and carries on without it.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::normalize::address::domain_of;

/// Default name of the owners sidecar.
pub const OWNERS_FILE: &str = ".owners";

/// Default name of the blacklist sidecar.
pub const BLACKLIST_FILE: &str = ".blacklist";

/// Archive owners keyed by file-name fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owners(BTreeMap<String, Vec<String>>);

impl Owners {
    pub fn new(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }

    /// Reads an owners file; a missing file means no owners.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses JSON or a Python dict literal with single-quoted strings.
    pub fn parse(content: &str) -> Result<Self> {
        match serde_json::from_str(content) {
            Ok(owners) => Ok(owners),
            Err(_) => Ok(serde_json::from_str(&literal_to_json(content))?),
        }
    }

    /// Returns the owners of every fragment contained in `file_name`.
    ///
    /// The file name is lower-cased before matching; fragments are used as
    /// written.
    pub fn for_archive(&self, file_name: &str) -> Vec<String> {
        let file_name = file_name.to_lowercase();
        self.0
            .iter()
            .filter(|(fragment, _)| file_name.contains(fragment.as_str()))
            .flat_map(|(_, owners)| owners.iter().cloned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Domains whose recipients are reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    domains: BTreeSet<String>,
}

impl Blacklist {
    /// Builds a blacklist from domain names; blank entries are ignored.
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains = domains
            .into_iter()
            .map(|d| d.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        Self { domains }
    }

    /// Reads a blacklist file; a missing file means an empty list.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(Self::new(content.lines()))
    }

    /// Returns the blacklisted domain `address` belongs to, if any.
    ///
    /// A domain matches itself and its subdomains.
    pub fn matching_domain(&self, address: &str) -> Option<&str> {
        let domain = domain_of(address)?.to_lowercase();
        self.domains
            .iter()
            .find(|listed| {
                domain == **listed
                    || domain
                        .strip_suffix(listed.as_str())
                        .is_some_and(|rest| rest.ends_with('.'))
            })
            .map(String::as_str)
    }

    /// Returns `true` if `address` belongs to a blacklisted domain.
    pub fn matches(&self, address: &str) -> bool {
        self.matching_domain(address).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }
}

/// Owners and blacklist loaded together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sidecars {
    pub owners: Owners,
    pub blacklist: Blacklist,
}

impl Sidecars {
    /// Loads `.owners` and `.blacklist` from `dir`.
    ///
    /// A file that cannot be read or parsed is logged and treated as empty.
    pub fn load(dir: &Path) -> Self {
        let owners_path = dir.join(OWNERS_FILE);
        let owners = Owners::load(&owners_path).unwrap_or_else(|e| {
            tracing::warn!(path = %owners_path.display(), error = %e, "ignoring owners file");
            Owners::default()
        });

        let blacklist_path = dir.join(BLACKLIST_FILE);
        let blacklist = Blacklist::load(&blacklist_path).unwrap_or_else(|e| {
            tracing::warn!(path = %blacklist_path.display(), error = %e, "ignoring blacklist file");
            Blacklist::default()
        });

        Self { owners, blacklist }
    }
}

/// Rewrites a Python literal into JSON.
///
/// Single-quoted strings become double-quoted and trailing commas before `]`
/// or `}` are dropped.
fn literal_to_json(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    // Quote character of the string being copied, if inside one
    let mut quote: Option<char> = None;

    while let Some(c) = chars.next() {
        match (quote, c) {
            (None, '\'' | '"') => {
                quote = Some(c);
                out.push('"');
            }
            (None, ',') => {
                let rest = chars.clone().find(|c| !c.is_whitespace());
                if !matches!(rest, Some(']' | '}')) {
                    out.push(',');
                }
            }
            (None, _) => out.push(c),
            (Some(_), '\\') => match chars.next() {
                Some('\'') => out.push('\''),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            (Some(q), _) if c == q => {
                quote = None;
                out.push('"');
            }
            (Some(_), '"') => out.push_str("\\\""),
            (Some(_), _) => out.push(c),
        }
    }
    out
}
