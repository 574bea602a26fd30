//! Email address extraction from free-form header text.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// `user@example.com` or `<user@example.com>`.
static ADDRESS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<?([a-zA-Z0-9_\-.]+@[a-zA-Z0-9_\-.]+\.[a-zA-Z]{2,5})>?")
        .expect("valid address regex")
});

/// Extracts every address in `header`, lower-cased, deduplicated and sorted.
///
/// Display names and angle brackets are dropped. No match gives an empty
/// vector.
///
/// # Example
///
/// ```rust
/// use commpack::normalize::address::extract_addresses;
///
/// let header = "Bob <Bob@Example.com>, alice@example.com, bob@example.com";
/// assert_eq!(
///     extract_addresses(header),
///     vec!["alice@example.com", "bob@example.com"]
/// );
/// ```
pub fn extract_addresses(header: &str) -> Vec<String> {
    let unique: BTreeSet<String> = ADDRESS
        .captures_iter(header)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
        .collect();
    // Already lower-cased, so byte order is case-insensitive order.
    unique.into_iter().collect()
}

/// Extracts addresses and joins them with `", "`.
pub fn join_addresses(header: &str) -> String {
    extract_addresses(header).join(", ")
}

/// Returns the domain part of an address, if it has one.
pub fn domain_of(address: &str) -> Option<&str> {
    address.rsplit_once('@').map(|(_, domain)| domain)
}
