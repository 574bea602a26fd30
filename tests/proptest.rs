//! Property-based tests for commpack.
//!
//! These tests generate random inputs to find edge cases in the normalizers
//! and the positional grammars.

use chrono::{Days, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::America::New_York;
use proptest::prelude::*;

use commpack::normalize::quoted_printable;
use commpack::normalize::reply::visible_text;
use commpack::normalize::timestamp::{MultiReplacer, ZoneTable, is_eastern_dst};
use commpack::normalize::{ISO8601, extract_addresses};
use commpack::parsing::{DatePhrase, FileMeta, split_messages};
use commpack::record::Variant;

/// Generate an address from predefined parts (no regex!)
fn arb_address() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["ann", "Bob", "carol.d", "x_1", "dave-o", "EVE"]),
        prop::sample::select(vec!["example.com", "Mail.Example.org", "corp.net", "a-b.io"]),
    )
        .prop_map(|(local, domain)| format!("{local}@{domain}"))
}

/// Generate a header entry: bare address, bracketed, or with a display name
fn arb_header_entry() -> impl Strategy<Value = String> {
    (
        arb_address(),
        prop::sample::select(vec!["", "Jane", "\"Smith, Jane\"", "Иван"]),
        any::<bool>(),
    )
        .prop_map(|(address, name, bracket)| match (name.is_empty(), bracket) {
            (true, false) => address,
            (true, true) => format!("<{address}>"),
            (false, _) => format!("{name} <{address}>"),
        })
}

/// Generate a calendar date between 1995 and 2035
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..14_600).prop_map(|offset| {
        NaiveDate::from_ymd_opt(1995, 1, 1).unwrap() + Days::new(offset)
    })
}

fn arb_time() -> impl Strategy<Value = NaiveTime> {
    (0u32..24, 0u32..60, 0u32..60)
        .prop_map(|(h, m, s)| NaiveTime::from_hms_opt(h, m, s).unwrap())
}

fn arb_variant() -> impl Strategy<Value = Variant> {
    prop::sample::select(Variant::all().to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ============================================
    // ADDRESS PROPERTIES
    // ============================================

    /// Extraction yields sorted, unique, lower-case addresses
    #[test]
    fn addresses_sorted_unique_lowercase(entries in prop::collection::vec(arb_header_entry(), 0..8)) {
        let header = entries.join(", ");
        let addresses = extract_addresses(&header);

        prop_assert!(addresses.windows(2).all(|w| w[0] < w[1]));
        for address in &addresses {
            prop_assert_eq!(address, &address.to_lowercase());
        }
    }

    /// Every address in the header is found
    #[test]
    fn addresses_complete(entries in prop::collection::vec(arb_address(), 1..8)) {
        let addresses = extract_addresses(&entries.join("; "));
        for entry in &entries {
            prop_assert!(addresses.contains(&entry.to_lowercase()));
        }
    }

    /// Extracting from the joined output changes nothing
    #[test]
    fn addresses_idempotent(entries in prop::collection::vec(arb_header_entry(), 0..8)) {
        let once = extract_addresses(&entries.join(", "));
        let twice = extract_addresses(&once.join(", "));
        prop_assert_eq!(once, twice);
    }

    // ============================================
    // DAYLIGHT-SAVING PROPERTIES
    // ============================================

    /// The zone table always agrees with the daylight-saving predicate
    #[test]
    fn zone_table_matches_dst(date in arb_date()) {
        let dst = is_eastern_dst(date).unwrap();
        let table = ZoneTable::for_date(date).unwrap();
        prop_assert_eq!(table == ZoneTable::Daylight, dst);
        prop_assert_eq!(is_eastern_dst(date).unwrap(), dst);
    }

    /// Away from transition days, Eastern phrases match the tz database
    #[test]
    fn eastern_phrase_matches_tz(date in arb_date(), time in arb_time()) {
        let next = date + Days::new(1);
        prop_assume!(is_eastern_dst(date).unwrap() == is_eastern_dst(next).unwrap());

        let local = date.and_time(time);
        let raw = format!("{}\nEastern Time", local.format("%b %-d, %Y, %-I:%M:%S %p"));
        let phrase = DatePhrase::parse(&raw).unwrap();
        let utc = phrase.to_utc().unwrap();

        let expected = New_York.from_local_datetime(&local).single().unwrap();
        prop_assert_eq!(utc.format(ISO8601).to_string(), expected.naive_utc().format(ISO8601).to_string());
    }

    /// The reference date of a phrase is its calendar date
    #[test]
    fn phrase_reference_date(date in arb_date(), time in arb_time(), weekday in any::<bool>()) {
        let local = date.and_time(time);
        let layout = if weekday { "%a, %b %-d, %Y, %-I:%M:%S %p" } else { "%b %-d, %Y, %-I:%M:%S %p" };
        let raw = format!("{} Pacific Time", local.format(layout));
        prop_assert_eq!(DatePhrase::parse(&raw).unwrap().reference_date().unwrap(), date);
    }

    // ============================================
    // GRAMMAR PROPERTIES
    // ============================================

    /// Well-formed file names round-trip their parts
    #[test]
    fn file_name_parts(number in 1_000_000_000u64..9_999_999_999, variant in arb_variant(), date in arb_date(), time in arb_time()) {
        let number = format!("+1{number}");
        let token = date.and_time(time).format("%Y-%m-%dT%H_%M_%SZ").to_string();
        let stem = format!("{number} - {variant} - {token}");

        let meta = FileMeta::parse(&stem).unwrap();
        prop_assert_eq!(&meta.number, &number);
        prop_assert_eq!(meta.variant, variant);
        prop_assert!(meta.nominal_time().is_some());
        prop_assert_eq!(meta.nominal_timestamp, token.replace('_', ":"));
    }

    /// Longer keys win over their prefixes
    #[test]
    fn replacer_longest_match(key in prop::sample::select(vec!["a", "ab", "Eastern", "Time", "x y"]), suffix in prop::sample::select(vec!["c", " Time", "!"])) {
        let long = format!("{key}{suffix}");
        let replacer = MultiReplacer::new([(key, "SHORT"), (long.as_str(), "LONG")]);
        prop_assert_eq!(replacer.apply(&long), "LONG");
        prop_assert_eq!(replacer.apply(&format!("{long} {key}")), "LONG SHORT");
    }

    // ============================================
    // CONTENT PROPERTIES
    // ============================================

    /// Quoted-printable decoding never panics and never grows the input
    #[test]
    fn qp_decode_total(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let decoded = quoted_printable::decode(&input);
        prop_assert!(decoded.len() <= input.len());
    }

    /// Input without '=' passes through unchanged
    #[test]
    fn qp_decode_identity(input in "[a-zA-Z0-9 .,\n]{0,64}") {
        prop_assert_eq!(quoted_printable::decode(input.as_bytes()), input.as_bytes());
    }

    /// Visible text is always trimmed
    #[test]
    fn visible_text_trimmed(lines in prop::collection::vec(prop::sample::select(vec![
        "Hello", "", "  ", "> quoted", "--", "Sent from my iPhone", "On Mon, Bob wrote:", "answer",
    ]), 0..10)) {
        let text = visible_text(&lines.join("\n"));
        prop_assert_eq!(text.trim(), text.as_str());
    }

    // ============================================
    // MBOX PROPERTIES
    // ============================================

    /// One message per separator line
    #[test]
    fn mbox_split_count(bodies in prop::collection::vec(prop::sample::select(vec![
        "hello", "", "line one\nline two", ">From quoted", "from lower case", "Привет",
    ]), 0..12)) {
        let mut archive = String::new();
        for (i, body) in bodies.iter().enumerate() {
            archive.push_str(&format!("From sender{i}@example.com Mon Jan  4 10:00:00 2021\nSubject: {i}\n\n{body}\n\n"));
        }

        let messages = split_messages(archive.as_bytes());
        prop_assert_eq!(messages.len(), bodies.len());
        for (i, message) in messages.iter().enumerate() {
            let expected = format!("Subject: {i}\n");
            prop_assert!(message.starts_with(expected.as_bytes()));
        }
    }
}
