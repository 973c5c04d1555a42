/// Comparison keys for restaurant names and addresses.
///
/// Both normalizers are pure: the same input always yields the same key.
/// They decide every match/no-match outcome and the stable ID, so changing
/// a rule here changes IDs for existing restaurants.
///
/// Name rules:
/// - lowercase, drop parenthesized segments ("Nopalito (9th Ave)")
/// - `&` becomes "and", apostrophes vanish, other punctuation is a space
/// - leading "the" and trailing "sf" / "san francisco" are stripped
///
/// Address rules:
/// - lowercase, drop unit designators ("#12", "Suite 200", "Ste. 5", "Unit B",
///   ", Fl 2", ", 2nd Floor")
/// - drop trailing comma-separated city/state/zip segments (", San Francisco, CA 94110");
///   a bare last word like "California" is a street, not a state
/// - punctuation is a space, street types are abbreviated ("street" -> "st")
use std::sync::OnceLock;

use regex::Regex;

use crate::model::RawRecord;

const STREET_ABBREVIATIONS: [(&str, &str); 8] = [
    ("street", "st"),
    ("avenue", "ave"),
    ("boulevard", "blvd"),
    ("road", "rd"),
    ("drive", "dr"),
    ("place", "pl"),
    ("lane", "ln"),
    ("court", "ct"),
];

/// Normalized name + address pair used for matching and ID derivation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey {
    pub name: String,
    /// Empty when the record carried no usable address
    pub address: String,
}

impl MatchKey {
    pub fn of(record: &RawRecord) -> Self {
        Self {
            name: normalize_name(&record.name),
            address: normalize_address(&record.address),
        }
    }
}

fn parenthetical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([^)]*\)").expect("valid regex"))
}

fn unit_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // "fl", "floor", "room" and "rm" double as ordinary words, so they
        // only count as unit designators directly after a comma.
        Regex::new(
            r"#\s*[a-z0-9-]+|\b(?:suite|ste|unit|apt)\b\.?\s*#?\s*[a-z0-9-]+|,\s*(?:(?:fl|floor|room|rm)\b\.?\s*#?\s*[a-z0-9-]+|\d+(?:st|nd|rd|th)\s+(?:fl|floor)\b)",
        )
        .expect("valid regex")
    })
}

/// A comma-separated address segment made only of city, state, zip or
/// country parts, e.g. " San Francisco, CA 94110" split into two segments.
fn locality_segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(?:san francisco|sf)?\s*(?:ca|california)?\s*(?:\d{5}(?:-\d{4})?)?\s*(?:usa|united states)?\s*$",
        )
        .expect("valid regex")
    })
}

/// City tail written without commas; the state and zip are only stripped
/// when "san francisco" precedes them.
fn inline_city_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s+san francisco(?:\s+(?:ca|california))?(?:\s+\d{5}(?:-\d{4})?)?\s*$")
            .expect("valid regex")
    })
}

/// Normalize a restaurant name into its comparison form.
///
/// Returns an empty string only when the name has no alphanumeric content.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let without_parens = parenthetical_re().replace_all(&lowered, " ");
    let folded = fold_punctuation(&without_parens);
    let tokens: Vec<&str> = folded.split_whitespace().collect();

    let stripped = strip_name_affixes(&tokens);
    if stripped.is_empty() {
        tokens.join(" ")
    } else {
        stripped.join(" ")
    }
}

/// Normalize a street address into its comparison form.
pub fn normalize_address(address: &str) -> String {
    let lowered = address.to_lowercase();
    let without_unit = unit_re().replace_all(&lowered, " ");
    let without_tail = strip_city_tail(&without_unit);

    without_tail
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| {
            STREET_ABBREVIATIONS
                .iter()
                .find(|(long, _)| *long == token)
                .map_or(token, |(_, short)| *short)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drop trailing locality segments, never the first (street) segment.
fn strip_city_tail(address: &str) -> String {
    let mut segments: Vec<&str> = address.split(',').collect();
    while segments.len() > 1
        && segments
            .last()
            .is_some_and(|segment| locality_segment_re().is_match(segment))
    {
        segments.pop();
    }
    let joined = segments.join(",");
    inline_city_re().replace(&joined, "").into_owned()
}

fn fold_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str(" and "),
            '\'' | '\u{2018}' | '\u{2019}' => {}
            c if c.is_alphanumeric() => out.push(c),
            _ => out.push(' '),
        }
    }
    out
}

/// Drop a leading article and trailing city qualifiers.
fn strip_name_affixes<'a>(tokens: &'a [&'a str]) -> &'a [&'a str] {
    let mut slice = tokens;
    if slice.first() == Some(&"the") {
        slice = &slice[1..];
    }
    loop {
        match slice {
            [rest @ .., "san", "francisco"] => slice = rest,
            [rest @ .., "sf"] => slice = rest,
            _ => break,
        }
    }
    slice
}
