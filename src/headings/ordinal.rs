//! Ordinal lookup tables for heading numbering.
//!
//! Headings in the supported books are numbered with Roman numerals, decimal
//! digits or German ordinal words ("Erstes Buch", "Zweiter Teil").

use std::sync::OnceLock;

/// Highest Roman numeral recognized in headings.
pub const MAX_ROMAN_ORDINAL: u32 = 50;

/// German month names, used to tell numbered titles apart from dates.
pub const GERMAN_MONTHS: [&str; 13] = [
    "Januar",
    "Jänner",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// German ordinal stems with their values. Longer stems sort first so that
/// "achtzehnt" wins over "acht".
pub const GERMAN_ORDINAL_STEMS: [(&str, u32); 21] = [
    ("dreizehnt", 13),
    ("vierzehnt", 14),
    ("fünfzehnt", 15),
    ("achtzehnt", 18),
    ("neunzehnt", 19),
    ("zwanzigst", 20),
    ("sechzehnt", 16),
    ("siebzehnt", 17),
    ("siebent", 7),
    ("zwölft", 12),
    ("sechst", 6),
    ("zweit", 2),
    ("dritt", 3),
    ("viert", 4),
    ("fünft", 5),
    ("neunt", 9),
    ("zehnt", 10),
    ("siebt", 7),
    ("erst", 1),
    ("acht", 8),
    ("elft", 11),
];

/// Inflection endings accepted after a German ordinal stem.
pub const GERMAN_ORDINAL_SUFFIXES: [&str; 5] = ["es", "er", "en", "em", "e"];

/// Render a number as an uppercase Roman numeral.
///
/// # Examples
///
/// ```
/// use scan_oxide::headings::ordinal::to_roman;
///
/// assert_eq!(to_roman(4), "IV");
/// assert_eq!(to_roman(49), "XLIX");
/// ```
pub fn to_roman(mut n: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for &(value, glyphs) in TABLE.iter() {
        while n >= value {
            out.push_str(glyphs);
            n -= value;
        }
    }
    out
}

static ROMAN_NUMERALS: OnceLock<Vec<String>> = OnceLock::new();

/// All Roman numerals recognized in headings, longest first.
pub fn roman_numerals() -> &'static [String] {
    ROMAN_NUMERALS.get_or_init(|| {
        let mut all: Vec<String> = (1..=MAX_ROMAN_ORDINAL).map(to_roman).collect();
        all.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        all
    })
}

/// Value of a Roman numeral from the recognized set.
///
/// # Examples
///
/// ```
/// use scan_oxide::headings::ordinal::roman_value;
///
/// assert_eq!(roman_value("XIV"), Some(14));
/// assert_eq!(roman_value("IIII"), None);
/// ```
pub fn roman_value(text: &str) -> Option<u32> {
    let text = text.trim();
    (1..=MAX_ROMAN_ORDINAL).find(|&n| to_roman(n) == text)
}

/// Value of a decimal heading number. Only ASCII digits are accepted and
/// the value must fit in a `u32`; leading zeros are ignored.
///
/// # Examples
///
/// ```
/// use scan_oxide::headings::ordinal::decimal_value;
///
/// assert_eq!(decimal_value("007"), Some(7));
/// assert_eq!(decimal_value("4294967296"), None);
/// ```
pub fn decimal_value(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Value of a German ordinal word such as "Drittes" or "ZWÖLFTER".
pub fn german_ordinal_value(word: &str) -> Option<u32> {
    let lower = word.trim().to_lowercase();
    GERMAN_ORDINAL_STEMS.iter().find_map(|&(stem, value)| {
        lower
            .strip_prefix(stem)
            .filter(|rest| GERMAN_ORDINAL_SUFFIXES.contains(rest))
            .map(|_| value)
    })
}

/// Whether a word is a German month name.
pub fn is_german_month(word: &str) -> bool {
    let lower = word.to_lowercase();
    GERMAN_MONTHS.iter().any(|m| m.to_lowercase() == lower)
}
