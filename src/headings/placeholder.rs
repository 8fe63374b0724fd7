//! The placeholder grammar used in header patterns.
//!
//! A header pattern such as `"{roman-number} {title-in-capital-letters}"` is
//! literal text interleaved with `{name}` tokens. Every name maps to one
//! variant of [`Placeholder`], which knows its regex fragment and, for the two
//! conditions the `regex` crate cannot express without look-around, a
//! post-match check.

use super::ordinal::{
    decimal_value, german_ordinal_value, is_german_month, roman_numerals, roman_value,
    GERMAN_MONTHS, GERMAN_ORDINAL_STEMS,
};
use std::fmt;

/// Upper bound on the length of a `no-paragraph-end-marker` run.
pub const MAX_FREE_TEXT_LENGTH: usize = 200;

/// Paragraph-end markers used when a book type does not configure its own.
pub const DEFAULT_PARAGRAPH_END_MARKERS: [char; 5] = ['.', '!', '?', ':', ';'];

const UPPER: &str = "A-ZÄÖÜ";
const LOWER: &str = "a-zäöüß";
const QUOTES: &str = "\"'„“”‚‘’»«";

/// A named slot in a header pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// `roman-number`: a Roman numeral from the recognized set
    RomanNumber,
    /// `title-in-capital-letters`: an all-caps title
    TitleInCapitalLetters,
    /// `decimal-number`: one or more ASCII digits
    DecimalNumber,
    /// `title`: capital-initial text up to the next period
    Title,
    /// `title-with-decimal-number`: `12. Some Title`, never a date
    TitleWithDecimalNumber,
    /// `german-ordinal`: "Erstes", "Zweiter", ...
    GermanOrdinal,
    /// `place`: capitalized word(s)
    Place,
    /// `long-date`: `3. März 1921`
    LongDate,
    /// `no-paragraph-end-marker`: free text that does not end a sentence
    NoParagraphEndMarker,
}

impl Placeholder {
    /// Every placeholder in the grammar.
    pub const ALL: [Placeholder; 9] = [
        Placeholder::RomanNumber,
        Placeholder::TitleInCapitalLetters,
        Placeholder::DecimalNumber,
        Placeholder::Title,
        Placeholder::TitleWithDecimalNumber,
        Placeholder::GermanOrdinal,
        Placeholder::Place,
        Placeholder::LongDate,
        Placeholder::NoParagraphEndMarker,
    ];

    /// Name as written inside braces in a pattern.
    pub fn name(&self) -> &'static str {
        match self {
            Placeholder::RomanNumber => "roman-number",
            Placeholder::TitleInCapitalLetters => "title-in-capital-letters",
            Placeholder::DecimalNumber => "decimal-number",
            Placeholder::Title => "title",
            Placeholder::TitleWithDecimalNumber => "title-with-decimal-number",
            Placeholder::GermanOrdinal => "german-ordinal",
            Placeholder::Place => "place",
            Placeholder::LongDate => "long-date",
            Placeholder::NoParagraphEndMarker => "no-paragraph-end-marker",
        }
    }

    /// Look up a placeholder by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::headings::Placeholder;
    ///
    /// assert_eq!(Placeholder::from_name("roman-number"), Some(Placeholder::RomanNumber));
    /// assert_eq!(Placeholder::from_name("chapter"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name.trim())
    }

    /// Regex fragment for this placeholder. Fragments never contain capture
    /// groups; the pattern compiler wraps each one in exactly one.
    pub fn fragment(&self, paragraph_end_markers: &[char]) -> String {
        match self {
            Placeholder::RomanNumber => format!(r"\b(?:{})\b", roman_numerals().join("|")),
            Placeholder::TitleInCapitalLetters => {
                format!(r"[{UPPER}{QUOTES}][{UPPER}{QUOTES}\- ]{{2,}}")
            },
            Placeholder::DecimalNumber => "[0-9]+".to_string(),
            Placeholder::Title => format!(r"[{UPPER}][^.]{{2,}}"),
            Placeholder::TitleWithDecimalNumber => format!(r"[0-9]+\.\s*[{UPPER}][^.]{{2,}}"),
            Placeholder::GermanOrdinal => {
                let mut stems: Vec<&str> = GERMAN_ORDINAL_STEMS.iter().map(|(s, _)| *s).collect();
                stems.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
                format!(r"(?i:\b(?:{})(?:es|er|en|em|e)\b)", stems.join("|"))
            },
            Placeholder::Place => format!(r"[{UPPER}][{LOWER}]+(?:[ \-][{UPPER}][{LOWER}]+)*"),
            Placeholder::LongDate => {
                format!(r"[0-9]{{1,2}}\.\s?(?:{})\s[0-9]{{4}}", GERMAN_MONTHS.join("|"))
            },
            Placeholder::NoParagraphEndMarker => {
                let excluded: String = paragraph_end_markers
                    .iter()
                    .map(|c| regex::escape(&c.to_string()))
                    .collect();
                if excluded.is_empty() {
                    format!(r"[^\n]{{1,{}}}", MAX_FREE_TEXT_LENGTH + 1)
                } else {
                    format!(r"[^\n]{{0,{MAX_FREE_TEXT_LENGTH}}}[^\n{excluded}]")
                }
            },
        }
    }

    /// Post-match check for a captured value.
    ///
    /// `next` is the character that follows the capture in the matched line.
    /// Ordinal placeholders only accept values that convert to a number.
    pub fn accepts(&self, value: &str, next: Option<char>) -> bool {
        match self {
            Placeholder::RomanNumber => roman_value(value).is_some(),
            Placeholder::DecimalNumber => decimal_value(value).is_some(),
            Placeholder::GermanOrdinal => german_ordinal_value(value).is_some(),
            Placeholder::TitleWithDecimalNumber => {
                let rest = value.trim_start_matches(|c: char| c.is_ascii_digit());
                let rest = rest.trim_start_matches('.').trim_start();
                let first_word = rest
                    .split(|c: char| !c.is_alphabetic())
                    .next()
                    .unwrap_or("");
                !is_german_month(first_word)
            },
            Placeholder::NoParagraphEndMarker => {
                !next.is_some_and(|c| c.is_ascii_digit() || c.is_lowercase())
            },
            _ => true,
        }
    }

    /// Whether this placeholder carries a heading ordinal.
    pub fn is_ordinal(&self) -> bool {
        matches!(
            self,
            Placeholder::RomanNumber | Placeholder::DecimalNumber | Placeholder::GermanOrdinal
        )
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn full(p: Placeholder) -> Regex {
        Regex::new(&format!("^(?:{})$", p.fragment(&DEFAULT_PARAGRAPH_END_MARKERS))).unwrap()
    }

    #[test]
    fn test_names_round_trip() {
        for p in Placeholder::ALL {
            assert_eq!(Placeholder::from_name(p.name()), Some(p));
            assert_eq!(p.to_string(), p.name());
        }
    }

    #[test]
    fn test_fragments_compile_without_groups() {
        for p in Placeholder::ALL {
            let re = full(p);
            assert_eq!(re.captures_len(), 1, "{} must not add capture groups", p);
        }
    }

    #[test]
    fn test_roman_number() {
        let re = full(Placeholder::RomanNumber);
        assert!(re.is_match("II"));
        assert!(re.is_match("XLIV"));
        assert!(!re.is_match("IIII"));
        assert!(!re.is_match("C"));
    }

    #[test]
    fn test_title_in_capital_letters() {
        let re = full(Placeholder::TitleInCapitalLetters);
        assert!(re.is_match("DIE ENTSTEHUNG DER METAMORPHOSENLEHRE"));
        assert!(re.is_match("ÜBER „FAUST“"));
        assert!(!re.is_match("AB"));
        assert!(!re.is_match("WISSEN UND Methodologie"));
    }

    #[test]
    fn test_title() {
        let re = full(Placeholder::Title);
        assert!(re.is_match("Vom Wesen der Dinge"));
        assert!(!re.is_match("vom Wesen"));
        assert!(!re.is_match("Satz. Noch einer"));
    }

    #[test]
    fn test_title_with_decimal_number_rejects_dates() {
        let re = full(Placeholder::TitleWithDecimalNumber);
        assert!(re.is_match("12. Die Reise nach Rom"));
        assert!(Placeholder::TitleWithDecimalNumber.accepts("12. Die Reise nach Rom", None));
        // Shape matches, the month check rejects it
        assert!(re.is_match("3. März 1921"));
        assert!(!Placeholder::TitleWithDecimalNumber.accepts("3. März 1921", None));
    }

    #[test]
    fn test_german_ordinal() {
        let re = full(Placeholder::GermanOrdinal);
        assert!(re.is_match("Erstes"));
        assert!(re.is_match("ZWEITER"));
        assert!(re.is_match("Achtzehntes"));
        assert!(!re.is_match("Achtung"));
    }

    #[test]
    fn test_place_and_long_date() {
        assert!(!full(Placeholder::Place).is_match("Frankfurt am Main"));
        assert!(full(Placeholder::Place).is_match("Bad Homburg"));
        assert!(full(Placeholder::LongDate).is_match("28. August 1749"));
        assert!(!full(Placeholder::LongDate).is_match("28. Augustus 1749"));
    }

    #[test]
    fn test_no_paragraph_end_marker() {
        let re = full(Placeholder::NoParagraphEndMarker);
        assert!(re.is_match("Von der Natur des Lichtes"));
        assert!(!re.is_match("Ein ganzer Satz."));
        assert!(!re.is_match("Wirklich?"));

        let p = Placeholder::NoParagraphEndMarker;
        assert!(p.accepts("Vorrede", None));
        assert!(p.accepts("Vorrede", Some(' ')));
        assert!(!p.accepts("Vorrede", Some('d')));
        assert!(!p.accepts("Vorrede", Some('7')));
    }

    #[test]
    fn test_ordinal_values_must_convert() {
        assert!(full(Placeholder::DecimalNumber).is_match("0042"));
        assert!(!full(Placeholder::DecimalNumber).is_match("\u{0663}"));
        assert!(Placeholder::DecimalNumber.accepts("0042", None));
        assert!(!Placeholder::DecimalNumber.accepts("99999999999", None));
        assert!(Placeholder::RomanNumber.accepts("XLIX", None));
        assert!(Placeholder::GermanOrdinal.accepts("Drittes", None));
        assert!(!Placeholder::GermanOrdinal.accepts("Drittel", None));
    }

    #[test]
    fn test_is_ordinal() {
        assert!(Placeholder::RomanNumber.is_ordinal());
        assert!(Placeholder::DecimalNumber.is_ordinal());
        assert!(Placeholder::GermanOrdinal.is_ordinal());
        assert!(!Placeholder::Title.is_ordinal());
    }
}
