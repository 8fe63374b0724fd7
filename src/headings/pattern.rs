//! Compilation of placeholder patterns into anchored regular expressions.

use super::ordinal::{decimal_value, german_ordinal_value, roman_value};
use super::placeholder::Placeholder;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// A `{name}` token inside a header pattern
    static ref RE_PLACEHOLDER_TOKEN: Regex = Regex::new(r"\{([^{}]*)\}").unwrap();
}

/// Outcome of matching one line of text against a header pattern.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PatternMatch {
    /// Whether the pattern matched
    pub matched: bool,
    /// Captured values by placeholder, in pattern order
    pub extracted_values: IndexMap<Placeholder, String>,
    /// The complete matched text
    pub full_match: String,
}

impl PatternMatch {
    /// A failed match.
    pub fn no_match() -> Self {
        Self::default()
    }

    /// Captured value for a placeholder.
    pub fn value(&self, placeholder: Placeholder) -> Option<&str> {
        self.extracted_values.get(&placeholder).map(String::as_str)
    }

    /// Heading ordinal: the first of `roman-number`, `decimal-number`,
    /// `german-ordinal` that was captured.
    ///
    /// A successful match never carries an ordinal capture that fails to
    /// convert; [`HeaderPattern::match_text`] rejects those lines.
    pub fn ordinal(&self) -> Option<u32> {
        if !self.matched {
            return None;
        }
        if let Some(roman) = self.value(Placeholder::RomanNumber) {
            return roman_value(roman);
        }
        if let Some(decimal) = self.value(Placeholder::DecimalNumber) {
            return decimal_value(decimal);
        }
        self.value(Placeholder::GermanOrdinal)
            .and_then(german_ordinal_value)
    }
}

/// A compiled header pattern.
#[derive(Debug, Clone)]
pub struct HeaderPattern {
    source: String,
    regex: Regex,
    placeholders: Vec<Placeholder>,
}

impl HeaderPattern {
    /// Compile a pattern string.
    ///
    /// Literal parts are escaped, each `{placeholder}` becomes one capture
    /// group, and the whole expression is anchored at both ends. Unknown
    /// placeholder names are rejected here, never at match time.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::headings::{HeaderPattern, Placeholder};
    ///
    /// let pattern =
    ///     HeaderPattern::compile("{roman-number} {title-in-capital-letters}", &['.']).unwrap();
    /// let m = pattern.match_text("II DIE ENTSTEHUNG DER METAMORPHOSENLEHRE");
    /// assert!(m.matched);
    /// assert_eq!(m.value(Placeholder::RomanNumber), Some("II"));
    /// assert_eq!(m.ordinal(), Some(2));
    /// ```
    pub fn compile(pattern: &str, paragraph_end_markers: &[char]) -> Result<Self> {
        let mut expression = String::from("^");
        let mut placeholders = Vec::new();
        let mut last_end = 0;

        for caps in RE_PLACEHOLDER_TOKEN.captures_iter(pattern) {
            let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let placeholder =
                Placeholder::from_name(name.as_str()).ok_or_else(|| Error::UnknownPlaceholder {
                    pattern: pattern.to_string(),
                    name: name.as_str().to_string(),
                })?;

            expression.push_str(&regex::escape(&pattern[last_end..token.start()]));
            expression.push('(');
            expression.push_str(&placeholder.fragment(paragraph_end_markers));
            expression.push(')');
            placeholders.push(placeholder);
            last_end = token.end();
        }
        expression.push_str(&regex::escape(&pattern[last_end..]));
        expression.push('$');

        let regex = Regex::new(&expression).map_err(|e| Error::InvalidHeaderPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            placeholders,
        })
    }

    /// The pattern string this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Placeholders in left-to-right order.
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Whether any placeholder in the pattern carries an ordinal.
    pub fn has_ordinal(&self) -> bool {
        self.placeholders.iter().any(Placeholder::is_ordinal)
    }

    /// Match a line of text.
    pub fn match_text(&self, text: &str) -> PatternMatch {
        let Some(caps) = self.regex.captures(text) else {
            return PatternMatch::no_match();
        };

        let mut extracted_values = IndexMap::new();
        for (i, placeholder) in self.placeholders.iter().enumerate() {
            let Some(group) = caps.get(i + 1) else {
                continue;
            };
            let next = text[group.end()..].chars().next();
            if !placeholder.accepts(group.as_str(), next) {
                log::trace!(
                    "Pattern '{}' rejected {} value '{}'",
                    self.source,
                    placeholder,
                    group.as_str()
                );
                return PatternMatch::no_match();
            }
            extracted_values
                .entry(*placeholder)
                .or_insert_with(|| group.as_str().to_string());
        }

        PatternMatch {
            matched: true,
            extracted_values,
            full_match: caps.get(0).map(|m| m.as_str().to_string()).unwrap_or_default(),
        }
    }
}
