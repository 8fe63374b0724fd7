//! Semantic roles of OCR lines.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic role of one line on a page.
///
/// Each line gets exactly one role, decided once by the line classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineRole {
    /// Continuation line of a body paragraph
    ParagraphText,
    /// First (indented) line of a body paragraph
    ParagraphStart,
    /// First line of a footnote, starting with its marker
    FootnoteStart,
    /// Continuation line of a footnote
    FootnoteText,
    /// Indented block quotation
    QuoteText,
    /// Column cluster that no configured role claimed, numbered from 1
    Unknown(usize),
}

impl LineRole {
    /// Roles assigned by configured offset, in claim priority order.
    pub const OFFSET_ROLES: [LineRole; 4] = [
        LineRole::ParagraphStart,
        LineRole::FootnoteText,
        LineRole::FootnoteStart,
        LineRole::QuoteText,
    ];

    /// Whether lines with this role belong to the running body text.
    pub fn is_body(&self) -> bool {
        !matches!(
            self,
            LineRole::ParagraphStart | LineRole::FootnoteStart | LineRole::FootnoteText
        )
    }
}

impl fmt::Display for LineRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineRole::ParagraphText => f.write_str("paragraphText"),
            LineRole::ParagraphStart => f.write_str("paragraphStart"),
            LineRole::FootnoteStart => f.write_str("footnoteStart"),
            LineRole::FootnoteText => f.write_str("footnoteText"),
            LineRole::QuoteText => f.write_str("quoteText"),
            LineRole::Unknown(n) => write!(f, "unknown-{}", n),
        }
    }
}

impl FromStr for LineRole {
    type Err = Error;

    /// Parse a role name as written in book type configuration.
    ///
    /// Accepts the camelCase form (`paragraphStart`) as well as snake and
    /// kebab case, plus `unknown-N`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        let role = match normalized.as_str() {
            "paragraphtext" => LineRole::ParagraphText,
            "paragraphstart" => LineRole::ParagraphStart,
            "footnotestart" => LineRole::FootnoteStart,
            "footnotetext" => LineRole::FootnoteText,
            "quotetext" => LineRole::QuoteText,
            other => match other.strip_prefix("unknown").map(str::parse::<usize>) {
                Some(Ok(n)) if n > 0 => LineRole::Unknown(n),
                _ => return Err(Error::InvalidConfig(format!("Unknown line role '{}'", s))),
            },
        };
        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(LineRole::ParagraphText.to_string(), "paragraphText");
        assert_eq!(LineRole::FootnoteStart.to_string(), "footnoteStart");
        assert_eq!(LineRole::Unknown(2).to_string(), "unknown-2");
    }

    #[test]
    fn test_parse() {
        assert_eq!("paragraphStart".parse::<LineRole>().unwrap(), LineRole::ParagraphStart);
        assert_eq!("footnote_text".parse::<LineRole>().unwrap(), LineRole::FootnoteText);
        assert_eq!("QUOTE-TEXT".parse::<LineRole>().unwrap(), LineRole::QuoteText);
        assert_eq!("unknown-3".parse::<LineRole>().unwrap(), LineRole::Unknown(3));
        assert!("unknown-0".parse::<LineRole>().is_err());
        assert!("sidebar".parse::<LineRole>().is_err());
    }

    #[test]
    fn test_display_parse_agree() {
        let roles = [
            LineRole::ParagraphText,
            LineRole::ParagraphStart,
            LineRole::FootnoteStart,
            LineRole::FootnoteText,
            LineRole::QuoteText,
            LineRole::Unknown(7),
        ];
        for role in roles {
            assert_eq!(role.to_string().parse::<LineRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_is_body() {
        assert!(LineRole::ParagraphText.is_body());
        assert!(LineRole::QuoteText.is_body());
        assert!(LineRole::Unknown(1).is_body());
        assert!(!LineRole::FootnoteText.is_body());
        assert!(!LineRole::ParagraphStart.is_body());
    }
}
