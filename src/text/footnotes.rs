//! Footnote parsing and back-substitution.
//!
//! A footnote start line reads `"3 Vgl. die Vorrede."`. The marker token
//! `3` becomes the label `[3]`; the last bare `3` in the running text (the
//! superscript reference printed earlier) is rewritten to `[3]` so the
//! reference and the endnote line up.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_FOOTNOTE_START: Regex = Regex::new(r"^(\d+|\*+)\s*(.+)$").unwrap();
}

/// A parsed footnote start line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FootnoteStart {
    /// Marker as printed, e.g. `"3"` or `"**"`
    pub token: String,
    /// Footnote text after the marker
    pub content: String,
}

impl FootnoteStart {
    /// Bracketed label used in both the body and the endnotes.
    pub fn label(&self) -> String {
        format!("[{}]", self.token)
    }

    /// Endnote entry: `"\n\n[3]: content"`.
    pub fn endnote(&self) -> String {
        format!("\n\n{}: {}", self.label(), self.content)
    }
}

/// Split a footnote start line into marker and content.
///
/// Returns `None` when the line does not start with a digit or asterisk
/// marker followed by content; such lines are treated as body text.
///
/// # Examples
///
/// ```
/// use scan_oxide::text::parse_footnote_start;
///
/// let start = parse_footnote_start("3 Vgl. die Vorrede.").unwrap();
/// assert_eq!(start.token, "3");
/// assert_eq!(start.content, "Vgl. die Vorrede.");
/// assert!(parse_footnote_start("Vgl. die Vorrede.").is_none());
/// ```
pub fn parse_footnote_start(text: &str) -> Option<FootnoteStart> {
    let caps = RE_FOOTNOTE_START.captures(text.trim())?;
    let token = caps.get(1)?.as_str().to_string();
    let content = caps.get(2)?.as_str().trim().to_string();
    if content.is_empty() {
        return None;
    }
    Some(FootnoteStart { token, content })
}

/// Replace the last bare occurrence of `token` in `text` with `label`.
///
/// An occurrence is bare when it is not part of a longer run of the same
/// kind (digits for numeric markers, asterisks otherwise) and not already
/// bracketed. Returns whether a replacement happened.
///
/// # Examples
///
/// ```
/// use scan_oxide::text::replace_last_reference;
///
/// let mut text = String::from("Seite 3 und Wort3 hier");
/// assert!(replace_last_reference(&mut text, "3", "[3]"));
/// assert_eq!(text, "Seite 3 und Wort[3] hier");
/// ```
pub fn replace_last_reference(text: &mut String, token: &str, label: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let numeric = token.chars().all(|c| c.is_ascii_digit());
    let same_kind = |c: char| if numeric { c.is_ascii_digit() } else { c == '*' };

    let found = text.rmatch_indices(token).map(|(start, _)| start).find(|&start| {
        let end = start + token.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        let embedded = before.is_some_and(same_kind) || after.is_some_and(same_kind);
        let bracketed = before == Some('[') && after == Some(']');
        !embedded && !bracketed
    });

    match found {
        Some(start) => {
            text.replace_range(start..start + token.len(), label);
            true
        },
        None => false,
    }
}
