//! Hyphenation-aware joining of OCR lines.
//!
//! Scanned books break words at the right margin:
//! - "Fort-" (line 1) + "setzung" (line 2) → "Fortsetzung"
//! - "Wort-" (line 1) + "Spiel" (line 2) → "Wort- Spiel" (capitalized, kept)
//!
//! The hyphen is dropped only when the next line continues in lowercase.
//! Old typefaces and some OCR engines render the break hyphen as `¬` or as a
//! soft hyphen, so those count as well.

/// Characters that can mark a word broken at the end of a line.
pub const BREAK_HYPHENS: [char; 3] = ['-', '\u{00AD}', '¬'];

/// Joins consecutive lines into running text.
#[derive(Debug, Clone, Default)]
pub struct HyphenationHandler;

impl HyphenationHandler {
    /// Create a new hyphenation handler.
    pub fn new() -> Self {
        Self
    }

    /// Check if text ends with a line-break hyphen.
    ///
    /// Only the last character counts. Whether the hyphen is dropped is
    /// decided by the next line, see [`HyphenationHandler::join`].
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::text::HyphenationHandler;
    ///
    /// assert!(HyphenationHandler::is_continuation_hyphen("Fort-"));
    /// assert!(HyphenationHandler::is_continuation_hyphen("Fort¬"));
    /// assert!(!HyphenationHandler::is_continuation_hyphen("Ende."));
    /// ```
    pub fn is_continuation_hyphen(text: &str) -> bool {
        text.ends_with(&BREAK_HYPHENS[..])
    }

    /// Append one line to a text buffer.
    ///
    /// - Empty buffer, or buffer ending in whitespace: the line is appended as is.
    /// - Buffer ending in a break hyphen and line starting lowercase: the
    ///   hyphen is dropped and the two halves are concatenated.
    /// - Otherwise the line is joined with a single space.
    pub fn join(&self, buffer: &mut String, line: &str) {
        if line.is_empty() {
            return;
        }
        if buffer.is_empty() || buffer.ends_with(char::is_whitespace) {
            buffer.push_str(line);
            return;
        }
        let continues_lowercase = line.chars().next().is_some_and(char::is_lowercase);
        if continues_lowercase && Self::is_continuation_hyphen(buffer) {
            buffer.pop();
            buffer.push_str(line);
        } else {
            buffer.push(' ');
            buffer.push_str(line);
        }
    }

    /// Join a sequence of lines into one string.
    pub fn join_lines<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> String {
        let mut out = String::new();
        for line in lines {
            self.join(&mut out, line.trim());
        }
        out
    }
}
