//! Per-line text cleanup: removal patterns and OCR corrections.
//!
//! Both are user-supplied regexes. A pattern that fails to compile is logged
//! and skipped so one typo in a book type does not stop the whole book.

use crate::config::OcrCorrection;
use regex::Regex;

/// Inline flags the `regex` crate understands.
const SUPPORTED_FLAGS: &str = "imsxU";

/// Flags from other regex dialects that have no meaning here.
const IGNORED_FLAGS: &str = "gu";

/// Split `/body/flags` into body and flags. `None` when `pattern` is not in
/// slash-delimited form.
fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    let rest = pattern.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let (body, flags) = (&rest[..end], &rest[end + 1..]);
    if body.is_empty() {
        return None;
    }
    flags
        .chars()
        .all(|c| SUPPORTED_FLAGS.contains(c) || IGNORED_FLAGS.contains(c))
        .then_some((body, flags))
}

/// Build the regex source for a user pattern.
///
/// Slash-delimited patterns are regexes with flags; anything else is a
/// regex when `bare_is_regex` is set and literal text otherwise.
fn pattern_source(pattern: &str, bare_is_regex: bool) -> String {
    match split_delimited(pattern) {
        Some((body, flags)) => {
            let mut inline: Vec<char> =
                flags.chars().filter(|c| SUPPORTED_FLAGS.contains(*c)).collect();
            inline.sort_unstable();
            inline.dedup();
            if inline.is_empty() {
                body.to_string()
            } else {
                format!("(?{}){}", inline.iter().collect::<String>(), body)
            }
        },
        None if bare_is_regex => pattern.to_string(),
        None => regex::escape(pattern),
    }
}

fn compile_user_pattern(pattern: &str, bare_is_regex: bool, purpose: &str) -> Option<Regex> {
    let source = pattern_source(pattern, bare_is_regex);
    match Regex::new(&source) {
        Ok(re) => Some(re),
        Err(e) => {
            log::warn!("Ignoring malformed {} pattern '{}': {}", purpose, pattern, e);
            None
        },
    }
}

/// Strips configured boilerplate (running heads, page numbers, ...) from
/// line text.
#[derive(Debug, Clone, Default)]
pub struct TextRemover {
    patterns: Vec<Regex>,
}

impl TextRemover {
    /// Compile removal patterns.
    ///
    /// Patterns written as `/body/flags` are regexes; anything else is
    /// removed as literal text.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::text::TextRemover;
    ///
    /// let remover = TextRemover::new(&["/^\\d+$/".to_string(), "[Anm. d. Hrsg.]".to_string()]);
    /// assert_eq!(remover.apply("Text [Anm. d. Hrsg.]"), "Text ");
    /// assert_eq!(remover.apply("117"), "");
    /// ```
    pub fn new(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|p| compile_user_pattern(p, false, "text removal"))
            .collect();
        Self { patterns }
    }

    /// Number of usable patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether nothing will be removed.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Remove every match of every pattern, in configuration order.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for re in &self.patterns {
            if re.is_match(&out) {
                out = re.replace_all(&out, "").into_owned();
            }
        }
        out
    }
}

/// Fixes systematic OCR misreadings listed in a book manifest.
#[derive(Debug, Clone, Default)]
pub struct OcrCorrector {
    rules: Vec<(Regex, String)>,
}

impl OcrCorrector {
    /// Compile correction rules. Bare patterns are regexes.
    pub fn new(corrections: &[OcrCorrection]) -> Self {
        let rules = corrections
            .iter()
            .filter_map(|c| {
                compile_user_pattern(&c.pattern, true, "OCR correction")
                    .map(|re| (re, c.replacement.clone()))
            })
            .collect();
        Self { rules }
    }

    /// Whether no rule is configured.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order. Replacements may use `$1`-style groups.
    pub fn apply(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (re, replacement) in &self.rules {
            out = re.replace_all(&out, replacement.as_str()).into_owned();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remover(patterns: &[&str]) -> TextRemover {
        TextRemover::new(&patterns.iter().map(|p| p.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_split_delimited() {
        assert_eq!(split_delimited("/abc/gi"), Some(("abc", "gi")));
        assert_eq!(split_delimited("/a/b/"), Some(("a/b", "")));
        assert_eq!(split_delimited("abc"), None);
        assert_eq!(split_delimited("/abc"), None);
        assert_eq!(split_delimited("//i"), None);
        // Unknown flag letters make it a literal
        assert_eq!(split_delimited("/usr/bin"), None);
    }

    #[test]
    fn test_pattern_source() {
        assert_eq!(pattern_source("/seite \\d+/gi", false), "(?i)seite \\d+");
        assert_eq!(pattern_source("a.b", false), "a\\.b");
        assert_eq!(pattern_source("a.b", true), "a.b");
    }

    #[test]
    fn test_literal_removal() {
        let r = remover(&["GOETHE · FARBENLEHRE"]);
        assert_eq!(r.apply("12 GOETHE · FARBENLEHRE"), "12 ");
    }

    #[test]
    fn test_regex_removal_with_flags() {
        let r = remover(&["/^seite \\d+\\s*/i"]);
        assert_eq!(r.apply("SEITE 12 Das Licht"), "Das Licht");
    }

    #[test]
    fn test_malformed_pattern_removes_nothing() {
        let r = remover(&["/(unclosed/", "x"]);
        assert_eq!(r.len(), 1);
        assert_eq!(r.apply("(unclosed x"), "(unclosed ");
    }

    #[test]
    fn test_removal_is_idempotent() {
        let r = remover(&["/\\[\\d+\\]/", "/^\\d+\\s+/", "— — —"]);
        let inputs = [
            "12 Der Text [3] geht weiter",
            "Ohne alles",
            "[1][2] — — — Ende",
            "",
        ];
        for input in inputs {
            let once = r.apply(input);
            assert_eq!(r.apply(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_ocr_corrections() {
        let c = OcrCorrector::new(&[
            OcrCorrection {
                pattern: "tlie".to_string(),
                replacement: "the".to_string(),
            },
            OcrCorrection {
                pattern: "(\\w)ſ".to_string(),
                replacement: "${1}s".to_string(),
            },
            OcrCorrection {
                pattern: "(".to_string(),
                replacement: String::new(),
            },
        ]);
        assert!(!c.is_empty());
        assert_eq!(c.apply("tlie Weiſe"), "the Weise");
    }
}
