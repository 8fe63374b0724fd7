//! Superscript footnote marker detection.
//!
//! OCR engines report superscript flags, but unreliably. Instead the marker
//! is recognized from geometry: a digit or asterisk glyph that is clearly
//! shorter than its line and sits above the line's baseline.

use crate::config::{LayoutThresholds, HEIGHT_RATIO_THRESHOLD, VERTICAL_OFFSET_THRESHOLD};
use crate::ocr::{OcrLine, OcrSymbol, OcrWord};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RE_MARKER_GLYPH: Regex = Regex::new(r"^(?:\d+|\*+)$").unwrap();
}

/// Number of words recorded before each superscript run.
pub const CONTEXT_WORDS: usize = 3;

/// How a superscript run relates to the surrounding text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Inline reference inside running text
    Reference,
    /// Marker opening a footnote at the start of a line
    Start,
}

/// A run of superscript marker glyphs found on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct SuperscriptRun {
    /// Index of the line in the page's reading order
    pub line_index: usize,
    /// Index of the word within the line
    pub word_index: usize,
    /// Index of the first glyph of the run within the word
    pub symbol_index: usize,
    /// Concatenated glyph text, e.g. `"12"` or `"**"`
    pub text: String,
    /// Up to three words before the run, oldest first
    pub preceding_words: Vec<String>,
    /// Reference or footnote start
    pub kind: MarkerKind,
}

/// Detects superscript footnote markers from symbol geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootnoteMarkerDetector {
    height_ratio: f32,
    vertical_offset: f32,
}

impl Default for FootnoteMarkerDetector {
    fn default() -> Self {
        Self {
            height_ratio: HEIGHT_RATIO_THRESHOLD,
            vertical_offset: VERTICAL_OFFSET_THRESHOLD,
        }
    }
}

impl FootnoteMarkerDetector {
    /// Create a detector from layout thresholds.
    pub fn new(thresholds: &LayoutThresholds) -> Self {
        Self {
            height_ratio: thresholds.superscript_height_ratio,
            vertical_offset: thresholds.superscript_vertical_offset,
        }
    }

    /// Whether one glyph looks like a raised footnote marker in a line of
    /// the given height.
    pub fn is_marker_symbol(&self, symbol: &OcrSymbol, line_height: f32) -> bool {
        let Some(bbox) = symbol.bbox.filter(|b| b.is_usable()) else {
            return false;
        };
        if bbox.height() >= line_height * self.height_ratio {
            return false;
        }
        if let Some(baseline) = symbol.baseline.and_then(|b| b.bottom()) {
            if bbox.y1 >= baseline - self.vertical_offset {
                return false;
            }
        }
        RE_MARKER_GLYPH.is_match(symbol.text.trim())
    }

    /// Marker at the very start of a line, if any.
    ///
    /// Only the first word is examined. Qualifying glyphs are concatenated
    /// until the first one that does not qualify.
    pub fn detect_leading_marker(&self, line: &OcrLine) -> Option<String> {
        let line_height = line.usable_bbox()?.height();
        let word = line.first_word()?;
        let marker: String = word
            .symbols
            .iter()
            .take_while(|s| self.is_marker_symbol(s, line_height))
            .map(|s| s.text.trim())
            .collect();
        if marker.is_empty() {
            None
        } else {
            Some(marker)
        }
    }

    /// Leading marker of `lines[index]` unless it merely repeats the word
    /// right before it, in which case it is an inline reference.
    pub fn footnote_start_marker(&self, lines: &[&OcrLine], index: usize) -> Option<String> {
        let line = lines.get(index)?;
        let marker = self.detect_leading_marker(line)?;
        let previous = preceding_words(lines, index, 0, "", 1);
        if previous.last().is_some_and(|w| w == &marker) {
            log::debug!(
                "Leading marker '{}' on line {} repeats the preceding word; not a footnote start",
                marker,
                index
            );
            return None;
        }
        Some(marker)
    }

    /// Find every superscript run on a page.
    ///
    /// A run that opens a line is a footnote [`MarkerKind::Start`] unless it
    /// equals the word right before it; everything else is an inline
    /// [`MarkerKind::Reference`].
    pub fn scan_page(&self, lines: &[&OcrLine]) -> Vec<SuperscriptRun> {
        let mut runs = Vec::new();
        for (line_index, line) in lines.iter().enumerate() {
            let Some(line_box) = line.usable_bbox() else {
                continue;
            };
            let line_height = line_box.height();
            for (word_index, word) in line.words.iter().enumerate() {
                for (symbol_index, text) in self.runs_in_word(word, line_height) {
                    let prefix: String = word.symbols[..symbol_index]
                        .iter()
                        .map(|s| s.text.as_str())
                        .collect();
                    let preceding_words =
                        preceding_words(lines, line_index, word_index, &prefix, CONTEXT_WORDS);
                    let opens_line = word_index == 0 && symbol_index == 0;
                    let echoes_previous = preceding_words.last().is_some_and(|w| w == &text);
                    let kind = if opens_line && !echoes_previous {
                        MarkerKind::Start
                    } else {
                        MarkerKind::Reference
                    };
                    runs.push(SuperscriptRun {
                        line_index,
                        word_index,
                        symbol_index,
                        text,
                        preceding_words,
                        kind,
                    });
                }
            }
        }
        if !runs.is_empty() {
            log::debug!("Found {} superscript runs on page", runs.len());
        }
        runs
    }

    /// Maximal runs of marker glyphs in a word as `(start, text)`.
    fn runs_in_word(&self, word: &OcrWord, line_height: f32) -> Vec<(usize, String)> {
        let mut runs = Vec::new();
        let mut current: Option<(usize, String)> = None;
        for (i, symbol) in word.symbols.iter().enumerate() {
            if self.is_marker_symbol(symbol, line_height) {
                current
                    .get_or_insert_with(|| (i, String::new()))
                    .1
                    .push_str(symbol.text.trim());
            } else if let Some(run) = current.take() {
                runs.push(run);
            }
        }
        runs.extend(current);
        runs
    }
}

/// Up to `n` words before word `word_index` of line `line_index`, oldest
/// first. A non-empty `prefix` of the current word counts as the nearest one.
fn preceding_words(
    lines: &[&OcrLine],
    line_index: usize,
    word_index: usize,
    prefix: &str,
    n: usize,
) -> Vec<String> {
    let mut words: Vec<String> = Vec::with_capacity(n);
    if !prefix.is_empty() {
        words.push(prefix.to_string());
    }
    let earlier_in_line = lines[line_index].words[..word_index].iter().rev();
    let earlier_lines = lines[..line_index]
        .iter()
        .rev()
        .flat_map(|line| line_words(line).into_iter().rev());
    for text in earlier_in_line
        .map(|w| w.text.clone())
        .chain(earlier_lines)
        .take(n.saturating_sub(words.len()))
    {
        words.push(text);
    }
    words.reverse();
    words
}

/// Words of a line, falling back to whitespace-split text when the engine
/// reported no word detail.
fn line_words(line: &OcrLine) -> Vec<String> {
    if line.words.is_empty() {
        line.text.split_whitespace().map(str::to_string).collect()
    } else {
        line.words.iter().map(|w| w.text.clone()).collect()
    }
}
