//! Serde model of the OCR engine's page output.
//!
//! The hierarchy is page → paragraph → line → word → symbol. Every level
//! carries its recognized text, a confidence and (usually) a bounding box.
//! Missing boxes and missing word/symbol arrays are tolerated.

use crate::error::Result;
use crate::geometry::BoundingBox;
use serde::{Deserialize, Serialize};

/// Baseline box reported for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
    /// Whether the engine actually computed a baseline
    #[serde(default)]
    pub has_baseline: bool,
}

impl Baseline {
    /// Bottom edge of the baseline, when one was computed.
    pub fn bottom(&self) -> Option<f32> {
        if self.has_baseline && self.y1.is_finite() {
            Some(self.y1)
        } else {
            None
        }
    }
}

/// Smallest recognized unit: a glyph or ligature.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrSymbol {
    /// Recognized text
    #[serde(default)]
    pub text: String,
    /// Recognition confidence
    #[serde(default)]
    pub confidence: f32,
    /// Glyph box
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    /// Baseline box, if reported
    #[serde(default)]
    pub baseline: Option<Baseline>,
    /// Engine superscript flag (unreliable)
    #[serde(default)]
    pub is_superscript: bool,
    /// Engine subscript flag (unreliable)
    #[serde(default)]
    pub is_subscript: bool,
    /// Engine drop-cap flag (unreliable)
    #[serde(default)]
    pub is_dropcap: bool,
}

impl OcrSymbol {
    /// Create a symbol with text and box.
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            confidence: 1.0,
            bbox: Some(bbox),
            ..Default::default()
        }
    }

    /// Attach a computed baseline.
    pub fn with_baseline(mut self, baseline: BoundingBox) -> Self {
        self.baseline = Some(Baseline {
            x0: baseline.x0,
            y0: baseline.y0,
            x1: baseline.x1,
            y1: baseline.y1,
            has_baseline: true,
        });
        self
    }
}

/// An ordered run of symbols.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrWord {
    /// Recognized text
    #[serde(default)]
    pub text: String,
    /// Recognition confidence
    #[serde(default)]
    pub confidence: f32,
    /// Word box
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    /// Symbols in reading order
    #[serde(default)]
    pub symbols: Vec<OcrSymbol>,
}

impl OcrWord {
    /// Build a word from its symbols; text and box are derived.
    pub fn from_symbols(symbols: Vec<OcrSymbol>) -> Self {
        let text = symbols.iter().map(|s| s.text.as_str()).collect();
        let bbox = union_of(symbols.iter().filter_map(|s| s.bbox.as_ref()));
        Self {
            text,
            confidence: 1.0,
            bbox,
            symbols,
        }
    }
}

/// A single recognized line of text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrLine {
    /// Recognized text
    #[serde(default)]
    pub text: String,
    /// Recognition confidence
    #[serde(default)]
    pub confidence: f32,
    /// Line box
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    /// Words in reading order
    #[serde(default)]
    pub words: Vec<OcrWord>,
}

impl OcrLine {
    /// Create a line with text and box but no word detail.
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            confidence: 1.0,
            bbox: Some(bbox),
            words: Vec::new(),
        }
    }

    /// Build a line from its words; text (space-joined) and box are derived.
    pub fn from_words(words: Vec<OcrWord>) -> Self {
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let bbox = union_of(words.iter().filter_map(|w| w.bbox.as_ref()));
        Self {
            text,
            confidence: 1.0,
            bbox,
            words,
        }
    }

    /// Line box, if present and usable.
    pub fn usable_bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref().filter(|b| b.is_usable())
    }

    /// First word of the line, if word detail was reported.
    pub fn first_word(&self) -> Option<&OcrWord> {
        self.words.first()
    }
}

/// Read access to a line's text and geometry.
///
/// Implemented by raw OCR lines and by cleaned pipeline lines so heading
/// matching can run on either.
pub trait LineView {
    /// Line text.
    fn text(&self) -> &str;

    /// Line box, if present and usable.
    fn bbox(&self) -> Option<&BoundingBox>;
}

impl LineView for OcrLine {
    fn text(&self) -> &str {
        &self.text
    }

    fn bbox(&self) -> Option<&BoundingBox> {
        self.usable_bbox()
    }
}

/// A paragraph as grouped by the OCR engine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrParagraph {
    /// Recognized text
    #[serde(default)]
    pub text: String,
    /// Recognition confidence
    #[serde(default)]
    pub confidence: f32,
    /// Paragraph box
    #[serde(default)]
    pub bbox: Option<BoundingBox>,
    /// Lines in reading order
    #[serde(default)]
    pub lines: Vec<OcrLine>,
}

/// One scanned page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OcrPage {
    /// Page image width in pixels, if known
    #[serde(default)]
    pub width: Option<f32>,
    /// Page image height in pixels, if known
    #[serde(default)]
    pub height: Option<f32>,
    /// Paragraphs in reading order
    #[serde(default)]
    pub paragraphs: Vec<OcrParagraph>,
}

impl OcrPage {
    /// Wrap a flat list of lines into a single-paragraph page.
    pub fn from_lines(lines: Vec<OcrLine>) -> Self {
        let text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let bbox = union_of(lines.iter().filter_map(|l| l.bbox.as_ref()));
        Self {
            width: None,
            height: None,
            paragraphs: vec![OcrParagraph {
                text,
                confidence: 1.0,
                bbox,
                lines,
            }],
        }
    }

    /// Set the page image width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    /// Parse a page from the OCR engine's JSON output.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// All lines of the page in reading order: paragraph order, then line
    /// order within each paragraph.
    pub fn lines(&self) -> Vec<&OcrLine> {
        self.paragraphs.iter().flat_map(|p| p.lines.iter()).collect()
    }
}

fn union_of<'a>(boxes: impl Iterator<Item = &'a BoundingBox>) -> Option<BoundingBox> {
    boxes.copied().reduce(|acc, b| acc.union(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_JSON: &str = r#"{
        "paragraphs": [
            {
                "text": "Erste Zeile\nzweite Zeile",
                "confidence": 0.97,
                "bbox": {"x0": 100, "y0": 100, "x1": 900, "y1": 160},
                "lines": [
                    {
                        "text": "Erste Zeile",
                        "confidence": 0.98,
                        "bbox": {"x0": 100, "y0": 100, "x1": 900, "y1": 125},
                        "words": [
                            {
                                "text": "Erste",
                                "confidence": 0.99,
                                "bbox": {"x0": 100, "y0": 100, "x1": 180, "y1": 125},
                                "symbols": [
                                    {
                                        "text": "E",
                                        "confidence": 0.99,
                                        "bbox": {"x0": 100, "y0": 100, "x1": 115, "y1": 125},
                                        "baseline": {
                                            "x0": 100, "y0": 120, "x1": 180, "y1": 121,
                                            "has_baseline": true
                                        },
                                        "is_superscript": false,
                                        "is_subscript": false,
                                        "is_dropcap": false
                                    }
                                ]
                            }
                        ]
                    },
                    {
                        "text": "zweite Zeile",
                        "confidence": 0.95,
                        "bbox": {"x0": 100, "y0": 135, "x1": 880, "y1": 160}
                    }
                ]
            },
            {
                "text": "Ohne Box",
                "confidence": 0.5,
                "lines": [{"text": "Ohne Box", "confidence": 0.5}]
            }
        ]
    }"#;

    #[test]
    fn test_parse_page_json() {
        let page = OcrPage::from_json(PAGE_JSON).unwrap();
        assert_eq!(page.paragraphs.len(), 2);
        let lines = page.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "Erste Zeile");
        assert_eq!(lines[1].text, "zweite Zeile");
        assert!(lines[1].words.is_empty());
        assert!(lines[2].bbox.is_none());
    }

    #[test]
    fn test_symbol_baseline() {
        let page = OcrPage::from_json(PAGE_JSON).unwrap();
        let symbol = &page.lines()[0].words[0].symbols[0];
        assert_eq!(symbol.baseline.unwrap().bottom(), Some(121.0));

        let without = Baseline {
            x0: 0.0,
            y0: 0.0,
            x1: 0.0,
            y1: 10.0,
            has_baseline: false,
        };
        assert_eq!(without.bottom(), None);
    }

    #[test]
    fn test_word_from_symbols() {
        let word = OcrWord::from_symbols(vec![
            OcrSymbol::new("1", BoundingBox::new(100.0, 100.0, 108.0, 110.0)),
            OcrSymbol::new("2", BoundingBox::new(108.0, 100.0, 116.0, 110.0)),
        ]);
        assert_eq!(word.text, "12");
        assert_eq!(word.bbox, Some(BoundingBox::new(100.0, 100.0, 116.0, 110.0)));
    }

    #[test]
    fn test_line_from_words() {
        let line = OcrLine::from_words(vec![
            OcrWord::from_symbols(vec![OcrSymbol::new(
                "Ja",
                BoundingBox::new(10.0, 0.0, 30.0, 20.0),
            )]),
            OcrWord::from_symbols(vec![OcrSymbol::new(
                "gut",
                BoundingBox::new(40.0, 0.0, 70.0, 20.0),
            )]),
        ]);
        assert_eq!(line.text, "Ja gut");
        assert_eq!(line.bbox, Some(BoundingBox::new(10.0, 0.0, 70.0, 20.0)));
        assert_eq!(line.first_word().unwrap().text, "Ja");
    }

    #[test]
    fn test_page_from_lines_preserves_order() {
        let page = OcrPage::from_lines(vec![
            OcrLine::new("a", BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
            OcrLine::new("b", BoundingBox::new(0.0, 20.0, 10.0, 30.0)),
        ]);
        let texts: Vec<&str> = page.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }
}
