//! The page sequencer: walks a page's lines in reading order and feeds the
//! running body text and endnotes.
//!
//! ```text
//! OcrPage
//!     ↓
//! [prepare_lines] (content window → text removal → OCR corrections)
//!     ↓
//! ScanLine[]
//!     ↓
//! [PageMetrics] (column clusters → roles)
//!     ↓
//! per line: heading? → role → dispatch
//!     ↓
//! ScanResults (text_with_headers, footnote_text, counters)
//! ```

use crate::config::{CompiledBookType, SequencePolicy};
use crate::error::{Error, Result};
use crate::geometry::{BoundingBox, PageSpan};
use crate::headings::{Centering, HeaderResult};
use crate::layout::{FootnoteMarkerDetector, LineClassifier, LineRole, PageMetrics};
use crate::ocr::{LineView, OcrLine, OcrPage};
use crate::pipeline::ScanResults;
use crate::text::{
    parse_footnote_start, replace_last_reference, ContentWindow, HyphenationHandler,
    OcrCorrector,
};

/// A page line after cleanup, still tied to its OCR geometry.
#[derive(Debug, Clone)]
pub struct ScanLine<'a> {
    /// Cleaned text
    pub text: String,
    /// Source line with boxes, words and symbols
    pub source: &'a OcrLine,
}

impl LineView for ScanLine<'_> {
    fn text(&self) -> &str {
        &self.text
    }

    fn bbox(&self) -> Option<&BoundingBox> {
        self.source.usable_bbox()
    }
}

/// What happened on one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageReport {
    /// Lines admitted by the content window
    pub lines: usize,
    /// Headings accepted
    pub headings: usize,
    /// Headings rejected under `skipMismatched`
    pub skipped_headings: usize,
    /// Footnotes opened
    pub footnotes: usize,
}

/// Width and sentence end of the last body line, for paragraph-end detection.
#[derive(Debug, Clone, Copy)]
struct BodyLine {
    width: Option<f32>,
    ends_sentence: bool,
}

/// Sequences pages of one book type.
#[derive(Debug, Clone)]
pub struct PageSequencer<'a> {
    book_type: &'a CompiledBookType,
    corrector: OcrCorrector,
    hyphenation: HyphenationHandler,
    detector: FootnoteMarkerDetector,
}

impl<'a> PageSequencer<'a> {
    /// Create a sequencer for a compiled book type.
    pub fn new(book_type: &'a CompiledBookType) -> Self {
        Self {
            book_type,
            corrector: OcrCorrector::default(),
            hyphenation: HyphenationHandler::new(),
            detector: FootnoteMarkerDetector::new(book_type.layout()),
        }
    }

    /// Apply OCR corrections to every line after text removal.
    pub fn with_corrector(mut self, corrector: OcrCorrector) -> Self {
        self.corrector = corrector;
        self
    }

    /// Flatten a page into cleaned lines.
    ///
    /// Lines outside the content window are dropped. Lines that become empty
    /// are kept so that line indices still follow the page.
    pub fn prepare_lines<'p>(
        &self,
        page: &'p OcrPage,
        window: &mut ContentWindow,
    ) -> Vec<ScanLine<'p>> {
        page.lines()
            .into_iter()
            .filter(|line| window.admit(&line.text))
            .map(|source| {
                let removed = self.book_type.remover().apply(&source.text);
                let text = if self.corrector.is_empty() {
                    removed
                } else {
                    self.corrector.apply(&removed)
                };
                ScanLine { text, source }
            })
            .collect()
    }

    /// Process one page with no content window.
    pub fn process_page(&self, page: &OcrPage, results: &mut ScanResults) -> Result<PageReport> {
        self.process_page_in(page, &mut ContentWindow::default(), results)
    }

    /// Process one page, carrying the content window across pages.
    pub fn process_page_in(
        &self,
        page: &OcrPage,
        window: &mut ContentWindow,
        results: &mut ScanResults,
    ) -> Result<PageReport> {
        let lines = self.prepare_lines(page, window);
        let span = match page.width.filter(|w| w.is_finite() && *w > 0.0) {
            Some(width) => Some(PageSpan::from_width(width)),
            None => PageSpan::from_boxes(page.lines().into_iter().filter_map(|l| l.usable_bbox())),
        };
        let centering = span.map(|span| Centering {
            page_center: span.center(),
            tolerance: self.book_type.layout().center_tolerance,
        });
        self.sequence(&lines, centering, results)
    }

    /// Sequence prepared lines of one page into `results`.
    ///
    /// # Errors
    ///
    /// [`Error::SequenceViolation`] when a heading breaks its level's
    /// numbering and the book type's policy is strict.
    pub fn sequence(
        &self,
        lines: &[ScanLine<'_>],
        centering: Option<Centering>,
        results: &mut ScanResults,
    ) -> Result<PageReport> {
        let layout = self.book_type.layout();
        let sources: Vec<&OcrLine> = lines.iter().map(|l| l.source).collect();
        let metrics = PageMetrics::analyze(
            sources.iter().copied(),
            self.book_type.role_offsets(),
            layout.cluster_tolerance,
        );
        let classifier = LineClassifier::new(&metrics, self.detector);
        let short_line_width = metrics
            .paragraph_text()
            .map(|m| m.max_width * layout.short_line_width_factor);
        let markers = &self.book_type.config().paragraph_end_markers;

        let mut report = PageReport {
            lines: lines.len(),
            ..Default::default()
        };
        let mut previous_body: Option<BodyLine> = None;
        let mut i = 0;

        while i < lines.len() {
            if let Some(header) = self.book_type.headers().match_at(lines, i, centering) {
                if self.accept_heading(&header, results, &mut report)? {
                    i = header.new_line_index + 1;
                    previous_body = None;
                    continue;
                }
            }

            let text = lines[i].text.trim();
            if text.is_empty() {
                i += 1;
                continue;
            }

            let mut role = classifier.classify(&sources, i);
            if role == LineRole::FootnoteStart {
                match parse_footnote_start(text) {
                    Some(start) => {
                        let replaced = replace_last_reference(
                            &mut results.text_with_headers,
                            &start.token,
                            &start.label(),
                        );
                        if !replaced {
                            log::debug!("No reference '{}' in body text for footnote", start.token);
                        }
                        results.footnote_text.push_str(&start.endnote());
                        report.footnotes += 1;
                        previous_body = None;
                        i += 1;
                        continue;
                    },
                    None => {
                        log::debug!("Line '{}' has a marker but no footnote shape", text);
                        role = LineRole::ParagraphText;
                    },
                }
            }

            match role {
                LineRole::ParagraphStart => {
                    results.text_with_headers.push_str("\n\n");
                    results.text_with_headers.push_str(text);
                },
                LineRole::FootnoteText => {
                    self.hyphenation.join(&mut results.footnote_text, text);
                },
                _ => {
                    let paragraph_ended = layout.detect_paragraph_end_by_width
                        && role == LineRole::ParagraphText
                        && previous_body.is_some_and(|prev| {
                            let short = matches!(
                                (prev.width, short_line_width),
                                (Some(w), Some(limit)) if w < limit
                            );
                            prev.ends_sentence && short
                        });
                    if paragraph_ended {
                        results.text_with_headers.push_str("\n\n");
                        results.text_with_headers.push_str(text);
                    } else {
                        self.hyphenation.join(&mut results.text_with_headers, text);
                    }
                },
            }

            previous_body = if role.is_body() || role == LineRole::ParagraphStart {
                Some(BodyLine {
                    width: lines[i].bbox().map(BoundingBox::width),
                    ends_sentence: text.ends_with(|c: char| markers.contains(&c)),
                })
            } else {
                None
            };
            i += 1;
        }

        log::debug!(
            "Page sequenced: {} lines, {} headings, {} footnotes",
            report.lines,
            report.headings,
            report.footnotes
        );
        Ok(report)
    }

    /// Record a heading. Returns `false` when the heading was skipped under
    /// `skipMismatched` and the line should be classified normally.
    fn accept_heading(
        &self,
        header: &HeaderResult,
        results: &mut ScanResults,
        report: &mut PageReport,
    ) -> Result<bool> {
        match results.record_heading(header, self.book_type.config().reset_lower_levels) {
            Ok(()) => {
                report.headings += 1;
                Ok(true)
            },
            Err(Error::SequenceViolation {
                level,
                expected,
                found,
                header: text,
            }) if self.book_type.sequence_policy() == SequencePolicy::SkipMismatched => {
                log::warn!(
                    "Skipping level {} heading '{}': expected ordinal {}, found {}",
                    level,
                    text,
                    expected,
                    found
                );
                report.skipped_headings += 1;
                Ok(false)
            },
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BookTypeConfig, HeaderFormat, LayoutThresholds, RoleOffset};
    use crate::ocr::{OcrSymbol, OcrWord};

    fn book_type(policy: SequencePolicy) -> CompiledBookType {
        BookTypeConfig::new()
            .with_metric(LineRole::ParagraphStart, RoleOffset::Offset(40.0))
            .with_metric(LineRole::FootnoteText, RoleOffset::Offset(-60.0))
            .with_header_level(
                1,
                vec![
                    HeaderFormat::new("{roman-number} {title-in-capital-letters}")
                        .with_multiple_lines(true),
                ],
            )
            .with_removal_pattern("/^\\d+$/")
            .with_sequence_policy(policy)
            .compile("test")
            .unwrap()
    }

    fn body(text: &str, x0: f32, y: f32) -> OcrLine {
        OcrLine::new(text, BoundingBox::new(x0, y, 900.0, y + 30.0))
    }

    fn heading(text: &str, y: f32) -> OcrLine {
        OcrLine::new(text, BoundingBox::new(350.0, y, 650.0, y + 30.0))
    }

    fn page(lines: Vec<OcrLine>) -> OcrPage {
        OcrPage::from_lines(lines).with_width(1000.0)
    }

    #[test]
    fn test_heading_paragraphs_and_hyphenation() {
        let bt = book_type(SequencePolicy::Strict);
        let seq = PageSequencer::new(&bt);
        let p = page(vec![
            heading("I DAS LICHT", 50.0),
            body("Das ist eine Fort-", 140.0, 100.0),
            body("setzung des Textes", 100.0, 140.0),
            body("und weiter.", 100.0, 180.0),
            body("Neuer Absatz hier", 140.0, 220.0),
            body("geht es weiter.", 100.0, 260.0),
        ]);
        let mut results = ScanResults::new();
        let report = seq.process_page(&p, &mut results).unwrap();
        assert_eq!(report.headings, 1);
        assert_eq!(
            results.text_with_headers,
            "\n\n# I DAS LICHT\n\n\n\nDas ist eine Fortsetzung des Textes und weiter.\n\n\
             Neuer Absatz hier geht es weiter."
        );
        assert_eq!(results.level1_index, 1);
    }

    #[test]
    fn test_removal_drops_page_number() {
        let bt = book_type(SequencePolicy::Strict);
        let seq = PageSequencer::new(&bt);
        let p = page(vec![
            body("17", 480.0, 20.0),
            body("erste Zeile", 100.0, 100.0),
            body("zweite Zeile", 100.0, 140.0),
        ]);
        let mut results = ScanResults::new();
        seq.process_page(&p, &mut results).unwrap();
        assert_eq!(results.text_with_headers, "erste Zeile zweite Zeile");
    }

    #[test]
    fn test_strict_sequence_violation() {
        let bt = book_type(SequencePolicy::Strict);
        let seq = PageSequencer::new(&bt);
        let mut results = ScanResults::new();
        seq.process_page(&page(vec![heading("I ERSTES", 50.0)]), &mut results).unwrap();
        let err = seq
            .process_page(&page(vec![heading("III DRITTES", 50.0)]), &mut results)
            .unwrap_err();
        assert!(matches!(err, Error::SequenceViolation { expected: 2, found: 3, .. }));
    }

    #[test]
    fn test_skip_mismatched_treats_line_as_text() {
        let bt = book_type(SequencePolicy::SkipMismatched);
        let seq = PageSequencer::new(&bt);
        let mut results = ScanResults::new();
        let report = seq
            .process_page(&page(vec![heading("III DRITTES", 50.0)]), &mut results)
            .unwrap();
        assert_eq!(report.skipped_headings, 1);
        assert_eq!(results.level1_index, 0);
        assert_eq!(results.text_with_headers, "III DRITTES");
    }

    #[test]
    fn test_footnote_start_and_continuation() {
        let bt = book_type(SequencePolicy::Strict);
        let seq = PageSequencer::new(&bt);

        let marker = OcrSymbol::new("1", BoundingBox::new(100.0, 300.0, 106.0, 312.0))
            .with_baseline(BoundingBox::new(100.0, 327.0, 900.0, 328.0));
        let rest: Vec<OcrSymbol> = "Siehe"
            .chars()
            .enumerate()
            .map(|(k, c)| {
                let x = 120.0 + 12.0 * k as f32;
                OcrSymbol::new(c.to_string(), BoundingBox::new(x, 304.0, x + 10.0, 328.0))
            })
            .collect();
        let mut note = OcrLine::from_words(vec![
            OcrWord::from_symbols(vec![marker]),
            OcrWord::from_symbols(rest),
        ]);
        note.bbox = Some(BoundingBox::new(100.0, 300.0, 900.0, 330.0));
        note.text = "1 Siehe oben.".to_string();

        let p = page(vec![
            body("Der Satz 1 steht hier", 100.0, 100.0),
            body("und hier endet er.", 100.0, 140.0),
            body("noch mehr Text", 100.0, 180.0),
            note,
            body("Fortsetzung der Note.", 40.0, 340.0),
        ]);
        let mut results = ScanResults::new();
        let report = seq.process_page(&p, &mut results).unwrap();
        assert_eq!(report.footnotes, 1);
        assert_eq!(
            results.text_with_headers,
            "Der Satz [1] steht hier und hier endet er. noch mehr Text"
        );
        assert_eq!(results.footnote_text, "\n\n[1]: Siehe oben. Fortsetzung der Note.");
    }

    #[test]
    fn test_paragraph_end_by_width() {
        let bt = BookTypeConfig::new()
            .with_metric(LineRole::ParagraphStart, RoleOffset::Offset(40.0))
            .with_layout(LayoutThresholds::new().with_paragraph_end_by_width(true))
            .compile("width")
            .unwrap();
        let seq = PageSequencer::new(&bt);
        let p = page(vec![
            body("Ein voller Satz der Zeile", 100.0, 100.0),
            OcrLine::new("kurz endet.", BoundingBox::new(100.0, 140.0, 400.0, 170.0)),
            body("Neuer Absatz ohne Einzug", 100.0, 180.0),
        ]);
        let mut results = ScanResults::new();
        seq.process_page(&p, &mut results).unwrap();
        assert_eq!(
            results.text_with_headers,
            "Ein voller Satz der Zeile kurz endet.\n\nNeuer Absatz ohne Einzug"
        );
    }

    #[test]
    fn test_content_window_across_pages() {
        let bt = book_type(SequencePolicy::Strict);
        let seq = PageSequencer::new(&bt);
        let mut window = ContentWindow::new(Some("VORREDE".to_string()), None);
        let mut results = ScanResults::new();
        let title_page = page(vec![body("Titelblatt", 100.0, 100.0)]);
        seq.process_page_in(&title_page, &mut window, &mut results).unwrap();
        assert!(results.text_with_headers.is_empty());
        seq.process_page_in(
            &page(vec![body("VORREDE", 100.0, 100.0), body("Text", 100.0, 140.0)]),
            &mut window,
            &mut results,
        )
        .unwrap();
        assert_eq!(results.text_with_headers, "VORREDE Text");
    }

    #[test]
    fn test_scan_line_view() {
        let source = body("  Text  ", 100.0, 0.0);
        let line = ScanLine {
            text: "Text".to_string(),
            source: &source,
        };
        assert_eq!(LineView::text(&line), "Text");
        assert_eq!(line.bbox().map(|b| b.x0), Some(100.0));
    }
}
