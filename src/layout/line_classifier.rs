//! Line role classification.

use super::footnote_marker::FootnoteMarkerDetector;
use super::line_role::LineRole;
use super::page_metrics::PageMetrics;
use crate::ocr::OcrLine;

/// Assigns a [`LineRole`] to each line of one page.
///
/// A leading superscript marker always wins and makes the line a
/// `FootnoteStart`. Otherwise the first metrics range containing the line's
/// `x0` decides, and lines without geometry default to `ParagraphText`.
#[derive(Debug, Clone, Copy)]
pub struct LineClassifier<'a> {
    metrics: &'a PageMetrics,
    detector: FootnoteMarkerDetector,
}

impl<'a> LineClassifier<'a> {
    /// Create a classifier for a page.
    pub fn new(metrics: &'a PageMetrics, detector: FootnoteMarkerDetector) -> Self {
        Self { metrics, detector }
    }

    /// Page metrics used for range lookup.
    pub fn metrics(&self) -> &'a PageMetrics {
        self.metrics
    }

    /// Classify `lines[index]`.
    pub fn classify(&self, lines: &[&OcrLine], index: usize) -> LineRole {
        if let Some(marker) = self.detector.footnote_start_marker(lines, index) {
            log::trace!("Line {} opens footnote '{}'", index, marker);
            return LineRole::FootnoteStart;
        }
        match lines.get(index) {
            Some(line) => self.classify_by_geometry(line),
            None => LineRole::ParagraphText,
        }
    }

    /// Classify a line by its start position alone.
    pub fn classify_by_geometry(&self, line: &OcrLine) -> LineRole {
        line.usable_bbox()
            .and_then(|bbox| self.metrics.role_for_x0(bbox.x0))
            .unwrap_or(LineRole::ParagraphText)
    }
}
