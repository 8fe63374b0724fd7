//! Book run driver.

use super::scan_results::ScanResults;
use super::sequencer::{PageReport, PageSequencer};
use crate::config::{BookManifest, BookTypeRegistry, CompiledBookType};
use crate::error::Result;
use crate::ocr::OcrPage;
use crate::text::{ContentWindow, OcrCorrector};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;

lazy_static! {
    static ref RE_EXCESS_NEWLINES: Regex = Regex::new(r"\n{3,}").unwrap();
}

/// Output of a successful book run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedBook {
    /// Body text with Markdown headings
    pub text_with_headers: String,
    /// Endnotes
    pub footnote_text: String,
    /// Final heading counters, level 1 first
    pub counters: [u32; 3],
    /// Number of pages processed
    pub pages_processed: usize,
}

impl ScannedBook {
    fn from_results(results: ScanResults, pages_processed: usize) -> Self {
        let counters = results.counters();
        Self {
            text_with_headers: results.text_with_headers,
            footnote_text: results.footnote_text,
            counters,
            pages_processed,
        }
    }

    /// Whether any footnote was collected.
    pub fn has_footnotes(&self) -> bool {
        !self.footnote_text.trim().is_empty()
    }

    /// Render the book as Markdown: body text, then a `---` rule and the
    /// endnotes. Runs of blank lines collapse to one.
    ///
    /// # Examples
    ///
    /// ```
    /// use scan_oxide::pipeline::ScannedBook;
    ///
    /// let book = ScannedBook {
    ///     text_with_headers: "\n\n# I ANFANG\n\n\n\nText [1].".to_string(),
    ///     footnote_text: "\n\n[1]: Note.".to_string(),
    ///     counters: [1, 0, 0],
    ///     pages_processed: 1,
    /// };
    /// assert_eq!(book.to_markdown(), "# I ANFANG\n\nText [1].\n\n---\n\n[1]: Note.\n");
    /// ```
    pub fn to_markdown(&self) -> String {
        let mut out = self.text_with_headers.trim().to_string();
        if self.has_footnotes() {
            out.push_str("\n\n---\n\n");
            out.push_str(self.footnote_text.trim());
        }
        let mut out = RE_EXCESS_NEWLINES.replace_all(&out, "\n\n").into_owned();
        out.push('\n');
        out
    }
}

/// Runs a whole book through the page sequencer.
///
/// Pages are processed strictly in order. The first fatal error aborts the
/// run; it comes back with the book type and page index attached and no
/// partial text is returned.
#[derive(Debug, Clone)]
pub struct BookScanner {
    book_type: Arc<CompiledBookType>,
    manifest: BookManifest,
}

impl BookScanner {
    /// Create a scanner for a compiled book type.
    pub fn new(book_type: Arc<CompiledBookType>) -> Self {
        Self {
            book_type,
            manifest: BookManifest::default(),
        }
    }

    /// Create a scanner for a book type from a registry.
    pub fn from_registry(registry: &BookTypeRegistry, key: &str) -> Result<Self> {
        Ok(Self::new(registry.get(key)?))
    }

    /// Apply a per-book manifest.
    pub fn with_manifest(mut self, manifest: BookManifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Book type in use.
    pub fn book_type(&self) -> &CompiledBookType {
        &self.book_type
    }

    /// Scan pages in order.
    pub fn scan<'a>(&self, pages: impl IntoIterator<Item = &'a OcrPage>) -> Result<ScannedBook> {
        let key = self.book_type.key();
        let sequencer = PageSequencer::new(&self.book_type)
            .with_corrector(OcrCorrector::new(&self.manifest.ocr_corrections));
        let mut window = ContentWindow::new(
            self.manifest.content_start_marker.clone(),
            self.manifest.content_end_marker.clone(),
        );
        let mut results = ScanResults::new();
        let mut total = PageReport::default();
        let mut pages_processed = 0;

        for (page_index, page) in pages.into_iter().enumerate() {
            let report = sequencer
                .process_page_in(page, &mut window, &mut results)
                .map_err(|e| e.at_page(key, page_index))?;
            total.lines += report.lines;
            total.headings += report.headings;
            total.skipped_headings += report.skipped_headings;
            total.footnotes += report.footnotes;
            pages_processed += 1;
        }

        if !window.has_started() {
            log::warn!("Book '{}': content start marker never found, output is empty", key);
        }
        log::info!(
            "Book '{}': {} pages, {} lines, {} headings ({} skipped), {} footnotes",
            key,
            pages_processed,
            total.lines,
            total.headings,
            total.skipped_headings,
            total.footnotes
        );
        Ok(ScannedBook::from_results(results, pages_processed))
    }

    /// Load page JSON files and scan them in the given order.
    ///
    /// A page that fails to load aborts the run like any other page error.
    pub fn scan_files<P: AsRef<Path>>(&self, paths: &[P]) -> Result<ScannedBook> {
        let pages = paths
            .iter()
            .enumerate()
            .map(|(page_index, path)| {
                std::fs::read_to_string(path)
                    .map_err(Into::into)
                    .and_then(|json| OcrPage::from_json(&json))
                    .map_err(|e: crate::error::Error| e.at_page(self.book_type.key(), page_index))
            })
            .collect::<Result<Vec<_>>>()?;
        self.scan(&pages)
    }
}
