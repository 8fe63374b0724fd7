//! # Scan Oxide
//!
//! Structural recovery for OCR'd books: turns the page geometry and text an
//! OCR engine reports into Markdown with headings, reflowed paragraphs and
//! endnotes.
//!
//! ## Core Features
//!
//! - **Column Recovery**: tolerance clustering of line start positions, with
//!   roles (paragraph start, footnote, quotation) assigned by offset from
//!   the body column
//! - **Headings**: a small placeholder grammar (`{roman-number}`,
//!   `{german-ordinal}`, `{title-in-capital-letters}`, ...) per heading
//!   level, multi-line headings, ordinal sequence validation
//! - **Footnotes**: superscript markers found from glyph geometry, footnote
//!   text moved to endnotes, references rewritten to `[n]`
//! - **Reflow**: hyphenation-aware joining of lines across pages
//! - **Cleanup**: per book type boilerplate removal, per book OCR corrections
//!   and content boundaries
//!
//! ## Quick Start
//!
//! ```no_run
//! use scan_oxide::config::BookTypeRegistry;
//! use scan_oxide::ocr::OcrPage;
//! use scan_oxide::pipeline::BookScanner;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Book types live in <dir>/<book-type>.json
//! let registry = BookTypeRegistry::from_dir("book-types");
//! let scanner = BookScanner::from_registry(&registry, "goethe-farbenlehre")?;
//!
//! let pages = vec![OcrPage::from_json(&std::fs::read_to_string("page-0001.json")?)?];
//! let book = scanner.scan(&pages)?;
//! println!("{}", book.to_markdown());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

// Error handling
pub mod error;

// Input model
pub mod geometry;
pub mod ocr;

// Configuration
pub mod config;

// Layout analysis
pub mod layout;

// Headings
pub mod headings;

// Text assembly
pub mod text;

// Page and book sequencing
pub mod pipeline;

// Re-exports
pub use config::{BookManifest, BookTypeConfig, BookTypeRegistry, CompiledBookType};
pub use error::{Error, Result};
pub use ocr::OcrPage;
pub use pipeline::{BookScanner, PageSequencer, ScanResults, ScannedBook};

// Internal utilities
pub(crate) mod utils {
    //! Internal utility functions for the library.

    use std::cmp::Ordering;

    /// Total order for coordinates: NaN sorts after every number.
    #[inline]
    pub fn safe_float_cmp(a: f32, b: f32) -> Ordering {
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        }
    }

}

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
