//! Structural recovery pipeline.
//!
//! ```text
//! OcrPage[] (in book order)
//!     ↓
//! [BookScanner] (book type + manifest, one ScanResults per run)
//!     ↓
//! [PageSequencer] (per page: cleanup, metrics, headings, roles)
//!     ↓
//! ScanResults (running body text, endnotes, heading counters)
//!     ↓
//! ScannedBook → Markdown
//! ```
//!
//! # Key Design Principles
//!
//! 1. **One owner**: `ScanResults` belongs to exactly one book run and is
//!    passed to the sequencer by unique borrow.
//!
//! 2. **Fail fast**: a fatal error on any page ends the run; partial text is
//!    never returned.
//!
//! 3. **Immutable configuration**: book types are compiled once and shared
//!    behind `Arc`.

pub mod book;
pub mod scan_results;
pub mod sequencer;

// Re-export main types
pub use book::{BookScanner, ScannedBook};
pub use scan_results::{ScanResults, HEADING_LEVELS};
pub use sequencer::{PageReport, PageSequencer, ScanLine};
