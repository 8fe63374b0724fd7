//! Text assembly helpers.
//!
//! Line-level cleanup (removal patterns, OCR corrections, content window),
//! hyphenation-aware joining and footnote back-substitution.

pub mod cleanup;
pub mod content_window;
pub mod footnotes;
pub mod hyphenation;

pub use cleanup::{OcrCorrector, TextRemover};
pub use content_window::ContentWindow;
pub use footnotes::{parse_footnote_start, replace_last_reference, FootnoteStart};
pub use hyphenation::HyphenationHandler;
