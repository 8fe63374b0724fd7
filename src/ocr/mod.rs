//! OCR input schema.
//!
//! The OCR engine itself is an external collaborator; this module only models
//! the page structure it hands over and flattens it into reading order.

pub mod types;

pub use types::{Baseline, LineView, OcrLine, OcrPage, OcrParagraph, OcrSymbol, OcrWord};
