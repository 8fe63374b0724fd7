//! Pattern-driven heading recognition.
//!
//! Book types describe their headings with small patterns such as
//! `"{roman-number} {title-in-capital-letters}"`. This module compiles those
//! patterns, matches lines against them level by level, and extracts the
//! heading ordinal used for sequence validation.

pub mod matcher;
pub mod ordinal;
pub mod pattern;
pub mod placeholder;

pub use matcher::{Centering, HeaderMatcher, HeaderResult};
pub use pattern::{HeaderPattern, PatternMatch};
pub use placeholder::{Placeholder, DEFAULT_PARAGRAPH_END_MARKERS, MAX_FREE_TEXT_LENGTH};
