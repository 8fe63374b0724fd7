//! Page layout analysis for OCR'd book pages.
//!
//! This module recovers the column structure of a page and classifies lines:
//! - Tolerance clustering of line start positions
//! - Role assignment by offset from the body column
//! - Superscript footnote marker detection
//! - Per-line role classification

pub mod clustering;
pub mod footnote_marker;
pub mod line_classifier;
pub mod line_role;
pub mod page_metrics;

// Re-export main types
pub use clustering::{cluster_x_positions, XCluster};
pub use footnote_marker::{FootnoteMarkerDetector, MarkerKind, SuperscriptRun};
pub use line_classifier::LineClassifier;
pub use line_role::LineRole;
pub use page_metrics::{PageMetrics, RoleMetrics, RoleOffsetRule};
