//! Configuration for structural recovery.
//!
//! Book types are described by JSON documents (see [`BookTypeConfig`]) that
//! are compiled once and cached in a [`BookTypeRegistry`]. The geometric
//! heuristics live in [`LayoutThresholds`] so they can be tuned per book type.

pub mod book_type;
pub mod manifest;
pub mod registry;

pub use book_type::{
    BookTypeConfig, CompiledBookType, HeaderAlignment, HeaderFormat, HeaderTypeDefinition,
    HeaderTypes, RoleOffset,
};
pub use manifest::{BookManifest, OcrCorrection};
pub use registry::BookTypeRegistry;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tolerance in pixels for grouping line start positions into one cluster.
pub const CLUSTER_TOLERANCE: f32 = 7.0;

/// Tolerance in pixels around a configured role offset when none is given.
pub const DEFAULT_ROLE_TOLERANCE: f32 = 15.0;

/// Maximum distance in pixels between a line's midpoint and the page center
/// for the line to count as centered.
pub const CENTER_TOLERANCE: f32 = 100.0;

/// Fraction of the widest body line below which a line counts as short.
pub const SHORT_LINE_WIDTH_FACTOR: f32 = 0.9;

/// A footnote marker glyph is shorter than this fraction of its line height.
pub const HEIGHT_RATIO_THRESHOLD: f32 = 0.75;

/// A footnote marker glyph ends at least this many pixels above the baseline.
pub const VERTICAL_OFFSET_THRESHOLD: f32 = 2.0;

/// What to do when a heading's ordinal does not continue its level's sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SequencePolicy {
    /// Abort the book run with [`Error::SequenceViolation`]
    #[default]
    Strict,
    /// Log a warning and treat the line as ordinary text
    SkipMismatched,
}

/// Geometric thresholds used by layout analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutThresholds {
    /// Clustering tolerance for line start positions
    pub cluster_tolerance: f32,
    /// Tolerance for role offsets configured without one
    pub default_role_tolerance: f32,
    /// Centering tolerance for multi-line headings
    pub center_tolerance: f32,
    /// Short-line factor for paragraph-end detection
    pub short_line_width_factor: f32,
    /// Superscript height ratio for footnote markers
    pub superscript_height_ratio: f32,
    /// Superscript raise above the baseline for footnote markers
    pub superscript_vertical_offset: f32,
    /// Start a new paragraph after a short body line that ends a sentence
    pub detect_paragraph_end_by_width: bool,
}

impl Default for LayoutThresholds {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutThresholds {
    /// Create thresholds with the default values.
    pub fn new() -> Self {
        Self {
            cluster_tolerance: CLUSTER_TOLERANCE,
            default_role_tolerance: DEFAULT_ROLE_TOLERANCE,
            center_tolerance: CENTER_TOLERANCE,
            short_line_width_factor: SHORT_LINE_WIDTH_FACTOR,
            superscript_height_ratio: HEIGHT_RATIO_THRESHOLD,
            superscript_vertical_offset: VERTICAL_OFFSET_THRESHOLD,
            detect_paragraph_end_by_width: false,
        }
    }

    /// Set the clustering tolerance.
    pub fn with_cluster_tolerance(mut self, tolerance: f32) -> Self {
        self.cluster_tolerance = tolerance;
        self
    }

    /// Set the centering tolerance.
    pub fn with_center_tolerance(mut self, tolerance: f32) -> Self {
        self.center_tolerance = tolerance;
        self
    }

    /// Enable or disable width-based paragraph-end detection.
    pub fn with_paragraph_end_by_width(mut self, enable: bool) -> Self {
        self.detect_paragraph_end_by_width = enable;
        self
    }

    /// Check that every threshold is a finite, non-negative number and the
    /// ratios lie in `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let distances = [
            ("clusterTolerance", self.cluster_tolerance),
            ("defaultRoleTolerance", self.default_role_tolerance),
            ("centerTolerance", self.center_tolerance),
            ("superscriptVerticalOffset", self.superscript_vertical_offset),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "layout.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        let ratios = [
            ("shortLineWidthFactor", self.short_line_width_factor),
            ("superscriptHeightRatio", self.superscript_height_ratio),
        ];
        for (name, value) in ratios {
            if !(value > 0.0 && value <= 1.0) {
                return Err(Error::InvalidConfig(format!(
                    "layout.{} must lie in (0, 1], got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_thresholds() {
        let t = LayoutThresholds::default();
        assert_eq!(t.cluster_tolerance, 7.0);
        assert_eq!(t.default_role_tolerance, 15.0);
        assert_eq!(t.center_tolerance, 100.0);
        assert_eq!(t.short_line_width_factor, 0.9);
        assert!(!t.detect_paragraph_end_by_width);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_thresholds_partial_json() {
        let t: LayoutThresholds =
            serde_json::from_str(r#"{"clusterTolerance": 4, "detectParagraphEndByWidth": true}"#)
                .unwrap();
        assert_eq!(t.cluster_tolerance, 4.0);
        assert!(t.detect_paragraph_end_by_width);
        assert_eq!(t.center_tolerance, CENTER_TOLERANCE);
    }

    #[test]
    fn test_thresholds_validation() {
        assert!(LayoutThresholds::new()
            .with_cluster_tolerance(-1.0)
            .validate()
            .is_err());
        let mut t = LayoutThresholds::new();
        t.superscript_height_ratio = 1.5;
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_sequence_policy_json() {
        let p: SequencePolicy = serde_json::from_str(r#""skipMismatched""#).unwrap();
        assert_eq!(p, SequencePolicy::SkipMismatched);
        assert_eq!(SequencePolicy::default(), SequencePolicy::Strict);
    }
}
