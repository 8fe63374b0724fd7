//! Book type configuration.
//!
//! A book type bundles everything that differs between editions: heading
//! patterns per level, boilerplate to strip, where the indented columns sit
//! relative to the body text, and how strictly heading numbers are checked.
//!
//! ```json
//! {
//!   "headerTypes": {
//!     "level1": {
//!       "formats": [
//!         { "pattern": "{roman-number} {title-in-capital-letters}", "multipleLines": true }
//!       ]
//!     }
//!   },
//!   "textRemovalPatterns": ["/^\\d+$/"],
//!   "metrics": {
//!     "paragraphStart": 30,
//!     "footnoteText": { "expectedOffset": 20, "tolerance": 10 }
//!   }
//! }
//! ```

use super::{LayoutThresholds, SequencePolicy};
use crate::error::{Error, Result};
use crate::headings::{HeaderMatcher, DEFAULT_PARAGRAPH_END_MARKERS};
use crate::layout::{LineRole, RoleOffsetRule};
use crate::text::TextRemover;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Horizontal alignment a heading format expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderAlignment {
    /// Flush left; no position check
    Left,
    /// Centered on the page; the first line must be centered too
    Center,
    /// Flush right; no position check
    Right,
}

/// One way a heading of some level can be printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderFormat {
    /// Placeholder pattern, e.g. `"{roman-number} {title-in-capital-letters}"`
    pub pattern: String,
    /// Expected alignment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<HeaderAlignment>,
    /// Whether the heading may continue on following centered lines
    #[serde(default)]
    pub multiple_lines: bool,
}

impl HeaderFormat {
    /// Single-line format with no alignment requirement.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            alignment: None,
            multiple_lines: false,
        }
    }

    /// Allow continuation lines.
    pub fn with_multiple_lines(mut self, multiple_lines: bool) -> Self {
        self.multiple_lines = multiple_lines;
        self
    }

    /// Require an alignment.
    pub fn with_alignment(mut self, alignment: HeaderAlignment) -> Self {
        self.alignment = Some(alignment);
        self
    }
}

/// Ordered formats for one heading level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderTypeDefinition {
    /// Formats tried in order; first match wins
    #[serde(default)]
    pub formats: Vec<HeaderFormat>,
}

/// Heading definitions for levels 1 to 3.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderTypes {
    /// Level 1 (`#`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level1: Option<HeaderTypeDefinition>,
    /// Level 2 (`##`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level2: Option<HeaderTypeDefinition>,
    /// Level 3 (`###`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level3: Option<HeaderTypeDefinition>,
}

impl HeaderTypes {
    /// Definitions by level, shallowest first. Absent levels are skipped.
    pub fn levels(&self) -> impl Iterator<Item = (u8, &HeaderTypeDefinition)> {
        [(1u8, &self.level1), (2, &self.level2), (3, &self.level3)]
            .into_iter()
            .filter_map(|(level, def)| def.as_ref().map(|d| (level, d)))
    }

    /// Mutable slot for a level.
    fn slot(&mut self, level: u8) -> Option<&mut Option<HeaderTypeDefinition>> {
        match level {
            1 => Some(&mut self.level1),
            2 => Some(&mut self.level2),
            3 => Some(&mut self.level3),
            _ => None,
        }
    }
}

/// Where a role's column sits relative to the body column.
///
/// Either a bare offset in pixels or an object with an explicit tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleOffset {
    /// Offset with the default tolerance
    Offset(f32),
    /// Offset with its own tolerance
    Detailed {
        /// Expected offset from the body column
        #[serde(rename = "expectedOffset")]
        expected_offset: f32,
        /// Allowed deviation
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tolerance: Option<f32>,
    },
}

impl RoleOffset {
    /// Expected offset in pixels.
    pub fn expected_offset(&self) -> f32 {
        match self {
            RoleOffset::Offset(offset) => *offset,
            RoleOffset::Detailed {
                expected_offset, ..
            } => *expected_offset,
        }
    }

    /// Tolerance, falling back to `default`.
    pub fn tolerance_or(&self, default: f32) -> f32 {
        match self {
            RoleOffset::Detailed {
                tolerance: Some(tolerance),
                ..
            } => *tolerance,
            _ => default,
        }
    }
}

fn default_paragraph_end_markers() -> Vec<char> {
    DEFAULT_PARAGRAPH_END_MARKERS.to_vec()
}

/// Configuration for one book type, as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTypeConfig {
    /// Heading formats per level
    #[serde(default)]
    pub header_types: HeaderTypes,
    /// Boilerplate removed from every line (`/regex/flags` or literal text)
    #[serde(default)]
    pub text_removal_patterns: Vec<String>,
    /// Role offsets relative to the body column; required
    #[serde(default)]
    pub metrics: Option<IndexMap<String, RoleOffset>>,
    /// Heading ordinal mismatch handling
    #[serde(default)]
    pub sequence_policy: SequencePolicy,
    /// Reset deeper heading counters when a heading is accepted
    #[serde(default)]
    pub reset_lower_levels: bool,
    /// Characters that end a paragraph
    #[serde(default = "default_paragraph_end_markers")]
    pub paragraph_end_markers: Vec<char>,
    /// Geometric threshold overrides
    #[serde(default)]
    pub layout: LayoutThresholds,
}

impl Default for BookTypeConfig {
    fn default() -> Self {
        Self {
            header_types: HeaderTypes::default(),
            text_removal_patterns: Vec::new(),
            metrics: None,
            sequence_policy: SequencePolicy::default(),
            reset_lower_levels: false,
            paragraph_end_markers: default_paragraph_end_markers(),
            layout: LayoutThresholds::default(),
        }
    }
}

impl BookTypeConfig {
    /// Create an empty configuration (no headings, no metrics).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Add heading formats to a level (1..=3); other levels are ignored.
    pub fn with_header_level(mut self, level: u8, formats: Vec<HeaderFormat>) -> Self {
        if let Some(slot) = self.header_types.slot(level) {
            slot.get_or_insert_with(HeaderTypeDefinition::default)
                .formats
                .extend(formats);
        }
        self
    }

    /// Configure a role offset.
    pub fn with_metric(mut self, role: LineRole, offset: RoleOffset) -> Self {
        self.metrics
            .get_or_insert_with(IndexMap::new)
            .insert(role.to_string(), offset);
        self
    }

    /// Add a text removal pattern.
    pub fn with_removal_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.text_removal_patterns.push(pattern.into());
        self
    }

    /// Set the sequence policy.
    pub fn with_sequence_policy(mut self, policy: SequencePolicy) -> Self {
        self.sequence_policy = policy;
        self
    }

    /// Set whether accepting a heading resets deeper counters.
    pub fn with_reset_lower_levels(mut self, reset: bool) -> Self {
        self.reset_lower_levels = reset;
        self
    }

    /// Set layout thresholds.
    pub fn with_layout(mut self, layout: LayoutThresholds) -> Self {
        self.layout = layout;
        self
    }

    /// Validate and compile the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingMetrics`] when there is no `metrics` section
    /// - [`Error::UnknownPlaceholder`] / [`Error::InvalidHeaderPattern`] for
    ///   bad heading patterns
    /// - [`Error::InvalidConfig`] for unknown role names, negative
    ///   tolerances or bad layout thresholds
    pub fn compile(self, key: &str) -> Result<CompiledBookType> {
        self.layout.validate()?;

        let Some(metrics) = &self.metrics else {
            return Err(Error::MissingMetrics {
                book_type: key.to_string(),
            });
        };

        let mut configured: Vec<RoleOffsetRule> = Vec::new();
        for (name, offset) in metrics {
            let role: LineRole = name.parse()?;
            let tolerance = offset.tolerance_or(self.layout.default_role_tolerance);
            if !offset.expected_offset().is_finite() || !tolerance.is_finite() || tolerance < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "metrics.{} in book type '{}' needs a finite offset and a non-negative \
                     tolerance",
                    name, key
                )));
            }
            match role {
                LineRole::ParagraphText => {
                    log::debug!(
                        "Book type '{}': paragraphText is the reference column, offset ignored",
                        key
                    );
                },
                LineRole::Unknown(_) => {
                    return Err(Error::InvalidConfig(format!(
                        "metrics.{} in book type '{}': unknown clusters cannot be configured",
                        name, key
                    )));
                },
                _ => configured.push(RoleOffsetRule {
                    role,
                    expected_offset: offset.expected_offset(),
                    tolerance,
                }),
            }
        }

        // Claim priority is fixed, independent of the order in the file
        let role_offsets: Vec<RoleOffsetRule> = LineRole::OFFSET_ROLES
            .iter()
            .filter_map(|role| configured.iter().find(|r| r.role == *role).copied())
            .collect();

        let headers = HeaderMatcher::from_types(&self.header_types, &self.paragraph_end_markers)?;
        let remover = TextRemover::new(&self.text_removal_patterns);

        log::info!(
            "Compiled book type '{}': {} heading formats, {} removal patterns, {} role offsets",
            key,
            headers.format_count(),
            remover.len(),
            role_offsets.len()
        );

        Ok(CompiledBookType {
            key: key.to_string(),
            config: self,
            headers,
            remover,
            role_offsets,
        })
    }
}

/// A validated book type, ready for scanning. Immutable once built.
#[derive(Debug, Clone)]
pub struct CompiledBookType {
    key: String,
    config: BookTypeConfig,
    headers: HeaderMatcher,
    remover: TextRemover,
    role_offsets: Vec<RoleOffsetRule>,
}

impl CompiledBookType {
    /// Registry key of this book type.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Source configuration.
    pub fn config(&self) -> &BookTypeConfig {
        &self.config
    }

    /// Compiled heading matcher.
    pub fn headers(&self) -> &HeaderMatcher {
        &self.headers
    }

    /// Compiled removal patterns.
    pub fn remover(&self) -> &TextRemover {
        &self.remover
    }

    /// Role offsets in claim priority order.
    pub fn role_offsets(&self) -> &[RoleOffsetRule] {
        &self.role_offsets
    }

    /// Layout thresholds.
    pub fn layout(&self) -> &LayoutThresholds {
        &self.config.layout
    }

    /// Heading ordinal mismatch handling.
    pub fn sequence_policy(&self) -> SequencePolicy {
        self.config.sequence_policy
    }
}
