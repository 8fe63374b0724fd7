//! Multi-level heading recognition.

use super::pattern::{HeaderPattern, PatternMatch};
use crate::config::{HeaderAlignment, HeaderFormat, HeaderTypes};
use crate::error::Result;
use crate::ocr::LineView;

/// A recognized heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderResult {
    /// Heading text, continuation lines joined with single spaces
    pub header_text: String,
    /// Heading level, 1 to 3
    pub level: u8,
    /// Index of the last line consumed (inclusive)
    pub new_line_index: usize,
    /// Ordinal taken from the first line, if its pattern carries one
    pub ordinal: Option<u32>,
}

impl HeaderResult {
    /// Markdown rendering: `"\n\n## Text\n\n"`.
    pub fn markdown(&self) -> String {
        format!(
            "\n\n{} {}\n\n",
            "#".repeat(self.level as usize),
            self.header_text
        )
    }

    /// Number of lines the heading spans.
    pub fn line_count(&self, start_index: usize) -> usize {
        self.new_line_index + 1 - start_index
    }
}

/// Horizontal context needed for centering checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Centering {
    /// Horizontal center of the page
    pub page_center: f32,
    /// Maximum distance of a line's midpoint from the page center
    pub tolerance: f32,
}

impl Centering {
    /// Whether a line's box is centered on the page.
    pub fn is_centered(&self, line: &impl LineView) -> bool {
        line.bbox()
            .is_some_and(|b| (b.center_x() - self.page_center).abs() <= self.tolerance)
    }
}

#[derive(Debug, Clone)]
struct CompiledFormat {
    pattern: HeaderPattern,
    alignment: Option<HeaderAlignment>,
    multiple_lines: bool,
}

#[derive(Debug, Clone)]
struct LevelFormats {
    level: u8,
    formats: Vec<CompiledFormat>,
}

impl LevelFormats {
    fn matches_any(&self, text: &str) -> bool {
        self.formats.iter().any(|f| f.pattern.match_text(text).matched)
    }
}

/// Compiled heading formats for all levels of a book type.
#[derive(Debug, Clone, Default)]
pub struct HeaderMatcher {
    levels: Vec<LevelFormats>,
}

impl HeaderMatcher {
    /// Compile every format of every configured level.
    pub fn from_types(types: &HeaderTypes, paragraph_end_markers: &[char]) -> Result<Self> {
        let levels = types
            .levels()
            .map(|(level, definition)| {
                let formats = definition
                    .formats
                    .iter()
                    .map(|format| compile_format(format, paragraph_end_markers))
                    .collect::<Result<Vec<_>>>()?;
                Ok(LevelFormats { level, formats })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { levels })
    }

    /// Total number of compiled formats.
    pub fn format_count(&self) -> usize {
        self.levels.iter().map(|l| l.formats.len()).sum()
    }

    /// Whether no heading format is configured.
    pub fn is_empty(&self) -> bool {
        self.format_count() == 0
    }

    /// Try to recognize a heading starting at `lines[index]`.
    ///
    /// Levels are tried shallowest first and formats in configured order;
    /// the first match wins. For formats allowing several lines, following
    /// lines are consumed while they are centered on the page and the joined
    /// text still matches one of the level's formats. Without `centering`
    /// neither continuation nor centered alignment can be checked, so both
    /// fail closed.
    pub fn match_at<L: LineView>(
        &self,
        lines: &[L],
        index: usize,
        centering: Option<Centering>,
    ) -> Option<HeaderResult> {
        let line = lines.get(index)?;
        let text = line.text().trim();
        if text.is_empty() {
            return None;
        }

        for level in &self.levels {
            for format in &level.formats {
                let m = format.pattern.match_text(text);
                if !m.matched {
                    continue;
                }
                if format.alignment == Some(HeaderAlignment::Center)
                    && !centering.is_some_and(|c| c.is_centered(line))
                {
                    log::trace!(
                        "'{}' matches '{}' but is not centered",
                        text,
                        format.pattern.source()
                    );
                    continue;
                }
                return Some(self.extend(level, format, &m, lines, index, centering));
            }
        }
        None
    }

    fn extend<L: LineView>(
        &self,
        level: &LevelFormats,
        format: &CompiledFormat,
        first: &PatternMatch,
        lines: &[L],
        index: usize,
        centering: Option<Centering>,
    ) -> HeaderResult {
        let mut header_text = first.full_match.trim().to_string();
        let mut last = index;

        if let (true, Some(centering)) = (format.multiple_lines, centering) {
            for (next_index, next) in lines.iter().enumerate().skip(index + 1) {
                let next_text = next.text().trim();
                if next_text.is_empty() || !centering.is_centered(next) {
                    break;
                }
                let candidate = format!("{} {}", header_text, next_text);
                if !level.matches_any(&candidate) {
                    break;
                }
                header_text = candidate;
                last = next_index;
            }
        }

        log::debug!(
            "Level {} heading '{}' (lines {}..={})",
            level.level,
            header_text,
            index,
            last
        );
        HeaderResult {
            header_text,
            level: level.level,
            new_line_index: last,
            ordinal: first.ordinal(),
        }
    }
}

fn compile_format(format: &HeaderFormat, paragraph_end_markers: &[char]) -> Result<CompiledFormat> {
    Ok(CompiledFormat {
        pattern: HeaderPattern::compile(&format.pattern, paragraph_end_markers)?,
        alignment: format.alignment,
        multiple_lines: format.multiple_lines,
    })
}
