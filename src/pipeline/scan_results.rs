//! Cross-page accumulator for one book run.

use crate::error::{Error, Result};
use crate::headings::HeaderResult;

/// Number of heading levels with running counters.
pub const HEADING_LEVELS: u8 = 3;

/// Running output and heading counters of one book run.
///
/// Created once per book and threaded through every page in order. Only the
/// page sequencer mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResults {
    /// Body text with Markdown headings
    pub text_with_headers: String,
    /// Endnotes, one `[n]: content` entry per footnote
    pub footnote_text: String,
    /// Last accepted level 1 ordinal
    pub level1_index: u32,
    /// Last accepted level 2 ordinal
    pub level2_index: u32,
    /// Last accepted level 3 ordinal
    pub level3_index: u32,
}

impl ScanResults {
    /// Fresh accumulator with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter of a level (1..=3).
    pub fn counter(&self, level: u8) -> Option<u32> {
        match level {
            1 => Some(self.level1_index),
            2 => Some(self.level2_index),
            3 => Some(self.level3_index),
            _ => None,
        }
    }

    fn counter_mut(&mut self, level: u8) -> Option<&mut u32> {
        match level {
            1 => Some(&mut self.level1_index),
            2 => Some(&mut self.level2_index),
            3 => Some(&mut self.level3_index),
            _ => None,
        }
    }

    /// All counters, level 1 first.
    pub fn counters(&self) -> [u32; 3] {
        [self.level1_index, self.level2_index, self.level3_index]
    }

    /// Counter value a heading would set, without changing anything.
    ///
    /// A heading with an ordinal must continue its level's sequence exactly;
    /// one without an ordinal advances the counter by one.
    pub fn check_heading(&self, header: &HeaderResult) -> Result<u32> {
        let current = self.counter(header.level).ok_or_else(|| {
            Error::InvalidConfig(format!("Heading level {} is out of range", header.level))
        })?;
        let expected = current + 1;
        match header.ordinal {
            Some(found) if found != expected => Err(Error::SequenceViolation {
                level: header.level,
                expected,
                found,
                header: header.header_text.clone(),
            }),
            _ => Ok(expected),
        }
    }

    /// Validate a heading, advance its counter and append its Markdown.
    ///
    /// With `reset_lower_levels` the counters of deeper levels go back to
    /// zero. On error nothing is modified.
    pub fn record_heading(
        &mut self,
        header: &HeaderResult,
        reset_lower_levels: bool,
    ) -> Result<()> {
        let next = self.check_heading(header)?;
        if let Some(counter) = self.counter_mut(header.level) {
            *counter = next;
        }
        if reset_lower_levels {
            for level in header.level + 1..=HEADING_LEVELS {
                if let Some(counter) = self.counter_mut(level) {
                    *counter = 0;
                }
            }
        }
        self.text_with_headers.push_str(&header.markdown());
        Ok(())
    }
}
