//! Start/end-of-content markers.
//!
//! Front matter and back matter (title pages, publisher ads) are cut by
//! configuring a marker string for where the content starts and where it
//! ends. The window is stateful across pages of one book.

/// Tracks whether lines fall inside the book's content.
#[derive(Debug, Clone, Default)]
pub struct ContentWindow {
    start_marker: Option<String>,
    end_marker: Option<String>,
    started: bool,
    ended: bool,
}

impl ContentWindow {
    /// Create a window. Without a start marker content begins immediately.
    pub fn new(start_marker: Option<String>, end_marker: Option<String>) -> Self {
        let start_marker = start_marker.filter(|m| !m.is_empty());
        let end_marker = end_marker.filter(|m| !m.is_empty());
        Self {
            started: start_marker.is_none(),
            start_marker,
            end_marker,
            ended: false,
        }
    }

    /// Whether a line is inside the content.
    ///
    /// The line containing the start marker is the first admitted line; the
    /// line containing the end marker is the first rejected one.
    pub fn admit(&mut self, text: &str) -> bool {
        if self.ended {
            return false;
        }
        if !self.started {
            match &self.start_marker {
                Some(marker) if text.contains(marker.as_str()) => {
                    log::debug!("Content starts at line '{}'", text);
                    self.started = true;
                },
                _ => return false,
            }
        }
        if let Some(marker) = &self.end_marker {
            if text.contains(marker.as_str()) {
                log::debug!("Content ends at line '{}'", text);
                self.ended = true;
                return false;
            }
        }
        true
    }

    /// Whether the start marker has been seen (or none was configured).
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Whether the end marker has been seen.
    pub fn has_ended(&self) -> bool {
        self.ended
    }
}
