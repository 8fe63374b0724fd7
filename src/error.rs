//! Error types for the structural recovery engine.
//!
//! Configuration problems and heading sequence violations are fatal for a
//! book run. Recoverable per-pattern and per-line problems never surface here;
//! they are logged and processing continues.

/// Result type alias for scan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while recovering structure from OCR output.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Book type has no `metrics` section, so lines cannot be classified
    #[error("Book type '{book_type}' has no metrics configuration")]
    MissingMetrics {
        /// Book type key
        book_type: String,
    },

    /// Header pattern references a placeholder outside the grammar
    #[error("Unknown placeholder '{{{name}}}' in header pattern '{pattern}'")]
    UnknownPlaceholder {
        /// Offending pattern string
        pattern: String,
        /// Placeholder name as written
        name: String,
    },

    /// Header pattern could not be compiled into a regular expression
    #[error("Invalid header pattern '{pattern}': {reason}")]
    InvalidHeaderPattern {
        /// Offending pattern string
        pattern: String,
        /// Compiler message
        reason: String,
    },

    /// Generic configuration problem
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No configuration exists for the requested book type
    #[error("Unknown book type: {0}")]
    UnknownBookType(String),

    /// Heading ordinal does not continue the running sequence
    #[error(
        "Heading sequence violation at level {level}: expected ordinal {expected}, \
         found {found} in '{header}'"
    )]
    SequenceViolation {
        /// Heading level (1..=3)
        level: u8,
        /// Ordinal the running counter expects next
        expected: u32,
        /// Ordinal extracted from the heading
        found: u32,
        /// Heading text as matched
        header: String,
    },

    /// A fatal error raised while processing one page of a book
    #[error("Book '{book_type}', page {page_index}: {source}")]
    Page {
        /// Book type key
        book_type: String,
        /// Zero-based page index within the run
        page_index: usize,
        /// Underlying failure
        #[source]
        source: Box<Error>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attach book and page context to an error.
    pub fn at_page(self, book_type: &str, page_index: usize) -> Self {
        Error::Page {
            book_type: book_type.to_string(),
            page_index,
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_metrics_error() {
        let err = Error::MissingMetrics {
            book_type: "philosophy".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("philosophy"));
        assert!(msg.contains("metrics"));
    }

    #[test]
    fn test_unknown_placeholder_error() {
        let err = Error::UnknownPlaceholder {
            pattern: "{chapter} {title}".to_string(),
            name: "chapter".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("{chapter}"));
        assert!(msg.contains("{chapter} {title}"));
    }

    #[test]
    fn test_sequence_violation_error() {
        let err = Error::SequenceViolation {
            level: 1,
            expected: 2,
            found: 3,
            header: "III DRITTES KAPITEL".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("level 1"));
        assert!(msg.contains("expected ordinal 2"));
        assert!(msg.contains("found 3"));
    }

    #[test]
    fn test_page_context() {
        let err = Error::SequenceViolation {
            level: 2,
            expected: 1,
            found: 4,
            header: "4. Vierter Abschnitt".to_string(),
        }
        .at_page("novel", 17);
        let msg = format!("{}", err);
        assert!(msg.contains("novel"));
        assert!(msg.contains("page 17"));
        assert!(msg.contains("level 2"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
