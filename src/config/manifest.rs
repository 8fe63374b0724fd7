//! Per-book manifest: OCR corrections and content boundaries.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One systematic OCR misreading and its fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrCorrection {
    /// Regex matching the misreading (`/body/flags` is accepted too)
    pub pattern: String,
    /// Replacement text; may reference capture groups as `$1`
    #[serde(default)]
    pub replacement: String,
}

/// Optional per-book settings layered over the book type.
///
/// An absent manifest is equivalent to `BookManifest::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookManifest {
    /// Corrections applied to every line after text removal
    #[serde(default)]
    pub ocr_corrections: Vec<OcrCorrection>,
    /// Lines before the first line containing this text are ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_start_marker: Option<String>,
    /// Lines from the first line containing this text onward are ignored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_end_marker: Option<String>,
}

impl BookManifest {
    /// Parse a manifest from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a manifest file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Add a correction.
    pub fn with_correction(
        mut self,
        pattern: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.ocr_corrections.push(OcrCorrection {
            pattern: pattern.into(),
            replacement: replacement.into(),
        });
        self
    }

    /// Set the content start marker.
    pub fn with_content_start(mut self, marker: impl Into<String>) -> Self {
        self.content_start_marker = Some(marker.into());
        self
    }

    /// Set the content end marker.
    pub fn with_content_end(mut self, marker: impl Into<String>) -> Self {
        self.content_end_marker = Some(marker.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_manifest() {
        let manifest = BookManifest::from_json(
            r#"{
                "ocrCorrections": [
                    { "pattern": "tlie", "replacement": "the" },
                    { "pattern": "\\s+¬" }
                ],
                "contentStartMarker": "VORREDE"
            }"#,
        )
        .unwrap();
        assert_eq!(manifest.ocr_corrections.len(), 2);
        assert_eq!(manifest.ocr_corrections[1].replacement, "");
        assert_eq!(manifest.content_start_marker.as_deref(), Some("VORREDE"));
        assert!(manifest.content_end_marker.is_none());
    }

    #[test]
    fn test_empty_manifest_is_default() {
        assert_eq!(BookManifest::from_json("{}").unwrap(), BookManifest::default());
    }

    #[test]
    fn test_manifest_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        let manifest = BookManifest::default()
            .with_content_end("ANZEIGEN")
            .with_correction("ſ", "s");
        std::fs::write(&path, serde_json::to_string(&manifest).unwrap()).unwrap();
        assert_eq!(BookManifest::from_file(&path).unwrap(), manifest);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = BookManifest::from_file("/nonexistent/manifest.json").unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }
}
