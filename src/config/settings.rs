//! User settings for dad-notes
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::assets::IngestLimits;
use crate::document::{Block, Document};
use crate::export::ExportFormat;
use crate::markdown::parse_blocks;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Assets
    /// Largest image accepted for embedding, in bytes
    pub max_asset_bytes: u64,
    /// MIME type prefix an embedded file must carry
    pub allowed_asset_mime_prefix: String,

    // Content
    /// Markdown loaded into a fresh or reset document
    pub default_content: String,

    // Export
    /// Prefix of exported file names
    pub filename_prefix: String,
    /// `<title>` of exported HTML when no heading provides one
    pub document_title: String,
    /// Use the first heading as the HTML title when present
    pub title_from_heading: bool,
    /// Directory for exported files (None = current directory)
    pub export_directory: Option<PathBuf>,
    /// Open exported files with the system handler after writing
    pub open_after_export: bool,
    /// Format used when none is requested explicitly
    pub last_export_format: ExportFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_asset_bytes: IngestLimits::DEFAULT_MAX_BYTES,
            allowed_asset_mime_prefix: IngestLimits::DEFAULT_MIME_PREFIX.to_string(),
            default_content: Document::PLACEHOLDER.to_string(),
            filename_prefix: Self::DEFAULT_FILENAME_PREFIX.to_string(),
            document_title: Self::DEFAULT_DOCUMENT_TITLE.to_string(),
            title_from_heading: true,
            export_directory: None,
            open_after_export: false,
            last_export_format: ExportFormat::default(),
        }
    }
}

impl Settings {
    pub const DEFAULT_FILENAME_PREFIX: &'static str = "dad-notes";
    pub const DEFAULT_DOCUMENT_TITLE: &'static str = "Dad Notes";

    /// Smallest accepted asset limit
    pub const MIN_ASSET_BYTES: u64 = 1;
    /// Largest accepted asset limit (64 MiB)
    pub const MAX_ASSET_BYTES: u64 = 64 * 1024 * 1024;

    /// Validate and sanitize settings after loading.
    ///
    /// This ensures all values are within acceptable ranges and
    /// fixes any invalid values that might have been manually edited.
    pub fn sanitize(&mut self) {
        self.max_asset_bytes = self
            .max_asset_bytes
            .clamp(Self::MIN_ASSET_BYTES, Self::MAX_ASSET_BYTES);

        if self.allowed_asset_mime_prefix.trim().is_empty() {
            self.allowed_asset_mime_prefix = IngestLimits::DEFAULT_MIME_PREFIX.to_string();
        }

        // Keep the prefix usable as a file name on every platform
        self.filename_prefix = self
            .filename_prefix
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            .collect::<String>()
            .trim_matches('.')
            .to_string();
        if self.filename_prefix.is_empty() {
            self.filename_prefix = Self::DEFAULT_FILENAME_PREFIX.to_string();
        }

        if self.document_title.trim().is_empty() {
            self.document_title = Self::DEFAULT_DOCUMENT_TITLE.to_string();
        }
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Limits applied to every ingested asset.
    pub fn ingest_limits(&self) -> IngestLimits {
        IngestLimits::from_settings(self)
    }

    /// Blocks of the default content.
    pub fn default_blocks(&self) -> Vec<Block> {
        parse_blocks(&self.default_content, &self.ingest_limits())
    }

    /// A fresh document holding the default content.
    pub fn default_document(&self) -> Document {
        Document::new(self.default_blocks())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.max_asset_bytes, 5 * 1024 * 1024);
        assert_eq!(settings.allowed_asset_mime_prefix, "image/");
        assert_eq!(settings.filename_prefix, "dad-notes");
        assert_eq!(settings.default_content, "Start writing ✍️");
        assert_eq!(settings.last_export_format, ExportFormat::Markdown);
        assert!(!settings.open_after_export);
    }

    #[test]
    fn test_default_document_is_single_placeholder_paragraph() {
        let doc = Settings::default().default_document();
        assert_eq!(doc.blocks(), &[Block::paragraph("Start writing ✍️")]);
    }

    #[test]
    fn test_blank_default_content_still_yields_a_paragraph() {
        let settings = Settings {
            default_content: "   ".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.default_document().len(), 1);
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let settings = Settings {
            export_directory: Some(PathBuf::from("/tmp/exports")),
            last_export_format: ExportFormat::Html,
            ..Settings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, loaded);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"filename_prefix": "grocery"}"#).unwrap();
        assert_eq!(settings.filename_prefix, "grocery");
        assert_eq!(settings.max_asset_bytes, IngestLimits::DEFAULT_MAX_BYTES);
    }

    #[test]
    fn test_sanitize_asset_limit() {
        let mut settings = Settings {
            max_asset_bytes: 0,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.max_asset_bytes, Settings::MIN_ASSET_BYTES);

        settings.max_asset_bytes = u64::MAX;
        settings.sanitize();
        assert_eq!(settings.max_asset_bytes, Settings::MAX_ASSET_BYTES);
    }

    #[test]
    fn test_sanitize_filename_prefix() {
        let mut settings = Settings {
            filename_prefix: "../my notes/2024".to_string(),
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.filename_prefix, "mynotes2024");

        settings.filename_prefix = "///".to_string();
        settings.sanitize();
        assert_eq!(settings.filename_prefix, "dad-notes");
    }

    #[test]
    fn test_sanitize_blank_strings() {
        let mut settings = Settings {
            allowed_asset_mime_prefix: " ".to_string(),
            document_title: String::new(),
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.allowed_asset_mime_prefix, "image/");
        assert_eq!(settings.document_title, "Dad Notes");
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings = Settings::from_json_sanitized(r#"{"max_asset_bytes": 0}"#).unwrap();
        assert_eq!(settings.max_asset_bytes, Settings::MIN_ASSET_BYTES);
        assert!(Settings::from_json_sanitized("{ nope").is_err());
    }

    #[test]
    fn test_ingest_limits_follow_settings() {
        let settings = Settings {
            max_asset_bytes: 1024,
            allowed_asset_mime_prefix: "image/png".to_string(),
            ..Settings::default()
        };
        let limits = settings.ingest_limits();
        assert_eq!(limits.max_bytes, 1024);
        assert_eq!(limits.mime_prefix, "image/png");
    }
}
