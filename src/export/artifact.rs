//! Export artifacts: serialized output ready for delivery.

use super::html::to_html;
use super::markdown::to_markdown;
use super::options::{ExportFormat, HtmlOptions};
use crate::config::Settings;
use crate::document::Document;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};

/// Serialized document plus the metadata a sink needs to store it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub contents: String,
    pub mime_type: &'static str,
    pub file_name: String,
}

impl ExportArtifact {
    /// Run the export pipeline for `format` over a document snapshot.
    ///
    /// `at` only affects the file name; the contents never carry a timestamp.
    pub fn build(
        doc: &Document,
        format: ExportFormat,
        settings: &Settings,
        at: DateTime<Utc>,
    ) -> Self {
        let contents = match format {
            ExportFormat::Markdown => to_markdown(doc),
            ExportFormat::Html => to_html(doc, &HtmlOptions::with_title(html_title(doc, settings))),
        };

        Self {
            format,
            contents,
            mime_type: format.mime_type(),
            file_name: export_file_name(&settings.filename_prefix, format.extension(), at),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        self.contents.as_bytes()
    }

    /// Check the artifact can be handed to a sink: a bare file name with the
    /// extension of its format.
    pub fn validate(&self) -> Result<()> {
        let problem = if self.file_name.trim().is_empty() {
            Some("file name is empty".to_string())
        } else if self.file_name.contains(['/', '\\']) {
            Some("file name contains a path separator".to_string())
        } else if !self
            .file_name
            .ends_with(&format!(".{}", self.format.extension()))
        {
            Some(format!(
                "file name does not end with .{}",
                self.format.extension()
            ))
        } else {
            None
        };

        match problem {
            Some(message) => Err(Error::Delivery {
                file_name: self.file_name.clone(),
                message,
            }),
            None => Ok(()),
        }
    }
}

/// Timestamped export file name.
///
/// The timestamp is ISO 8601 UTC with milliseconds, with `:` and `.`
/// replaced so the name is valid on every platform, e.g.
/// `dad-notes-2024-05-01T12-30-45-123Z.md`.
pub fn export_file_name(prefix: &str, extension: &str, at: DateTime<Utc>) -> String {
    let stamp = at
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    format!("{}-{}.{}", prefix, stamp, extension)
}

/// The `<title>` for an HTML export.
fn html_title(doc: &Document, settings: &Settings) -> String {
    if settings.title_from_heading {
        if let Some(title) = doc.title() {
            return title;
        }
    }
    settings.document_title.clone()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
