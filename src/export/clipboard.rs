//! Clipboard Delivery
//!
//! This module copies export artifacts to the system clipboard using the
//! arboard crate. HTML is placed as rich content so email clients and word
//! processors paste it formatted.

// enum_variant_names: Error variants follow standard naming convention
#![allow(clippy::enum_variant_names)]

use super::artifact::ExportArtifact;
use super::delivery::{Delivery, DeliverySink};
use super::options::ExportFormat;
use crate::error::{Error, Result};
use arboard::Clipboard;
use log::info;

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during clipboard operations.
#[derive(Debug)]
pub enum ClipboardError {
    /// Failed to access clipboard
    AccessError(String),
    /// Failed to set clipboard content
    WriteError(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::AccessError(msg) => write!(f, "Clipboard access error: {}", msg),
            ClipboardError::WriteError(msg) => write!(f, "Clipboard write error: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Copy plain text to clipboard.
pub fn copy_text_to_clipboard(text: &str) -> std::result::Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;

    clipboard
        .set_text(text)
        .map_err(|e| ClipboardError::WriteError(e.to_string()))?;

    Ok(())
}

/// Copy HTML with an optional plain text fallback to clipboard.
///
/// Applications that cannot paste rich content receive the fallback.
pub fn copy_html_with_fallback(
    html: &str,
    plain_text: Option<&str>,
) -> std::result::Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;

    clipboard
        .set_html(html, plain_text)
        .map_err(|e| ClipboardError::WriteError(e.to_string()))?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Sink
// ─────────────────────────────────────────────────────────────────────────────

/// Delivers artifacts to the system clipboard.
#[derive(Debug, Default)]
pub struct ClipboardSink {
    fallback: Option<String>,
}

impl ClipboardSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain text offered alongside HTML artifacts.
    pub fn with_fallback(text: impl Into<String>) -> Self {
        Self {
            fallback: Some(text.into()),
        }
    }
}

impl DeliverySink for ClipboardSink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<Delivery> {
        let copied = match artifact.format {
            ExportFormat::Html => {
                copy_html_with_fallback(&artifact.contents, self.fallback.as_deref())
            }
            ExportFormat::Markdown => copy_text_to_clipboard(&artifact.contents),
        };

        copied.map_err(|e| Error::Delivery {
            file_name: artifact.file_name.clone(),
            message: e.to_string(),
        })?;

        info!("Copied {} export to clipboard", artifact.format.label());
        Ok(Delivery::Copied)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
