//! Native file dialog integration using the rfd crate
//!
//! This module provides native dialogs for picking an image to embed and
//! for choosing where an export is saved.

use crate::error::Result;
use crate::export::delivery::write_artifact;
use crate::export::{Delivery, DeliverySink, ExportArtifact, ExportFormat};
use log::debug;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

/// File extension filters for images that can be embedded.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "ico", "tif", "tiff", "avif",
];

// ─────────────────────────────────────────────────────────────────────────────
// Image Picking
// ─────────────────────────────────────────────────────────────────────────────

/// Something that lets the user choose an image file.
///
/// `None` means the user cancelled.
pub trait ImagePicker {
    fn pick_image(&mut self) -> Option<PathBuf>;
}

/// Picks images with the native open dialog.
#[derive(Debug, Default, Clone)]
pub struct DialogImagePicker {
    initial_dir: Option<PathBuf>,
}

impl DialogImagePicker {
    pub fn new(initial_dir: Option<PathBuf>) -> Self {
        Self { initial_dir }
    }
}

impl ImagePicker for DialogImagePicker {
    fn pick_image(&mut self) -> Option<PathBuf> {
        let mut dialog = FileDialog::new()
            .set_title("Insert Image")
            .add_filter("Images", IMAGE_EXTENSIONS);

        if let Some(dir) = &self.initial_dir {
            dialog = dialog.set_directory(dir);
        }

        let picked = dialog.pick_file();
        if let Some(dir) = picked.as_deref().and_then(Path::parent) {
            self.initial_dir = Some(dir.to_path_buf());
        }
        picked
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Saving Exports
// ─────────────────────────────────────────────────────────────────────────────

/// Opens a native save dialog for an export.
///
/// Returns `Some(PathBuf)` if a location was selected, `None` if cancelled.
pub fn save_export_dialog(
    initial_dir: Option<&Path>,
    default_name: &str,
    format: ExportFormat,
) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title(format!("Export as {}", format.label()))
        .add_filter(format.label(), &[format.extension()])
        .set_file_name(default_name);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.save_file()
}

/// Asks the user where to save each artifact.
#[derive(Debug, Default, Clone)]
pub struct SaveDialogSink {
    initial_dir: Option<PathBuf>,
}

impl SaveDialogSink {
    pub fn new(initial_dir: Option<PathBuf>) -> Self {
        Self { initial_dir }
    }
}

impl DeliverySink for SaveDialogSink {
    fn deliver(&mut self, artifact: &ExportArtifact) -> Result<Delivery> {
        let Some(path) = save_export_dialog(
            self.initial_dir.as_deref(),
            &artifact.file_name,
            artifact.format,
        ) else {
            debug!("Export of {} cancelled", artifact.file_name);
            return Ok(Delivery::Cancelled);
        };

        write_artifact(&path, artifact)?;
        if let Some(dir) = path.parent() {
            self.initial_dir = Some(dir.to_path_buf());
        }
        Ok(Delivery::Saved(path))
    }
}
