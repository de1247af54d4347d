//! File operations module for dad-notes
//!
//! This module provides native dialogs for picking images and saving
//! exports, plus the atomic write helpers every file sink goes through.

mod atomic;
pub mod dialogs;

pub use atomic::{unique_path, write_atomic};
pub use dialogs::{DialogImagePicker, ImagePicker, SaveDialogSink};
