//! Editing surface integration
//!
//! The interactive editor is an external component. This module defines the
//! capability trait any editor engine implements, and the adapter that keeps
//! the session's [`Document`](crate::document::Document) in step with it.
//!
//! # Architecture
//!
//! - `mod.rs` - the `EditingSurface` trait and its content/error types
//! - `adapter.rs` - `SurfaceAdapter`: change notices, observers, insert/reset
//! - `memory.rs` - `MemorySurface`, an in-memory surface for hosts and tests

mod adapter;
mod memory;

pub use adapter::SurfaceAdapter;
pub use memory::MemorySurface;

use crate::assets::Asset;
use crate::document::Block;
use std::fmt;

/// Callback a surface invokes after every content change.
pub type ChangeCallback = Box<dyn FnMut()>;

/// Content reported by a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceContent {
    /// Structured blocks, taken as-is
    Blocks(Vec<Block>),
    /// Markdown text, read with the Markdown reader
    Markdown(String),
}

/// A structural command the surface refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    Rejected(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Rejected(reason) => write!(f, "Editor rejected the change: {}", reason),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Capabilities the session needs from an interactive editor.
pub trait EditingSurface {
    /// Whether the editor has finished initializing and accepts commands.
    fn is_ready(&self) -> bool;

    /// The editor's current content.
    fn current_content(&self) -> SurfaceContent;

    /// Register a callback fired after every content change.
    fn on_content_changed(&mut self, callback: ChangeCallback);

    /// Render an image block at the cursor, returning the block index used.
    fn insert_image_at_cursor(&mut self, asset: &Asset, alt: &str) -> Result<usize, SurfaceError>;

    /// Replace everything the editor shows.
    fn replace_all_content(&mut self, blocks: &[Block]) -> Result<(), SurfaceError>;
}
